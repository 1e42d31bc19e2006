//! Transition kinds, directions, and the animation classes they select.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a transition does to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Push,
    Pop,
}

impl TransitionKind {
    /// Push always moves forward, pop always moves backward.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Push => Direction::Forward,
            Self::Pop => Direction::Backward,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pop => "pop",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Animation direction handed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class names applied to entering and exiting views.
///
/// ```toml
/// [animation]
/// push_in = "slide-in-left"
/// push_out = "slide-out-left"
/// pop_in = "slide-in-right"
/// pop_out = "slide-out-right"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationClasses {
    /// Applied to the page entering on a push.
    pub push_in: String,
    /// Applied to the page being covered by a push.
    pub push_out: String,
    /// Applied to the page revealed by a pop.
    pub pop_in: String,
    /// Applied to the page removed by a pop.
    pub pop_out: String,
}

impl Default for AnimationClasses {
    fn default() -> Self {
        Self {
            push_in: "slide-in-left".to_string(),
            push_out: "slide-out-left".to_string(),
            pop_in: "slide-in-right".to_string(),
            pop_out: "slide-out-right".to_string(),
        }
    }
}

impl AnimationClasses {
    #[must_use]
    pub fn enter_class(&self, direction: Direction) -> &str {
        match direction {
            Direction::Forward => &self.push_in,
            Direction::Backward => &self.pop_in,
        }
    }

    #[must_use]
    pub fn exit_class(&self, direction: Direction) -> &str {
        match direction {
            Direction::Forward => &self.push_out,
            Direction::Backward => &self.pop_out,
        }
    }

    /// Every configured class, for animators that clear stale classes first.
    #[must_use]
    pub fn all(&self) -> [&str; 4] {
        [&self.push_in, &self.push_out, &self.pop_in, &self.pop_out]
    }

    #[must_use]
    pub fn enter_cue(&self, direction: Direction) -> AnimationCue {
        AnimationCue {
            direction,
            class: self.enter_class(direction).to_string(),
        }
    }

    #[must_use]
    pub fn exit_cue(&self, direction: Direction) -> AnimationCue {
        AnimationCue {
            direction,
            class: self.exit_class(direction).to_string(),
        }
    }
}

/// Instruction for a single enter or exit animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationCue {
    pub direction: Direction,
    pub class: String,
}
