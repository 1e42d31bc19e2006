use serde::Serialize;

use crate::Direction;

/// What the navigation bar should show for the current top of the stack.
///
/// Purely a projection: sinks observe it, nothing flows back.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NavBarState {
    pub title: String,
    pub back_button_visible: bool,
    pub is_visible: bool,
    /// Direction of the transition that produced this projection, if any.
    pub direction: Option<Direction>,
}

impl NavBarState {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}
