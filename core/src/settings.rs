use std::time::Duration;

use navstack_config::NavConfig;
use navstack_types::{AnimationClasses, ContainerId};

/// Controller settings derived from [`NavConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSettings {
    pub push_cooldown: Duration,
    pub pop_cooldown: Duration,
    pub animation: AnimationClasses,
    /// Navbar visibility for pages whose content has no preference.
    pub default_nav_bar_visible: bool,
    pub container: ContainerId,
    /// Source pushed by [`crate::NavController::start`].
    pub first: Option<String>,
}

impl NavSettings {
    #[must_use]
    pub fn from_config(config: &NavConfig) -> Self {
        Self {
            push_cooldown: config.throttle.push_cooldown(),
            pop_cooldown: config.throttle.pop_cooldown(),
            animation: config.animation.clone(),
            default_nav_bar_visible: config.nav_bar.default_visible,
            container: config
                .navigation
                .container
                .as_deref()
                .map(ContainerId::new)
                .unwrap_or_default(),
            first: config.navigation.first.clone(),
        }
    }

    /// Use the same cool-down for push and pop.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.push_cooldown = cooldown;
        self.pop_cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn with_first(mut self, source_ref: impl Into<String>) -> Self {
        self.first = Some(source_ref.into());
        self
    }
}

impl Default for NavSettings {
    fn default() -> Self {
        Self::from_config(&NavConfig::default())
    }
}
