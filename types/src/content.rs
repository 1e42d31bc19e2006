use std::fmt;

/// Content produced by a resolver, ready to be mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableContent {
    /// Title shown in the navigation bar while the page is on top.
    pub title: String,
    /// Per-page navbar preference; `None` falls back to the configured default.
    pub nav_bar: Option<bool>,
    /// Opaque to the controller; only the renderer interprets it.
    pub body: String,
}

impl RenderableContent {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nav_bar: None,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_nav_bar(mut self, visible: bool) -> Self {
        self.nav_bar = Some(visible);
        self
    }
}

/// Target area that pages are mounted into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(String);

impl ContainerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new("nav-content")
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
