use thiserror::Error;

/// Failure reported by an external collaborator (resolver, renderer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CollaboratorFailure {
    message: String,
}

impl CollaboratorFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by the page stack and the navigation controller.
///
/// `InvalidState` is a caller error and propagates. The other variants are
/// recovered inside the controller and reported as a failed outcome; the stack
/// is never left half-mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("cannot {operation}: {reason}")]
    InvalidState {
        operation: &'static str,
        reason: &'static str,
    },
    #[error("failed to resolve {source_ref}: {reason}")]
    ContentResolutionFailed { source_ref: String, reason: String },
    #[error("failed to render {source_ref}: {reason}")]
    RenderFailed { source_ref: String, reason: String },
}

impl NavError {
    #[must_use]
    pub fn invalid_state(operation: &'static str, reason: &'static str) -> Self {
        Self::InvalidState { operation, reason }
    }

    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}
