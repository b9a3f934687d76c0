//! Progress of a single client operation.

/// Lifecycle of one kind of backend call (search, lyrics or analysis).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OperationState<T> {
    /// Never started, or reset by navigation.
    #[default]
    Idle,

    /// Waiting for the backend.
    Loading,

    Success(T),

    /// Failed with a message suitable for display.
    Error(String),
}

impl<T> OperationState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, OperationState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            OperationState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OperationState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Forgets a previous failure, leaving every other state untouched.
    pub fn clear_error(&mut self) {
        if matches!(self, OperationState::Error(_)) {
            *self = OperationState::Idle;
        }
    }
}
