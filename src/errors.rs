use crate::control::Action;
use serde::Serialize;

/// Failure categories the handler reports on. The two activation kinds get the
/// same user treatment but different diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RemoteRejected,
    TransportFailure,
    Other,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::RemoteRejected => "remote_rejected",
            ErrorKind::TransportFailure => "transport_failure",
            ErrorKind::Other => "other",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToggleError {
    #[error("{action} rejected by server: status {status}")]
    RemoteRejected { action: Action, status: u16 },

    #[error("{action} request failed: {message}")]
    Transport { action: Action, message: String },

    #[error("course id must not be empty")]
    InvalidCourseId,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ToggleError {
    pub fn transport(action: Action, err: impl std::error::Error) -> Self {
        Self::Transport {
            action,
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ToggleError::RemoteRejected { .. } => ErrorKind::RemoteRejected,
            ToggleError::Transport { .. } => ErrorKind::TransportFailure,
            _ => ErrorKind::Other,
        }
    }

    /// The fixed text shown to the user for a failed activation.
    pub fn notice_message(&self) -> &'static str {
        match self {
            ToggleError::RemoteRejected { action, .. } => action.failure_message(),
            _ => "An error occurred. Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_and_transport_are_distinguishable() {
        let rejected = ToggleError::RemoteRejected {
            action: Action::Unenroll,
            status: 500,
        };
        let transport = ToggleError::Transport {
            action: Action::Unenroll,
            message: "connection refused".to_string(),
        };

        assert_eq!(rejected.kind().as_str(), "remote_rejected");
        assert_eq!(transport.kind().as_str(), "transport_failure");
        assert_eq!(
            rejected.notice_message(),
            "Failed to unenroll from course. Please try again."
        );
        assert_eq!(
            transport.notice_message(),
            "An error occurred. Please try again."
        );
        assert_eq!(rejected.to_string(), "unenroll rejected by server: status 500");
    }
}
