use thiserror::Error;

use crate::ui::notify::{Notice, NoticeKind};

/// Application-level error type.
/// Every variant maps to a transient notification via `to_notice`; none is fatal.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Storage error: {0}")]
    Storage(String),

    /// The credential list could not be persisted during registration.
    #[error("Registration failed: {0}")]
    Registration(String),

    #[error("Render asset error: {0}")]
    RenderAsset(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Converts the error into the notification shown to the user.
    ///
    /// Detail that is meaningless to the user (I/O, PDF internals) is logged here
    /// and replaced by a generic message.
    pub fn to_notice(&self) -> Notice {
        let message = match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid credentials. Please try again.".to_string(),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                "Could not save your data. Please try again.".to_string()
            }
            AppError::Registration(msg) => {
                tracing::error!("Registration failed: {msg}");
                "Registration failed. Please try again.".to_string()
            }
            AppError::RenderAsset(msg) => {
                tracing::error!("Render asset error: {msg}");
                "The photo could not be used.".to_string()
            }
            AppError::Pdf(msg) => {
                tracing::error!("PDF error: {msg}");
                "Portfolio export failed. Please try again.".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "Something went wrong. Please try again.".to_string()
            }
        };

        Notice {
            kind: NoticeKind::Error,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let notice = AppError::Validation("Passwords do not match".to_string()).to_notice();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Passwords do not match");
    }

    #[test]
    fn test_invalid_credentials_message() {
        let notice = AppError::InvalidCredentials.to_notice();
        assert_eq!(notice.message, "Invalid credentials. Please try again.");
    }

    #[test]
    fn test_registration_failure_message() {
        let notice = AppError::Registration("write users: disk full".to_string()).to_notice();
        assert_eq!(notice.message, "Registration failed. Please try again.");
    }

    #[test]
    fn test_storage_detail_is_not_leaked() {
        let notice = AppError::Storage("permission denied: /data/users.json".to_string()).to_notice();
        assert!(!notice.message.contains("/data"));
    }
}
