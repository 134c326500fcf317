use thiserror::Error;

/// Failures raised by reminder collaborators and input validation.
///
/// None of these are fatal to the host application: scheduling operations catch
/// them per bill or per budget and degrade to fewer notifications.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReminderError {
    #[error("Notification permission not granted")]
    PermissionDenied,
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),
    #[error("Invalid bill data: {0}")]
    InvalidBillData(String),
}

impl ReminderError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        ReminderError::CollaboratorUnavailable(message.into())
    }
}
