use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The call never produced a usable answer (network, timeout, undecodable body).
    #[error("record store request failed: {0}")]
    Transport(String),
    /// The call completed and the store answered `success: false`.
    #[error("record store rejected the request: {message}")]
    Rejected { message: String },
    #[error("record store is unavailable")]
    Unavailable,
}

impl StoreError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Message worth showing to the user, if the store supplied one.
    pub fn store_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("unknown draft field '{0}'")]
    UnknownField(String),
    #[error("unknown department '{0}'")]
    UnknownDepartment(String),
    #[error("invalid health center id '{0}'")]
    InvalidHealthCenter(String),
    #[error("invalid birth date '{0}', expected YYYY-MM-DD")]
    InvalidBirthDate(String),
    #[error("no volunteer is being edited")]
    NotEditing,
}
