use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Unknown command: {0}. Please try again.")]
    UnknownCommand(String),

    #[error("A patient with NRIC {0} already exists")]
    DuplicatePatient(String),

    #[error("Storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not render prescription: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl ClinicError {
    pub fn usage(message: impl Into<String>) -> Self {
        ClinicError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ClinicError>;
