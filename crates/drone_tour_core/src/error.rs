use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("Cannot construct MST: only {connected} of {total} sites reachable across campus borders")]
    DisconnectedGraph { connected: usize, total: usize },
    /// Usage text requested with `-h/--help`. Not a failure.
    #[error("{0}")]
    Help(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help(_))
    }
}
