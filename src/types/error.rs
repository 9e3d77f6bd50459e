use thiserror::Error;

/// tokreport error types
#[derive(Error, Debug)]
pub enum TokreportError {
    /// Failed to parse JSON/JSONL
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Pricing table missing or invalid
    #[error("pricing error: {0}")]
    Pricing(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Usage endpoint unreachable or returned a failure
    #[error("fetch error: {0}")]
    Fetch(String),
}

impl TokreportError {
    /// Process exit status for this error.
    ///
    /// Configuration problems (including pricing) exit with 2, remote fetch
    /// failures with 3, anything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Pricing(_) => 2,
            Self::Fetch(_) => 3,
            Self::Parse(_) | Self::Io(_) => 1,
        }
    }
}

/// Result type alias for tokreport
pub type Result<T> = std::result::Result<T, TokreportError>;
