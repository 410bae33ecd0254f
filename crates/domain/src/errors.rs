use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Connection closed by {0}")]
    ConnectionClosed(String),

    #[error("Upstream client exhausted {attempts} attempts for {question}")]
    ClientExhausted { attempts: u32, question: String },

    #[error("DoH server {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("No known DNS-over-TLS address for {0}")]
    UnknownTlsServer(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// Whether an upstream client should spend another attempt after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::Transport(_)
                | DomainError::ConnectionClosed(_)
                | DomainError::MalformedMessage(_)
                | DomainError::IoError(_)
        )
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::IoError(err.to_string())
    }
}
