use thiserror::Error;

pub type Result<T, E = TransportError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("HTTP request to {path} failed: {reason}")]
    Http { path: String, reason: String },
    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("decoding response from {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("no response prepared for {0}")]
    NotPrepared(String),
}
