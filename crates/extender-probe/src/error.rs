use forti_transport::TransportError;
use thiserror::Error;

pub type Result<T, E = ProbeError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// The API could not be reached or answered garbage; the whole cycle is void.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    /// One raw record lacked its identity; only that record is dropped.
    #[error("malformed entity: {0}")]
    MalformedEntity(String),
    #[error("invalid slot pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("metrics error: {0}")]
    Metrics(String),
}

impl From<prometheus::Error> for ProbeError {
    fn from(e: prometheus::Error) -> Self {
        ProbeError::Metrics(e.to_string())
    }
}
