use crate::{Query, Result, TransportError};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A minimal blocking REST client for FortiGate API endpoints.
pub trait ApiClient {
    /// Fetch one endpoint (e.g. "api/v2/cmdb/extender-controller/extender") and
    /// return the decoded JSON document.
    fn get_json(&self, path: &str, query: &Query) -> Result<Value>;

    /// Fetch one endpoint and decode it into a caller-supplied shape.
    fn get<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T>
    where
        Self: Sized,
    {
        let value = self.get_json(path, query)?;
        serde_json::from_value(value).map_err(|e| TransportError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<A: ApiClient + ?Sized> ApiClient for &A {
    fn get_json(&self, path: &str, query: &Query) -> Result<Value> {
        (**self).get_json(path, query)
    }
}
