use crate::{ApiClient, Query, Result, TransportError};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// One request seen by [`MockApi`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
}

/// An in-process API that answers from prepared JSON documents.
///
/// Responses are keyed by path; a response registered for an exact
/// `(path, query)` pair wins over the path-wide one.
#[derive(Debug, Default)]
pub struct MockApi {
    by_path: HashMap<String, Value>,
    by_query: HashMap<(String, String), Value>,
    failures: Vec<(String, Option<String>)>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for every request to `path`.
    pub fn prepare(&mut self, path: &str, body: &str) -> Result<()> {
        let value = parse_body(path, body)?;
        self.by_path.insert(path.to_string(), value);
        Ok(())
    }

    /// Serve `body` only for requests to `path` carrying exactly `query`.
    pub fn prepare_query(&mut self, path: &str, query: &Query, body: &str) -> Result<()> {
        let value = parse_body(path, body)?;
        self.by_query
            .insert((path.to_string(), query.to_string()), value);
        Ok(())
    }

    /// Make every request to `path` fail.
    pub fn fail(&mut self, path: &str) {
        self.failures.push((path.to_string(), None));
    }

    /// Make requests to `path` with exactly `query` fail.
    pub fn fail_query(&mut self, path: &str, query: &Query) {
        self.failures
            .push((path.to_string(), Some(query.to_string())));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }
}

impl ApiClient for MockApi {
    fn get_json(&self, path: &str, query: &Query) -> Result<Value> {
        let query_str = query.to_string();
        self.requests.borrow_mut().push(RecordedRequest {
            path: path.to_string(),
            query: query_str.clone(),
        });

        let failing = self.failures.iter().any(|(p, q)| {
            p == path && q.as_deref().map_or(true, |q| q == query_str)
        });
        if failing {
            tracing::debug!(path, query = %query_str, "mock failure injected");
            return Err(TransportError::Http {
                path: path.to_string(),
                reason: "injected failure".to_string(),
            });
        }

        if let Some(v) = self.by_query.get(&(path.to_string(), query_str)) {
            return Ok(v.clone());
        }
        self.by_path
            .get(path)
            .cloned()
            .ok_or_else(|| TransportError::NotPrepared(path.to_string()))
    }
}

fn parse_body(path: &str, body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| TransportError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
