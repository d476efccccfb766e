use core::fmt;
use std::time::Duration;

/// Query string parameters, kept in insertion order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `vdom=<scope>`; FortiOS accepts `*` to span every virtual domain.
    pub fn vdom(scope: &str) -> Self {
        Self::new().with("vdom", scope)
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

/// Connection parameters for one FortiGate.
#[derive(Clone, Debug)]
pub struct ApiTarget {
    /// Base URL such as `https://fw.example.net:8443`.
    pub base_url: String,
    /// REST API token sent as a bearer credential.
    pub token: Option<String>,
    /// Accept self-signed certificates (common on appliances).
    pub insecure_tls: bool,
    pub timeout: Duration,
}

impl ApiTarget {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            insecure_tls: false,
            timeout: Duration::from_secs(10),
        }
    }

    /// Join an API path (`api/v2/...`) onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
