use crate::{ApiClient, ApiTarget, Query, Result, TransportError};
use reqwest::blocking::Client;
use serde_json::Value;

/// FortiOS REST API over HTTPS with token authentication.
pub struct HttpApi {
    target: ApiTarget,
    client: Client,
}

impl HttpApi {
    pub fn open(target: ApiTarget) -> Result<Self> {
        if !target.base_url.starts_with("http://") && !target.base_url.starts_with("https://") {
            return Err(TransportError::InvalidTarget(format!(
                "expected http(s) URL, got {}",
                target.base_url
            )));
        }
        let client = Client::builder()
            .timeout(target.timeout)
            .danger_accept_invalid_certs(target.insecure_tls)
            .build()
            .map_err(|e| TransportError::InvalidTarget(e.to_string()))?;
        Ok(Self { target, client })
    }
}

impl ApiClient for HttpApi {
    fn get_json(&self, path: &str, query: &Query) -> Result<Value> {
        let url = self.target.url_for(path);
        tracing::debug!(%url, query = %query, "GET");

        let mut req = self.client.get(&url).query(query.pairs());
        if let Some(token) = &self.target.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().map_err(|e| TransportError::Http {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        resp.json::<Value>().map_err(|e| TransportError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_targets() {
        let res = HttpApi::open(ApiTarget::new("fw.local"));
        assert!(matches!(res, Err(TransportError::InvalidTarget(_))));
    }

    #[test]
    fn accepts_https_target() {
        let mut target = ApiTarget::new("https://192.0.2.1");
        target.insecure_tls = true;
        let api = HttpApi::open(target);
        assert!(api.is_ok());
    }
}
