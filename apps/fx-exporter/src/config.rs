use anyhow::{bail, Context};
use extender_probe::Sentinels;
use forti_transport::ApiTarget;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Base URL of the FortiGate, e.g. `https://192.0.2.1:8443`.
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Environment variable holding the API token; used when `token` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
    #[serde(default)]
    pub insecure_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_vdom")]
    pub vdom: String,
    #[serde(default)]
    pub sentinels: SentinelConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentinelConfig {
    #[serde(default = "default_connected")]
    pub modem_connected: String,
    #[serde(default = "default_sim_enabled")]
    pub sim_enabled: String,
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_interval_secs() -> u64 {
    60
}
fn default_namespace() -> String {
    "fortigate".to_string()
}
fn default_vdom() -> String {
    "*".to_string()
}
fn default_connected() -> String {
    Sentinels::default().modem_connected
}
fn default_sim_enabled() -> String {
    Sentinels::default().sim_enabled
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            modem_connected: default_connected(),
            sim_enabled: default_sim_enabled(),
        }
    }
}

impl From<&SentinelConfig> for Sentinels {
    fn from(c: &SentinelConfig) -> Self {
        Sentinels {
            modem_connected: c.modem_connected.clone(),
            sim_enabled: c.sim_enabled.clone(),
        }
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            token: None,
            token_env: None,
            insecure_tls: false,
            timeout_secs: default_timeout_secs(),
            interval_secs: default_interval_secs(),
            namespace: default_namespace(),
            vdom: default_vdom(),
            sentinels: SentinelConfig::default(),
        }
    }
}

impl ExporterConfig {
    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg: ExporterConfig = serde_yaml::from_str(raw).context("decoding exporter config")?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.target.is_empty() {
            bail!("no target configured (set `target` or pass --target)");
        }
        if self.interval_secs == 0 {
            bail!("interval_secs must be positive");
        }
        self.validate_namespace()
    }

    /// The namespace prefixes every metric name, so it must itself be a valid name.
    pub fn validate_namespace(&self) -> anyhow::Result<()> {
        let mut chars = self.namespace.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if !valid {
            bail!("namespace must match [A-Za-z_][A-Za-z0-9_]*: {}", self.namespace);
        }
        Ok(())
    }

    /// The API token, from `token` or the `token_env` variable.
    pub fn resolve_token(&self) -> anyhow::Result<Option<String>> {
        if let Some(t) = &self.token {
            return Ok(Some(t.clone()));
        }
        match &self.token_env {
            Some(var) => {
                let t = std::env::var(var).with_context(|| format!("reading token from ${var}"))?;
                Ok(Some(t))
            }
            None => Ok(None),
        }
    }

    pub fn api_target(&self) -> anyhow::Result<ApiTarget> {
        let mut target = ApiTarget::new(self.target.clone());
        target.token = self.resolve_token()?;
        target.insecure_tls = self.insecure_tls;
        target.timeout = Duration::from_secs(self.timeout_secs);
        Ok(target)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Copy with the inline token masked, for display.
    pub fn redacted(&self) -> Self {
        let mut c = self.clone();
        if c.token.is_some() {
            c.token = Some("<redacted>".to_string());
        }
        c
    }
}

pub fn load_config_file(path: impl AsRef<Path>) -> anyhow::Result<ExporterConfig> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading config: {}", path.display()))?;
    ExporterConfig::from_yaml(&raw).with_context(|| format!("parsing config: {}", path.display()))
}
