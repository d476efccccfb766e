//! Metric descriptors emitted by the extender probe.
//!
//! The catalogue is plain data: it is built once at startup (optionally with a custom
//! namespace) and handed to the flattener by reference.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricKind {
    Gauge,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: String,
    pub help: &'static str,
    pub kind: MetricKind,
    /// Label names, in the order observation values are given.
    pub labels: &'static [&'static str],
}

impl MetricDesc {
    fn gauge(namespace: &str, suffix: &str, help: &'static str, labels: &'static [&'static str]) -> Self {
        Self {
            name: format!("{namespace}_{suffix}"),
            help,
            kind: MetricKind::Gauge,
            labels,
        }
    }
}

/// String values that map to 1 in boolean gauges; anything else maps to 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sentinels {
    pub modem_connected: String,
    pub sim_enabled: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            modem_connected: "CONN_STATE_CONNECTED".to_string(),
            sim_enabled: "enable".to_string(),
        }
    }
}

const EXTENDER: &[&str] = &["vdom", "extender_name"];
const MODEM: &[&str] = &["vdom", "extender_name", "modem"];
const SIM: &[&str] = &["vdom", "extender_name", "modem", "sim"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalogue {
    pub exists: MetricDesc,
    pub info: MetricDesc,
    pub cpu: MetricDesc,
    pub memory: MetricDesc,
    pub modem_info: MetricDesc,
    pub signal_rsrq: MetricDesc,
    pub signal_rsrp: MetricDesc,
    pub lte_sinr: MetricDesc,
    pub lte_rssi: MetricDesc,
    pub signal_strength: MetricDesc,
    pub connect_status: MetricDesc,
    pub sim_info: MetricDesc,
    pub sim_data_usage: MetricDesc,
    pub sim_active: MetricDesc,
    pub sim_status: MetricDesc,
    pub sentinels: Sentinels,
}

impl Catalogue {
    pub fn new(namespace: &str) -> Self {
        let ns = namespace;
        Self {
            exists: MetricDesc::gauge(
                ns,
                "extender_exists",
                "Information if extender exists or not 1=exists 0=do not exists",
                &["vdom"],
            ),
            info: MetricDesc::gauge(
                ns,
                "extender_info",
                "Infos about a extender",
                &["vdom", "extender_name", "software_version", "hardware_version"],
            ),
            cpu: MetricDesc::gauge(ns, "extender_cpu", "Cpu utilization", EXTENDER),
            memory: MetricDesc::gauge(ns, "extender_memory", "Memory utilization", EXTENDER),
            modem_info: MetricDesc::gauge(
                ns,
                "extender_modem_info",
                "Info about the modem",
                &[
                    "vdom",
                    "extender_name",
                    "modem",
                    "data_plan",
                    "manufacturer",
                    "product",
                    "model",
                    "service",
                    "esn_imei",
                    "band",
                    "modem_type",
                    "wireless_operator",
                    "lte_physical_cellid",
                ],
            ),
            // Name kept as published by earlier exporter releases.
            signal_rsrq: MetricDesc::gauge(
                ns,
                "extender_signal_rssq",
                "Reference Signal Received Quality",
                MODEM,
            ),
            signal_rsrp: MetricDesc::gauge(
                ns,
                "extender_signal_rsrp",
                "Reference Signal Received Power",
                MODEM,
            ),
            lte_sinr: MetricDesc::gauge(ns, "extender_lte_sinr", "LTE sinr", MODEM),
            lte_rssi: MetricDesc::gauge(ns, "extender_lte_rssi", "LTE rssi", MODEM),
            signal_strength: MetricDesc::gauge(
                ns,
                "extender_signal_strength",
                "Signal strength",
                MODEM,
            ),
            connect_status: MetricDesc::gauge(
                ns,
                "extender_connect_status",
                "Connect status 1=up 0=N/A",
                MODEM,
            ),
            sim_info: MetricDesc::gauge(
                ns,
                "extender_sim_info",
                "Infos about the extender modem sim card",
                &["vdom", "extender_name", "modem", "sim", "ismi", "iccid"],
            ),
            sim_data_usage: MetricDesc::gauge(
                ns,
                "extender_sim_data_usage",
                "Sim card data usage",
                SIM,
            ),
            sim_active: MetricDesc::gauge(ns, "extender_sim_active", "Sim card active", SIM),
            sim_status: MetricDesc::gauge(ns, "extender_sim_status", "Sim card status", SIM),
            sentinels: Sentinels::default(),
        }
    }

    pub fn with_sentinels(mut self, sentinels: Sentinels) -> Self {
        self.sentinels = sentinels;
        self
    }

    pub fn all(&self) -> [&MetricDesc; 15] {
        [
            &self.exists,
            &self.info,
            &self.cpu,
            &self.memory,
            &self.modem_info,
            &self.signal_rsrq,
            &self.signal_rsrp,
            &self.lte_sinr,
            &self.lte_rssi,
            &self.signal_strength,
            &self.connect_status,
            &self.sim_info,
            &self.sim_data_usage,
            &self.sim_active,
            &self.sim_status,
        ]
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::new("fortigate")
    }
}
