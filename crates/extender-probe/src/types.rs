use crate::schema::{field, Field, Record};
use std::collections::BTreeMap;

/// One managed FortiExtender as reported by the monitor endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extender {
    pub name: String,
    pub id: String,
    /// Virtual domain the extender was enumerated under.
    pub vdom: String,
    pub system: System,
    /// Keyed by the slot name from the payload (`modem1`, `modem2`, ...).
    pub modems: BTreeMap<String, Modem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct System {
    pub cpu: f64,
    pub memory: f64,
    pub ip: String,
    pub software_version: String,
    pub hardware_version: String,
    pub mac: String,
    pub netmask: String,
    pub gateway: String,
    pub addr_type: String,
    pub fgt_ip: String,
    pub gps_lat: String,
    pub gps_long: String,
}

impl Record for System {
    const FIELDS: &'static [Field<Self>] = &[
        field!(System, cpu: number),
        field!(System, memory: number),
        field!(System, ip: text),
        field!(System, software_version: text),
        field!(System, hardware_version: text),
        field!(System, mac: text),
        field!(System, netmask: text),
        field!(System, gateway: text),
        field!(System, addr_type: text),
        field!(System, fgt_ip: text),
        field!(System, gps_lat: text),
        field!(System, gps_long: text),
    ];
}

/// A cellular modem. Signal readings arrive as strings and may hold "N/A".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modem {
    pub data_plan: String,
    pub physical_port: String,
    pub manufacturer: String,
    pub product: String,
    pub model: String,
    pub revision: String,
    pub imsi: String,
    pub pin_status: String,
    pub service: String,
    pub signal_strength: String,
    pub rssi: String,
    pub connect_status: String,
    pub esn_imei: String,
    pub activation_status: String,
    pub roaming_status: String,
    pub usim_status: String,
    pub oma_dm_version: String,
    pub plmn: String,
    pub band: String,
    pub signal_rsrq: String,
    pub signal_rsrp: String,
    pub lte_sinr: String,
    pub lte_rssi: String,
    pub lte_rs_throughput: String,
    pub lte_ts_throughput: String,
    pub lte_physical_cellid: String,
    pub modem_type: String,
    pub drc_cdma_evdo: String,
    pub current_snr: String,
    pub wireless_operator: String,
    pub operating_mode: String,
    pub wireless_signal: String,
    pub usb_wan_mac: String,
    pub cdma_profile: Option<CdmaProfile>,
    /// Keyed by slot name (`sim1`, `sim2`, ...).
    pub sims: BTreeMap<String, Sim>,
}

impl Record for Modem {
    const FIELDS: &'static [Field<Self>] = &[
        field!(Modem, data_plan: text),
        field!(Modem, physical_port: text),
        field!(Modem, manufacturer: text),
        field!(Modem, product: text),
        field!(Modem, model: text),
        field!(Modem, revision: text),
        field!(Modem, imsi: text),
        field!(Modem, pin_status: text),
        field!(Modem, service: text),
        field!(Modem, signal_strength: text),
        field!(Modem, rssi: text),
        field!(Modem, connect_status: text),
        field!(Modem, esn_imei: text),
        field!(Modem, activation_status: text),
        field!(Modem, roaming_status: text),
        field!(Modem, usim_status: text),
        field!(Modem, oma_dm_version: text),
        field!(Modem, plmn: text),
        field!(Modem, band: text),
        field!(Modem, signal_rsrq: text),
        field!(Modem, signal_rsrp: text),
        field!(Modem, lte_sinr: text),
        field!(Modem, lte_rssi: text),
        field!(Modem, lte_rs_throughput: text),
        field!(Modem, lte_ts_throughput: text),
        field!(Modem, lte_physical_cellid: text),
        field!(Modem, modem_type: text),
        field!(Modem, drc_cdma_evdo: text),
        field!(Modem, current_snr: text),
        field!(Modem, wireless_operator: text),
        field!(Modem, operating_mode: text),
        field!(Modem, wireless_signal: text),
        field!(Modem, usb_wan_mac: text),
    ];
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CdmaProfile {
    pub nai: String,
    pub idx: String,
    pub status: String,
    pub home_addr: String,
    pub primary_ha: String,
    pub secondary_ha: String,
    pub aaa_spi: String,
    pub ha_spi: String,
}

impl Record for CdmaProfile {
    const FIELDS: &'static [Field<Self>] = &[
        field!(CdmaProfile, nai: text = "NAI"),
        field!(CdmaProfile, idx: text),
        field!(CdmaProfile, status: text),
        field!(CdmaProfile, home_addr: text),
        field!(CdmaProfile, primary_ha: text),
        field!(CdmaProfile, secondary_ha: text),
        field!(CdmaProfile, aaa_spi: text),
        field!(CdmaProfile, ha_spi: text),
    ];
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sim {
    pub carrier: String,
    pub phone_number: String,
    pub status: String,
    pub is_active: f64,
    pub imsi: String,
    pub iccid: String,
    pub maximum_allowed_data: f64,
    pub overage_allowed: String,
    pub next_billing_date: String,
    pub data_usage: f64,
    pub slot: f64,
    pub modem: f64,
}

impl Record for Sim {
    const FIELDS: &'static [Field<Self>] = &[
        field!(Sim, carrier: text),
        field!(Sim, phone_number: text),
        field!(Sim, status: text),
        field!(Sim, is_active: number),
        field!(Sim, imsi: text),
        field!(Sim, iccid: text),
        field!(Sim, maximum_allowed_data: number),
        field!(Sim, overage_allowed: text),
        field!(Sim, next_billing_date: text),
        field!(Sim, data_usage: number),
        field!(Sim, slot: number),
        field!(Sim, modem: number),
    ];
}

/// Existence summary of one virtual domain from the enumeration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSummary {
    pub vdom: String,
    /// Entries listed under the vdom, including any without a usable id.
    pub listed: usize,
    pub extender_ids: Vec<String>,
}

impl ScopeSummary {
    pub fn has_extenders(&self) -> bool {
        self.listed > 0
    }
}

/// Everything gathered in one poll cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub scopes: Vec<ScopeSummary>,
    pub extenders: Vec<Extender>,
    /// Raw records dropped for lacking `name`/`id`.
    pub dropped: usize,
}
