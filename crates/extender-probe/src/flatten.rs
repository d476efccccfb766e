use crate::catalogue::{Catalogue, MetricDesc};
use crate::{Extender, Inventory, Modem, Sim};

/// One labeled sample, borrowing its descriptor from the [`Catalogue`].
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<'a> {
    pub desc: &'a MetricDesc,
    /// Values matching `desc.labels` position by position.
    pub label_values: Vec<String>,
    pub value: f64,
}

impl<'a> Observation<'a> {
    pub fn new(desc: &'a MetricDesc, label_values: Vec<String>, value: f64) -> Self {
        debug_assert_eq!(desc.labels.len(), label_values.len(), "{}", desc.name);
        Self {
            desc,
            label_values,
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.desc
            .labels
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.desc
            .labels
            .iter()
            .copied()
            .zip(self.label_values.iter().map(String::as_str))
    }
}

/// Numeric readings the modem reports as strings ("-8.7", "N/A", "").
///
/// Out-of-range literals such as `1e400` are rejected; only an explicit `inf` reads as infinite.
pub fn parse_reading(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_infinite() && !is_inf_literal(s) {
        return None;
    }
    Some(v)
}

fn is_inf_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn flag(value: &str, sentinel: &str) -> f64 {
    if value == sentinel {
        1.0
    } else {
        0.0
    }
}

/// Flatten an inventory into observations.
///
/// The set of emitted facts is deterministic; order follows scopes, then extenders in
/// collection order, with modems and sims in slot-name order.
pub fn flatten<'a>(inventory: &Inventory, cat: &'a Catalogue) -> Vec<Observation<'a>> {
    let mut out = Vec::new();
    for scope in &inventory.scopes {
        let exists = if scope.has_extenders() { 1.0 } else { 0.0 };
        out.push(Observation::new(&cat.exists, vec![scope.vdom.clone()], exists));
    }
    for ext in &inventory.extenders {
        flatten_extender(ext, cat, &mut out);
    }
    out
}

fn flatten_extender<'a>(ext: &Extender, cat: &'a Catalogue, out: &mut Vec<Observation<'a>>) {
    let base = vec![ext.vdom.clone(), ext.name.clone()];
    out.push(Observation::new(
        &cat.info,
        vec![
            ext.vdom.clone(),
            ext.name.clone(),
            ext.system.software_version.clone(),
            ext.system.hardware_version.clone(),
        ],
        1.0,
    ));
    out.push(Observation::new(&cat.cpu, base.clone(), ext.system.cpu));
    out.push(Observation::new(&cat.memory, base, ext.system.memory));

    for (slot, modem) in &ext.modems {
        flatten_modem(ext, slot, modem, cat, out);
    }
}

fn flatten_modem<'a>(
    ext: &Extender,
    slot: &str,
    modem: &Modem,
    cat: &'a Catalogue,
    out: &mut Vec<Observation<'a>>,
) {
    let labels = vec![ext.vdom.clone(), ext.name.clone(), slot.to_string()];
    out.push(Observation::new(
        &cat.modem_info,
        vec![
            ext.vdom.clone(),
            ext.name.clone(),
            slot.to_string(),
            modem.data_plan.clone(),
            modem.manufacturer.clone(),
            modem.product.clone(),
            modem.model.clone(),
            modem.service.clone(),
            modem.esn_imei.clone(),
            modem.band.clone(),
            modem.modem_type.clone(),
            modem.wireless_operator.clone(),
            modem.lte_physical_cellid.clone(),
        ],
        1.0,
    ));

    let readings: [(&MetricDesc, &str); 5] = [
        (&cat.signal_rsrq, modem.signal_rsrq.as_str()),
        (&cat.signal_rsrp, modem.signal_rsrp.as_str()),
        (&cat.lte_sinr, modem.lte_sinr.as_str()),
        (&cat.lte_rssi, modem.lte_rssi.as_str()),
        (&cat.signal_strength, modem.signal_strength.as_str()),
    ];
    for (desc, raw) in readings {
        if let Some(v) = parse_reading(raw) {
            out.push(Observation::new(desc, labels.clone(), v));
        }
    }

    out.push(Observation::new(
        &cat.connect_status,
        labels,
        flag(&modem.connect_status, &cat.sentinels.modem_connected),
    ));

    for (sim_slot, sim) in &modem.sims {
        flatten_sim(ext, slot, sim_slot, sim, cat, out);
    }
}

fn flatten_sim<'a>(
    ext: &Extender,
    modem_slot: &str,
    sim_slot: &str,
    sim: &Sim,
    cat: &'a Catalogue,
    out: &mut Vec<Observation<'a>>,
) {
    let labels = vec![
        ext.vdom.clone(),
        ext.name.clone(),
        modem_slot.to_string(),
        sim_slot.to_string(),
    ];
    out.push(Observation::new(
        &cat.sim_info,
        vec![
            ext.vdom.clone(),
            ext.name.clone(),
            modem_slot.to_string(),
            sim_slot.to_string(),
            sim.imsi.clone(),
            sim.iccid.clone(),
        ],
        1.0,
    ));
    out.push(Observation::new(&cat.sim_data_usage, labels.clone(), sim.data_usage));
    out.push(Observation::new(&cat.sim_active, labels.clone(), sim.is_active));
    out.push(Observation::new(
        &cat.sim_status,
        labels,
        flag(&sim.status, &cat.sentinels.sim_enabled),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScopeSummary, System};

    fn count(obs: &[Observation<'_>], desc: &MetricDesc) -> usize {
        obs.iter().filter(|o| o.desc == desc).count()
    }

    fn one_modem(modem: Modem) -> Inventory {
        let mut ext = Extender {
            name: "fx".into(),
            id: "fx".into(),
            vdom: "root".into(),
            system: System::default(),
            modems: Default::default(),
        };
        ext.modems.insert("modem1".into(), modem);
        Inventory {
            scopes: vec![],
            extenders: vec![ext],
            dropped: 0,
        }
    }

    #[test]
    fn parse_reading_accepts_numbers_only() {
        assert_eq!(parse_reading("-8.7"), Some(-8.7));
        assert_eq!(parse_reading("46"), Some(46.0));
        assert_eq!(parse_reading("N/A"), None);
        assert_eq!(parse_reading(""), None);
        assert_eq!(parse_reading("12 dB"), None);
    }

    #[test]
    fn out_of_range_reading_is_omitted() {
        assert_eq!(parse_reading("1e400"), None);
        assert_eq!(parse_reading("-1e400"), None);
        assert_eq!(parse_reading("+Inf"), Some(f64::INFINITY));
        assert_eq!(parse_reading("-infinity"), Some(f64::NEG_INFINITY));

        let cat = Catalogue::default();
        let modem = Modem {
            lte_rssi: "1e400".into(),
            lte_sinr: "13".into(),
            ..Default::default()
        };
        let obs = flatten(&one_modem(modem), &cat);
        assert_eq!(count(&obs, &cat.lte_rssi), 0);
        assert_eq!(count(&obs, &cat.lte_sinr), 1);
    }

    #[test]
    fn existence_is_emitted_for_every_scope() {
        let cat = Catalogue::default();
        let inv = Inventory {
            scopes: vec![
                ScopeSummary {
                    vdom: "root".into(),
                    listed: 1,
                    extender_ids: vec!["a".into()],
                },
                ScopeSummary {
                    vdom: "empty".into(),
                    listed: 0,
                    extender_ids: vec![],
                },
            ],
            extenders: vec![],
            dropped: 0,
        };
        let obs = flatten(&inv, &cat);
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].label("vdom"), Some("root"));
        assert_eq!(obs[0].value, 1.0);
        assert_eq!(obs[1].label("vdom"), Some("empty"));
        assert_eq!(obs[1].value, 0.0);
    }

    #[test]
    fn unparseable_reading_is_omitted_alone() {
        let cat = Catalogue::default();
        let modem = Modem {
            signal_rsrq: "N/A".into(),
            signal_rsrp: "-100".into(),
            lte_sinr: "13".into(),
            lte_rssi: "-77".into(),
            signal_strength: "46".into(),
            ..Default::default()
        };
        let obs = flatten(&one_modem(modem), &cat);
        assert_eq!(count(&obs, &cat.signal_rsrq), 0);
        assert_eq!(count(&obs, &cat.signal_rsrp), 1);
        assert_eq!(count(&obs, &cat.lte_sinr), 1);
        assert_eq!(count(&obs, &cat.lte_rssi), 1);
        assert_eq!(count(&obs, &cat.signal_strength), 1);
        assert_eq!(count(&obs, &cat.modem_info), 1);
        assert_eq!(count(&obs, &cat.connect_status), 1);
    }

    #[test]
    fn connect_status_requires_exact_sentinel() {
        let cat = Catalogue::default();
        for (status, expected) in [
            ("CONN_STATE_CONNECTED", 1.0),
            ("conn_state_connected", 0.0),
            ("CONN_STATE_DISCONNECTED", 0.0),
            ("", 0.0),
        ] {
            let modem = Modem {
                connect_status: status.into(),
                ..Default::default()
            };
            let obs = flatten(&one_modem(modem), &cat);
            let cs: Vec<_> = obs.iter().filter(|o| o.desc == &cat.connect_status).collect();
            assert_eq!(cs.len(), 1, "{status}");
            assert_eq!(cs[0].value, expected, "{status}");
        }
    }

    #[test]
    fn sim_gauges_are_always_emitted() {
        let cat = Catalogue::default();
        let mut modem = Modem::default();
        modem.sims.insert(
            "sim1".into(),
            Sim {
                status: "enable".into(),
                is_active: 1.0,
                data_usage: 436.0,
                imsi: "210094716949637".into(),
                iccid: "89460860027131513443".into(),
                ..Default::default()
            },
        );
        modem.sims.insert(
            "sim2".into(),
            Sim {
                status: "Enable".into(),
                ..Default::default()
            },
        );
        let obs = flatten(&one_modem(modem), &cat);
        let status: Vec<(Option<&str>, f64)> = obs
            .iter()
            .filter(|o| o.desc == &cat.sim_status)
            .map(|o| (o.label("sim"), o.value))
            .collect();
        assert_eq!(status, vec![(Some("sim1"), 1.0), (Some("sim2"), 0.0)]);
        assert_eq!(count(&obs, &cat.sim_data_usage), 2);
        assert_eq!(count(&obs, &cat.sim_active), 2);

        let info = obs.iter().find(|o| o.desc == &cat.sim_info).unwrap();
        assert_eq!(info.label("ismi"), Some("210094716949637"));
        assert_eq!(info.label("iccid"), Some("89460860027131513443"));
        assert_eq!(info.label("modem"), Some("modem1"));
    }

    #[test]
    fn custom_sentinels_are_honoured() {
        let cat = Catalogue::default().with_sentinels(crate::catalogue::Sentinels {
            modem_connected: "up".into(),
            sim_enabled: "on".into(),
        });
        let modem = Modem {
            connect_status: "up".into(),
            ..Default::default()
        };
        let obs = flatten(&one_modem(modem), &cat);
        let cs = obs.iter().find(|o| o.desc == &cat.connect_status).unwrap();
        assert_eq!(cs.value, 1.0);
    }

    #[test]
    fn labels_pair_names_with_values() {
        let cat = Catalogue::default();
        let obs = flatten(&one_modem(Modem::default()), &cat);
        let cpu = obs.iter().find(|o| o.desc == &cat.cpu).unwrap();
        let labels: Vec<_> = cpu.labels().collect();
        assert_eq!(labels, vec![("vdom", "root"), ("extender_name", "fx")]);
    }
}
