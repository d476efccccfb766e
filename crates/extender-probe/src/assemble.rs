use crate::discover::SlotPatterns;
use crate::schema::{decode, decode_value};
use crate::{CdmaProfile, Extender, Modem, ProbeError, Result, Sim, System};
use serde_json::{Map, Value};

/// Build an [`Extender`] from one raw monitor record.
///
/// `name` and `id` must be strings; otherwise the record is rejected with
/// [`ProbeError::MalformedEntity`]. Every other field is best effort: a missing or
/// mistyped `system` yields a zeroed [`System`].
pub fn assemble_extender(
    raw: &Map<String, Value>,
    vdom: &str,
    patterns: &SlotPatterns,
) -> Result<Extender> {
    let name = required_str(raw, "name")?;
    let id = required_str(raw, "id")?;
    let system: System = decode_value(raw.get("system"));

    let mut extender = Extender {
        name: name.to_string(),
        id: id.to_string(),
        vdom: vdom.to_string(),
        system,
        modems: Default::default(),
    };

    for (slot, modem_raw) in patterns.modem.discover(raw) {
        let modem = assemble_modem(modem_raw, patterns);
        extender.modems.insert(slot.to_string(), modem);
    }
    Ok(extender)
}

fn assemble_modem(raw: &Map<String, Value>, patterns: &SlotPatterns) -> Modem {
    let mut modem: Modem = decode(raw);
    modem.cdma_profile = raw
        .get("cdma_profile")
        .and_then(Value::as_object)
        .map(decode::<CdmaProfile>);
    for (slot, sim_raw) in patterns.sim.discover(raw) {
        let sim: Sim = decode(sim_raw);
        modem.sims.insert(slot.to_string(), sim);
    }
    modem
}

fn required_str<'a>(raw: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    match raw.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(ProbeError::MalformedEntity(format!(
            "`{key}` is not a string: {other}"
        ))),
        None => Err(ProbeError::MalformedEntity(format!("`{key}` is missing"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    fn patterns() -> SlotPatterns {
        SlotPatterns::extender().unwrap()
    }

    #[test]
    fn assembles_nested_modems_and_sims() {
        let raw = record(json!({
            "name": "FX1",
            "id": "FX301E0000000001",
            "system": {"cpu": 4, "memory": 15, "software_version": "v4.2.2"},
            "modem1": {
                "connect_status": "CONN_STATE_CONNECTED",
                "signal_rsrp": "-100",
                "cdma_profile": {"NAI": "nai@example", "status": "off"},
                "sim1": {"imsi": "2100", "is_active": 1, "status": "enable"},
                "sim2": {"imsi": "N/A", "is_active": 0}
            },
            "modem2": {"connect_status": "CONN_STATE_DISCONNECTED"}
        }));
        let ext = assemble_extender(&raw, "root", &patterns()).unwrap();
        assert_eq!(ext.name, "FX1");
        assert_eq!(ext.id, "FX301E0000000001");
        assert_eq!(ext.vdom, "root");
        assert_eq!(ext.system.cpu, 4.0);
        assert_eq!(ext.system.software_version, "v4.2.2");
        assert_eq!(ext.modems.len(), 2);

        let m1 = &ext.modems["modem1"];
        assert_eq!(m1.signal_rsrp, "-100");
        assert_eq!(m1.sims.len(), 2);
        assert_eq!(m1.sims["sim1"].is_active, 1.0);
        assert_eq!(m1.sims["sim2"].imsi, "N/A");
        let cdma = m1.cdma_profile.as_ref().unwrap();
        assert_eq!(cdma.nai, "nai@example");

        let m2 = &ext.modems["modem2"];
        assert!(m2.sims.is_empty());
        assert!(m2.cdma_profile.is_none());
    }

    #[test]
    fn missing_identity_is_malformed() {
        let p = patterns();
        let no_name = record(json!({"id": "x", "system": {}}));
        assert!(matches!(
            assemble_extender(&no_name, "root", &p),
            Err(ProbeError::MalformedEntity(_))
        ));
        let numeric_id = record(json!({"name": "a", "id": 7}));
        assert!(matches!(
            assemble_extender(&numeric_id, "root", &p),
            Err(ProbeError::MalformedEntity(_))
        ));
    }

    #[test]
    fn missing_or_mistyped_system_is_zeroed() {
        let p = patterns();
        let raw = record(json!({"name": "a", "id": "b"}));
        assert_eq!(assemble_extender(&raw, "v", &p).unwrap().system, System::default());
        let raw = record(json!({"name": "a", "id": "b", "system": [1, 2]}));
        assert_eq!(assemble_extender(&raw, "v", &p).unwrap().system, System::default());
    }

    #[test]
    fn mistyped_scalar_fields_default() {
        let raw = record(json!({
            "name": "a",
            "id": "b",
            "system": {"cpu": "high", "memory": 12},
            "modem1": {"signal_rsrq": -8.7, "sim1": {"data_usage": "436"}}
        }));
        let ext = assemble_extender(&raw, "v", &patterns()).unwrap();
        assert_eq!(ext.system.cpu, 0.0);
        assert_eq!(ext.system.memory, 12.0);
        assert_eq!(ext.modems["modem1"].signal_rsrq, "");
        assert_eq!(ext.modems["modem1"].sims["sim1"].data_usage, 0.0);
    }

    #[test]
    fn non_object_modem_is_skipped() {
        let raw = record(json!({"name": "a", "id": "b", "modem1": "absent", "modem2": {}}));
        let ext = assemble_extender(&raw, "v", &patterns()).unwrap();
        assert_eq!(ext.modems.keys().collect::<Vec<_>>(), vec!["modem2"]);
    }
}
