use crate::catalogue::MetricKind;
use crate::{Observation, ProbeError, Result};
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;

/// Receiver of flattened observations.
pub trait MetricSink {
    fn emit(&mut self, obs: &Observation<'_>) -> Result<()>;
}

/// A sample copied out of an [`Observation`], mostly for tests and dry runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

impl Sample {
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Keeps every emitted observation in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub samples: Vec<Sample>,
}

impl MemorySink {
    pub fn named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Sample> + 's {
        self.samples.iter().filter(move |s| s.name == name)
    }
}

impl MetricSink for MemorySink {
    fn emit(&mut self, obs: &Observation<'_>) -> Result<()> {
        self.samples.push(Sample {
            name: obs.name().to_string(),
            labels: obs
                .labels()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            value: obs.value,
        });
        Ok(())
    }
}

/// Collector health gauges, set once per cycle.
#[derive(Clone)]
pub struct ProbeMetrics {
    pub success: Gauge,
    pub duration_seconds: Gauge,
    pub dropped_records: Gauge,
}

impl ProbeMetrics {
    fn register(registry: &Registry, namespace: &str) -> Result<Self> {
        let success = Gauge::new(
            format!("{namespace}_probe_success"),
            "Whether the last extender probe succeeded 1=ok 0=failed",
        )?;
        let duration_seconds = Gauge::new(
            format!("{namespace}_probe_duration_seconds"),
            "How long the last extender probe took",
        )?;
        let dropped_records = Gauge::new(
            format!("{namespace}_probe_dropped_records"),
            "Extender records dropped for missing name or id",
        )?;
        registry.register(Box::new(success.clone()))?;
        registry.register(Box::new(duration_seconds.clone()))?;
        registry.register(Box::new(dropped_records.clone()))?;
        Ok(Self {
            success,
            duration_seconds,
            dropped_records,
        })
    }
}

/// Prometheus registry for one poll cycle; gauge families are created on first use.
pub struct PrometheusSink {
    registry: Registry,
    families: HashMap<String, GaugeVec>,
    pub probe: ProbeMetrics,
}

impl PrometheusSink {
    pub fn new(namespace: &str) -> Result<Self> {
        let registry = Registry::new();
        let probe = ProbeMetrics::register(&registry, namespace)?;
        Ok(Self {
            registry,
            families: HashMap::new(),
            probe,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn family(&mut self, obs: &Observation<'_>) -> Result<&GaugeVec> {
        let desc = obs.desc;
        if !self.families.contains_key(&desc.name) {
            let vec = match desc.kind {
                MetricKind::Gauge => GaugeVec::new(Opts::new(desc.name.clone(), desc.help), desc.labels)?,
            };
            self.registry.register(Box::new(vec.clone()))?;
            self.families.insert(desc.name.clone(), vec);
        }
        self.families
            .get(&desc.name)
            .ok_or_else(|| ProbeError::Metrics(format!("family {} vanished", desc.name)))
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn encode_text(&self) -> Result<String> {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        encoder.encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| ProbeError::Metrics(e.to_string()))
    }
}

impl MetricSink for PrometheusSink {
    fn emit(&mut self, obs: &Observation<'_>) -> Result<()> {
        let values: Vec<&str> = obs.label_values.iter().map(String::as_str).collect();
        let value = obs.value;
        let family = self.family(obs)?;
        family.get_metric_with_label_values(&values)?.set(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Catalogue;

    #[test]
    fn prometheus_sink_renders_text() {
        let cat = Catalogue::default();
        let mut sink = PrometheusSink::new("fortigate").unwrap();
        let obs = Observation::new(&cat.cpu, vec!["root".into(), "fx1".into()], 12.0);
        sink.emit(&obs).unwrap();
        sink.probe.success.set(1.0);
        let text = sink.encode_text().unwrap();
        assert!(text.contains("# TYPE fortigate_extender_cpu gauge"));
        let line = text
            .lines()
            .find(|l| l.starts_with("fortigate_extender_cpu{"))
            .unwrap();
        assert!(line.contains(r#"extender_name="fx1""#));
        assert!(line.contains(r#"vdom="root""#));
        assert!(line.ends_with(" 12"));
        assert!(text.contains("fortigate_probe_success 1"));
    }

    #[test]
    fn repeated_family_is_registered_once() {
        let cat = Catalogue::default();
        let mut sink = PrometheusSink::new("fortigate").unwrap();
        for sim in ["sim1", "sim2"] {
            let obs = Observation::new(
                &cat.sim_active,
                vec!["root".into(), "fx".into(), "modem1".into(), sim.into()],
                1.0,
            );
            sink.emit(&obs).unwrap();
        }
        let families = sink.registry().gather();
        let active = families
            .iter()
            .find(|f| f.get_name() == "fortigate_extender_sim_active")
            .unwrap();
        assert_eq!(active.get_metric().len(), 2);
    }

    #[test]
    fn memory_sink_keeps_labels() {
        let cat = Catalogue::default();
        let mut sink = MemorySink::default();
        let obs = Observation::new(&cat.exists, vec!["root".into()], 1.0);
        sink.emit(&obs).unwrap();
        let s = sink.named("fortigate_extender_exists").next().unwrap();
        assert_eq!(s.label("vdom"), Some("root"));
        assert_eq!(s.value, 1.0);
    }
}
