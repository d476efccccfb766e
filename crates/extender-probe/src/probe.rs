use crate::aggregate::Aggregator;
use crate::catalogue::Catalogue;
use crate::discover::SlotPatterns;
use crate::flatten::flatten;
use crate::metrics::{MetricSink, PrometheusSink};
use crate::Result;
use forti_transport::ApiClient;
use std::time::{Duration, Instant};
use time::OffsetDateTime;

/// Summary of one successful poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    pub started_at: OffsetDateTime,
    pub duration: Duration,
    pub scopes: usize,
    pub extenders: usize,
    pub dropped: usize,
    pub observations: usize,
}

/// Polls the extender controller and emits the flattened observations.
pub struct ExtenderProbe {
    catalogue: Catalogue,
    patterns: SlotPatterns,
    vdom: String,
}

impl ExtenderProbe {
    pub fn new(catalogue: Catalogue) -> Result<Self> {
        Ok(Self {
            catalogue,
            patterns: SlotPatterns::extender()?,
            vdom: "*".to_string(),
        })
    }

    pub fn with_vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = vdom.into();
        self
    }

    /// Run one cycle.
    ///
    /// Nothing reaches `sink` unless every fetch succeeded, so a failed cycle never
    /// leaves a partial metric set behind.
    pub fn poll<A: ApiClient, S: MetricSink>(&self, api: &A, sink: &mut S) -> Result<PollReport> {
        let started_at = OffsetDateTime::now_utc();
        let start = Instant::now();

        let inventory = Aggregator::new(&self.patterns)
            .with_vdom(self.vdom.clone())
            .collect(api)?;
        let observations = flatten(&inventory, &self.catalogue);
        for obs in &observations {
            sink.emit(obs)?;
        }

        let report = PollReport {
            started_at,
            duration: start.elapsed(),
            scopes: inventory.scopes.len(),
            extenders: inventory.extenders.len(),
            dropped: inventory.dropped,
            observations: observations.len(),
        };
        tracing::info!(
            scopes = report.scopes,
            extenders = report.extenders,
            dropped = report.dropped,
            observations = report.observations,
            elapsed_ms = report.duration.as_millis() as u64,
            "extender poll complete"
        );
        Ok(report)
    }

    /// Run one cycle into a Prometheus registry and record the collector health gauges.
    pub fn poll_prometheus<A: ApiClient>(
        &self,
        api: &A,
        sink: &mut PrometheusSink,
    ) -> Result<PollReport> {
        let start = Instant::now();
        let outcome = self.poll(api, sink);
        match &outcome {
            Ok(report) => {
                sink.probe.success.set(1.0);
                sink.probe.duration_seconds.set(report.duration.as_secs_f64());
                sink.probe.dropped_records.set(report.dropped as f64);
            }
            Err(e) => {
                tracing::error!(error = %e, "extender poll failed");
                sink.probe.success.set(0.0);
                sink.probe.duration_seconds.set(start.elapsed().as_secs_f64());
            }
        }
        outcome
    }
}
