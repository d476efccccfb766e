//! extender-probe: FortiExtender telemetry as labeled gauge observations
//!
//! The extender controller answers with loosely typed JSON whose modems and SIM slots
//! appear as numbered keys (`modem1`, `sim2`) rather than arrays. This crate decodes
//! those payloads into typed records, tolerating missing or mistyped fields, and
//! flattens them into observations for a metrics sink.

mod error;
pub use error::{ProbeError, Result};

pub mod schema;

mod types;
pub use types::*;

pub mod discover;
pub use discover::{SlotPattern, SlotPatterns};

mod assemble;
pub use assemble::assemble_extender;

mod aggregate;
pub use aggregate::{Aggregator, CMDB_EXTENDER_PATH, MONITOR_EXTENDER_PATH};

pub mod catalogue;
pub use catalogue::{Catalogue, MetricDesc, MetricKind, Sentinels};

mod flatten;
pub use flatten::{flatten, parse_reading, Observation};

mod metrics;
pub use metrics::{MemorySink, MetricSink, ProbeMetrics, PrometheusSink, Sample};

mod probe;
pub use probe::{ExtenderProbe, PollReport};
