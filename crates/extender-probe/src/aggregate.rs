use crate::assemble::assemble_extender;
use crate::discover::SlotPatterns;
use crate::{Inventory, ProbeError, Result, ScopeSummary};
use forti_transport::{ApiClient, Query};
use serde::Deserialize;
use serde_json::Value;

/// Configuration listing of managed extenders, one entry per vdom.
pub const CMDB_EXTENDER_PATH: &str = "api/v2/cmdb/extender-controller/extender";
/// Live status of extenders, queried per extender id.
pub const MONITOR_EXTENDER_PATH: &str = "api/v2/monitor/extender-controller/extender";

#[derive(Debug, Deserialize)]
struct ManagedScope {
    #[serde(default)]
    vdom: String,
    #[serde(default)]
    results: Vec<ManagedId>,
}

#[derive(Debug, Deserialize)]
struct ManagedId {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct MonitorWrapper {
    #[serde(default)]
    results: Vec<Value>,
}

/// Runs the enumeration and detail queries for one poll cycle.
pub struct Aggregator<'a> {
    patterns: &'a SlotPatterns,
    vdom: String,
}

impl<'a> Aggregator<'a> {
    pub fn new(patterns: &'a SlotPatterns) -> Self {
        Self {
            patterns,
            vdom: "*".to_string(),
        }
    }

    /// Restrict the vdom parameter (defaults to `*`, every vdom).
    pub fn with_vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = vdom.into();
        self
    }

    /// Gather the full inventory.
    ///
    /// Any transport error aborts the collection; a malformed record is dropped and
    /// counted in [`Inventory::dropped`].
    pub fn collect<A: ApiClient>(&self, api: &A) -> Result<Inventory> {
        let managed: Vec<ManagedScope> = api.get(CMDB_EXTENDER_PATH, &Query::vdom(&self.vdom))?;

        let mut inventory = Inventory::default();
        for scope in managed {
            let listed = scope.results.len();
            let ids: Vec<String> = scope
                .results
                .into_iter()
                .map(|r| r.id)
                .filter(|id| {
                    if id.is_empty() {
                        tracing::warn!(vdom = %scope.vdom, "managed extender without id, skipping");
                    }
                    !id.is_empty()
                })
                .collect();

            for id in &ids {
                let query = Query::vdom(&self.vdom).with("id", id);
                let details: Vec<MonitorWrapper> = api.get(MONITOR_EXTENDER_PATH, &query)?;
                for wrapper in details {
                    for raw in wrapper.results {
                        let assembled = match raw.as_object() {
                            Some(obj) => assemble_extender(obj, &scope.vdom, self.patterns),
                            None => Err(ProbeError::MalformedEntity(
                                "record is not an object".to_string(),
                            )),
                        };
                        match assembled {
                            Ok(ext) => inventory.extenders.push(ext),
                            Err(e) => {
                                tracing::warn!(vdom = %scope.vdom, %id, error = %e, "dropping extender record");
                                inventory.dropped += 1;
                            }
                        }
                    }
                }
            }

            inventory.scopes.push(ScopeSummary {
                vdom: scope.vdom,
                listed,
                extender_ids: ids,
            });
        }
        tracing::debug!(
            scopes = inventory.scopes.len(),
            extenders = inventory.extenders.len(),
            dropped = inventory.dropped,
            "inventory collected"
        );
        Ok(inventory)
    }
}
