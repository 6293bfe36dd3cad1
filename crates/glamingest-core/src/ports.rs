//! Collaborator interfaces the pipeline calls out to.
//!
//! Implementations live outside the engine (HTTP clients in the CLI, fakes in
//! tests). All calls are synchronous; timeouts and cancellation belong to the
//! implementation.

use crate::crosswalk::{CrosswalkRow, CrosswalkTable, SharedCrosswalk};
use crate::error::PortError;
use serde_json::Value;

/// Collection API: raw object record by id.
pub trait RecordSource {
    fn fetch_record(&self, object_id: &str) -> Result<Value, PortError>;
}

/// Knowledge-graph query: ids of items carrying the external object id.
pub trait GraphLookup {
    fn query_matches(&self, object_id: &str) -> Result<Vec<String>, PortError>;
}

/// Tabular crosswalk source, rows in source order.
pub trait CrosswalkSource {
    fn fetch_rows(&self) -> Result<Vec<CrosswalkRow>, PortError>;
}

/// Name reconciliation for artists. The result is only ever shown as a
/// diagnostic.
pub trait ArtistLookup {
    fn lookup_artist(&self, name: &str) -> Result<String, PortError>;
}

/// Where the pipeline gets its crosswalk from.
#[derive(Clone, Copy)]
pub enum CrosswalkInput<'a> {
    /// Fetch and build a fresh table for every run.
    Source(&'a dyn CrosswalkSource),
    /// Use the current snapshot of a table built ahead of time.
    Shared(&'a SharedCrosswalk),
}

/// Rebuild a shared crosswalk from its source and swap it in.
///
/// On failure the previous table stays in place.
pub fn refresh_crosswalk(
    shared: &SharedCrosswalk,
    source: &dyn CrosswalkSource,
) -> Result<usize, PortError> {
    let table = CrosswalkTable::from_rows(source.fetch_rows()?);
    let labels = table.len();
    shared.replace(table);
    tracing::info!(labels, "crosswalk refreshed");
    Ok(labels)
}

/// A fixed row list, mostly useful for offline runs and tests.
impl CrosswalkSource for Vec<CrosswalkRow> {
    fn fetch_rows(&self) -> Result<Vec<CrosswalkRow>, PortError> {
        Ok(self.clone())
    }
}
