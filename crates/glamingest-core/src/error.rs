//! Error types for collaborator calls and the top-level pipeline.

use thiserror::Error;

/// Failure reported by an injected collaborator (collection API, graph query,
/// crosswalk source, artist lookup).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Failure that aborts `generate_statements` as a whole.
///
/// Everything else (unparseable dates, crosswalk misses, ambiguous matches,
/// malformed fields) is reported as a diagnostic instead.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to fetch object record {object_id}: {source}")]
    RecordTransport {
        object_id: String,
        #[source]
        source: PortError,
    },
    #[error("graph query for object {object_id} failed: {source}")]
    GraphQuery {
        object_id: String,
        #[source]
        source: PortError,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
