//! GLAM ingest core: museum object records → knowledge-graph edit statements.
//!
//! ```text
//!  raw record JSON ──► record::normalize ──► ObjectRecord ─┐
//!                                                          │
//!  graph matches ────► reconcile::decide ──► subject ──────┼──► StatementBuilder ──► statements
//!                                                          │          │               diagnostics
//!  crosswalk rows ───► CrosswalkTable ─────────────────────┘          │               media upload
//!                                                          date::parse_date
//! ```
//!
//! The engine performs no IO. Fetching records, querying the graph and
//! loading the crosswalk happen through the traits in [`ports`]; the
//! `glamingest` binary supplies HTTP implementations.

pub mod builder;
pub mod commons;
pub mod crosswalk;
pub mod date;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod profile;
pub mod reconcile;
pub mod record;
pub mod statement;
pub mod text;
pub mod vocab;
pub mod wikitable;

pub use builder::{Built, Diagnostics, StatementBuilder};
pub use commons::MediaUpload;
pub use crosswalk::{CrosswalkEntry, CrosswalkLookup, CrosswalkRow, CrosswalkTable, SharedCrosswalk};
pub use date::{parse_date, DateQualifier, Precision, TemporalValue};
pub use error::{IngestError, PortError};
pub use pipeline::{generate_offline, generate_statements, Collaborators, GenerationOutput};
pub use ports::{ArtistLookup, CrosswalkInput, CrosswalkSource, GraphLookup, RecordSource};
pub use profile::{Department, InstitutionProfile};
pub use reconcile::{decide, GraphMatches, ReconciliationSubject};
pub use record::{normalize, NormalizedRecord, ObjectRecord};
pub use statement::{Statement, StatementBatch, StatementKind};
pub use text::normalize_object_type;
