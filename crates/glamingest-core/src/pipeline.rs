//! End-to-end generation: fetch → normalize → reconcile → build.
//!
//! [`generate_offline`] is the pure core: the same record, matches and
//! crosswalk always give byte-identical output. [`generate_statements`] wraps
//! it with the collaborator calls and their failure policy:
//!
//! | failure                          | effect                              |
//! |----------------------------------|-------------------------------------|
//! | record not found or malformed    | one diagnostic, no statements       |
//! | record transport error           | `Err(IngestError::RecordTransport)` |
//! | graph not found or malformed     | one diagnostic, no statements       |
//! | graph transport error            | `Err(IngestError::GraphQuery)`      |
//! | crosswalk source error           | diagnostic, empty crosswalk         |
//! | artist lookup error              | diagnostic                          |
//!
//! Only transport failures abort the run.

use crate::builder::{Diagnostics, StatementBuilder};
use crate::commons::MediaUpload;
use crate::crosswalk::CrosswalkTable;
use crate::error::{IngestError, PortError, Result};
use crate::ports::{ArtistLookup, CrosswalkInput, GraphLookup, RecordSource};
use crate::profile::InstitutionProfile;
use crate::reconcile::{decide, GraphMatches, ReconciliationSubject};
use crate::record::{normalize, NormalizedRecord};
use crate::statement::StatementBatch;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutput {
    /// `None` when the run stopped before reconciliation.
    pub subject: Option<ReconciliationSubject>,
    pub statements: StatementBatch,
    pub diagnostics: Vec<String>,
    pub media_upload: Option<MediaUpload>,
    pub commons_search_url: Option<String>,
    pub display_image: Option<String>,
}

impl GenerationOutput {
    /// No subject and no statements; the diagnostics say why.
    fn halted(diagnostics: Diagnostics) -> Self {
        Self {
            subject: None,
            statements: StatementBatch::new(),
            diagnostics: diagnostics.into_vec(),
            media_upload: None,
            commons_search_url: None,
            display_image: None,
        }
    }
}

/// The injected collaborators of one run.
pub struct Collaborators<'a> {
    pub records: &'a dyn RecordSource,
    pub graph: &'a dyn GraphLookup,
    pub crosswalk: CrosswalkInput<'a>,
    pub artists: Option<&'a dyn ArtistLookup>,
}

/// Generate statements from inputs already in hand.
pub fn generate_offline(
    raw: &Value,
    matches: &GraphMatches,
    crosswalk: &CrosswalkTable,
    profile: &InstitutionProfile,
) -> GenerationOutput {
    assemble(raw, matches, crosswalk, profile, Diagnostics::new())
}

fn assemble(
    raw: &Value,
    matches: &GraphMatches,
    crosswalk: &CrosswalkTable,
    profile: &InstitutionProfile,
    mut notes: Diagnostics,
) -> GenerationOutput {
    let normalized = normalize(raw);
    if let Some(reason) = unusable(&normalized) {
        notes.push(reason);
        return GenerationOutput::halted(notes);
    }

    for key in &normalized.malformed {
        notes.push(format!("field '{key}' has an unexpected type, treated as absent"));
    }
    for id in matches.iter() {
        notes.push(format!("found object ID in graph: {id}"));
    }

    let decision = decide(matches);
    tracing::info!(subject = %decision.subject, "reconciled object");
    notes.push(decision.diagnostic);

    let built = StatementBuilder::new(profile, crosswalk).build(&normalized.record, &decision.subject);
    notes.extend(built.diagnostics.into_vec());

    GenerationOutput {
        subject: Some(decision.subject),
        statements: built.statements,
        diagnostics: notes.into_vec(),
        media_upload: built.media_upload,
        commons_search_url: Some(built.commons_search_url),
        display_image: built.display_image,
    }
}

fn unusable(normalized: &NormalizedRecord) -> Option<String> {
    if normalized.not_an_object {
        return Some("object record is not a JSON object, nothing generated".to_string());
    }
    normalized
        .api_message
        .as_ref()
        .map(|message| format!("object ID not in use: {message}"))
}

/// Fetch everything for `object_id` through the collaborators and generate
/// its statements.
pub fn generate_statements(
    object_id: &str,
    ports: &Collaborators<'_>,
    profile: &InstitutionProfile,
) -> Result<GenerationOutput> {
    let mut notes = Diagnostics::new();

    let raw = match ports.records.fetch_record(object_id) {
        Ok(raw) => raw,
        Err(PortError::NotFound(message)) => {
            tracing::warn!(object_id, "object record not found");
            notes.push(format!("object ID not in use: {message}"));
            return Ok(GenerationOutput::halted(notes));
        }
        Err(PortError::Malformed(message)) => {
            tracing::warn!(object_id, error = %message, "object record unreadable");
            notes.push(format!("object record unreadable: {message}"));
            return Ok(GenerationOutput::halted(notes));
        }
        Err(source) => {
            return Err(IngestError::RecordTransport {
                object_id: object_id.to_string(),
                source,
            })
        }
    };

    // Every statement depends on the subject, so an unusable answer halts here.
    let matches = match ports.graph.query_matches(object_id) {
        Ok(ids) => GraphMatches::new(ids),
        Err(source @ PortError::Transport(_)) => {
            tracing::warn!(object_id, error = %source, "graph query failed");
            return Err(IngestError::GraphQuery {
                object_id: object_id.to_string(),
                source,
            });
        }
        Err(e) => {
            tracing::warn!(object_id, error = %e, "graph query unusable");
            notes.push(format!("graph query unusable ({e}), nothing generated"));
            return Ok(GenerationOutput::halted(notes));
        }
    };

    let crosswalk = load_crosswalk(ports.crosswalk, &mut notes);

    let mut output = assemble(&raw, &matches, &crosswalk, profile, notes);

    if output.subject.is_some() {
        if let (Some(artists), Some(name)) = (ports.artists, artist_name(&raw)) {
            let note = match artists.lookup_artist(&name) {
                Ok(summary) => format!("artist lookup for '{name}': {summary}"),
                Err(e) => {
                    tracing::warn!(artist = %name, error = %e, "artist lookup failed");
                    format!("artist lookup for '{name}' failed: {e}")
                }
            };
            output.diagnostics.push(note);
        }
    }

    Ok(output)
}

fn load_crosswalk(input: CrosswalkInput<'_>, notes: &mut Diagnostics) -> Arc<CrosswalkTable> {
    match input {
        CrosswalkInput::Shared(shared) => shared.snapshot(),
        CrosswalkInput::Source(source) => match source.fetch_rows() {
            Ok(rows) => Arc::new(CrosswalkTable::from_rows(rows)),
            Err(e) => {
                tracing::warn!(error = %e, "crosswalk source unavailable");
                notes.push(format!(
                    "crosswalk unavailable ({e}), object type not mapped"
                ));
                Arc::new(CrosswalkTable::empty())
            }
        },
    }
}

fn artist_name(raw: &Value) -> Option<String> {
    normalize(raw).record.artist_display_name
}
