//! Collaborator wiring and failure propagation for `generate_statements`.

use glamingest_core::ports::refresh_crosswalk;
use glamingest_core::*;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;

// ============================================================================
// Fakes
// ============================================================================

#[derive(Default)]
struct FakeRecords {
    records: HashMap<String, Value>,
    fail_with: Option<PortError>,
}

impl RecordSource for FakeRecords {
    fn fetch_record(&self, object_id: &str) -> Result<Value, PortError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.records
            .get(object_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("object {object_id}")))
    }
}

#[derive(Default)]
struct FakeGraph {
    matches: Vec<String>,
    fail_with: Option<PortError>,
    queried: RefCell<Vec<String>>,
}

impl GraphLookup for FakeGraph {
    fn query_matches(&self, object_id: &str) -> Result<Vec<String>, PortError> {
        self.queried.borrow_mut().push(object_id.to_string());
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(self.matches.clone())
    }
}

struct BrokenCrosswalk;

impl CrosswalkSource for BrokenCrosswalk {
    fn fetch_rows(&self) -> Result<Vec<CrosswalkRow>, PortError> {
        Err(PortError::Malformed("no table on page".into()))
    }
}

struct MissingPage;

impl CrosswalkSource for MissingPage {
    fn fetch_rows(&self) -> Result<Vec<CrosswalkRow>, PortError> {
        Err(PortError::NotFound("page Glam/crosswalk".into()))
    }
}

struct FixedArtist(Result<String, PortError>);

impl ArtistLookup for FixedArtist {
    fn lookup_artist(&self, _name: &str) -> Result<String, PortError> {
        self.0.clone()
    }
}

fn records() -> FakeRecords {
    let mut records = HashMap::new();
    records.insert(
        "45734".to_string(),
        json!({
            "objectID": 45734,
            "accessionNumber": "36.100.45",
            "title": "Quail and Millet",
            "artistDisplayName": "Kiyohara Yukinobu",
            "objectDate": "late 17th century",
            "department": "Asian Art",
            "objectName": "Hanging scroll",
            "isPublicDomain": true,
            "primaryImage": "https://images.metmuseum.org/CRDImages/as/original/DP251139.jpg",
            "isTimelineWork": false
        }),
    );
    FakeRecords {
        records,
        fail_with: None,
    }
}

fn rows() -> Vec<CrosswalkRow> {
    vec![
        CrosswalkRow::new("Hanging scroll", Some("scroll"), None, None),
        CrosswalkRow::new("Hanging scroll", Some("Q1153655"), None, None),
    ]
}

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn fetches_and_generates() {
    let records = records();
    let graph = FakeGraph::default();
    let crosswalk = vec![CrosswalkRow::new("Hanging scroll", Some("Q1153655"), None, None)];
    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Source(&crosswalk),
        artists: None,
    };

    let out = generate_statements("45734", &ports, &InstitutionProfile::default()).unwrap();

    assert_eq!(out.subject, Some(ReconciliationSubject::Create));
    assert_eq!(graph.queried.borrow().as_slice(), ["45734"]);
    let lines = out.statements.lines();
    assert_eq!(lines[0], "CREATE");
    assert!(lines.contains(&"LAST|P195|Q67429130|P217|\"36.100.45\"".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some("LAST|P31|Q1153655"));
    assert!(out
        .diagnostics
        .contains(&"date too complex to parse: late 17th century".to_string()));
    assert!(out.diagnostics.contains(&"not a timeline work".to_string()));
    assert!(out.media_upload.is_some());
}

#[test]
fn invalid_crosswalk_id_leaves_label_unresolved() {
    let records = records();
    let graph = FakeGraph::default();
    // First row wins even when its id is unusable.
    let crosswalk = rows();
    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Source(&crosswalk),
        artists: None,
    };
    let out = generate_statements("45734", &ports, &InstitutionProfile::default()).unwrap();
    assert!(out
        .diagnostics
        .contains(&"crosswalk entry for 'Hanging scroll' has no controlled id".to_string()));
}

#[test]
fn shared_crosswalk_snapshot_is_used() {
    let records = records();
    let graph = FakeGraph {
        matches: vec!["Q4".into()],
        ..FakeGraph::default()
    };
    let shared = SharedCrosswalk::default();
    let source = vec![CrosswalkRow::new("Hanging scroll", Some("Q1153655"), None, None)];
    assert_eq!(refresh_crosswalk(&shared, &source), Ok(1));

    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Shared(&shared),
        artists: None,
    };
    let out = generate_statements("45734", &ports, &InstitutionProfile::default()).unwrap();
    assert_eq!(
        out.statements.lines().last().map(String::as_str),
        Some("Q4|P31|Q1153655")
    );
}

#[test]
fn artist_lookup_is_appended_last() {
    let records = records();
    let graph = FakeGraph::default();
    let crosswalk: Vec<CrosswalkRow> = Vec::new();
    let artist = FixedArtist(Ok("Q3197212 (Kiyohara Yukinobu)".into()));
    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Source(&crosswalk),
        artists: Some(&artist),
    };
    let out = generate_statements("45734", &ports, &InstitutionProfile::default()).unwrap();
    assert_eq!(
        out.diagnostics.last().map(String::as_str),
        Some("artist lookup for 'Kiyohara Yukinobu': Q3197212 (Kiyohara Yukinobu)")
    );
}

// ============================================================================
// Failure policy
// ============================================================================

#[test]
fn missing_record_is_not_an_error() {
    let records = FakeRecords::default();
    let graph = FakeGraph::default();
    let crosswalk: Vec<CrosswalkRow> = Vec::new();
    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Source(&crosswalk),
        artists: None,
    };
    let out = generate_statements("999999999", &ports, &InstitutionProfile::default()).unwrap();
    assert_eq!(out.subject, None);
    assert!(out.statements.is_empty());
    assert_eq!(out.diagnostics, ["object ID not in use: object 999999999"]);
    assert!(graph.queried.borrow().is_empty());
}

#[test]
fn record_transport_failure_aborts() {
    let records = FakeRecords {
        fail_with: Some(PortError::Transport("connection reset".into())),
        ..FakeRecords::default()
    };
    let graph = FakeGraph::default();
    let crosswalk: Vec<CrosswalkRow> = Vec::new();
    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Source(&crosswalk),
        artists: None,
    };
    let err = generate_statements("1", &ports, &InstitutionProfile::default()).unwrap_err();
    assert!(matches!(err, IngestError::RecordTransport { ref object_id, .. } if object_id == "1"));
}

#[test]
fn graph_failure_aborts() {
    let records = records();
    let graph = FakeGraph {
        fail_with: Some(PortError::Transport("sparql endpoint timed out".into())),
        ..FakeGraph::default()
    };
    let crosswalk: Vec<CrosswalkRow> = Vec::new();
    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Source(&crosswalk),
        artists: None,
    };
    let err = generate_statements("45734", &ports, &InstitutionProfile::default()).unwrap_err();
    assert!(matches!(err, IngestError::GraphQuery { .. }));
    assert!(err.to_string().contains("sparql endpoint timed out"));
}

#[test]
fn unreadable_graph_answer_generates_nothing() {
    let records = records();
    let graph = FakeGraph {
        fail_with: Some(PortError::Malformed("sparql result has no bindings".into())),
        ..FakeGraph::default()
    };
    let crosswalk = rows();
    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Source(&crosswalk),
        artists: None,
    };
    let out = generate_statements("45734", &ports, &InstitutionProfile::default()).unwrap();
    assert_eq!(out.subject, None);
    assert!(out.statements.is_empty());
    assert_eq!(
        out.diagnostics,
        ["graph query unusable (malformed response: sparql result has no bindings), nothing generated"]
    );
}

#[test]
fn unreadable_record_generates_nothing() {
    let records = FakeRecords {
        fail_with: Some(PortError::Malformed("response is not JSON".into())),
        ..FakeRecords::default()
    };
    let graph = FakeGraph::default();
    let crosswalk: Vec<CrosswalkRow> = Vec::new();
    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Source(&crosswalk),
        artists: None,
    };
    let out = generate_statements("45734", &ports, &InstitutionProfile::default()).unwrap();
    assert_eq!(out.subject, None);
    assert!(out.statements.is_empty());
    assert_eq!(out.diagnostics, ["object record unreadable: response is not JSON"]);
    assert!(graph.queried.borrow().is_empty());
}

#[test]
fn missing_crosswalk_page_still_generates() {
    let records = records();
    let graph = FakeGraph::default();
    let page = MissingPage;
    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Source(&page),
        artists: None,
    };
    let out = generate_statements("45734", &ports, &InstitutionProfile::default()).unwrap();
    assert_eq!(
        out.diagnostics[0],
        "crosswalk unavailable (not found: page Glam/crosswalk), object type not mapped"
    );
    assert!(out.subject.is_some());
    assert!(!out.statements.is_empty());
}

#[test]
fn crosswalk_failure_degrades_to_diagnostic() {
    let records = records();
    let graph = FakeGraph::default();
    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Source(&BrokenCrosswalk),
        artists: None,
    };
    let out = generate_statements("45734", &ports, &InstitutionProfile::default()).unwrap();
    assert_eq!(
        out.diagnostics[0],
        "crosswalk unavailable (malformed response: no table on page), object type not mapped"
    );
    assert!(out
        .diagnostics
        .contains(&"no crosswalk match for 'Hanging scroll', consider adding it.".to_string()));
    assert!(!out.statements.is_empty());
}

#[test]
fn artist_failure_degrades_to_diagnostic() {
    let records = records();
    let graph = FakeGraph::default();
    let crosswalk: Vec<CrosswalkRow> = Vec::new();
    let artist = FixedArtist(Err(PortError::Transport("503".into())));
    let ports = Collaborators {
        records: &records,
        graph: &graph,
        crosswalk: CrosswalkInput::Source(&crosswalk),
        artists: Some(&artist),
    };
    let out = generate_statements("45734", &ports, &InstitutionProfile::default()).unwrap();
    assert_eq!(
        out.diagnostics.last().map(String::as_str),
        Some("artist lookup for 'Kiyohara Yukinobu' failed: transport error: 503")
    );
}
