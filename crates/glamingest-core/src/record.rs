//! Record normalization: raw collection-API JSON → typed optional-field view.
//!
//! The collection API returns heterogeneous, partially populated objects.
//! Every field of [`ObjectRecord`] is `Some(value)` or `None`; a field whose
//! JSON type is unexpected is treated as absent and reported in
//! [`NormalizedRecord::malformed`]. Normalization never fails.

use serde_json::{Map, Value};

/// Typed view of one collection object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectRecord {
    pub title: Option<String>,
    pub object_id: Option<String>,
    pub accession_number: Option<String>,
    pub object_date: Option<String>,
    /// `None` when the API sent no artist or an empty one.
    pub artist_display_name: Option<String>,
    pub department: Option<String>,
    pub object_name: Option<String>,
    pub culture: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub credit_line: Option<String>,
    pub object_url: Option<String>,
    pub primary_image: Option<String>,
    pub primary_image_small: Option<String>,
    pub is_public_domain: Option<bool>,
    pub is_timeline_work: Option<bool>,
    /// Knowledge-base entity URL the collection itself links to.
    pub knowledge_base_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub record: ObjectRecord,
    /// Source keys that were present with an unexpected JSON type.
    pub malformed: Vec<&'static str>,
    /// The API answered with an error message instead of an object.
    pub api_message: Option<String>,
    /// The payload was not a JSON object at all.
    pub not_an_object: bool,
}

impl ObjectRecord {
    pub fn public_domain(&self) -> bool {
        self.is_public_domain == Some(true)
    }

    pub fn timeline_work(&self) -> bool {
        self.is_timeline_work == Some(true)
    }
}

/// Normalize a raw record. Unknown keys are ignored.
pub fn normalize(raw: &Value) -> NormalizedRecord {
    let Some(obj) = raw.as_object() else {
        return NormalizedRecord {
            not_an_object: true,
            ..NormalizedRecord::default()
        };
    };

    let mut reader = FieldReader {
        obj,
        malformed: Vec::new(),
    };

    let record = ObjectRecord {
        title: reader.string("title"),
        object_id: reader.identifier("objectID"),
        accession_number: reader.string("accessionNumber"),
        object_date: reader.string("objectDate"),
        artist_display_name: reader
            .string("artistDisplayName")
            .filter(|name| !name.trim().is_empty()),
        department: reader.string("department"),
        object_name: reader.string("objectName"),
        culture: reader.string("culture"),
        medium: reader.string("medium"),
        dimensions: reader.string("dimensions"),
        credit_line: reader.string("creditLine"),
        object_url: reader.string("objectURL"),
        primary_image: reader.string("primaryImage"),
        primary_image_small: reader.string("primaryImageSmall"),
        is_public_domain: reader.flag("isPublicDomain"),
        is_timeline_work: reader.flag("isTimelineWork"),
        knowledge_base_link: reader.string("objectWikidata_URL"),
    };

    let api_message = if record.object_id.is_none() {
        obj.get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    } else {
        None
    };

    NormalizedRecord {
        record,
        malformed: reader.malformed,
        api_message,
        not_an_object: false,
    }
}

struct FieldReader<'a> {
    obj: &'a Map<String, Value>,
    malformed: Vec<&'static str>,
}

impl FieldReader<'_> {
    fn string(&mut self, key: &'static str) -> Option<String> {
        match self.obj.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            _ => {
                self.malformed.push(key);
                None
            }
        }
    }

    /// Identifiers arrive as numbers from the API but as strings from dumps.
    fn identifier(&mut self, key: &'static str) -> Option<String> {
        match self.obj.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
            _ => {
                self.malformed.push(key);
                None
            }
        }
    }

    fn flag(&mut self, key: &'static str) -> Option<bool> {
        match self.obj.get(key)? {
            Value::Null => None,
            Value::Bool(b) => Some(*b),
            _ => {
                self.malformed.push(key);
                None
            }
        }
    }
}
