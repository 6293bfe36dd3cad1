//! Statement generation for one normalized record.
//!
//! Statement order is fixed:
//!
//! 1. `CREATE` (only when creating)
//! 2. label, 3. external object id, 4. inventory number
//! 5. timeline marker, 6. inception
//! 7. collection + location, 8. image + copyright status
//! 9. department collection, 10. description + instance-of
//!
//! The builder never fails: anything it cannot map becomes a diagnostic.

use crate::commons::{self, MediaUpload};
use crate::crosswalk::{CrosswalkLookup, CrosswalkTable};
use crate::date::parse_date;
use crate::profile::InstitutionProfile;
use crate::reconcile::ReconciliationSubject;
use crate::record::ObjectRecord;
use crate::statement::{Statement, StatementBatch};
use crate::text::{has_line_break, normalize_object_type};

/// Ordered, human-readable notes collected while generating statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<String>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(diagnostic = %message);
        self.0.push(message);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = String>) {
        for message in other {
            self.push(message);
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.iter().any(|m| m.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Built {
    pub statements: StatementBatch,
    pub diagnostics: Diagnostics,
    pub media_upload: Option<MediaUpload>,
    pub commons_search_url: String,
    pub display_image: Option<String>,
}

pub struct StatementBuilder<'a> {
    profile: &'a InstitutionProfile,
    crosswalk: &'a CrosswalkTable,
}

/// Present and not blank.
fn text(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

impl<'a> StatementBuilder<'a> {
    pub fn new(profile: &'a InstitutionProfile, crosswalk: &'a CrosswalkTable) -> Self {
        Self { profile, crosswalk }
    }

    pub fn build(&self, record: &ObjectRecord, subject: &ReconciliationSubject) -> Built {
        let mut out = StatementBatch::new();
        let mut notes = Diagnostics::new();
        let s = subject.statement_subject();
        let institution = self.profile.item.as_str();
        let accession = text(&record.accession_number);

        if subject.is_create() {
            out.push(Statement::create());
        }

        match text(&record.title) {
            Some(title) => {
                if has_line_break(title) {
                    notes.push("title contains line breaks, joined with spaces");
                }
                out.push(Statement::label(s, title));
            }
            None if record.title.is_some() => notes.push("title is empty, label skipped"),
            None => {}
        }

        if let Some(id) = text(&record.object_id) {
            out.push(Statement::external_object_id(s, id));
        }

        if let Some(accession) = accession {
            out.push(Statement::inventory_number(s, accession, institution));
        }

        match record.is_timeline_work {
            Some(true) => {
                out.push(Statement::timeline_work(s));
                notes.push("timeline work: marked as described by the Timeline of Art History");
            }
            Some(false) => notes.push("not a timeline work"),
            None => {}
        }

        if let Some(date) = record.object_date.as_deref() {
            let parsed = parse_date(date);
            notes.extend(parsed.diagnostics);
            if let Some(value) = parsed.value {
                out.push(Statement::inception(s, value));
            }
        }

        if let Some(accession) = accession {
            out.push(Statement::collection(s, institution, Some(accession)));
            out.push(Statement::location(s, institution));
        }

        let media_upload = self.public_domain(record, s, &mut out, &mut notes);

        if let Some(department) = record.department.as_deref() {
            match self.profile.department(department) {
                Some(dept) => out.push(Statement::collection(s, &dept.item, accession)),
                None => notes.push(format!(
                    "department '{department}' is not in the department map, skipped"
                )),
            }
        }

        self.object_type(record, s, &mut out, &mut notes);

        let display_image = text(&record.primary_image_small)
            .or_else(|| text(&record.primary_image))
            .map(str::to_string);

        Built {
            statements: out,
            diagnostics: notes,
            media_upload,
            commons_search_url: commons::commons_search_url(record, self.profile),
            display_image,
        }
    }

    fn public_domain(
        &self,
        record: &ObjectRecord,
        s: &str,
        out: &mut StatementBatch,
        notes: &mut Diagnostics,
    ) -> Option<MediaUpload> {
        if !record.public_domain() {
            let reason = match record.is_public_domain {
                Some(false) => "not public domain",
                _ => "public domain status unknown",
            };
            notes.push(format!("{reason}: upload skipped, no free version"));
            return None;
        }

        let Some(image) = text(&record.primary_image) else {
            notes.push("public domain but no primary image: upload skipped");
            return None;
        };

        out.push(Statement::commons_compatible_image(s, image));
        out.push(Statement::public_domain(s));

        if let Some(department) = record.department.as_deref() {
            let has_category = self
                .profile
                .department(department)
                .is_some_and(|d| d.commons_category.is_some());
            if !has_category {
                notes.push(format!(
                    "no Commons category for department '{department}', upload description has no category"
                ));
            }
        }

        Some(commons::media_upload(record, image, self.profile))
    }

    fn object_type(
        &self,
        record: &ObjectRecord,
        s: &str,
        out: &mut StatementBatch,
        notes: &mut Diagnostics,
    ) {
        let object_name = text(&record.object_name);

        let mut description = normalize_object_type(object_name);
        if let Some(culture) = text(&record.culture) {
            description.push_str(&format!(" ({culture})"));
        }
        match text(&record.artist_display_name) {
            Some(artist) => description.push_str(&format!(" by {artist}")),
            None => {
                notes.push("creator not specified, using generic attribution");
                description.push_str(&format!(" at the {}", self.profile.name));
            }
        }
        match text(&record.accession_number) {
            Some(accession) => {
                description.push_str(&format!(" ({}, {accession})", self.profile.short_label))
            }
            None => description.push_str(&format!(" ({})", self.profile.short_label)),
        }
        out.push(Statement::description(s, &description));

        let Some(name) = object_name else {
            notes.push("object name not specified, instance-of skipped");
            return;
        };
        notes.push(format!("object name: {name}"));

        match self.crosswalk.lookup(name) {
            CrosswalkLookup::Hit(entry) => {
                out.push(Statement::instance_of(s, &entry.controlled_id));
                if let Some(extra) = entry.extra_statement.as_deref() {
                    out.push(Statement::instance_of(s, extra));
                }
            }
            CrosswalkLookup::Unresolved => notes.push(format!(
                "crosswalk entry for '{name}' has no controlled id"
            )),
            CrosswalkLookup::Miss => notes.push(format!(
                "no crosswalk match for '{name}', consider adding it."
            )),
        }
    }
}
