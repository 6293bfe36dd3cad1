//! Graph-edit statements and their line serialization.
//!
//! Each statement serializes to one line:
//!
//! ```text
//! CREATE
//! subject|propertyCode|value
//! subject|propertyCode|value|qualifierCode|qualifierValue...
//! ```
//!
//! Downstream batch tooling parses these lines, so the format must not drift.
//! Line breaks inside text values are collapsed to spaces on construction.
//! Text values are double-quoted; item ids and time literals are not.

use crate::date::{DateQualifier, TemporalValue};
use crate::text::single_line;
use crate::vocab::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// Create a new item; later statements address it as `LAST`.
    Create,
    Label(String),
    Description(String),
    ExternalObjectId(String),
    /// Inventory number qualified with the holding collection.
    InventoryNumber {
        number: String,
        collection: String,
    },
    /// Collection membership, qualified with the inventory number if known.
    Collection {
        collection: String,
        inventory_number: Option<String>,
    },
    Location(String),
    TimelineWork,
    Inception(TemporalValue),
    CommonsCompatibleImage(String),
    PublicDomain,
    InstanceOf(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// `None` only for [`StatementKind::Create`].
    pub subject: Option<String>,
    pub kind: StatementKind,
}

impl Statement {
    pub fn create() -> Self {
        Self {
            subject: None,
            kind: StatementKind::Create,
        }
    }

    fn on(subject: &str, kind: StatementKind) -> Self {
        Self {
            subject: Some(subject.to_string()),
            kind,
        }
    }

    pub fn label(subject: &str, text: &str) -> Self {
        Self::on(subject, StatementKind::Label(single_line(text)))
    }

    pub fn description(subject: &str, text: &str) -> Self {
        Self::on(subject, StatementKind::Description(single_line(text)))
    }

    pub fn external_object_id(subject: &str, id: &str) -> Self {
        Self::on(subject, StatementKind::ExternalObjectId(single_line(id)))
    }

    pub fn inventory_number(subject: &str, number: &str, collection: &str) -> Self {
        Self::on(
            subject,
            StatementKind::InventoryNumber {
                number: single_line(number),
                collection: collection.to_string(),
            },
        )
    }

    pub fn collection(subject: &str, collection: &str, inventory_number: Option<&str>) -> Self {
        Self::on(
            subject,
            StatementKind::Collection {
                collection: collection.to_string(),
                inventory_number: inventory_number.map(single_line),
            },
        )
    }

    pub fn location(subject: &str, place: &str) -> Self {
        Self::on(subject, StatementKind::Location(place.to_string()))
    }

    pub fn timeline_work(subject: &str) -> Self {
        Self::on(subject, StatementKind::TimelineWork)
    }

    pub fn inception(subject: &str, value: TemporalValue) -> Self {
        Self::on(subject, StatementKind::Inception(value))
    }

    pub fn commons_compatible_image(subject: &str, url: &str) -> Self {
        Self::on(subject, StatementKind::CommonsCompatibleImage(single_line(url)))
    }

    pub fn public_domain(subject: &str) -> Self {
        Self::on(subject, StatementKind::PublicDomain)
    }

    pub fn instance_of(subject: &str, class: &str) -> Self {
        Self::on(subject, StatementKind::InstanceOf(class.to_string()))
    }
}

/// Time literal at year precision, e.g. `+1882-00-00T00:00:00Z/9`.
pub fn time_literal(value: &TemporalValue) -> String {
    year_literal(value.year, value.precision.code())
}

fn year_literal(year: i64, precision: u8) -> String {
    format!("+{year}-00-00T00:00:00Z/{precision}")
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subject = match (&self.kind, &self.subject) {
            (StatementKind::Create, _) => return write!(f, "CREATE"),
            (_, Some(subject)) => subject.as_str(),
            (_, None) => "",
        };

        match &self.kind {
            StatementKind::Create => Ok(()),
            StatementKind::Label(text) => write!(f, "{subject}|{LABEL_EN}|\"{text}\""),
            StatementKind::Description(text) => {
                write!(f, "{subject}|{DESCRIPTION_EN}|\"{text}\"")
            }
            StatementKind::ExternalObjectId(id) => {
                write!(f, "{subject}|{P_MET_OBJECT_ID}|\"{id}\"")
            }
            StatementKind::InventoryNumber { number, collection } => write!(
                f,
                "{subject}|{P_INVENTORY_NUMBER}|\"{number}\"|{P_COLLECTION}|{collection}"
            ),
            StatementKind::Collection {
                collection,
                inventory_number,
            } => {
                write!(f, "{subject}|{P_COLLECTION}|{collection}")?;
                if let Some(number) = inventory_number {
                    write!(f, "|{P_INVENTORY_NUMBER}|\"{number}\"")?;
                }
                Ok(())
            }
            StatementKind::Location(place) => write!(f, "{subject}|{P_LOCATION}|{place}"),
            StatementKind::TimelineWork => write!(
                f,
                "{subject}|{P_DESCRIBED_BY_SOURCE}|{Q_TIMELINE_OF_ART_HISTORY}"
            ),
            StatementKind::Inception(value) => {
                write!(f, "{subject}|{P_INCEPTION}|{}", time_literal(value))?;
                for qualifier in &value.qualifiers {
                    match qualifier {
                        DateQualifier::Circa => {
                            write!(f, "|{P_SOURCING_CIRCUMSTANCES}|{Q_CIRCA}")?
                        }
                        DateQualifier::LatestDate(year) => write!(
                            f,
                            "|{P_LATEST_DATE}|{}",
                            year_literal(*year, value.precision.code())
                        )?,
                    }
                }
                Ok(())
            }
            StatementKind::CommonsCompatibleImage(url) => {
                write!(f, "{subject}|{P_COMMONS_COMPATIBLE_IMAGE}|\"{url}\"")
            }
            StatementKind::PublicDomain => write!(
                f,
                "{subject}|{P_COPYRIGHT_STATUS}|{Q_PUBLIC_DOMAIN}|{P_DETERMINATION_METHOD}|{Q_OPEN_ACCESS_DETERMINATION}"
            ),
            StatementKind::InstanceOf(class) => write!(f, "{subject}|{P_INSTANCE_OF}|{class}"),
        }
    }
}

/// Ordered statement sequence produced for one object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementBatch {
    statements: Vec<Statement>,
}

impl StatementBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    pub fn first(&self) -> Option<&Statement> {
        self.statements.first()
    }

    pub fn lines(&self) -> Vec<String> {
        self.statements.iter().map(ToString::to_string).collect()
    }

    /// Newline-joined serialization, ready for a batch editor.
    pub fn to_batch_text(&self) -> String {
        self.lines().join("\n")
    }

    /// Stable fingerprint of the serialized batch: `fnv1a64:<16 hex digits>`.
    ///
    /// Two runs over the same inputs must produce the same digest.
    pub fn digest(&self) -> String {
        const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
        const FNV_PRIME: u64 = 0x00000100000001b3;

        let mut hash = FNV_OFFSET_BASIS;
        for b in self.to_batch_text().as_bytes() {
            hash ^= (*b) as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        format!("fnv1a64:{hash:016x}")
    }
}

impl<'a> IntoIterator for &'a StatementBatch {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}
