//! Create-or-update decision from existing graph matches.

use std::collections::BTreeSet;
use std::fmt;

/// Sentinel rendered as the subject when more than one item matches.
pub const AMBIGUOUS_SENTINEL: &str = "TOOMANY";
/// Subject that refers to the item created by the preceding `CREATE`.
pub const CREATED_PLACEHOLDER: &str = "LAST";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationSubject {
    Create,
    UpdateSingle(String),
    /// More than one existing item; statements are still generated for
    /// manual review but carry the sentinel subject.
    Ambiguous(usize),
}

impl ReconciliationSubject {
    /// Subject string written in front of each statement.
    pub fn statement_subject(&self) -> &str {
        match self {
            ReconciliationSubject::Create => CREATED_PLACEHOLDER,
            ReconciliationSubject::UpdateSingle(id) => id,
            ReconciliationSubject::Ambiguous(_) => AMBIGUOUS_SENTINEL,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, ReconciliationSubject::Create)
    }
}

impl fmt::Display for ReconciliationSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconciliationSubject::Create => write!(f, "create"),
            ReconciliationSubject::UpdateSingle(id) => write!(f, "update {id}"),
            ReconciliationSubject::Ambiguous(n) => write!(f, "ambiguous ({n} items)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub subject: ReconciliationSubject,
    pub diagnostic: String,
}

/// Deduplicated set of existing item ids carrying the same external id.
///
/// Ordered so that anything derived from it is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphMatches(BTreeSet<String>);

impl GraphMatches {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            ids.into_iter()
                .map(|id| {
                    let id: String = id.into();
                    id.trim().to_string()
                })
                .filter(|id| !id.is_empty())
                .collect(),
        )
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
}

impl<S: Into<String>> FromIterator<S> for GraphMatches {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

pub fn decide(matches: &GraphMatches) -> Decision {
    let mut ids = matches.iter();
    match (ids.next(), matches.len()) {
        (None, _) => Decision {
            subject: ReconciliationSubject::Create,
            diagnostic: "cleared for creation: no existing items carry this object ID".to_string(),
        },
        (Some(id), 1) => Decision {
            subject: ReconciliationSubject::UpdateSingle(id.to_string()),
            diagnostic: format!("exact match: {id}"),
        },
        (Some(_), n) => Decision {
            subject: ReconciliationSubject::Ambiguous(n),
            diagnostic: format!("warning: multiple existing items ({n})"),
        },
    }
}
