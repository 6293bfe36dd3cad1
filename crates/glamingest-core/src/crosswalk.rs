//! Crosswalk from free-text object-type labels to controlled item ids.
//!
//! The table is built once from ordered source rows and is immutable
//! afterwards. Lookups are exact and case-sensitive; when several rows carry
//! the same label the first one wins.

use crate::error::PortError;
use crate::vocab::is_item_id;
use crate::wikitable::WikiTable;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const LABEL_COLUMN: &str = "Object Name";
pub const ID_COLUMN: &str = "QID";
pub const EXTRA_STATEMENT_COLUMN: &str = "extrastatement";
pub const EXTRA_QUALIFIER_COLUMN: &str = "extraqualifier";

/// One source row. Blank cells are `None`, never `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosswalkRow {
    pub label: String,
    pub controlled_id: Option<String>,
    pub extra_statement: Option<String>,
    pub extra_qualifier: Option<String>,
}

fn cell(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl CrosswalkRow {
    pub fn new(
        label: &str,
        controlled_id: Option<&str>,
        extra_statement: Option<&str>,
        extra_qualifier: Option<&str>,
    ) -> Self {
        Self {
            label: label.trim().to_string(),
            controlled_id: cell(controlled_id),
            extra_statement: cell(extra_statement),
            extra_qualifier: cell(extra_qualifier),
        }
    }

    /// Map a parsed wiki table onto rows. The label and id columns are
    /// required; the extra columns are optional.
    pub fn from_table(table: &WikiTable) -> Result<Vec<Self>, PortError> {
        let label_col = table.column(LABEL_COLUMN).ok_or_else(|| {
            PortError::Malformed(format!("crosswalk table has no `{LABEL_COLUMN}` column"))
        })?;
        let id_col = table.column(ID_COLUMN).ok_or_else(|| {
            PortError::Malformed(format!("crosswalk table has no `{ID_COLUMN}` column"))
        })?;
        let extra_col = table.column(EXTRA_STATEMENT_COLUMN);
        let qualifier_col = table.column(EXTRA_QUALIFIER_COLUMN);

        let get = |row: &[String], col: Option<usize>| -> Option<String> {
            col.and_then(|c| row.get(c)).map(String::as_str).and_then(|v| cell(Some(v)))
        };

        Ok(table
            .rows
            .iter()
            .filter_map(|row| {
                let label = get(row, Some(label_col))?;
                Some(Self {
                    label,
                    controlled_id: get(row, Some(id_col)),
                    extra_statement: get(row, extra_col),
                    extra_qualifier: get(row, qualifier_col),
                })
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrosswalkEntry {
    pub controlled_id: String,
    pub extra_statement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrosswalkLookup<'a> {
    Hit(&'a CrosswalkEntry),
    /// A row exists for the label but carries no usable item id.
    Unresolved,
    Miss,
}

#[derive(Debug, Clone, Default)]
pub struct CrosswalkTable {
    slots: Vec<Option<CrosswalkEntry>>,
    index: HashMap<String, usize>,
}

impl CrosswalkTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = CrosswalkRow>,
    {
        let mut table = Self::default();
        for row in rows {
            if row.label.is_empty() || table.index.contains_key(&row.label) {
                continue;
            }
            let controlled_id = checked_item(&row.label, "controlled id", row.controlled_id);
            let extra_statement =
                checked_item(&row.label, "extra statement", row.extra_statement);
            let entry = controlled_id.map(|controlled_id| CrosswalkEntry {
                controlled_id,
                extra_statement,
            });
            table.index.insert(row.label, table.slots.len());
            table.slots.push(entry);
        }
        tracing::debug!(labels = table.len(), "built crosswalk table");
        table
    }

    pub fn lookup(&self, label: &str) -> CrosswalkLookup<'_> {
        match self.index.get(label).map(|&i| &self.slots[i]) {
            Some(Some(entry)) => CrosswalkLookup::Hit(entry),
            Some(None) => CrosswalkLookup::Unresolved,
            None => CrosswalkLookup::Miss,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A crosswalk that can be rebuilt while readers keep using the previous one.
///
/// Readers take an `Arc` snapshot; `replace` swaps in a table that was fully
/// built beforehand. The table itself is never mutated in place.
#[derive(Debug, Default)]
pub struct SharedCrosswalk {
    current: RwLock<Arc<CrosswalkTable>>,
}

impl SharedCrosswalk {
    pub fn new(table: CrosswalkTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    pub fn snapshot(&self) -> Arc<CrosswalkTable> {
        Arc::clone(&*self.current.read())
    }

    /// Swap in a new table, returning the previous one.
    pub fn replace(&self, table: CrosswalkTable) -> Arc<CrosswalkTable> {
        std::mem::replace(&mut *self.current.write(), Arc::new(table))
    }
}

/// Keep `id` only if it is an item id; anything else is logged and dropped.
fn checked_item(label: &str, column: &str, id: Option<String>) -> Option<String> {
    id.filter(|id| {
        let ok = is_item_id(id);
        if !ok {
            tracing::warn!(label, column, id = %id, "crosswalk value is not an item id");
        }
        ok
    })
}
