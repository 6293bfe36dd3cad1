//! Institution profile: the per-museum constants the statement builder needs.
//!
//! The default profile describes The Metropolitan Museum of Art. A profile can
//! also be loaded from JSON so the same engine can be pointed at another
//! collection that exposes the same record shape.

use crate::error::{IngestError, Result};
use crate::vocab::is_item_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A curatorial department: its knowledge-graph item and Commons category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commons_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionProfile {
    /// Item id of the institution (collection and location statements).
    pub item: String,
    /// Short label used in descriptions and upload file names, e.g. `MET`.
    pub short_label: String,
    /// Display name used for generic attribution in descriptions.
    pub name: String,
    /// Commons `{{Institution:...}}` template name.
    pub commons_institution: String,
    /// Commons source template appended to the object URL.
    pub commons_source_template: String,
    /// Department label (exact, case-sensitive) → department.
    pub departments: BTreeMap<String, Department>,
    /// Base URL of the upload helper tool.
    pub upload_helper_url: String,
    /// Commons search URL with a single `{}` placeholder for the query.
    pub commons_search_url: String,
}

impl InstitutionProfile {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(text)
            .map_err(|e| IngestError::Config(format!("failed to parse profile: {e}")))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            IngestError::Config(format!("failed to read profile {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_item_id(&self.item) {
            return Err(IngestError::Config(format!(
                "institution item `{}` is not an item id",
                self.item
            )));
        }
        if self.short_label.trim().is_empty() {
            return Err(IngestError::Config("short_label must not be empty".into()));
        }
        for (label, dept) in &self.departments {
            if !is_item_id(&dept.item) {
                return Err(IngestError::Config(format!(
                    "department `{label}` has invalid item `{}`",
                    dept.item
                )));
            }
        }
        if self.commons_search_url.matches("{}").count() != 1 {
            return Err(IngestError::Config(
                "commons_search_url must contain exactly one `{}` placeholder".into(),
            ));
        }
        Ok(())
    }

    pub fn department(&self, label: &str) -> Option<&Department> {
        self.departments.get(label)
    }
}

impl Default for InstitutionProfile {
    fn default() -> Self {
        let departments = MET_DEPARTMENTS
            .iter()
            .map(|(label, item, category)| {
                (
                    label.to_string(),
                    Department {
                        item: item.to_string(),
                        commons_category: Some(category.to_string()),
                    },
                )
            })
            .collect();

        Self {
            item: "Q160236".to_string(),
            short_label: "MET".to_string(),
            name: "Metropolitan Museum of Art".to_string(),
            commons_institution: "Metropolitan Museum of Art".to_string(),
            commons_source_template: "TheMet".to_string(),
            departments,
            upload_helper_url: "https://tools.wmflabs.org/url2commons/index.html".to_string(),
            commons_search_url: "https://commons.wikimedia.org/w/index.php?sort=relevance&search={}&title=Special%3ASearch&profile=advanced&fulltext=1&advancedSearch-current=%7B%7D&ns0=1&ns6=1&ns14=1".to_string(),
        }
    }
}

const MET_DEPARTMENTS: &[(&str, &str, &str)] = &[
    (
        "American Decorative Arts",
        "Q67429123",
        "Department of American Decorative Arts, Metropolitan Museum of Art",
    ),
    (
        "The American Wing",
        "Q67429123",
        "The American Wing Collection, Metropolitan Museum of Art",
    ),
    (
        "Ancient Near Eastern Art",
        "Q67429126",
        "Department of Ancient Near Eastern Art, Metropolitan Museum of Art",
    ),
    (
        "Arms and Armor",
        "Q67429127",
        "Department of Arms and Armor, Metropolitan Museum of Art",
    ),
    (
        "Arts of Africa, Oceania, and the Americas",
        "Q67429128",
        "Department of Arts of Africa, Oceania, and the Americas, Metropolitan Museum of Art",
    ),
    (
        "Asian Art",
        "Q67429130",
        "Department of Asian Art, Metropolitan Museum of Art",
    ),
    (
        "Costume Institute",
        "Q67087093",
        "Costume Institute, Metropolitan Museum of Art",
    ),
    (
        "Drawings and Prints",
        "Q67429132",
        "Department of Drawings and Prints, Metropolitan Museum of Art",
    ),
    (
        "Egyptian Art",
        "Q67429133",
        "Department of Egyptian Art, Metropolitan Museum of Art",
    ),
    (
        "European Paintings",
        "Q67429134",
        "Department of European Paintings, Metropolitan Museum of Art",
    ),
    (
        "European Sculpture and Decorative Arts",
        "Q67429136",
        "Department of European Sculpture and Decorative Arts, Metropolitan Museum of Art",
    ),
    (
        "Greek and Roman Art",
        "Q67429137",
        "Department of Greek and Roman Art, Metropolitan Museum of Art",
    ),
    (
        "Islamic Art",
        "Q67429139",
        "Department of Islamic Art, Metropolitan Museum of Art",
    ),
    (
        "Medieval Art",
        "Q67429140",
        "Department of Medieval Art, Metropolitan Museum of Art",
    ),
    (
        "Modern and Contemporary Art",
        "Q67429142",
        "Department of Modern and Contemporary Art, Metropolitan Museum of Art",
    ),
    (
        "Musical Instruments",
        "Q67429143",
        "Department of Musical Instruments, Metropolitan Museum of Art",
    ),
    (
        "Photographs",
        "Q67429146",
        "Department of Photographs, Metropolitan Museum of Art",
    ),
    (
        "Robert Lehman Collection",
        "Q67429147",
        "Robert Lehman Collection (Metropolitan Museum of Art)",
    ),
    (
        "The Cloisters",
        "Q1138030",
        "The Cloisters Collection, Metropolitan Museum of Art",
    ),
    (
        "The Libraries",
        "Q67429148",
        "Libraries Collection, Metropolitan Museum of Art",
    ),
];
