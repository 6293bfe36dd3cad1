//! Knowledge-graph property and item identifiers used by the statement builder.

/// Label (English).
pub const LABEL_EN: &str = "Len";
/// Description (English).
pub const DESCRIPTION_EN: &str = "Den";

/// instance of
pub const P_INSTANCE_OF: &str = "P31";
/// collection
pub const P_COLLECTION: &str = "P195";
/// inventory number
pub const P_INVENTORY_NUMBER: &str = "P217";
/// location
pub const P_LOCATION: &str = "P276";
/// determination method
pub const P_DETERMINATION_METHOD: &str = "P459";
/// inception
pub const P_INCEPTION: &str = "P571";
/// latest date
pub const P_LATEST_DATE: &str = "P1326";
/// described by source
pub const P_DESCRIBED_BY_SOURCE: &str = "P1343";
/// sourcing circumstances
pub const P_SOURCING_CIRCUMSTANCES: &str = "P1480";
/// The Met object ID
pub const P_MET_OBJECT_ID: &str = "P3634";
/// Commons compatible image available at URL
pub const P_COMMONS_COMPATIBLE_IMAGE: &str = "P4765";
/// copyright status
pub const P_COPYRIGHT_STATUS: &str = "P6216";

/// circa
pub const Q_CIRCA: &str = "Q5727902";
/// public domain
pub const Q_PUBLIC_DOMAIN: &str = "Q19652";
/// Heilbrunn Timeline of Art History
pub const Q_TIMELINE_OF_ART_HISTORY: &str = "Q28837176";
/// determination by the holding institution's open access release
pub const Q_OPEN_ACCESS_DETERMINATION: &str = "Q61848113";

/// Entity URI prefix stripped from SPARQL bindings.
pub const ENTITY_URI_PREFIX: &str = "http://www.wikidata.org/entity/";

/// Returns true for item identifiers of the form `Q<digits>`.
pub fn is_item_id(s: &str) -> bool {
    s.strip_prefix('Q')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ids() {
        assert!(is_item_id("Q160236"));
        assert!(!is_item_id("Q"));
        assert!(!is_item_id("P31"));
        assert!(!is_item_id("Q12a"));
    }
}
