//! Media-upload descriptor for public-domain images.
//!
//! The descriptor is a side output: a filled Artwork template, a target file
//! name, and an upload-helper URL that carries both. It is handed to the
//! caller and never turned into graph statements.

use crate::profile::InstitutionProfile;
use crate::record::ObjectRecord;
use crate::text::normalize_object_type;
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::OnceLock;
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaUpload {
    pub image_url: String,
    pub file_name: String,
    pub description: String,
    pub upload_url: String,
}

const ARTWORK_TEMPLATE: &str = "\
=={{int:filedesc}}==
{{Artwork
 |artist             = __artist__
 |author             =
 |title              = __title__
 |description        = __description__
 |object type        = __objectName__
 |date               = __objectDate__
 |medium             = __medium__
 |dimensions         = __dimensions__
 |institution        = {{Institution:__institution__}}
 |department         = __department__
 |accession number   = __accessionNumber__
 |place of creation  =
 |place of discovery =
 |object history     =
 |exhibition history =
 |credit line        = __creditLine__
 |inscriptions       =
 |notes              =
 |references         =
 |source             = __objectURL__{{Template:__sourceTemplate__}}
 |permission         = {{Cc-zero}}
 |other_versions     =
 |wikidata           = __itemId__
 |other_fields       =
}}
";

fn item_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r".+(Q[0-9]+)$").expect("valid item suffix pattern"))
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"__([A-Za-z]+)__").expect("valid placeholder pattern"))
}

/// Item id at the end of a knowledge-base entity URL, if any.
pub fn item_id_from_link(link: &str) -> Option<&str> {
    item_suffix_re()
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Fill the Artwork template. Missing fields render as empty values.
pub fn artwork_description(record: &ObjectRecord, profile: &InstitutionProfile) -> String {
    let text = |field: &Option<String>| field.as_deref().unwrap_or("").to_string();

    let artist = record
        .artist_display_name
        .as_deref()
        .map(|name| format!("{{{{Creator:{name}}}}}"))
        .unwrap_or_default();

    let description = match record.object_name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => {
            let mut d = normalize_object_type(Some(name));
            if let Some(culture) = record.culture.as_deref().filter(|c| !c.is_empty()) {
                d.push_str("; ");
                d.push_str(culture);
            }
            d
        }
        None => String::new(),
    };

    let item_id = record
        .knowledge_base_link
        .as_deref()
        .and_then(item_id_from_link)
        .unwrap_or("");

    let title = text(&record.title);
    let object_name = text(&record.object_name);
    let object_date = text(&record.object_date);
    let medium = text(&record.medium);
    let dimensions = text(&record.dimensions);
    let department = text(&record.department);
    let accession = text(&record.accession_number);
    let credit_line = text(&record.credit_line);
    let object_url = text(&record.object_url);

    // One pass: values copied in from the record are never re-scanned.
    let mut out = placeholder_re()
        .replace_all(ARTWORK_TEMPLATE, |caps: &Captures<'_>| {
            match &caps[1] {
                "artist" => artist.as_str(),
                "title" => title.as_str(),
                "description" => description.as_str(),
                "objectName" => object_name.as_str(),
                "objectDate" => object_date.as_str(),
                "medium" => medium.as_str(),
                "dimensions" => dimensions.as_str(),
                "institution" => profile.commons_institution.as_str(),
                "department" => department.as_str(),
                "accessionNumber" => accession.as_str(),
                "creditLine" => credit_line.as_str(),
                "objectURL" => object_url.as_str(),
                "sourceTemplate" => profile.commons_source_template.as_str(),
                "itemId" => item_id,
                _ => "",
            }
            .to_string()
        })
        .into_owned();

    let category = record
        .department
        .as_deref()
        .and_then(|d| profile.department(d))
        .and_then(|d| d.commons_category.as_deref());
    if let Some(category) = category {
        out.push_str(&format!("[[Category:{category}]]\n"));
    }
    out
}

/// `"{title} - {short label} {accession}.jpg"`, skipping missing parts.
pub fn upload_file_name(record: &ObjectRecord, profile: &InstitutionProfile) -> String {
    let mut name = record.title.clone().unwrap_or_default();
    if !name.is_empty() {
        name.push_str(" - ");
    }
    name.push_str(&profile.short_label);
    if let Some(accession) = record.accession_number.as_deref().filter(|a| !a.is_empty()) {
        name.push(' ');
        name.push_str(accession);
    }
    name.push_str(".jpg");
    name
}

/// Upload-helper URL: `{helper}?urls={image} {file name}&desc={description}`.
///
/// Underscores in the image URL are pre-escaped so the helper does not read
/// them as spaces.
pub fn upload_helper_url(
    helper_base: &str,
    image_url: &str,
    file_name: &str,
    description: &str,
) -> String {
    let urls = format!("{} {}", image_url.replace('_', "%5F"), file_name);
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("urls", &urls)
        .append_pair("desc", description)
        .finish();
    format!("{helper_base}?{query}")
}

pub fn media_upload(
    record: &ObjectRecord,
    image_url: &str,
    profile: &InstitutionProfile,
) -> MediaUpload {
    let description = artwork_description(record, profile);
    let file_name = upload_file_name(record, profile);
    let upload_url = upload_helper_url(
        &profile.upload_helper_url,
        image_url,
        &file_name,
        &description,
    );
    MediaUpload {
        image_url: image_url.to_string(),
        file_name,
        description,
        upload_url,
    }
}

/// Commons search for files that may already exist for this object.
pub fn commons_search_url(record: &ObjectRecord, profile: &InstitutionProfile) -> String {
    let mut terms = Vec::new();
    if let Some(accession) = record.accession_number.as_deref().filter(|a| !a.is_empty()) {
        terms.push(accession);
    }
    terms.push(profile.short_label.as_str());
    if let Some(title) = record.title.as_deref().filter(|t| !t.is_empty()) {
        terms.push(title);
    }
    let query: String = form_urlencoded::byte_serialize(terms.join(" ").as_bytes()).collect();
    profile.commons_search_url.replacen("{}", &query, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ObjectRecord {
        ObjectRecord {
            title: Some("Wheat Field with Cypresses".into()),
            accession_number: Some("1993.132".into()),
            object_name: Some("Painting".into()),
            culture: Some("Dutch".into()),
            department: Some("European Paintings".into()),
            artist_display_name: Some("Vincent van Gogh".into()),
            object_date: Some("1889".into()),
            knowledge_base_link: Some("https://www.wikidata.org/wiki/Q1015584".into()),
            ..ObjectRecord::default()
        }
    }

    #[test]
    fn template_is_filled() {
        let profile = InstitutionProfile::default();
        let text = artwork_description(&record(), &profile);
        assert!(text.contains(" |artist             = {{Creator:Vincent van Gogh}}\n"));
        assert!(text.contains(" |description        = painting; Dutch\n"));
        assert!(text.contains(" |wikidata           = Q1015584\n"));
        assert!(text.contains("{{Institution:Metropolitan Museum of Art}}"));
        assert!(text.contains("{{Template:TheMet}}"));
        assert!(text.ends_with(
            "[[Category:Department of European Paintings, Metropolitan Museum of Art]]\n"
        ));
        assert!(!text.contains("__"));
    }

    #[test]
    fn record_text_is_not_treated_as_placeholder() {
        let profile = InstitutionProfile::default();
        let record = ObjectRecord {
            title: Some("Study __medium__".into()),
            medium: Some("Oil on canvas".into()),
            department: Some("__itemId__".into()),
            ..ObjectRecord::default()
        };
        let text = artwork_description(&record, &profile);
        assert!(text.contains(" |title              = Study __medium__\n"));
        assert!(text.contains(" |medium             = Oil on canvas\n"));
        assert!(text.contains(" |department         = __itemId__\n"));
    }

    #[test]
    fn unknown_department_has_no_category() {
        let profile = InstitutionProfile::default();
        let mut r = record();
        r.department = Some("Nowhere".into());
        assert!(!artwork_description(&r, &profile).contains("[[Category:"));
    }

    #[test]
    fn file_name_parts() {
        let profile = InstitutionProfile::default();
        assert_eq!(
            upload_file_name(&record(), &profile),
            "Wheat Field with Cypresses - MET 1993.132.jpg"
        );
        assert_eq!(upload_file_name(&ObjectRecord::default(), &profile), "MET.jpg");
    }

    #[test]
    fn helper_url_escapes_underscores() {
        let url = upload_helper_url(
            "https://helper.example/index.html",
            "https://images.example/a_b.jpg",
            "A - MET 1.jpg",
            "desc",
        );
        assert_eq!(
            url,
            "https://helper.example/index.html?urls=https%3A%2F%2Fimages.example%2Fa%255Fb.jpg+A+-+MET+1.jpg&desc=desc"
        );
    }

    #[test]
    fn item_id_from_link_requires_suffix() {
        assert_eq!(
            item_id_from_link("https://www.wikidata.org/wiki/Q42"),
            Some("Q42")
        );
        assert_eq!(item_id_from_link("https://example.org/none"), None);
    }

    #[test]
    fn search_url_uses_available_terms() {
        let profile = InstitutionProfile::default();
        let url = commons_search_url(&record(), &profile);
        assert!(url.contains("search=1993.132+MET+Wheat+Field+with+Cypresses&"));
        let bare = commons_search_url(&ObjectRecord::default(), &profile);
        assert!(bare.contains("search=MET&"));
    }
}
