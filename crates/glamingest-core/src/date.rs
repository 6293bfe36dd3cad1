//! Free-text object dates → structured temporal values.
//!
//! Recognized shapes, in priority order:
//!
//! ```text
//! "1882"          → 1882
//! "ca. 1882"      → 1882, circa
//! "ca. 1882–89"   → 1882, circa, latest date 1889
//! "ca. 969–1000"  → 969, circa          (ascending range: end not recorded)
//! anything else   → no value, diagnostic
//! ```
//!
//! The range separator is an en-dash (U+2013), which is what the collection
//! API emits.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Precision of a [`TemporalValue`]. Only year precision is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Year,
}

impl Precision {
    /// Numeric precision code of the graph's time datatype.
    pub fn code(self) -> u8 {
        match self {
            Precision::Year => 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateQualifier {
    Circa,
    LatestDate(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalValue {
    pub year: i64,
    pub precision: Precision,
    pub qualifiers: Vec<DateQualifier>,
}

impl TemporalValue {
    pub fn year(year: i64) -> Self {
        Self {
            year,
            precision: Precision::Year,
            qualifiers: Vec::new(),
        }
    }

    pub fn circa(mut self) -> Self {
        self.qualifiers.push(DateQualifier::Circa);
        self
    }

    pub fn latest(mut self, year: i64) -> Self {
        self.qualifiers.push(DateQualifier::LatestDate(year));
        self
    }
}

/// Result of parsing one date string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateParse {
    pub value: Option<TemporalValue>,
    pub diagnostics: Vec<String>,
}

fn circa_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ca\. ([0-9]+)$").expect("valid circa pattern"))
}

fn circa_range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^ca\. ([0-9]+)\u{2013}([0-9]+)$").expect("valid circa range pattern")
    })
}

fn is_ascii_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

pub fn parse_date(text: &str) -> DateParse {
    let mut out = DateParse::default();

    if is_ascii_digits(text) {
        match text.parse::<i64>() {
            Ok(year) => out.value = Some(TemporalValue::year(year)),
            Err(_) => out.diagnostics.push(too_complex(text)),
        }
        return out;
    }

    if let Some(caps) = circa_re().captures(text) {
        match caps[1].parse::<i64>() {
            Ok(year) => {
                out.value = Some(TemporalValue::year(year).circa());
                out.diagnostics
                    .push(format!("date: found simple circa date: {text}"));
            }
            Err(_) => out.diagnostics.push(too_complex(text)),
        }
        return out;
    }

    if let Some(caps) = circa_range_re().captures(text) {
        let (start_digits, end_digits) = (&caps[1], &caps[2]);
        let Ok(start) = start_digits.parse::<i64>() else {
            out.diagnostics.push(too_complex(text));
            return out;
        };

        out.diagnostics.push(format!(
            "date: found circa range: {start_digits} and {end_digits}"
        ));
        let mut value = TemporalValue::year(start).circa();

        if compare_digits(start_digits, end_digits) == Ordering::Greater {
            match expand_abbreviated_end(start_digits, end_digits) {
                Some(latest) => value = value.latest(latest),
                None => out.diagnostics.push(format!(
                    "date: cannot expand abbreviated end year in {text}"
                )),
            }
        } else {
            // Ascending ranges keep only the circa start year.
            out.diagnostics.push(format!(
                "date: ascending circa range {start_digits}\u{2013}{end_digits}, end year not recorded"
            ));
        }

        out.value = Some(value);
        return out;
    }

    out.diagnostics.push(too_complex(text));
    out
}

/// Numeric order of two ASCII digit strings of any length.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// `("1882", "89")` → `1889`: the end year borrows the leading digits of the
/// start year. `None` when the end is not shorter-or-equal in length.
fn expand_abbreviated_end(start: &str, end: &str) -> Option<i64> {
    let shared = start.len().checked_sub(end.len())?;
    let prefix = start.get(..shared)?;
    format!("{prefix}{end}").parse().ok()
}

fn too_complex(text: &str) -> String {
    format!("date too complex to parse: {text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_year() {
        let parsed = parse_date("1882");
        assert_eq!(parsed.value, Some(TemporalValue::year(1882)));
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn simple_circa() {
        let parsed = parse_date("ca. 1882");
        assert_eq!(parsed.value, Some(TemporalValue::year(1882).circa()));
    }

    #[test]
    fn abbreviated_range() {
        let parsed = parse_date("ca. 1882\u{2013}89");
        let value = parsed.value.unwrap();
        assert_eq!(value.year, 1882);
        assert_eq!(
            value.qualifiers,
            vec![DateQualifier::Circa, DateQualifier::LatestDate(1889)]
        );
    }

    #[test]
    fn ascending_range_drops_end() {
        let parsed = parse_date("ca. 969\u{2013}1000");
        assert_eq!(parsed.value, Some(TemporalValue::year(969).circa()));
        assert!(parsed
            .diagnostics
            .iter()
            .any(|d| d.contains("end year not recorded")));
    }

    #[test]
    fn equal_length_descending_range() {
        let parsed = parse_date("ca. 1890\u{2013}1885");
        assert_eq!(
            parsed.value.unwrap().qualifiers,
            vec![DateQualifier::Circa, DateQualifier::LatestDate(1885)]
        );
    }

    #[test]
    fn longer_end_guard() {
        // start > end numerically, but the end has more digits.
        let parsed = parse_date("ca. 1900\u{2013}0000123");
        let value = parsed.value.unwrap();
        assert_eq!(value.qualifiers, vec![DateQualifier::Circa]);
        assert!(parsed
            .diagnostics
            .iter()
            .any(|d| d.contains("cannot expand")));
    }

    #[test]
    fn end_year_beyond_i64_is_ascending() {
        let text = "ca. 10\u{2013}9999999999999999999999";
        let parsed = parse_date(text);
        assert_eq!(parsed.value, Some(TemporalValue::year(10).circa()));
        assert!(parsed
            .diagnostics
            .iter()
            .any(|d| d.contains("end year not recorded")));
    }

    #[test]
    fn digit_order_ignores_leading_zeros() {
        assert_eq!(compare_digits("0089", "89"), Ordering::Equal);
        assert_eq!(compare_digits("1900", "0000123"), Ordering::Greater);
        assert_eq!(compare_digits("10", "9999999999999999999999"), Ordering::Less);
    }

    #[test]
    fn hyphen_range_is_not_recognized() {
        let parsed = parse_date("ca. 1882-89");
        assert_eq!(parsed.value, None);
    }

    #[test]
    fn complex_dates() {
        for text in ["circa somewhen", "", "1882 or 1883", "19th century", "ca.1882"] {
            let parsed = parse_date(text);
            assert_eq!(parsed.value, None, "{text}");
            assert_eq!(parsed.diagnostics, vec![too_complex(text)]);
        }
    }

    #[test]
    fn overflowing_year_is_complex() {
        let parsed = parse_date("99999999999999999999999");
        assert_eq!(parsed.value, None);
    }

    #[test]
    fn precision_code() {
        assert_eq!(Precision::Year.code(), 9);
    }
}
