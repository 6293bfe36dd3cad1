//! MediaWiki table markup parsing.
//!
//! Handles the subset of table syntax used by curated crosswalk pages:
//! `{| ... |}` blocks, `|+` captions, `|-` row separators, `!`/`!!` header
//! cells, `|`/`||` data cells, per-cell attributes (`style="..." | value`),
//! and multi-line cells. Cell text is rendered roughly the way the wiki shows
//! it: links become their label, `{{Q|123}}` becomes `Q123`, bold/italic
//! quotes are dropped. Nested tables are skipped.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiTable {
    pub caption: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl WikiTable {
    /// Index of a header, compared case-insensitively after trimming.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(header.trim()))
    }
}

pub fn parse_tables(wikitext: &str) -> Vec<WikiTable> {
    let mut tables = Vec::new();
    let mut depth = 0usize;
    let mut table = WikiTable::default();
    let mut row: Vec<String> = Vec::new();
    let mut row_is_header = false;

    for raw in wikitext.lines() {
        let line = raw.trim();

        if line.starts_with("{|") {
            depth += 1;
            if depth == 1 {
                table = WikiTable::default();
                row.clear();
                row_is_header = false;
            }
            continue;
        }
        if depth == 0 {
            continue;
        }
        if line.starts_with("|}") {
            if depth == 1 {
                flush_row(&mut table, &mut row, &mut row_is_header);
                tables.push(std::mem::take(&mut table));
            }
            depth -= 1;
            continue;
        }
        if depth > 1 {
            continue;
        }

        if let Some(caption) = line.strip_prefix("|+") {
            table.caption = Some(render_cell(strip_attributes(caption)));
        } else if line.starts_with("|-") {
            flush_row(&mut table, &mut row, &mut row_is_header);
        } else if let Some(cells) = line.strip_prefix('!') {
            if row.is_empty() && table.rows.is_empty() {
                row_is_header = true;
            }
            row.extend(split_cells(cells, &["!!", "||"]));
        } else if let Some(cells) = line.strip_prefix('|') {
            row.extend(split_cells(cells, &["||"]));
        } else if let Some(last) = row.last_mut() {
            // Continuation of a multi-line cell.
            let more = render_cell(line);
            if !more.is_empty() {
                if !last.is_empty() {
                    last.push(' ');
                }
                last.push_str(&more);
            }
        }
    }

    tables
}

fn flush_row(table: &mut WikiTable, row: &mut Vec<String>, row_is_header: &mut bool) {
    if row.is_empty() {
        *row_is_header = false;
        return;
    }
    let cells = std::mem::take(row);
    if *row_is_header && table.headers.is_empty() {
        table.headers = cells;
    } else {
        table.rows.push(cells);
    }
    *row_is_header = false;
}

fn split_cells(text: &str, separators: &[&str]) -> Vec<String> {
    let mut cells = vec![text.to_string()];
    for sep in separators {
        cells = cells
            .iter()
            .flat_map(|c| c.split(sep).map(str::to_string).collect::<Vec<_>>())
            .collect();
    }
    cells
        .iter()
        .map(|c| render_cell(strip_attributes(c)))
        .collect()
}

/// `style="x" | value` → `value`. A `|` inside `[[...]]` or `{{...}}` does not
/// count.
fn strip_attributes(cell: &str) -> &str {
    let bytes = cell.as_bytes();
    let mut depth = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'[' | b'{' if bytes.get(i + 1) == Some(&bytes[i]) => {
                depth += 1;
                i += 2;
                continue;
            }
            b']' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                depth -= 1;
                i += 2;
                continue;
            }
            b'|' if depth <= 0 => {
                let (attrs, value) = (&cell[..i], &cell[i + 1..]);
                if attrs.contains('=') {
                    return value;
                }
                return cell;
            }
            _ => {}
        }
        i += 1;
    }
    cell
}

fn item_template_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*[Qq]\s*\|\s*[Qq]?([0-9]+)\s*\}\}").expect("valid item template pattern")
    })
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[\[(?:[^\]|]*\|)?([^\]|]*)\]\]").expect("valid wikilink pattern")
    })
}

fn render_cell(cell: &str) -> String {
    let text = item_template_re().replace_all(cell, "Q$1");
    let text = link_re().replace_all(&text, "$1");
    text.replace("'''", "").replace("''", "").trim().to_string()
}
