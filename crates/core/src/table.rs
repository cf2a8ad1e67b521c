//! Extraction of a cell grid from HTML table markup.
//!
//! Only the first `<table>` is considered. Nested tables are not supported:
//! their cells are folded into the enclosing row.

use crate::error::{Error, Result};
use crate::types::TableData;
use regex::Regex;
use std::sync::LazyLock;

/// Total width, in inches, shared by the columns of an imported table.
pub const IMPORT_TABLE_WIDTH: f64 = 9.0;

static TABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table\b[^>]*>(.*?)(?:</table\s*>|\z)").unwrap());

static ROW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr\s*>").unwrap());

static CELL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<t[dh]\b[^>]*>(.*?)</t[dh]\s*>").unwrap());

/// Opening tags of header cells in the first `<thead>` row; capture is the attribute list.
static THEAD_ROW_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<thead\b[^>]*>.*?<tr\b[^>]*>(.*?)</tr\s*>").unwrap()
});

static TH_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<th\b([^>]*)>").unwrap());

static WIDTH_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bdata-pptx-width\s*=\s*["']?([^"'\s>]+)"#).unwrap()
});

static MIN_WIDTH_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bdata-pptx-min-width\s*=\s*["']?([^"'\s>]+)"#).unwrap()
});

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z]+);").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A rectangular grid of cell text plus one width per column.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlTable {
    /// Row 0 is the header row.
    pub rows: Vec<Vec<String>>,
    /// Column widths in inches.
    pub col_widths: Vec<f64>,
}

impl HtmlTable {
    pub fn column_count(&self) -> usize {
        self.col_widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Split into header and body rows.
    pub fn into_table_data(self) -> TableData {
        let mut rows = self.rows.into_iter();
        let headers = rows.next().unwrap_or_default();
        TableData {
            headers,
            rows: rows.collect(),
            col_w: Some(self.col_widths),
        }
    }
}

/// Parse the first table in `html`.
///
/// Fails with [`Error::NoTableFound`] when there is no `<table>` element.
pub fn parse_table(html: &str) -> Result<HtmlTable> {
    let body = TABLE_REGEX
        .captures(html)
        .and_then(|c| c.get(1))
        .ok_or(Error::NoTableFound)?
        .as_str();

    let mut rows: Vec<Vec<String>> = ROW_REGEX
        .captures_iter(body)
        .filter_map(|row| row.get(1))
        .map(|row| {
            CELL_REGEX
                .captures_iter(row.as_str())
                .filter_map(|cell| cell.get(1))
                .map(|cell| cell_text(cell.as_str()))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(columns, String::new());
    }

    let col_widths = column_widths(body, columns);
    log::debug!("Parsed table with {} rows and {} columns", rows.len(), columns);

    Ok(HtmlTable { rows, col_widths })
}

/// Even split, adjusted by width hints on the header cells.
fn column_widths(body: &str, columns: usize) -> Vec<f64> {
    if columns == 0 {
        return Vec::new();
    }
    let mut widths = vec![IMPORT_TABLE_WIDTH / columns as f64; columns];

    let Some(header_row) = THEAD_ROW_REGEX.captures(body).and_then(|c| c.get(1)) else {
        return widths;
    };
    for (index, th) in TH_OPEN_REGEX
        .captures_iter(header_row.as_str())
        .filter_map(|c| c.get(1))
        .enumerate()
        .take(columns)
    {
        let attrs = th.as_str();
        if let Some(width) = attr_number(&WIDTH_ATTR_REGEX, attrs) {
            widths[index] = width;
        }
        if let Some(min) = attr_number(&MIN_WIDTH_ATTR_REGEX, attrs) {
            widths[index] = widths[index].max(min);
        }
    }
    widths
}

fn attr_number(regex: &Regex, attrs: &str) -> Option<f64> {
    regex
        .captures(attrs)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Visible text of a cell: tags removed, entities decoded, whitespace collapsed.
fn cell_text(inner: &str) -> String {
    let stripped = TAG_REGEX.replace_all(inner, " ");
    let decoded = ENTITY_REGEX.replace_all(&stripped, |caps: &regex::Captures| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    WHITESPACE_REGEX.replace_all(&decoded, " ").trim().to_string()
}

fn decode_entity(name: &str) -> Option<String> {
    let named = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    };
    if let Some(c) = named {
        return Some(c.to_string());
    }

    let code = name.strip_prefix('#')?;
    let value = match code.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => code.parse().ok()?,
    };
    char::from_u32(value).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_table() {
        let table = parse_table(
            "<p>Intro</p><table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>",
        )
        .unwrap();
        assert_eq!(table.rows, vec![vec!["A", "B"], vec!["1", "2"]]);
        assert_eq!(table.col_widths, vec![4.5, 4.5]);
    }

    #[test]
    fn test_no_table() {
        let err = parse_table("<div>nothing here</div>").unwrap_err();
        assert!(matches!(err, Error::NoTableFound));
    }

    #[test]
    fn test_case_insensitive_and_first_table_only() {
        let html = "<TABLE><TR><TD>x</TD></TR></TABLE><table><tr><td>y</td></tr></table>";
        let table = parse_table(html).unwrap();
        assert_eq!(table.rows, vec![vec!["x"]]);
    }

    #[test]
    fn test_cell_text_cleanup() {
        let table = parse_table(
            "<table><tr><td> <b>Fish</b> &amp;\n chips </td><td>&#163;4&nbsp;each</td></tr></table>",
        )
        .unwrap();
        assert_eq!(table.rows[0], vec!["Fish & chips", "£4 each"]);
    }

    #[test]
    fn test_ragged_rows_padded_and_empty_rows_dropped() {
        let html = "<table><tr><td>a</td><td>b</td><td>c</td></tr><tr></tr><tr><td>d</td></tr></table>";
        let table = parse_table(html).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["d", "", ""]);
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_width_hints() {
        let html = r#"<table>
            <thead><tr>
                <th data-pptx-width="2">Name</th>
                <th data-pptx-min-width="5">Notes</th>
                <th data-pptx-width="oops">Score</th>
            </tr></thead>
            <tbody><tr><td>a</td><td>b</td><td>c</td></tr></tbody>
        </table>"#;
        let table = parse_table(html).unwrap();
        assert_eq!(table.col_widths, vec![2.0, 5.0, 3.0]);
    }

    #[test]
    fn test_into_table_data() {
        let data = parse_table("<table><tr><th>A</th></tr><tr><td>1</td></tr></table>")
            .unwrap()
            .into_table_data();
        assert_eq!(data.headers, vec!["A"]);
        assert_eq!(data.rows, vec![vec!["1"]]);
        assert_eq!(data.col_w, Some(vec![9.0]));
    }

    #[test]
    fn test_table_without_rows() {
        let table = parse_table("<table></table>").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
    }
}
