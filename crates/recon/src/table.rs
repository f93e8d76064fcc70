//! Decoded tabular input: a header row plus string cells.
//!
//! Adapters consume a [`Table`] regardless of whether it came from a CSV
//! file, a spreadsheet, or a test literal. Decoding the bytes is the
//! caller's concern.

use std::collections::HashMap;

/// Rows of string cells addressed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table. Headers are trimmed; on duplicate names the first column wins.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let mut index = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            index.entry(h.clone()).or_insert(i);
        }
        Self { headers, index, rows }
    }

    /// Parse CSV text with a header row. A UTF-8 BOM is dropped, the
    /// delimiter is sniffed from the first lines, and short rows are allowed.
    pub fn from_csv(data: &str) -> Result<Self, csv::Error> {
        let data = data.strip_prefix('\u{feff}').unwrap_or(data);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(sniff_delimiter(data))
            .has_headers(true)
            .flexible(true)
            .from_reader(data.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        Ok(Self::new(headers, rows))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(move |cells| TableRow { table: self, cells })
    }
}

/// A borrowed row with lookup by column name.
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> TableRow<'a> {
    /// Cell under `column`, or `None` when the column is absent or the row is short.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = *self.table.index.get(column)?;
        self.cells.get(idx).map(|s| s.as_str())
    }

    /// First alias whose cell is non-blank. The value is returned as stored.
    pub fn first_of(&self, aliases: &[String]) -> Option<&'a str> {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .find(|v| !v.trim().is_empty())
    }
}

const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
const SNIFF_LINES: usize = 10;

/// The delimiter that splits the header widest while the following sample
/// lines keep that width. Comma wins ties and anything unsplittable.
fn sniff_delimiter(data: &str) -> u8 {
    let mut lines = data.lines().take(SNIFF_LINES);
    let Some(header) = lines.next() else {
        return b',';
    };
    let sample: Vec<&str> = lines.collect();

    let mut best = (b',', 0);
    for delim in DELIMITERS {
        let columns = line_width(header, delim);
        if columns < 2 {
            continue;
        }
        let agreeing = 1 + sample.iter().filter(|l| line_width(l, delim) == columns).count();
        let score = agreeing * columns;
        if score > best.1 {
            best = (delim, score);
        }
    }
    best.0
}

fn line_width(line: &str, delim: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map_or(1, |r| r.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn from_csv_reads_headers_and_rows() {
        let t = Table::from_csv("School Name,City\nLincoln,Los Angeles\nHoover,\n").unwrap();
        assert_eq!(t.headers(), &["School Name".to_string(), "City".to_string()]);
        assert_eq!(t.len(), 2);
        let rows: Vec<_> = t.rows().collect();
        assert_eq!(rows[0].get("City"), Some("Los Angeles"));
        assert_eq!(rows[1].get("City"), Some(""));
        assert_eq!(rows[1].get("State"), None);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let t = Table::from_csv("a,b,c\n1\n").unwrap();
        let row = t.rows().next().unwrap();
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("c"), None);
    }

    #[test]
    fn first_of_skips_missing_and_blank_aliases() {
        let t = Table::new(
            aliases(&["SchoolName", "School Name"]),
            vec![vec!["Fallback".into(), "  ".into()]],
        );
        let row = t.rows().next().unwrap();
        assert_eq!(row.first_of(&aliases(&["School Name", "SchoolName"])), Some("Fallback"));
        assert_eq!(row.first_of(&aliases(&["Name"])), None);
    }

    #[test]
    fn first_of_keeps_stored_whitespace() {
        let t = Table::new(aliases(&["City"]), vec![vec![" Los Angeles ".into()]]);
        let row = t.rows().next().unwrap();
        assert_eq!(row.first_of(&aliases(&["City"])), Some(" Los Angeles "));
    }

    #[test]
    fn headers_are_trimmed() {
        let t = Table::new(aliases(&[" City "]), vec![vec!["Davis".into()]]);
        assert!(t.has_column("City"));
    }

    #[test]
    fn bom_is_dropped_from_first_header() {
        let t = Table::from_csv("\u{feff}Name,City\nReed College,Portland\n").unwrap();
        assert!(t.has_column("Name"));
    }

    #[test]
    fn semicolon_export_is_detected() {
        let t = Table::from_csv("Name;City;State\nTroy High School;Fullerton;CA\nHoover High School;Glendale;CA\n").unwrap();
        assert_eq!(t.headers().len(), 3);
        assert_eq!(t.rows().nth(1).unwrap().get("City"), Some("Glendale"));
    }

    #[test]
    fn quoted_semicolons_keep_comma() {
        assert_eq!(sniff_delimiter("Name,Notes\n\"Troy High School\",\"a; b\"\n"), b',');
    }

    #[test]
    fn tab_separated_is_detected() {
        assert_eq!(sniff_delimiter("Name\tCity\nReed College\tPortland\n"), b'\t');
    }

    #[test]
    fn single_column_defaults_to_comma() {
        assert_eq!(sniff_delimiter("Name\nReed College\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }
}
