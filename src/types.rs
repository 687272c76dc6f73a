use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tabled::Tabled;

/// A single typed value. Nulls are represented by `Option::None` at the
/// row level, never by an empty `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Text(String),
    Int(i64),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

pub type Row = Vec<Option<Cell>>;

/// In-memory table: ordered headers plus ordered rows of equal width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from string literals; empty strings become nulls.
    #[cfg(test)]
    pub fn from_strs(headers: &[&str], rows: &[&[&str]]) -> Self {
        let mut t = Table::new(headers.iter().map(|h| h.to_string()).collect());
        for r in rows {
            t.rows.push(
                r.iter()
                    .map(|v| if v.is_empty() { None } else { Some(Cell::text(*v)) })
                    .collect(),
            );
        }
        t
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.headers.len())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    #[cfg(test)]
    pub fn column(&self, name: &str) -> Option<Vec<Option<&Cell>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx].as_ref()).collect())
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    /// Append a column at the end. `values` must have one entry per row.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Option<Cell>>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.headers.push(name.into());
        for (row, v) in self.rows.iter_mut().zip(values) {
            row.push(v);
        }
    }

    /// Remove a column by name; returns its values if it existed.
    pub fn drop_column(&mut self, name: &str) -> Option<Vec<Option<Cell>>> {
        let idx = self.column_index(name)?;
        self.headers.remove(idx);
        Some(self.rows.iter_mut().map(|r| r.remove(idx)).collect())
    }

    pub fn null_count(&self, name: &str) -> Option<usize> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter(|r| r[idx].is_none()).count())
    }
}

/// Known labels of the unit half of a compound duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Min,
    Season,
    Seasons,
}

impl DurationUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "min" => Some(DurationUnit::Min),
            "season" => Some(DurationUnit::Season),
            "seasons" => Some(DurationUnit::Seasons),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Min => "min",
            DurationUnit::Season => "Season",
            DurationUnit::Seasons => "Seasons",
        }
    }
}

#[derive(Debug, Tabled, Clone)]
pub struct MissingCountRow {
    #[tabled(rename = "Column")]
    pub column: String,
    #[tabled(rename = "Missing")]
    pub missing: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct PreviewRow {
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Director")]
    pub director: String,
    #[tabled(rename = "DateAdded")]
    pub date_added: String,
    #[tabled(rename = "DurationValue")]
    pub duration_value: String,
    #[tabled(rename = "DurationUnit")]
    pub duration_unit: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct CleaningSummary {
    pub original_rows: usize,
    pub original_cols: usize,
    pub final_rows: usize,
    pub final_cols: usize,
    pub actions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drop_column_keep_rows_aligned() {
        let mut t = Table::from_strs(&["a", "b"], &[&["1", "2"], &["3", ""]]);
        t.push_column("c", vec![Some(Cell::Int(7)), None]);
        assert_eq!(t.shape(), (2, 3));
        assert_eq!(t.get(0, "c"), Some(&Cell::Int(7)));

        let dropped = t.drop_column("a").unwrap();
        assert_eq!(dropped, vec![Some(Cell::text("1")), Some(Cell::text("3"))]);
        assert_eq!(t.headers, vec!["b", "c"]);
        assert_eq!(t.null_count("b"), Some(1));
        assert!(t.drop_column("missing").is_none());
    }

    #[test]
    fn date_cells_display_as_iso() {
        let d = NaiveDate::from_ymd_opt(2019, 9, 9).unwrap();
        assert_eq!(Cell::Date(d).to_string(), "2019-09-09");
        assert_eq!(Cell::Int(93).to_string(), "93");
    }

    #[test]
    fn duration_units_are_case_insensitive_with_canonical_labels() {
        assert_eq!(DurationUnit::parse("MIN"), Some(DurationUnit::Min));
        assert_eq!(DurationUnit::parse("seasons").map(|u| u.as_str()), Some("Seasons"));
        assert_eq!(DurationUnit::parse("hours"), None);
    }
}
