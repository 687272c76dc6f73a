// The cleaning steps. Each one takes the table by `&mut`, changes it in
// place and returns the notes that end up in the cleaning summary.
use crate::config::CleanConfig;
use crate::types::{Cell, Row, Table};
use crate::util::{median, parse_date_added, parse_i64_safe, split_duration_str, to_snake_case};
use std::collections::HashSet;
use tracing::{info, warn};

const NULL_SPELLINGS: &[&str] = &["nan", "none", ""];

/// Run every step in order. The input table is consumed and the cleaned
/// table returned together with one note per action taken.
pub fn run_pipeline(mut table: Table, config: &CleanConfig) -> (Table, Vec<String>) {
    let mut notes = Vec::new();

    notes.push(rename_columns(&mut table));
    notes.push(drop_unnecessary_columns(&mut table, &config.drop_columns));
    notes.push(drop_duplicates(&mut table));
    notes.push(standardize_text_columns(&mut table, &config.text_columns));
    notes.extend(fill_missing(&mut table, &config.fills));
    notes.extend(fill_release_year(&mut table));
    notes.extend(parse_dates(&mut table));
    notes.extend(split_duration(&mut table));

    (table, notes)
}

pub fn rename_columns(table: &mut Table) -> String {
    for h in table.headers.iter_mut() {
        *h = to_snake_case(h);
    }
    info!("renamed columns to snake_case");
    "Converted all column names to snake_case.".to_string()
}

pub fn drop_unnecessary_columns(table: &mut Table, names: &[String]) -> String {
    let dropped: Vec<&str> = names
        .iter()
        .filter(|n| table.drop_column(n).is_some())
        .map(|n| n.as_str())
        .collect();
    if dropped.is_empty() {
        return "No unnecessary columns dropped.".to_string();
    }
    info!(?dropped, "dropped unnecessary columns");
    format!("Dropped unnecessary columns: {}", dropped.join(", "))
}

/// Remove exact duplicate rows, keeping the first occurrence.
pub fn drop_duplicates(table: &mut Table) -> String {
    let before = table.rows.len();
    let mut seen: HashSet<Row> = HashSet::with_capacity(before);
    table.rows.retain(|r| seen.insert(r.clone()));
    let removed = before - table.rows.len();
    info!(removed, "dropped duplicate rows");
    format!("Removed duplicate rows: {} rows.", removed)
}

/// Trim text cells and turn the usual spellings of "nothing" into nulls.
pub fn standardize_text_columns(table: &mut Table, columns: &[String]) -> String {
    let mut cleaned = 0usize;
    for col in columns {
        let Some(idx) = table.column_index(col) else {
            continue;
        };
        for row in table.rows.iter_mut() {
            if let Some(Cell::Text(s)) = &row[idx] {
                let trimmed = s.trim();
                row[idx] = if NULL_SPELLINGS.contains(&trimmed) {
                    None
                } else {
                    Some(Cell::text(trimmed))
                };
            }
        }
        cleaned += 1;
    }
    info!(cleaned, "standardized text columns");
    format!(
        "Standardized {} text columns (trimmed whitespace, normalized missings).",
        cleaned
    )
}

fn is_missing(cell: &Option<Cell>) -> bool {
    match cell {
        None => true,
        Some(c) => c.as_text().is_some_and(str::is_empty),
    }
}

/// Substitute each column's sentinel for nulls. Re-running is a no-op.
pub fn fill_missing(table: &mut Table, fills: &[(String, String)]) -> Vec<String> {
    let mut notes = Vec::new();
    for (col, value) in fills {
        let Some(idx) = table.column_index(col) else {
            continue;
        };
        let mut filled = 0usize;
        for row in table.rows.iter_mut() {
            if is_missing(&row[idx]) {
                row[idx] = Some(Cell::text(value.as_str()));
                filled += 1;
            }
        }
        info!(column = %col, filled, "filled missing values");
        notes.push(format!("Replaced missing {} with '{}'.", col, value));
    }
    notes
}

/// Coerce `release_year` to an integer and fill gaps with the median year.
pub fn fill_release_year(table: &mut Table) -> Option<String> {
    let idx = table.column_index("release_year")?;

    let years: Vec<Option<i64>> = table
        .rows
        .iter()
        .map(|r| match &r[idx] {
            Some(Cell::Int(n)) => Some(*n),
            Some(Cell::Text(s)) => parse_i64_safe(Some(s.as_str())),
            _ => None,
        })
        .collect();
    let valid: Vec<f64> = years.iter().flatten().map(|y| *y as f64).collect();
    let missing = years.len() - valid.len();

    let fill = if missing > 0 && !valid.is_empty() {
        Some(median(valid) as i64)
    } else {
        None
    };
    if missing > 0 && fill.is_none() {
        warn!(missing, "release_year has no valid values to take a median from");
    }

    for (row, year) in table.rows.iter_mut().zip(years) {
        row[idx] = year.or(fill).map(Cell::Int);
    }

    match fill {
        Some(y) => {
            info!(missing, median = y, "filled release_year");
            Some(format!("Filled missing release_year with median: {}", y))
        }
        None => None,
    }
}

/// Parse `date_added` into a calendar date. Unparseable entries become
/// null; the trimmed original text and a `DD-MM-YYYY` rendering are kept
/// in two appended columns.
pub fn parse_dates(table: &mut Table) -> Option<String> {
    let idx = table.column_index("date_added")?;
    if table.column_index("date_added_raw").is_some() {
        return None;
    }

    let mut raw_col = Vec::with_capacity(table.rows.len());
    let mut ddmmyyyy_col = Vec::with_capacity(table.rows.len());
    let mut failed = 0usize;

    for row in table.rows.iter_mut() {
        let (raw, parsed) = match &row[idx] {
            Some(Cell::Date(d)) => (Some(d.format("%B %-d, %Y").to_string()), Some(*d)),
            Some(c) => {
                let raw = c.to_string().trim().to_string();
                let parsed = parse_date_added(&raw);
                (Some(raw), parsed)
            }
            None => (None, None),
        };
        if parsed.is_none() {
            failed += 1;
        }
        row[idx] = parsed.map(Cell::Date);
        raw_col.push(raw.map(Cell::Text));
        ddmmyyyy_col.push(parsed.map(|d| Cell::Text(d.format("%d-%m-%Y").to_string())));
    }

    table.push_column("date_added_raw", raw_col);
    table.push_column("date_added_ddmmyyyy", ddmmyyyy_col);

    info!(failed, "parsed date_added");
    Some(format!(
        "Parsed 'date_added' into a date, keeping 'date_added_raw' and adding 'date_added_ddmmyyyy'. Failed to parse: {} entries.",
        failed
    ))
}

/// Replace `duration` with `duration_value` and `duration_unit`. Entries
/// that don't look like `<number> <unit>` get nulls in both.
pub fn split_duration(table: &mut Table) -> Option<String> {
    let durations = table.drop_column("duration")?;

    let mut values = Vec::with_capacity(durations.len());
    let mut units = Vec::with_capacity(durations.len());
    let mut unmatched = 0usize;
    for cell in durations {
        match cell.as_ref().and_then(Cell::as_text).and_then(split_duration_str) {
            Some((v, u)) => {
                values.push(Some(Cell::Int(i64::from(v))));
                units.push(Some(Cell::text(u.as_str())));
            }
            None => {
                unmatched += 1;
                values.push(None);
                units.push(None);
            }
        }
    }

    table.push_column("duration_value", values);
    table.push_column("duration_unit", units);

    info!(unmatched, "split duration");
    Some(format!(
        "Split 'duration' into 'duration_value' (int) and 'duration_unit'. Unmatched: {} entries.",
        unmatched
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SENTINEL;
    use chrono::NaiveDate;

    fn catalog() -> Table {
        Table::from_strs(
            &[
                "show_id", "type", "title", "director", "cast", "country", "date_added",
                "release_year", "rating", "duration", "listed_in", "description",
            ],
            &[
                &[
                    "s1", "Movie", "Dick Johnson Is Dead", "Kirsten Johnson", "", "United States",
                    "September 25, 2021", "2020", "PG-13", "90 min", "Documentaries", "A film.",
                ],
                &[
                    "s2", "TV Show", "Blood & Water", "", "Ama Qamata", "South Africa",
                    "September 24, 2021", "2021", "TV-MA", "2 Seasons", "International TV Shows",
                    "A show.",
                ],
                &[
                    "s3", "TV Show", "Ganglands", "Julien Leclercq", "Sami Bouajila", "",
                    " September 9, 2019", "", "", "3 Seasons", "Crime TV Shows", "Another show.",
                ],
                &[
                    "s4", "Movie", "Louis C.K. 2017", "Louis C.K.", "Louis C.K.", "United States",
                    "someday", "2017", "74 min", "", "Movies", "Stand-up.",
                ],
            ],
        )
    }

    #[test]
    fn pipeline_produces_expected_layout() {
        let (t, notes) = run_pipeline(catalog(), &CleanConfig::default());
        assert_eq!(t.rows.len(), 4);
        assert_eq!(
            t.headers,
            vec![
                "show_id", "type", "title", "director", "cast", "country", "date_added",
                "release_year", "rating", "listed_in", "description", "date_added_raw",
                "date_added_ddmmyyyy", "duration_value", "duration_unit",
            ]
        );
        assert_eq!(t.headers.len(), 15);
        assert!(!notes.is_empty());
    }

    #[test]
    fn pipeline_fills_categoricals_and_parses() {
        let (t, _) = run_pipeline(catalog(), &CleanConfig::default());

        assert_eq!(t.get(1, "director"), Some(&Cell::text(SENTINEL)));
        assert_eq!(t.get(0, "cast"), Some(&Cell::text(SENTINEL)));
        assert_eq!(t.get(2, "country"), Some(&Cell::text(SENTINEL)));
        assert_eq!(t.get(2, "rating"), Some(&Cell::text("Not Rated")));

        let d = NaiveDate::from_ymd_opt(2019, 9, 9).unwrap();
        assert_eq!(t.get(2, "date_added"), Some(&Cell::Date(d)));
        assert_eq!(t.get(2, "date_added_ddmmyyyy"), Some(&Cell::text("09-09-2019")));
        assert_eq!(t.get(3, "date_added"), None);
        assert_eq!(t.get(3, "date_added_raw"), Some(&Cell::text("someday")));

        assert_eq!(t.get(2, "duration_value"), Some(&Cell::Int(3)));
        assert_eq!(t.get(2, "duration_unit"), Some(&Cell::text("Seasons")));
        assert_eq!(t.get(3, "duration_value"), None);
        assert_eq!(t.get(3, "duration_unit"), None);

        // median of 2017, 2020, 2021
        assert_eq!(t.get(2, "release_year"), Some(&Cell::Int(2020)));
    }

    #[test]
    fn duration_halves_are_both_set_or_both_null() {
        let (t, _) = run_pipeline(catalog(), &CleanConfig::default());
        let values = t.column("duration_value").unwrap();
        let units = t.column("duration_unit").unwrap();
        for (v, u) in values.iter().zip(units.iter()) {
            assert_eq!(v.is_some(), u.is_some());
        }
    }

    #[test]
    fn rename_is_idempotent() {
        let mut t = Table::from_strs(&["Show ID", "dateAdded", "Release-Year"], &[]);
        rename_columns(&mut t);
        let once = t.headers.clone();
        rename_columns(&mut t);
        assert_eq!(t.headers, once);
        assert_eq!(once, vec!["show_id", "date_added", "release_year"]);
    }

    #[test]
    fn fill_is_idempotent_and_leaves_text_alone() {
        let mut t = Table::from_strs(&["director", "title"], &[&["", "A"], &["Ava", ""]]);
        let fills = vec![("director".to_string(), SENTINEL.to_string())];
        fill_missing(&mut t, &fills);
        let once = t.clone();
        fill_missing(&mut t, &fills);
        assert_eq!(t, once);
        assert_eq!(t.get(0, "director"), Some(&Cell::text(SENTINEL)));
        assert_eq!(t.get(1, "director"), Some(&Cell::text("Ava")));
        assert_eq!(t.get(1, "title"), None);
    }

    #[test]
    fn fill_skips_absent_columns() {
        let mut t = Table::from_strs(&["title"], &[&["A"]]);
        let notes = fill_missing(&mut t, &[("country".to_string(), SENTINEL.to_string())]);
        assert!(notes.is_empty());
        assert_eq!(t.shape(), (1, 1));
    }

    #[test]
    fn fill_replaces_empty_text_cells() {
        let mut t = Table::new(vec!["country".to_string()]);
        t.rows.push(vec![Some(Cell::text(""))]);
        fill_missing(&mut t, &[("country".to_string(), SENTINEL.to_string())]);
        assert_eq!(t.get(0, "country"), Some(&Cell::text(SENTINEL)));
    }

    #[test]
    fn standardize_trims_and_nulls() {
        let mut t = Table::from_strs(
            &["listed_in", "show_id"],
            &[&["  Dramas ", " s1 "], &[" nan ", "s2"], &["none", "s3"], &["   ", "s4"]],
        );
        standardize_text_columns(&mut t, &["listed_in".to_string()]);
        assert_eq!(t.get(0, "listed_in"), Some(&Cell::text("Dramas")));
        assert_eq!(t.get(1, "listed_in"), None);
        assert_eq!(t.get(2, "listed_in"), None);
        assert_eq!(t.get(3, "listed_in"), None);
        // untouched column
        assert_eq!(t.get(0, "show_id"), Some(&Cell::text(" s1 ")));
    }

    #[test]
    fn capitalized_null_spellings_are_real_values() {
        let mut t = Table::from_strs(
            &["title", "director"],
            &[&["None", " NaN "], &["NONE", "nan"]],
        );
        let cfg = CleanConfig::default();
        standardize_text_columns(&mut t, &cfg.text_columns);
        fill_missing(&mut t, &cfg.fills);
        assert_eq!(t.get(0, "title"), Some(&Cell::text("None")));
        assert_eq!(t.get(1, "title"), Some(&Cell::text("NONE")));
        assert_eq!(t.get(0, "director"), Some(&Cell::text("NaN")));
        assert_eq!(t.get(1, "director"), Some(&Cell::text(SENTINEL)));
    }

    #[test]
    fn duplicates_keep_first_occurrence_in_order() {
        let mut t = Table::from_strs(
            &["id", "v"],
            &[&["1", "a"], &["2", "b"], &["1", "a"], &["3", ""], &["3", ""]],
        );
        let note = drop_duplicates(&mut t);
        assert_eq!(note, "Removed duplicate rows: 2 rows.");
        let ids: Vec<_> = t.column("id").unwrap().into_iter().flatten().cloned().collect();
        assert_eq!(ids, vec![Cell::text("1"), Cell::text("2"), Cell::text("3")]);
    }

    #[test]
    fn drops_export_artefact_columns() {
        let mut t = Table::from_strs(&["Unnamed: 0", "title"], &[&["0", "A"]]);
        rename_columns(&mut t);
        let note = drop_unnecessary_columns(&mut t, &CleanConfig::default().drop_columns);
        assert_eq!(note, "Dropped unnecessary columns: unnamed_0");
        assert_eq!(t.headers, vec!["title"]);
    }

    #[test]
    fn release_year_without_gaps_is_only_coerced() {
        let mut t = Table::from_strs(&["release_year"], &[&["2019"], &["2020.0"]]);
        assert!(fill_release_year(&mut t).is_none());
        assert_eq!(t.get(1, "release_year"), Some(&Cell::Int(2020)));
    }

    #[test]
    fn parse_dates_runs_once() {
        let mut t = Table::from_strs(&["date_added"], &[&["September 9, 2019"]]);
        assert!(parse_dates(&mut t).is_some());
        assert!(parse_dates(&mut t).is_none());
        assert_eq!(t.shape(), (1, 3));
    }

    #[test]
    fn split_duration_without_column_is_noop() {
        let mut t = Table::from_strs(&["title"], &[&["A"]]);
        assert!(split_duration(&mut t).is_none());
        assert_eq!(t.headers, vec!["title"]);
    }
}
