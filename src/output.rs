use crate::config::CleanConfig;
use crate::error::{CleanError, CleanResult};
use crate::types::{CleaningSummary, MissingCountRow, PreviewRow, Table};
use crate::util::format_int;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table as TextTable, Tabled};
use tempfile::NamedTempFile;
use tracing::info;

/// A fully written output waiting in a temp file beside its destination.
pub struct Staged {
    tmp: NamedTempFile,
    path: PathBuf,
}

fn temp_beside(path: &Path) -> CleanResult<NamedTempFile> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    NamedTempFile::new_in(dir).map_err(|e| CleanError::write(path, e))
}

fn stage_bytes(path: &Path, bytes: &[u8]) -> CleanResult<Staged> {
    let mut tmp = temp_beside(path)?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| CleanError::write(path, e))?;
    Ok(Staged {
        tmp,
        path: path.to_path_buf(),
    })
}

/// Write the table as CSV into a staged file. Nulls become empty fields.
pub fn stage_table(path: &Path, table: &Table) -> CleanResult<Staged> {
    let mut tmp = temp_beside(path)?;
    {
        let mut wtr = csv::Writer::from_writer(&mut tmp);
        wtr.write_record(&table.headers)
            .map_err(|e| CleanError::write(path, e))?;
        for row in &table.rows {
            let fields = row
                .iter()
                .map(|c| c.as_ref().map(|c| c.to_string()).unwrap_or_default());
            wtr.write_record(fields)
                .map_err(|e| CleanError::write(path, e))?;
        }
        wtr.flush().map_err(|e| CleanError::write(path, e))?;
    }
    Ok(Staged {
        tmp,
        path: path.to_path_buf(),
    })
}

pub fn stage_json<T: Serialize>(path: &Path, value: &T) -> CleanResult<Staged> {
    let s = serde_json::to_string_pretty(value).map_err(|e| CleanError::write(path, e))?;
    stage_bytes(path, s.as_bytes())
}

pub fn stage_summary(path: &Path, summary: &CleaningSummary) -> CleanResult<Staged> {
    stage_bytes(path, render_summary(summary).as_bytes())
}

/// Move staged files into place. If a move fails, the files already moved
/// are removed again.
pub fn persist_all(staged: Vec<Staged>) -> CleanResult<()> {
    let mut done: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for Staged { tmp, path } in staged {
        if let Err(e) = tmp.persist(&path) {
            for p in &done {
                let _ = std::fs::remove_file(p);
            }
            return Err(CleanError::write(&path, e));
        }
        info!("wrote {}", path.display());
        done.push(path);
    }
    Ok(())
}

/// Write the cleaned CSV and both summaries, or none of them.
pub fn write_outputs(cfg: &CleanConfig, table: &Table, summary: &CleaningSummary) -> CleanResult<()> {
    let staged = vec![
        stage_table(&cfg.output, table)?,
        stage_summary(&cfg.summary, summary)?,
        stage_json(&cfg.summary_json(), summary)?,
    ];
    persist_all(staged)
}

pub fn render_summary(summary: &CleaningSummary) -> String {
    let mut s = format!(
        "Netflix dataset cleaning summary\n\
         ===============================\n\
         Original shape: {} rows, {} cols\n\
         Final shape: {} rows, {} cols\n\n\
         Actions performed:\n",
        summary.original_rows, summary.original_cols, summary.final_rows, summary.final_cols
    );
    for note in &summary.actions {
        s.push_str("- ");
        s.push_str(note);
        s.push('\n');
    }
    s
}

pub fn missing_counts(table: &Table) -> Vec<MissingCountRow> {
    table
        .headers
        .iter()
        .map(|h| MissingCountRow {
            column: h.clone(),
            missing: format_int(table.null_count(h).unwrap_or(0)),
        })
        .collect()
}

pub fn preview_rows(table: &Table, max_rows: usize) -> Vec<PreviewRow> {
    let text = |row: usize, col: &str| {
        table
            .get(row, col)
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    (0..table.rows.len().min(max_rows))
        .map(|i| PreviewRow {
            title: text(i, "title"),
            director: text(i, "director"),
            date_added: text(i, "date_added"),
            duration_value: text(i, "duration_value"),
            duration_unit: text(i, "duration_unit"),
        })
        .collect()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = TextTable::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
