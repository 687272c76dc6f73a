use crate::error::{CleanError, CleanResult};
use crate::types::{Cell, Table};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info};

/// Read a comma-delimited file with a header row into a `Table`.
///
/// Empty fields load as nulls. A missing file, a missing header, a row
/// whose width differs from the header, or invalid UTF-8 all fail with
/// `CleanError::Load`.
pub fn load_table(path: &Path) -> CleanResult<Table> {
    if !path.exists() {
        return Err(CleanError::load(path, "input file not found"));
    }
    info!("loading dataset from {}", path.display());

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|e| CleanError::load(path, e))?;

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| CleanError::load(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CleanError::load(path, "no header row"));
    }

    let mut table = Table::new(headers);
    for result in rdr.records() {
        let record = result.map_err(|e| CleanError::load(path, e))?;
        let row = record
            .iter()
            .map(|v| if v.is_empty() { None } else { Some(Cell::text(v)) })
            .collect();
        table.rows.push(row);
    }

    let (rows, cols) = table.shape();
    debug!(headers = ?table.headers, "parsed header");
    info!(rows, cols, "loaded dataset");
    Ok(table)
}
