//! Writes feed tables as CSV files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::tables::{FeedTables, Table};

/// Errors writing a feed to disk.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("i/o error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv error in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

/// Write every non-empty table to `<dir>/<name>.txt`, creating `dir` if
/// needed. A table without rows produces no file, and a stale file left by
/// an earlier run is removed.
///
/// Returns the number of files written.
pub fn write_feed(tables: &FeedTables, dir: &Path) -> Result<usize, WriteError> {
    std::fs::create_dir_all(dir).map_err(|source| WriteError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let written = [
        write_table(&tables.agency, dir)?,
        write_table(&tables.stops, dir)?,
        write_table(&tables.routes, dir)?,
        write_table(&tables.trips, dir)?,
        write_table(&tables.stop_times, dir)?,
        write_table(&tables.calendar_dates, dir)?,
        write_table(&tables.feed_info, dir)?,
    ]
    .into_iter()
    .filter(|w| *w)
    .count();

    info!(dir = %dir.display(), files = written, "feed written");
    Ok(written)
}

/// Returns whether a file was written.
fn write_table<R: Serialize>(table: &Table<R>, dir: &Path) -> Result<bool, WriteError> {
    let path = dir.join(table.file_name());

    if table.is_empty() {
        if path.exists() {
            std::fs::remove_file(&path).map_err(|source| WriteError::Io {
                path: path.clone(),
                source,
            })?;
        }
        debug!(table = table.name(), "empty table omitted");
        return Ok(false);
    }

    let csv_error = |source| WriteError::Csv {
        path: path.clone(),
        source,
    };

    let mut writer = csv::Writer::from_path(&path).map_err(csv_error)?;
    for row in table.rows() {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;

    debug!(table = table.name(), rows = table.len(), "table written");
    Ok(true)
}
