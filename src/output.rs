//! Merged CSV rendering and atomic persistence.

use std::io::{self, Write};
use std::path::Path;

use csv::WriterBuilder;
use tempfile::Builder;
use tracing::debug;

use crate::error::SourceError;
use crate::join::JoinedRecord;

/// How a column's values are printed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberFormat {
    /// Shortest decimal that parses back to the same `f64`, never exponential.
    Shortest,
    /// Exactly this many digits after the decimal point.
    Fixed(usize),
}

impl NumberFormat {
    pub fn format(self, v: f64) -> String {
        match self {
            NumberFormat::Shortest => format!("{v}"),
            NumberFormat::Fixed(digits) => format!("{v:.digits$}"),
        }
    }
}

/// One value column of the merged file.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub format: NumberFormat,
}

/// Renders records to CSV text: header `t,<columns>`, then one row per record.
///
/// `columns` lines up with each record's `values`.
pub fn render_csv(columns: &[Column], records: &[JoinedRecord]) -> io::Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    let mut row: Vec<String> = Vec::with_capacity(columns.len() + 1);
    row.push("t".to_string());
    row.extend(columns.iter().map(|c| c.name.to_string()));
    writer.write_record(&row)?;

    for record in records {
        row.clear();
        row.push(record.date.format("%Y-%m-%d").to_string());
        row.extend(
            columns
                .iter()
                .zip(&record.values)
                .map(|(c, v)| c.format.format(*v)),
        );
        writer.write_record(&row)?;
    }

    writer.into_inner().map_err(|e| e.into_error())
}

/// Writes `bytes` to `path` so that readers see either the old file or the
/// complete new one.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    // Same mode a plain File::create would get, instead of 0600.
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Renders and atomically writes the merged CSV.
pub fn write_records(
    path: &Path,
    columns: &[Column],
    records: &[JoinedRecord],
) -> Result<(), SourceError> {
    let wrap = |source| SourceError::Write {
        path: path.to_path_buf(),
        source,
    };

    let bytes = render_csv(columns, records).map_err(wrap)?;
    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        rows = records.len(),
        "Writing merged CSV"
    );
    write_atomic(path, &bytes).map_err(wrap)
}
