//! Error types for source ingest and output persistence.
//!
//! Positions follow one convention everywhere: `line` is the 1-based line in
//! the file with the header on line 1, and `column` is the 1-based field
//! position within the record.

use std::io;
use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading a source CSV or writing the merged output.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source file is missing or unreadable.
    #[error("failed to open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source file was opened but could not be read to the end.
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The header row is absent or could not be read.
    #[error("missing or malformed header row in {}", .path.display())]
    Header {
        path: PathBuf,
        #[source]
        source: Option<csv::Error>,
    },

    /// A record, date or numeric field could not be parsed.
    #[error("{}: line {line}{}", .path.display(), column_note(.column))]
    Row {
        path: PathBuf,
        line: usize,
        column: Option<usize>,
        #[source]
        fault: RowFault,
    },

    /// The destination could not be written.
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What exactly went wrong inside a row.
#[derive(Debug, Error)]
pub enum RowFault {
    #[error("malformed CSV record")]
    Record(#[from] csv::Error),

    #[error("field is missing")]
    MissingField,

    #[error("value is empty")]
    Empty,

    #[error("invalid date {value:?}")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid number {value:?}")]
    Number {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("non-finite number {value:?}")]
    NonFinite { value: String },
}

impl RowFault {
    pub(crate) fn at(
        self,
        path: impl Into<PathBuf>,
        line: usize,
        column: Option<usize>,
    ) -> SourceError {
        SourceError::Row {
            path: path.into(),
            line,
            column,
            fault: self,
        }
    }
}

impl SourceError {
    /// Line of the offending record, for row-level failures.
    pub fn line(&self) -> Option<usize> {
        match self {
            SourceError::Row { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// 1-based field position of the offending cell, when known.
    pub fn column(&self) -> Option<usize> {
        match self {
            SourceError::Row { column, .. } => *column,
            _ => None,
        }
    }
}

fn column_note(column: &Option<usize>) -> String {
    match column {
        Some(c) => format!(", column {c}"),
        None => String::new(),
    }
}
