//! CSV parsers, one per data provider format.
//!
//! Every parser comes in two flavours: `parse_*` works on any reader and is
//! what the tests drive, `read_*` opens the file at a path and delegates.
//! Files are owned by the `read_*` call and closed on every return path.

pub mod gsod;
pub mod sea_ice;
pub mod station;

pub use gsod::{GSOD, fahrenheit_to_celsius, read_gsod};
pub use sea_ice::{parse_sea_ice_index, read_sea_ice_index};
pub use station::{JMA, StationLayout, TAIWAN_CWA, parse_station, read_station};

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::error::{RowFault, SourceError};

pub(crate) fn open(path: &Path) -> Result<File, SourceError> {
    File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a whole source into memory.
pub(crate) fn slurp<R: Read>(mut input: R, origin: &Path) -> Result<Vec<u8>, SourceError> {
    let mut bytes = Vec::new();
    input
        .read_to_end(&mut bytes)
        .map_err(|source| SourceError::Read {
            path: origin.to_path_buf(),
            source,
        })?;
    Ok(bytes)
}

/// Builds a CSV reader over `bytes` and consumes the header row.
pub(crate) fn reader_with_header<'a>(
    bytes: &'a [u8],
    origin: &Path,
) -> Result<csv::Reader<&'a [u8]>, SourceError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let headers = reader.headers().map_err(|e| SourceError::Header {
        path: origin.to_path_buf(),
        source: Some(e),
    })?;
    if headers.is_empty() {
        return Err(SourceError::Header {
            path: origin.to_path_buf(),
            source: None,
        });
    }

    Ok(reader)
}

/// Iterates data records together with the file line each one starts on.
///
/// Quoted fields spanning several lines and skipped blank lines both count.
/// The header is line 1.
pub(crate) fn records<'a>(
    reader: &'a mut csv::Reader<&[u8]>,
    bytes: &'a [u8],
    origin: &'a Path,
) -> impl Iterator<Item = Result<(usize, StringRecord), SourceError>> {
    let mut last_line = 1;
    reader.records().map(move |result| {
        let position = match &result {
            Ok(record) => record.position(),
            Err(e) => e.position(),
        };
        let line = position.map_or(last_line + 1, |p| start_line(bytes, p));
        last_line = line;
        result
            .map(|record| (line, record))
            .map_err(|e| RowFault::from(e).at(origin, line, None))
    })
}

/// The reader stamps a record with its position before skipping blank lines,
/// so step over them to land on the record's first line.
fn start_line(bytes: &[u8], position: &csv::Position) -> usize {
    let mut line = position.line() as usize;
    let offset = (position.byte() as usize).min(bytes.len());
    for b in &bytes[offset..] {
        match b {
            b'\n' => line += 1,
            b'\r' => {}
            _ => break,
        }
    }
    line
}

/// Fetches a trimmed field by 0-based index.
pub(crate) fn field(record: &StringRecord, index: usize) -> Result<&str, RowFault> {
    record.get(index).map(str::trim).ok_or(RowFault::MissingField)
}

pub(crate) fn parse_date(value: &str, format: &str) -> Result<NaiveDate, RowFault> {
    NaiveDate::parse_from_str(value, format).map_err(|source| RowFault::Date {
        value: value.to_string(),
        source,
    })
}

pub(crate) fn parse_value(value: &str) -> Result<f64, RowFault> {
    if value.is_empty() {
        return Err(RowFault::Empty);
    }
    let v = value.parse::<f64>().map_err(|source| RowFault::Number {
        value: value.to_string(),
        source,
    })?;
    if !v.is_finite() {
        return Err(RowFault::NonFinite {
            value: value.to_string(),
        });
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_rejects_empty_and_garbage() {
        assert!(matches!(parse_value(""), Err(RowFault::Empty)));
        assert!(matches!(parse_value("abc"), Err(RowFault::Number { .. })));
        assert!(matches!(parse_value("inf"), Err(RowFault::NonFinite { .. })));
        assert_eq!(parse_value("-3.25").unwrap(), -3.25);
    }

    #[test]
    fn test_parse_date_accepts_unpadded_jma_dates() {
        let d = parse_date("1/2/2006", "%m/%d/%Y").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2006, 1, 2).unwrap());
    }

    fn lines_of(input: &str) -> Vec<usize> {
        let origin = Path::new("t.csv");
        let mut reader = reader_with_header(input.as_bytes(), origin).unwrap();
        records(&mut reader, input.as_bytes(), origin)
            .map(|r| r.unwrap().0)
            .collect()
    }

    #[test]
    fn test_empty_input_is_header_error() {
        let err = reader_with_header(b"", Path::new("empty.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Header { .. }));
    }

    #[test]
    fn test_records_report_file_lines() {
        assert_eq!(lines_of("h1,h2\na,b\nc,d\n"), vec![2, 3]);
    }

    #[test]
    fn test_records_count_blank_and_multiline_rows() {
        assert_eq!(lines_of("h1,h2\n\na,b\n\"multi\nline\",c\nd,e\n"), vec![3, 4, 6]);
        assert_eq!(lines_of("h1,h2\r\n\r\n\r\na,b\r\nc,d"), vec![4, 5]);
    }

    #[test]
    fn test_unequal_record_reports_its_line() {
        let input = "h1,h2\na,b\n\n\nc\n";
        let origin = Path::new("t.csv");
        let mut reader = reader_with_header(input.as_bytes(), origin).unwrap();
        let err = records(&mut reader, input.as_bytes(), origin)
            .nth(1)
            .unwrap()
            .unwrap_err();
        assert_eq!(err.line(), Some(5));
        assert!(matches!(err, SourceError::Row { fault: RowFault::Record(_), .. }));
    }

    #[test]
    fn test_open_missing_file() {
        let err = open(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
    }
}
