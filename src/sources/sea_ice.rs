//! NSIDC Sea Ice Index regional daily extent.
//!
//! The file is a day-of-year grid: each row is a (month, day) pair and each
//! column after the first two holds one year, starting at 1978.
//! <https://nsidc.org/arcticseaicenews/sea-ice-tools/>

use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::{field, open, parse_date, parse_value, reader_with_header, records, slurp};
use crate::error::{RowFault, SourceError};
use crate::observation::RawObservation;

/// Year held by the first year column.
pub const BASE_YEAR: i32 = 1978;
/// 0-based index of the first year column.
pub const FIRST_YEAR_COLUMN: usize = 2;

const MONTH_COLUMN: usize = 0;
const DAY_COLUMN: usize = 1;

/// Year a 0-based field index refers to, for year columns only.
fn column_year(index: usize) -> Option<i32> {
    let offset = index.checked_sub(FIRST_YEAR_COLUMN)?;
    Some(BASE_YEAR + i32::try_from(offset).ok()?)
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_sea_ice_index(path: &Path) -> Result<Vec<RawObservation>, SourceError> {
    let file = open(path)?;
    parse_sea_ice_index(file, path)
}

/// Parses a Sea Ice Index grid, returning observations sorted by date.
///
/// Empty cells become missing observations, except on February 29 where an
/// empty cell means the date does not exist that year and is skipped.
pub fn parse_sea_ice_index<R: Read>(
    input: R,
    origin: &Path,
) -> Result<Vec<RawObservation>, SourceError> {
    let bytes = slurp(input, origin)?;
    let mut reader = reader_with_header(&bytes, origin)?;
    let mut data = Vec::new();

    for row in records(&mut reader, &bytes, origin) {
        let (line, record) = row?;
        let month = field(&record, MONTH_COLUMN)
            .map_err(|e| e.at(origin, line, Some(MONTH_COLUMN + 1)))?;
        let day = field(&record, DAY_COLUMN)
            .map_err(|e| e.at(origin, line, Some(DAY_COLUMN + 1)))?;
        let leap_day = is_leap_day(month, day);

        for (index, cell) in record.iter().enumerate() {
            let Some(year) = column_year(index) else {
                continue;
            };
            let cell = cell.trim();
            if leap_day && cell.is_empty() {
                continue;
            }

            let at = |e: RowFault| e.at(origin, line, Some(index + 1));
            let date = parse_date(&format!("{year}-{month}-{day}"), "%Y-%m-%d").map_err(at)?;
            let observation = if cell.is_empty() {
                RawObservation::missing(date)
            } else {
                RawObservation::present(date, parse_value(cell).map_err(at)?)
            };
            data.push(observation);
        }
    }

    // Rows are grouped by day of year, not by year.
    data.sort_by_key(|o| o.date);

    debug!(observations = data.len(), "Sea ice index parsed");
    Ok(data)
}

fn is_leap_day(month: &str, day: &str) -> bool {
    month.parse::<u32>() == Ok(2) && day.parse::<u32>() == Ok(29)
}
