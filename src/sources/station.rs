//! Weather-station exports with one row per day and fixed column positions.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::{field, open, parse_date, parse_value, reader_with_header, records, slurp};
use crate::error::{RowFault, SourceError};
use crate::observation::RawObservation;

/// Where a station export keeps its date and value, and how to read them.
#[derive(Debug, Clone, Copy)]
pub struct StationLayout {
    /// 0-based field holding the date.
    pub date_column: usize,
    /// `chrono` format of the date field.
    pub date_format: &'static str,
    /// 0-based field holding the value.
    pub value_column: usize,
    /// An empty value cell marks a missing reading instead of an error.
    pub empty_is_missing: bool,
    /// Conversion applied to every parsed value.
    pub convert: fn(f64) -> f64,
}

/// Taiwan CWA daily summary (<https://github.com/Raingel/historical_weather>).
pub const TAIWAN_CWA: StationLayout = StationLayout {
    date_column: 0,
    date_format: "%Y-%m-%d",
    value_column: 7,
    empty_is_missing: false,
    convert: identity,
};

/// JMA station download (<https://www.data.jma.go.jp/gmd/risk/obsdl/index.php>).
pub const JMA: StationLayout = StationLayout {
    date_column: 0,
    date_format: "%m/%d/%Y",
    value_column: 1,
    empty_is_missing: true,
    convert: identity,
};

fn identity(v: f64) -> f64 {
    v
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_station(
    path: &Path,
    layout: &StationLayout,
) -> Result<Vec<RawObservation>, SourceError> {
    let file = open(path)?;
    parse_station(file, path, layout)
}

/// Parses a station export in file order.
pub fn parse_station<R: Read>(
    input: R,
    origin: &Path,
    layout: &StationLayout,
) -> Result<Vec<RawObservation>, SourceError> {
    let bytes = slurp(input, origin)?;
    let mut reader = reader_with_header(&bytes, origin)?;
    let mut data = Vec::new();

    for row in records(&mut reader, &bytes, origin) {
        let (line, record) = row?;

        let date_at = |e: RowFault| e.at(origin, line, Some(layout.date_column + 1));
        let date = field(&record, layout.date_column)
            .and_then(|s| parse_date(s, layout.date_format))
            .map_err(date_at)?;

        let value_at = |e: RowFault| e.at(origin, line, Some(layout.value_column + 1));
        let raw = field(&record, layout.value_column).map_err(value_at)?;
        let observation = if raw.is_empty() && layout.empty_is_missing {
            RawObservation::missing(date)
        } else {
            let v = parse_value(raw).map_err(value_at)?;
            RawObservation::present(date, (layout.convert)(v))
        };
        data.push(observation);
    }

    debug!(observations = data.len(), "Station export parsed");
    Ok(data)
}
