//! NOAA Global Summary of the Day exports.
//!
//! Mean temperature is reported in degrees Fahrenheit, padded with spaces.
//! <https://www.ncei.noaa.gov/access/search/data-search/global-summary-of-the-day>

use std::path::Path;

use super::station::{StationLayout, read_station};
use crate::error::SourceError;
use crate::observation::RawObservation;

pub const GSOD: StationLayout = StationLayout {
    date_column: 1,
    date_format: "%Y-%m-%d",
    value_column: 2,
    empty_is_missing: false,
    convert: fahrenheit_to_celsius,
};

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Reads a GSOD export, converting temperatures to degrees Celsius.
pub fn read_gsod(path: &Path) -> Result<Vec<RawObservation>, SourceError> {
    read_station(path, &GSOD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::parse_station;

    #[test]
    fn test_freezing_point() {
        assert_eq!(fahrenheit_to_celsius(32.0), 0.0);
        assert!((fahrenheit_to_celsius(212.0) - 100.0).abs() < 1e-12);
        assert!((fahrenheit_to_celsius(-40.0) + 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_padded_fahrenheit_is_trimmed_and_converted() {
        let input = "\"STATION\",\"DATE\",\"TEMP\"\n\
                     \"32583099999\",\"2020-01-01\",\"   32.0\"\n\
                     \"32583099999\",\"2020-01-02\",\"  14.0 \"\n";
        let data = parse_station(input.as_bytes(), Path::new("yelizovo.csv"), &GSOD).unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data[0].value, 0.0);
        assert!(!data[0].missing);
        assert!((data[1].value + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_read_gsod_missing_file() {
        let err = read_gsod(Path::new("no/such/yelizovo.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
    }
}
