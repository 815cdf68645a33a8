use chrono::NaiveDate;

/// One source's reading for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawObservation {
    pub date: NaiveDate,
    pub value: f64,
    pub missing: bool,
}

impl RawObservation {
    pub fn present(date: NaiveDate, value: f64) -> Self {
        RawObservation {
            date,
            value,
            missing: false,
        }
    }

    /// A day the source lists but has no reading for.
    pub fn missing(date: NaiveDate) -> Self {
        RawObservation {
            date,
            value: 0.0,
            missing: true,
        }
    }

    /// The reading, unless the source flagged it missing.
    pub fn reading(&self) -> Option<f64> {
        (!self.missing).then_some(self.value)
    }
}
