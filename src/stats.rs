/// Tally of what happened to each primary row during a join.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JoinStats {
    pub primary_rows: usize,
    pub duplicate_dates: usize,
    pub missing_primary: usize,

    // one counter per auxiliary, in declaration order
    pub missing_auxiliary: Vec<usize>,

    pub out_of_range: usize,
    pub joined: usize,
}

impl JoinStats {
    pub fn with_auxiliaries(count: usize) -> Self {
        JoinStats {
            missing_auxiliary: vec![0; count],
            ..Default::default()
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Share of primary rows that made it into the output.
    pub fn joined_pct(&self) -> f64 {
        Self::pct(self.joined, self.primary_rows)
    }

    pub fn dropped(&self) -> usize {
        self.primary_rows - self.joined
    }
}
