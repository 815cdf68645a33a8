//! Reads every source, joins them on the Taiwan daily series and writes the
//! merged CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::join::{DateIndex, LowerBound, join};
use crate::output::{Column, NumberFormat, write_records};
use crate::sources::{JMA, TAIWAN_CWA, read_gsod, read_sea_ice_index, read_station};
use crate::stats::JoinStats;

pub const DANSHUI_FILE: &str = "danshui.csv";
pub const OKHOTSK_FILE: &str = "okhotsk.csv";
pub const KATSUURA_FILE: &str = "katsuura.csv";
pub const NEMURO_FILE: &str = "nemuro.csv";
pub const YELIZOVO_FILE: &str = "yelizovo.csv";

/// Danshui readings below this are sensor faults, not weather.
pub const MIN_DANSHUI_TEMPERATURE: f64 = -90.0;

/// Output columns, primary first, then auxiliaries in join order.
pub const COLUMNS: [Column; 5] = [
    Column {
        name: "danshui",
        format: NumberFormat::Shortest,
    },
    Column {
        name: "okhotsk",
        format: NumberFormat::Shortest,
    },
    Column {
        name: "katsuura",
        format: NumberFormat::Shortest,
    },
    Column {
        name: "nemuro",
        format: NumberFormat::Shortest,
    },
    Column {
        name: "yelizovo",
        format: NumberFormat::Fixed(1),
    },
];

/// Where the sources are read from and the merged file goes.
#[derive(Debug, Clone)]
pub struct Layout {
    pub data_dir: PathBuf,
    pub output: PathBuf,
}

impl Layout {
    pub fn source(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}

/// Runs the whole clean-up, stopping at the first error.
#[tracing::instrument(skip_all, fields(data_dir = %layout.data_dir.display()))]
pub fn run(layout: &Layout) -> Result<JoinStats> {
    let okhotsk = read_sea_ice_index(&layout.source(OKHOTSK_FILE))
        .context("reading Okhotsk sea ice extent")?;
    let danshui = read_station(&layout.source(DANSHUI_FILE), &TAIWAN_CWA)
        .context("reading Danshui station")?;
    let katsuura =
        read_station(&layout.source(KATSUURA_FILE), &JMA).context("reading Katsuura station")?;
    let nemuro =
        read_station(&layout.source(NEMURO_FILE), &JMA).context("reading Nemuro station")?;
    let yelizovo =
        read_gsod(&layout.source(YELIZOVO_FILE)).context("reading Yelizovo station")?;

    info!(
        okhotsk = okhotsk.len(),
        danshui = danshui.len(),
        katsuura = katsuura.len(),
        nemuro = nemuro.len(),
        yelizovo = yelizovo.len(),
        "Sources loaded"
    );

    let auxiliaries = [
        DateIndex::new(COLUMNS[1].name, &okhotsk),
        DateIndex::new(COLUMNS[2].name, &katsuura),
        DateIndex::new(COLUMNS[3].name, &nemuro),
        DateIndex::new(COLUMNS[4].name, &yelizovo),
    ];
    let bounds = [LowerBound::primary(MIN_DANSHUI_TEMPERATURE)];

    let (records, stats) = join(&danshui, &auxiliaries, &bounds);
    log_stats(&stats, &auxiliaries);

    write_records(&layout.output, &COLUMNS, &records)
        .with_context(|| format!("writing merged CSV to {}", layout.output.display()))?;

    info!(output = %layout.output.display(), rows = records.len(), "Merged CSV written");
    Ok(stats)
}

fn log_stats(stats: &JoinStats, auxiliaries: &[DateIndex]) {
    for (aux, missing) in auxiliaries.iter().zip(&stats.missing_auxiliary) {
        info!(source = aux.name(), indexed = aux.len(), missing, "Auxiliary coverage");
    }
    info!(
        primary_rows = stats.primary_rows,
        duplicate_dates = stats.duplicate_dates,
        missing_primary = stats.missing_primary,
        out_of_range = stats.out_of_range,
        joined = stats.joined,
        joined_pct = stats.joined_pct(),
        "Join complete"
    );
}
