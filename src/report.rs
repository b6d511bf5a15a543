//! Analysis report
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use itertools::Itertools;
use log::info;
use serde::{Serialize, Serializer};

use crate::{
    error::Error,
    evaluator::{EpochStatus, ResultRow},
    prelude::{Duration, Epoch, SV},
};

fn serialize_epoch<S: Serializer>(value: &Option<(usize, Epoch)>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some((index, epoch)) => (index, epoch.to_string()).serialize(s),
        None => s.serialize_none(),
    }
}

fn serialize_duration<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(dt) => s.serialize_some(&dt.to_seconds()),
        None => s.serialize_none(),
    }
}

/// Run level [Summary]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of rows
    pub total_epochs: usize,
    /// Epochs forwarded to the estimator
    pub evaluated_epochs: usize,
    /// Epochs skipped by lack of usable data
    pub skipped_epochs: usize,
    /// Converged epochs, correct or not
    pub converged_epochs: usize,
    /// Correctly converged epochs
    pub correct_epochs: usize,
    /// Wrongly converged epochs
    pub incorrect_epochs: usize,
    /// Number of times the estimator lost its fix
    pub deconvergences: usize,
    /// correct_epochs / total_epochs
    pub convergence_rate: f64,
    /// (index, [Epoch]) of first fix, correct or not
    #[serde(serialize_with = "serialize_epoch")]
    pub first_fix: Option<(usize, Epoch)>,
    /// (index, [Epoch]) of first correct convergence
    #[serde(serialize_with = "serialize_epoch")]
    pub first_convergence: Option<(usize, Epoch)>,
    /// Time from initialization to first correct convergence
    #[serde(rename = "time_to_convergence_s", serialize_with = "serialize_duration")]
    pub time_to_convergence: Option<Duration>,
}

fn format_ambiguities(ambiguities: &BTreeMap<SV, i64>) -> String {
    ambiguities
        .iter()
        .map(|(sv, n)| format!("{}:{}", sv, n))
        .join(" ")
}

#[derive(Serialize)]
struct JsonRow {
    epoch: String,
    index: usize,
    status: EpochStatus,
    satellites: usize,
    baseline: Option<[f64; 3]>,
    baseline_error_m: Option<f64>,
    ambiguities: BTreeMap<String, i64>,
    true_ambiguities: BTreeMap<String, i64>,
    converged: bool,
    converged_correctly: bool,
}

impl From<&ResultRow> for JsonRow {
    fn from(row: &ResultRow) -> Self {
        let labels = |map: &BTreeMap<SV, i64>| {
            map.iter()
                .map(|(sv, n)| (sv.to_string(), *n))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            epoch: row.epoch.to_string(),
            index: row.index,
            status: row.status,
            satellites: row.satellites,
            baseline: row.baseline.map(|b| [b[0], b[1], b[2]]),
            baseline_error_m: row.baseline_error_m,
            ambiguities: labels(&row.ambiguities),
            true_ambiguities: labels(&row.true_ambiguities),
            converged: row.converged,
            converged_correctly: row.converged_correctly,
        }
    }
}

#[derive(Serialize)]
struct CsvRow {
    epoch: String,
    index: usize,
    status: EpochStatus,
    satellites: usize,
    baseline_x_m: Option<f64>,
    baseline_y_m: Option<f64>,
    baseline_z_m: Option<f64>,
    baseline_error_m: Option<f64>,
    ambiguities: String,
    true_ambiguities: String,
    converged: bool,
    converged_correctly: bool,
}

impl From<&ResultRow> for CsvRow {
    fn from(row: &ResultRow) -> Self {
        Self {
            epoch: row.epoch.to_string(),
            index: row.index,
            status: row.status,
            satellites: row.satellites,
            baseline_x_m: row.baseline.map(|b| b[0]),
            baseline_y_m: row.baseline.map(|b| b[1]),
            baseline_z_m: row.baseline.map(|b| b[2]),
            baseline_error_m: row.baseline_error_m,
            ambiguities: format_ambiguities(&row.ambiguities),
            true_ambiguities: format_ambiguities(&row.true_ambiguities),
            converged: row.converged,
            converged_correctly: row.converged_correctly,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a Summary,
    rows: Vec<JsonRow>,
}

/// [Report] of one analysis run: one [ResultRow] per evaluated epoch,
/// in chronological order, and the run [Summary].
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub rows: Vec<ResultRow>,
    pub summary: Summary,
}

impl Report {
    pub fn new(rows: Vec<ResultRow>, summary: Summary) -> Self {
        Self { rows, summary }
    }

    /// [ResultRow] for this [Epoch]
    pub fn row(&self, epoch: Epoch) -> Option<&ResultRow> {
        self.rows.iter().find(|row| row.epoch == epoch)
    }

    /// Writes [Report] to file.
    /// - `.csv`: rows table, and the [Summary] in a `.summary.json` file next to it
    /// - otherwise: single JSON document
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();

        let csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if csv {
            self.to_csv(path)?;
            let summary_path = Self::summary_path(path);
            let mut fd = BufWriter::new(File::create(&summary_path)?);
            serde_json::to_writer_pretty(&mut fd, &self.summary)?;
            fd.flush()?;
        } else {
            let mut fd = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut fd, &self.json_report())?;
            fd.flush()?;
        }

        info!("{}: report generated", path.display());
        Ok(())
    }

    /// `<stem>.summary.json` file path, for `.csv` reports
    pub fn summary_path(path: &Path) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        path.with_file_name(format!("{}.summary.json", stem))
    }

    fn to_csv(&self, path: &Path) -> Result<(), Error> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in self.rows.iter() {
            writer.serialize(CsvRow::from(row))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn json_report(&self) -> JsonReport<'_> {
        JsonReport {
            summary: &self.summary,
            rows: self.rows.iter().map(JsonRow::from).collect(),
        }
    }

    /// JSON description of [Self]
    pub fn to_json(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::to_value(self.json_report())?)
    }
}
