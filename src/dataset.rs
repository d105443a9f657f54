//! Training dataset ingestion from CSV files, plus a synthetic generator
//! for benches and tests.
//!
//! Expected CSV header (column order is free, lookup is by name):
//! Motor_Current_A,Oil_Temperature_C,Line_Pressure_bar,Filter_DeltaP_bar,Running_Hours,Vibration_RMS_mm_s,Label

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

use crate::types::{FEATURE_NAMES, NUM_FEATURES};

/// Column holding the 0/1/2 severity label.
pub const LABEL_COLUMN: &str = "Label";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error reading dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset has no header line")]
    MissingHeader,

    #[error("dataset is missing required column: {0}")]
    MissingColumn(String),

    #[error("line {line}: cannot parse {column} as a number: '{value}'")]
    BadValue {
        line: usize,
        column: String,
        value: String,
    },

    #[error("line {line}: label {value} is outside the valid range 0..=2")]
    BadLabel { line: usize, value: String },

    #[error("dataset contains no data rows")]
    Empty,
}

/// In-memory labeled dataset with the six features in schema order.
#[derive(Debug, Clone, Default)]
pub struct LabeledDataset {
    pub features: Vec<[f64; NUM_FEATURES]>,
    pub labels: Vec<u8>,
}

impl LabeledDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Per-class row counts, for the training log.
    pub fn label_distribution(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for &label in &self.labels {
            if (label as usize) < 3 {
                counts[label as usize] += 1;
            }
        }
        counts
    }
}

/// Load a labeled dataset from a CSV file.
///
/// The header must contain all six feature columns plus `Label`; extra
/// columns are ignored. Any malformed row fails the whole load — a silently
/// truncated training set is worse than no model.
pub fn load_csv(path: &Path) -> Result<LabeledDataset, DatasetError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = lines.next().ok_or(DatasetError::MissingHeader)??;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();

    let mut feature_cols = [0usize; NUM_FEATURES];
    for (slot, name) in FEATURE_NAMES.iter().enumerate() {
        feature_cols[slot] = columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DatasetError::MissingColumn((*name).to_string()))?;
    }
    let label_col = columns
        .iter()
        .position(|c| *c == LABEL_COLUMN)
        .ok_or_else(|| DatasetError::MissingColumn(LABEL_COLUMN.to_string()))?;

    let mut dataset = LabeledDataset::default();
    for (offset, line) in lines.enumerate() {
        let line_num = offset + 2; // 1-based, after the header
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let mut row = [0.0f64; NUM_FEATURES];
        for (slot, &col) in feature_cols.iter().enumerate() {
            let raw = fields.get(col).copied().unwrap_or("");
            row[slot] = raw.parse::<f64>().map_err(|_| DatasetError::BadValue {
                line: line_num,
                column: FEATURE_NAMES[slot].to_string(),
                value: raw.to_string(),
            })?;
        }

        let raw_label = fields.get(label_col).copied().unwrap_or("");
        let label = raw_label
            .parse::<u8>()
            .ok()
            .filter(|l| *l <= 2)
            .ok_or_else(|| DatasetError::BadLabel {
                line: line_num,
                value: raw_label.to_string(),
            })?;

        dataset.features.push(row);
        dataset.labels.push(label);
    }

    if dataset.is_empty() {
        return Err(DatasetError::Empty);
    }

    let dist = dataset.label_distribution();
    tracing::info!(
        rows = dataset.len(),
        normal = dist[0],
        warning = dist[1],
        critical = dist[2],
        path = %path.display(),
        "Loaded training dataset"
    );
    Ok(dataset)
}

// ============================================================================
// Synthetic data generation
// ============================================================================

/// Generate a synthetic labeled dataset spanning the three machine regimes.
///
/// Rows are drawn from class-conditional ranges that mirror the rule-engine
/// bands, so a trained forest separates them cleanly. Classes are balanced
/// (n is rounded down to a multiple of 3) and generation is deterministic
/// given the seed.
pub fn generate_synthetic(n: usize, seed: u64) -> LabeledDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let per_class = n / 3;
    let mut dataset = LabeledDataset::default();

    for class in 0u8..3 {
        for _ in 0..per_class {
            let row = match class {
                0 => normal_row(&mut rng),
                1 => warning_row(&mut rng),
                _ => critical_row(&mut rng),
            };
            dataset.features.push(row);
            dataset.labels.push(class);
        }
    }

    tracing::debug!(rows = dataset.len(), seed, "Generated synthetic dataset");
    dataset
}

fn normal_row(rng: &mut StdRng) -> [f64; NUM_FEATURES] {
    [
        rng.gen_range(30.0..55.0),   // current well inside [25, 60]
        rng.gen_range(65.0..85.0),   // temperature inside [60, 90]
        rng.gen_range(2.85..3.15),   // pressure inside [2.8, 3.2]
        rng.gen_range(0.02..0.18),   // dp below 0.2
        rng.gen_range(100.0..1800.0_f64).round(), // hours below 2000
        rng.gen_range(0.5..3.5),     // vibration below 4
    ]
}

fn warning_row(rng: &mut StdRng) -> [f64; NUM_FEATURES] {
    [
        rng.gen_range(61.0..69.0),
        rng.gen_range(91.0..104.0),
        rng.gen_range(2.45..2.75),
        rng.gen_range(0.22..0.45),
        rng.gen_range(2100.0..2900.0_f64).round(),
        rng.gen_range(4.2..6.8),
    ]
}

fn critical_row(rng: &mut StdRng) -> [f64; NUM_FEATURES] {
    // Under-pressure and over-pressure faults both occur in the field.
    let pressure = if rng.gen_bool(0.5) {
        rng.gen_range(1.5..2.3)
    } else {
        rng.gen_range(3.7..4.5)
    };
    [
        rng.gen_range(72.0..95.0),
        rng.gen_range(106.0..125.0),
        pressure,
        rng.gen_range(0.55..0.9),
        rng.gen_range(3100.0..6000.0_f64).round(),
        rng.gen_range(7.5..12.0),
    ]
}
