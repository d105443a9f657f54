//! Shared data structures for the compressor diagnostic pipeline
//!
//! This module defines the core types flowing through a diagnosis:
//! - `SensorReading`: the six-field snapshot supplied by the caller
//! - `SeverityBand` / `SensorStatus`: per-sensor rule classification
//! - `OverallSeverity`: machine-wide label from the learned classifier
//! - `FaultCause`: heuristic root-cause guess
//! - `DiagnosticReport`: the assembled response

use serde::{Deserialize, Serialize};

// ============================================================================
// Feature schema (shared by the rule engine, trainer, and artifact)
// ============================================================================

/// Number of input features / sensors.
pub const NUM_FEATURES: usize = 6;

/// Feature names in the fixed order the trained artifact expects.
///
/// These match the column names of the training dataset; the artifact loader
/// rejects any model whose recorded schema differs from this list.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "Motor_Current_A",
    "Oil_Temperature_C",
    "Line_Pressure_bar",
    "Filter_DeltaP_bar",
    "Running_Hours",
    "Vibration_RMS_mm_s",
];

// ============================================================================
// Sensor reading (inbound)
// ============================================================================

/// One snapshot of the six monitored compressor sensors.
///
/// All fields are non-negative; `DiagnosticEngine` rejects readings that
/// violate this before any rule or classifier runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Motor current draw (A)
    pub motor_current_a: f64,
    /// Oil injection temperature (°C)
    pub oil_temperature_c: f64,
    /// Discharge line pressure (bar)
    pub line_pressure_bar: f64,
    /// Pressure drop across the separator filter (bar)
    pub filter_delta_p_bar: f64,
    /// Hours run since last service
    pub running_hours: u32,
    /// Airend vibration RMS (mm/s)
    pub vibration_mm_s: f64,
}

impl SensorReading {
    /// Flatten into the fixed-order feature vector consumed by the
    /// learned classifier. Order matches [`FEATURE_NAMES`].
    pub fn feature_vector(&self) -> [f64; NUM_FEATURES] {
        [
            self.motor_current_a,
            self.oil_temperature_c,
            self.line_pressure_bar,
            self.filter_delta_p_bar,
            f64::from(self.running_hours),
            self.vibration_mm_s,
        ]
    }

    /// Return the first field violating the non-negativity domain, if any.
    ///
    /// NaN counts as a violation — a NaN reading would silently fall
    /// through every threshold comparison.
    pub fn first_invalid_field(&self) -> Option<(&'static str, f64)> {
        let checks = [
            ("motor_current_a", self.motor_current_a),
            ("oil_temperature_c", self.oil_temperature_c),
            ("line_pressure_bar", self.line_pressure_bar),
            ("filter_delta_p_bar", self.filter_delta_p_bar),
            ("vibration_mm_s", self.vibration_mm_s),
        ];
        checks
            .into_iter()
            .find(|&(_, v)| !(v.is_finite() && v >= 0.0))
    }
}

// ============================================================================
// Per-sensor severity (rule engine output)
// ============================================================================

/// One sensor's individual health classification.
///
/// `Abnormal` is a gap state, not a measured severity: it marks readings
/// that fall between the named bands (motor current in (10, 25), oil
/// temperature below 60) and signals an undefined-zone reading rather than
/// a genuine fault.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SeverityBand {
    Normal,
    Warning,
    Critical,
    Abnormal,
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityBand::Normal => write!(f, "NORMAL"),
            SeverityBand::Warning => write!(f, "WARNING"),
            SeverityBand::Critical => write!(f, "CRITICAL"),
            SeverityBand::Abnormal => write!(f, "ABNORMAL"),
        }
    }
}

/// A severity band plus the optional qualifier the rule attaches to it
/// (e.g. CRITICAL "Overheating").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorStatus {
    pub band: SeverityBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
}

impl SensorStatus {
    pub fn new(band: SeverityBand) -> Self {
        Self {
            band,
            qualifier: None,
        }
    }

    pub fn with_qualifier(band: SeverityBand, qualifier: &str) -> Self {
        Self {
            band,
            qualifier: Some(qualifier.to_string()),
        }
    }
}

impl std::fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{} ({})", self.band, q),
            None => write!(f, "{}", self.band),
        }
    }
}

// ============================================================================
// Overall severity (learned classifier output)
// ============================================================================

/// Machine-wide severity produced by the learned classifier.
///
/// Exactly three members — the classifier never emits `Abnormal`. The
/// mapping from raw label to this enum is total over {0, 1, 2}; anything
/// else is a contract violation, not a diagnostic outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OverallSeverity {
    Normal,
    Warning,
    Critical,
}

impl OverallSeverity {
    /// Map a raw classifier label to a severity. Returns `None` for labels
    /// outside {0, 1, 2} so the caller can surface the contract breach.
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(OverallSeverity::Normal),
            1 => Some(OverallSeverity::Warning),
            2 => Some(OverallSeverity::Critical),
            _ => None,
        }
    }

    /// The raw label this severity carries in the training data.
    pub fn label(self) -> u8 {
        match self {
            OverallSeverity::Normal => 0,
            OverallSeverity::Warning => 1,
            OverallSeverity::Critical => 2,
        }
    }

    /// Operator-facing action derived from this severity alone.
    pub fn action(self) -> &'static str {
        match self {
            OverallSeverity::Normal => "Machine operating normally.",
            OverallSeverity::Warning => "Monitor machine closely.",
            OverallSeverity::Critical => "Immediate maintenance required!",
        }
    }
}

impl std::fmt::Display for OverallSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallSeverity::Normal => write!(f, "NORMAL"),
            OverallSeverity::Warning => write!(f, "WARNING"),
            OverallSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ============================================================================
// Fault cause (heuristic inference output)
// ============================================================================

/// Coarse root-cause guess, independent of the severity bands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FaultCause {
    #[serde(rename = "Air leak or Airend wear")]
    AirLeakOrAirendWear,
    #[serde(rename = "Filter choking")]
    FilterChoking,
    #[serde(rename = "Bearing or alignment issue")]
    BearingOrAlignment,
    #[serde(rename = "No specific fault detected")]
    NoSpecificFault,
}

impl FaultCause {
    pub fn as_str(self) -> &'static str {
        match self {
            FaultCause::AirLeakOrAirendWear => "Air leak or Airend wear",
            FaultCause::FilterChoking => "Filter choking",
            FaultCause::BearingOrAlignment => "Bearing or alignment issue",
            FaultCause::NoSpecificFault => "No specific fault detected",
        }
    }
}

impl std::fmt::Display for FaultCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Diagnostic report (outbound)
// ============================================================================

/// The assembled diagnosis for one reading.
///
/// The six per-sensor statuses and the learned overall severity are two
/// independent views of the same reading. They are presented side by side
/// and never reconciled — all-NORMAL bands next to a CRITICAL overall
/// severity is a valid report, not an inconsistency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub motor_current: SensorStatus,
    pub oil_temperature: SensorStatus,
    pub line_pressure: SensorStatus,
    pub filter_delta_p: SensorStatus,
    pub running_hours: SensorStatus,
    pub vibration: SensorStatus,
    pub overall_severity: OverallSeverity,
    pub fault_cause: FaultCause,
    pub action: String,
}

impl std::fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Motor Current   : {}", self.motor_current)?;
        writeln!(f, "Oil Temperature : {}", self.oil_temperature)?;
        writeln!(f, "Line Pressure   : {}", self.line_pressure)?;
        writeln!(f, "Filter dP       : {}", self.filter_delta_p)?;
        writeln!(f, "Running Hours   : {}", self.running_hours)?;
        writeln!(f, "Vibration       : {}", self.vibration)?;
        writeln!(f, "Overall Status  : {}", self.overall_severity)?;
        writeln!(f, "Likely Cause    : {}", self.fault_cause)?;
        write!(f, "Action          : {}", self.action)
    }
}
