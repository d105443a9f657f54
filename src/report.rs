//! Diagnostic report assembly
//!
//! `DiagnosticEngine` owns a shared reference to the loaded model artifact
//! and turns one validated reading into one [`DiagnosticReport`]: six rule
//! bands, one learned overall severity, one fault cause, one action string.
//!
//! The rule view and the learned view are computed independently from the
//! same reading and surfaced side by side — the engine never reconciles
//! them, so "all bands NORMAL but overall CRITICAL" is a legitimate report.

use std::sync::Arc;
use thiserror::Error;

use crate::forest::ForestArtifact;
use crate::rules::{classify_all, diagnose_fault};
use crate::types::{DiagnosticReport, OverallSeverity, SensorReading};

#[derive(Debug, Error)]
pub enum DiagnosticError {
    /// The reading violates the input domain. Rejected before any rule or
    /// classifier runs; no partial report is produced.
    #[error("invalid reading: {field} must be a non-negative number, got {value}")]
    InvalidReading { field: &'static str, value: f64 },

    /// The classifier emitted a label outside {0, 1, 2}. An internal
    /// invariant breach, not a machine state — the request aborts rather
    /// than mapping to a default severity.
    #[error("classifier returned label {0}, outside the valid range 0..=2")]
    ContractViolation(u8),
}

/// Stateless per-request assembler over the shared read-only artifact.
#[derive(Clone)]
pub struct DiagnosticEngine {
    artifact: Arc<ForestArtifact>,
}

impl DiagnosticEngine {
    pub fn new(artifact: Arc<ForestArtifact>) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &ForestArtifact {
        &self.artifact
    }

    /// Assemble the full diagnostic report for one reading.
    ///
    /// Pure given the reading and the frozen artifact: identical inputs
    /// produce bit-identical reports.
    pub fn assemble(&self, reading: &SensorReading) -> Result<DiagnosticReport, DiagnosticError> {
        if let Some((field, value)) = reading.first_invalid_field() {
            return Err(DiagnosticError::InvalidReading { field, value });
        }

        let [motor_current, oil_temperature, line_pressure, filter_delta_p, running_hours, vibration] =
            classify_all(reading);

        let raw_label = self.artifact.predict_label(&reading.feature_vector());
        let overall_severity = OverallSeverity::from_label(raw_label)
            .ok_or(DiagnosticError::ContractViolation(raw_label))?;

        let fault_cause = diagnose_fault(reading);

        tracing::debug!(
            overall = %overall_severity,
            cause = %fault_cause,
            "Assembled diagnostic report"
        );

        Ok(DiagnosticReport {
            motor_current,
            oil_temperature,
            line_pressure,
            filter_delta_p,
            running_hours,
            vibration,
            overall_severity,
            fault_cause,
            action: overall_severity.action().to_string(),
        })
    }
}
