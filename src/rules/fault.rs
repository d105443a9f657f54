//! Fault-cause inference
//!
//! A prioritized heuristic over the raw readings, not the computed bands.
//! The thresholds here are deliberately coarser than the per-sensor rules —
//! this is a separate diagnostic signal, never derived from the severity
//! bands and never combined with them.

use crate::types::{FaultCause, SensorReading};

/// Infer the most likely physical fault from a reading.
///
/// First matching rule wins; exactly one cause is returned:
/// 1. high current + low pressure → air leak or airend wear
/// 2. hot oil + elevated filter dP → filter choking
/// 3. high current + elevated vibration → bearing or alignment issue
pub fn diagnose_fault(reading: &SensorReading) -> FaultCause {
    if reading.motor_current_a > 60.0 && reading.line_pressure_bar < 2.8 {
        FaultCause::AirLeakOrAirendWear
    } else if reading.oil_temperature_c > 90.0 && reading.filter_delta_p_bar > 0.2 {
        FaultCause::FilterChoking
    } else if reading.motor_current_a > 60.0 && reading.vibration_mm_s > 4.0 {
        FaultCause::BearingOrAlignment
    } else {
        FaultCause::NoSpecificFault
    }
}
