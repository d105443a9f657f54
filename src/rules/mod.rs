//! Rule Engine Module
//!
//! Deterministic per-sensor severity classification. All functions here are
//! pure threshold logic — no ML involved, no shared state.
//!
//! Each classifier maps one raw reading to a [`SensorStatus`]. Branch order
//! and boundary inclusivity are load-bearing: bands are evaluated in the
//! written order and the first match wins (e.g. current = 60 is NORMAL,
//! 60.0001 is WARNING). Motor current and oil temperature have an ABNORMAL
//! gap zone not covered by any named band; the other four classifiers are
//! total over the non-negative domain.

pub mod fault;

pub use fault::diagnose_fault;

use crate::types::{SensorReading, SensorStatus, SeverityBand};

/// Classify motor current draw (A).
///
/// The `< 10` check runs before the named bands, so a near-zero current is
/// CRITICAL (drive train not loading) rather than ABNORMAL. The (10, 25)
/// gap between that check and the NORMAL band falls through to ABNORMAL.
pub fn current_status(current: f64) -> SensorStatus {
    if current < 10.0 {
        SensorStatus::with_qualifier(SeverityBand::Critical, "Belt / coupling / unload fault")
    } else if (25.0..=60.0).contains(&current) {
        SensorStatus::new(SeverityBand::Normal)
    } else if current > 60.0 && current <= 70.0 {
        SensorStatus::new(SeverityBand::Warning)
    } else if current > 70.0 {
        SensorStatus::new(SeverityBand::Critical)
    } else {
        SensorStatus::new(SeverityBand::Abnormal)
    }
}

/// Classify oil injection temperature (°C).
///
/// Below 60 °C falls outside every named band (cold machine, sensor fault,
/// or startup transient) and reports ABNORMAL.
pub fn temperature_status(temperature: f64) -> SensorStatus {
    if (60.0..=90.0).contains(&temperature) {
        SensorStatus::new(SeverityBand::Normal)
    } else if temperature > 90.0 && temperature <= 105.0 {
        SensorStatus::new(SeverityBand::Warning)
    } else if temperature > 105.0 {
        SensorStatus::with_qualifier(SeverityBand::Critical, "Overheating")
    } else {
        SensorStatus::new(SeverityBand::Abnormal)
    }
}

/// Classify discharge line pressure (bar). Total function: anything outside
/// the normal/warning envelope is CRITICAL (both under- and over-pressure).
pub fn pressure_status(pressure: f64) -> SensorStatus {
    if (2.8..=3.2).contains(&pressure) {
        SensorStatus::new(SeverityBand::Normal)
    } else if (2.4..2.8).contains(&pressure) || (pressure > 3.2 && pressure <= 3.6) {
        SensorStatus::new(SeverityBand::Warning)
    } else {
        SensorStatus::new(SeverityBand::Critical)
    }
}

/// Classify separator filter differential pressure (bar).
pub fn dp_status(dp: f64) -> SensorStatus {
    if dp <= 0.2 {
        SensorStatus::new(SeverityBand::Normal)
    } else if dp <= 0.5 {
        SensorStatus::with_qualifier(SeverityBand::Warning, "Filter clogging")
    } else {
        SensorStatus::with_qualifier(SeverityBand::Critical, "Filter choked")
    }
}

/// Classify running hours since last service.
pub fn run_hours_status(hours: u32) -> SensorStatus {
    if hours <= 2000 {
        SensorStatus::new(SeverityBand::Normal)
    } else if hours <= 3000 {
        SensorStatus::new(SeverityBand::Warning)
    } else {
        SensorStatus::with_qualifier(SeverityBand::Critical, "Service required")
    }
}

/// Classify airend vibration RMS (mm/s).
pub fn vibration_status(vibration: f64) -> SensorStatus {
    if vibration <= 4.0 {
        SensorStatus::new(SeverityBand::Normal)
    } else if vibration <= 7.0 {
        SensorStatus::new(SeverityBand::Warning)
    } else {
        SensorStatus::with_qualifier(SeverityBand::Critical, "High vibration")
    }
}

/// Run all six classifiers against one reading.
///
/// Returns statuses in feature-schema order: current, temperature, pressure,
/// dp, hours, vibration.
pub fn classify_all(reading: &SensorReading) -> [SensorStatus; 6] {
    [
        current_status(reading.motor_current_a),
        temperature_status(reading.oil_temperature_c),
        pressure_status(reading.line_pressure_bar),
        dp_status(reading.filter_delta_p_bar),
        run_hours_status(reading.running_hours),
        vibration_status(reading.vibration_mm_s),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(status: SensorStatus) -> SeverityBand {
        status.band
    }

    #[test]
    fn test_current_boundaries() {
        assert_eq!(band(current_status(9.999)), SeverityBand::Critical);
        assert_eq!(
            current_status(5.0).qualifier.as_deref(),
            Some("Belt / coupling / unload fault")
        );
        assert_eq!(band(current_status(10.0)), SeverityBand::Abnormal);
        assert_eq!(band(current_status(25.0)), SeverityBand::Normal);
        assert_eq!(band(current_status(60.0)), SeverityBand::Normal);
        assert_eq!(band(current_status(60.0001)), SeverityBand::Warning);
        assert_eq!(band(current_status(70.0)), SeverityBand::Warning);
        assert_eq!(band(current_status(70.0001)), SeverityBand::Critical);
    }

    #[test]
    fn test_current_gap_zone_is_abnormal() {
        assert_eq!(band(current_status(15.0)), SeverityBand::Abnormal);
        assert_eq!(band(current_status(20.0)), SeverityBand::Abnormal);
        assert_eq!(band(current_status(24.999)), SeverityBand::Abnormal);
    }

    #[test]
    fn test_temperature_boundaries() {
        assert_eq!(band(temperature_status(59.999)), SeverityBand::Abnormal);
        assert_eq!(band(temperature_status(60.0)), SeverityBand::Normal);
        assert_eq!(band(temperature_status(90.0)), SeverityBand::Normal);
        assert_eq!(band(temperature_status(90.0001)), SeverityBand::Warning);
        assert_eq!(band(temperature_status(105.0)), SeverityBand::Warning);
        assert_eq!(band(temperature_status(105.0001)), SeverityBand::Critical);
        assert_eq!(
            temperature_status(110.0).qualifier.as_deref(),
            Some("Overheating")
        );
    }

    #[test]
    fn test_pressure_boundaries() {
        assert_eq!(band(pressure_status(2.8)), SeverityBand::Normal);
        assert_eq!(band(pressure_status(3.2)), SeverityBand::Normal);
        assert_eq!(band(pressure_status(2.4)), SeverityBand::Warning);
        assert_eq!(band(pressure_status(2.7999)), SeverityBand::Warning);
        assert_eq!(band(pressure_status(3.6)), SeverityBand::Warning);
        assert_eq!(band(pressure_status(3.600001)), SeverityBand::Critical);
        assert_eq!(band(pressure_status(2.3999)), SeverityBand::Critical);
        assert_eq!(band(pressure_status(0.0)), SeverityBand::Critical);
    }

    #[test]
    fn test_dp_boundaries() {
        assert_eq!(band(dp_status(0.2)), SeverityBand::Normal);
        assert_eq!(band(dp_status(0.2001)), SeverityBand::Warning);
        assert_eq!(dp_status(0.3).qualifier.as_deref(), Some("Filter clogging"));
        assert_eq!(band(dp_status(0.5)), SeverityBand::Warning);
        assert_eq!(band(dp_status(0.5001)), SeverityBand::Critical);
        assert_eq!(dp_status(0.6).qualifier.as_deref(), Some("Filter choked"));
    }

    #[test]
    fn test_run_hours_boundaries() {
        assert_eq!(band(run_hours_status(0)), SeverityBand::Normal);
        assert_eq!(band(run_hours_status(2000)), SeverityBand::Normal);
        assert_eq!(band(run_hours_status(2001)), SeverityBand::Warning);
        assert_eq!(band(run_hours_status(3000)), SeverityBand::Warning);
        assert_eq!(band(run_hours_status(3001)), SeverityBand::Critical);
        assert_eq!(
            run_hours_status(5000).qualifier.as_deref(),
            Some("Service required")
        );
    }

    #[test]
    fn test_vibration_boundaries() {
        assert_eq!(band(vibration_status(4.0)), SeverityBand::Normal);
        assert_eq!(band(vibration_status(4.0001)), SeverityBand::Warning);
        assert_eq!(band(vibration_status(7.0)), SeverityBand::Warning);
        assert_eq!(band(vibration_status(7.0001)), SeverityBand::Critical);
        assert_eq!(
            vibration_status(9.0).qualifier.as_deref(),
            Some("High vibration")
        );
    }

    #[test]
    fn test_classify_all_order() {
        let reading = SensorReading {
            motor_current_a: 65.0,
            oil_temperature_c: 95.0,
            line_pressure_bar: 2.6,
            filter_delta_p_bar: 0.3,
            running_hours: 1000,
            vibration_mm_s: 5.0,
        };
        let statuses = classify_all(&reading);
        assert_eq!(statuses[0].band, SeverityBand::Warning); // current 65
        assert_eq!(statuses[1].band, SeverityBand::Warning); // temp 95
        assert_eq!(statuses[2].band, SeverityBand::Warning); // pressure 2.6
        assert_eq!(statuses[3].band, SeverityBand::Warning); // dp 0.3
        assert_eq!(statuses[4].band, SeverityBand::Normal); // hours 1000
        assert_eq!(statuses[5].band, SeverityBand::Warning); // vibration 5
    }
}
