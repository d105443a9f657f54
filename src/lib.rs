//! Compressor Sentinel: rotary-screw compressor health diagnostics
//!
//! Two independent views over one six-sensor reading:
//!
//! - **Rule engine**: deterministic per-sensor severity bands plus a
//!   prioritized fault-cause heuristic
//! - **Learned classifier**: a frozen bagged-tree artifact mapping the full
//!   feature vector to one overall severity
//!
//! The report assembler runs both and presents them side by side without
//! reconciling them. Training lives behind the artifact boundary: the
//! serving path only ever loads and queries a published model.

pub mod api;
pub mod config;
pub mod dataset;
pub mod forest;
pub mod report;
pub mod rules;
pub mod types;

// Re-export the core types
pub use types::{
    DiagnosticReport, FaultCause, OverallSeverity, SensorReading, SensorStatus, SeverityBand,
    FEATURE_NAMES, NUM_FEATURES,
};

// Re-export the engine and its errors
pub use report::{DiagnosticEngine, DiagnosticError};

// Re-export the classifier artifact boundary
pub use forest::{ArtifactError, ForestArtifact, ForestParams, RandomForest};

// Re-export configuration
pub use config::SentinelConfig;
