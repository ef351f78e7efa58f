// src/error.rs

use thiserror::Error;

/// Result type for safety-core operations
pub type SafetyResult<T> = Result<T, SafetyError>;

/// Errors from the geodetic/frame conversion layer.
///
/// A failed conversion means the sample's position is unusable; callers skip
/// that sample and keep processing the rest of the cycle. Substituting (0, 0)
/// would place a phantom object on top of the tractor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// UTM zone designator could not be parsed (expected e.g. "14T")
    #[error("invalid UTM zone designator: {0:?}")]
    InvalidUtmZone(String),

    /// Latitude/longitude outside the UTM-convertible range
    #[error("coordinate out of range: lat={lat}, lon={lon}")]
    CoordinateOutOfRange { lat: f64, lon: f64 },
}

/// Errors that can occur in the safety core.
///
/// Configuration variants are fatal at startup: the host monitor treats any
/// of them as "no safety guarantee" and refuses to operate.
#[derive(Error, Debug)]
pub enum SafetyError {
    /// Queue filter cannot confirm anything with a zero-length window
    #[error("radar queue length must be at least 1")]
    ZeroQueueLength,

    /// In-sync look-back window larger than the queue itself
    #[error("sync look-back {lookback} exceeds queue length {queue_length}")]
    SyncLookbackTooLong { lookback: usize, queue_length: usize },

    /// Speed threshold table has no breakpoints
    #[error("speed threshold table '{0}' is empty")]
    EmptyThresholdTable(String),

    /// Speed threshold table breakpoints not in ascending speed order
    #[error("speed threshold table '{0}' breakpoints must be ascending in speed")]
    UnsortedThresholdTable(String),

    /// Some other invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Geodetic conversion failure
    #[error(transparent)]
    Geo(#[from] GeoError),
}
