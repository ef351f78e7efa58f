// src/filter/mod.rs
//
// Radar obstacle validation.
//
// Signal flow per cycle:
//   TargetReading[] → RadarTargetFilter::process_cycle
//     per target: TargetQueueState::update_state (4-way classification)
//                 → lateral cutoff (in sync) → queue window check
//     then: close_cycle synthesizes missing readings for silent channels
//
// A target is trusted only when it shows both plausible per-sample quality
// and spatially consistent motion across a short temporal window.

pub mod queue;
pub mod radar;

pub use queue::{MeasurementClass, TargetQueueState};
pub use radar::{RadarTargetFilter, ValidatedTarget};
