// src/prediction/mod.rs
//
// Forward-path prediction: CTRV kinematic integration builds the swept-path
// centerline, the predictor widens it into a corridor sized by the active
// subsystem's stop-distance table, and the corridor test classifies polar
// radar targets as in-path or clear.

pub mod ctrv;
pub mod path;

pub use ctrv::{predict_path, predict_position, PathSample};
pub use path::{PathPredictor, PredictedPath, Subsystem, MPH_TO_MPS};
