// src/prediction/path.rs
//
// Swept-path prediction and the polar corridor test. The corridor length
// comes from a per-subsystem speed→stop-distance table; its width from the
// subsystem's configured machine width. Targets are tested in polar form
// because that is how the radar reports them.

use crate::geometry::wheel_angle_from_curvature;
use crate::prediction::ctrv::{predict_path, PathSample};
use crate::types::{Breakpoint, MachineConfig, PathConfig, VehicleState};
use std::f64::consts::FRAC_PI_2;
use tracing::warn;

pub const MPH_TO_MPS: f64 = 0.447;

/// Below this speed the vehicle cannot out-predict an obstacle; the
/// corridor test goes fully conservative.
const STOPPED_SPEED_MPS: f64 = 0.01;

/// The control preview uses a fixed time horizon instead of a stop-distance
/// lookup, and a unit-width ribbon (it visualizes the commanded trajectory,
/// not a safety corridor).
const CONTROL_HORIZON_S: f64 = 10.0;
const CONTROL_WIDTH_M: f64 = 1.0;
const CONTROL_MIN_SPEED_MPH: f64 = 0.5;

/// Which consumer the predicted corridor is for. Each carries its own
/// width, speed floor and stop-distance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    Vision,
    Predictive,
    Sync,
    Control,
}

impl Subsystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vision => "vision",
            Self::Predictive => "predictive",
            Self::Sync => "sync",
            Self::Control => "control",
        }
    }
}

/// Speed→distance lookup with linear interpolation between breakpoints.
/// Speeds below the table clamp to the first entry; speeds above it get the
/// last entry plus a diagnostic, never a failure.
fn lookup_stop_distance(table: &[Breakpoint], speed_mps: f64, subsystem: Subsystem) -> f64 {
    let speed_mph = speed_mps / MPH_TO_MPS;

    let first = table.first().expect("validated non-empty at startup");
    let last = table.last().expect("validated non-empty at startup");

    if speed_mph <= first.speed_mph {
        return first.distance_m;
    }
    if speed_mph > last.speed_mph {
        warn!(
            subsystem = subsystem.as_str(),
            speed_mph, "speed beyond stop-distance table, clamping to last breakpoint"
        );
        return last.distance_m;
    }

    for pair in table.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if speed_mph <= hi.speed_mph {
            let fraction = (speed_mph - lo.speed_mph) / (hi.speed_mph - lo.speed_mph);
            return lo.distance_m + fraction * (hi.distance_m - lo.distance_m);
        }
    }
    last.distance_m
}

/// Predicted swept path: centerline plus left/right boundaries offset half
/// a machine width perpendicular to the local yaw. Rebuilt from scratch on
/// every call.
#[derive(Debug, Clone)]
pub struct PredictedPath {
    pub center: Vec<PathSample>,
    pub left: Vec<(f64, f64)>,
    pub right: Vec<(f64, f64)>,
    /// The vehicle's actual speed when predicted (pre-floor), for the
    /// stopped-vehicle conservative branch.
    speed_mps: f64,
}

impl PredictedPath {
    /// Closed footprint polygon: left boundary forward, right boundary
    /// reversed, ring closed on the first vertex.
    pub fn footprint(&self) -> Vec<(f64, f64)> {
        let mut ring: Vec<(f64, f64)> = self.left.clone();
        ring.extend(self.right.iter().rev());
        if let Some(&head) = ring.first() {
            ring.push(head);
        }
        ring
    }

    /// Polar corridor test: is a target at (range, azimuth) inside the
    /// swept path? Boundary azimuths are taken from the sample with range
    /// closest to the target's on each side.
    pub fn is_unsafe(&self, range_m: f64, azimuth_rad: f64) -> bool {
        let phi = azimuth_rad.sin().atan2(azimuth_rad.cos());

        if self.speed_mps.abs() < STOPPED_SPEED_MPS {
            // Stopped or crawling: everything ahead is a hazard.
            return phi.abs() < FRAC_PI_2;
        }

        match (
            boundary_azimuth_at_range(&self.left, range_m),
            boundary_azimuth_at_range(&self.right, range_m),
        ) {
            (Some(left_phi), Some(right_phi)) => right_phi <= phi && phi <= left_phi,
            _ => false,
        }
    }
}

fn boundary_azimuth_at_range(boundary: &[(f64, f64)], range_m: f64) -> Option<f64> {
    boundary
        .iter()
        .map(|&(x, y)| (x.hypot(y), y.atan2(x)))
        .min_by(|a, b| {
            let da = (a.0 - range_m).abs();
            let db = (b.0 - range_m).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(_, phi)| phi)
}

pub struct PathPredictor {
    machine: MachineConfig,
    path: PathConfig,
}

impl PathPredictor {
    pub fn new(machine: MachineConfig, path: PathConfig) -> Self {
        Self { machine, path }
    }

    pub fn predict(&self, vehicle: &VehicleState, subsystem: Subsystem) -> PredictedPath {
        let (width_m, min_speed_mph) = match subsystem {
            Subsystem::Vision => (self.path.widths.vision, self.path.min_speed_mph.vision),
            // The predictive corridor is exactly one machine width wide
            Subsystem::Predictive => (
                self.machine.machine_width_m,
                self.path.min_speed_mph.predictive,
            ),
            Subsystem::Sync => (self.path.widths.sync, self.path.min_speed_mph.sync),
            Subsystem::Control => (CONTROL_WIDTH_M, CONTROL_MIN_SPEED_MPH),
        };

        let speed = vehicle.speed_mps.max(MPH_TO_MPS * min_speed_mph);
        let horizon_s = match subsystem {
            Subsystem::Control => CONTROL_HORIZON_S,
            Subsystem::Vision | Subsystem::Predictive | Subsystem::Sync => {
                let table = match subsystem {
                    Subsystem::Vision => &self.path.stop_tables.vision,
                    Subsystem::Predictive => &self.path.stop_tables.predictive,
                    _ => &self.path.stop_tables.sync,
                };
                let distance =
                    lookup_stop_distance(table, speed, subsystem) + self.machine.cabin_to_nose_m;
                distance / speed
            }
        };

        let steering = wheel_angle_from_curvature(vehicle.curvature, self.machine.wheelbase_m);
        let start = PathSample {
            x: vehicle.x,
            y: vehicle.y,
            yaw: vehicle.heading_rad,
        };
        let center = predict_path(
            &start,
            speed,
            steering,
            self.machine.wheelbase_m,
            horizon_s,
            self.path.n_steps,
        );

        let half_width = width_m / 2.0;
        let left = center
            .iter()
            .map(|s| {
                (
                    s.x + half_width * (s.yaw + FRAC_PI_2).cos(),
                    s.y + half_width * (s.yaw + FRAC_PI_2).sin(),
                )
            })
            .collect();
        let right = center
            .iter()
            .map(|s| {
                (
                    s.x + half_width * (s.yaw - FRAC_PI_2).cos(),
                    s.y + half_width * (s.yaw - FRAC_PI_2).sin(),
                )
            })
            .collect();

        PredictedPath {
            center,
            left,
            right,
            speed_mps: vehicle.speed_mps,
        }
    }
}
