use serde::{Deserialize, Serialize};

/// The radar reports a fixed channel set every cycle.
pub const RADAR_CHANNELS: u32 = 48;

/// One radar detection for a single channel id.
///
/// `consecutive_hits < 1` marks a default/missing reading — the channel
/// reported nothing real this cycle and every other field is meaningless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetReading {
    pub target_id: u32,
    pub range_m: f64,
    pub azimuth_rad: f64,
    pub existence_prob: f64,
    pub power_db: f64,
    pub azimuth_std: f64,
    pub consecutive_hits: i32,
}

impl TargetReading {
    /// Default reading for a channel that reported nothing this cycle.
    pub fn missing(target_id: u32) -> Self {
        Self {
            target_id,
            range_m: 0.0,
            azimuth_rad: 0.0,
            existence_prob: 0.0,
            power_db: 0.0,
            azimuth_std: 0.0,
            consecutive_hits: 0,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.consecutive_hits < 1
    }
}

/// Current kinematic state of the tractor in its local frame.
///
/// The tractor is the frame origin, so `x`/`y`/`heading_rad` are usually
/// zero; they are carried so a host with a different reference can still use
/// the predictor unchanged.
#[derive(Debug, Clone, Copy)]
pub struct VehicleState {
    pub speed_mps: f64,
    /// Commanded/measured path curvature, 1/m. Steering wheel angle is
    /// derived via `wheel_angle_from_curvature`.
    pub curvature: f64,
    pub x: f64,
    pub y: f64,
    pub heading_rad: f64,
}

impl VehicleState {
    pub fn at_origin(speed_mps: f64, curvature: f64) -> Self {
        Self {
            speed_mps,
            curvature,
            x: 0.0,
            y: 0.0,
            heading_rad: 0.0,
        }
    }
}

/// Vehicle coordination mode flags, read-only input from the sync subsystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncStatus {
    pub in_sync: bool,
    pub running_sync: bool,
    pub at_sync_point: bool,
}

/// Per-sample quality gates for one filter mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub consecutive_min: i32,
    pub existence_min: f64,
    pub power_db_min: f64,
    pub azimuth_std_max: f64,
    pub step_max_m: f64,
}

impl ThresholdSet {
    /// True if the reading passes every per-sample quality gate.
    /// Comparison directions match the radar vendor's recommended cuts.
    pub fn passes(&self, reading: &TargetReading) -> bool {
        reading.consecutive_hits >= self.consecutive_min
            && reading.existence_prob >= self.existence_min
            && reading.power_db > self.power_db_min
            && reading.azimuth_std < self.azimuth_std_max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub machine: MachineConfig,
    pub radar: RadarConfig,
    pub path: PathConfig,
    pub combine: CombineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfig {
    pub wheelbase_m: f64,
    pub machine_width_m: f64,
    /// Radar is nose-mounted; ranges are measured from the nose while the
    /// path frame origin sits at the cabin.
    pub cabin_to_nose_m: f64,
    pub gps_to_rear_axle_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarConfig {
    /// Bounded step-history capacity per target (ring eviction).
    pub queue_length: usize,
    /// Shorter confirmation window used while in sync.
    pub sync_lookback: usize,
    /// Lateral field-of-view cutoff while in sync, meters.
    pub sync_lateral_cutoff_m: f64,
    pub thresholds: ThresholdSet,
    /// Tighter gates active while in sync.
    pub sync_thresholds: ThresholdSet,
}

impl RadarConfig {
    pub fn active_thresholds(&self, in_sync: bool) -> &ThresholdSet {
        if in_sync {
            &self.sync_thresholds
        } else {
            &self.thresholds
        }
    }

    /// Number of recent steps the queue filter examines.
    pub fn lookback(&self, in_sync: bool) -> usize {
        if in_sync {
            self.sync_lookback
        } else {
            self.queue_length
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// CTRV integration sample count (path has n_steps + 1 points).
    pub n_steps: usize,
    pub widths: PathWidths,
    pub min_speed_mph: MinSpeeds,
    pub stop_tables: StopTables,
}

/// Corridor width per subsystem, meters. The predictive subsystem has no
/// entry here: its corridor is exactly one machine width.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathWidths {
    pub vision: f64,
    pub sync: f64,
}

/// Minimum-speed floor per subsystem, mph. Prevents the horizon from
/// blowing up as speed approaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinSpeeds {
    pub vision: f64,
    pub predictive: f64,
    pub sync: f64,
}

/// Speed→stop-distance breakpoint tables per subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopTables {
    pub vision: Vec<Breakpoint>,
    pub predictive: Vec<Breakpoint>,
    pub sync: Vec<Breakpoint>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Breakpoint {
    pub speed_mph: f64,
    pub distance_m: f64,
}

/// Followed-combine silhouette dimensions, all meters, offsets measured
/// from the combine's GPS antenna along its body axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineConfig {
    pub body_width_m: f64,
    pub header_length_m: f64,
    pub header_width_m: f64,
    pub gps_to_header_m: f64,
    pub gps_to_back_m: f64,
    pub auger_length_m: f64,
    pub auger_width_m: f64,
    pub gps_to_auger_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}
