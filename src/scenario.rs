// src/scenario.rs
//
// Deterministic replay scenario standing in for the upstream sensor
// ingestion: a handful of scripted radar channels plus tractor/combine
// state, one CycleInput per perception cycle. Lets the binary exercise the
// whole filter → predictor → decision chain without any captured logs.
//
// Timeline: the tractor drives north through open field; an obstacle closes
// on the centerline the whole run. From SYNC_START_CYCLE a combine is ahead
// and to the left and the tractor enters a sync run behind it.

use crate::types::{SyncStatus, TargetReading, VehicleState};

pub const UTM_ZONE: &str = "14T";

/// Channel scripting: an obstacle closing dead ahead, a strong return far
/// off the corridor, a flickering noise channel, and the combine itself.
const OBSTACLE_ID: u32 = 3;
const BYSTANDER_ID: u32 = 20;
const NOISE_ID: u32 = 11;
const COMBINE_RETURN_ID: u32 = 7;

const OBSTACLE_START_M: f64 = 28.0;
const CLOSING_RATE_M_PER_CYCLE: f64 = 0.4;
const TRACTOR_SPEED_MPS: f64 = 2.5;
const SYNC_START_CYCLE: usize = 20;

/// 10 Hz perception cycle.
const CYCLE_PERIOD_S: f64 = 0.1;

const START_LON: f64 = -99.0;
const START_LAT: f64 = 40.0;
const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Combine offset from the tractor while following: ahead and to the left.
const COMBINE_AHEAD_M: f64 = 15.0;
const COMBINE_LEFT_M: f64 = 6.0;

#[derive(Debug, Clone, Copy)]
pub struct GpsFix {
    pub lon: f64,
    pub lat: f64,
    pub heading_deg: f64,
}

#[derive(Debug, Clone)]
pub struct CycleInput {
    pub readings: Vec<TargetReading>,
    pub vehicle: VehicleState,
    pub sync_status: SyncStatus,
    pub tractor_fix: GpsFix,
    pub combine_fix: Option<GpsFix>,
}

pub struct ReplayScenario {
    cycle: usize,
    total_cycles: usize,
}

impl ReplayScenario {
    pub fn new(total_cycles: usize) -> Self {
        Self {
            cycle: 0,
            total_cycles,
        }
    }

    fn strong(target_id: u32, range_m: f64, azimuth_rad: f64, cycle: usize) -> TargetReading {
        TargetReading {
            target_id,
            range_m,
            azimuth_rad,
            existence_prob: 0.92,
            power_db: -4.0,
            azimuth_std: 0.01,
            consecutive_hits: cycle as i32 + 1,
        }
    }
}

impl Iterator for ReplayScenario {
    type Item = CycleInput;

    fn next(&mut self) -> Option<CycleInput> {
        if self.cycle >= self.total_cycles {
            return None;
        }
        let cycle = self.cycle;
        self.cycle += 1;

        let in_sync = cycle >= SYNC_START_CYCLE;
        let mut readings = Vec::with_capacity(4);

        // Obstacle closing on the centerline
        let range = OBSTACLE_START_M - CLOSING_RATE_M_PER_CYCLE * cycle as f64;
        if range > 1.0 {
            readings.push(Self::strong(OBSTACLE_ID, range, 0.0, cycle));
        }

        // Fence post out at ~63° left: real, consistent, never in the path
        readings.push(Self::strong(
            BYSTANDER_ID,
            12.0 - 0.01 * cycle as f64,
            1.1,
            cycle,
        ));

        // Flicker channel: weak return on even cycles, silent on odd ones.
        // Never passes the existence gate, so it must never validate.
        if cycle % 2 == 0 {
            readings.push(TargetReading {
                target_id: NOISE_ID,
                range_m: 6.0 + (cycle % 5) as f64,
                azimuth_rad: -0.3,
                existence_prob: 0.25,
                power_db: -12.0,
                azimuth_std: 0.2,
                consecutive_hits: 1,
            });
        }

        // While following, the radar also sees the combine itself
        if in_sync {
            let combine_range = COMBINE_AHEAD_M.hypot(COMBINE_LEFT_M)
                - 0.005 * (cycle - SYNC_START_CYCLE) as f64;
            let combine_azimuth = COMBINE_LEFT_M.atan2(COMBINE_AHEAD_M);
            readings.push(Self::strong(
                COMBINE_RETURN_ID,
                combine_range,
                combine_azimuth,
                cycle,
            ));
        }

        // Tractor advances north along the zone 14 central meridian
        let northing_m = TRACTOR_SPEED_MPS * CYCLE_PERIOD_S * cycle as f64;
        let tractor_fix = GpsFix {
            lon: START_LON,
            lat: START_LAT + northing_m / METERS_PER_DEG_LAT,
            heading_deg: 0.0,
        };

        let combine_fix = in_sync.then(|| {
            let meters_per_deg_lon =
                METERS_PER_DEG_LAT * tractor_fix.lat.to_radians().cos();
            GpsFix {
                lon: tractor_fix.lon - COMBINE_LEFT_M / meters_per_deg_lon,
                lat: tractor_fix.lat + COMBINE_AHEAD_M / METERS_PER_DEG_LAT,
                heading_deg: 0.0,
            }
        });

        Some(CycleInput {
            readings,
            vehicle: VehicleState::at_origin(TRACTOR_SPEED_MPS, 0.0),
            sync_status: SyncStatus {
                in_sync,
                running_sync: in_sync,
                at_sync_point: false,
            },
            tractor_fix,
            combine_fix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_is_deterministic() {
        let a: Vec<_> = ReplayScenario::new(10).collect();
        let b: Vec<_> = ReplayScenario::new(10).collect();
        assert_eq!(a.len(), 10);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.readings, y.readings);
        }
    }

    #[test]
    fn test_obstacle_closes_monotonically() {
        let ranges: Vec<f64> = ReplayScenario::new(20)
            .map(|input| {
                input
                    .readings
                    .iter()
                    .find(|r| r.target_id == OBSTACLE_ID)
                    .unwrap()
                    .range_m
            })
            .collect();
        assert!(ranges.windows(2).all(|pair| pair[1] < pair[0]));
    }

    #[test]
    fn test_noise_channel_flickers() {
        let scenario: Vec<_> = ReplayScenario::new(6).collect();
        for (cycle, input) in scenario.iter().enumerate() {
            let present = input.readings.iter().any(|r| r.target_id == NOISE_ID);
            assert_eq!(present, cycle % 2 == 0);
        }
    }

    #[test]
    fn test_combine_appears_with_sync() {
        let scenario: Vec<_> = ReplayScenario::new(SYNC_START_CYCLE + 5).collect();
        for (cycle, input) in scenario.iter().enumerate() {
            let syncing = cycle >= SYNC_START_CYCLE;
            assert_eq!(input.sync_status.in_sync, syncing);
            assert_eq!(input.combine_fix.is_some(), syncing);
            assert_eq!(
                input
                    .readings
                    .iter()
                    .any(|r| r.target_id == COMBINE_RETURN_ID),
                syncing
            );
        }
    }
}
