// src/safety.rs
//
// Thin composition of the two subsystems: one RadarTargetFilter and one
// PathPredictor per vehicle, intersected per cycle. A target is hazardous
// iff it validated AND sits inside the predicted corridor AND is not the
// followed implement's own silhouette. Stop/slowdown escalation stays with
// the host.

use crate::error::SafetyResult;
use crate::filter::{RadarTargetFilter, ValidatedTarget};
use crate::geometry::{auger_region, combine_region, combine_to_local, contains_point};
use crate::prediction::{PathPredictor, PredictedPath, Subsystem};
use crate::types::{CombineConfig, Config, SyncStatus, TargetReading, VehicleState};
use tracing::debug;

/// Everything the host needs from one perception cycle.
#[derive(Debug, Clone)]
pub struct CycleDecision {
    /// Per-target verdicts for every real detection this cycle.
    pub validated: Vec<ValidatedTarget>,
    /// Validated targets inside the predicted corridor.
    pub hazards: Vec<ValidatedTarget>,
    pub path: PredictedPath,
}

pub struct SafetyMonitor {
    filter: RadarTargetFilter,
    predictor: PathPredictor,
    combine: CombineConfig,
    gps_to_rear_axle_m: f64,
    /// Implement silhouettes (tractor-local closed rings) to exclude from
    /// hazard decisions, refreshed by the host as the combine moves.
    exclusion_regions: Vec<Vec<(f64, f64)>>,
}

impl SafetyMonitor {
    /// Fails fast on configuration errors: an unvalidated monitor gives no
    /// safety guarantee and must not run.
    pub fn new(config: &Config) -> SafetyResult<Self> {
        config.validate()?;
        Ok(Self {
            filter: RadarTargetFilter::new(config.radar.clone()),
            predictor: PathPredictor::new(config.machine.clone(), config.path.clone()),
            combine: config.combine.clone(),
            gps_to_rear_axle_m: config.machine.gps_to_rear_axle_m,
            exclusion_regions: Vec::new(),
        })
    }

    /// Refresh implement exclusions straight from the two machines' GPS
    /// fixes. A failed geodetic conversion leaves the previous exclusions in
    /// place and is reported to the caller — never silently mapped to (0, 0).
    #[allow(clippy::too_many_arguments)]
    pub fn update_combine_from_gps(
        &mut self,
        combine_lon: f64,
        combine_lat: f64,
        combine_heading_deg: f64,
        tractor_lon: f64,
        tractor_lat: f64,
        tractor_heading_deg: f64,
        utm_zone: &str,
        sync_status: &SyncStatus,
    ) -> SafetyResult<()> {
        let (x, y) = combine_to_local(
            combine_lon,
            combine_lat,
            tractor_lon,
            tractor_lat,
            tractor_heading_deg,
            utm_zone,
        )?;
        let relative_theta = (tractor_heading_deg - combine_heading_deg).to_radians();
        self.update_combine_exclusions(x, y, relative_theta, sync_status);
        Ok(())
    }

    /// Refresh implement exclusions from the followed combine's pose in the
    /// tractor-local GPS frame. The tractor's local origin sits at its rear
    /// axle, so the combine's GPS x shifts back by that offset. The auger
    /// only sweeps over the cart while a sync run is active.
    pub fn update_combine_exclusions(
        &mut self,
        combine_x: f64,
        combine_y: f64,
        relative_theta: f64,
        sync_status: &SyncStatus,
    ) {
        let x = combine_x - self.gps_to_rear_axle_m;
        let mut regions = vec![combine_region(x, combine_y, relative_theta, &self.combine)];
        if sync_status.running_sync {
            regions.push(auger_region(x, combine_y, relative_theta, &self.combine));
        }
        self.exclusion_regions = regions;
    }

    pub fn assess(
        &mut self,
        readings: &[TargetReading],
        vehicle: &VehicleState,
        sync_status: &SyncStatus,
        subsystem: Subsystem,
    ) -> CycleDecision {
        let validated = self.filter.process_cycle(readings, sync_status);
        let path = self.predictor.predict(vehicle, subsystem);

        let hazards: Vec<ValidatedTarget> = validated
            .iter()
            .filter(|target| {
                target.valid
                    && path.is_unsafe(target.range_m, target.azimuth_rad)
                    && !self.is_excluded(target)
            })
            .copied()
            .collect();

        debug!(
            targets = validated.len(),
            hazards = hazards.len(),
            "cycle assessed"
        );

        CycleDecision {
            validated,
            hazards,
            path,
        }
    }

    /// Corridor preview without advancing any filter state, for consumers
    /// that want the other subsystems' footprints alongside the decision
    /// (the streaming visualizer draws predictive, vision and control
    /// corridors every cycle).
    pub fn predict_path(&self, vehicle: &VehicleState, subsystem: Subsystem) -> PredictedPath {
        self.predictor.predict(vehicle, subsystem)
    }

    fn is_excluded(&self, target: &ValidatedTarget) -> bool {
        self.exclusion_regions
            .iter()
            .any(|ring| contains_point(ring, target.x, target.y))
    }

    /// Scenario reset: clears all per-target history and exclusions.
    pub fn reset(&mut self) {
        self.filter.reset();
        self.exclusion_regions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SafetyError;
    use crate::types::*;

    fn config() -> Config {
        let thresholds = ThresholdSet {
            consecutive_min: 1,
            existence_min: 0.7,
            power_db_min: -10.0,
            azimuth_std_max: 0.1,
            step_max_m: 2.0,
        };
        Config {
            machine: MachineConfig {
                wheelbase_m: 2.9,
                machine_width_m: 3.0,
                cabin_to_nose_m: 2.0,
                gps_to_rear_axle_m: 1.2,
            },
            radar: RadarConfig {
                queue_length: 6,
                sync_lookback: 3,
                sync_lateral_cutoff_m: 4.0,
                thresholds,
                sync_thresholds: thresholds,
            },
            path: PathConfig {
                n_steps: 10,
                widths: PathWidths {
                    vision: 4.0,
                    sync: 2.5,
                },
                min_speed_mph: MinSpeeds {
                    vision: 1.0,
                    predictive: 0.5,
                    sync: 0.5,
                },
                stop_tables: StopTables {
                    vision: vec![
                        Breakpoint {
                            speed_mph: 1.0,
                            distance_m: 8.0,
                        },
                        Breakpoint {
                            speed_mph: 10.0,
                            distance_m: 26.0,
                        },
                    ],
                    predictive: vec![Breakpoint {
                        speed_mph: 1.0,
                        distance_m: 10.0,
                    }],
                    sync: vec![Breakpoint {
                        speed_mph: 1.0,
                        distance_m: 6.0,
                    }],
                },
            },
            combine: CombineConfig {
                body_width_m: 3.7,
                header_length_m: 2.0,
                header_width_m: 9.0,
                gps_to_header_m: 3.5,
                gps_to_back_m: 6.0,
                auger_length_m: 5.5,
                auger_width_m: 0.6,
                gps_to_auger_m: 1.0,
            },
            logging: LoggingConfig {
                level: "info".into(),
            },
        }
    }

    fn reading(target_id: u32, range_m: f64, azimuth_rad: f64) -> TargetReading {
        TargetReading {
            target_id,
            range_m,
            azimuth_rad,
            existence_prob: 0.9,
            power_db: -5.0,
            azimuth_std: 0.01,
            consecutive_hits: 10,
        }
    }

    #[test]
    fn test_closing_centerline_target_becomes_hazard() {
        let mut monitor = SafetyMonitor::new(&config()).unwrap();
        let vehicle = VehicleState::at_origin(2.0, 0.0);
        let sync = SyncStatus::default();

        let first = monitor.assess(&[reading(3, 10.0, 0.0)], &vehicle, &sync, Subsystem::Vision);
        assert!(first.hazards.is_empty(), "no step history yet");

        let second = monitor.assess(&[reading(3, 9.8, 0.0)], &vehicle, &sync, Subsystem::Vision);
        assert_eq!(second.hazards.len(), 1);
        assert_eq!(second.hazards[0].target_id, 3);
    }

    #[test]
    fn test_valid_target_outside_corridor_is_not_a_hazard() {
        let mut monitor = SafetyMonitor::new(&config()).unwrap();
        let vehicle = VehicleState::at_origin(2.0, 0.0);
        let sync = SyncStatus::default();

        // Strong, consistent target 10 m out at ~63° off the nose
        monitor.assess(&[reading(9, 10.0, 1.1)], &vehicle, &sync, Subsystem::Vision);
        let decision = monitor.assess(&[reading(9, 9.9, 1.1)], &vehicle, &sync, Subsystem::Vision);

        assert!(decision.validated[0].valid, "target itself is real");
        assert!(decision.hazards.is_empty(), "but it is not in the path");
    }

    #[test]
    fn test_combine_exclusions_follow_the_combine() {
        let mut monitor = SafetyMonitor::new(&config()).unwrap();
        let vehicle = VehicleState::at_origin(2.0, 0.0);
        let sync = SyncStatus {
            in_sync: false,
            running_sync: true,
            at_sync_point: false,
        };

        // Combine dead ahead, aligned with the tractor: a return off its
        // body must not become a hazard, one short of it must.
        monitor.update_combine_exclusions(10.0, 0.0, 0.0, &sync);

        monitor.assess(&[reading(3, 9.0, 0.0)], &vehicle, &sync, Subsystem::Vision);
        let decision = monitor.assess(&[reading(3, 8.9, 0.0)], &vehicle, &sync, Subsystem::Vision);
        assert!(
            decision.hazards.is_empty(),
            "return from the combine body is excluded"
        );

        monitor.reset();
        monitor.assess(&[reading(4, 2.5, 0.0)], &vehicle, &sync, Subsystem::Vision);
        let decision = monitor.assess(&[reading(4, 2.4, 0.0)], &vehicle, &sync, Subsystem::Vision);
        assert_eq!(
            decision.hazards.len(),
            1,
            "reset cleared the exclusions; a close-in target is a hazard again"
        );
    }

    #[test]
    fn test_gps_update_rejects_bad_zone() {
        let mut monitor = SafetyMonitor::new(&config()).unwrap();
        let sync = SyncStatus::default();
        let result = monitor.update_combine_from_gps(
            -99.0, 40.0001, 0.0, -99.0, 40.0, 0.0, "not-a-zone", &sync,
        );
        assert!(matches!(result, Err(SafetyError::Geo(_))));
        assert!(
            monitor.exclusion_regions.is_empty(),
            "failed conversion must not install a bogus region"
        );
    }

    #[test]
    fn test_invalid_config_refuses_to_build() {
        let mut bad = config();
        bad.radar.queue_length = 0;
        assert!(SafetyMonitor::new(&bad).is_err(), "fail closed");
    }
}
