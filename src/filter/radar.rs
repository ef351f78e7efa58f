// src/filter/radar.rs
//
// Orchestrates per-target queue state across the fixed radar channel space.
// The radar reports the same 48 channels every cycle; a channel that goes
// silent must actively erode toward invalid rather than freeze at its last
// trusted state, which is what close_cycle's synthesized missing readings
// are for.

use crate::filter::queue::TargetQueueState;
use crate::geometry::polar_to_cartesian;
use crate::types::{RadarConfig, SyncStatus, TargetReading, RADAR_CHANNELS};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Per-target verdict with its local-frame position, handed to the safety
/// decision and any visualization consumer.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedTarget {
    pub target_id: u32,
    pub valid: bool,
    pub x: f64,
    pub y: f64,
    pub range_m: f64,
    pub azimuth_rad: f64,
}

pub struct RadarTargetFilter {
    config: RadarConfig,
    queues: HashMap<u32, TargetQueueState>,
    /// Channel ids not yet seen this cycle.
    pending: HashSet<u32>,
    prev_cycle: Option<Vec<TargetReading>>,
}

impl RadarTargetFilter {
    pub fn new(config: RadarConfig) -> Self {
        Self {
            config,
            queues: HashMap::new(),
            pending: (0..RADAR_CHANNELS).collect(),
            prev_cycle: None,
        }
    }

    /// Validate one reading and advance its queue state. Must be called at
    /// most once per target per cycle, followed by `close_cycle` once all
    /// readings are in; `process_cycle` does both.
    pub fn evaluate(&mut self, reading: &TargetReading, sync_status: &SyncStatus) -> bool {
        let thresholds = *self.config.active_thresholds(sync_status.in_sync);
        let queue_length = self.config.queue_length;

        let state = self
            .queues
            .entry(reading.target_id)
            .or_insert_with(|| TargetQueueState::new(queue_length));
        let class = state.update_state(reading, &thresholds);
        trace!(target_id = reading.target_id, ?class, "measurement classified");

        self.pending.remove(&reading.target_id);

        if sync_status.in_sync {
            let (_, y) = polar_to_cartesian(reading.azimuth_rad, reading.range_m);
            if y.abs() > self.config.sync_lateral_cutoff_m {
                return false;
            }
        }

        let lookback = self.config.lookback(sync_status.in_sync);
        self.queues[&reading.target_id].window_ok(lookback, thresholds.step_max_m)
    }

    /// Cycle completion: every channel that stayed silent gets a synthesized
    /// missing reading so its trust decays, then the seen-tracking resets.
    pub fn close_cycle(&mut self, sync_status: &SyncStatus) {
        let thresholds = *self.config.active_thresholds(sync_status.in_sync);
        let queue_length = self.config.queue_length;

        for id in 0..RADAR_CHANNELS {
            if !self.pending.contains(&id) {
                continue;
            }
            let state = self
                .queues
                .entry(id)
                .or_insert_with(|| TargetQueueState::new(queue_length));
            state.update_state(&TargetReading::missing(id), &thresholds);
        }
        self.pending = (0..RADAR_CHANNELS).collect();
    }

    /// Whole-cycle driver: short-circuit a stalled sensor feed, validate
    /// every reading, then run cycle completion.
    ///
    /// A frame bit-identical to the previous cycle's is a stalled feed, not
    /// new information; it must not advance any queue.
    pub fn process_cycle(
        &mut self,
        readings: &[TargetReading],
        sync_status: &SyncStatus,
    ) -> Vec<ValidatedTarget> {
        // An empty frame carries no duplicated measurements — it still has
        // to run cycle completion so silent channels keep decaying.
        if !readings.is_empty() {
            if let Some(previous) = &self.prev_cycle {
                if previous.as_slice() == readings {
                    debug!("radar frame identical to previous cycle, skipping");
                    return Vec::new();
                }
            }
        }
        self.prev_cycle = Some(readings.to_vec());

        let mut validated = Vec::with_capacity(readings.len());
        for reading in readings {
            let valid = self.evaluate(reading, sync_status);
            if reading.is_missing() {
                continue;
            }
            let (x, y) = polar_to_cartesian(reading.azimuth_rad, reading.range_m);
            validated.push(ValidatedTarget {
                target_id: reading.target_id,
                valid,
                x,
                y,
                range_m: reading.range_m,
                azimuth_rad: reading.azimuth_rad,
            });
        }

        self.close_cycle(sync_status);
        validated
    }

    /// Scenario reset (external event): drop all per-target history.
    pub fn reset(&mut self) {
        self.queues.clear();
        self.pending = (0..RADAR_CHANNELS).collect();
        self.prev_cycle = None;
    }
}
