// src/filter/queue.rs
//
// Per-target bounded history of recent step distances. One instance per
// radar channel, created on first sight and kept for the whole session;
// only a scenario reset clears it.

use crate::geometry::{euclidean_distance, polar_to_cartesian};
use crate::types::{TargetReading, ThresholdSet};
use std::collections::VecDeque;

/// Fixed-capacity deque: pushing at capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct BoundedDeque<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedDeque<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate the newest `n` entries (fewer if the deque is shorter).
    pub fn last_n(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.items.len().saturating_sub(n);
        self.items.iter().skip(skip)
    }
}

/// How a single measurement advanced the per-target state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementClass {
    /// Sensor repeated the previous frame verbatim; state untouched.
    Duplicate,
    /// Real detection passing the quality gates; a step was recorded when a
    /// previous reading existed.
    Step,
    /// Channel reported nothing this cycle.
    Missing,
    /// Detected but failed the quality gates; never counts as a validating
    /// step, but keeps the chain alive for the next step computation.
    Rejected,
}

#[derive(Debug, Clone)]
pub struct TargetQueueState {
    previous: Option<TargetReading>,
    steps: BoundedDeque<Option<f64>>,
}

impl TargetQueueState {
    pub fn new(queue_length: usize) -> Self {
        Self {
            previous: None,
            steps: BoundedDeque::new(queue_length),
        }
    }

    #[allow(dead_code)]
    pub fn previous(&self) -> Option<&TargetReading> {
        self.previous.as_ref()
    }

    /// Advance the state machine with this cycle's measurement. Called
    /// exactly once per cycle per target.
    pub fn update_state(
        &mut self,
        reading: &TargetReading,
        thresholds: &ThresholdSet,
    ) -> MeasurementClass {
        if self.previous.as_ref() == Some(reading) {
            return MeasurementClass::Duplicate;
        }

        if !reading.is_missing() && thresholds.passes(reading) {
            if let Some(previous) = &self.previous {
                let (prev_x, prev_y) =
                    polar_to_cartesian(previous.azimuth_rad, previous.range_m);
                let (curr_x, curr_y) = polar_to_cartesian(reading.azimuth_rad, reading.range_m);
                self.steps
                    .push(Some(euclidean_distance(prev_x, prev_y, curr_x, curr_y)));
            }
            self.previous = Some(*reading);
            return MeasurementClass::Step;
        }

        if reading.is_missing() {
            self.steps.push(None);
            self.previous = None;
            MeasurementClass::Missing
        } else {
            self.steps.push(None);
            self.previous = Some(*reading);
            MeasurementClass::Rejected
        }
    }

    /// Temporal consistency check: the newest `lookback` steps must all
    /// exist and stay within `step_max_m`. An empty history can confirm
    /// nothing.
    pub fn window_ok(&self, lookback: usize, step_max_m: f64) -> bool {
        if self.steps.is_empty() || lookback == 0 {
            return false;
        }
        self.steps
            .last_n(lookback)
            .all(|step| matches!(step, Some(d) if *d <= step_max_m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> ThresholdSet {
        ThresholdSet {
            consecutive_min: 1,
            existence_min: 0.7,
            power_db_min: -10.0,
            azimuth_std_max: 0.1,
            step_max_m: 2.0,
        }
    }

    fn reading(range_m: f64) -> TargetReading {
        TargetReading {
            target_id: 3,
            range_m,
            azimuth_rad: 0.0,
            existence_prob: 0.9,
            power_db: -5.0,
            azimuth_std: 0.01,
            consecutive_hits: 10,
        }
    }

    #[test]
    fn test_bounded_deque_evicts_oldest() {
        let mut deque = BoundedDeque::new(3);
        for i in 0..5 {
            deque.push(i);
        }
        assert_eq!(deque.len(), 3);
        assert_eq!(deque.last_n(3).copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_bounded_deque_zero_capacity_stays_empty() {
        let mut deque = BoundedDeque::new(0);
        deque.push(1);
        assert!(deque.is_empty());
    }

    #[test]
    fn test_duplicate_reading_is_a_noop() {
        let mut state = TargetQueueState::new(6);
        state.update_state(&reading(10.0), &thresholds());
        state.update_state(&reading(9.9), &thresholds());
        let steps_before = state.steps.len();

        // Identical frame repeated by the sensor
        let class = state.update_state(&reading(9.9), &thresholds());
        assert_eq!(class, MeasurementClass::Duplicate);
        assert_eq!(state.steps.len(), steps_before);
        assert_eq!(state.previous().unwrap().range_m, 9.9);
    }

    #[test]
    fn test_first_valid_reading_records_no_step() {
        let mut state = TargetQueueState::new(6);
        let class = state.update_state(&reading(10.0), &thresholds());
        assert_eq!(class, MeasurementClass::Step);
        assert!(state.steps.is_empty());
        assert!(!state.window_ok(6, 2.0), "no step yet, nothing to confirm");
    }

    #[test]
    fn test_consecutive_valid_readings_record_steps() {
        let mut state = TargetQueueState::new(6);
        state.update_state(&reading(10.0), &thresholds());
        state.update_state(&reading(9.9), &thresholds());
        assert_eq!(state.steps.len(), 1);
        assert!(state.window_ok(6, 2.0));
    }

    #[test]
    fn test_missing_reading_breaks_chain() {
        let mut state = TargetQueueState::new(6);
        state.update_state(&reading(10.0), &thresholds());
        state.update_state(&reading(9.9), &thresholds());

        let class = state.update_state(&TargetReading::missing(3), &thresholds());
        assert_eq!(class, MeasurementClass::Missing);
        assert!(state.previous().is_none());
        assert!(!state.window_ok(6, 2.0), "a None in the window invalidates");
    }

    #[test]
    fn test_rejected_reading_keeps_chain_alive() {
        let mut state = TargetQueueState::new(6);
        state.update_state(&reading(10.0), &thresholds());

        let mut weak = reading(9.9);
        weak.existence_prob = 0.1;
        let class = state.update_state(&weak, &thresholds());
        assert_eq!(class, MeasurementClass::Rejected);
        // The weak sample becomes the new chain anchor
        assert_eq!(state.previous().unwrap().range_m, 9.9);
        assert!(!state.window_ok(6, 2.0));
    }

    #[test]
    fn test_window_lookback_shorter_than_history() {
        let mut state = TargetQueueState::new(6);
        // One big jump, then settle down
        state.update_state(&reading(10.0), &thresholds());
        state.update_state(&reading(30.0), &thresholds()); // step 20 m
        for range in [29.9, 29.8, 29.7] {
            state.update_state(&reading(range), &thresholds());
        }
        assert!(!state.window_ok(6, 2.0), "jump still inside full window");
        assert!(state.window_ok(3, 2.0), "short look-back has settled");
    }

    #[test]
    fn test_step_threshold_boundary() {
        let mut state = TargetQueueState::new(6);
        state.update_state(&reading(10.0), &thresholds());
        state.update_state(&reading(8.0), &thresholds()); // step 2.0 m
        assert!(state.window_ok(6, 2.0), "step equal to the max is allowed");
        assert!(!state.window_ok(6, 1.9), "past the max flips to invalid");
    }
}
