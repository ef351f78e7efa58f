// src/main.rs

mod config;
mod error;
mod filter;
mod geometry;
mod prediction;
mod safety;
mod scenario;
mod types;

use anyhow::Result;
use prediction::{PredictedPath, Subsystem};
use safety::SafetyMonitor;
use scenario::ReplayScenario;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use types::Config;

const REPLAY_CYCLES: usize = 60;

fn main() -> Result<()> {
    let config = Config::load("config.yaml")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "tractor_safety_monitor={}",
            config.logging.level
        )))
        .init();

    info!("🚜 Tractor safety monitor starting");
    info!("✓ Configuration loaded and validated");
    info!(
        "Radar gates: existence≥{:.2}, power>{:.1} dB, azimuth σ<{:.3}, step≤{:.1} m over {} cycles",
        config.radar.thresholds.existence_min,
        config.radar.thresholds.power_db_min,
        config.radar.thresholds.azimuth_std_max,
        config.radar.thresholds.step_max_m,
        config.radar.queue_length,
    );

    let mut monitor = SafetyMonitor::new(&config)?;

    let mut validated_reports = 0usize;
    let mut hazard_cycles = 0usize;
    let mut first_hazard_cycle: Option<usize> = None;

    for (cycle, input) in ReplayScenario::new(REPLAY_CYCLES).enumerate() {
        if let Some(combine) = &input.combine_fix {
            if let Err(err) = monitor.update_combine_from_gps(
                combine.lon,
                combine.lat,
                combine.heading_deg,
                input.tractor_fix.lon,
                input.tractor_fix.lat,
                input.tractor_fix.heading_deg,
                scenario::UTM_ZONE,
                &input.sync_status,
            ) {
                warn!("cycle {}: combine position unusable, keeping previous exclusions: {}", cycle, err);
            }
        }

        let subsystem = if input.sync_status.in_sync {
            Subsystem::Sync
        } else {
            Subsystem::Vision
        };
        let decision = monitor.assess(&input.readings, &input.vehicle, &input.sync_status, subsystem);

        // The streaming consumer draws the slowdown corridor and the 10 s
        // control preview next to the decision corridor every cycle.
        let slowdown = monitor.predict_path(&input.vehicle, Subsystem::Predictive);
        let preview = monitor.predict_path(&input.vehicle, Subsystem::Control);
        debug!(
            "cycle {}: slowdown corridor {:.1} m ({} ring vertices), control preview {:.1} m",
            cycle,
            path_reach(&slowdown),
            slowdown.footprint().len(),
            path_reach(&preview),
        );

        validated_reports += decision.validated.iter().filter(|t| t.valid).count();

        if !decision.hazards.is_empty() {
            hazard_cycles += 1;
            first_hazard_cycle.get_or_insert(cycle);
            for hazard in &decision.hazards {
                warn!(
                    "cycle {}: target {} at {:.1} m / {:.2} rad is inside the predicted path",
                    cycle, hazard.target_id, hazard.range_m, hazard.azimuth_rad
                );
            }
        }
    }

    // Replay wrapped; the next session must start from zero history.
    monitor.reset();

    info!("Replay finished after {} cycles", REPLAY_CYCLES);
    info!("  Validated target reports: {}", validated_reports);
    info!("  Cycles with an in-path hazard: {}", hazard_cycles);
    if let Some(cycle) = first_hazard_cycle {
        info!("  First hazard raised on cycle {}", cycle);
    }

    Ok(())
}

/// Ground distance to the far end of a predicted centerline.
fn path_reach(path: &PredictedPath) -> f64 {
    path.center
        .last()
        .map(|sample| sample.x.hypot(sample.y))
        .unwrap_or(0.0)
}
