use crate::error::{SafetyError, SafetyResult};
use crate::types::{Breakpoint, Config};
use anyhow::Result;
use std::fs;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Fail-fast startup validation. Any error here means "no safety
    /// guarantee" — the host must refuse to operate rather than degrade.
    pub fn validate(&self) -> SafetyResult<()> {
        if self.radar.queue_length == 0 {
            return Err(SafetyError::ZeroQueueLength);
        }
        if self.radar.sync_lookback == 0 || self.radar.sync_lookback > self.radar.queue_length {
            return Err(SafetyError::SyncLookbackTooLong {
                lookback: self.radar.sync_lookback,
                queue_length: self.radar.queue_length,
            });
        }
        if self.machine.wheelbase_m <= 0.0 {
            return Err(SafetyError::InvalidConfig(format!(
                "wheelbase must be positive, got {}",
                self.machine.wheelbase_m
            )));
        }
        for (width, name) in [
            (self.path.widths.vision, "vision"),
            (self.path.widths.sync, "sync"),
            (self.machine.machine_width_m, "machine"),
        ] {
            if width <= 0.0 {
                return Err(SafetyError::InvalidConfig(format!(
                    "{name} path width must be positive, got {width}"
                )));
            }
        }
        if self.path.n_steps == 0 {
            return Err(SafetyError::InvalidConfig(
                "path prediction needs at least one integration step".into(),
            ));
        }
        for (table, name) in [
            (&self.path.stop_tables.vision, "vision"),
            (&self.path.stop_tables.predictive, "predictive"),
            (&self.path.stop_tables.sync, "sync"),
        ] {
            validate_table(table, name)?;
        }
        Ok(())
    }
}

fn validate_table(table: &[Breakpoint], name: &str) -> SafetyResult<()> {
    if table.is_empty() {
        return Err(SafetyError::EmptyThresholdTable(name.into()));
    }
    if table
        .windows(2)
        .any(|pair| pair[1].speed_mph <= pair[0].speed_mph)
    {
        return Err(SafetyError::UnsortedThresholdTable(name.into()));
    }
    Ok(())
}
