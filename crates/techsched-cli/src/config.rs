//! Scheduler configuration layering
//!
//! Precedence, lowest first: built-in defaults, the TOML file given with
//! `--config`, environment variables, command-line flags. Environment and
//! flags arrive merged through clap's `env` support, so this module only
//! has to stack them on top of the file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use techsched_core::SchedulerConfig;

/// Contents of a `--config` file. Every key is optional.
///
/// ```toml
/// workday_start_hour = 7
/// workday_end_hour = 19
/// slot_interval_minutes = 30
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub workday_start_hour: Option<u32>,
    pub workday_end_hour: Option<u32>,
    pub slot_interval_minutes: Option<u32>,
}

impl FileConfig {
    pub fn parse(source: &str) -> Result<Self> {
        toml::from_str(source).context("invalid configuration file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("in {}", path.display()))
    }
}

/// Values supplied by flags or environment variables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    pub workday_start_hour: Option<u32>,
    pub workday_end_hour: Option<u32>,
    pub slot_interval_minutes: Option<u32>,
}

/// Stack the layers and validate the result
pub fn resolve(file: Option<&FileConfig>, overrides: &Overrides) -> Result<SchedulerConfig> {
    let mut config = SchedulerConfig::default();

    if let Some(file) = file {
        apply(&mut config, file.workday_start_hour, file.workday_end_hour, file.slot_interval_minutes);
    }
    apply(
        &mut config,
        overrides.workday_start_hour,
        overrides.workday_end_hour,
        overrides.slot_interval_minutes,
    );

    config.validate()?;
    Ok(config)
}

fn apply(
    config: &mut SchedulerConfig,
    start: Option<u32>,
    end: Option<u32>,
    interval: Option<u32>,
) {
    if let Some(start) = start {
        config.workday_start_hour = start;
    }
    if let Some(end) = end {
        config.workday_end_hour = end;
    }
    if let Some(interval) = interval {
        config.slot_interval_minutes = interval;
    }
}
