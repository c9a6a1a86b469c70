use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::constants::DEFAULT_FREQUENCY_HOURS;
use crate::demand::schedule::{AnalysisHorizon, Frequency};
use crate::error::{LoadError, ParameterError};

/// Run-level switches. Everything the evaluator needs beyond the reference
/// data and the input tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub horizon_start: NaiveDateTime,
    pub horizon_end: NaiveDateTime,
    pub frequency: Frequency,
    pub pipeline_construction: bool,
    pub road_construction: bool,
    pub enforce_water_limit: bool,
    pub cost_components: bool,
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
        let end = NaiveDate::from_ymd_opt(2023, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
        Self {
            horizon_start: start.unwrap_or_default(),
            horizon_end: end.unwrap_or_default(),
            frequency: Frequency::from_hours(DEFAULT_FREQUENCY_HOURS).unwrap_or_else(|_| Frequency::hourly()),
            pipeline_construction: true,
            road_construction: true,
            enforce_water_limit: false,
            cost_components: false,
            parallel: true,
        }
    }
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: RunConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn horizon(&self) -> Result<AnalysisHorizon, ParameterError> {
        AnalysisHorizon::new(self.horizon_start, self.horizon_end)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        let horizon = self.horizon()?;
        if horizon.hours() < self.frequency.hours() as usize {
            return Err(ParameterError::Invalid {
                field: "frequency".to_string(),
                reason: format!(
                    "{} is longer than the {} h horizon",
                    self.frequency,
                    horizon.hours()
                ),
            });
        }
        Ok(())
    }
}
