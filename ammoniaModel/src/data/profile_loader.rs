// Hourly wind and solar capacity factors per hexagon
use std::collections::HashMap;
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use tracing::{info, warn};

use crate::config::constants::{PROFILE_TIMESTAMP_FORMAT, SECONDS_PER_HOUR};
use crate::data::records::{self, number};
use crate::demand::schedule::DemandProfile;
use crate::error::{EvaluationError, LoadError};
use crate::utils::logging::{self, FileIOSubcategory, OperationCategory};

/// Per-unit output at hourly resolution, starting at `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    start: NaiveDateTime,
    values: Vec<f64>,
}

impl HourlySeries {
    pub fn new(start: NaiveDateTime, values: Vec<f64>) -> Self {
        Self { start, values }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mean of the hours each sample of `profile` covers.
    ///
    /// Only the last sample may be cut short, and only by `horizon_end`.
    /// Fails with the first sample timestamp the series does not fully cover.
    pub fn resample_to(&self, profile: &DemandProfile, horizon_end: NaiveDateTime) -> Result<Vec<f64>, NaiveDateTime> {
        let step = profile.frequency().duration();
        profile
            .timestamps()
            .map(|ts| {
                let offset = ts - self.start;
                let window_end = (ts + step).min(horizon_end) - self.start;
                if offset < Duration::zero() || offset.num_seconds() % SECONDS_PER_HOUR != 0 {
                    return Err(ts);
                }
                let first = offset.num_hours() as usize;
                let last = window_end.num_hours() as usize;
                if last <= first || last > self.values.len() {
                    return Err(ts);
                }
                let window = &self.values[first..last];
                Ok(window.iter().sum::<f64>() / window.len() as f64)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenewableProfiles {
    wind: HashMap<String, HourlySeries>,
    solar: HashMap<String, HourlySeries>,
}

impl RenewableProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hexagon_id: impl Into<String>, wind: HourlySeries, solar: HourlySeries) {
        let id = hexagon_id.into();
        self.wind.insert(id.clone(), wind);
        self.solar.insert(id, solar);
    }

    pub fn contains(&self, hexagon_id: &str) -> bool {
        self.wind.contains_key(hexagon_id) && self.solar.contains_key(hexagon_id)
    }

    pub fn len(&self) -> usize {
        self.wind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wind.is_empty()
    }

    /// Wind and solar capacity factors aligned with `profile`.
    pub fn for_profile(
        &self,
        hexagon_id: &str,
        profile: &DemandProfile,
        horizon_end: NaiveDateTime,
    ) -> Result<(Vec<f64>, Vec<f64>), EvaluationError> {
        fn lookup<'t>(table: &'t HashMap<String, HourlySeries>, hexagon_id: &str) -> Result<&'t HourlySeries, EvaluationError> {
            table
                .get(hexagon_id)
                .ok_or_else(|| EvaluationError::MissingProfile(hexagon_id.to_string()))
        }
        let mismatch = |timestamp| EvaluationError::ProfileMismatch {
            hexagon: hexagon_id.to_string(),
            timestamp,
        };

        let wind = lookup(&self.wind, hexagon_id)?.resample_to(profile, horizon_end).map_err(mismatch)?;
        let solar = lookup(&self.solar, hexagon_id)?.resample_to(profile, horizon_end).map_err(mismatch)?;
        Ok((wind, solar))
    }
}

/// Parses a wide CSV: a timestamp column then one column per hexagon id.
/// Rows must be consecutive hours.
pub fn parse_profile_table(contents: &str) -> Result<HashMap<String, HourlySeries>, LoadError> {
    let mut reader = records::reader(contents);
    let headers = reader.headers()?.clone();
    let ids: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut start: Option<NaiveDateTime> = None;
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); ids.len()];

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 1;
        let raw = record.get(0).unwrap_or_default();
        let timestamp = NaiveDateTime::parse_from_str(raw, PROFILE_TIMESTAMP_FORMAT)
            .map_err(|_| LoadError::Timestamp(raw.to_string()))?;

        let first = *start.get_or_insert(timestamp);
        if timestamp != first + Duration::hours(i as i64) {
            return Err(LoadError::InvalidField {
                row,
                field: "time".to_string(),
                reason: format!("expected consecutive hourly rows, got {}", timestamp),
            });
        }

        for (col, values) in columns.iter_mut().enumerate() {
            values.push(number(&record, col + 1, row, &ids[col])?);
        }
    }

    let start = start.unwrap_or_default();
    Ok(ids
        .into_iter()
        .zip(columns)
        .map(|(id, values)| (id, HourlySeries::new(start, values)))
        .collect())
}

pub fn load_profiles(wind_path: impl AsRef<Path>, solar_path: impl AsRef<Path>) -> Result<RenewableProfiles, LoadError> {
    let _timing = logging::start_timing(
        "load_profiles",
        OperationCategory::FileIO {
            subcategory: FileIOSubcategory::ProfileLoad,
        },
    );

    let wind = parse_profile_table(&records::read_file(wind_path.as_ref())?)?;
    let mut solar = parse_profile_table(&records::read_file(solar_path.as_ref())?)?;

    let mut profiles = RenewableProfiles::new();
    for (id, wind_series) in wind {
        match solar.remove(&id) {
            Some(solar_series) => profiles.insert(id, wind_series, solar_series),
            None => warn!(hexagon = %id, "Wind profile without a solar profile, skipped"),
        }
    }
    for id in solar.keys() {
        warn!(hexagon = %id, "Solar profile without a wind profile, skipped");
    }
    info!(hexagons = profiles.len(), "Loaded renewable profiles");
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::schedule::Frequency;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn demand(freq_hours: u32, samples: usize) -> DemandProfile {
        DemandProfile::from_values(t0(), Frequency::from_hours(freq_hours).unwrap(), vec![0.0; samples])
    }

    #[test]
    fn test_resample_by_mean() {
        let series = HourlySeries::new(t0(), vec![0.0, 0.3, 0.6, 0.9, 1.0, 0.2, 0.5]);
        let values = series.resample_to(&demand(3, 3), t0() + Duration::hours(7)).unwrap();
        assert_relative_eq!(values[0], 0.3, epsilon = 1e-12);
        assert_relative_eq!(values[1], 0.7, epsilon = 1e-12);
        // Trailing partial bucket
        assert_relative_eq!(values[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_resample_outside_series_fails() {
        let series = HourlySeries::new(t0(), vec![0.5; 6]);
        let err = series.resample_to(&demand(3, 3), t0() + Duration::hours(9)).unwrap_err();
        assert_eq!(err, t0() + Duration::hours(6));
    }

    #[test]
    fn test_series_ending_inside_a_window_fails() {
        // 25 hours cannot cover the second day at daily resolution
        let series = HourlySeries::new(t0(), vec![0.5; 25]);
        let err = series.resample_to(&demand(24, 2), t0() + Duration::hours(48)).unwrap_err();
        assert_eq!(err, t0() + Duration::hours(24));

        let mut profiles = RenewableProfiles::new();
        profiles.insert("h1", series.clone(), series);
        assert!(matches!(
            profiles.for_profile("h1", &demand(24, 2), t0() + Duration::hours(48)),
            Err(EvaluationError::ProfileMismatch { .. })
        ));
    }

    #[test]
    fn test_parse_wide_table() {
        let csv = "time,h1,h2\n2022-01-01 00:00:00,0.1,0.5\n2022-01-01 01:00:00,0.2,0.6\n";
        let table = parse_profile_table(csv).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["h2"].values(), &[0.5, 0.6]);
        assert_eq!(table["h1"].start(), t0());
    }

    #[test]
    fn test_gap_in_hours_is_rejected() {
        let csv = "time,h1\n2022-01-01 00:00:00,0.1\n2022-01-01 02:00:00,0.2\n";
        assert!(matches!(parse_profile_table(csv), Err(LoadError::InvalidField { .. })));
        assert!(matches!(
            parse_profile_table("time,h1\nyesterday,0.1\n"),
            Err(LoadError::Timestamp(_))
        ));
    }

    #[test]
    fn test_missing_hexagon_profile() {
        let profiles = RenewableProfiles::new();
        assert!(matches!(
            profiles.for_profile("h9", &demand(3, 1), t0() + Duration::hours(3)),
            Err(EvaluationError::MissingProfile(id)) if id == "h9"
        ));
    }
}
