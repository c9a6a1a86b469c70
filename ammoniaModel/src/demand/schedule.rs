// Expansion of an annual ammonia quantity into a sampled demand time series
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::constants::{HOURS_PER_YEAR, SECONDS_PER_HOUR};
use crate::error::ParameterError;
use crate::models::asset::TransportMode;

/// Sampling frequency as a whole number of hours ("H", "3H", "D", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency {
    hours: u32,
}

impl Frequency {
    pub fn hourly() -> Self {
        Self { hours: 1 }
    }

    pub fn from_hours(hours: u32) -> Result<Self, ParameterError> {
        if hours == 0 {
            return Err(ParameterError::InvalidFrequency("0H".to_string()));
        }
        Ok(Self { hours })
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn duration(&self) -> Duration {
        Duration::hours(i64::from(self.hours))
    }
}

impl FromStr for Frequency {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, unit) = trimmed.split_at(split);

        let count: u32 = if digits.is_empty() {
            1
        } else {
            digits
                .parse()
                .map_err(|_| ParameterError::InvalidFrequency(s.to_string()))?
        };
        let hours_per_unit = match unit.to_ascii_uppercase().as_str() {
            "H" => 1,
            "D" => 24,
            _ => return Err(ParameterError::InvalidFrequency(s.to_string())),
        };

        count
            .checked_mul(hours_per_unit)
            .ok_or_else(|| ParameterError::InvalidFrequency(s.to_string()))
            .and_then(Self::from_hours)
    }
}

impl TryFrom<String> for Frequency {
    type Error = ParameterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(freq: Frequency) -> Self {
        freq.to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}H", self.hours)
    }
}

/// Half-open analysis window `[start, end)` standing in for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisHorizon {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl AnalysisHorizon {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ParameterError> {
        let span = end - start;
        if span <= Duration::zero() {
            return Err(ParameterError::Invalid {
                field: "horizon".to_string(),
                reason: format!("end {} is not after start {}", end, start),
            });
        }
        if span.num_seconds() % SECONDS_PER_HOUR != 0 {
            return Err(ParameterError::Invalid {
                field: "horizon".to_string(),
                reason: "horizon must span whole hours".to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn hours(&self) -> usize {
        (self.end - self.start).num_hours() as usize
    }
}

/// Ammonia demand sampled at a fixed frequency.
///
/// Values are kg NH3 per hour represented by the sample, and every sample
/// represents `weight` hours, so `Σ value × weight` is the annual quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandProfile {
    start: NaiveDateTime,
    frequency: Frequency,
    values: Vec<f64>,
    weight: f64,
}

impl DemandProfile {
    /// Wraps precomputed values; the weight follows from the sample count.
    pub fn from_values(start: NaiveDateTime, frequency: Frequency, values: Vec<f64>) -> Self {
        let weight = HOURS_PER_YEAR / values.len().max(1) as f64;
        Self {
            start,
            frequency,
            values,
            weight,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Hours represented by each sample.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        self.start + Duration::hours(index as i64 * i64::from(self.frequency.hours()))
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.values.len()).map(move |i| self.timestamp(i))
    }

    /// (timestamp, kg/h) pairs; each call starts a fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.timestamps().zip(self.values.iter().copied())
    }

    pub fn weighted_total(&self) -> f64 {
        self.values.iter().sum::<f64>() * self.weight
    }

    pub fn is_all_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }
}

pub struct DemandScheduler {
    horizon: AnalysisHorizon,
    frequency: Frequency,
}

impl DemandScheduler {
    pub fn new(horizon: AnalysisHorizon, frequency: Frequency) -> Self {
        Self { horizon, frequency }
    }

    pub fn horizon(&self) -> &AnalysisHorizon {
        &self.horizon
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn sample_count(&self) -> usize {
        let step = self.frequency.hours() as usize;
        (self.horizon.hours() + step - 1) / step
    }

    pub fn schedule(&self, mode: TransportMode, quantity_kg: f64, truck_capacity_kg: f64) -> DemandProfile {
        match mode {
            TransportMode::Trucking => self.trucking_schedule(quantity_kg, truck_capacity_kg),
            TransportMode::Pipeline => self.pipeline_schedule(quantity_kg),
        }
    }

    /// Discrete deliveries of equal size spread evenly over the horizon.
    ///
    /// The number of deliveries is `ceil(quantity / capacity)`, so no single
    /// delivery exceeds a truck load. Deliveries are summed into hourly
    /// buckets, which are then aggregated to the output frequency.
    pub fn trucking_schedule(&self, quantity_kg: f64, truck_capacity_kg: f64) -> DemandProfile {
        let samples = self.sample_count();
        let annual_deliveries = quantity_kg / truck_capacity_kg;

        if !(quantity_kg > 0.0) || !annual_deliveries.is_finite() {
            // Nothing to deliver, or an unknown schedule from degenerate inputs
            let fill = if quantity_kg == 0.0 { 0.0 } else { f64::NAN };
            return DemandProfile::from_values(self.horizon.start(), self.frequency, vec![fill; samples]);
        }

        let hours = self.horizon.hours();
        let events = (annual_deliveries.ceil() as usize).max(1);
        let delivery_size = quantity_kg / events as f64;
        let horizon_seconds = (hours as i64 * SECONDS_PER_HOUR) as f64;

        let mut hourly = vec![0.0; hours];
        for event in 0..events {
            let offset = event as f64 * horizon_seconds / events as f64;
            let hour = ((offset / SECONDS_PER_HOUR as f64).floor() as usize).min(hours - 1);
            hourly[hour] += delivery_size;
        }

        let weight = HOURS_PER_YEAR / samples as f64;
        let values = hourly
            .chunks(self.frequency.hours() as usize)
            .map(|bucket| bucket.iter().sum::<f64>() / weight)
            .collect();

        DemandProfile::from_values(self.horizon.start(), self.frequency, values)
    }

    /// Continuous flow: the same demand at every sample.
    pub fn pipeline_schedule(&self, quantity_kg: f64) -> DemandProfile {
        let samples = self.sample_count();
        let per_hour = quantity_kg / HOURS_PER_YEAR;
        DemandProfile::from_values(self.horizon.start(), self.frequency, vec![per_hour; samples])
    }
}
