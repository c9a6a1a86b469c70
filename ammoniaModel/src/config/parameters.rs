// Immutable reference data for a run: country financing, technology costs,
// plant conversion parameters and the transport/road cost tables.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::const_funcs::crf;
use crate::config::constants::*;
use crate::error::ParameterError;
use crate::models::asset::{AssetClass, FinancingClass};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialParameters {
    pub interest_rate: f64,
    pub lifetime_years: f64,
}

impl FinancialParameters {
    pub fn new(interest_rate: f64, lifetime_years: f64) -> Self {
        Self {
            interest_rate,
            lifetime_years,
        }
    }

    pub fn crf(&self) -> f64 {
        crf(self.interest_rate, self.lifetime_years)
    }

    fn validate(&self, field: &str) -> Result<(), ParameterError> {
        if !(self.lifetime_years > 0.0) {
            return Err(invalid(field, format!("lifetime must be > 0, got {}", self.lifetime_years)));
        }
        if !(self.interest_rate >= 0.0) {
            return Err(invalid(field, format!("interest rate must be >= 0, got {}", self.interest_rate)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryParameters {
    pub plant: FinancialParameters,
    pub wind: FinancialParameters,
    pub solar: FinancialParameters,
    pub infrastructure: FinancialParameters,
    pub electricity_price: f64, // €/kWh
}

impl CountryParameters {
    pub fn financing(&self, class: FinancingClass) -> &FinancialParameters {
        match class {
            FinancingClass::Plant => &self.plant,
            FinancingClass::Wind => &self.wind,
            FinancingClass::Solar => &self.solar,
            FinancingClass::Infrastructure => &self.infrastructure,
        }
    }

    pub fn asset_crf(&self, asset: AssetClass) -> f64 {
        self.financing(asset.financing_class()).crf()
    }

    fn validate(&self, code: &str) -> Result<(), ParameterError> {
        self.plant.validate(&format!("{}.plant", code))?;
        self.wind.validate(&format!("{}.wind", code))?;
        self.solar.validate(&format!("{}.solar", code))?;
        self.infrastructure.validate(&format!("{}.infrastructure", code))?;
        Ok(())
    }
}

/// Fixed operating cost, either per unit of capacity or as a share of capex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingCost {
    Absolute(f64),
    FractionOfCapex(f64),
}

impl OperatingCost {
    pub fn annual(&self, capital_cost: f64) -> f64 {
        match *self {
            OperatingCost::Absolute(value) => value,
            OperatingCost::FractionOfCapex(fraction) => fraction * capital_cost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnologyCostRecord {
    pub capital_cost: f64, // € per MW or MWh
    pub operating_cost: OperatingCost,
    #[serde(default)]
    pub max_output_per_unit: Option<f64>,
}

impl TechnologyCostRecord {
    pub fn new(capital_cost: f64, operating_cost: OperatingCost) -> Self {
        Self {
            capital_cost,
            operating_cost,
            max_output_per_unit: None,
        }
    }

    /// Yearly cost of one unit of capacity.
    pub fn annualized_unit_cost(&self, crf: f64) -> f64 {
        self.capital_cost * crf + self.operating_cost.annual(self.capital_cost)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyCosts {
    pub wind: TechnologyCostRecord,
    pub solar: TechnologyCostRecord,
    pub electrolyzer: TechnologyCostRecord,
    pub battery: TechnologyCostRecord,
    pub compressed_h2_store: TechnologyCostRecord,
    pub ammonia_store: TechnologyCostRecord,
    pub ammonia_synthesis: TechnologyCostRecord,
}

impl TechnologyCosts {
    pub fn record(&self, asset: AssetClass) -> &TechnologyCostRecord {
        match asset {
            AssetClass::Wind => &self.wind,
            AssetClass::Solar => &self.solar,
            AssetClass::Electrolyzer => &self.electrolyzer,
            AssetClass::Battery => &self.battery,
            AssetClass::CompressedH2Store => &self.compressed_h2_store,
            AssetClass::AmmoniaStore => &self.ammonia_store,
            AssetClass::AmmoniaSynthesis => &self.ammonia_synthesis,
        }
    }

    fn validate(&self) -> Result<(), ParameterError> {
        for asset in AssetClass::ALL {
            let record = self.record(asset);
            if !(record.capital_cost >= 0.0) {
                return Err(invalid(
                    &format!("technology.{}", asset.display_name()),
                    format!("capital cost must be >= 0, got {}", record.capital_cost),
                ));
            }
        }
        Ok(())
    }
}

/// Conversion chain of the plant, all on an HHV energy basis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantParameters {
    pub electrolyzer_efficiency: f64,
    pub synthesis_efficiency: f64,
    pub synthesis_power_demand: f64,
    pub compression_power_demand: f64,
    pub battery_charge_efficiency: f64,
    pub battery_discharge_efficiency: f64,
}

impl Default for PlantParameters {
    fn default() -> Self {
        Self {
            electrolyzer_efficiency: DEFAULT_ELECTROLYZER_EFFICIENCY,
            synthesis_efficiency: DEFAULT_SYNTHESIS_EFFICIENCY,
            synthesis_power_demand: DEFAULT_SYNTHESIS_POWER_DEMAND,
            compression_power_demand: DEFAULT_COMPRESSION_POWER_DEMAND,
            battery_charge_efficiency: DEFAULT_BATTERY_EFFICIENCY,
            battery_discharge_efficiency: DEFAULT_BATTERY_EFFICIENCY,
        }
    }
}

impl PlantParameters {
    fn validate(&self) -> Result<(), ParameterError> {
        let efficiencies = [
            ("plant.electrolyzer_efficiency", self.electrolyzer_efficiency),
            ("plant.synthesis_efficiency", self.synthesis_efficiency),
            ("plant.battery_charge_efficiency", self.battery_charge_efficiency),
            ("plant.battery_discharge_efficiency", self.battery_discharge_efficiency),
        ];
        for (field, value) in efficiencies {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(field, format!("efficiency must be in (0, 1], got {}", value)));
            }
        }
        for (field, value) in [
            ("plant.synthesis_power_demand", self.synthesis_power_demand),
            ("plant.compression_power_demand", self.compression_power_demand),
        ] {
            if !(value >= 0.0) {
                return Err(invalid(field, format!("power demand must be >= 0, got {}", value)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineTier {
    pub min_flow: f64,    // t/a
    pub max_flow: f64,    // t/a
    pub y_intercept: f64, // €/(t/a)/100km
    pub slope: f64,       // €/(t/a)²/100km
}

impl PipelineTier {
    pub fn capex_coefficient(&self, flow: f64) -> f64 {
        self.y_intercept + self.slope * flow
    }

    fn derated(&self, availability: f64) -> Self {
        Self {
            min_flow: self.min_flow * availability,
            max_flow: self.max_flow * availability,
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineTierTable {
    pub small: PipelineTier,
    pub medium: PipelineTier,
    pub large: PipelineTier,
}

impl PipelineTierTable {
    /// Flow bounds scaled by the availability factor; cost curves unchanged.
    pub fn derated(&self, availability: f64) -> Self {
        Self {
            small: self.small.derated(availability),
            medium: self.medium.derated(availability),
            large: self.large.derated(availability),
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        let tiers = [("small", &self.small), ("medium", &self.medium), ("large", &self.large)];
        for (name, tier) in tiers {
            if !(tier.min_flow < tier.max_flow) {
                return Err(ParameterError::NonContiguousTiers(format!(
                    "{} tier min flow {} is not below max flow {}",
                    name, tier.min_flow, tier.max_flow
                )));
            }
        }
        for pair in tiers.windows(2) {
            let (lower_name, lower) = pair[0];
            let (upper_name, upper) = pair[1];
            if lower.max_flow != upper.min_flow {
                return Err(ParameterError::NonContiguousTiers(format!(
                    "{} tier ends at {} but {} tier starts at {}",
                    lower_name, lower.max_flow, upper_name, upper.min_flow
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineParameters {
    pub opex_fraction: f64,      // share of capex per year
    pub availability: f64,       // derating of tier flow bounds
    pub lifetime_years: f64,
    pub electricity_demand: f64, // kWh per t·km
    pub tiers: PipelineTierTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportParameters {
    pub average_speed_kmh: f64,
    pub working_hours_per_day: f64,
    pub diesel_price: f64,                 // €/L
    pub driver_cost_per_hour: f64,         // €/h
    pub working_days_per_year: f64,
    pub max_driving_distance_km: f64,      // per year, informational
    pub truck_capex: f64,                  // €
    pub truck_opex_fraction: f64,          // share of capex per year
    pub diesel_consumption_l_per_100km: f64,
    pub truck_lifetime_years: f64,
    pub trailer_capex: f64,                // €
    pub trailer_opex_fraction: f64,        // share of capex per year
    pub trailer_net_capacity_kg: f64,
    pub trailer_lifetime_years: f64,
    pub loading_unloading_time_h: f64,
}

impl TransportParameters {
    fn validate(&self) -> Result<(), ParameterError> {
        if !(self.truck_lifetime_years > 0.0) {
            return Err(invalid("transport.truck_lifetime_years", "must be > 0".to_string()));
        }
        if !(self.trailer_lifetime_years > 0.0) {
            return Err(invalid("transport.trailer_lifetime_years", "must be > 0".to_string()));
        }
        if !(self.average_speed_kmh > 0.0) {
            return Err(invalid("transport.average_speed_kmh", "must be > 0".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadParameters {
    pub long_road_capex: f64,  // €/km
    pub short_road_capex: f64, // €/km
    pub road_opex: f64,        // €/km/a
}

/// A country record resolved for one hexagon.
#[derive(Debug, Clone, Copy)]
pub struct CountryLookup<'a> {
    pub code: &'a str,
    pub parameters: &'a CountryParameters,
    pub is_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSet {
    pub countries: HashMap<String, CountryParameters>,
    pub technology: TechnologyCosts,
    #[serde(default)]
    pub plant: PlantParameters,
    pub pipeline: PipelineParameters,
    pub transport: TransportParameters,
    pub road: RoadParameters,
}

impl ParameterSet {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !self.countries.contains_key(FALLBACK_COUNTRY) {
            return Err(ParameterError::MissingCountry(FALLBACK_COUNTRY.to_string()));
        }
        for (code, country) in &self.countries {
            country.validate(code)?;
        }
        self.technology.validate()?;
        self.plant.validate()?;
        self.pipeline.tiers.validate()?;
        if !(self.pipeline.lifetime_years > 0.0) {
            return Err(invalid("pipeline.lifetime_years", "must be > 0".to_string()));
        }
        if !(self.pipeline.availability > 0.0) {
            return Err(invalid("pipeline.availability", "must be > 0".to_string()));
        }
        self.transport.validate()?;
        Ok(())
    }

    /// Country record for `code`, or the "Other" record when the country
    /// is not in the table.
    pub fn country_or_fallback<'a>(&'a self, code: &'a str) -> Result<CountryLookup<'a>, ParameterError> {
        if let Some(parameters) = self.countries.get(code) {
            return Ok(CountryLookup {
                code,
                parameters,
                is_fallback: false,
            });
        }
        self.countries
            .get_key_value(FALLBACK_COUNTRY)
            .map(|(key, parameters)| CountryLookup {
                code: key.as_str(),
                parameters,
                is_fallback: true,
            })
            .ok_or_else(|| ParameterError::MissingCountry(code.to_string()))
    }
}

fn invalid(field: &str, reason: String) -> ParameterError {
    ParameterError::Invalid {
        field: field.to_string(),
        reason,
    }
}
