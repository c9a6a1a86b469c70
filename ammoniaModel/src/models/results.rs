// Result records produced by the optimizer and the site evaluator
use std::fmt;

use crate::config::constants::MISSING;
use crate::models::asset::{AssetClass, TransportMode};

/// Optimal installed capacity per asset class (MW or MWh).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantCapacities {
    pub wind: f64,
    pub solar: f64,
    pub electrolyzer: f64,
    pub battery: f64,
    pub h2_storage: f64,
    pub nh3_storage: f64,
    pub ammonia_synthesis: f64,
}

impl PlantCapacities {
    pub fn missing() -> Self {
        Self::uniform(MISSING)
    }

    pub fn uniform(value: f64) -> Self {
        Self {
            wind: value,
            solar: value,
            electrolyzer: value,
            battery: value,
            h2_storage: value,
            nh3_storage: value,
            ammonia_synthesis: value,
        }
    }

    pub fn get(&self, asset: AssetClass) -> f64 {
        match asset {
            AssetClass::Wind => self.wind,
            AssetClass::Solar => self.solar,
            AssetClass::Electrolyzer => self.electrolyzer,
            AssetClass::Battery => self.battery,
            AssetClass::CompressedH2Store => self.h2_storage,
            AssetClass::AmmoniaStore => self.nh3_storage,
            AssetClass::AmmoniaSynthesis => self.ammonia_synthesis,
        }
    }

    pub fn set(&mut self, asset: AssetClass, value: f64) {
        let slot = match asset {
            AssetClass::Wind => &mut self.wind,
            AssetClass::Solar => &mut self.solar,
            AssetClass::Electrolyzer => &mut self.electrolyzer,
            AssetClass::Battery => &mut self.battery,
            AssetClass::CompressedH2Store => &mut self.h2_storage,
            AssetClass::AmmoniaStore => &mut self.nh3_storage,
            AssetClass::AmmoniaSynthesis => &mut self.ammonia_synthesis,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, f64)> + '_ {
        AssetClass::ALL.into_iter().map(move |asset| (asset, self.get(asset)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfeasibilityReason {
    InsufficientWater,
}

/// Outcome of one capacity optimization. Infeasibility is a value, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizationOutcome {
    Solved {
        lcoa: f64,        // €/kg
        annual_cost: f64, // €/a
        capacities: PlantCapacities,
    },
    Infeasible {
        reason: InfeasibilityReason,
    },
}

impl OptimizationOutcome {
    pub fn lcoa(&self) -> f64 {
        match self {
            OptimizationOutcome::Solved { lcoa, .. } => *lcoa,
            OptimizationOutcome::Infeasible { .. } => MISSING,
        }
    }

    pub fn capacities(&self) -> PlantCapacities {
        match self {
            OptimizationOutcome::Solved { capacities, .. } => *capacities,
            OptimizationOutcome::Infeasible { .. } => PlantCapacities::missing(),
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, OptimizationOutcome::Solved { .. })
    }
}

/// Reason code attached to every result cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellStatus {
    Ok,
    FlowTooSmallForPipeline,
    InsufficientWater,
    SolverError,
    MissingData,
    PipelineDisabled,
    NoRoadAccess,
}

impl CellStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellStatus::Ok => "ok",
            CellStatus::FlowTooSmallForPipeline => "flow too small for pipeline",
            CellStatus::InsufficientWater => "insufficient water",
            CellStatus::SolverError => "solver error",
            CellStatus::MissingData => "missing data",
            CellStatus::PipelineDisabled => "pipeline disabled",
            CellStatus::NoRoadAccess => "no road access",
        }
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Annualized capital cost of one asset and its share of the LCOA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostComponent {
    pub asset: AssetClass,
    pub annual_cost: f64,
    pub lcoa_portion: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModeResult {
    pub capacities: PlantCapacities,
    pub production_cost: f64, // €/kg
    pub transport_cost: f64,  // €/kg
    pub total_cost: f64,      // €/kg
    pub status: CellStatus,
    pub components: Vec<CostComponent>,
}

impl ModeResult {
    pub fn unavailable(status: CellStatus) -> Self {
        Self {
            capacities: PlantCapacities::missing(),
            production_cost: MISSING,
            transport_cost: MISSING,
            total_cost: MISSING,
            status,
            components: Vec::new(),
        }
    }
}

/// Everything computed for one hexagon and one demand center.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandCenterResult {
    pub demand_center: String,
    pub trucking: ModeResult,
    pub pipeline: ModeResult,
    pub road_construction_cost: f64, // €/kg
    pub pipeline_type: String,
}

impl DemandCenterResult {
    /// Cheapest finite total over both modes, missing if neither is known.
    pub fn lowest_cost(&self) -> f64 {
        [self.trucking.total_cost, self.pipeline.total_cost]
            .into_iter()
            .filter(|cost| cost.is_finite())
            .fold(MISSING, |best, cost| if best.is_nan() || cost < best { cost } else { best })
    }

    pub fn mode(&self, mode: TransportMode) -> &ModeResult {
        match mode {
            TransportMode::Trucking => &self.trucking,
            TransportMode::Pipeline => &self.pipeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(trucking_total: f64, pipeline_total: f64) -> DemandCenterResult {
        let mut trucking = ModeResult::unavailable(CellStatus::Ok);
        trucking.total_cost = trucking_total;
        let mut pipeline = ModeResult::unavailable(CellStatus::Ok);
        pipeline.total_cost = pipeline_total;
        DemandCenterResult {
            demand_center: "Hamburg".to_string(),
            trucking,
            pipeline,
            road_construction_cost: 0.0,
            pipeline_type: String::new(),
        }
    }

    #[test]
    fn test_lowest_cost_ignores_unknowns() {
        assert_eq!(result(1.2, 0.9).lowest_cost(), 0.9);
        assert_eq!(result(1.2, f64::NAN).lowest_cost(), 1.2);
        assert_eq!(result(f64::INFINITY, 2.0).lowest_cost(), 2.0);
        assert!(result(f64::NAN, f64::NAN).lowest_cost().is_nan());
    }

    #[test]
    fn test_infeasible_outcome_is_all_missing() {
        let outcome = OptimizationOutcome::Infeasible {
            reason: InfeasibilityReason::InsufficientWater,
        };
        assert!(outcome.lcoa().is_nan());
        assert!(outcome.capacities().iter().all(|(_, v)| v.is_nan()));
    }

    #[test]
    fn test_capacity_accessors() {
        let mut caps = PlantCapacities::uniform(0.0);
        caps.set(AssetClass::AmmoniaStore, 12.5);
        assert_eq!(caps.get(AssetClass::AmmoniaStore), 12.5);
        assert_eq!(caps.nh3_storage, 12.5);
        assert_eq!(caps.iter().count(), 7);
    }
}
