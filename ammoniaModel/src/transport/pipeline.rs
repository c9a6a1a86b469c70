// Tiered pipeline cost model
use std::fmt;

use crate::config::const_funcs::crf;
use crate::config::constants::{KG_PER_TONNE, PIPELINE_CAPEX_DISTANCE_UNIT_KM};
use crate::config::parameters::{PipelineParameters, PipelineTier, PipelineTierTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineSize {
    Small,
    Medium,
    Large,
}

impl PipelineSize {
    pub fn label(&self) -> &'static str {
        match self {
            PipelineSize::Small => "Small Pipeline",
            PipelineSize::Medium => "Medium Pipeline",
            PipelineSize::Large => "Large Pipeline",
        }
    }

    pub fn tier<'a>(&self, table: &'a PipelineTierTable) -> &'a PipelineTier {
        match self {
            PipelineSize::Small => &table.small,
            PipelineSize::Medium => &table.medium,
            PipelineSize::Large => &table.large,
        }
    }
}

impl fmt::Display for PipelineSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const FLOW_TOO_SMALL_LABEL: &str = "Flow too small for pipeline";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSplit {
    pub pipelines: u32,
    pub flow_per_pipeline: f64, // t/a
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineEstimate {
    Sized {
        cost_per_kg: f64,
        size: PipelineSize,
        split: PipelineSplit,
    },
    TooSmall,
}

impl PipelineEstimate {
    /// NaN when the flow is below the smallest tier.
    pub fn cost_per_kg(&self) -> f64 {
        match self {
            PipelineEstimate::Sized { cost_per_kg, .. } => *cost_per_kg,
            PipelineEstimate::TooSmall => f64::NAN,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PipelineEstimate::Sized { size, .. } => size.label(),
            PipelineEstimate::TooSmall => FLOW_TOO_SMALL_LABEL,
        }
    }

    pub fn is_too_small(&self) -> bool {
        matches!(self, PipelineEstimate::TooSmall)
    }
}

/// Splits a flow that exceeds the largest tier over equal parallel pipelines.
pub fn split_flow(quantity_t: f64, large_max_flow: f64) -> PipelineSplit {
    let pipelines = if quantity_t > large_max_flow {
        (quantity_t / large_max_flow).ceil() as u32
    } else {
        1
    };
    PipelineSplit {
        pipelines,
        flow_per_pipeline: quantity_t / f64::from(pipelines),
    }
}

/// Tier whose `[min, next min)` range holds `flow`; the large tier is closed
/// at its max. `None` below the small tier minimum.
pub fn classify(flow: f64, table: &PipelineTierTable) -> Option<PipelineSize> {
    if !(flow >= table.small.min_flow) {
        None
    } else if flow < table.medium.min_flow {
        Some(PipelineSize::Small)
    } else if flow < table.large.min_flow {
        Some(PipelineSize::Medium)
    } else {
        Some(PipelineSize::Large)
    }
}

/// Annualized pipeline cost per kg for `quantity_kg` a year over
/// `distance_km`.
pub fn estimate(
    distance_km: f64,
    quantity_kg: f64,
    electricity_price: f64,
    interest: f64,
    params: &PipelineParameters,
) -> PipelineEstimate {
    let quantity_t = quantity_kg / KG_PER_TONNE;
    let tiers = params.tiers.derated(params.availability);

    let split = split_flow(quantity_t, tiers.large.max_flow);
    let size = match classify(split.flow_per_pipeline, &tiers) {
        Some(size) => size,
        None => return PipelineEstimate::TooSmall,
    };

    let coefficient = size.tier(&tiers).capex_coefficient(split.flow_per_pipeline);
    let base = f64::from(split.pipelines) * coefficient * distance_km / PIPELINE_CAPEX_DISTANCE_UNIT_KM
        * split.flow_per_pipeline;

    let capex_annual = base * crf(interest, params.lifetime_years);
    let opex_annual = params.opex_fraction * base;
    // Electricity demand is specified per tonne of flow and km
    let electricity_annual = params.electricity_demand * distance_km * quantity_t * electricity_price;

    PipelineEstimate::Sized {
        cost_per_kg: (capex_annual + opex_annual + electricity_annual) / (quantity_t * KG_PER_TONNE),
        size,
        split,
    }
}
