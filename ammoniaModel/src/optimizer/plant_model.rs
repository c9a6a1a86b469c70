//! Linear program of a green ammonia plant.
//!
//! The plant is a small energy network on an HHV basis:
//!
//! * power bus: wind and solar generation, battery charge/discharge,
//!   electrolyzer intake, synthesis and compression auxiliaries
//! * hydrogen bus: electrolyzer output, compression into and release from
//!   the compressed hydrogen store, synthesis intake
//! * ammonia bus: synthesis output, ammonia store in/out, demand
//!
//! Every store has a cyclic state of charge over the horizon, and each
//! sample stands for `weight` hours. Capacities are the investment
//! variables; the objective is their annualized cost plus a tiny marginal
//! cost on compression.
use crate::config::const_funcs::ammonia_mwh_from_kg;
use crate::config::constants::COMPRESSION_MARGINAL_COST;
use crate::config::parameters::{CountryParameters, PlantParameters, TechnologyCosts};
use crate::demand::schedule::DemandProfile;
use crate::models::asset::AssetClass;
use crate::models::results::PlantCapacities;
use crate::optimizer::lp::{LinearProgram, LpSolution, Sense, VarId};

pub struct PlantModelInputs<'a> {
    pub wind_cf: &'a [f64],
    pub solar_cf: &'a [f64],
    pub demand: &'a DemandProfile,
    pub wind_max_capacity: f64,
    pub solar_max_capacity: f64,
    pub country: &'a CountryParameters,
    pub technology: &'a TechnologyCosts,
    pub plant: &'a PlantParameters,
}

pub struct PlantModel {
    pub program: LinearProgram,
    capacity_vars: Vec<(AssetClass, VarId)>,
    delivered_mwh: f64,
}

impl PlantModel {
    /// Weighted ammonia delivered over the horizon (MWh NH3).
    pub fn delivered_mwh(&self) -> f64 {
        self.delivered_mwh
    }

    pub fn capacity_var(&self, asset: AssetClass) -> Option<VarId> {
        self.capacity_vars
            .iter()
            .find(|(a, _)| *a == asset)
            .map(|&(_, var)| var)
    }

    /// Reads the capacities out of a solution, clipping solver noise below zero.
    pub fn capacities(&self, solution: &LpSolution) -> PlantCapacities {
        let mut capacities = PlantCapacities::uniform(0.0);
        for &(asset, var) in &self.capacity_vars {
            capacities.set(asset, solution.value(var).max(0.0));
        }
        capacities
    }
}

struct StoreVars {
    level: Vec<VarId>,
    charge: Vec<VarId>,
    discharge: Vec<VarId>,
}

fn finite_bound(value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value.max(0.0))
    } else {
        None
    }
}

/// Capacity factors clipped to the generator's per-unit output ceiling.
fn capped_factors(factors: &[f64], ceiling: Option<f64>) -> Vec<f64> {
    match ceiling {
        Some(max) => factors.iter().map(|&f| f.min(max)).collect(),
        None => factors.to_vec(),
    }
}

fn series(lp: &mut LinearProgram, name: &str, len: usize) -> Vec<VarId> {
    (0..len).map(|t| lp.add_variable(format!("{}_{}", name, t), 0.0, None)).collect()
}

/// `level[t] = level[t-1] + w·(η_in·charge[t] − discharge[t]/η_out)`, wrapping at t = 0.
fn add_storage_balance(
    lp: &mut LinearProgram,
    name: &str,
    store: &StoreVars,
    weight: f64,
    charge_efficiency: f64,
    discharge_efficiency: f64,
) {
    let len = store.level.len();
    for t in 0..len {
        let prev = if t == 0 { len - 1 } else { t - 1 };
        let mut terms = Vec::with_capacity(4);
        if prev != t {
            terms.push((store.level[t], 1.0));
            terms.push((store.level[prev], -1.0));
        }
        terms.push((store.charge[t], -weight * charge_efficiency));
        terms.push((store.discharge[t], weight / discharge_efficiency));
        lp.add_constraint(format!("{}_soc_{}", name, t), terms, Sense::Eq, 0.0);
    }
}

fn add_capacity_limit(lp: &mut LinearProgram, name: &str, flows: &[VarId], capacity: VarId, factors: Option<&[f64]>) {
    for (t, &flow) in flows.iter().enumerate() {
        let factor = factors.map_or(1.0, |f| f[t]);
        lp.add_constraint(
            format!("{}_limit_{}", name, t),
            vec![(flow, 1.0), (capacity, -factor)],
            Sense::Le,
            0.0,
        );
    }
}

pub fn build_plant_model(inputs: &PlantModelInputs<'_>) -> PlantModel {
    let steps = inputs.demand.len();
    let weight = inputs.demand.weight();
    let plant = inputs.plant;
    let mut lp = LinearProgram::new();

    // Investment variables
    let wind_cap = lp.add_variable("wind_capacity", 0.0, finite_bound(inputs.wind_max_capacity));
    let solar_cap = lp.add_variable("solar_capacity", 0.0, finite_bound(inputs.solar_max_capacity));
    let electrolyzer_cap = lp.add_variable("electrolyzer_capacity", 0.0, None);
    let battery_cap = lp.add_variable("battery_capacity", 0.0, None);
    let h2_store_cap = lp.add_variable("h2_storage_capacity", 0.0, None);
    let nh3_store_cap = lp.add_variable("nh3_storage_capacity", 0.0, None);
    let synthesis_cap = lp.add_variable("synthesis_capacity", 0.0, None);
    let capacity_vars = vec![
        (AssetClass::Wind, wind_cap),
        (AssetClass::Solar, solar_cap),
        (AssetClass::Electrolyzer, electrolyzer_cap),
        (AssetClass::Battery, battery_cap),
        (AssetClass::CompressedH2Store, h2_store_cap),
        (AssetClass::AmmoniaStore, nh3_store_cap),
        (AssetClass::AmmoniaSynthesis, synthesis_cap),
    ];

    // Dispatch variables
    let wind = series(&mut lp, "wind", steps);
    let solar = series(&mut lp, "solar", steps);
    let electrolysis = series(&mut lp, "electrolysis", steps);
    let synthesis = series(&mut lp, "synthesis", steps);
    let battery = StoreVars {
        level: series(&mut lp, "battery_level", steps),
        charge: series(&mut lp, "battery_charge", steps),
        discharge: series(&mut lp, "battery_discharge", steps),
    };
    let h2_store = StoreVars {
        level: series(&mut lp, "h2_level", steps),
        charge: series(&mut lp, "h2_compression", steps),
        discharge: series(&mut lp, "h2_release", steps),
    };
    let nh3_store = StoreVars {
        level: series(&mut lp, "nh3_level", steps),
        charge: series(&mut lp, "nh3_store_in", steps),
        discharge: series(&mut lp, "nh3_store_out", steps),
    };

    // Generation and conversion limits
    let wind_cf = capped_factors(inputs.wind_cf, inputs.technology.wind.max_output_per_unit);
    let solar_cf = capped_factors(inputs.solar_cf, inputs.technology.solar.max_output_per_unit);
    add_capacity_limit(&mut lp, "wind", &wind, wind_cap, Some(&wind_cf));
    add_capacity_limit(&mut lp, "solar", &solar, solar_cap, Some(&solar_cf));
    add_capacity_limit(&mut lp, "electrolyzer", &electrolysis, electrolyzer_cap, None);
    add_capacity_limit(&mut lp, "synthesis", &synthesis, synthesis_cap, None);
    add_capacity_limit(&mut lp, "battery", &battery.level, battery_cap, None);
    add_capacity_limit(&mut lp, "h2_store", &h2_store.level, h2_store_cap, None);
    add_capacity_limit(&mut lp, "nh3_store", &nh3_store.level, nh3_store_cap, None);

    let mut delivered_mwh = 0.0;
    for t in 0..steps {
        lp.add_constraint(
            format!("power_balance_{}", t),
            vec![
                (wind[t], 1.0),
                (solar[t], 1.0),
                (battery.discharge[t], 1.0),
                (battery.charge[t], -1.0),
                (electrolysis[t], -1.0),
                (synthesis[t], -plant.synthesis_power_demand),
                (h2_store.charge[t], -plant.compression_power_demand),
            ],
            Sense::Eq,
            0.0,
        );

        lp.add_constraint(
            format!("hydrogen_balance_{}", t),
            vec![
                (electrolysis[t], plant.electrolyzer_efficiency),
                (h2_store.discharge[t], 1.0),
                (h2_store.charge[t], -1.0),
                (synthesis[t], -1.0),
            ],
            Sense::Eq,
            0.0,
        );

        // Demand is served in full at every sample
        let demand_mw = ammonia_mwh_from_kg(inputs.demand.values()[t]);
        delivered_mwh += demand_mw * weight;
        lp.add_constraint(
            format!("ammonia_balance_{}", t),
            vec![
                (synthesis[t], plant.synthesis_efficiency),
                (nh3_store.discharge[t], 1.0),
                (nh3_store.charge[t], -1.0),
            ],
            Sense::Eq,
            demand_mw,
        );
    }

    add_storage_balance(
        &mut lp,
        "battery",
        &battery,
        weight,
        plant.battery_charge_efficiency,
        plant.battery_discharge_efficiency,
    );
    add_storage_balance(&mut lp, "h2_store", &h2_store, weight, 1.0, 1.0);
    add_storage_balance(&mut lp, "nh3_store", &nh3_store, weight, 1.0, 1.0);

    // Objective: annualized capacity cost plus weighted compression cost
    for &(asset, var) in &capacity_vars {
        let unit_cost = inputs
            .technology
            .record(asset)
            .annualized_unit_cost(inputs.country.asset_crf(asset));
        lp.add_objective_term(var, unit_cost);
    }
    for &compression in &h2_store.charge {
        lp.add_objective_term(compression, weight * COMPRESSION_MARGINAL_COST);
    }

    PlantModel {
        program: lp,
        capacity_vars,
        delivered_mwh,
    }
}
