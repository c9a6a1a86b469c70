// Least-cost plant sizing for one hexagon and one demand profile
use tracing::{debug, instrument, warn};

use crate::config::const_funcs::ammonia_kg_from_mwh;
use crate::config::constants::{AMMONIA_TO_HYDROGEN_MASS_RATIO, HYDROGEN_KG_PER_M3_WATER, MISSING};
use crate::config::parameters::{CountryParameters, PlantParameters, TechnologyCosts};
use crate::demand::schedule::DemandProfile;
use crate::error::SolverError;
use crate::models::results::{InfeasibilityReason, OptimizationOutcome, PlantCapacities};
use crate::optimizer::plant_model::{build_plant_model, PlantModelInputs};
use crate::optimizer::solver::LpSolver;
use crate::utils::logging::{self, OperationCategory, OptimizationSubcategory};

/// Site-specific inputs of one optimization.
pub struct CapacityRequest<'a> {
    pub wind_cf: &'a [f64],
    pub solar_cf: &'a [f64],
    pub demand: &'a DemandProfile,
    pub wind_max_capacity: f64,
    pub solar_max_capacity: f64,
    pub country: &'a CountryParameters,
    /// Annual water available (m3); `None` skips the water check
    pub water_limit: Option<f64>,
}

/// Hydrogen mass (kg/a) the weighted demand profile calls for.
pub fn required_hydrogen_kg(demand: &DemandProfile) -> f64 {
    demand.weighted_total() * AMMONIA_TO_HYDROGEN_MASS_RATIO
}

/// Hydrogen mass (kg/a) electrolysis can make from `water_m3`.
pub fn hydrogen_from_water_kg(water_m3: f64) -> f64 {
    water_m3 * HYDROGEN_KG_PER_M3_WATER
}

pub fn has_enough_water(demand: &DemandProfile, water_limit: f64) -> bool {
    required_hydrogen_kg(demand) <= hydrogen_from_water_kg(water_limit)
}

pub struct CapacityOptimizer<'a> {
    solver: &'a dyn LpSolver,
    technology: &'a TechnologyCosts,
    plant: &'a PlantParameters,
}

impl<'a> CapacityOptimizer<'a> {
    pub fn new(solver: &'a dyn LpSolver, technology: &'a TechnologyCosts, plant: &'a PlantParameters) -> Self {
        Self {
            solver,
            technology,
            plant,
        }
    }

    /// Sizes the plant for `request`.
    ///
    /// Returns `Infeasible` without building a model when the water check
    /// fails. Undefined cost coefficients give a `Solved` outcome with
    /// missing values; every other failure to solve is an error.
    #[instrument(skip_all, fields(samples = request.demand.len()))]
    pub fn optimize(&self, request: &CapacityRequest<'_>) -> Result<OptimizationOutcome, SolverError> {
        if let Some(limit) = request.water_limit {
            if !has_enough_water(request.demand, limit) {
                warn!(
                    required_h2_kg = required_hydrogen_kg(request.demand),
                    water_limit_m3 = limit,
                    "Not enough water for electrolysis"
                );
                return Ok(OptimizationOutcome::Infeasible {
                    reason: InfeasibilityReason::InsufficientWater,
                });
            }
        }

        let steps = request.demand.len();
        if request.wind_cf.len() != steps || request.solar_cf.len() != steps {
            return Err(SolverError::Failed(format!(
                "renewable profiles have {} / {} samples for a {} sample demand profile",
                request.wind_cf.len(),
                request.solar_cf.len(),
                steps
            )));
        }
        if request.demand.values().iter().any(|v| !v.is_finite()) {
            return Err(SolverError::Failed("demand profile has non-finite values".to_string()));
        }

        let model = {
            let _timing = logging::start_timing(
                "build_plant_model",
                OperationCategory::Optimization {
                    subcategory: OptimizationSubcategory::ModelBuild,
                },
            );
            build_plant_model(&PlantModelInputs {
                wind_cf: request.wind_cf,
                solar_cf: request.solar_cf,
                demand: request.demand,
                wind_max_capacity: request.wind_max_capacity,
                solar_max_capacity: request.solar_max_capacity,
                country: request.country,
                technology: self.technology,
                plant: self.plant,
            })
        };

        // Zero interest leaves the CRF undefined
        if model.program.objective().iter().any(|(_, c)| !c.is_finite()) {
            warn!(plant_interest_rate = request.country.plant.interest_rate, "Non-finite annualized cost coefficient");
            return Ok(OptimizationOutcome::Solved {
                lcoa: MISSING,
                annual_cost: MISSING,
                capacities: PlantCapacities::missing(),
            });
        }

        let solution = self.solver.solve(&model.program)?;
        let annual_cost = solution.objective();
        let delivered_kg = ammonia_kg_from_mwh(model.delivered_mwh());
        let lcoa = annual_cost / delivered_kg;

        debug!(annual_cost, delivered_kg, lcoa, "Plant optimized");

        Ok(OptimizationOutcome::Solved {
            lcoa,
            annual_cost,
            capacities: model.capacities(&solution),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parameters::fixtures::{country, technology};
    use crate::config::parameters::FinancialParameters;
    use crate::demand::schedule::Frequency;
    use crate::optimizer::lp::{LinearProgram, LpSolution};
    use crate::optimizer::solver::ClarabelSolver;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSolver {
        calls: AtomicUsize,
    }

    impl LpSolver for CountingSolver {
        fn solve(&self, problem: &LinearProgram) -> Result<LpSolution, SolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LpSolution::new(vec![1.0; problem.num_variables()], 1.0e6))
        }
    }

    fn profile(values: Vec<f64>) -> DemandProfile {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        DemandProfile::from_values(start, Frequency::from_hours(12).unwrap(), values)
    }

    fn request<'a>(
        demand: &'a DemandProfile,
        wind: &'a [f64],
        solar: &'a [f64],
        country: &'a CountryParameters,
        water_limit: Option<f64>,
    ) -> CapacityRequest<'a> {
        CapacityRequest {
            wind_cf: wind,
            solar_cf: solar,
            demand,
            wind_max_capacity: 1_000.0,
            solar_max_capacity: 1_000.0,
            country,
            water_limit,
        }
    }

    #[test]
    fn test_water_check() {
        // 1000 kg NH3 needs 1000·17/3 kg H2 under the fixed ratio
        let demand = profile(vec![1000.0 / 8760.0; 4]);
        let needed = required_hydrogen_kg(&demand);
        assert_relative_eq!(needed, 1000.0 * 17.0 / 3.0, max_relative = 1e-12);
        assert!(has_enough_water(&demand, needed / HYDROGEN_KG_PER_M3_WATER + 1e-9));
        assert!(!has_enough_water(&demand, 0.99 * needed / HYDROGEN_KG_PER_M3_WATER));
    }

    #[test]
    fn test_zero_water_is_infeasible_without_solving() {
        let solver = CountingSolver { calls: AtomicUsize::new(0) };
        let tech = technology();
        let plant = PlantParameters::default();
        let c = country();
        let optimizer = CapacityOptimizer::new(&solver, &tech, &plant);

        let demand = profile(vec![500.0; 4]);
        let cf = [0.5; 4];
        let outcome = optimizer.optimize(&request(&demand, &cf, &cf, &c, Some(0.0))).unwrap();

        assert_eq!(
            outcome,
            OptimizationOutcome::Infeasible {
                reason: InfeasibilityReason::InsufficientWater
            }
        );
        assert!(outcome.capacities().iter().all(|(_, v)| v.is_nan()));
        assert_eq!(solver.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_interest_rate_gives_unknown_cost() {
        let solver = CountingSolver { calls: AtomicUsize::new(0) };
        let tech = technology();
        let plant = PlantParameters::default();
        let mut c = country();
        c.plant = FinancialParameters::new(0.0, 20.0);
        let optimizer = CapacityOptimizer::new(&solver, &tech, &plant);

        let demand = profile(vec![500.0; 4]);
        let cf = [0.5; 4];
        let outcome = optimizer.optimize(&request(&demand, &cf, &cf, &c, None)).unwrap();

        assert!(outcome.is_feasible());
        assert!(outcome.lcoa().is_nan());
        assert!(outcome.capacities().iter().all(|(_, v)| v.is_nan()));
        assert_eq!(solver.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lcoa_is_objective_over_delivered_kg() {
        let solver = CountingSolver { calls: AtomicUsize::new(0) };
        let tech = technology();
        let plant = PlantParameters::default();
        let c = country();
        let optimizer = CapacityOptimizer::new(&solver, &tech, &plant);

        let demand = profile(vec![2.0e6 / 8760.0; 4]);
        let cf = [0.5; 4];
        let outcome = optimizer.optimize(&request(&demand, &cf, &cf, &c, None)).unwrap();
        assert_relative_eq!(outcome.lcoa(), 1.0e6 / 2.0e6, max_relative = 1e-9);
        assert_eq!(outcome.capacities().wind, 1.0);
    }

    #[test]
    fn test_profile_length_mismatch_is_an_error() {
        let solver = CountingSolver { calls: AtomicUsize::new(0) };
        let tech = technology();
        let plant = PlantParameters::default();
        let c = country();
        let optimizer = CapacityOptimizer::new(&solver, &tech, &plant);

        let demand = profile(vec![1.0; 4]);
        let cf = [0.5; 3];
        assert!(optimizer.optimize(&request(&demand, &cf, &cf, &c, None)).is_err());
    }

    #[test]
    fn test_zero_demand_needs_no_plant() {
        let solver = ClarabelSolver::new();
        let tech = technology();
        let plant = PlantParameters::default();
        let c = country();
        let optimizer = CapacityOptimizer::new(&solver, &tech, &plant);

        let demand = profile(vec![0.0; 6]);
        let wind = [0.2, 0.6, 0.9, 0.4, 0.1, 0.7];
        let solar = [0.0, 0.8, 0.0, 0.7, 0.0, 0.5];
        let outcome = optimizer.optimize(&request(&demand, &wind, &solar, &c, Some(1.0e6))).unwrap();

        match outcome {
            OptimizationOutcome::Solved { annual_cost, capacities, .. } => {
                assert_abs_diff_eq!(annual_cost, 0.0, epsilon = 1e-3);
                for (_, capacity) in capacities.iter() {
                    assert_abs_diff_eq!(capacity, 0.0, epsilon = 1e-5);
                }
            }
            OptimizationOutcome::Infeasible { .. } => panic!("zero demand must be feasible"),
        }
    }

    #[test]
    fn test_positive_demand_sizes_plant() {
        let solver = ClarabelSolver::new();
        let tech = technology();
        let plant = PlantParameters::default();
        let c = country();
        let optimizer = CapacityOptimizer::new(&solver, &tech, &plant);

        // 10 kt NH3 a year, served every sample
        let demand = profile(vec![1.0e7 / 8760.0; 6]);
        let wind = [0.2, 0.6, 0.9, 0.4, 0.1, 0.7];
        let solar = [0.0, 0.8, 0.0, 0.7, 0.0, 0.5];
        let outcome = optimizer.optimize(&request(&demand, &wind, &solar, &c, None)).unwrap();

        let caps = outcome.capacities();
        assert!(outcome.is_feasible());
        assert!(outcome.lcoa() > 0.0 && outcome.lcoa().is_finite());
        assert!(caps.electrolyzer > 0.0);
        assert!(caps.ammonia_synthesis > 0.0);
        assert!(caps.wind + caps.solar > 0.0);
        assert!(caps.wind <= 1_000.0 + 1e-6);
    }

    #[test]
    fn test_no_renewables_cannot_serve_demand() {
        let solver = ClarabelSolver::new();
        let tech = technology();
        let plant = PlantParameters::default();
        let c = country();
        let optimizer = CapacityOptimizer::new(&solver, &tech, &plant);

        let demand = profile(vec![1000.0; 4]);
        let cf = [0.0; 4];
        assert!(optimizer.optimize(&request(&demand, &cf, &cf, &c, None)).is_err());
    }
}
