// Cost of supplying one demand center from one hexagon, per transport mode
use tracing::{debug, error, warn};

use crate::analysis::cost_components::cost_components;
use crate::config::parameters::{CountryParameters, ParameterSet};
use crate::config::run_config::RunConfig;
use crate::data::profile_loader::RenewableProfiles;
use crate::demand::schedule::DemandScheduler;
use crate::error::{EvaluationError, EvaluationFailure, ParameterError};
use crate::models::asset::TransportMode;
use crate::models::demand_center::DemandCenter;
use crate::models::hexagon::Hexagon;
use crate::models::results::{CellStatus, DemandCenterResult, ModeResult, OptimizationOutcome};
use crate::optimizer::capacity::{CapacityOptimizer, CapacityRequest};
use crate::optimizer::solver::LpSolver;
use crate::transport::pipeline::{self, PipelineEstimate};
use crate::transport::road::{road_access, RoadAccess};
use crate::transport::trucking;
use crate::utils::logging::{self, EvaluationSubcategory, OperationCategory};

/// Result of one hexagon / demand center pair, plus any fatal per-mode
/// errors that were turned into `SolverError` or `MissingData` cells.
#[derive(Debug)]
pub struct SiteEvaluation {
    pub result: DemandCenterResult,
    pub failures: Vec<EvaluationFailure>,
}

// Geometry and road access shared by both modes of one pair
struct Route {
    distance_km: f64,
    contained: bool,
    road: RoadAccess,
}

struct Transport {
    cost_per_kg: f64,
    status: CellStatus,
    label: &'static str,
}

/// Evaluates hexagon / demand center pairs against a fixed set of reference
/// data. Holds no mutable state and can be shared across threads.
pub struct SiteEvaluator<'a> {
    parameters: &'a ParameterSet,
    config: &'a RunConfig,
    profiles: &'a RenewableProfiles,
    solver: &'a dyn LpSolver,
    scheduler: DemandScheduler,
}

impl<'a> SiteEvaluator<'a> {
    pub fn new(
        parameters: &'a ParameterSet,
        config: &'a RunConfig,
        profiles: &'a RenewableProfiles,
        solver: &'a dyn LpSolver,
    ) -> Result<Self, ParameterError> {
        let scheduler = DemandScheduler::new(config.horizon()?, config.frequency);
        Ok(Self {
            parameters,
            config,
            profiles,
            solver,
            scheduler,
        })
    }

    pub fn config(&self) -> &RunConfig {
        self.config
    }

    pub fn parameters(&self) -> &ParameterSet {
        self.parameters
    }

    pub fn scheduler(&self) -> &DemandScheduler {
        &self.scheduler
    }

    pub fn evaluate(&self, hexagon: &Hexagon, demand_center: &DemandCenter) -> SiteEvaluation {
        let _timing = logging::start_timing(
            "evaluate_site",
            OperationCategory::Evaluation {
                subcategory: EvaluationSubcategory::Assembly,
            },
        );

        let mut failures = Vec::new();
        let country = match self.parameters.country_or_fallback(&hexagon.country) {
            Ok(lookup) => {
                if lookup.is_fallback {
                    warn!(
                        hexagon = %hexagon.id,
                        country = %hexagon.country,
                        "No parameters for country, using {}",
                        lookup.code
                    );
                }
                lookup.parameters
            }
            Err(_) => {
                let mut result = self.unavailable_result(demand_center, CellStatus::MissingData);
                for mode in self.modes() {
                    let err = EvaluationError::Parameter(ParameterError::MissingCountry(hexagon.country.clone()));
                    failures.push(self.failure(hexagon, demand_center, mode, err));
                }
                if !self.config.pipeline_construction {
                    result.pipeline = ModeResult::unavailable(CellStatus::PipelineDisabled);
                }
                return SiteEvaluation { result, failures };
            }
        };

        let route = self.route(hexagon, demand_center, country);
        let quantity = demand_center.annual_demand_kg;
        let road_cost_per_kg = if route.contained {
            0.0
        } else {
            route.road.annual_cost() / quantity
        };

        let mut pipeline_type = String::new();
        let trucking = match self.evaluate_mode(hexagon, demand_center, country, &route, TransportMode::Trucking) {
            Ok((mut mode_result, _)) => {
                mode_result.total_cost += road_cost_per_kg;
                mode_result
            }
            Err(err) => self.record_failure(&mut failures, hexagon, demand_center, TransportMode::Trucking, err),
        };

        let pipeline = if !self.config.pipeline_construction {
            ModeResult::unavailable(CellStatus::PipelineDisabled)
        } else {
            match self.evaluate_mode(hexagon, demand_center, country, &route, TransportMode::Pipeline) {
                Ok((mode_result, label)) => {
                    pipeline_type = label.to_string();
                    mode_result
                }
                Err(err) => self.record_failure(&mut failures, hexagon, demand_center, TransportMode::Pipeline, err),
            }
        };

        SiteEvaluation {
            result: DemandCenterResult {
                demand_center: demand_center.name.clone(),
                trucking,
                pipeline,
                road_construction_cost: road_cost_per_kg,
                pipeline_type,
            },
            failures,
        }
    }

    fn modes(&self) -> Vec<TransportMode> {
        if self.config.pipeline_construction {
            TransportMode::ALL.to_vec()
        } else {
            vec![TransportMode::Trucking]
        }
    }

    fn route(&self, hexagon: &Hexagon, demand_center: &DemandCenter, country: &CountryParameters) -> Route {
        let contained = hexagon.contains(&demand_center.location);
        let road = if contained {
            RoadAccess::Existing
        } else {
            road_access(
                hexagon.road_dist,
                self.config.road_construction,
                &country.infrastructure,
                &self.parameters.road,
            )
        };
        Route {
            distance_km: hexagon.distance_to(&demand_center.location),
            contained,
            road,
        }
    }

    // Production and transport for one mode; total excludes road construction
    fn evaluate_mode(
        &self,
        hexagon: &Hexagon,
        demand_center: &DemandCenter,
        country: &CountryParameters,
        route: &Route,
        mode: TransportMode,
    ) -> Result<(ModeResult, &'static str), EvaluationError> {
        let quantity = demand_center.annual_demand_kg;

        let outcome = {
            let _timing = logging::start_timing(
                "evaluate_production",
                OperationCategory::Evaluation {
                    subcategory: EvaluationSubcategory::Production,
                },
            );
            let demand = self
                .scheduler
                .schedule(mode, quantity, self.parameters.transport.trailer_net_capacity_kg);
            let (wind_cf, solar_cf) = self.profiles.for_profile(&hexagon.id, &demand, self.scheduler.horizon().end())?;

            let optimizer = CapacityOptimizer::new(self.solver, &self.parameters.technology, &self.parameters.plant);
            optimizer.optimize(&CapacityRequest {
                wind_cf: &wind_cf,
                solar_cf: &solar_cf,
                demand: &demand,
                wind_max_capacity: hexagon.wind_max_capacity,
                solar_max_capacity: hexagon.solar_max_capacity,
                country,
                water_limit: if self.config.enforce_water_limit {
                    hexagon.water_limit
                } else {
                    None
                },
            })?
        };

        let transport = {
            let _timing = logging::start_timing(
                "evaluate_transport",
                OperationCategory::Evaluation {
                    subcategory: EvaluationSubcategory::Transport,
                },
            );
            self.transport_cost(country, route, quantity, mode)
        };

        let status = match outcome {
            OptimizationOutcome::Infeasible { .. } => CellStatus::InsufficientWater,
            OptimizationOutcome::Solved { .. } => transport.status,
        };
        let production_cost = outcome.lcoa();
        let capacities = outcome.capacities();
        let components = if self.config.cost_components && outcome.is_feasible() {
            cost_components(&capacities, country, &self.parameters.technology, quantity)
        } else {
            Vec::new()
        };

        debug!(
            hexagon = %hexagon.id,
            demand_center = %demand_center.name,
            %mode,
            production_cost,
            transport_cost = transport.cost_per_kg,
            status = %status,
            "Mode evaluated"
        );

        Ok((
            ModeResult {
                capacities,
                production_cost,
                transport_cost: transport.cost_per_kg,
                total_cost: production_cost + transport.cost_per_kg,
                status,
                components,
            },
            transport.label,
        ))
    }

    fn transport_cost(&self, country: &CountryParameters, route: &Route, quantity: f64, mode: TransportMode) -> Transport {
        if route.contained {
            return Transport {
                cost_per_kg: 0.0,
                status: CellStatus::Ok,
                label: "",
            };
        }

        let interest = country.infrastructure.interest_rate;
        match mode {
            TransportMode::Trucking if !route.road.is_available() => Transport {
                cost_per_kg: f64::NAN,
                status: CellStatus::NoRoadAccess,
                label: "",
            },
            TransportMode::Trucking => Transport {
                cost_per_kg: trucking::trucking_cost_per_kg(
                    route.distance_km,
                    quantity,
                    interest,
                    &self.parameters.transport,
                ),
                status: CellStatus::Ok,
                label: "",
            },
            TransportMode::Pipeline => {
                let estimate = pipeline::estimate(
                    route.distance_km,
                    quantity,
                    country.electricity_price,
                    interest,
                    &self.parameters.pipeline,
                );
                Transport {
                    cost_per_kg: estimate.cost_per_kg(),
                    status: match estimate {
                        PipelineEstimate::TooSmall => CellStatus::FlowTooSmallForPipeline,
                        PipelineEstimate::Sized { .. } => CellStatus::Ok,
                    },
                    label: estimate.label(),
                }
            }
        }
    }

    fn unavailable_result(&self, demand_center: &DemandCenter, status: CellStatus) -> DemandCenterResult {
        DemandCenterResult {
            demand_center: demand_center.name.clone(),
            trucking: ModeResult::unavailable(status),
            pipeline: ModeResult::unavailable(status),
            road_construction_cost: f64::NAN,
            pipeline_type: String::new(),
        }
    }

    fn record_failure(
        &self,
        failures: &mut Vec<EvaluationFailure>,
        hexagon: &Hexagon,
        demand_center: &DemandCenter,
        mode: TransportMode,
        err: EvaluationError,
    ) -> ModeResult {
        let status = match err {
            EvaluationError::Solver(_) => CellStatus::SolverError,
            EvaluationError::MissingProfile(_)
            | EvaluationError::ProfileMismatch { .. }
            | EvaluationError::Parameter(_) => CellStatus::MissingData,
        };
        let failure = self.failure(hexagon, demand_center, mode, err);
        error!("Evaluation failed: {}", failure);
        failures.push(failure);
        ModeResult::unavailable(status)
    }

    fn failure(
        &self,
        hexagon: &Hexagon,
        demand_center: &DemandCenter,
        mode: TransportMode,
        error: EvaluationError,
    ) -> EvaluationFailure {
        EvaluationFailure {
            hexagon_id: hexagon.id.clone(),
            demand_center: demand_center.name.clone(),
            mode,
            error,
        }
    }
}
