use approx::assert_relative_eq;

use geoammonia::data::demand_loader::parse_demand_centers;
use geoammonia::data::hexagon_loader::parse_hexagons;
use geoammonia::data::parameters_loader::parse_parameters;
use geoammonia::data::profile_loader::{parse_profile_table, RenewableProfiles};
use geoammonia::error::{EvaluationError, SolverError};
use geoammonia::models::asset::TransportMode;
use geoammonia::models::results::CellStatus;
use geoammonia::optimizer::lp::{LinearProgram, LpSolution};
use geoammonia::utils::csv_export::write_table;
use geoammonia::{run_evaluation, ClarabelSolver, LpSolver, ParameterSet, RunConfig, SiteEvaluator};

const PARAMETERS: &str = r#"{
  "countries": {
    "DE": {
      "plant": { "interest_rate": 0.08, "lifetime_years": 20 },
      "wind": { "interest_rate": 0.06, "lifetime_years": 25 },
      "solar": { "interest_rate": 0.05, "lifetime_years": 25 },
      "infrastructure": { "interest_rate": 0.08, "lifetime_years": 40 },
      "electricity_price": 0.1
    },
    "Other": {
      "plant": { "interest_rate": 0.1, "lifetime_years": 20 },
      "wind": { "interest_rate": 0.1, "lifetime_years": 25 },
      "solar": { "interest_rate": 0.1, "lifetime_years": 25 },
      "infrastructure": { "interest_rate": 0.1, "lifetime_years": 40 },
      "electricity_price": 0.12
    }
  },
  "technology": {
    "wind": { "capital_cost": 1300000, "operating_cost": { "fraction_of_capex": 0.025 } },
    "solar": { "capital_cost": 600000, "operating_cost": { "fraction_of_capex": 0.02 } },
    "electrolyzer": { "capital_cost": 900000, "operating_cost": { "fraction_of_capex": 0.03 } },
    "battery": { "capital_cost": 250000, "operating_cost": { "fraction_of_capex": 0.02 } },
    "compressed_h2_store": { "capital_cost": 20000, "operating_cost": { "fraction_of_capex": 0.01 } },
    "ammonia_store": { "capital_cost": 1000, "operating_cost": { "fraction_of_capex": 0.02 } },
    "ammonia_synthesis": { "capital_cost": 1200000, "operating_cost": { "fraction_of_capex": 0.03 } }
  },
  "pipeline": {
    "opex_fraction": 0.02,
    "availability": 0.5,
    "lifetime_years": 42,
    "electricity_demand": 0.05,
    "tiers": {
      "small": { "min_flow": 1000, "max_flow": 50000, "y_intercept": 30, "slope": -0.0002 },
      "medium": { "min_flow": 50000, "max_flow": 500000, "y_intercept": 20, "slope": -0.00001 },
      "large": { "min_flow": 500000, "max_flow": 4000000, "y_intercept": 15, "slope": -0.000001 }
    }
  },
  "transport": {
    "average_speed_kmh": 50,
    "working_hours_per_day": 24,
    "diesel_price": 1.5,
    "driver_cost_per_hour": 15,
    "working_days_per_year": 365,
    "max_driving_distance_km": 160000,
    "truck_capex": 160000,
    "truck_opex_fraction": 0.12,
    "diesel_consumption_l_per_100km": 35,
    "truck_lifetime_years": 8,
    "trailer_capex": 210000,
    "trailer_opex_fraction": 0.02,
    "trailer_net_capacity_kg": 26000,
    "trailer_lifetime_years": 12,
    "loading_unloading_time_h": 3
  },
  "road": { "long_road_capex": 300000, "short_road_capex": 600000, "road_opex": 7500 }
}"#;

const HEXAGONS: &str = "\
id,country,centroid_lat,centroid_lon,wind_max_capacity,solar_max_capacity,road_dist,water_limit
port,DE,53.55,10.0,500,500,0,
inland,DE,52.5,10.0,500,500,4,
";

const DEMAND_CENTERS: &str = "\
name,lat,lon,annual_demand_kg
Hamburg,53.55,10.0,50000000
";

fn hourly_table(values: impl Fn(usize) -> f64) -> String {
    let mut table = String::from("time,port,inland\n");
    for hour in 0..48 {
        let v = values(hour);
        table.push_str(&format!(
            "2022-01-{:02} {:02}:00:00,{},{}\n",
            1 + hour / 24,
            hour % 24,
            v,
            v
        ));
    }
    table
}

fn profiles() -> RenewableProfiles {
    let wind = parse_profile_table(&hourly_table(|h| 0.3 + 0.05 * (h % 7) as f64)).unwrap();
    let solar = parse_profile_table(&hourly_table(|h| if (h % 24) >= 7 && (h % 24) < 18 { 0.6 } else { 0.0 }))
        .unwrap();
    let mut profiles = RenewableProfiles::new();
    for (id, series) in wind {
        profiles.insert(id.clone(), series, solar[&id].clone());
    }
    profiles
}

fn two_day_config() -> RunConfig {
    let mut config = RunConfig::default();
    config.horizon_end = config.horizon_start + chrono::Duration::days(2);
    config.frequency = "12H".parse().unwrap();
    config
}

fn parameters() -> ParameterSet {
    parse_parameters(PARAMETERS).unwrap()
}

#[test]
fn hexagon_at_demand_center_has_only_production_cost() {
    let params = parameters();
    let config = two_day_config();
    let profiles = profiles();
    let hexagons = parse_hexagons(HEXAGONS).unwrap();
    let demand_centers = parse_demand_centers(DEMAND_CENTERS).unwrap();
    let solver = ClarabelSolver::new();
    let evaluator = SiteEvaluator::new(&params, &config, &profiles, &solver).unwrap();

    let report = run_evaluation(&evaluator, &hexagons, &demand_centers, None);
    assert!(report.failures.is_empty(), "{:?}", report.failures);

    let result = report.table.get("port", "Hamburg").unwrap();
    assert_eq!(result.road_construction_cost, 0.0);
    for mode in TransportMode::ALL {
        let cell = result.mode(mode);
        assert_eq!(cell.status, CellStatus::Ok);
        assert_eq!(cell.transport_cost, 0.0);
        assert!(cell.production_cost > 0.0 && cell.production_cost.is_finite());
        assert_relative_eq!(cell.total_cost, cell.production_cost);
        assert!(cell.capacities.electrolyzer > 0.0);
    }

    // The inland site pays for transport on top of production
    let inland = report.table.get("inland", "Hamburg").unwrap();
    assert!(inland.trucking.transport_cost > 0.0);
    assert!(inland.road_construction_cost > 0.0);
    assert!(inland.lowest_cost() >= result.lowest_cost() - 1e-9);
}

#[test]
fn disabled_pipeline_leaves_only_trucking() {
    let params = parameters();
    let mut config = two_day_config();
    config.pipeline_construction = false;
    let profiles = profiles();
    let hexagons = parse_hexagons(HEXAGONS).unwrap();
    let demand_centers = parse_demand_centers(DEMAND_CENTERS).unwrap();
    let solver = ClarabelSolver::new();
    let evaluator = SiteEvaluator::new(&params, &config, &profiles, &solver).unwrap();

    let report = run_evaluation(&evaluator, &hexagons[..1], &demand_centers, None);
    let result = report.table.get("port", "Hamburg").unwrap();
    assert!(result.trucking.total_cost.is_finite());
    assert!(result.pipeline.total_cost.is_nan());
    assert_eq!(result.pipeline.status, CellStatus::PipelineDisabled);
    assert_eq!(result.lowest_cost(), result.trucking.total_cost);
}

struct BrokenSolver;

impl LpSolver for BrokenSolver {
    fn solve(&self, _problem: &LinearProgram) -> Result<LpSolution, SolverError> {
        Err(SolverError::Failed("iteration limit".to_string()))
    }
}

#[test]
fn solver_failures_are_reported_separately() {
    let params = parameters();
    let config = two_day_config();
    let profiles = profiles();
    let hexagons = parse_hexagons(HEXAGONS).unwrap();
    let demand_centers = parse_demand_centers(DEMAND_CENTERS).unwrap();
    let evaluator = SiteEvaluator::new(&params, &config, &profiles, &BrokenSolver).unwrap();

    let report = run_evaluation(&evaluator, &hexagons, &demand_centers, None);
    assert_eq!(report.failures.len(), 4);
    assert!(report
        .failures
        .iter()
        .all(|f| matches!(f.error, EvaluationError::Solver(SolverError::Failed(_)))));

    let result = report.table.get("inland", "Hamburg").unwrap();
    assert_eq!(result.trucking.status, CellStatus::SolverError);
    assert!(result.trucking.production_cost.is_nan());
    // Road cost does not depend on the plant
    assert!(result.road_construction_cost.is_finite());
}

#[test]
fn exported_table_has_one_line_per_hexagon() {
    let params = parameters();
    let mut config = two_day_config();
    config.cost_components = true;
    let profiles = profiles();
    let hexagons = parse_hexagons(HEXAGONS).unwrap();
    let demand_centers = parse_demand_centers(DEMAND_CENTERS).unwrap();
    let solver = ClarabelSolver::new();
    let evaluator = SiteEvaluator::new(&params, &config, &profiles, &solver).unwrap();

    let report = run_evaluation(&evaluator, &hexagons, &demand_centers, None);
    let mut buffer = Vec::new();
    write_table(&report.table, &mut buffer).unwrap();

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let headers = reader.headers().unwrap().clone();
    assert!(headers.iter().any(|h| h == "Hamburg trucking electrolyzer capacity"));
    assert!(headers.iter().any(|h| h == "Hamburg LCOA - pipeline solar portion"));
    let rows: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "port");
}
