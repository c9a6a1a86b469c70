// Time Constants
pub const HOURS_PER_YEAR: f64 = 8760.0;
pub const DAYS_PER_YEAR: f64 = 365.0;
pub const SECONDS_PER_HOUR: i64 = 3600;
pub const DEFAULT_FREQUENCY_HOURS: u32 = 3;

// Chemistry
pub const AMMONIA_HHV_MWH_PER_T: f64 = 6.25;           // higher heating value of ammonia
pub const AMMONIA_TO_HYDROGEN_MASS_RATIO: f64 = 17.0 / 3.0;
pub const HYDROGEN_KG_PER_M3_WATER: f64 = 111.57;      // electrolysis yield per m3 of water
pub const KG_PER_TONNE: f64 = 1000.0;

// Plant Defaults
pub const DEFAULT_ELECTROLYZER_EFFICIENCY: f64 = 0.7;   // MW H2 out per MW power in
pub const DEFAULT_SYNTHESIS_EFFICIENCY: f64 = 0.9;      // MW NH3 out per MW H2 in
pub const DEFAULT_SYNTHESIS_POWER_DEMAND: f64 = 0.07;   // MW power per MW H2 into synthesis
pub const DEFAULT_COMPRESSION_POWER_DEMAND: f64 = 0.017; // MW power per MW H2 compressed
pub const DEFAULT_BATTERY_EFFICIENCY: f64 = 0.95;       // one-way
pub const COMPRESSION_MARGINAL_COST: f64 = 0.0001;      // €/MWh, keeps compression from cycling

// Transport
pub const SHORT_ROAD_THRESHOLD_KM: f64 = 10.0;
pub const PIPELINE_CAPEX_DISTANCE_UNIT_KM: f64 = 100.0; // pipeline coefficients are per 100 km

// Geography
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

// Reference Data
pub const MISSING: f64 = f64::NAN;                      // missing-value marker in results
pub const FALLBACK_COUNTRY: &str = "Other";
pub const PROFILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Progress Reporting
pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";
