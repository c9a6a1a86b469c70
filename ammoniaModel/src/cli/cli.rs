use clap::Parser;

#[derive(Parser)]
#[command(author, version, about = "Levelized cost of green ammonia per hexagon and demand center", long_about = None)]
pub struct Args {
    #[arg(short, long, help = "Parameter set (JSON)")]
    parameters: String,

    #[arg(long, help = "Run configuration (JSON); defaults apply when omitted")]
    run_config: Option<String>,

    #[arg(long, help = "Hexagon attribute table (CSV)")]
    hexagons: String,

    #[arg(short, long, help = "Demand centers (CSV)")]
    demand_centers: String,

    #[arg(long, help = "Hourly wind capacity factors (wide CSV)")]
    wind_profiles: String,

    #[arg(long, help = "Hourly solar capacity factors (wide CSV)")]
    solar_profiles: String,

    #[arg(short, long, default_value = "results")]
    output: String,

    #[arg(short, long, help = "Sampling frequency, e.g. 3H or 1D")]
    freq: Option<String>,

    #[arg(long, default_value_t = false)]
    no_pipeline: bool,

    #[arg(long, default_value_t = false)]
    no_road_construction: bool,

    #[arg(long, default_value_t = false)]
    enforce_water_limit: bool,

    #[arg(long, default_value_t = false)]
    cost_components: bool,

    #[arg(long, default_value_t = false)]
    sequential: bool,

    #[arg(long, default_value_t = false)]
    enable_timing: bool,
}

impl Args {
    pub fn parameters(&self) -> &str {
        &self.parameters
    }

    pub fn run_config(&self) -> Option<&str> {
        self.run_config.as_deref()
    }

    pub fn hexagons(&self) -> &str {
        &self.hexagons
    }

    pub fn demand_centers(&self) -> &str {
        &self.demand_centers
    }

    pub fn wind_profiles(&self) -> &str {
        &self.wind_profiles
    }

    pub fn solar_profiles(&self) -> &str {
        &self.solar_profiles
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn freq(&self) -> Option<&str> {
        self.freq.as_deref()
    }

    pub fn no_pipeline(&self) -> bool {
        self.no_pipeline
    }

    pub fn no_road_construction(&self) -> bool {
        self.no_road_construction
    }

    pub fn enforce_water_limit(&self) -> bool {
        self.enforce_water_limit
    }

    pub fn cost_components(&self) -> bool {
        self.cost_components
    }

    pub fn sequential(&self) -> bool {
        self.sequential
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let args = Args::try_parse_from([
            "geoammonia",
            "--parameters",
            "params.json",
            "--hexagons",
            "hex.csv",
            "-d",
            "dc.csv",
            "--wind-profiles",
            "wind.csv",
            "--solar-profiles",
            "solar.csv",
            "--freq",
            "6H",
            "--no-pipeline",
        ])
        .unwrap();

        assert_eq!(args.parameters(), "params.json");
        assert_eq!(args.demand_centers(), "dc.csv");
        assert_eq!(args.freq(), Some("6H"));
        assert_eq!(args.output(), "results");
        assert!(args.no_pipeline());
        assert!(!args.sequential());
        assert!(args.run_config().is_none());
    }

    #[test]
    fn test_inputs_are_required() {
        assert!(Args::try_parse_from(["geoammonia", "--parameters", "params.json"]).is_err());
    }
}
