// Main module declarations for the ammonia site model

pub mod error;

// Evaluation pipeline
pub mod core {
    pub mod evaluation;
    pub mod run;
}

// Configuration and reference data
pub mod config {
    pub mod constants;
    pub mod const_funcs;
    pub mod parameters;
    pub mod run_config;
}

// Model definitions
pub mod models {
    pub mod asset;
    pub mod location;
    pub mod hexagon;
    pub mod demand_center;
    pub mod results;
}

// Cost models for getting ammonia to the demand center
pub mod transport {
    pub mod trucking;
    pub mod pipeline;
    pub mod road;
}

// Demand time series
pub mod demand {
    pub mod schedule;
}

// Plant capacity expansion
pub mod optimizer {
    pub mod lp;
    pub mod solver;
    pub mod plant_model;
    pub mod capacity;
}

// Data loaders
pub mod data {
    pub mod records;
    pub mod parameters_loader;
    pub mod hexagon_loader;
    pub mod demand_loader;
    pub mod profile_loader;
}

// Analysis and reporting
pub mod analysis {
    pub mod cost_components;
    pub mod reporting;
}

// Utility functions
pub mod utils {
    pub mod logging;
    pub mod csv_export;
}

// CLI interface
pub mod cli {
    pub mod cli;
}

// Re-export commonly used items
pub use crate::config::const_funcs::crf;
pub use crate::config::parameters::ParameterSet;
pub use crate::config::run_config::RunConfig;
pub use crate::core::evaluation::SiteEvaluator;
pub use crate::core::run::{run_evaluation, RunReport};
pub use crate::optimizer::solver::{ClarabelSolver, LpSolver};
