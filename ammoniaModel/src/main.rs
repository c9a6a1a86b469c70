use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use geoammonia::analysis::reporting::print_run_summary;
use geoammonia::cli::cli::Args;
use geoammonia::config::constants::PROGRESS_BAR_TEMPLATE;
use geoammonia::data::{demand_loader, hexagon_loader, parameters_loader, profile_loader};
use geoammonia::utils::csv_export::{AttributeSink, CsvExporter};
use geoammonia::utils::logging;
use geoammonia::{run_evaluation, ClarabelSolver, RunConfig, SiteEvaluator};

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.enable_timing())?;

    let mut config = match args.run_config() {
        Some(path) => RunConfig::load(path).with_context(|| format!("loading run config {}", path))?,
        None => RunConfig::default(),
    };
    apply_overrides(&mut config, &args)?;
    config.validate().context("invalid run configuration")?;

    let parameters = parameters_loader::load_parameters(args.parameters())
        .with_context(|| format!("loading parameters {}", args.parameters()))?;
    let hexagons = hexagon_loader::load_hexagons(args.hexagons())
        .with_context(|| format!("loading hexagons {}", args.hexagons()))?;
    let demand_centers = demand_loader::load_demand_centers(args.demand_centers())
        .with_context(|| format!("loading demand centers {}", args.demand_centers()))?;
    let profiles = profile_loader::load_profiles(args.wind_profiles(), args.solar_profiles())
        .context("loading renewable profiles")?;

    info!(
        horizon_start = %config.horizon_start,
        horizon_end = %config.horizon_end,
        frequency = %config.frequency,
        pipeline = config.pipeline_construction,
        "Green ammonia cost run"
    );

    let solver = ClarabelSolver::new();
    let evaluator = SiteEvaluator::new(&parameters, &config, &profiles, &solver)?;

    let total = (hexagons.len() * demand_centers.len()) as u64;
    let bar = ProgressBar::new(total);
    bar.set_style(ProgressStyle::with_template(PROGRESS_BAR_TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar()));

    let report = run_evaluation(&evaluator, &hexagons, &demand_centers, Some(&bar));
    bar.finish_and_clear();

    let mut exporter = CsvExporter::new(args.output()).context("creating output directory")?;
    exporter.write_table(&report.table).context("writing results")?;

    print_run_summary(&report);
    println!("Results written to {}", exporter.results_path().display());
    logging::print_timing_report();

    Ok(())
}

fn apply_overrides(config: &mut RunConfig, args: &Args) -> Result<()> {
    if let Some(freq) = args.freq() {
        config.frequency = freq.parse().with_context(|| format!("invalid --freq {}", freq))?;
    }
    if args.no_pipeline() {
        config.pipeline_construction = false;
    }
    if args.no_road_construction() {
        config.road_construction = false;
    }
    if args.enforce_water_limit() {
        config.enforce_water_limit = true;
    }
    if args.cost_components() {
        config.cost_components = true;
    }
    if args.sequential() {
        config.parallel = false;
    }
    Ok(())
}
