// Full evaluation over every demand center and hexagon
use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::info;

use crate::core::evaluation::{SiteEvaluation, SiteEvaluator};
use crate::error::EvaluationFailure;
use crate::models::demand_center::DemandCenter;
use crate::models::hexagon::Hexagon;
use crate::models::results::CellStatus;
use crate::utils::csv_export::{AttributeTable, HexagonRow};

/// Everything a run produced.
#[derive(Debug)]
pub struct RunReport {
    pub table: AttributeTable,
    pub failures: Vec<EvaluationFailure>,
    pub evaluated: usize,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Evaluates every hexagon against every demand center.
///
/// Pairs are independent; with `parallel` set in the run config they are
/// spread over the rayon pool. Results are collected in input order, so the
/// table is the same either way.
pub fn run_evaluation(
    evaluator: &SiteEvaluator<'_>,
    hexagons: &[Hexagon],
    demand_centers: &[DemandCenter],
    progress: Option<&ProgressBar>,
) -> RunReport {
    let jobs: Vec<(usize, usize)> = (0..demand_centers.len())
        .flat_map(|dc| (0..hexagons.len()).map(move |hex| (dc, hex)))
        .collect();

    info!(
        hexagons = hexagons.len(),
        demand_centers = demand_centers.len(),
        parallel = evaluator.config().parallel,
        "Starting evaluation"
    );

    let evaluate = |&(dc, hex): &(usize, usize)| -> (usize, SiteEvaluation) {
        let evaluation = evaluator.evaluate(&hexagons[hex], &demand_centers[dc]);
        if let Some(bar) = progress {
            bar.inc(1);
        }
        (hex, evaluation)
    };

    let evaluations: Vec<(usize, SiteEvaluation)> = if evaluator.config().parallel {
        jobs.par_iter().map(evaluate).collect()
    } else {
        jobs.iter().map(evaluate).collect()
    };

    let mut rows: Vec<HexagonRow> = hexagons
        .iter()
        .map(|hexagon| HexagonRow {
            hexagon_id: hexagon.id.clone(),
            country: hexagon.country.clone(),
            results: Vec::with_capacity(demand_centers.len()),
        })
        .collect();

    let evaluated = evaluations.len();
    let mut failures = Vec::new();
    // Jobs are demand center major, so each row fills in demand center order
    for (hex, evaluation) in evaluations {
        rows[hex].results.push(evaluation.result);
        failures.extend(evaluation.failures);
    }

    for (dc_index, dc) in demand_centers.iter().enumerate() {
        let ok = rows
            .iter()
            .filter_map(|row| row.results.get(dc_index))
            .filter(|r| r.trucking.status == CellStatus::Ok || r.pipeline.status == CellStatus::Ok)
            .count();
        info!(demand_center = %dc.name, hexagons_with_result = ok, "Demand center evaluated");
    }

    let mut table = AttributeTable::new(
        demand_centers.iter().map(|dc| dc.name.clone()).collect(),
        evaluator.config().cost_components,
    );
    for row in rows {
        table.push_row(row);
    }

    RunReport {
        table,
        failures,
        evaluated,
    }
}
