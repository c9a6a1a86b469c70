use std::collections::BTreeMap;

use crate::core::run::RunReport;
use crate::models::asset::TransportMode;
use crate::models::results::CellStatus;

/// Cheapest hexagon for one demand center.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSite {
    pub demand_center: String,
    pub hexagon_id: String,
    pub mode: TransportMode,
    pub total_cost: f64,
}

/// Lowest finite total cost over all hexagons and modes, per demand center.
pub fn best_sites(report: &RunReport) -> Vec<BestSite> {
    let table = &report.table;
    table
        .demand_centers()
        .iter()
        .filter_map(|dc| {
            table
                .rows()
                .iter()
                .filter_map(|row| {
                    let result = row.results.iter().find(|r| &r.demand_center == dc)?;
                    TransportMode::ALL
                        .into_iter()
                        .map(|mode| (mode, result.mode(mode).total_cost))
                        .filter(|(_, cost)| cost.is_finite())
                        .map(|(mode, cost)| BestSite {
                            demand_center: dc.clone(),
                            hexagon_id: row.hexagon_id.clone(),
                            mode,
                            total_cost: cost,
                        })
                        .min_by(|a, b| a.total_cost.total_cmp(&b.total_cost))
                })
                .min_by(|a, b| a.total_cost.total_cmp(&b.total_cost))
        })
        .collect()
}

/// Number of cells per mode and status.
pub fn status_counts(report: &RunReport) -> BTreeMap<(String, String), usize> {
    let mut counts = BTreeMap::new();
    for row in report.table.rows() {
        for result in &row.results {
            for mode in TransportMode::ALL {
                let status: CellStatus = result.mode(mode).status;
                *counts.entry((mode.to_string(), status.to_string())).or_insert(0) += 1;
            }
        }
    }
    counts
}

pub fn print_run_summary(report: &RunReport) {
    println!("\nRun Summary");
    println!("----------------------------------------");
    println!("Hexagons: {}", report.table.rows().len());
    println!("Evaluated pairs: {}", report.evaluated);

    println!("\nCheapest supply per demand center:");
    let best = best_sites(report);
    for dc in report.table.demand_centers() {
        match best.iter().find(|b| &b.demand_center == dc) {
            Some(site) => println!(
                "  {}: hexagon {} by {} at €{:.3}/kg",
                dc, site.hexagon_id, site.mode, site.total_cost
            ),
            None => println!("  {}: no feasible supply", dc),
        }
    }

    println!("\nCell status:");
    for ((mode, status), count) in status_counts(report) {
        println!("  {} / {}: {}", mode, status, count);
    }

    if report.has_failures() {
        println!("\nFailures ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  {}", failure);
        }
    }
    println!("----------------------------------------");
}
