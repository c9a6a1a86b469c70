use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::error::ExportError;
use crate::models::asset::{AssetClass, TransportMode};
use crate::models::results::{DemandCenterResult, ModeResult};
use crate::utils::logging::{self, FileIOSubcategory, OperationCategory};

pub const RESULTS_FILE_NAME: &str = "hexagon_results.csv";

/// One cell of the attribute table.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Serialized form; non-finite numbers are written as empty cells.
    pub fn render(&self) -> String {
        match self {
            AttributeValue::Number(value) if value.is_finite() => value.to_string(),
            AttributeValue::Number(_) => String::new(),
            AttributeValue::Text(text) => text.clone(),
        }
    }
}

/// Results of one hexagon, in demand center order.
#[derive(Debug, Clone)]
pub struct HexagonRow {
    pub hexagon_id: String,
    pub country: String,
    pub results: Vec<DemandCenterResult>,
}

/// Flat per-hexagon attribute table with named columns per demand center
/// and transport mode.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    demand_centers: Vec<String>,
    rows: Vec<HexagonRow>,
    include_components: bool,
}

impl AttributeTable {
    pub fn new(demand_centers: Vec<String>, include_components: bool) -> Self {
        Self {
            demand_centers,
            rows: Vec::new(),
            include_components,
        }
    }

    pub fn push_row(&mut self, row: HexagonRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[HexagonRow] {
        &self.rows
    }

    pub fn demand_centers(&self) -> &[String] {
        &self.demand_centers
    }

    pub fn get(&self, hexagon_id: &str, demand_center: &str) -> Option<&DemandCenterResult> {
        self.rows
            .iter()
            .find(|row| row.hexagon_id == hexagon_id)?
            .results
            .iter()
            .find(|result| result.demand_center == demand_center)
    }

    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec!["hexagon_id".to_string(), "country".to_string()];
        for dc in &self.demand_centers {
            for mode in TransportMode::ALL {
                for asset in AssetClass::ALL {
                    columns.push(format!("{} {} {} capacity", dc, mode, asset));
                }
                columns.push(format!("{} {} production cost", dc, mode));
                columns.push(format!("{} {} transport costs", dc, mode));
                columns.push(format!("{} {} total cost", dc, mode));
                columns.push(format!("{} {} status", dc, mode));
            }
            columns.push(format!("{} road construction costs", dc));
            columns.push(format!("{} pipeline type", dc));
            columns.push(format!("{} lowest cost", dc));

            if self.include_components {
                for mode in TransportMode::ALL {
                    for asset in AssetClass::ALL {
                        columns.push(format!("{} {} {} costs", dc, mode, asset));
                    }
                }
                for mode in TransportMode::ALL {
                    for asset in AssetClass::ALL {
                        columns.push(format!("{} LCOA - {} {} portion", dc, mode, asset));
                    }
                }
            }
        }
        columns
    }

    /// Values of `row`, aligned with [`AttributeTable::columns`].
    pub fn values(&self, row: &HexagonRow) -> Vec<AttributeValue> {
        let mut values = vec![
            AttributeValue::Text(row.hexagon_id.clone()),
            AttributeValue::Text(row.country.clone()),
        ];
        for dc in &self.demand_centers {
            let result = row.results.iter().find(|r| &r.demand_center == dc);
            self.push_demand_center_values(&mut values, result);
        }
        values
    }

    fn push_demand_center_values(&self, values: &mut Vec<AttributeValue>, result: Option<&DemandCenterResult>) {
        let number = |value: Option<f64>| AttributeValue::Number(value.unwrap_or(f64::NAN));
        let mode_of = |mode: TransportMode| result.map(|r| r.mode(mode));

        for mode in TransportMode::ALL {
            let mode_result = mode_of(mode);
            for asset in AssetClass::ALL {
                values.push(number(mode_result.map(|m| m.capacities.get(asset))));
            }
            values.push(number(mode_result.map(|m| m.production_cost)));
            values.push(number(mode_result.map(|m| m.transport_cost)));
            values.push(number(mode_result.map(|m| m.total_cost)));
            values.push(AttributeValue::Text(
                mode_result.map(|m| m.status.to_string()).unwrap_or_default(),
            ));
        }
        values.push(number(result.map(|r| r.road_construction_cost)));
        values.push(AttributeValue::Text(
            result.map(|r| r.pipeline_type.clone()).unwrap_or_default(),
        ));
        values.push(number(result.map(DemandCenterResult::lowest_cost)));

        if self.include_components {
            for mode in TransportMode::ALL {
                for asset in AssetClass::ALL {
                    values.push(number(component(mode_of(mode), asset).map(|c| c.0)));
                }
            }
            for mode in TransportMode::ALL {
                for asset in AssetClass::ALL {
                    values.push(number(component(mode_of(mode), asset).map(|c| c.1)));
                }
            }
        }
    }
}

// (annual cost, LCOA portion) of `asset`, if it was computed
fn component(mode: Option<&ModeResult>, asset: AssetClass) -> Option<(f64, f64)> {
    mode?
        .components
        .iter()
        .find(|c| c.asset == asset)
        .map(|c| (c.annual_cost, c.lcoa_portion))
}

/// Writes `table` as CSV to any writer.
pub fn write_table<W: Write>(table: &AttributeTable, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.columns())?;
    for row in table.rows() {
        csv_writer.write_record(table.values(row).iter().map(AttributeValue::render))?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Destination for a finished attribute table.
pub trait AttributeSink {
    fn write_table(&mut self, table: &AttributeTable) -> Result<(), ExportError>;
}

/// Writes result tables into a timestamped directory below `output_dir`.
pub struct CsvExporter {
    output_dir: PathBuf,
    timestamp: String,
}

impl CsvExporter {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ExportError> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let full_path = output_dir.as_ref().join(&timestamp);
        fs::create_dir_all(&full_path).map_err(|source| ExportError::Io {
            path: full_path.display().to_string(),
            source,
        })?;

        Ok(Self {
            output_dir: full_path,
            timestamp,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn results_path(&self) -> PathBuf {
        self.output_dir.join(RESULTS_FILE_NAME)
    }
}

impl AttributeSink for CsvExporter {
    fn write_table(&mut self, table: &AttributeTable) -> Result<(), ExportError> {
        let _timing = logging::start_timing(
            "export_results",
            OperationCategory::FileIO {
                subcategory: FileIOSubcategory::ResultsSave,
            },
        );

        let path = self.results_path();
        let file = File::create(&path).map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        write_table(table, file)?;

        info!(path = %path.display(), rows = table.rows().len(), "Results written");
        Ok(())
    }
}
