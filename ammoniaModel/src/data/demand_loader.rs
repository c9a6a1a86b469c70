use std::path::Path;

use tracing::info;

use crate::data::records::{self, column, number, text};
use crate::error::LoadError;
use crate::models::demand_center::DemandCenter;
use crate::models::location::GeoPoint;
use crate::utils::logging::{self, FileIOSubcategory, OperationCategory};

/// Reads `name,lat,lon,annual_demand_kg` rows.
pub fn parse_demand_centers(contents: &str) -> Result<Vec<DemandCenter>, LoadError> {
    let mut reader = records::reader(contents);
    let headers = reader.headers()?.clone();
    let name_col = column(&headers, "name")?;
    let lat_col = column(&headers, "lat")?;
    let lon_col = column(&headers, "lon")?;
    let demand_col = column(&headers, "annual_demand_kg")?;

    let mut centers = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 1;
        let annual_demand_kg = number(&record, demand_col, row, "annual_demand_kg")?;
        if annual_demand_kg < 0.0 {
            return Err(LoadError::InvalidField {
                row,
                field: "annual_demand_kg".to_string(),
                reason: "demand must not be negative".to_string(),
            });
        }
        centers.push(DemandCenter::new(
            text(&record, name_col, row, "name")?,
            GeoPoint::new(number(&record, lat_col, row, "lat")?, number(&record, lon_col, row, "lon")?),
            annual_demand_kg,
        ));
    }
    Ok(centers)
}

pub fn load_demand_centers(path: impl AsRef<Path>) -> Result<Vec<DemandCenter>, LoadError> {
    let _timing = logging::start_timing(
        "load_demand_centers",
        OperationCategory::FileIO {
            subcategory: FileIOSubcategory::TableLoad,
        },
    );
    let path = path.as_ref();
    let centers = parse_demand_centers(&records::read_file(path)?)?;
    info!(path = %path.display(), count = centers.len(), "Loaded demand centers");
    Ok(centers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_demand_centers() {
        let csv = "name,lat,lon,annual_demand_kg\nHamburg,53.55,9.99,1.5e8\nRotterdam, 51.92 ,4.48,2e8\n";
        let centers = parse_demand_centers(csv).unwrap();
        assert_eq!(centers.len(), 2);
        assert_eq!(centers[1].name, "Rotterdam");
        assert_eq!(centers[1].location.lat, 51.92);
        assert_eq!(centers[0].annual_demand_kg, 1.5e8);
    }

    #[test]
    fn test_bad_rows_are_reported() {
        let csv = "name,lat,lon,annual_demand_kg\nHamburg,53.55,9.99,lots\n";
        match parse_demand_centers(csv) {
            Err(LoadError::InvalidField { row, field, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(field, "annual_demand_kg");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(parse_demand_centers("name,lat,lon\nA,1,2\n").is_err());
    }
}
