use std::path::Path;

use tracing::info;

use crate::data::records::{self, column, number, optional_number, text};
use crate::error::LoadError;
use crate::models::hexagon::Hexagon;
use crate::models::location::GeoPoint;
use crate::utils::logging::{self, FileIOSubcategory, OperationCategory};

/// Parses a `lat lon;lat lon;...` boundary ring.
fn parse_boundary(raw: &str, row: usize) -> Result<Vec<GeoPoint>, LoadError> {
    let invalid = |reason: String| LoadError::InvalidField {
        row,
        field: "boundary".to_string(),
        reason,
    };

    raw.split(';')
        .map(str::trim)
        .filter(|vertex| !vertex.is_empty())
        .map(|vertex| {
            let mut parts = vertex.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(lat), Some(lon), None) => {
                    let lat: f64 = lat.parse().map_err(|_| invalid(format!("bad latitude '{}'", lat)))?;
                    let lon: f64 = lon.parse().map_err(|_| invalid(format!("bad longitude '{}'", lon)))?;
                    Ok(GeoPoint::new(lat, lon))
                }
                _ => Err(invalid(format!("vertex '{}' is not 'lat lon'", vertex))),
            }
        })
        .collect()
}

pub fn parse_hexagons(contents: &str) -> Result<Vec<Hexagon>, LoadError> {
    let mut reader = records::reader(contents);
    let headers = reader.headers()?.clone();
    let id_col = column(&headers, "id")?;
    let country_col = column(&headers, "country")?;
    let lat_col = column(&headers, "centroid_lat")?;
    let lon_col = column(&headers, "centroid_lon")?;
    let wind_col = column(&headers, "wind_max_capacity")?;
    let solar_col = column(&headers, "solar_max_capacity")?;
    let road_col = column(&headers, "road_dist")?;
    let water_col = column(&headers, "water_limit").ok();
    let boundary_col = column(&headers, "boundary").ok();

    let mut hexagons = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 1;

        let centroid = GeoPoint::new(
            number(&record, lat_col, row, "centroid_lat")?,
            number(&record, lon_col, row, "centroid_lon")?,
        );
        let boundary = match boundary_col.and_then(|col| record.get(col)) {
            Some(raw) => parse_boundary(raw, row)?,
            None => Vec::new(),
        };

        let hexagon = Hexagon::new(
            text(&record, id_col, row, "id")?,
            text(&record, country_col, row, "country")?,
            centroid,
        )
        .with_boundary(boundary)
        .with_land_limits(
            number(&record, wind_col, row, "wind_max_capacity")?,
            number(&record, solar_col, row, "solar_max_capacity")?,
        )
        .with_road_dist(number(&record, road_col, row, "road_dist")?)
        .with_water_limit(optional_number(&record, water_col, row, "water_limit")?);

        hexagons.push(hexagon);
    }
    Ok(hexagons)
}

pub fn load_hexagons(path: impl AsRef<Path>) -> Result<Vec<Hexagon>, LoadError> {
    let _timing = logging::start_timing(
        "load_hexagons",
        OperationCategory::FileIO {
            subcategory: FileIOSubcategory::TableLoad,
        },
    );
    let path = path.as_ref();
    let hexagons = parse_hexagons(&records::read_file(path)?)?;
    info!(path = %path.display(), count = hexagons.len(), "Loaded hexagons");
    Ok(hexagons)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,country,centroid_lat,centroid_lon,wind_max_capacity,solar_max_capacity,road_dist,water_limit,boundary";

    #[test]
    fn test_parse_hexagons() {
        let csv = format!(
            "{}\nh1,DE,10.0,10.0,500,800,0,1e6,9.9 9.9;9.9 10.1;10.1 10.1;10.1 9.9\nh2,NL,52.0,4.5,0,120.5,12.5,,\n",
            HEADER
        );
        let hexagons = parse_hexagons(&csv).unwrap();
        assert_eq!(hexagons.len(), 2);

        let h1 = &hexagons[0];
        assert_eq!(h1.boundary.len(), 4);
        assert_eq!(h1.water_limit, Some(1e6));
        assert!(h1.contains(&GeoPoint::new(10.05, 9.95)));

        let h2 = &hexagons[1];
        assert_eq!(h2.country, "NL");
        assert_eq!(h2.road_dist, 12.5);
        assert_eq!(h2.water_limit, None);
        assert!(h2.boundary.is_empty());
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let csv = "id,country,centroid_lat,centroid_lon,wind_max_capacity,solar_max_capacity,road_dist\nh1,DE,1,2,3,4,5\n";
        let hexagons = parse_hexagons(csv).unwrap();
        assert_eq!(hexagons[0].water_limit, None);
        assert_eq!(hexagons[0].solar_max_capacity, 4.0);
    }

    #[test]
    fn test_bad_boundary() {
        let csv = format!("{}\nh1,DE,1,2,3,4,5,,1 2;3\n", HEADER);
        assert!(matches!(
            parse_hexagons(&csv),
            Err(LoadError::InvalidField { field, .. }) if field == "boundary"
        ));
    }
}
