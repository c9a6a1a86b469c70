use serde::{Deserialize, Serialize};

use crate::config::const_funcs::is_point_inside_polygon;
use crate::models::location::{GeoPoint, Located};

/// One cell of the candidate production grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hexagon {
    pub id: String,
    pub country: String,
    pub centroid: GeoPoint,
    #[serde(default)]
    pub boundary: Vec<GeoPoint>,
    pub wind_max_capacity: f64,  // MW
    pub solar_max_capacity: f64, // MW
    pub road_dist: f64,          // km to the nearest road
    #[serde(default)]
    pub water_limit: Option<f64>, // m3 per year
}

impl Hexagon {
    pub fn new(id: impl Into<String>, country: impl Into<String>, centroid: GeoPoint) -> Self {
        Self {
            id: id.into(),
            country: country.into(),
            centroid,
            boundary: Vec::new(),
            wind_max_capacity: 0.0,
            solar_max_capacity: 0.0,
            road_dist: 0.0,
            water_limit: None,
        }
    }

    pub fn with_boundary(mut self, boundary: Vec<GeoPoint>) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_land_limits(mut self, wind_max_capacity: f64, solar_max_capacity: f64) -> Self {
        self.wind_max_capacity = wind_max_capacity;
        self.solar_max_capacity = solar_max_capacity;
        self
    }

    pub fn with_road_dist(mut self, road_dist: f64) -> Self {
        self.road_dist = road_dist;
        self
    }

    pub fn with_water_limit(mut self, water_limit: Option<f64>) -> Self {
        self.water_limit = water_limit;
        self
    }

    /// Great-circle distance from the centroid in km.
    pub fn distance_to(&self, point: &GeoPoint) -> f64 {
        self.centroid.distance_to(point)
    }

    /// A hexagon contains a point if the point lies inside its boundary, or
    /// (for hexagons loaded without a boundary) sits exactly on the centroid.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        is_point_inside_polygon(point, &self.boundary) || self.distance_to(point) == 0.0
    }
}

impl Located for Hexagon {
    fn location(&self) -> &GeoPoint {
        &self.centroid
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_hexagon() -> Hexagon {
        let c = GeoPoint::new(10.0, 10.0);
        let boundary = (0..6)
            .map(|k| {
                let angle = (k as f64 * 60.0).to_radians();
                GeoPoint::new(c.lat + 0.1 * angle.sin(), c.lon + 0.1 * angle.cos())
            })
            .collect();
        Hexagon::new("h1", "DE", c).with_boundary(boundary)
    }

    #[test]
    fn test_contains_point_inside_boundary() {
        let hex = unit_hexagon();
        assert!(hex.contains(&GeoPoint::new(10.02, 10.03)));
        assert!(!hex.contains(&GeoPoint::new(10.5, 10.5)));
    }

    #[test]
    fn test_contains_centroid_without_boundary() {
        let hex = Hexagon::new("h2", "DE", GeoPoint::new(1.0, 2.0));
        assert!(hex.contains(&GeoPoint::new(1.0, 2.0)));
        assert!(!hex.contains(&GeoPoint::new(1.0, 2.001)));
    }
}
