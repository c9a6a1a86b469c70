use serde::{Deserialize, Serialize};

use crate::config::const_funcs::haversine_km;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance in km.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_km(self, other)
    }
}

pub trait Located {
    fn location(&self) -> &GeoPoint;
    fn id(&self) -> &str;
}
