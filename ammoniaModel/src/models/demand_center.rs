use serde::{Deserialize, Serialize};

use crate::models::location::{GeoPoint, Located};

/// A consumer of ammonia with a fixed annual offtake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandCenter {
    pub name: String,
    pub location: GeoPoint,
    pub annual_demand_kg: f64,
}

impl DemandCenter {
    pub fn new(name: impl Into<String>, location: GeoPoint, annual_demand_kg: f64) -> Self {
        Self {
            name: name.into(),
            location,
            annual_demand_kg,
        }
    }
}

impl Located for DemandCenter {
    fn location(&self) -> &GeoPoint {
        &self.location
    }

    fn id(&self) -> &str {
        &self.name
    }
}
