// Road access for trucking: existing road, a new road, or none
use crate::config::constants::SHORT_ROAD_THRESHOLD_KM;
use crate::config::parameters::{FinancialParameters, RoadParameters};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoadAccess {
    /// Already on the road network
    Existing,
    /// A connecting road is built at this annual cost (€/a)
    Built { annual_cost: f64 },
    /// Off the network and building is not allowed
    Unavailable,
}

impl RoadAccess {
    /// Annual road cost; NaN when there is no access.
    pub fn annual_cost(&self) -> f64 {
        match self {
            RoadAccess::Existing => 0.0,
            RoadAccess::Built { annual_cost } => *annual_cost,
            RoadAccess::Unavailable => f64::NAN,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, RoadAccess::Unavailable)
    }
}

/// Annualized cost of building and maintaining `road_dist` km of road.
/// Short connections are costed at the higher per-km rate.
pub fn road_construction_cost(road_dist: f64, infrastructure: &FinancialParameters, road: &RoadParameters) -> f64 {
    if road_dist == 0.0 {
        return 0.0;
    }
    let capex_per_km = if road_dist < SHORT_ROAD_THRESHOLD_KM {
        road.short_road_capex
    } else {
        road.long_road_capex
    };
    road_dist * capex_per_km * infrastructure.crf() + road_dist * road.road_opex
}

pub fn road_access(
    road_dist: f64,
    construction_allowed: bool,
    infrastructure: &FinancialParameters,
    road: &RoadParameters,
) -> RoadAccess {
    if road_dist == 0.0 {
        RoadAccess::Existing
    } else if construction_allowed {
        RoadAccess::Built {
            annual_cost: road_construction_cost(road_dist, infrastructure, road),
        }
    } else {
        RoadAccess::Unavailable
    }
}
