// Fleet-sizing cost model for ammonia trucking
use crate::config::const_funcs::crf;
use crate::config::constants::DAYS_PER_YEAR;
use crate::config::parameters::TransportParameters;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruckingEstimate {
    pub deliveries_per_day: f64,
    pub deliveries_per_truck_per_day: f64,
    pub trucks: f64,
    pub trailers: f64,
    pub daily_round_trips: f64,
    pub annual_cost: f64,
    pub cost_per_kg: f64,
}

/// Round trips paid for in fuel and wages each day.
///
/// Below one delivery a day the fractional value is used as is; from one
/// delivery a day upwards it is rounded up to whole trips. The two branches
/// meet at exactly one delivery.
pub fn daily_round_trips(deliveries_per_day: f64) -> f64 {
    if deliveries_per_day < 1.0 {
        deliveries_per_day
    } else {
        deliveries_per_day.ceil()
    }
}

/// Annualized trucking cost for hauling `quantity_kg` a year over
/// `distance_km` one way.
///
/// Trucks and trailers are sized one to one. Degenerate inputs (zero
/// quantity, zero capacity) produce non-finite results.
pub fn estimate(distance_km: f64, quantity_kg: f64, interest: f64, params: &TransportParameters) -> TruckingEstimate {
    let daily_quantity = quantity_kg / DAYS_PER_YEAR;
    let round_trip_hours = params.loading_unloading_time_h + 2.0 * distance_km / params.average_speed_kmh;

    let deliveries_per_truck_per_day = params.working_hours_per_day / round_trip_hours;
    let deliveries_per_day = daily_quantity / params.trailer_net_capacity_kg;

    let trailers = (deliveries_per_day / deliveries_per_truck_per_day).ceil();
    let trucks = trailers;

    let capex_trucks = trucks * params.truck_capex;
    let capex_trailers = trailers * params.trailer_capex;

    let trips = daily_round_trips(deliveries_per_day);
    let fuel_cost = trips * 2.0 * distance_km * DAYS_PER_YEAR / 100.0
        * params.diesel_consumption_l_per_100km
        * params.diesel_price;
    let wages = trips * round_trip_hours * params.working_days_per_year * params.driver_cost_per_hour;

    let annual_cost = capex_trucks * crf(interest, params.truck_lifetime_years)
        + capex_trailers * crf(interest, params.trailer_lifetime_years)
        + capex_trucks * params.truck_opex_fraction
        + capex_trailers * params.trailer_opex_fraction
        + fuel_cost
        + wages;

    TruckingEstimate {
        deliveries_per_day,
        deliveries_per_truck_per_day,
        trucks,
        trailers,
        daily_round_trips: trips,
        annual_cost,
        cost_per_kg: annual_cost / quantity_kg,
    }
}

/// Annualized trucking cost per kg of ammonia.
pub fn trucking_cost_per_kg(distance_km: f64, quantity_kg: f64, interest: f64, params: &TransportParameters) -> f64 {
    estimate(distance_km, quantity_kg, interest, params).cost_per_kg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parameters::fixtures::transport;
    use approx::assert_relative_eq;

    const INTEREST: f64 = 0.08;

    #[test]
    fn test_one_load_per_day_by_hand() {
        let params = transport();
        // One full trailer a day over 100 km: round trip 3 h + 200 km / 50 km/h = 7 h
        let quantity = params.trailer_net_capacity_kg * 365.0;
        let est = estimate(100.0, quantity, INTEREST, &params);

        assert_relative_eq!(est.deliveries_per_day, 1.0, epsilon = 1e-12);
        assert_relative_eq!(est.deliveries_per_truck_per_day, 24.0 / 7.0, epsilon = 1e-12);
        assert_eq!(est.trucks, 1.0);
        assert_eq!(est.trailers, 1.0);

        let fuel = 2.0 * 100.0 * 365.0 / 100.0 * 35.0 * 1.5;
        let wages = 7.0 * 365.0 * 15.0;
        let expected = 160_000.0 * crf(INTEREST, 8.0)
            + 210_000.0 * crf(INTEREST, 12.0)
            + 160_000.0 * 0.12
            + 210_000.0 * 0.02
            + fuel
            + wages;
        assert_relative_eq!(est.annual_cost, expected, max_relative = 1e-12);
        assert_relative_eq!(est.cost_per_kg, expected / quantity, max_relative = 1e-12);
    }

    #[test]
    fn test_round_trip_branches_meet_at_one() {
        assert_eq!(daily_round_trips(1.0), 1.0);
        assert_relative_eq!(daily_round_trips(1.0 - 1e-12), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fractional_below_one_rounded_above() {
        assert_eq!(daily_round_trips(0.4), 0.4);
        assert_eq!(daily_round_trips(1.2), 2.0);
        assert_eq!(daily_round_trips(3.0), 3.0);
    }

    #[test]
    fn test_boundary_cost_continuity() {
        let params = transport();
        let at_one = params.trailer_net_capacity_kg * 365.0;
        let below = estimate(80.0, at_one * (1.0 - 1e-9), INTEREST, &params);
        let exact = estimate(80.0, at_one, INTEREST, &params);
        assert_eq!(exact.daily_round_trips, 1.0);
        assert_relative_eq!(below.annual_cost, exact.annual_cost, max_relative = 1e-6);
    }

    #[test]
    fn test_fleet_grows_with_distance() {
        let params = transport();
        let quantity = 5.0e7;
        let near = estimate(50.0, quantity, INTEREST, &params);
        let far = estimate(800.0, quantity, INTEREST, &params);
        assert!(far.trucks > near.trucks);
        assert!(far.cost_per_kg > near.cost_per_kg);
        assert_eq!(far.trucks, far.trailers);
    }

    #[test]
    fn test_zero_distance_is_finite() {
        let cost = trucking_cost_per_kg(0.0, 1.0e6, INTEREST, &transport());
        assert!(cost.is_finite());
        assert!(cost > 0.0);
    }

    #[test]
    fn test_degenerate_inputs_are_not_finite() {
        let mut params = transport();
        assert!(!trucking_cost_per_kg(100.0, 0.0, INTEREST, &params).is_finite());

        params.trailer_net_capacity_kg = 0.0;
        assert!(!trucking_cost_per_kg(100.0, 1.0e6, INTEREST, &params).is_finite());

        // Zero interest leaves the annuity undefined
        assert!(trucking_cost_per_kg(100.0, 1.0e6, 0.0, &transport()).is_nan());
    }
}
