use crate::config::constants::*;
use crate::models::location::GeoPoint;

/// Capital recovery factor: the fraction of an up-front cost paid each year
/// to repay it over `lifetime` years at `interest`.
///
/// A zero interest rate yields 0/0 and therefore NaN; callers treat a
/// non-finite result as an unknown value.
pub fn crf(interest: impl Into<f64>, lifetime: impl Into<f64>) -> f64 {
    let interest = interest.into();
    let lifetime = lifetime.into();
    let growth = (1.0 + interest).powf(lifetime);
    interest * growth / (growth - 1.0)
}

/// Great-circle distance in km.
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

// Ray casting with longitude as x and latitude as y
pub fn is_point_inside_polygon(point: &GeoPoint, polygon: &[GeoPoint]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        if ((polygon[i].lat > point.lat) != (polygon[j].lat > point.lat))
            && (point.lon
                < (polygon[j].lon - polygon[i].lon) * (point.lat - polygon[i].lat)
                    / (polygon[j].lat - polygon[i].lat)
                    + polygon[i].lon)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Missing values are carried as NaN; infinities from degenerate arithmetic
/// count as missing too.
pub fn is_missing(value: f64) -> bool {
    !value.is_finite()
}

pub fn ammonia_mwh_from_kg(kg: f64) -> f64 {
    kg / KG_PER_TONNE * AMMONIA_HHV_MWH_PER_T
}

pub fn ammonia_kg_from_mwh(mwh: f64) -> f64 {
    mwh / AMMONIA_HHV_MWH_PER_T * KG_PER_TONNE
}
