//! Great-circle distance.

use shared_types::Coordinates;

/// Mean Earth radius used for every distance shown to users.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres.
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_RADIUS_KM * c
}

/// Haversine distance rounded to one decimal place, as displayed.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    (haversine_km(a, b) * 10.0).round() / 10.0
}
