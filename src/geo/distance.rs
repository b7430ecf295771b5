use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Coordinate, Position};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance using the haversine formula
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // rounding can push h just past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// A located position and how far it is from the origin
#[derive(Debug, Clone, Serialize)]
pub struct Nearby<'a> {
    pub position: &'a Position,
    pub coordinate: Coordinate,
    pub distance_km: f64,
}

/// Positions with known coordinates, closest first, optionally cut at
/// `radius_km`. Positions missing from `coordinates` are left out.
pub fn nearest<'a>(
    positions: &'a [Position],
    coordinates: &HashMap<String, Coordinate>,
    origin: Coordinate,
    radius_km: Option<f64>,
) -> Vec<Nearby<'a>> {
    let mut found: Vec<Nearby<'a>> = positions
        .iter()
        .filter_map(|position| {
            let coordinate = *coordinates.get(&position.id)?;
            let distance_km = distance_km(origin, coordinate);
            Some(Nearby {
                position,
                coordinate,
                distance_km,
            })
        })
        .filter(|n| radius_km.map_or(true, |r| n.distance_km <= r))
        .collect();

    found.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    found
}
