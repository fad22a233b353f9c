use geo::{Distance, Haversine};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    /// Great-circle distance in meters.
    pub fn haversine_distance(&self, to: &LatLng) -> f64 {
        let haversine = Haversine;
        haversine.distance(geo_types::Point::from(self), geo_types::Point::from(to))
    }
}

// geo uses (x, y) = (lng, lat)
impl From<&LatLng> for geo_types::Point<f64> {
    fn from(value: &LatLng) -> Self {
        geo_types::Point::new(value.lng, value.lat)
    }
}

impl From<geo_types::Point<f64>> for LatLng {
    fn from(point: geo_types::Point<f64>) -> Self {
        LatLng {
            lat: point.y(),
            lng: point.x(),
        }
    }
}
