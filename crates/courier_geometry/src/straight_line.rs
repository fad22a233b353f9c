use crate::{
    geometry_provider::{GeometryError, GeometryProvider},
    lat_lng::LatLng,
    route_geometry::RouteGeometry,
};

pub const DEFAULT_SPEED_KMH: f64 = 50.0;

/// Offline provider connecting stops with straight lines.
pub struct StraightLineProvider {
    speed_kmh: f64,
}

impl StraightLineProvider {
    pub fn new(speed_kmh: f64) -> Self {
        StraightLineProvider { speed_kmh }
    }
}

impl Default for StraightLineProvider {
    fn default() -> Self {
        StraightLineProvider::new(DEFAULT_SPEED_KMH)
    }
}

impl GeometryProvider for StraightLineProvider {
    async fn route(&self, stops: &[LatLng]) -> Result<RouteGeometry, GeometryError> {
        if stops.len() < 2 {
            return Err(GeometryError::NotEnoughStops(stops.len()));
        }

        Ok(RouteGeometry::straight_line(stops, self.speed_kmh))
    }
}
