use std::future::Future;

use thiserror::Error;

use crate::{lat_lng::LatLng, route_geometry::RouteGeometry};

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("No route found: {0}")]
    NoRoute(String),

    #[error("Expected at least two stops, got {0}")]
    NotEnoughStops(usize),
}

/// Resolves road-following geometry for an ordered list of stops.
pub trait GeometryProvider: Send + Sync {
    fn route(
        &self,
        stops: &[LatLng],
    ) -> impl Future<Output = Result<RouteGeometry, GeometryError>> + Send;
}
