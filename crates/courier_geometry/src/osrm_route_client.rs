use serde::Deserialize;
use tracing::debug;

use crate::{
    geometry_provider::{GeometryError, GeometryProvider},
    lat_lng::LatLng,
    route_geometry::{LegGeometry, RouteGeometry},
};

pub const OSRM_ROUTE_API_PATH: &str = "/route/v1/driving/";

#[derive(Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    legs: Vec<OsrmLeg>,
}

#[derive(Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Deserialize)]
struct OsrmStep {
    intersections: Vec<OsrmIntersection>,
}

#[derive(Deserialize)]
struct OsrmIntersection {
    /// [lng, lat]
    location: [f64; 2],
}

impl OsrmLeg {
    /// Only the first and last intersection of every step, smooth enough for drawing.
    fn waypoints(&self) -> Vec<LatLng> {
        let mut waypoints = Vec::with_capacity(self.steps.len() * 2);
        for step in &self.steps {
            if let (Some(first), Some(last)) = (step.intersections.first(), step.intersections.last())
            {
                waypoints.push(LatLng::new(first.location[1], first.location[0]));
                waypoints.push(LatLng::new(last.location[1], last.location[0]));
            }
        }
        waypoints
    }
}

pub struct OsrmRouteClientParams {
    pub osrm_url: String,
}

pub struct OsrmRouteClient {
    params: OsrmRouteClientParams,
    client: reqwest::Client,
}

impl OsrmRouteClient {
    pub fn new(params: OsrmRouteClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    fn route_url(&self, stops: &[LatLng]) -> String {
        let mut url = self.params.osrm_url.trim_end_matches('/').to_string();
        url.push_str(OSRM_ROUTE_API_PATH);

        let coordinates = stops
            .iter()
            .map(|stop| format!("{},{}", stop.lng, stop.lat))
            .collect::<Vec<_>>()
            .join(";");
        url.push_str(&coordinates);

        url
    }

    fn into_geometry(response: OsrmRouteResponse) -> Result<RouteGeometry, GeometryError> {
        if response.code != "Ok" {
            return Err(GeometryError::NoRoute(
                response.message.unwrap_or(response.code),
            ));
        }

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| GeometryError::NoRoute("empty routes".to_string()))?;

        let legs = route
            .legs
            .iter()
            .map(|leg| LegGeometry {
                distance: leg.distance,
                duration: leg.duration,
                waypoints: leg.waypoints(),
            })
            .collect();

        Ok(RouteGeometry { legs })
    }
}

impl GeometryProvider for OsrmRouteClient {
    async fn route(&self, stops: &[LatLng]) -> Result<RouteGeometry, GeometryError> {
        if stops.len() < 2 {
            return Err(GeometryError::NotEnoughStops(stops.len()));
        }

        let url = self.route_url(stops);
        debug!("OsrmRouteClient: requesting route with {} stops", stops.len());

        let response = self
            .client
            .get(url)
            .query(&[
                ("steps", "true"),
                ("overview", "false"),
                ("annotations", "true"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GeometryError::Api { status, message });
        }

        let response: OsrmRouteResponse = response.json().await?;
        OsrmRouteClient::into_geometry(response)
    }
}
