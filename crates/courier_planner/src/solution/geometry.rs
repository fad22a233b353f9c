use courier_geometry::{
    geometry_provider::GeometryProvider, lat_lng::LatLng, route_geometry::RouteGeometry,
    straight_line::DEFAULT_SPEED_KMH,
};
use futures::future::join_all;
use tracing::warn;

use crate::{problem::dispatch_problem::DispatchProblem, solution::solution::Solution};

/// Road geometry for `positions`, or straight lines if the provider fails or
/// returns a leg count that does not match.
pub async fn resolve_route_geometry<G: GeometryProvider>(
    provider: &G,
    positions: &[LatLng],
) -> RouteGeometry {
    match provider.route(positions).await {
        Ok(geometry) if geometry.len() + 1 == positions.len() => geometry,
        Ok(geometry) => {
            warn!(
                "Expected {} legs, geometry provider returned {}. Falling back to straight lines",
                positions.len().saturating_sub(1),
                geometry.len()
            );
            RouteGeometry::straight_line(positions, DEFAULT_SPEED_KMH)
        }
        Err(error) => {
            warn!("Geometry lookup failed: {}. Falling back to straight lines", error);
            RouteGeometry::straight_line(positions, DEFAULT_SPEED_KMH)
        }
    }
}

/// One request per route with customers, all in flight at once.
pub async fn resolve_solution_geometry<G: GeometryProvider>(
    problem: &DispatchProblem,
    solution: &mut Solution,
    provider: &G,
) {
    let requests: Vec<(usize, Vec<LatLng>)> = solution
        .routes
        .iter()
        .enumerate()
        .filter(|(_, route)| route.has_customers())
        .map(|(index, route)| (index, route.positions(problem)))
        .collect();

    let geometries = join_all(
        requests
            .iter()
            .map(|(_, positions)| resolve_route_geometry(provider, positions)),
    )
    .await;

    for ((index, _), geometry) in requests.iter().zip(geometries) {
        solution.routes[*index].attach_geometry(geometry);
    }
}
