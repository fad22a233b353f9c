use std::sync::Arc;

use courier_geometry::{
    cache::CachedGeometryProvider,
    geometry_provider::{GeometryError, GeometryProvider},
    lat_lng::LatLng,
    osrm_route_client::{OsrmRouteClient, OsrmRouteClientParams},
    route_geometry::RouteGeometry,
    straight_line::StraightLineProvider,
};
use courier_planner::{
    problem::dispatch_problem::DispatchProblem,
    session::{
        planner_config::{PlannerConfig, SOLVER_URL_ENV_VAR, ServiceEndpoints},
        planner_session::PlannerSession,
    },
    solver::{
        raw_assignment::{RawAssignment, SolveResponse},
        rest_solver_client::{RestSolverClient, RestSolverClientParams},
        solve_params::SolveRequest,
        solver_backend::{SolverBackend, SolverError},
    },
};
use jiff::SignedDuration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

pub enum Solver {
    Rest(RestSolverClient),
    /// No solver configured, every solve fails.
    Offline,
}

impl Solver {
    pub fn from_endpoints(
        endpoints: &ServiceEndpoints,
        timeout: Option<SignedDuration>,
    ) -> Result<Self, SolverError> {
        match &endpoints.solver_url {
            Some(url) => {
                info!("Using solver at {}", url);
                let client = RestSolverClient::new(RestSolverClientParams {
                    solver_url: url.clone(),
                    timeout: timeout.or(endpoints.solver_timeout),
                })?;
                Ok(Solver::Rest(client))
            }
            None => Ok(Solver::Offline),
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Solver::Offline)
    }
}

impl SolverBackend for Solver {
    async fn solve(
        &self,
        request: SolveRequest,
        partials: UnboundedSender<RawAssignment>,
    ) -> Result<SolveResponse, SolverError> {
        match self {
            Solver::Rest(client) => client.solve(request, partials).await,
            Solver::Offline => Err(SolverError::Api {
                status: 503,
                message: format!("{} is not set", SOLVER_URL_ENV_VAR),
            }),
        }
    }
}

pub enum Geometry {
    Osrm(CachedGeometryProvider<OsrmRouteClient>),
    StraightLine(StraightLineProvider),
}

impl Geometry {
    pub fn from_endpoints(endpoints: &ServiceEndpoints) -> Self {
        match &endpoints.osrm_url {
            Some(url) => {
                info!("Using OSRM at {}", url);
                Geometry::Osrm(CachedGeometryProvider::new(OsrmRouteClient::new(
                    OsrmRouteClientParams {
                        osrm_url: url.clone(),
                    },
                )))
            }
            None => Geometry::StraightLine(StraightLineProvider::default()),
        }
    }
}

impl GeometryProvider for Geometry {
    async fn route(&self, stops: &[LatLng]) -> Result<RouteGeometry, GeometryError> {
        match self {
            Geometry::Osrm(provider) => provider.route(stops).await,
            Geometry::StraightLine(provider) => provider.route(stops).await,
        }
    }
}

pub type CliSession = PlannerSession<Solver, Geometry>;

/// Session wired to the services found in the environment.
pub fn create_session(
    problem: DispatchProblem,
    base_model: String,
    timeout: Option<SignedDuration>,
) -> anyhow::Result<CliSession> {
    let endpoints = ServiceEndpoints::from_env();
    let solver = Solver::from_endpoints(&endpoints, timeout)?;
    let geometry = Geometry::from_endpoints(&endpoints);

    Ok(PlannerSession::new(
        Arc::new(problem),
        solver,
        geometry,
        PlannerConfig::from_env(base_model),
    ))
}
