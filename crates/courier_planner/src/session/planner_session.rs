use std::sync::Arc;

use courier_geometry::{geometry_provider::GeometryProvider, lat_lng::LatLng};
use futures::future::join_all;
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    constraints::constraint_set::OrderConstraint,
    error::PlannerError,
    problem::{
        dispatch_problem::{DispatchProblem, ProblemError},
        travel_matrices::{Distance, Time},
        truck::TruckIdx,
        visit::Visit,
    },
    reoptimize::{local_reoptimizer::reoptimize_route, reoptimize_outcome::ReoptimizeOutcome},
    session::planner_config::PlannerConfig,
    solution::{geometry::resolve_route_geometry, parser::parse_solution, truck_route::TruckRoute},
    solver::{
        raw_assignment::{RawAssignment, SolveResponse},
        solve_params::{SolveParams, SolveRequest},
        solver_backend::{SolverBackend, SolverError},
    },
    tree::{
        node_state::NodeState,
        solution_node::{NodeId, SolutionNode},
        solution_tree::SolutionTree,
        workspace::Workspace,
    },
};

struct SessionState {
    tree: SolutionTree,
    workspace: Workspace,
}

/// A move applied in place, waiting for its routes to be re-optimized.
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    /// Node that was edited, a fork if the requested node was not interactive.
    pub node: NodeId,
    pub generation: u64,
    pub trucks: Vec<TruckIdx>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MoveReport {
    pub node: NodeId,
    pub outcomes: Vec<(TruckIdx, ReoptimizeOutcome)>,
    /// False when the node changed while re-optimizing and the result was dropped.
    pub committed: bool,
}

/// Editing context for one problem: the solution tree, what the user is
/// looking at, and the services used to solve and draw.
///
/// All edits go through the session. Editing a node that is not interactive
/// forks it first and the fork is edited instead, so every edit returns the
/// id of the node that actually changed.
pub struct PlannerSession<S, G> {
    problem: Arc<DispatchProblem>,
    state: RwLock<SessionState>,
    solver: S,
    geometry: G,
    config: PlannerConfig,
}

impl<S, G> PlannerSession<S, G>
where
    S: SolverBackend,
    G: GeometryProvider,
{
    pub fn new(problem: Arc<DispatchProblem>, solver: S, geometry: G, config: PlannerConfig) -> Self {
        PlannerSession {
            state: RwLock::new(SessionState {
                tree: SolutionTree::new(Arc::clone(&problem)),
                workspace: Workspace::default(),
            }),
            problem,
            solver,
            geometry,
            config,
        }
    }

    pub fn problem(&self) -> &Arc<DispatchProblem> {
        &self.problem
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Reads a node without exposing the lock.
    pub fn snapshot<R>(
        &self,
        id: NodeId,
        read: impl FnOnce(&SolutionNode) -> R,
    ) -> Result<R, PlannerError> {
        let state = self.state.read();
        state.tree.node(id).map(read)
    }

    pub fn node_count(&self) -> usize {
        self.state.read().tree.len()
    }

    pub fn workspace(&self) -> Workspace {
        self.state.read().workspace.clone()
    }

    pub fn lineage(&self, id: NodeId) -> Result<Vec<NodeId>, PlannerError> {
        self.state.read().tree.lineage(id)
    }

    fn check_truck(&self, truck: TruckIdx) -> Result<(), PlannerError> {
        if !self.problem.has_truck(truck) {
            return Err(ProblemError::UnknownTruck(truck.get()).into());
        }
        Ok(())
    }

    fn check_visit(&self, visit: Visit) -> Result<(), PlannerError> {
        match visit.customer() {
            Some(customer) if !self.problem.has_customer(customer) => {
                Err(ProblemError::UnknownCustomer(customer.get()).into())
            }
            _ => Ok(()),
        }
    }

    fn update<R>(
        &self,
        id: NodeId,
        update: impl FnOnce(&mut SolutionNode) -> R,
    ) -> Result<R, PlannerError> {
        let mut state = self.state.write();
        state.tree.node_mut(id).map(update)
    }

    /// Id of a node that can be edited in place: `id` itself if interactive,
    /// a fresh fork otherwise.
    fn editable(state: &mut SessionState, id: NodeId) -> Result<NodeId, PlannerError> {
        let node = state.tree.node(id)?;
        if node.state().is_editable() {
            return Ok(id);
        }

        let fork = state.tree.fork(id)?;
        state.workspace.replace_with_fork(id, fork);
        info!(
            "Solution {} is {}, editing fork Solution {}",
            id.get() + 1,
            state.tree.node(id)?.state(),
            fork.get() + 1
        );
        Ok(fork)
    }

    fn edit<R>(
        &self,
        id: NodeId,
        edit: impl FnOnce(&mut SolutionNode) -> R,
    ) -> Result<(NodeId, R), PlannerError> {
        let mut state = self.state.write();
        let id = Self::editable(&mut state, id)?;
        let result = edit(state.tree.node_mut(id)?);
        Ok((id, result))
    }

    pub fn create_root(&self) -> NodeId {
        let mut state = self.state.write();
        let id = state.tree.create_root();
        state.workspace.push(id);
        id
    }

    pub fn fork(&self, id: NodeId) -> Result<NodeId, PlannerError> {
        let mut state = self.state.write();
        let fork = state.tree.fork(id)?;
        state.workspace.replace_with_fork(id, fork);
        Ok(fork)
    }

    pub fn toggle_customer_locked(
        &self,
        id: NodeId,
        truck: TruckIdx,
        visit: Visit,
    ) -> Result<NodeId, PlannerError> {
        if visit.is_depot() {
            return Ok(id);
        }
        self.check_truck(truck)?;
        self.check_visit(visit)?;
        self.edit(id, |node| node.toggle_customer_locked(truck, visit))
            .map(|(id, _)| id)
    }

    pub fn toggle_truck_locked(&self, id: NodeId, truck: TruckIdx) -> Result<NodeId, PlannerError> {
        self.check_truck(truck)?;
        self.edit(id, |node| node.toggle_truck_locked(truck))
            .map(|(id, _)| id)
    }

    pub fn create_partial_order(
        &self,
        id: NodeId,
        from: Visit,
        to: Visit,
    ) -> Result<NodeId, PlannerError> {
        if from.is_depot() || to.is_depot() {
            return Ok(id);
        }
        self.check_visit(from)?;
        self.check_visit(to)?;
        self.edit(id, |node| node.create_partial_order(from, to))
            .map(|(id, _)| id)
    }

    pub fn remove_partial_order(
        &self,
        id: NodeId,
        order: &OrderConstraint,
    ) -> Result<NodeId, PlannerError> {
        self.edit(id, |node| node.remove_partial_order(order))
            .map(|(id, _)| id)
    }

    /// Moves a customer to the end of `truck`'s route. Violations reflect the
    /// spliced routes immediately, [`Self::settle_move`] re-optimizes them.
    /// `None` when nothing moved.
    pub fn move_customer(
        &self,
        id: NodeId,
        truck: TruckIdx,
        visit: Visit,
    ) -> Result<Option<MovePlan>, PlannerError> {
        if visit.is_depot() {
            return Ok(None);
        }
        let (id, moved) = self.edit(id, |node| {
            node.move_customer(truck, visit)
                .map(|trucks| (node.generation(), trucks))
        })?;

        Ok(moved.map(|(generation, trucks)| MovePlan {
            node: id,
            generation,
            trucks,
        }))
    }

    /// Moves a customer right before another one, on the truck serving it.
    pub fn move_customer_before(
        &self,
        id: NodeId,
        visit: Visit,
        before: Visit,
    ) -> Result<Option<MovePlan>, PlannerError> {
        if visit.is_depot() || before.is_depot() || visit == before {
            return Ok(None);
        }
        let (id, moved) = self.edit(id, |node| {
            node.move_customer_before(visit, before)
                .map(|trucks| (node.generation(), trucks))
        })?;

        Ok(moved.map(|(generation, trucks)| MovePlan {
            node: id,
            generation,
            trucks,
        }))
    }

    /// Re-optimizes the routes touched by a move off the async runtime, then
    /// resolves their geometry. Results are dropped if the node was edited
    /// in the meantime.
    pub async fn settle_move(&self, plan: MovePlan) -> Result<MoveReport, PlannerError> {
        let stale = |plan: &MovePlan| MoveReport {
            node: plan.node,
            outcomes: Vec::new(),
            committed: false,
        };

        let Some((routes, constraints)) = self.snapshot(plan.node, |node| {
            (node.generation() == plan.generation).then(|| {
                let routes: Vec<TruckRoute> = plan
                    .trucks
                    .iter()
                    .filter_map(|&truck| node.solution().route(truck).cloned())
                    .collect();
                (routes, node.constraints().clone())
            })
        })?
        else {
            debug!("Solution {} changed before re-optimization", plan.node.get() + 1);
            return Ok(stale(&plan));
        };

        let problem = Arc::clone(&self.problem);
        let params = self.config.reoptimize.clone();
        let optimized: Vec<(TruckRoute, ReoptimizeOutcome)> =
            tokio::task::spawn_blocking(move || {
                routes
                    .into_iter()
                    .map(|mut route| {
                        let outcome = reoptimize_route(
                            &problem,
                            &mut route,
                            &[problem.constraints(), &constraints],
                            &params,
                        );
                        (route, outcome)
                    })
                    .collect::<Vec<_>>()
            })
            .await?;

        let outcomes: Vec<(TruckIdx, ReoptimizeOutcome)> = optimized
            .iter()
            .map(|(route, outcome)| (route.truck(), outcome.clone()))
            .collect();

        let committed = self.update(plan.node, |node| {
            if node.generation() != plan.generation {
                return false;
            }
            for (route, outcome) in optimized {
                if outcome.is_optimized() {
                    node.commit_route(plan.generation, route);
                }
            }
            node.recompute_violations();
            true
        })?;

        if !committed {
            debug!(
                "Solution {} changed during re-optimization, result dropped",
                plan.node.get() + 1
            );
            return Ok(stale(&plan));
        }

        self.resolve_geometry(plan.node, plan.generation, &plan.trucks)
            .await?;

        Ok(MoveReport {
            node: plan.node,
            outcomes,
            committed,
        })
    }

    /// [`Self::move_customer`] followed by [`Self::settle_move`].
    pub async fn move_customer_and_settle(
        &self,
        id: NodeId,
        truck: TruckIdx,
        visit: Visit,
    ) -> Result<Option<MoveReport>, PlannerError> {
        match self.move_customer(id, truck, visit)? {
            Some(plan) => self.settle_move(plan).await.map(Some),
            None => Ok(None),
        }
    }

    async fn resolve_geometry(
        &self,
        id: NodeId,
        generation: u64,
        trucks: &[TruckIdx],
    ) -> Result<(), PlannerError> {
        let requests: Vec<(TruckIdx, Vec<LatLng>)> = self.snapshot(id, |node| {
            trucks
                .iter()
                .filter_map(|&truck| node.solution().route(truck))
                .filter(|route| route.has_customers())
                .map(|route| (route.truck(), route.positions(&self.problem)))
                .collect()
        })?;

        let geometries = join_all(
            requests
                .iter()
                .map(|(_, positions)| resolve_route_geometry(&self.geometry, positions)),
        )
        .await;

        self.update(id, |node| {
            for ((truck, _), geometry) in requests.iter().zip(geometries) {
                if !node.attach_geometry(generation, *truck, geometry) {
                    debug!("Solution {} changed, geometry dropped", id.get() + 1);
                    break;
                }
            }
        })
    }

    /// Runs the solver on a node. Every solution streamed by the solver
    /// replaces the node's solution as it arrives.
    pub async fn solve(&self, id: NodeId) -> Result<NodeState, PlannerError> {
        let request = self.update(id, |node| {
            node.start_solving()?;
            info!("{}: solving", node.name());
            Ok::<_, PlannerError>(SolveRequest {
                model: node.model(&self.config.base_model),
                params: SolveParams::from_problem(&self.problem),
                all_solutions: true,
            })
        })??;

        let (sender, mut receiver) = mpsc::unbounded_channel();
        let drain = async {
            while let Some(raw) = receiver.recv().await {
                match parse_solution(&self.problem, &raw, &self.geometry).await {
                    Ok(solution) => {
                        debug!("Solution {}: objective {}", id.get() + 1, raw.objective);
                        // node cannot disappear, the tree only grows
                        let _ = self.update(id, |node| node.replace_solution(solution));
                    }
                    Err(error) => warn!("Discarding intermediate solution: {}", error),
                }
            }
        };

        let (result, ()) = tokio::join!(self.solver.solve(request, sender), drain);
        let state = self.complete_solve(id, result).await;

        self.update(id, |node| {
            node.finish(state);
            info!("{}: {}", node.name(), state);
        })?;

        Ok(state)
    }

    async fn complete_solve(
        &self,
        id: NodeId,
        result: Result<SolveResponse, SolverError>,
    ) -> NodeState {
        let response = match result {
            Ok(response) => response,
            Err(SolverError::Timeout(message)) => {
                warn!("Solution {}: solver timed out: {}", id.get() + 1, message);
                return NodeState::TimedOut;
            }
            Err(error) => {
                warn!("Solution {}: solver failed: {}", id.get() + 1, error);
                return NodeState::Unsatisfiable;
            }
        };

        if let Some(best) = response.best() {
            let current = self.snapshot(id, |node| node.distance()).unwrap_or(f64::NAN);
            if best.objective != current {
                match parse_solution(&self.problem, best, &self.geometry).await {
                    Ok(solution) => {
                        let _ = self.update(id, |node| node.replace_solution(solution));
                    }
                    Err(error) => {
                        warn!("Solution {}: invalid solver result: {}", id.get() + 1, error);
                        return NodeState::Unsatisfiable;
                    }
                }
            }
        }

        if response.status.is_success() {
            NodeState::Satisfied
        } else {
            NodeState::Unsatisfiable
        }
    }

    /// Creates a root node and solves it.
    pub async fn solve_fresh(&self) -> Result<NodeId, PlannerError> {
        let id = self.create_root();
        self.solve(id).await?;
        Ok(id)
    }

    /// Creates a root node holding a solution obtained elsewhere, as if the
    /// solver had returned it.
    pub async fn import_solution(&self, raw: &RawAssignment) -> Result<NodeId, PlannerError> {
        let solution = parse_solution(&self.problem, raw, &self.geometry).await?;
        let id = self.create_root();
        self.update(id, |node| {
            node.replace_solution(solution);
            node.finish(NodeState::Satisfied);
            info!("{}: imported, objective {}", node.name(), raw.objective);
        })?;
        Ok(id)
    }

    pub fn toggle_in_gallery(&self, id: NodeId) -> bool {
        self.state.write().workspace.toggle_in_gallery(id)
    }

    pub fn is_in_gallery(&self, id: NodeId) -> bool {
        self.state.read().workspace.is_in_gallery(id)
    }

    pub fn is_in_focus(&self, id: NodeId) -> bool {
        self.state.read().workspace.is_in_focus(id)
    }

    pub fn select_left(&self, id: NodeId) -> Result<(), PlannerError> {
        let mut state = self.state.write();
        state.tree.node(id)?;
        state.workspace.select_left(id);
        Ok(())
    }

    pub fn select_right(&self, id: NodeId) -> Result<(), PlannerError> {
        let mut state = self.state.write();
        state.tree.node(id)?;
        state.workspace.select_right(id);
        Ok(())
    }

    /// Largest distance among listed solutions, 0 when none is solved.
    pub fn max_distance(&self) -> Distance {
        self.fold_solutions(|node| node.distance())
    }

    pub fn max_finish_time(&self) -> Time {
        self.fold_solutions(|node| node.finish_time())
    }

    fn fold_solutions(&self, value: impl Fn(&SolutionNode) -> f64) -> f64 {
        let state = self.state.read();
        state
            .workspace
            .solutions()
            .iter()
            .filter_map(|&id| state.tree.node(id).ok())
            .map(value)
            .filter(|value| !value.is_nan())
            .fold(0.0, f64::max)
    }
}
