use std::sync::Arc;

use courier_geometry::route_geometry::RouteGeometry;
use serde::Serialize;

use crate::{
    constraints::{
        constraint_set::{ConstraintSet, LockedCustomer, OrderConstraint},
        generic_violations::check_generic_violations,
        model_code::full_model,
        user_violations::check_user_constraints,
        violation::Violation,
    },
    define_index_newtype,
    error::PlannerError,
    problem::{
        dispatch_problem::DispatchProblem,
        travel_matrices::{Distance, Time},
        truck::TruckIdx,
        visit::Visit,
    },
    solution::{solution::Solution, truck_route::TruckRoute},
    tree::node_state::NodeState,
};

define_index_newtype!(NodeId, SolutionNode);

/// A solution together with the constraints it was edited under.
///
/// `generation` changes on every mutation. Work computed from a snapshot of
/// the node is only committed if the generation did not move in between.
#[derive(Serialize, Debug)]
pub struct SolutionNode {
    id: NodeId,
    name: String,
    #[serde(skip)]
    problem: Arc<DispatchProblem>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    solution: Solution,
    constraints: ConstraintSet,
    violations: Vec<Violation>,
    state: NodeState,
    generation: u64,
}

impl SolutionNode {
    pub(crate) fn root(id: NodeId, problem: Arc<DispatchProblem>) -> Self {
        let mut node = SolutionNode {
            id,
            name: format!("Solution {}", id.get() + 1),
            problem,
            parent: None,
            children: Vec::new(),
            solution: Solution::empty(),
            constraints: ConstraintSet::default(),
            violations: Vec::new(),
            state: NodeState::Interactive,
            generation: 0,
        };
        node.recompute_violations();
        node
    }

    /// Deep copy of `parent`'s solution and constraints, interactive.
    /// The caller registers the child on the parent.
    pub(crate) fn fork_from(id: NodeId, parent: &SolutionNode) -> Self {
        let mut node = SolutionNode {
            id,
            name: format!("Solution {}", id.get() + 1),
            problem: Arc::clone(&parent.problem),
            parent: Some(parent.id),
            children: Vec::new(),
            solution: parent.solution.clone(),
            constraints: parent.constraints.clone(),
            violations: Vec::new(),
            state: NodeState::Interactive,
            generation: 0,
        };
        node.recompute_violations();
        node
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn problem(&self) -> &Arc<DispatchProblem> {
        &self.problem
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn distance(&self) -> Distance {
        self.solution.distance()
    }

    pub fn finish_time(&self) -> Time {
        self.solution.finish_time()
    }

    pub fn count_custom_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn fingerprint(&self) -> u64 {
        self.solution.fingerprint()
    }

    /// Base model extended with the problem's and this node's constraints.
    pub fn model(&self, base_model: &str) -> String {
        full_model(base_model, self.problem.constraints(), &self.constraints)
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    pub(crate) fn recompute_violations(&mut self) {
        self.solution.refresh_issues(&self.problem);
        let mut violations = self.solution.issues().to_vec();
        violations.extend(check_generic_violations(&self.problem, &self.solution));
        violations.extend(check_user_constraints(
            &self.problem,
            &self.solution,
            self.problem.constraints(),
        ));
        violations.extend(check_user_constraints(
            &self.problem,
            &self.solution,
            &self.constraints,
        ));
        self.violations = violations;
    }

    pub(crate) fn replace_solution(&mut self, solution: Solution) {
        self.solution = solution;
        self.touch();
        self.recompute_violations();
    }

    pub fn is_customer_locked(&self, truck: TruckIdx, visit: Visit) -> bool {
        match visit {
            Visit::Depot => false,
            Visit::Customer(customer) => self
                .constraints
                .is_customer_locked(&LockedCustomer { customer, truck }),
        }
    }

    /// Returns whether the lock is now present. Locking the depot is a no-op.
    pub(crate) fn toggle_customer_locked(&mut self, truck: TruckIdx, visit: Visit) -> bool {
        let Visit::Customer(customer) = visit else {
            return false;
        };

        let locked = self
            .constraints
            .toggle_locked_customer(LockedCustomer { customer, truck });
        self.touch();
        self.recompute_violations();
        locked
    }

    pub fn is_truck_locked(&self, truck: TruckIdx) -> bool {
        self.constraints.locked_truck(truck).is_some()
    }

    /// Locks the truck to its current sequence of customers, or unlocks it.
    pub(crate) fn toggle_truck_locked(&mut self, truck: TruckIdx) -> bool {
        let customers = self
            .solution
            .route(truck)
            .map(|route| route.customers())
            .unwrap_or_default();

        let locked = self.constraints.toggle_locked_truck(truck, customers);
        self.touch();
        self.recompute_violations();
        locked
    }

    /// Returns `false` for a duplicate or a depot end.
    pub(crate) fn create_partial_order(&mut self, from: Visit, to: Visit) -> bool {
        let (Some(from), Some(to)) = (from.customer(), to.customer()) else {
            return false;
        };

        if !self.constraints.add_order(OrderConstraint { from, to }) {
            return false;
        }
        self.touch();
        self.recompute_violations();
        true
    }

    pub(crate) fn remove_partial_order(&mut self, order: &OrderConstraint) -> bool {
        if !self.constraints.remove_order(order) {
            return false;
        }
        self.touch();
        self.recompute_violations();
        true
    }

    /// Moves `visit` to the end of `truck`'s route, before the depot, and pins
    /// it to that truck. Returns the routes to re-optimize, `None` when
    /// nothing moved.
    pub(crate) fn move_customer(&mut self, truck: TruckIdx, visit: Visit) -> Option<Vec<TruckIdx>> {
        let customer = visit.customer()?;
        self.solution.route(truck)?;
        let (source, _) = self.solution.serving(customer)?;

        let stop = self.solution.route_mut(source)?.remove_customer(customer)?;
        self.solution.route_mut(truck)?.insert_before_last_depot(stop);
        self.constraints.pin_customer(customer, truck);

        Some(self.settle_splice(source, truck))
    }

    /// Moves `visit` right before `before`, on whichever truck serves `before`.
    pub(crate) fn move_customer_before(&mut self, visit: Visit, before: Visit) -> Option<Vec<TruckIdx>> {
        let customer = visit.customer()?;
        let before = before.customer()?;
        if customer == before {
            return None;
        }
        let (truck, _) = self.solution.serving(before)?;
        let (source, _) = self.solution.serving(customer)?;

        let stop = self.solution.route_mut(source)?.remove_customer(customer)?;
        let target = self.solution.route_mut(truck)?;
        let position = target.position_of(before)?;
        target.insert_at(position, stop);
        self.constraints.pin_customer(customer, truck);

        Some(self.settle_splice(source, truck))
    }

    fn settle_splice(&mut self, source: TruckIdx, target: TruckIdx) -> Vec<TruckIdx> {
        let trucks = if source == target {
            vec![target]
        } else {
            vec![source, target]
        };

        for &truck in &trucks {
            if let Some(route) = self.solution.route_mut(truck) {
                route.refresh_legs(&self.problem);
            }
        }
        self.solution.refresh_totals();
        self.touch();
        self.recompute_violations();

        trucks
    }

    /// Replaces the route of the same truck if `generation` is still current.
    pub(crate) fn commit_route(&mut self, generation: u64, route: TruckRoute) -> bool {
        if generation != self.generation {
            return false;
        }
        let Some(existing) = self.solution.route_mut(route.truck()) else {
            return false;
        };

        *existing = route;
        self.solution.refresh_totals();
        self.recompute_violations();
        true
    }

    pub(crate) fn attach_geometry(
        &mut self,
        generation: u64,
        truck: TruckIdx,
        geometry: RouteGeometry,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.solution.route_mut(truck) {
            Some(route) => {
                route.attach_geometry(geometry);
                true
            }
            None => false,
        }
    }

    pub(crate) fn start_solving(&mut self) -> Result<(), PlannerError> {
        if !self.state.can_solve() {
            return Err(PlannerError::InvalidTransition {
                action: "solve",
                state: self.state,
            });
        }
        self.state = NodeState::Solving;
        self.touch();
        Ok(())
    }

    pub(crate) fn finish(&mut self, state: NodeState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        problem::customer::CustomerIdx,
        reoptimize::{local_reoptimizer::reoptimize_route, reoptimize_params::ReoptimizeParams},
        solution::parser::build_solution,
        test_utils::{self, TestCustomer},
    };

    fn customer(index: usize) -> Visit {
        Visit::Customer(CustomerIdx::new(index))
    }

    fn node() -> SolutionNode {
        let problem = Arc::new(test_utils::create_line_problem(
            vec![3, 3],
            vec![
                TestCustomer::new(1.0, 1, (10.0, 1000.0), 1.0),
                TestCustomer::new(2.0, 1, (20.0, 1000.0), 1.0),
                TestCustomer::new(3.0, 1, (30.0, 1000.0), 1.0),
                TestCustomer::new(4.0, 1, (40.0, 1000.0), 1.0),
            ],
        ));
        let solution = test_utils::create_test_solution(&problem, vec![vec![0, 1], vec![2, 3]]);
        let mut node = SolutionNode::root(NodeId::new(0), problem);
        node.replace_solution(solution);
        node
    }

    #[test]
    fn test_root_node() {
        let node = node();

        assert_eq!(node.name(), "Solution 1");
        assert!(node.is_valid());
        assert_eq!(node.distance(), 12.0);
        assert_eq!(node.state(), NodeState::Interactive);
        assert_eq!(node.count_custom_constraints(), 0);
    }

    #[test]
    fn test_toggle_customer_lock_twice_is_identity() {
        let mut node = node();
        let before = node.constraints().clone();

        assert!(node.toggle_customer_locked(TruckIdx::new(1), customer(0)));
        assert!(node.is_customer_locked(TruckIdx::new(1), customer(0)));
        assert!(!node.is_valid());

        assert!(!node.toggle_customer_locked(TruckIdx::new(1), customer(0)));
        assert_eq!(node.constraints(), &before);
        assert!(node.is_valid());
    }

    #[test]
    fn test_depot_lock_is_noop() {
        let mut node = node();
        let generation = node.generation();

        assert!(!node.toggle_customer_locked(TruckIdx::new(0), Visit::Depot));
        assert!(!node.is_customer_locked(TruckIdx::new(0), Visit::Depot));
        assert_eq!(node.count_custom_constraints(), 0);
        assert_eq!(node.generation(), generation);
    }

    #[test]
    fn test_toggle_truck_lock_uses_current_route() {
        let mut node = node();

        assert!(node.toggle_truck_locked(TruckIdx::new(1)));
        assert_eq!(
            node.constraints().locked_truck(TruckIdx::new(1)).unwrap().customers,
            vec![CustomerIdx::new(2), CustomerIdx::new(3)]
        );
        assert!(node.is_valid());
        assert!(!node.toggle_truck_locked(TruckIdx::new(1)));
        assert!(!node.is_truck_locked(TruckIdx::new(1)));
    }

    #[test]
    fn test_partial_order_duplicates_and_removal() {
        let mut node = node();

        assert!(node.create_partial_order(customer(1), customer(0)));
        assert!(!node.create_partial_order(customer(1), customer(0)));
        assert!(!node.create_partial_order(Visit::Depot, customer(0)));
        assert_eq!(node.count_custom_constraints(), 1);
        assert_eq!(
            node.violations(),
            &[Violation::OrderNotRespected {
                from: "C2".to_string(),
                to: "C1".to_string(),
            }]
        );

        let order = OrderConstraint {
            from: CustomerIdx::new(1),
            to: CustomerIdx::new(0),
        };
        assert!(node.remove_partial_order(&order));
        assert!(!node.remove_partial_order(&order));
        assert!(node.is_valid());
    }

    #[test]
    fn test_move_customer_splices_and_pins() {
        let mut node = node();
        let generation = node.generation();

        let trucks = node.move_customer(TruckIdx::new(1), customer(0)).unwrap();

        assert_eq!(trucks, vec![TruckIdx::new(0), TruckIdx::new(1)]);
        assert!(node.generation() > generation);
        assert!(node.is_customer_locked(TruckIdx::new(1), customer(0)));

        let target = node.solution().route(TruckIdx::new(1)).unwrap();
        assert_eq!(
            target.customers(),
            vec![CustomerIdx::new(2), CustomerIdx::new(3), CustomerIdx::new(0)]
        );
        assert!(target.stops().last().unwrap().is_depot());
        assert_eq!(target.used_capacity(), 3);
        assert_eq!(node.solution().route(TruckIdx::new(0)).unwrap().used_capacity(), 1);
        // stale timings on the target route are reported until re-optimized
        assert!(!node.is_valid());
    }

    #[test]
    fn test_move_customer_noops() {
        let mut node = node();

        assert!(node.move_customer(TruckIdx::new(1), Visit::Depot).is_none());
        assert!(node.move_customer(TruckIdx::new(5), customer(0)).is_none());
        assert!(node.move_customer_before(customer(0), customer(0)).is_none());
        assert!(node.move_customer_before(customer(0), Visit::Depot).is_none());
        assert_eq!(node.count_custom_constraints(), 0);
    }

    #[test]
    fn test_move_customer_before() {
        let mut node = node();

        let trucks = node.move_customer_before(customer(3), customer(1)).unwrap();

        assert_eq!(trucks, vec![TruckIdx::new(1), TruckIdx::new(0)]);
        assert_eq!(
            node.solution().route(TruckIdx::new(0)).unwrap().customers(),
            vec![CustomerIdx::new(0), CustomerIdx::new(3), CustomerIdx::new(1)]
        );
        assert!(node.is_customer_locked(TruckIdx::new(0), customer(3)));

        let trucks = node.move_customer_before(customer(1), customer(0)).unwrap();
        assert_eq!(trucks, vec![TruckIdx::new(0)]);
    }

    #[test]
    fn test_stale_commit_is_discarded() {
        let mut node = node();
        let generation = node.generation();
        let route = node.solution().route(TruckIdx::new(0)).unwrap().clone();

        node.toggle_truck_locked(TruckIdx::new(0));

        assert!(!node.commit_route(generation, route.clone()));
        assert!(node.commit_route(node.generation(), route));
    }

    #[test]
    fn test_malformed_route_clears_once_replaced() {
        let mut node = node();
        let mut raw =
            test_utils::create_raw_assignment(node.problem(), vec![vec![0, 1], vec![2, 3]]);
        // C3 before truck 2 leaves the depot
        raw.arrival_time[2] = -1.0;
        let solution = build_solution(node.problem(), &raw).unwrap();
        node.replace_solution(solution);

        assert!(node.violations().contains(&Violation::MalformedRoute {
            truck: "Truck 2".to_string(),
            reason: "does not start at the depot".to_string(),
        }));

        let mut route = node.solution().route(TruckIdx::new(1)).unwrap().clone();
        let outcome = reoptimize_route(node.problem(), &mut route, &[], &ReoptimizeParams::default());
        assert!(outcome.is_optimized());
        assert!(node.commit_route(node.generation(), route));

        assert!(node.solution().issues().is_empty());
        assert!(node.is_valid());

        let fork = SolutionNode::fork_from(NodeId::new(1), &node);
        assert!(fork.is_valid());
    }

    #[test]
    fn test_solving_transitions() {
        let mut node = node();

        node.start_solving().unwrap();
        assert_eq!(node.state(), NodeState::Solving);
        assert!(node.start_solving().is_err());

        node.finish(NodeState::TimedOut);
        assert!(node.start_solving().is_ok());

        node.finish(NodeState::Unsatisfiable);
        assert!(matches!(
            node.start_solving(),
            Err(PlannerError::InvalidTransition {
                action: "solve",
                state: NodeState::Unsatisfiable
            })
        ));
    }
}
