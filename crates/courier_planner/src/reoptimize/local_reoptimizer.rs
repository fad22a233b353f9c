use std::time::{Duration, Instant};

use tracing::debug;

use crate::{
    constraints::{
        constraint_set::ConstraintSet, generic_violations::check_generic_truck_violations,
        user_violations::check_truck_constraints,
    },
    problem::{customer::CustomerIdx, dispatch_problem::DispatchProblem, visit::Visit},
    reoptimize::{reoptimize_outcome::ReoptimizeOutcome, reoptimize_params::ReoptimizeParams},
    solution::{served_stop::ServedStop, truck_route::TruckRoute},
    utils::permutations::next_permutation,
};

/// Schedules `customers` in `order`, leaving the depot at `start_time`.
///
/// Returns `None` as soon as a customer is reached after a bounded window
/// start, or with `prune_on_window_end`, served past its window end.
fn build_candidate(
    problem: &DispatchProblem,
    route: &TruckRoute,
    customers: &[CustomerIdx],
    order: &[usize],
    start_time: f64,
    prune_on_window_end: bool,
) -> Option<TruckRoute> {
    let mut stops = Vec::with_capacity(order.len() + 2);
    stops.push(ServedStop::new(Visit::Depot, start_time, start_time, 0.0));

    let mut time = start_time;
    let mut previous = Visit::Depot;
    let mut total_distance = 0.0;

    for &index in order {
        let customer_id = customers[index];
        let customer = problem.customer(customer_id);
        let visit = Visit::Customer(customer_id);

        let arrival = time + problem.travel_time(previous, visit);
        let window_start = customer.time_window().start();
        let start_of_service = arrival.max(window_start);
        // an open window never prunes
        if window_start.is_finite() && start_of_service > window_start {
            return None;
        }
        if prune_on_window_end
            && customer
                .time_window()
                .is_late(start_of_service + customer.service_time())
        {
            return None;
        }

        let mut stop = ServedStop::new(visit, arrival, start_of_service, customer.service_time());
        stop.distance_to = problem.travel_distance(previous, visit);
        stop.time_to = problem.travel_time(previous, visit);
        total_distance += stop.distance_to;

        time = stop.departure_time;
        previous = visit;
        stops.push(stop);
    }

    let arrival = time + problem.travel_time(previous, Visit::Depot);
    let mut depot = ServedStop::new(Visit::Depot, arrival, arrival, 0.0);
    depot.distance_to = problem.travel_distance(previous, Visit::Depot);
    depot.time_to = problem.travel_time(previous, Visit::Depot);
    total_distance += depot.distance_to;
    stops.push(depot);

    Some(TruckRoute {
        truck: route.truck,
        stops,
        used_capacity: route.used_capacity,
        total_distance,
        start_time,
    })
}

fn is_feasible(
    problem: &DispatchProblem,
    candidate: &TruckRoute,
    constraint_sets: &[&ConstraintSet],
) -> bool {
    check_generic_truck_violations(problem, candidate).is_empty()
        && constraint_sets
            .iter()
            .all(|constraints| check_truck_constraints(problem, candidate, constraints).is_empty())
}

/// Re-sequences the customers of `route` by trying every ordering and keeping
/// the shortest feasible one.
///
/// Orderings are enumerated lexicographically over the current positions, the
/// current order first, and the first shortest candidate wins. The route is
/// only modified on [`ReoptimizeOutcome::Optimized`]. Waypoints are dropped,
/// geometry must be resolved again.
pub fn reoptimize_route(
    problem: &DispatchProblem,
    route: &mut TruckRoute,
    constraint_sets: &[&ConstraintSet],
    params: &ReoptimizeParams,
) -> ReoptimizeOutcome {
    route.refresh_used_capacity(problem);
    let capacity = problem.truck(route.truck).capacity();
    if route.used_capacity > capacity {
        debug!(
            "Truck {}: used capacity {} above {}, skipping re-optimization",
            route.truck, route.used_capacity, capacity
        );
        return ReoptimizeOutcome::CapacityExceeded {
            used: route.used_capacity,
            capacity,
        };
    }

    let customers = route.customers();
    let start_time = if route.start_time.is_nan() {
        0.0
    } else {
        route.start_time
    };
    let deadline = params
        .max_duration
        .and_then(|duration| Duration::try_from(duration).ok())
        .map(|duration| Instant::now() + duration);

    let mut order: Vec<usize> = (0..customers.len()).collect();
    let mut best: Option<TruckRoute> = None;
    let mut permutations = 0;
    let mut exhaustive = true;

    loop {
        if params
            .max_permutations
            .is_some_and(|max| permutations >= max)
            || deadline.is_some_and(|deadline| Instant::now() >= deadline)
        {
            exhaustive = false;
            break;
        }
        permutations += 1;

        if let Some(candidate) = build_candidate(
            problem,
            route,
            &customers,
            &order,
            start_time,
            params.prune_on_window_end,
        ) {
            let is_better = best
                .as_ref()
                .is_none_or(|best| candidate.total_distance < best.total_distance);
            if is_better && is_feasible(problem, &candidate, constraint_sets) {
                best = Some(candidate);
            }
        }

        if !next_permutation(&mut order) {
            break;
        }
    }

    let outcome = match best {
        Some(best) => {
            let total_distance = best.total_distance;
            *route = best;
            ReoptimizeOutcome::Optimized {
                total_distance,
                permutations,
                exhaustive,
            }
        }
        None if exhaustive => ReoptimizeOutcome::Infeasible { permutations },
        None => ReoptimizeOutcome::LimitReached { permutations },
    };

    debug!("Truck {}: re-optimization {:?}", route.truck, outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constraints::constraint_set::{LockedCustomer, OrderConstraint},
        problem::truck::TruckIdx,
        test_utils::{self, TestCustomer},
    };

    /// Customers at x = 1..=n, window starts at 10, 20, ...
    fn staggered_problem(count: usize) -> DispatchProblem {
        test_utils::create_line_problem(
            vec![100, 100],
            (1..=count)
                .map(|x| TestCustomer::new(x as f64, 1, (10.0 * x as f64, 10_000.0), 1.0))
                .collect(),
        )
    }

    fn route_of(problem: &DispatchProblem, customers: Vec<usize>) -> TruckRoute {
        let solution = test_utils::create_test_solution(problem, vec![customers, vec![]]);
        solution.route(TruckIdx::new(0)).unwrap().clone()
    }

    fn indices(values: &[usize]) -> Vec<CustomerIdx> {
        values.iter().copied().map(CustomerIdx::new).collect()
    }

    #[test]
    fn test_finds_feasible_ordering() {
        let problem = staggered_problem(3);
        let mut route = route_of(&problem, vec![2, 0, 1]);

        let outcome = reoptimize_route(&problem, &mut route, &[], &ReoptimizeParams::default());

        assert_eq!(
            outcome,
            ReoptimizeOutcome::Optimized {
                total_distance: 6.0,
                permutations: 6,
                exhaustive: true,
            }
        );
        assert_eq!(route.customers(), indices(&[0, 1, 2]));
        assert_eq!(route.total_distance(), 6.0);
        assert!(check_generic_truck_violations(&problem, &route).is_empty());
        assert!(route.stops().first().unwrap().is_depot());
        assert!(route.stops().last().unwrap().is_depot());
    }

    #[test]
    fn test_capacity_exceeded_leaves_route_unchanged() {
        let problem = test_utils::create_line_problem(
            vec![2, 10],
            vec![
                TestCustomer::new(1.0, 1, (10.0, 100.0), 1.0),
                TestCustomer::new(2.0, 1, (20.0, 100.0), 1.0),
                TestCustomer::new(3.0, 1, (30.0, 100.0), 1.0),
            ],
        );
        let mut route = route_of(&problem, vec![2, 1, 0]);
        let before = route.clone();

        let outcome = reoptimize_route(&problem, &mut route, &[], &ReoptimizeParams::default());

        assert_eq!(
            outcome,
            ReoptimizeOutcome::CapacityExceeded {
                used: 3,
                capacity: 2
            }
        );
        assert_eq!(route, before);
    }

    #[test]
    fn test_infeasible_when_window_cannot_be_met() {
        // C1 must finish by 150, C5 holds the truck from 90 to 170
        let problem = test_utils::create_line_problem(
            vec![100, 100],
            vec![
                TestCustomer::new(1.0, 1, (100.0, 150.0), 5.0),
                TestCustomer::new(2.0, 1, (200.0, 1000.0), 5.0),
                TestCustomer::new(3.0, 1, (300.0, 1000.0), 5.0),
                TestCustomer::new(4.0, 1, (400.0, 1000.0), 5.0),
                TestCustomer::new(5.0, 1, (90.0, 1000.0), 80.0),
            ],
        );
        let mut route = route_of(&problem, vec![0, 1, 2, 3, 4]);
        let before = route.clone();

        let outcome = reoptimize_route(&problem, &mut route, &[], &ReoptimizeParams::default());

        assert_eq!(outcome, ReoptimizeOutcome::Infeasible { permutations: 120 });
        assert_eq!(route, before);
    }

    #[test]
    fn test_constraints_filter_candidates() {
        let problem = staggered_problem(3);
        let mut order = ConstraintSet::default();
        order.add_order(OrderConstraint {
            from: CustomerIdx::new(1),
            to: CustomerIdx::new(0),
        });
        let mut route = route_of(&problem, vec![0, 1, 2]);

        let outcome = reoptimize_route(&problem, &mut route, &[&order], &ReoptimizeParams::default());
        assert_eq!(outcome, ReoptimizeOutcome::Infeasible { permutations: 6 });

        let mut locked = ConstraintSet::default();
        locked.lock_customer(LockedCustomer {
            customer: CustomerIdx::new(2),
            truck: TruckIdx::new(1),
        });
        let outcome = reoptimize_route(
            &problem,
            &mut route,
            &[&ConstraintSet::default(), &locked],
            &ReoptimizeParams::default(),
        );
        assert_eq!(outcome, ReoptimizeOutcome::Infeasible { permutations: 6 });
    }

    #[test]
    fn test_eight_customers_is_deterministic() {
        let problem = staggered_problem(8);
        let mut first = route_of(&problem, vec![7, 6, 5, 4, 3, 2, 1, 0]);
        let mut second = first.clone();

        let first_outcome =
            reoptimize_route(&problem, &mut first, &[], &ReoptimizeParams::default());
        let second_outcome =
            reoptimize_route(&problem, &mut second, &[], &ReoptimizeParams::default());

        assert_eq!(
            first_outcome,
            ReoptimizeOutcome::Optimized {
                total_distance: 16.0,
                permutations: 40_320,
                exhaustive: true,
            }
        );
        assert_eq!(first_outcome, second_outcome);
        assert_eq!(first, second);
        assert_eq!(first.customers(), indices(&[0, 1, 2, 3, 4, 5, 6, 7]));
    }

    #[test]
    fn test_permutation_ceiling_is_configurable() {
        let problem = staggered_problem(4);
        let params = ReoptimizeParams {
            max_permutations: Some(10),
            ..ReoptimizeParams::default()
        };

        let mut sorted = route_of(&problem, vec![0, 1, 2, 3]);
        let outcome = reoptimize_route(&problem, &mut sorted, &[], &params);
        assert_eq!(
            outcome,
            ReoptimizeOutcome::Optimized {
                total_distance: 8.0,
                permutations: 10,
                exhaustive: false,
            }
        );

        let params = ReoptimizeParams {
            max_permutations: Some(1),
            ..ReoptimizeParams::default()
        };
        let mut reversed = route_of(&problem, vec![3, 2, 1, 0]);
        let before = reversed.clone();
        let outcome = reoptimize_route(&problem, &mut reversed, &[], &params);
        assert_eq!(outcome, ReoptimizeOutcome::LimitReached { permutations: 1 });
        assert_eq!(reversed, before);
    }

    #[test]
    fn test_open_windows_are_not_pruned() {
        let problem = test_utils::create_line_problem(
            vec![100, 100],
            vec![
                TestCustomer::new(3.0, 1, (f64::NEG_INFINITY, f64::INFINITY), 1.0),
                TestCustomer::new(1.0, 1, (f64::NEG_INFINITY, f64::INFINITY), 1.0),
            ],
        );
        let mut route = route_of(&problem, vec![0, 1]);

        let outcome = reoptimize_route(&problem, &mut route, &[], &ReoptimizeParams::default());

        assert_eq!(
            outcome,
            ReoptimizeOutcome::Optimized {
                total_distance: 6.0,
                permutations: 2,
                exhaustive: true,
            }
        );
        assert_eq!(route.customers(), indices(&[0, 1]));
    }

    #[test]
    fn test_window_end_pruning_gives_same_result() {
        let problem = staggered_problem(5);
        let mut default = route_of(&problem, vec![4, 2, 0, 3, 1]);
        let mut pruned = default.clone();

        reoptimize_route(&problem, &mut default, &[], &ReoptimizeParams::default());
        reoptimize_route(
            &problem,
            &mut pruned,
            &[],
            &ReoptimizeParams {
                prune_on_window_end: true,
                ..ReoptimizeParams::default()
            },
        );

        assert_eq!(default, pruned);
    }
}
