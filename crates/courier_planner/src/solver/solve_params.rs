use serde::Serialize;

use crate::problem::{
    dispatch_problem::DispatchProblem,
    travel_matrices::{Distance, Time},
    truck::Capacity,
};

/// Data handed to the solver along with the model text.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SolveParams {
    pub n_vehicles: usize,
    pub capacity: Vec<Capacity>,
    pub demand: Vec<Capacity>,
    pub travel_time: Vec<Vec<Time>>,
    pub distance: Vec<Vec<Distance>>,
    pub start_time: Vec<Time>,
    pub end_time: Vec<Time>,
    pub service_time: Vec<Time>,
}

impl SolveParams {
    pub fn from_problem(problem: &DispatchProblem) -> Self {
        let customers = problem.customers();
        SolveParams {
            n_vehicles: problem.trucks().len(),
            capacity: problem.trucks().iter().map(|truck| truck.capacity()).collect(),
            demand: customers.iter().map(|customer| customer.demand()).collect(),
            travel_time: problem.matrices().time_rows(),
            distance: problem.matrices().distance_rows(),
            start_time: customers
                .iter()
                .map(|customer| customer.time_window().start())
                .collect(),
            end_time: customers
                .iter()
                .map(|customer| customer.time_window().end())
                .collect(),
            service_time: customers
                .iter()
                .map(|customer| customer.service_time())
                .collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct SolveRequest {
    pub model: String,
    #[serde(rename = "data")]
    pub params: SolveParams,
    pub all_solutions: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, TestCustomer};

    #[test]
    fn test_from_problem() {
        let problem = test_utils::create_line_problem(
            vec![10, 20],
            vec![
                TestCustomer::new(1.0, 3, (10.0, 50.0), 5.0),
                TestCustomer::new(2.0, 4, (20.0, 60.0), 6.0),
            ],
        );

        let params = SolveParams::from_problem(&problem);

        assert_eq!(params.n_vehicles, 2);
        assert_eq!(params.capacity, vec![10, 20]);
        assert_eq!(params.demand, vec![3, 4]);
        assert_eq!(params.start_time, vec![10.0, 20.0]);
        assert_eq!(params.end_time, vec![50.0, 60.0]);
        assert_eq!(params.service_time, vec![5.0, 6.0]);
        assert_eq!(params.distance.len(), 3);
        assert_eq!(params.travel_time[2][1], 2.0);

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["nVehicles"], 2);
        assert!(json.get("travelTime").is_some());
    }
}
