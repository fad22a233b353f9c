use std::sync::Arc;

use courier_geometry::lat_lng::LatLng;

use crate::problem::dispatch_problem::ProblemError;

pub type Distance = f64;
pub type Time = f64;

/// Distance and travel time matrices, stored flat.
///
/// `index = from * num_locations + to`. Customers occupy `0..n`, the depot is
/// location `n`. Edges are directed, symmetry is not assumed.
#[derive(Debug, Clone)]
pub struct TravelMatrices {
    distances: Arc<Vec<Distance>>,
    times: Arc<Vec<Time>>,
    num_locations: usize,
}

fn validate_matrix(
    name: &'static str,
    matrix: &[Vec<f64>],
    num_locations: usize,
) -> Result<(), ProblemError> {
    if matrix.len() != num_locations {
        return Err(ProblemError::MatrixShape {
            name,
            expected: num_locations,
            actual: matrix.len(),
        });
    }

    for (i, row) in matrix.iter().enumerate() {
        if row.len() != num_locations {
            return Err(ProblemError::MatrixShape {
                name,
                expected: num_locations,
                actual: row.len(),
            });
        }

        if row[i] != 0.0 {
            return Err(ProblemError::NonZeroDiagonal { name, index: i });
        }
    }

    Ok(())
}

impl TravelMatrices {
    pub fn new(distances: Vec<Vec<Distance>>, times: Vec<Vec<Time>>) -> Result<Self, ProblemError> {
        let num_locations = distances.len();

        validate_matrix("distances", &distances, num_locations)?;
        validate_matrix("travel times", &times, num_locations)?;

        Ok(TravelMatrices {
            distances: Arc::new(distances.into_iter().flatten().collect()),
            times: Arc::new(times.into_iter().flatten().collect()),
            num_locations,
        })
    }

    /// Meters and minutes as the crow flies, rounded like the routing service values.
    pub fn from_haversine(locations: &[LatLng], speed_kmh: f64) -> Self {
        let num_locations = locations.len();
        let mut distances: Vec<Distance> = vec![0.0; num_locations * num_locations];
        let mut times: Vec<Time> = vec![0.0; num_locations * num_locations];
        let meters_per_minute = speed_kmh * 1000.0 / 60.0;

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i == j {
                    continue;
                }
                let distance = from.haversine_distance(to);
                distances[i * num_locations + j] = distance.round();
                times[i * num_locations + j] = (distance / meters_per_minute).round();
            }
        }

        TravelMatrices {
            distances: Arc::new(distances),
            times: Arc::new(times),
            num_locations,
        }
    }

    #[inline(always)]
    fn index(&self, from: usize, to: usize) -> usize {
        from * self.num_locations + to
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: usize, to: usize) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    #[inline(always)]
    pub fn travel_time(&self, from: usize, to: usize) -> Time {
        if from == to {
            return 0.0;
        }

        self.times[self.index(from, to)]
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    pub fn distance_rows(&self) -> Vec<Vec<Distance>> {
        self.distances
            .chunks(self.num_locations.max(1))
            .map(|row| row.to_vec())
            .collect()
    }

    pub fn time_rows(&self) -> Vec<Vec<Time>> {
        self.times
            .chunks(self.num_locations.max(1))
            .map(|row| row.to_vec())
            .collect()
    }
}
