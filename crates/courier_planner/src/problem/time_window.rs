use serde::{Deserialize, Serialize};

use crate::problem::travel_matrices::Time;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    start: Time,
    end: Time,
}

impl TimeWindow {
    pub const UNBOUNDED: TimeWindow = TimeWindow {
        start: f64::NEG_INFINITY,
        end: f64::INFINITY,
    };

    pub fn new(start: Time, end: Time) -> Self {
        TimeWindow { start, end }
    }

    pub fn start(&self) -> Time {
        self.start
    }

    pub fn end(&self) -> Time {
        self.end
    }

    pub fn is_unbounded(&self) -> bool {
        self.start == f64::NEG_INFINITY && self.end == f64::INFINITY
    }

    /// Service started before the window opened.
    pub fn is_early(&self, start_of_service: Time) -> bool {
        start_of_service < self.start
    }

    /// Service finished after the window closed.
    pub fn is_late(&self, end_of_service: Time) -> bool {
        end_of_service > self.end
    }
}
