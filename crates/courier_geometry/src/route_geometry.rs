use serde::{Deserialize, Serialize};

use crate::lat_lng::LatLng;

/// One leg between two consecutive stops.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LegGeometry {
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    pub waypoints: Vec<LatLng>,
}

/// Geometry of an ordered list of stops, `legs[i]` goes from stop `i` to stop `i + 1`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct RouteGeometry {
    pub legs: Vec<LegGeometry>,
}

impl RouteGeometry {
    pub fn straight_line(stops: &[LatLng], speed_kmh: f64) -> Self {
        let speed_ms = speed_kmh / 3.6;
        let legs = stops
            .windows(2)
            .map(|pair| {
                let distance = pair[0].haversine_distance(&pair[1]);
                LegGeometry {
                    distance,
                    duration: if speed_ms > 0.0 { distance / speed_ms } else { 0.0 },
                    waypoints: vec![pair[0], pair[1]],
                }
            })
            .collect();

        RouteGeometry { legs }
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}
