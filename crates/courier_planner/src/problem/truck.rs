use serde::Serialize;

use crate::define_index_newtype;

define_index_newtype!(TruckIdx, Truck);

pub type Capacity = u32;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Truck {
    id: TruckIdx,
    name: String,
    /// Presentation only
    color: String,
    capacity: Capacity,
}

impl Truck {
    pub fn new(id: TruckIdx, name: String, color: String, capacity: Capacity) -> Self {
        Truck {
            id,
            name,
            color,
            capacity,
        }
    }

    pub fn id(&self) -> TruckIdx {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }
}
