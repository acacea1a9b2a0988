use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, Copy)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
}

impl Health {
    pub fn ok(service: &'static str) -> Self {
        Self { status: "ok", service }
    }
}

/// Body of the capacity-only update endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityUpdate {
    pub capacity: i32,
}

/// Result of a bulk delete.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    pub removed: u64,
}
