use std::collections::HashMap;
use std::sync::Mutex;

use crewcall_core::ids::ShiftId;

/// Per-shift operation status. Replaces the loosely-typed "busy"
/// dictionaries (escalating set, deleting set) with one small record owned
/// by the service running the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

#[derive(Debug, Default)]
pub struct StatusBoard {
    map: Mutex<HashMap<ShiftId, OpStatus>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, shift: &ShiftId, status: OpStatus) {
        self.map
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(shift.clone(), status);
    }

    pub fn get(&self, shift: &ShiftId) -> OpStatus {
        self.map
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(shift)
            .copied()
            .unwrap_or_default()
    }
}
