use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crewcall_core::ids::{ShiftId, UserId};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Escalate,
    Reveal,
    Accept,
    AcceptOffer,
    Delete,
}

/// The key every mutating call is de-duplicated on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpKey {
    pub op: OpKind,
    pub shift: ShiftId,
    pub user: Option<UserId>,
}

impl OpKey {
    pub fn shift_wide(op: OpKind, shift: ShiftId) -> Self {
        Self {
            op,
            shift,
            user: None,
        }
    }

    pub fn per_user(op: OpKind, shift: ShiftId, user: UserId) -> Self {
        Self {
            op,
            shift,
            user: Some(user),
        }
    }
}

/// One registry replaces the ad hoc "is this already in flight" checks:
/// consulted at the start of every mutating call, cleared when the guard
/// drops — on completion and on failure alike.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    inner: Arc<Mutex<HashSet<OpKey>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, key: OpKey) -> Result<InFlightGuard, AppError> {
        let mut set = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(key.clone()) {
            return Err(AppError::InFlight(key.op));
        }
        Ok(InFlightGuard {
            registry: Arc::clone(&self.inner),
            key,
        })
    }

    pub fn is_in_flight(&self, key: &OpKey) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(key)
    }
}

pub struct InFlightGuard {
    registry: Arc<Mutex<HashSet<OpKey>>>,
    key: OpKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}
