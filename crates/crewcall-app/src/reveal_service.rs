use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex as AsyncMutex;

use crewcall_core::events::{CandidateRevealed, DomainEvent};
use crewcall_core::ids::{ShiftId, SlotId, UserId};
use crewcall_core::pool::CandidateIdentity;
use crewcall_core::shift::Shift;
use crewcall_ports::outbound::{EventPublisher, MarketplaceApi, SessionGate};

use crate::error::AppError;
use crate::session::with_session_retry;

type RevealKey = (ShiftId, UserId);

/// Discloses candidate identity on demand, exactly once per (shift, user).
/// Concurrent duplicate calls collapse onto one in-flight disclosure; the
/// second caller awaits the first's result instead of disclosing again.
pub struct RevealGate<M, S, EP>
where
    M: MarketplaceApi,
    S: SessionGate,
    EP: EventPublisher,
{
    api: M,
    session: S,
    events: EP,
    cache: Mutex<HashMap<RevealKey, CandidateIdentity>>,
    gates: Mutex<HashMap<RevealKey, Arc<AsyncMutex<()>>>>,
}

impl<M, S, EP> RevealGate<M, S, EP>
where
    M: MarketplaceApi,
    S: SessionGate,
    EP: EventPublisher,
{
    pub fn new(api: M, session: S, events: EP) -> Self {
        Self {
            api,
            session,
            events,
            cache: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached(&self, shift: &ShiftId, user: &UserId) -> Option<CandidateIdentity> {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(shift.clone(), user.clone()))
            .cloned()
    }

    /// Pre-fill the cache from a record that arrived already revealed, so
    /// no disclosure call is ever issued for it.
    pub fn seed(&self, shift: &ShiftId, user: &UserId, identity: CandidateIdentity) {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((shift.clone(), user.clone()), identity);
    }

    pub async fn reveal(
        &self,
        shift: &Shift,
        user: &UserId,
        slot: Option<&SlotId>,
        now: DateTime<Utc>,
    ) -> Result<CandidateIdentity, AppError> {
        let key = (shift.id().clone(), user.clone());

        if let Some(identity) = self.cached(shift.id(), user) {
            return Ok(identity);
        }

        let gate = {
            let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(gates.entry(key.clone()).or_default())
        };
        let _held = gate.lock().await;

        // The first caller may have filled the cache while we waited.
        if let Some(identity) = self.cached(shift.id(), user) {
            return Ok(identity);
        }

        let identity = with_session_retry(&self.session, || {
            self.api.reveal_interest(shift.id(), user, slot)
        })
        .await?;

        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, identity.clone());
        self.events
            .publish(vec![DomainEvent::CandidateRevealed(CandidateRevealed {
                shift_id: shift.id().clone(),
                user_id: user.clone(),
                occurred_at: now,
            })])
            .await?;

        Ok(identity)
    }
}
