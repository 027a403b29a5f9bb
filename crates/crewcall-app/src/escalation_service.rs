use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crewcall_core::events::{DomainEvent, ShiftEscalated};
use crewcall_core::ids::ShiftId;
use crewcall_core::shift::Shift;
use crewcall_core::tier::{Tier, TierSelection};
use crewcall_ports::outbound::{EventPublisher, MarketplaceApi, SessionGate};

use crate::error::AppError;
use crate::inflight::{InFlightRegistry, OpKey, OpKind};
use crate::session::with_session_retry;
use crate::status::{OpStatus, StatusBoard};

/// Owns each shift's tier view cursor and the escalation transition.
/// The backend's returned shift is authoritative; the cursor confirms onto
/// whatever tier it reports.
pub struct EscalationService<M, S, EP>
where
    M: MarketplaceApi,
    S: SessionGate,
    EP: EventPublisher,
{
    api: M,
    session: S,
    events: EP,
    inflight: InFlightRegistry,
    selections: Mutex<HashMap<ShiftId, TierSelection>>,
    statuses: StatusBoard,
}

impl<M, S, EP> EscalationService<M, S, EP>
where
    M: MarketplaceApi,
    S: SessionGate,
    EP: EventPublisher,
{
    pub fn new(api: M, session: S, events: EP, inflight: InFlightRegistry) -> Self {
        Self {
            api,
            session,
            events,
            inflight,
            selections: Mutex::new(HashMap::new()),
            statuses: StatusBoard::new(),
        }
    }

    pub fn selection(&self, shift: &Shift) -> TierSelection {
        let mut map = self.selections.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(shift.id().clone())
            .or_insert_with(|| TierSelection::new(shift.current_tier()))
            .clone()
    }

    pub fn status(&self, shift: &ShiftId) -> OpStatus {
        self.statuses.get(shift)
    }

    /// Move the view cursor: history freely, at most one rung ahead of
    /// current. `TierLocked` leaves the cursor where it was.
    pub fn select_tier(&self, shift: &Shift, tier: Tier) -> Result<TierSelection, AppError> {
        let mut map = self.selections.lock().unwrap_or_else(|e| e.into_inner());
        let selection = map
            .entry(shift.id().clone())
            .or_insert_with(|| TierSelection::new(shift.current_tier()));
        selection.select(shift.ladder(), tier)?;
        Ok(selection.clone())
    }

    /// Commit the previewed escalation. At most one in flight per shift;
    /// a concurrent second call is rejected instead of double-submitting.
    /// On success the caller must force a fresh pool and offer fetch.
    pub async fn escalate(&self, shift: &Shift, now: DateTime<Utc>) -> Result<Shift, AppError> {
        let _guard = self
            .inflight
            .begin(OpKey::shift_wide(OpKind::Escalate, shift.id().clone()))?;

        let target = {
            let mut map = self.selections.lock().unwrap_or_else(|e| e.into_inner());
            let selection = map
                .entry(shift.id().clone())
                .or_insert_with(|| TierSelection::new(shift.current_tier()));
            selection.escalation_target(shift.ladder())?
        };

        self.statuses.set(shift.id(), OpStatus::Loading);
        let result =
            with_session_retry(&self.session, || self.api.escalate_shift(shift.id(), target))
                .await;

        match result {
            Ok(updated) => {
                let from = shift.current_tier();
                let to = updated.current_tier();
                {
                    let mut map = self.selections.lock().unwrap_or_else(|e| e.into_inner());
                    if let Some(selection) = map.get_mut(shift.id()) {
                        selection.confirm(to);
                    }
                }
                self.statuses.set(shift.id(), OpStatus::Idle);
                self.events
                    .publish(vec![DomainEvent::ShiftEscalated(ShiftEscalated {
                        shift_id: shift.id().clone(),
                        from_tier: from,
                        to_tier: to,
                        occurred_at: now,
                    })])
                    .await?;
                Ok(updated)
            }
            Err(e) => {
                self.statuses.set(shift.id(), OpStatus::Error);
                Err(e)
            }
        }
    }
}
