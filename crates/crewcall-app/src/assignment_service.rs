use chrono::{DateTime, Utc};

use crewcall_core::error::DomainError;
use crewcall_core::events::{
    CandidateAccepted, DomainEvent, OfferAccepted, OfferRejected, ShiftDeleted,
};
use crewcall_core::ids::{ShiftId, SlotId, UserId};
use crewcall_core::offer::{resolve_slot, CounterOffer, OfferStatus};
use crewcall_core::pool::{MemberStatus, PoolRecord};
use crewcall_core::shift::Shift;
use crewcall_ports::outbound::{EventPublisher, MarketplaceApi, SessionGate};

use crate::error::AppError;
use crate::inflight::{InFlightRegistry, OpKey, OpKind};
use crate::session::with_session_retry;
use crate::status::{OpStatus, StatusBoard};

/// Commits accept/reject decisions against a shift, slot, and candidate.
/// Accepting never patches competing candidates locally; callers re-fetch
/// the pool to observe whatever the backend decided about the rest.
pub struct AssignmentService<M, S, EP>
where
    M: MarketplaceApi,
    S: SessionGate,
    EP: EventPublisher,
{
    api: M,
    session: S,
    events: EP,
    inflight: InFlightRegistry,
    statuses: StatusBoard,
}

impl<M, S, EP> AssignmentService<M, S, EP>
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
            statuses: StatusBoard::new(),
        }
    }

    pub fn status(&self, shift: &ShiftId) -> OpStatus {
        self.statuses.get(shift)
    }

    /// Accept a candidate who currently holds a live interest or an
    /// `interested` member status. The caller passes the records it has
    /// loaded for the slot in view.
    pub async fn accept(
        &self,
        shift: &Shift,
        user: &UserId,
        slot: Option<&SlotId>,
        records: &[PoolRecord],
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        shift.check_slot_scope(slot)?;
        let eligible = records
            .iter()
            .any(|r| r.user_id() == user && r.status() == MemberStatus::Interested);
        if !eligible {
            return Err(DomainError::CandidateNotEligible.into());
        }

        let _guard = self.inflight.begin(OpKey::per_user(
            OpKind::Accept,
            shift.id().clone(),
            user.clone(),
        ))?;
        self.statuses.set(shift.id(), OpStatus::Loading);

        let result = with_session_retry(&self.session, || {
            self.api.accept_candidate(shift.id(), user, slot)
        })
        .await;

        match result {
            Ok(()) => {
                self.statuses.set(shift.id(), OpStatus::Idle);
                self.events
                    .publish(vec![DomainEvent::CandidateAccepted(CandidateAccepted {
                        shift_id: shift.id().clone(),
                        user_id: user.clone(),
                        slot_id: slot.cloned(),
                        occurred_at: now,
                    })])
                    .await?;
                Ok(())
            }
            Err(e) => {
                self.statuses.set(shift.id(), OpStatus::Error);
                Err(e)
            }
        }
    }

    /// Accept a counter-offer. The slot handed to the backend is always
    /// the reconciler's resolution, never the raw caller slot.
    pub async fn accept_offer(
        &self,
        shift: &Shift,
        offer: &CounterOffer,
        caller_slot: Option<&SlotId>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if offer.status() != OfferStatus::Pending {
            return Err(DomainError::CandidateNotEligible.into());
        }
        let slot = resolve_slot(offer, caller_slot, shift);
        if !shift.single_user_only() && slot.is_none() {
            return Err(DomainError::UnresolvedSlot.into());
        }

        let _guard = self.inflight.begin(OpKey::per_user(
            OpKind::AcceptOffer,
            shift.id().clone(),
            offer.user_id().clone(),
        ))?;
        self.statuses.set(shift.id(), OpStatus::Loading);

        let result = with_session_retry(&self.session, || {
            self.api.accept_offer(shift.id(), offer.id(), slot.as_ref())
        })
        .await;

        match result {
            Ok(()) => {
                self.statuses.set(shift.id(), OpStatus::Idle);
                self.events
                    .publish(vec![DomainEvent::OfferAccepted(OfferAccepted {
                        shift_id: shift.id().clone(),
                        offer_id: offer.id().clone(),
                        slot_id: slot,
                        occurred_at: now,
                    })])
                    .await?;
                Ok(())
            }
            Err(e) => {
                self.statuses.set(shift.id(), OpStatus::Error);
                Err(e)
            }
        }
    }

    /// Reject a counter-offer. Mutates the offer's status only; no slot
    /// resolution is involved.
    pub async fn reject_offer(
        &self,
        shift: &Shift,
        offer: &CounterOffer,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        with_session_retry(&self.session, || {
            self.api.reject_offer(shift.id(), offer.id())
        })
        .await?;
        self.events
            .publish(vec![DomainEvent::OfferRejected(OfferRejected {
                shift_id: shift.id().clone(),
                offer_id: offer.id().clone(),
                occurred_at: now,
            })])
            .await?;
        Ok(())
    }

    /// Remove the shift entirely. Irreversible; the confirmation dialog is
    /// the presentation layer's duty before calling in here.
    pub async fn delete_shift(&self, shift_id: &ShiftId, now: DateTime<Utc>) -> Result<(), AppError> {
        let _guard = self
            .inflight
            .begin(OpKey::shift_wide(OpKind::Delete, shift_id.clone()))?;
        self.statuses.set(shift_id, OpStatus::Loading);

        let result =
            with_session_retry(&self.session, || self.api.delete_shift(shift_id)).await;

        match result {
            Ok(()) => {
                self.statuses.set(shift_id, OpStatus::Idle);
                self.events
                    .publish(vec![DomainEvent::ShiftDeleted(ShiftDeleted {
                        shift_id: shift_id.clone(),
                        occurred_at: now,
                    })])
                    .await?;
                Ok(())
            }
            Err(e) => {
                self.statuses.set(shift_id, OpStatus::Error);
                Err(e)
            }
        }
    }
}
