use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::{OfferId, ShiftId, SlotId, UserId};
use crate::tier::Tier;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DomainEvent {
    ShiftEscalated(ShiftEscalated),
    CandidateRevealed(CandidateRevealed),
    CandidateAccepted(CandidateAccepted),
    OfferAccepted(OfferAccepted),
    OfferRejected(OfferRejected),
    ShiftDeleted(ShiftDeleted),
    SlotMarkedSeen(SlotMarkedSeen),
}

impl DomainEvent {
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::ShiftEscalated(e) => e.occurred_at,
            Self::CandidateRevealed(e) => e.occurred_at,
            Self::CandidateAccepted(e) => e.occurred_at,
            Self::OfferAccepted(e) => e.occurred_at,
            Self::OfferRejected(e) => e.occurred_at,
            Self::ShiftDeleted(e) => e.occurred_at,
            Self::SlotMarkedSeen(e) => e.occurred_at,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ShiftEscalated(_) => "shift.escalated",
            Self::CandidateRevealed(_) => "candidate.revealed",
            Self::CandidateAccepted(_) => "candidate.accepted",
            Self::OfferAccepted(_) => "offer.accepted",
            Self::OfferRejected(_) => "offer.rejected",
            Self::ShiftDeleted(_) => "shift.deleted",
            Self::SlotMarkedSeen(_) => "slot.marked_seen",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftEscalated {
    pub shift_id: ShiftId,
    pub from_tier: Tier,
    pub to_tier: Tier,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRevealed {
    pub shift_id: ShiftId,
    pub user_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateAccepted {
    pub shift_id: ShiftId,
    pub user_id: UserId,
    pub slot_id: Option<SlotId>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferAccepted {
    pub shift_id: ShiftId,
    pub offer_id: OfferId,
    pub slot_id: Option<SlotId>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferRejected {
    pub shift_id: ShiftId,
    pub offer_id: OfferId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftDeleted {
    pub shift_id: ShiftId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotMarkedSeen {
    pub shift_id: ShiftId,
    pub tier: Tier,
    pub slot_id: Option<SlotId>,
    pub occurred_at: DateTime<Utc>,
}
