use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crewcall_core::ids::{InterestId, OfferId, ShiftId, SlotId, UserId};
use crewcall_core::pool::CandidateIdentity;

/// A Platform-tier interest as the backend hands it over, before pool
/// normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInterest {
    pub id: InterestId,
    pub user_id: UserId,
    pub slot_id: Option<SlotId>,
    pub revealed: bool,
    pub identity: Option<CandidateIdentity>,
    pub updated_at: DateTime<Utc>,
}

/// An internal-tier member row. The status stays a raw string here; the
/// pool normalizes unknown values instead of dropping the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMember {
    pub user_id: UserId,
    pub slot_id: Option<SlotId>,
    pub status: Option<String>,
    pub identity: Option<CandidateIdentity>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSlotTerms {
    pub slot_id: SlotId,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub rate_cents: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOffer {
    pub id: OfferId,
    pub user_id: UserId,
    pub status: Option<String>,
    pub slot_terms: Vec<RawSlotTerms>,
    pub rate_cents: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate rating for a review target, consumed only to enrich a
/// candidate review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingsSummary {
    pub target_id: String,
    pub average: f32,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingEntry {
    pub author: String,
    pub score: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingsPage {
    pub entries: Vec<RatingEntry>,
    pub page: u32,
    pub total: u32,
}

/// Out-of-band hint from the notification channel that slots on a shift
/// may have changed ahead of the next poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotActivity {
    pub shift_id: ShiftId,
    pub slot_ids: Vec<SlotId>,
}
