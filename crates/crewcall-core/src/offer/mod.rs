use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{OfferId, SlotId, UserId};
use crate::pool::{CandidateIdentity, PoolRecord};
use crate::shift::Shift;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    /// Normalize a raw backend status; anything unrecognized stays pending.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "accepted" => OfferStatus::Accepted,
            "rejected" => OfferStatus::Rejected,
            _ => OfferStatus::Pending,
        }
    }
}

/// A candidate's proposed variation of one slot's terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTerms {
    pub slot_id: SlotId,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub rate_cents: Option<i64>,
}

/// A candidate-proposed variation of shift terms, tied to exactly one
/// candidate user. An empty slot breakdown means the offer is shift-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterOffer {
    id: OfferId,
    user_id: UserId,
    status: OfferStatus,
    slot_terms: Vec<SlotTerms>,
    rate_cents: Option<i64>,
    identity: Option<CandidateIdentity>,
    updated_at: DateTime<Utc>,
}

impl CounterOffer {
    pub fn new(
        id: OfferId,
        user_id: UserId,
        status: OfferStatus,
        slot_terms: Vec<SlotTerms>,
        rate_cents: Option<i64>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            status,
            slot_terms,
            rate_cents,
            identity: None,
            updated_at,
        }
    }

    pub fn id(&self) -> &OfferId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn status(&self) -> OfferStatus {
        self.status
    }

    pub fn slot_terms(&self) -> &[SlotTerms] {
        &self.slot_terms
    }

    pub fn rate_cents(&self) -> Option<i64> {
        self.rate_cents
    }

    pub fn identity(&self) -> Option<&CandidateIdentity> {
        self.identity.as_ref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_status(&mut self, status: OfferStatus) {
        self.status = status;
    }

    pub fn stamp_identity(&mut self, identity: CandidateIdentity) {
        self.identity = Some(identity);
    }

    pub fn covers_slot(&self, slot: &SlotId) -> bool {
        self.slot_terms.iter().any(|t| &t.slot_id == slot)
    }

    /// An offer matches a record iff the user ids agree and the offer is
    /// relevant to the slot in view: no slot in view, or no per-slot
    /// breakdown on the offer, or the breakdown includes that slot.
    pub fn matches_record(&self, record: &PoolRecord, slot: Option<&SlotId>) -> bool {
        if &self.user_id != record.user_id() {
            return false;
        }
        match slot {
            None => true,
            Some(slot) => self.slot_terms.is_empty() || self.covers_slot(slot),
        }
    }

    pub fn match_record<'a>(
        &self,
        records: &'a [PoolRecord],
        slot: Option<&SlotId>,
    ) -> Option<&'a PoolRecord> {
        records.iter().find(|r| self.matches_record(r, slot))
    }

    fn is_relevant_to(&self, slot: Option<&SlotId>) -> bool {
        match slot {
            None => true,
            Some(slot) => self.slot_terms.is_empty() || self.covers_slot(slot),
        }
    }
}

/// Resolve which slot an offer action applies to. The fallback chain is
/// used verbatim for display and for every accept call; committing against
/// any other slot silently assigns the wrong time block.
///
/// Order: caller's slot when the offer covers it, else the offer's first
/// slot, else the caller's slot as given, else the shift's first slot.
/// Single-user shifts resolve to no slot at all.
pub fn resolve_slot(
    offer: &CounterOffer,
    caller_slot: Option<&SlotId>,
    shift: &Shift,
) -> Option<SlotId> {
    if shift.single_user_only() {
        return None;
    }
    if let Some(slot) = caller_slot {
        if offer.covers_slot(slot) {
            return Some(slot.clone());
        }
    }
    if let Some(terms) = offer.slot_terms().first() {
        return Some(terms.slot_id.clone());
    }
    if let Some(slot) = caller_slot {
        return Some(slot.clone());
    }
    shift.first_slot().cloned()
}

/// A counter-offer surfaced for review, with the pool record it matched.
/// A missing record is a reconciliation ambiguity: the review proceeds on
/// the offer's own data alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounteredCandidate {
    pub offer: CounterOffer,
    pub record: Option<PoolRecord>,
}

impl CounteredCandidate {
    pub fn is_ambiguous(&self) -> bool {
        self.record.is_none()
    }
}

/// The Platform-tier view of one slot's worker pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformPartition {
    pub plain: Vec<PoolRecord>,
    pub countered: Vec<CounteredCandidate>,
}

/// Platform-tier exclusivity: an interest whose user has a matching
/// counter-offer leaves the plain list and is surfaced only alongside the
/// offer. Offers irrelevant to the slot in view are skipped.
pub fn partition_platform(
    records: Vec<PoolRecord>,
    offers: &[CounterOffer],
    slot: Option<&SlotId>,
) -> PlatformPartition {
    let mut partition = PlatformPartition::default();

    'records: for record in records {
        for offer in offers {
            if offer.matches_record(&record, slot) {
                partition.countered.push(CounteredCandidate {
                    offer: offer.clone(),
                    record: Some(record),
                });
                continue 'records;
            }
        }
        partition.plain.push(record);
    }

    for offer in offers {
        if !offer.is_relevant_to(slot) {
            continue;
        }
        let already = partition
            .countered
            .iter()
            .any(|c| c.offer.id() == offer.id());
        if !already {
            partition.countered.push(CounteredCandidate {
                offer: offer.clone(),
                record: None,
            });
        }
    }

    partition
}
