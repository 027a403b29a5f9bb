use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::ids::{ShiftId, SlotId};
use crate::offer::CounterOffer;
use crate::pool::PoolRecord;
use crate::tier::Tier;

/// The (shift, tier, slot) coordinate a change baseline is tracked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripleKey {
    pub shift: ShiftId,
    pub tier: Tier,
    pub slot: Option<SlotId>,
}

impl TripleKey {
    pub fn new(shift: ShiftId, tier: Tier, slot: Option<SlotId>) -> Self {
        Self { shift, tier, slot }
    }

    /// The durable storage key: `"{shiftId}:{tier}:{slotId}"`, with a
    /// literal `-` where a single-user shift carries no slot.
    pub fn storage_key(&self) -> String {
        match &self.slot {
            Some(slot) => format!("{}:{}:{}", self.shift, self.tier, slot),
            None => format!("{}:{}:-", self.shift, self.tier),
        }
    }
}

impl fmt::Display for TripleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}

/// A content hash of the currently loaded pool records and offers for one
/// triple. Deterministic over identical data; no wall clock, no randomness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeSignature(String);

impl ChangeSignature {
    pub fn compute(records: &[PoolRecord], offers: &[CounterOffer]) -> Self {
        let mut record_keys: Vec<(String, &'static str, i64)> = records
            .iter()
            .map(|r| {
                (
                    r.user_id().to_string(),
                    r.status().as_str(),
                    r.updated_at().timestamp_millis(),
                )
            })
            .collect();
        record_keys.sort();

        let mut offer_keys: Vec<(String, u8, i64)> = offers
            .iter()
            .map(|o| {
                (
                    o.id().to_string(),
                    o.status() as u8,
                    o.updated_at().timestamp_millis(),
                )
            })
            .collect();
        offer_keys.sort();

        let mut hasher = DefaultHasher::new();
        record_keys.hash(&mut hasher);
        offer_keys.hash(&mut hasher);
        Self(format!("{:016x}", hasher.finish()))
    }

    pub fn from_stored(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
