pub mod identity;
pub mod status;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{InterestId, SlotId, UserId};

pub use identity::CandidateIdentity;
pub use status::MemberStatus;

/// Where a pool record came from: a Platform-tier interest or an
/// internal-tier member row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordSource {
    Interest(InterestId),
    Member,
}

/// The unified per-candidate record the engine works with, regardless of
/// tier. One record per distinct user within a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRecord {
    user_id: UserId,
    slot_id: Option<SlotId>,
    source: RecordSource,
    status: MemberStatus,
    revealed: bool,
    identity: Option<CandidateIdentity>,
    updated_at: DateTime<Utc>,
}

impl PoolRecord {
    pub fn interest(
        interest_id: InterestId,
        user_id: UserId,
        slot_id: Option<SlotId>,
        revealed: bool,
        identity: Option<CandidateIdentity>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            slot_id,
            source: RecordSource::Interest(interest_id),
            status: MemberStatus::Interested,
            revealed,
            identity,
            updated_at,
        }
    }

    pub fn member(
        user_id: UserId,
        slot_id: Option<SlotId>,
        status: MemberStatus,
        identity: Option<CandidateIdentity>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            slot_id,
            source: RecordSource::Member,
            status,
            revealed: identity.is_some(),
            identity,
            updated_at,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn slot_id(&self) -> Option<&SlotId> {
        self.slot_id.as_ref()
    }

    pub fn source(&self) -> &RecordSource {
        &self.source
    }

    pub fn status(&self) -> MemberStatus {
        self.status
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn identity(&self) -> Option<&CandidateIdentity> {
        self.identity.as_ref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Stamp a disclosed identity onto this record.
    pub fn stamp_identity(&mut self, identity: CandidateIdentity) {
        self.identity = Some(identity);
        self.revealed = true;
    }

    /// Merge precedence for duplicate collapse: later update wins, then a
    /// record that already carries an identity, then status rank. Total
    /// enough that merging is order-independent.
    fn merge_rank(&self) -> (DateTime<Utc>, bool, u8) {
        (self.updated_at, self.identity.is_some(), self.status.rank())
    }
}

/// Collapse records to one per distinct user id. The data source may hand
/// back duplicates in any order; the merge is idempotent and independent
/// of input ordering. Output is sorted by user id.
pub fn dedupe(records: Vec<PoolRecord>) -> Vec<PoolRecord> {
    let mut by_user: BTreeMap<UserId, PoolRecord> = BTreeMap::new();
    for record in records {
        match by_user.get(&record.user_id) {
            Some(kept) if kept.merge_rank() >= record.merge_rank() => {}
            _ => {
                by_user.insert(record.user_id.clone(), record);
            }
        }
    }
    by_user.into_values().collect()
}

/// Internal-tier records partitioned by member status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolBuckets {
    pub interested: Vec<PoolRecord>,
    pub accepted: Vec<PoolRecord>,
    pub rejected: Vec<PoolRecord>,
    pub no_response: Vec<PoolRecord>,
}

pub fn bucket(records: &[PoolRecord]) -> PoolBuckets {
    let mut buckets = PoolBuckets::default();
    for record in records {
        let target = match record.status() {
            MemberStatus::Interested => &mut buckets.interested,
            MemberStatus::Accepted => &mut buckets.accepted,
            MemberStatus::Rejected => &mut buckets.rejected,
            MemberStatus::NoResponse => &mut buckets.no_response,
        };
        target.push(record.clone());
    }
    buckets
}
