use std::collections::HashMap;

use async_trait::async_trait;

use crewcall_core::events::DomainEvent;
use crewcall_core::ids::{OfferId, ShiftId, SlotId, UserId};
use crewcall_core::pool::CandidateIdentity;
use crewcall_core::shift::Shift;
use crewcall_core::tier::Tier;

use crate::error::PortError;
use crate::types::{RatingsPage, RatingsSummary, RawInterest, RawMember, RawOffer};

/// The backend marketplace API. Wire format and authoritative business
/// rules live on the other side; all calls are timeboxed by the transport.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    async fn fetch_active_shifts(&self) -> Result<Vec<Shift>, PortError>;

    async fn fetch_shift_interests(
        &self,
        shift_id: &ShiftId,
        slot_id: Option<&SlotId>,
    ) -> Result<Vec<RawInterest>, PortError>;

    async fn fetch_member_status(
        &self,
        shift_id: &ShiftId,
        tier: Tier,
        slot_id: Option<&SlotId>,
    ) -> Result<Vec<RawMember>, PortError>;

    async fn fetch_counter_offers(&self, shift_id: &ShiftId) -> Result<Vec<RawOffer>, PortError>;

    async fn escalate_shift(&self, shift_id: &ShiftId, target: Tier) -> Result<Shift, PortError>;

    async fn reveal_interest(
        &self,
        shift_id: &ShiftId,
        user_id: &UserId,
        slot_id: Option<&SlotId>,
    ) -> Result<CandidateIdentity, PortError>;

    async fn accept_candidate(
        &self,
        shift_id: &ShiftId,
        user_id: &UserId,
        slot_id: Option<&SlotId>,
    ) -> Result<(), PortError>;

    async fn accept_offer(
        &self,
        shift_id: &ShiftId,
        offer_id: &OfferId,
        slot_id: Option<&SlotId>,
    ) -> Result<(), PortError>;

    async fn reject_offer(&self, shift_id: &ShiftId, offer_id: &OfferId) -> Result<(), PortError>;

    async fn delete_shift(&self, shift_id: &ShiftId) -> Result<(), PortError>;
}

/// Ratings lookups used to enrich a candidate review. Not owned here.
#[async_trait]
pub trait RatingsApi: Send + Sync {
    async fn fetch_summary(
        &self,
        target_type: &str,
        target_id: &str,
    ) -> Result<RatingsSummary, PortError>;

    async fn fetch_page(
        &self,
        target_type: &str,
        target_id: &str,
        page: u32,
    ) -> Result<RatingsPage, PortError>;
}

/// Durable per-identity map of triple key -> change signature. Survives
/// process restarts; the storage technology is the adapter's business.
#[async_trait]
pub trait BaselineStore: Send + Sync {
    async fn get(&self, identity: &str, key: &str) -> Result<Option<String>, PortError>;
    async fn put(&self, identity: &str, key: &str, signature: &str) -> Result<(), PortError>;
    async fn all_for(&self, identity: &str) -> Result<HashMap<String, String>, PortError>;
}

/// One-shot session refresh for expired-auth recovery.
#[async_trait]
pub trait SessionGate: Send + Sync {
    async fn refresh(&self) -> Result<(), PortError>;
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), PortError>;
}
