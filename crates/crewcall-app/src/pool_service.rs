use crewcall_core::ids::SlotId;
use crewcall_core::offer::{CounterOffer, OfferStatus, SlotTerms};
use crewcall_core::pool::{bucket, dedupe, MemberStatus, PoolBuckets, PoolRecord};
use crewcall_core::shift::Shift;
use crewcall_core::tier::Tier;
use crewcall_ports::outbound::MarketplaceApi;
use crewcall_ports::types::{RawMember, RawOffer};

use crate::error::AppError;

/// One slot-scoped load of the candidate pool: deduplicated records, plus
/// status buckets at internal tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolView {
    pub tier: Tier,
    pub slot: Option<SlotId>,
    pub records: Vec<PoolRecord>,
    pub buckets: Option<PoolBuckets>,
}

/// Loads and normalizes interest/member records per shift, tier, and slot.
pub struct PoolService<M>
where
    M: MarketplaceApi,
{
    api: M,
}

impl<M> PoolService<M>
where
    M: MarketplaceApi,
{
    pub fn new(api: M) -> Self {
        Self { api }
    }

    /// Fetch the pool for one (shift, tier, slot) triple. Platform-tier
    /// records are interests; every other tier reads member rows. Slot
    /// scoping is enforced before anything leaves the process.
    pub async fn fetch(
        &self,
        shift: &Shift,
        tier: Tier,
        slot: Option<&SlotId>,
    ) -> Result<PoolView, AppError> {
        shift.check_slot_scope(slot)?;

        let records = if tier == Tier::Platform {
            let raw = self.api.fetch_shift_interests(shift.id(), slot).await?;
            raw.into_iter()
                .map(|i| {
                    PoolRecord::interest(
                        i.id,
                        i.user_id,
                        i.slot_id,
                        i.revealed,
                        i.identity,
                        i.updated_at,
                    )
                })
                .collect()
        } else {
            let raw = self.api.fetch_member_status(shift.id(), tier, slot).await?;
            raw.into_iter().map(normalize_member).collect()
        };

        let records = dedupe(records);
        let buckets = (tier != Tier::Platform).then(|| bucket(&records));

        Ok(PoolView {
            tier,
            slot: slot.cloned(),
            records,
            buckets,
        })
    }

    /// Fetch and normalize the shift's counter-offers.
    pub async fn fetch_offers(&self, shift: &Shift) -> Result<Vec<CounterOffer>, AppError> {
        let raw = self.api.fetch_counter_offers(shift.id()).await?;
        Ok(raw.into_iter().map(normalize_offer).collect())
    }
}

fn normalize_member(raw: RawMember) -> PoolRecord {
    let status = MemberStatus::from_raw(raw.status.as_deref().unwrap_or(""));
    PoolRecord::member(raw.user_id, raw.slot_id, status, raw.identity, raw.updated_at)
}

fn normalize_offer(raw: RawOffer) -> CounterOffer {
    let status = OfferStatus::from_raw(raw.status.as_deref().unwrap_or(""));
    let terms = raw
        .slot_terms
        .into_iter()
        .map(|t| SlotTerms {
            slot_id: t.slot_id,
            start: t.start,
            end: t.end,
            rate_cents: t.rate_cents,
        })
        .collect();
    CounterOffer::new(raw.id, raw.user_id, status, terms, raw.rate_cents, raw.updated_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{now, shift_at_tier, MockApi};
    use crewcall_core::error::DomainError;
    use crewcall_core::ids::{InterestId, UserId};
    use crewcall_ports::types::RawInterest;

    fn raw_interest(user: &UserId, slot: Option<&SlotId>) -> RawInterest {
        RawInterest {
            id: InterestId::new(),
            user_id: user.clone(),
            slot_id: slot.cloned(),
            revealed: false,
            identity: None,
            updated_at: now(),
        }
    }

    fn raw_member(user: &UserId, slot: Option<&SlotId>, status: Option<&str>) -> RawMember {
        RawMember {
            user_id: user.clone(),
            slot_id: slot.cloned(),
            status: status.map(String::from),
            identity: None,
            updated_at: now(),
        }
    }

    #[tokio::test]
    async fn multi_slot_fetch_without_slot_is_rejected() {
        let shift = shift_at_tier(Tier::Platform, false, 2);
        let service = PoolService::new(MockApi::default());
        let result = service.fetch(&shift, Tier::Platform, None).await;
        assert_eq!(result, Err(AppError::Domain(DomainError::SlotRequired)));
    }

    #[tokio::test]
    async fn single_user_fetch_with_slot_is_rejected() {
        let shift = shift_at_tier(Tier::Platform, true, 0);
        let service = PoolService::new(MockApi::default());
        let stray = SlotId::new();
        let result = service.fetch(&shift, Tier::Platform, Some(&stray)).await;
        assert_eq!(result, Err(AppError::Domain(DomainError::SlotNotAllowed)));
    }

    #[tokio::test]
    async fn interests_are_scoped_to_their_slot() {
        // Candidate expressed interest on the first slot only; the sibling
        // slot's pool comes back empty.
        let shift = shift_at_tier(Tier::Platform, false, 2);
        let s10 = shift.slots()[0].id().clone();
        let s11 = shift.slots()[1].id().clone();
        let user = UserId::new();
        let api = MockApi::default();
        api.put_interests(shift.id(), Some(&s10), vec![raw_interest(&user, Some(&s10))]);
        api.put_interests(shift.id(), Some(&s11), vec![]);

        let service = PoolService::new(api);
        let first = service.fetch(&shift, Tier::Platform, Some(&s10)).await.unwrap();
        assert_eq!(first.records.len(), 1);
        assert_eq!(first.records[0].user_id(), &user);
        assert!(!first.records[0].revealed());

        let second = service.fetch(&shift, Tier::Platform, Some(&s11)).await.unwrap();
        assert!(second.records.is_empty());
    }

    #[tokio::test]
    async fn duplicate_source_rows_collapse_to_one_record() {
        let shift = shift_at_tier(Tier::Platform, false, 1);
        let slot = shift.slots()[0].id().clone();
        let user = UserId::new();
        let api = MockApi::default();
        api.put_interests(
            shift.id(),
            Some(&slot),
            vec![
                raw_interest(&user, Some(&slot)),
                raw_interest(&user, Some(&slot)),
                raw_interest(&user, Some(&slot)),
            ],
        );

        let service = PoolService::new(api);
        let view = service.fetch(&shift, Tier::Platform, Some(&slot)).await.unwrap();
        assert_eq!(view.records.len(), 1);
        assert!(view.buckets.is_none());
    }

    #[tokio::test]
    async fn member_tier_buckets_by_status_with_defensive_default() {
        let shift = shift_at_tier(Tier::Favorites, false, 1);
        let slot = shift.slots()[0].id().clone();
        let api = MockApi::default();
        api.put_members(
            shift.id(),
            Tier::Favorites,
            Some(&slot),
            vec![
                raw_member(&UserId::new(), Some(&slot), Some("interested")),
                raw_member(&UserId::new(), Some(&slot), Some("accepted")),
                raw_member(&UserId::new(), Some(&slot), Some("something-new")),
                raw_member(&UserId::new(), Some(&slot), None),
            ],
        );

        let service = PoolService::new(api);
        let view = service.fetch(&shift, Tier::Favorites, Some(&slot)).await.unwrap();
        let buckets = view.buckets.unwrap();
        assert_eq!(buckets.interested.len(), 1);
        assert_eq!(buckets.accepted.len(), 1);
        // Unknown and missing statuses land in no_response, never dropped.
        assert_eq!(buckets.no_response.len(), 2);
        assert_eq!(view.records.len(), 4);
    }
}
