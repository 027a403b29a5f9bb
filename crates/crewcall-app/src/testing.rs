//! Mock port implementations shared by the service tests.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use tokio::sync::Semaphore;

use crewcall_core::events::DomainEvent;
use crewcall_core::ids::{OfferId, ShiftId, SlotId, UserId};
use crewcall_core::pool::CandidateIdentity;
use crewcall_core::shift::{Shift, Slot};
use crewcall_core::tier::{Tier, TierLadder};
use crewcall_ports::error::PortError;
use crewcall_ports::outbound::{
    BaselineStore, EventPublisher, MarketplaceApi, RatingsApi, SessionGate,
};
use crewcall_ports::types::{
    RatingsPage, RatingsSummary, RawInterest, RawMember, RawOffer,
};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
}

pub fn shift_at_tier(tier: Tier, single_user: bool, slot_count: usize) -> Shift {
    let slots = if single_user {
        vec![]
    } else {
        (0..slot_count)
            .map(|i| {
                Slot::new(
                    SlotId::new(),
                    NaiveDate::from_ymd_opt(2025, 1, 10 + i as u32).unwrap(),
                    NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                    NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                )
            })
            .collect()
    };
    Shift::new(
        ShiftId::new(),
        TierLadder::new(Tier::SEQUENCE.to_vec()).unwrap(),
        tier,
        single_user,
        slots,
    )
    .unwrap()
}

pub fn identity_of(name: &str) -> CandidateIdentity {
    CandidateIdentity {
        name: name.into(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: None,
        bio: None,
    }
}

fn slot_part(slot: Option<&SlotId>) -> String {
    slot.map(|s| s.to_string()).unwrap_or_else(|| "-".into())
}

#[derive(Default)]
pub struct ApiState {
    pub shifts: Mutex<Vec<Shift>>,
    pub interests: Mutex<HashMap<String, Vec<RawInterest>>>,
    pub members: Mutex<HashMap<String, Vec<RawMember>>>,
    pub offers: Mutex<HashMap<ShiftId, Vec<RawOffer>>>,
    pub escalate_result: Mutex<Option<Shift>>,
    pub identity: Mutex<Option<CandidateIdentity>>,
    failures: Mutex<Vec<PortError>>,
    pub escalate_calls: AtomicU32,
    pub reveal_calls: AtomicU32,
    pub interest_fetches: AtomicU32,
    pub member_fetches: AtomicU32,
    pub offer_fetches: AtomicU32,
    pub accept_calls: Mutex<Vec<(ShiftId, UserId, Option<SlotId>)>>,
    pub accept_offer_calls: Mutex<Vec<(ShiftId, OfferId, Option<SlotId>)>>,
    pub reject_offer_calls: Mutex<Vec<(ShiftId, OfferId)>>,
    pub delete_calls: Mutex<Vec<ShiftId>>,
    escalate_gate: Mutex<Option<Arc<Semaphore>>>,
    reveal_gate: Mutex<Option<Arc<Semaphore>>>,
    interest_gate: Mutex<Option<Arc<Semaphore>>>,
}

/// Clonable handle over shared mock state, so the same instance can be
/// handed to several services and still be inspected by the test.
#[derive(Clone, Default)]
pub struct MockApi(Arc<ApiState>);

impl Deref for MockApi {
    type Target = ApiState;

    fn deref(&self) -> &ApiState {
        &self.0
    }
}

impl MockApi {
    pub fn fail_next(&self, error: PortError) {
        self.failures.lock().unwrap().push(error);
    }

    fn take_failure(&self) -> Option<PortError> {
        let mut failures = self.failures.lock().unwrap();
        if failures.is_empty() {
            None
        } else {
            Some(failures.remove(0))
        }
    }

    /// Block escalate calls until a permit is added, to overlap requests.
    pub fn hold_escalations(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.escalate_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn hold_reveals(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.reveal_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn hold_interest_fetches(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.interest_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn interest_key(shift: &ShiftId, slot: Option<&SlotId>) -> String {
        format!("{}:{}", shift, slot_part(slot))
    }

    pub fn member_key(shift: &ShiftId, tier: Tier, slot: Option<&SlotId>) -> String {
        format!("{}:{}:{}", shift, tier, slot_part(slot))
    }

    pub fn put_interests(&self, shift: &ShiftId, slot: Option<&SlotId>, list: Vec<RawInterest>) {
        self.interests
            .lock()
            .unwrap()
            .insert(Self::interest_key(shift, slot), list);
    }

    pub fn put_members(
        &self,
        shift: &ShiftId,
        tier: Tier,
        slot: Option<&SlotId>,
        list: Vec<RawMember>,
    ) {
        self.members
            .lock()
            .unwrap()
            .insert(Self::member_key(shift, tier, slot), list);
    }

    pub fn put_offers(&self, shift: &ShiftId, list: Vec<RawOffer>) {
        self.offers.lock().unwrap().insert(shift.clone(), list);
    }

    pub fn set_identity(&self, identity: CandidateIdentity) {
        *self.identity.lock().unwrap() = Some(identity);
    }
}

#[async_trait]
impl MarketplaceApi for MockApi {
    async fn fetch_active_shifts(&self) -> Result<Vec<Shift>, PortError> {
        Ok(self.shifts.lock().unwrap().clone())
    }

    async fn fetch_shift_interests(
        &self,
        shift_id: &ShiftId,
        slot_id: Option<&SlotId>,
    ) -> Result<Vec<RawInterest>, PortError> {
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        self.interest_fetches.fetch_add(1, Ordering::SeqCst);
        let gate = self.interest_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.map_err(|_| PortError::Timeout)?;
        }
        Ok(self
            .interests
            .lock()
            .unwrap()
            .get(&Self::interest_key(shift_id, slot_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_member_status(
        &self,
        shift_id: &ShiftId,
        tier: Tier,
        slot_id: Option<&SlotId>,
    ) -> Result<Vec<RawMember>, PortError> {
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        self.member_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .members
            .lock()
            .unwrap()
            .get(&Self::member_key(shift_id, tier, slot_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_counter_offers(&self, shift_id: &ShiftId) -> Result<Vec<RawOffer>, PortError> {
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        self.offer_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .offers
            .lock()
            .unwrap()
            .get(shift_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn escalate_shift(&self, _shift_id: &ShiftId, _target: Tier) -> Result<Shift, PortError> {
        self.escalate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        let gate = self.escalate_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.map_err(|_| PortError::Timeout)?;
        }
        Ok(self
            .escalate_result
            .lock()
            .unwrap()
            .clone()
            .expect("escalate_result not set"))
    }

    async fn reveal_interest(
        &self,
        _shift_id: &ShiftId,
        _user_id: &UserId,
        _slot_id: Option<&SlotId>,
    ) -> Result<CandidateIdentity, PortError> {
        self.reveal_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        let gate = self.reveal_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.map_err(|_| PortError::Timeout)?;
        }
        Ok(self
            .identity
            .lock()
            .unwrap()
            .clone()
            .expect("identity not set"))
    }

    async fn accept_candidate(
        &self,
        shift_id: &ShiftId,
        user_id: &UserId,
        slot_id: Option<&SlotId>,
    ) -> Result<(), PortError> {
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        self.accept_calls.lock().unwrap().push((
            shift_id.clone(),
            user_id.clone(),
            slot_id.cloned(),
        ));
        Ok(())
    }

    async fn accept_offer(
        &self,
        shift_id: &ShiftId,
        offer_id: &OfferId,
        slot_id: Option<&SlotId>,
    ) -> Result<(), PortError> {
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        self.accept_offer_calls.lock().unwrap().push((
            shift_id.clone(),
            offer_id.clone(),
            slot_id.cloned(),
        ));
        Ok(())
    }

    async fn reject_offer(&self, shift_id: &ShiftId, offer_id: &OfferId) -> Result<(), PortError> {
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        self.reject_offer_calls
            .lock()
            .unwrap()
            .push((shift_id.clone(), offer_id.clone()));
        Ok(())
    }

    async fn delete_shift(&self, shift_id: &ShiftId) -> Result<(), PortError> {
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        self.delete_calls.lock().unwrap().push(shift_id.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockSession {
    pub refreshes: Arc<AtomicU32>,
    pub refresh_fails: bool,
}

#[async_trait]
impl SessionGate for MockSession {
    async fn refresh(&self) -> Result<(), PortError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if self.refresh_fails {
            Err(PortError::Unauthorized)
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Default)]
pub struct MockEvents(pub Arc<Mutex<Vec<DomainEvent>>>);

impl MockEvents {
    pub fn types(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().iter().map(|e| e.event_type()).collect()
    }
}

#[async_trait]
impl EventPublisher for MockEvents {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), PortError> {
        self.0.lock().unwrap().extend(events);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockStore(pub Arc<Mutex<HashMap<(String, String), String>>>);

#[async_trait]
impl BaselineStore for MockStore {
    async fn get(&self, identity: &str, key: &str) -> Result<Option<String>, PortError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .get(&(identity.to_string(), key.to_string()))
            .cloned())
    }

    async fn put(&self, identity: &str, key: &str, signature: &str) -> Result<(), PortError> {
        self.0.lock().unwrap().insert(
            (identity.to_string(), key.to_string()),
            signature.to_string(),
        );
        Ok(())
    }

    async fn all_for(&self, identity: &str) -> Result<HashMap<String, String>, PortError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|((owner, _), _)| owner == identity)
            .map(|((_, key), sig)| (key.clone(), sig.clone()))
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MockRatings {
    pub summary: Arc<Mutex<Option<RatingsSummary>>>,
}

#[async_trait]
impl RatingsApi for MockRatings {
    async fn fetch_summary(
        &self,
        _target_type: &str,
        target_id: &str,
    ) -> Result<RatingsSummary, PortError> {
        Ok(self
            .summary
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(RatingsSummary {
                target_id: target_id.to_string(),
                average: 0.0,
                count: 0,
            }))
    }

    async fn fetch_page(
        &self,
        _target_type: &str,
        _target_id: &str,
        page: u32,
    ) -> Result<RatingsPage, PortError> {
        Ok(RatingsPage {
            entries: vec![],
            page,
            total: 0,
        })
    }
}
