use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crewcall_core::ids::{OfferId, ShiftId, SlotId, UserId};
use crewcall_core::offer::{CounterOffer, CounteredCandidate, PlatformPartition};
use crewcall_core::pool::{CandidateIdentity, PoolBuckets, PoolRecord};
use crewcall_core::reveal::apply_identity;
use crewcall_core::shift::Shift;
use crewcall_core::signature::TripleKey;
use crewcall_core::tier::Tier;
use crewcall_ports::outbound::{
    BaselineStore, EventPublisher, MarketplaceApi, RatingsApi, SessionGate,
};
use crewcall_ports::types::{RatingsSummary, SlotActivity};

use crate::assignment_service::AssignmentService;
use crate::change_tracker::ChangeTracker;
use crate::error::AppError;
use crate::escalation_service::EscalationService;
use crate::inflight::InFlightRegistry;
use crate::pool_service::PoolService;
use crate::reconciler::overlay_offers;
use crate::reveal_service::RevealGate;

/// What the presentation layer renders for one shift after any operation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub shift_id: ShiftId,
    pub current_tier: Option<Tier>,
    pub selected_tier: Option<Tier>,
    pub selected_slot: Option<SlotId>,
    pub records: Vec<PoolRecord>,
    pub buckets: Option<PoolBuckets>,
    pub countered: Vec<CounteredCandidate>,
    pub dirty: bool,
    pub error: Option<String>,
}

/// A candidate review enriched with whatever is locally known plus a
/// ratings lookup. Ratings failures degrade to None rather than blocking
/// the review.
#[derive(Debug, Clone)]
pub struct CandidateReview {
    pub identity: Option<CandidateIdentity>,
    pub record: Option<PoolRecord>,
    pub offer: Option<CounterOffer>,
    pub ratings: Option<RatingsSummary>,
}

struct ShiftView {
    shift: Shift,
    selected_slot: Option<SlotId>,
    records: Vec<PoolRecord>,
    buckets: Option<PoolBuckets>,
    partition: Option<PlatformPartition>,
    offers: Vec<CounterOffer>,
}

/// The engine's face toward the presentation layer: select-tier, escalate,
/// select-slot, reveal, review, accept, reject, mark-seen. Every call
/// lands back in a state snapshot with an optional user-facing error.
///
/// After any successful mutation except reveal the affected shift is
/// re-fetched rather than patched; reveal patches in place because the
/// disclosure response itself is the authoritative data.
pub struct Console<M, R, B, S, EP>
where
    M: MarketplaceApi + Clone,
    R: RatingsApi,
    B: BaselineStore,
    S: SessionGate + Clone,
    EP: EventPublisher + Clone,
{
    pool: PoolService<M>,
    escalation: EscalationService<M, S, EP>,
    reveal: RevealGate<M, S, EP>,
    assignment: AssignmentService<M, S, EP>,
    tracker: ChangeTracker<B, EP>,
    ratings: R,
    views: Mutex<HashMap<ShiftId, ShiftView>>,
}

impl<M, R, B, S, EP> Console<M, R, B, S, EP>
where
    M: MarketplaceApi + Clone,
    R: RatingsApi,
    B: BaselineStore,
    S: SessionGate + Clone,
    EP: EventPublisher + Clone,
{
    pub fn new(api: M, ratings: R, store: B, session: S, events: EP, viewer: &str) -> Self {
        let inflight = InFlightRegistry::new();
        Self {
            pool: PoolService::new(api.clone()),
            escalation: EscalationService::new(
                api.clone(),
                session.clone(),
                events.clone(),
                inflight.clone(),
            ),
            reveal: RevealGate::new(api.clone(), session.clone(), events.clone()),
            assignment: AssignmentService::new(api, session, events.clone(), inflight),
            tracker: ChangeTracker::new(store, events, viewer),
            ratings,
            views: Mutex::new(HashMap::new()),
        }
    }

    /// Expand a shift's detail view: the first slot (if any) is focused
    /// and its pool loaded.
    pub async fn open_shift(&self, shift: Shift) -> Snapshot {
        let shift_id = shift.id().clone();
        let selected_slot = shift.first_slot().cloned();
        {
            let mut views = self.views.lock().unwrap_or_else(|e| e.into_inner());
            views.insert(
                shift_id.clone(),
                ShiftView {
                    shift,
                    selected_slot,
                    records: vec![],
                    buckets: None,
                    partition: None,
                    offers: vec![],
                },
            );
        }
        let result = self.reload(&shift_id).await;
        self.snapshot(&shift_id, result.err())
    }

    /// Collapse a shift's detail view. Any fetch still in flight for it is
    /// silently discarded on arrival.
    pub fn collapse_shift(&self, shift_id: &ShiftId) {
        self.views
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(shift_id);
    }

    pub async fn select_tier(&self, shift_id: &ShiftId, tier: Tier) -> Snapshot {
        let result = async {
            let shift = self.shift(shift_id)?;
            self.escalation.select_tier(&shift, tier)?;
            self.reload(shift_id).await
        }
        .await;
        self.snapshot(shift_id, result.err())
    }

    pub async fn escalate(&self, shift_id: &ShiftId, now: DateTime<Utc>) -> Snapshot {
        let result = async {
            let shift = self.shift(shift_id)?;
            let updated = self.escalation.escalate(&shift, now).await?;
            {
                let mut views = self.views.lock().unwrap_or_else(|e| e.into_inner());
                if let Some(view) = views.get_mut(shift_id) {
                    view.shift = updated;
                }
            }
            self.reload(shift_id).await
        }
        .await;
        self.snapshot(shift_id, result.err())
    }

    pub async fn select_slot(&self, shift_id: &ShiftId, slot: &SlotId) -> Snapshot {
        let result = async {
            {
                let mut views = self.views.lock().unwrap_or_else(|e| e.into_inner());
                let view = views.get_mut(shift_id).ok_or(AppError::ShiftNotLoaded)?;
                view.shift.check_slot_scope(Some(slot))?;
                view.selected_slot = Some(slot.clone());
            }
            self.reload(shift_id).await
        }
        .await;
        self.snapshot(shift_id, result.err())
    }

    /// Disclose a candidate's identity and patch it into every local
    /// representation. No re-fetch: the disclosure response is the
    /// authoritative new data.
    pub async fn reveal_candidate(
        &self,
        shift_id: &ShiftId,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Snapshot {
        let result = async {
            let (shift, slot) = {
                let views = self.views.lock().unwrap_or_else(|e| e.into_inner());
                let view = views.get(shift_id).ok_or(AppError::ShiftNotLoaded)?;
                (view.shift.clone(), view.selected_slot.clone())
            };
            let identity = self.reveal.reveal(&shift, user, slot.as_ref(), now).await?;

            let selected = self.escalation.selection(&shift).selected();
            let mut views = self.views.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(view) = views.get_mut(shift_id) {
                apply_identity(user, &identity, &mut view.records, &mut view.offers);
                if selected == Tier::Platform {
                    view.partition = Some(overlay_offers(
                        view.records.clone(),
                        &view.offers,
                        view.selected_slot.as_ref(),
                    ));
                }
            }
            Ok(())
        }
        .await;
        self.snapshot(shift_id, result.err())
    }

    /// Everything locally known about a candidate plus a ratings lookup.
    pub async fn review_candidate(
        &self,
        shift_id: &ShiftId,
        user: &UserId,
    ) -> Result<CandidateReview, AppError> {
        let (record, offer) = {
            let views = self.views.lock().unwrap_or_else(|e| e.into_inner());
            let view = views.get(shift_id).ok_or(AppError::ShiftNotLoaded)?;
            let record = view.records.iter().find(|r| r.user_id() == user).cloned();
            let offer = view.offers.iter().find(|o| o.user_id() == user).cloned();
            (record, offer)
        };

        let identity = self.reveal.cached(shift_id, user);
        let ratings = match self
            .ratings
            .fetch_summary("user", &user.to_string())
            .await
        {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!(%user, error = %e, "ratings lookup failed; review proceeds without it");
                None
            }
        };

        Ok(CandidateReview {
            identity,
            record,
            offer,
            ratings,
        })
    }

    pub async fn accept_candidate(
        &self,
        shift_id: &ShiftId,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Snapshot {
        let result = async {
            let (shift, slot, records) = {
                let views = self.views.lock().unwrap_or_else(|e| e.into_inner());
                let view = views.get(shift_id).ok_or(AppError::ShiftNotLoaded)?;
                (
                    view.shift.clone(),
                    view.selected_slot.clone(),
                    view.records.clone(),
                )
            };
            self.assignment
                .accept(&shift, user, slot.as_ref(), &records, now)
                .await?;
            self.reload(shift_id).await
        }
        .await;
        self.snapshot(shift_id, result.err())
    }

    pub async fn accept_offer(
        &self,
        shift_id: &ShiftId,
        offer_id: &OfferId,
        now: DateTime<Utc>,
    ) -> Snapshot {
        let result = async {
            let (shift, slot, offer) = self.offer_context(shift_id, offer_id)?;
            self.assignment
                .accept_offer(&shift, &offer, slot.as_ref(), now)
                .await?;
            self.reload(shift_id).await
        }
        .await;
        self.snapshot(shift_id, result.err())
    }

    pub async fn reject_offer(
        &self,
        shift_id: &ShiftId,
        offer_id: &OfferId,
        now: DateTime<Utc>,
    ) -> Snapshot {
        let result = async {
            let (shift, _slot, offer) = self.offer_context(shift_id, offer_id)?;
            self.assignment.reject_offer(&shift, &offer, now).await?;
            self.reload(shift_id).await
        }
        .await;
        self.snapshot(shift_id, result.err())
    }

    /// The viewer focused this slot: snapshot its content as seen.
    pub async fn mark_slot_seen(&self, shift_id: &ShiftId, now: DateTime<Utc>) -> Snapshot {
        let result = async {
            let (shift, slot, records, offers) = {
                let views = self.views.lock().unwrap_or_else(|e| e.into_inner());
                let view = views.get(shift_id).ok_or(AppError::ShiftNotLoaded)?;
                (
                    view.shift.clone(),
                    view.selected_slot.clone(),
                    view.records.clone(),
                    view.offers.clone(),
                )
            };
            let tier = self.escalation.selection(&shift).selected();
            let triple = TripleKey::new(shift_id.clone(), tier, slot);
            self.tracker.mark_seen(&triple, &records, &offers, now).await
        }
        .await;
        self.snapshot(shift_id, result.err())
    }

    /// Irreversible; the caller confirms with the user before invoking.
    pub async fn delete_shift(&self, shift_id: &ShiftId, now: DateTime<Utc>) -> Snapshot {
        let result = self.assignment.delete_shift(shift_id, now).await;
        if result.is_ok() {
            self.collapse_shift(shift_id);
        }
        self.snapshot(shift_id, result.err())
    }

    /// Out-of-band activity hint from the notification channel.
    pub fn slot_activity(&self, activity: &SlotActivity) {
        self.tracker.note_activity(activity);
    }

    fn shift(&self, shift_id: &ShiftId) -> Result<Shift, AppError> {
        let views = self.views.lock().unwrap_or_else(|e| e.into_inner());
        views
            .get(shift_id)
            .map(|v| v.shift.clone())
            .ok_or(AppError::ShiftNotLoaded)
    }

    fn offer_context(
        &self,
        shift_id: &ShiftId,
        offer_id: &OfferId,
    ) -> Result<(Shift, Option<SlotId>, CounterOffer), AppError> {
        let views = self.views.lock().unwrap_or_else(|e| e.into_inner());
        let view = views.get(shift_id).ok_or(AppError::ShiftNotLoaded)?;
        let offer = view
            .offers
            .iter()
            .find(|o| o.id() == offer_id)
            .cloned()
            .ok_or(AppError::OfferNotLoaded)?;
        Ok((view.shift.clone(), view.selected_slot.clone(), offer))
    }

    /// Fetch pool and offers for the focused (tier, slot) and fold them
    /// into the view. A result arriving for a shift collapsed in the
    /// meantime is dropped, never applied.
    async fn reload(&self, shift_id: &ShiftId) -> Result<(), AppError> {
        let (shift, tier, slot) = {
            let views = self.views.lock().unwrap_or_else(|e| e.into_inner());
            let view = views.get(shift_id).ok_or(AppError::ShiftNotLoaded)?;
            let tier = self.escalation.selection(&view.shift).selected();
            (view.shift.clone(), tier, view.selected_slot.clone())
        };

        let pool = self.pool.fetch(&shift, tier, slot.as_ref()).await?;
        let offers = self.pool.fetch_offers(&shift).await?;

        // The shift may have been collapsed while the fetches were in
        // flight; nothing from such a fetch may be shown or baselined.
        {
            let views = self.views.lock().unwrap_or_else(|e| e.into_inner());
            if !views.contains_key(shift_id) {
                tracing::debug!(%shift_id, "discarding fetch result for a collapsed shift");
                return Ok(());
            }
        }

        let triple = TripleKey::new(shift_id.clone(), tier, slot.clone());
        self.tracker.observe(&triple, &pool.records, &offers).await?;

        let mut views = self.views.lock().unwrap_or_else(|e| e.into_inner());
        let Some(view) = views.get_mut(shift_id) else {
            tracing::debug!(%shift_id, "discarding fetch result for a collapsed shift");
            return Ok(());
        };

        for record in &pool.records {
            if let Some(identity) = record.identity() {
                self.reveal.seed(shift_id, record.user_id(), identity.clone());
            }
        }

        view.partition = (tier == Tier::Platform)
            .then(|| overlay_offers(pool.records.clone(), &offers, slot.as_ref()));
        view.records = pool.records;
        view.buckets = pool.buckets;
        view.offers = offers;
        Ok(())
    }

    fn snapshot(&self, shift_id: &ShiftId, error: Option<AppError>) -> Snapshot {
        let views = self.views.lock().unwrap_or_else(|e| e.into_inner());
        let error = error.map(|e| e.user_message());
        match views.get(shift_id) {
            Some(view) => {
                let selection = self.escalation.selection(&view.shift);
                let triple = TripleKey::new(
                    shift_id.clone(),
                    selection.selected(),
                    view.selected_slot.clone(),
                );
                Snapshot {
                    shift_id: shift_id.clone(),
                    current_tier: Some(selection.current()),
                    selected_tier: Some(selection.selected()),
                    selected_slot: view.selected_slot.clone(),
                    records: view.records.clone(),
                    buckets: view.buckets.clone(),
                    countered: view
                        .partition
                        .as_ref()
                        .map(|p| p.countered.clone())
                        .unwrap_or_default(),
                    dirty: self.tracker.is_dirty(&triple),
                    error,
                }
            }
            None => Snapshot {
                shift_id: shift_id.clone(),
                current_tier: None,
                selected_tier: None,
                selected_slot: None,
                records: vec![],
                buckets: None,
                countered: vec![],
                dirty: false,
                error,
            },
        }
    }
}
