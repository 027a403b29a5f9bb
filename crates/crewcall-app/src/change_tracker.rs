use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crewcall_core::events::{DomainEvent, SlotMarkedSeen};
use crewcall_core::offer::CounterOffer;
use crewcall_core::pool::PoolRecord;
use crewcall_core::signature::{ChangeSignature, TripleKey};
use crewcall_ports::error::PortError;
use crewcall_ports::inbound::ActivitySink;
use crewcall_ports::outbound::{BaselineStore, EventPublisher};
use crewcall_ports::types::SlotActivity;

use crate::error::AppError;

/// Flags which (shift, tier, slot) triples changed since the viewer last
/// acknowledged them, from locally computed content signatures against a
/// durable per-identity baseline — no server-side read receipts.
pub struct ChangeTracker<B, EP>
where
    B: BaselineStore,
    EP: EventPublisher,
{
    store: B,
    events: EP,
    viewer: String,
    baselines: Mutex<HashMap<String, String>>,
    dirty: Mutex<HashSet<String>>,
    hydrated: Mutex<bool>,
    pending_hints: Mutex<Vec<SlotActivity>>,
}

impl<B, EP> ChangeTracker<B, EP>
where
    B: BaselineStore,
    EP: EventPublisher,
{
    pub fn new(store: B, events: EP, viewer: impl Into<String>) -> Self {
        Self {
            store,
            events,
            viewer: viewer.into(),
            baselines: Mutex::new(HashMap::new()),
            dirty: Mutex::new(HashSet::new()),
            hydrated: Mutex::new(false),
            pending_hints: Mutex::new(Vec::new()),
        }
    }

    async fn hydrate(&self) -> Result<(), AppError> {
        {
            let hydrated = self.hydrated.lock().unwrap_or_else(|e| e.into_inner());
            if *hydrated {
                return Ok(());
            }
        }
        let persisted = self.store.all_for(&self.viewer).await?;
        {
            let mut baselines = self.baselines.lock().unwrap_or_else(|e| e.into_inner());
            for (key, signature) in persisted {
                baselines.entry(key).or_insert(signature);
            }
        }
        *self.hydrated.lock().unwrap_or_else(|e| e.into_inner()) = true;

        // Hints that arrived before the baselines were loaded can be
        // matched against known keys only now.
        let pending = std::mem::take(
            &mut *self.pending_hints.lock().unwrap_or_else(|e| e.into_inner()),
        );
        for hint in &pending {
            self.flag_matching(hint);
        }
        Ok(())
    }

    /// Fold a fresh pool/offer load into the tracker. The first sighting
    /// of a triple seeds its baseline silently; afterwards the triple is
    /// dirty exactly when the stored baseline disagrees with the data on
    /// screen. Returns the dirty flag.
    pub async fn observe(
        &self,
        triple: &TripleKey,
        records: &[PoolRecord],
        offers: &[CounterOffer],
    ) -> Result<bool, AppError> {
        self.hydrate().await?;
        let key = triple.storage_key();
        let signature = ChangeSignature::compute(records, offers);

        let baseline = {
            let baselines = self.baselines.lock().unwrap_or_else(|e| e.into_inner());
            baselines.get(&key).cloned()
        };

        match baseline {
            None => {
                self.store
                    .put(&self.viewer, &key, signature.as_str())
                    .await?;
                self.baselines
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(key, signature.as_str().to_string());
                Ok(false)
            }
            Some(stored) if stored != signature.as_str() => {
                tracing::debug!(%triple, "pool content diverged from seen baseline");
                self.dirty
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(key);
                Ok(true)
            }
            Some(_) => {
                // Content caught back up with the baseline; an activity
                // hint that led here was a false alarm.
                self.dirty
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .remove(&key);
                Ok(false)
            }
        }
    }

    pub fn is_dirty(&self, triple: &TripleKey) -> bool {
        self.dirty
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&triple.storage_key())
    }

    /// The viewer focused this triple: snapshot the current signature as
    /// the new baseline, persist it, and clear the badge.
    pub async fn mark_seen(
        &self,
        triple: &TripleKey,
        records: &[PoolRecord],
        offers: &[CounterOffer],
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.hydrate().await?;
        let key = triple.storage_key();
        let signature = ChangeSignature::compute(records, offers);

        self.store
            .put(&self.viewer, &key, signature.as_str())
            .await?;
        self.baselines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.clone(), signature.as_str().to_string());
        self.dirty
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&key);

        self.events
            .publish(vec![DomainEvent::SlotMarkedSeen(SlotMarkedSeen {
                shift_id: triple.shift.clone(),
                tier: triple.tier,
                slot_id: triple.slot.clone(),
                occurred_at: now,
            })])
            .await?;
        Ok(())
    }

    /// Out-of-band hint that slots on a shift may have changed: badge the
    /// matching known triples ahead of the next pool reload. A hint
    /// arriving before the baselines are loaded is held back and replayed
    /// once hydration has run.
    pub fn note_activity(&self, activity: &SlotActivity) {
        let hydrated = *self.hydrated.lock().unwrap_or_else(|e| e.into_inner());
        if !hydrated {
            self.pending_hints
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(activity.clone());
            return;
        }
        self.flag_matching(activity);
    }

    fn flag_matching(&self, activity: &SlotActivity) {
        let shift_prefix = format!("{}:", activity.shift_id);
        let slot_suffixes: Vec<String> = activity
            .slot_ids
            .iter()
            .map(|s| format!(":{}", s))
            .collect();

        let baselines = self.baselines.lock().unwrap_or_else(|e| e.into_inner());
        let mut dirty = self.dirty.lock().unwrap_or_else(|e| e.into_inner());
        for key in baselines.keys() {
            if !key.starts_with(&shift_prefix) {
                continue;
            }
            let slot_matches =
                slot_suffixes.is_empty() || slot_suffixes.iter().any(|s| key.ends_with(s));
            if slot_matches {
                dirty.insert(key.clone());
            }
        }
    }
}

#[async_trait]
impl<B, EP> ActivitySink for ChangeTracker<B, EP>
where
    B: BaselineStore,
    EP: EventPublisher,
{
    async fn slot_activity(&self, activity: SlotActivity) -> Result<(), PortError> {
        self.note_activity(&activity);
        Ok(())
    }
}
