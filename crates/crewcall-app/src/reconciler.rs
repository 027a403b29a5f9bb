use crewcall_core::ids::SlotId;
use crewcall_core::offer::{partition_platform, CounterOffer, PlatformPartition};
use crewcall_core::pool::PoolRecord;

/// Overlay counter-offers onto a Platform-tier pool load. An offer that
/// matches no record is a reconciliation ambiguity: logged, surfaced on
/// its own data, never a hard failure.
pub fn overlay_offers(
    records: Vec<PoolRecord>,
    offers: &[CounterOffer],
    slot: Option<&SlotId>,
) -> PlatformPartition {
    let partition = partition_platform(records, offers, slot);
    for countered in partition.countered.iter().filter(|c| c.is_ambiguous()) {
        tracing::warn!(
            offer_id = %countered.offer.id(),
            user_id = %countered.offer.user_id(),
            "counter-offer matched no pool record; reviewing on offer data alone"
        );
    }
    partition
}
