use crate::ids::UserId;
use crate::offer::CounterOffer;
use crate::pool::{CandidateIdentity, PoolRecord};

/// Fan a disclosed identity out to every local representation of the
/// candidate: pool records and linked counter-offers alike. A partial
/// fan-out leaves stale "Anonymous" labels elsewhere, so all of them are
/// stamped in one pass. Returns how many representations were touched.
pub fn apply_identity(
    user_id: &UserId,
    identity: &CandidateIdentity,
    records: &mut [PoolRecord],
    offers: &mut [CounterOffer],
) -> usize {
    let mut touched = 0;
    for record in records.iter_mut() {
        if record.user_id() == user_id {
            record.stamp_identity(identity.clone());
            touched += 1;
        }
    }
    for offer in offers.iter_mut() {
        if offer.user_id() == user_id {
            offer.stamp_identity(identity.clone());
            touched += 1;
        }
    }
    touched
}
