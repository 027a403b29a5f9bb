pub mod slot;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ShiftId, SlotId};
use crate::tier::{Tier, TierLadder};

pub use slot::Slot;

/// A posted shift. Created by the posting flow and read-only here except
/// for tier advancement, which only the backend commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    id: ShiftId,
    ladder: TierLadder,
    current_tier: Tier,
    single_user_only: bool,
    slots: Vec<Slot>,
}

impl Shift {
    pub fn new(
        id: ShiftId,
        ladder: TierLadder,
        current_tier: Tier,
        single_user_only: bool,
        slots: Vec<Slot>,
    ) -> Result<Self, DomainError> {
        if !ladder.contains(current_tier) {
            return Err(DomainError::UnknownTier);
        }
        Ok(Self {
            id,
            ladder,
            current_tier,
            single_user_only,
            slots,
        })
    }

    pub fn id(&self) -> &ShiftId {
        &self.id
    }

    pub fn ladder(&self) -> &TierLadder {
        &self.ladder
    }

    pub fn current_tier(&self) -> Tier {
        self.current_tier
    }

    pub fn single_user_only(&self) -> bool {
        self.single_user_only
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn first_slot(&self) -> Option<&SlotId> {
        self.slots.first().map(Slot::id)
    }

    pub fn slot(&self, id: &SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id() == id)
    }

    /// Every read or mutation on a multi-slot shift must be slot-scoped;
    /// single-user shifts never carry a slot.
    pub fn check_slot_scope(&self, slot: Option<&SlotId>) -> Result<(), DomainError> {
        match (self.single_user_only, slot) {
            (true, Some(_)) => Err(DomainError::SlotNotAllowed),
            (false, None) => Err(DomainError::SlotRequired),
            (false, Some(id)) if self.slot(id).is_none() => Err(DomainError::UnresolvedSlot),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn slot(date: &str) -> Slot {
        Slot::new(
            SlotId::new(),
            date.parse::<NaiveDate>().unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        )
    }

    fn ladder() -> TierLadder {
        TierLadder::new(Tier::SEQUENCE.to_vec()).unwrap()
    }

    #[test]
    fn current_tier_must_be_on_ladder() {
        let ladder = TierLadder::new(vec![Tier::MyTeam, Tier::Platform]).unwrap();
        let result = Shift::new(ShiftId::new(), ladder, Tier::Chain, true, vec![]);
        assert!(matches!(result, Err(DomainError::UnknownTier)));
    }

    #[test]
    fn multi_slot_shift_requires_slot_scope() {
        let shift = Shift::new(
            ShiftId::new(),
            ladder(),
            Tier::MyTeam,
            false,
            vec![slot("2025-01-10"), slot("2025-01-11")],
        )
        .unwrap();
        assert_eq!(
            shift.check_slot_scope(None),
            Err(DomainError::SlotRequired)
        );
        let first = shift.slots()[0].id().clone();
        assert_eq!(shift.check_slot_scope(Some(&first)), Ok(()));
    }

    #[test]
    fn single_user_shift_rejects_slot_scope() {
        let shift =
            Shift::new(ShiftId::new(), ladder(), Tier::MyTeam, true, vec![]).unwrap();
        assert_eq!(shift.check_slot_scope(None), Ok(()));
        let stray = SlotId::new();
        assert_eq!(
            shift.check_slot_scope(Some(&stray)),
            Err(DomainError::SlotNotAllowed)
        );
    }

    #[test]
    fn unknown_slot_is_unresolved() {
        let shift = Shift::new(
            ShiftId::new(),
            ladder(),
            Tier::MyTeam,
            false,
            vec![slot("2025-01-10")],
        )
        .unwrap();
        let stray = SlotId::new();
        assert_eq!(
            shift.check_slot_scope(Some(&stray)),
            Err(DomainError::UnresolvedSlot)
        );
    }
}
