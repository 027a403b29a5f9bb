use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("tier is not selectable yet")]
    TierLocked,
    #[error("shift is already at its terminal tier")]
    NoFurtherEscalation,
    #[error("tier is not in this shift's ladder")]
    UnknownTier,
    #[error("ladder requires at least one tier")]
    LadderRequiresTier,
    #[error("a slot is required on a multi-slot shift")]
    SlotRequired,
    #[error("single-user shifts carry no slot")]
    SlotNotAllowed,
    #[error("could not resolve a slot for this operation")]
    UnresolvedSlot,
    #[error("candidate is not eligible for assignment")]
    CandidateNotEligible,
    #[error("invalid id: {0}")]
    InvalidId(String),
}
