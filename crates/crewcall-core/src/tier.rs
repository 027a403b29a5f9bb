use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The universal escalation sequence a shift is progressively exposed to.
/// A shift's own ladder is an ordered subset of this sequence; whether the
/// Organization tier is present is decided by the backend per shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    MyTeam,
    Favorites,
    Chain,
    Organization,
    Platform,
}

impl Tier {
    pub const SEQUENCE: [Tier; 5] = [
        Tier::MyTeam,
        Tier::Favorites,
        Tier::Chain,
        Tier::Organization,
        Tier::Platform,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::MyTeam => "my_team",
            Tier::Favorites => "favorites",
            Tier::Chain => "chain",
            Tier::Organization => "organization",
            Tier::Platform => "platform",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The ordered subset of tiers a particular shift may be escalated through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLadder(Vec<Tier>);

impl TierLadder {
    pub fn new(mut tiers: Vec<Tier>) -> Result<Self, DomainError> {
        if tiers.is_empty() {
            return Err(DomainError::LadderRequiresTier);
        }
        tiers.sort();
        tiers.dedup();
        Ok(Self(tiers))
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.0
    }

    pub fn index_of(&self, tier: Tier) -> Option<usize> {
        self.0.iter().position(|t| *t == tier)
    }

    pub fn contains(&self, tier: Tier) -> bool {
        self.index_of(tier).is_some()
    }

    pub fn terminal(&self) -> Tier {
        self.0[self.0.len() - 1]
    }

    /// The single next rung above `tier`, or None at the terminal tier.
    pub fn next_after(&self, tier: Tier) -> Option<Tier> {
        let idx = self.index_of(tier)?;
        self.0.get(idx + 1).copied()
    }
}

/// Per-shift view cursor over the ladder. `current` is authoritative (from
/// the backend); `selected` may trail into history or sit at most one rung
/// ahead as a preview before committing an escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSelection {
    current: Tier,
    selected: Tier,
}

impl TierSelection {
    pub fn new(current: Tier) -> Self {
        Self {
            current,
            selected: current,
        }
    }

    pub fn current(&self) -> Tier {
        self.current
    }

    pub fn selected(&self) -> Tier {
        self.selected
    }

    /// Move the view cursor. Any already-passed tier is fine; one rung
    /// ahead of current is fine; further ahead is `TierLocked`. State is
    /// left unchanged on failure.
    pub fn select(&mut self, ladder: &TierLadder, tier: Tier) -> Result<(), DomainError> {
        let target = ladder.index_of(tier).ok_or(DomainError::UnknownTier)?;
        let current = ladder
            .index_of(self.current)
            .ok_or(DomainError::UnknownTier)?;
        if target > current + 1 {
            return Err(DomainError::TierLocked);
        }
        self.selected = tier;
        Ok(())
    }

    /// The tier an escalation would commit to. Valid only when the cursor
    /// previews exactly one rung above current.
    pub fn escalation_target(&self, ladder: &TierLadder) -> Result<Tier, DomainError> {
        let next = ladder
            .next_after(self.current)
            .ok_or(DomainError::NoFurtherEscalation)?;
        if self.selected != next {
            return Err(DomainError::TierLocked);
        }
        Ok(next)
    }

    /// Apply the backend-confirmed tier after a successful escalation.
    /// The cursor resets onto the new current tier.
    pub fn confirm(&mut self, new_current: Tier) {
        self.current = new_current;
        self.selected = new_current;
    }
}
