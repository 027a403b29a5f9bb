use serde::{Deserialize, Serialize};

/// A candidate's lifecycle state at an internal (non-Platform) tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberStatus {
    Interested,
    Accepted,
    Rejected,
    NoResponse,
}

impl MemberStatus {
    /// Normalize a raw backend status. Anything missing or unrecognized
    /// lands in `NoResponse` — a record is never dropped for carrying an
    /// unknown status.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "interested" => MemberStatus::Interested,
            "accepted" => MemberStatus::Accepted,
            "rejected" => MemberStatus::Rejected,
            _ => MemberStatus::NoResponse,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Interested => "interested",
            MemberStatus::Accepted => "accepted",
            MemberStatus::Rejected => "rejected",
            MemberStatus::NoResponse => "no_response",
        }
    }

    /// Merge precedence when collapsing duplicate records.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            MemberStatus::Accepted => 3,
            MemberStatus::Rejected => 2,
            MemberStatus::Interested => 1,
            MemberStatus::NoResponse => 0,
        }
    }
}
