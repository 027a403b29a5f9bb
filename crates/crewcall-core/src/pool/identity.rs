use serde::{Deserialize, Serialize};

/// A candidate's disclosed identity. Withheld from every record until the
/// reveal gate has successfully run for that (shift, user) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateIdentity {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
}
