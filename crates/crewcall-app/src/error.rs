use crewcall_core::error::DomainError;
use crewcall_ports::error::PortError;
use thiserror::Error;

use crate::inflight::OpKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("port error: {0}")]
    Port(#[from] PortError),
    #[error("{0:?} already in flight for this shift")]
    InFlight(OpKind),
    #[error("session expired; login required")]
    SessionExpired,
    #[error("shift is not loaded")]
    ShiftNotLoaded,
    #[error("offer is not loaded")]
    OfferNotLoaded,
}

impl AppError {
    /// The dismissible message handed to the presentation layer. Every
    /// error requires an explicit user-triggered retry; nothing here is
    /// retried automatically.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
