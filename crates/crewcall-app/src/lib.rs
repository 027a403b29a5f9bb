//! Application services orchestrating the marketplace ports: escalation,
//! candidate pooling, offer reconciliation, identity disclosure, assignment,
//! and seen-state change tracking, fronted by the [`console::Console`]
//! facade.

pub mod assignment_service;
pub mod change_tracker;
pub mod console;
pub mod error;
pub mod escalation_service;
pub mod inflight;
pub mod pool_service;
pub mod reconciler;
pub mod reveal_service;
pub mod session;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;
