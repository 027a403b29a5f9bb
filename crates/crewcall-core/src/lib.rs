//! Domain model for the shift escalation and candidate matching engine:
//! tiers and the escalation ladder, slot-scoped candidate pools,
//! counter-offer reconciliation, identity reveal fan-out, and the change
//! signatures behind "what's new since I last looked".

pub mod error;
pub mod events;
pub mod ids;
pub mod offer;
pub mod pool;
pub mod reveal;
pub mod shift;
pub mod signature;
pub mod tier;
