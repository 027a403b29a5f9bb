//! Outbound adapter implementations: SQLite-backed persistence for seen
//! baselines and the domain event log.

pub mod persistence;
