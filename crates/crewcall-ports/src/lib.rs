//! Boundary traits and raw wire types between the engine and its external
//! collaborators: the marketplace API, ratings, the durable baseline
//! store, session refresh, and the activity hint channel.

pub mod error;
pub mod inbound;
pub mod outbound;
pub mod types;
