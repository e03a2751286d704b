//! Intent classification for inbound messages.

pub mod classifier;
pub mod heuristics;
