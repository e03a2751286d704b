//! Request extractors and parameter parsing shared by handlers.

pub mod path;
pub mod query;
