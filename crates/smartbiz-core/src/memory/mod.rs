//! Agent memory: profile rendering, snippet recall and prompt context assembly.

pub mod context;
pub mod profile;
pub mod recall;
