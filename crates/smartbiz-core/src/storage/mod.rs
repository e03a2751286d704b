//! Object storage port used to publish images at a public URL.

pub mod box_store;
pub mod object_store;
