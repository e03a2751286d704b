//! Route handlers, one module per resource.

pub mod agent;
pub mod business;
pub mod chat;
pub mod content;
