//! Shared domain types for the SmartBiz agent engine.
//!
//! Agents, businesses, the conversation log (messages, content, media),
//! intent labels, LLM and image provider shapes, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

#[macro_use]
mod id;

pub mod agent;
pub mod business;
pub mod config;
pub mod conversation;
pub mod error;
pub mod image;
pub mod intent;
pub mod llm;
pub mod memory;
