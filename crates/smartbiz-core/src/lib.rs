//! Conversation orchestration and repository trait definitions for SmartBiz.
//!
//! This crate defines the "ports" (repository, provider and storage traits)
//! that the infrastructure layer implements, plus the engine built on them:
//! memory profiles, context assembly, intent classification, generators, the
//! image pipeline and the conversation orchestrator. It depends only on
//! `smartbiz-types` -- never on `smartbiz-infra` or any database/IO crate.

pub mod chat;
pub mod generator;
pub mod image;
pub mod intent;
pub mod llm;
pub mod memory;
pub mod providers;
pub mod repository;
pub mod service;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
