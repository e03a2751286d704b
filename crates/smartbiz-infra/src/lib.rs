//! Infrastructure layer for SmartBiz.
//!
//! Implements the ports defined in `smartbiz-core`: SQLite repositories,
//! the OpenAI-compatible LLM provider, Pollinations and Modelslab image
//! backends, and Cloudinary object storage. Also loads configuration and
//! credentials.

pub mod config;
pub mod image;
pub mod llm;
pub mod providers;
pub mod sqlite;
pub mod storage;
