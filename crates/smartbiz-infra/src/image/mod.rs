//! Image generation and editing backends.

pub mod modelslab;
pub mod pollinations;
