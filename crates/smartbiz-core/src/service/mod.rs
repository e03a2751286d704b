//! Application services built on the repository and provider ports.

pub mod agent;
