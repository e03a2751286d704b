//! Observability helpers shared by the SmartBiz binaries and providers.

pub mod genai_attrs;
pub mod tracing_setup;
