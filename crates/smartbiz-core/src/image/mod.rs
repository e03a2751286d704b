//! Image generation, editing and analysis.
//!
//! - `TextToImageProvider` / `ImageEditProvider`: provider ports
//! - `router`: pure predicate choosing vision analysis or edit for an upload
//! - `pipeline`: the vision and edit paths for an uploaded image

pub mod box_provider;
pub mod data_uri;
pub mod normalize;
pub mod pipeline;
pub mod provider;
pub mod router;
