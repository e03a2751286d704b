//! The external providers the engine calls, bundled for sharing.

use crate::image::box_provider::{BoxImageEditProvider, BoxTextToImageProvider};
use crate::llm::box_provider::BoxLlmProvider;
use crate::storage::box_store::BoxObjectStore;

/// Provider set shared by the orchestrator and the agent service.
///
/// The edit provider and object store are optional: without them every
/// other route still works, and the edit route fails with a configuration
/// error.
pub struct Providers {
    pub llm: BoxLlmProvider,
    pub text_to_image: BoxTextToImageProvider,
    pub image_edit: Option<BoxImageEditProvider>,
    pub object_store: Option<BoxObjectStore>,
}
