//! Decides whether an uploaded image is analyzed or edited.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Verbs and scene words that ask for the upload to be transformed.
///
/// ASCII word boundaries and case folding, so a keyword written next to
/// non-Latin text still counts.
static EDIT_KEYWORDS: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::RegexBuilder::new(r"\b(generate|create|edit|put|place|background|scene|beach)\b")
        .case_insensitive(true)
        .unicode(false)
        .build()
        .expect("edit keyword regex is valid")
});

/// What to do with an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRoute {
    /// Answer a question about the image.
    Vision,
    /// Place the pictured product into a new scene.
    Edit,
}

/// True when `prompt` asks for the image to be edited.
pub fn wants_edit(prompt: &str) -> bool {
    EDIT_KEYWORDS.is_match(prompt)
}

pub fn route(prompt: &str) -> ImageRoute {
    if wants_edit(prompt) {
        ImageRoute::Edit
    } else {
        ImageRoute::Vision
    }
}
