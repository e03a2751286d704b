//! Keyword heuristics that override the classifier.

use std::sync::LazyLock;

/// Matched with ASCII word boundaries and case folding.
static IMAGE_KEYWORDS: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::RegexBuilder::new(
        r"\b(image|picture|photo|draw|generate|render|visualize|illustration|art|graphic|logo|avatar|scene|sketch|painting|portrait|diagram|map|chart|graph|plot|infographic|design|cover|wallpaper|background|poster|banner|flyer|brochure|card|comic|cartoon|animation|mockup|blueprint|layout|concept|template)\b",
    )
    .case_insensitive(true)
    .unicode(false)
    .build()
    .expect("image keyword regex is valid")
});

/// True when the message mentions anything visual, whatever the classifier says.
pub fn mentions_image(text: &str) -> bool {
    IMAGE_KEYWORDS.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_words_match() {
        assert!(mentions_image("draw me a logo"));
        assert!(mentions_image("Need a POSTER for Friday"));
        assert!(mentions_image("can you generate something"));
    }

    #[test]
    fn test_plain_text_does_not_match() {
        assert!(!mentions_image("write a caption about our new product"));
        assert!(!mentions_image("how are sales this week?"));
    }

    #[test]
    fn test_whole_words_only() {
        assert!(!mentions_image("our cardigans are back"));
        assert!(!mentions_image("the artist statement"));
    }

    #[test]
    fn test_keywords_next_to_non_latin_text() {
        assert!(mentions_image("帮我画一个logo吧"));
        assert!(mentions_image("请给我一张POSTER"));
        assert!(mentions_image("un café dessiné en art"));
        assert!(!mentions_image("帮我写一段文案"));
    }
}
