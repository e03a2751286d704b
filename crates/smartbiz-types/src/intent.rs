//! Closed intent labels produced by the intent classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::conversation::ContentType;

/// What the user wants from this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    #[default]
    Chat,
    Image,
    Content,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentKind::Chat => write!(f, "chat"),
            IntentKind::Image => write!(f, "image"),
            IntentKind::Content => write!(f, "content"),
        }
    }
}

impl FromStr for IntentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chat" => Ok(IntentKind::Chat),
            "image" => Ok(IntentKind::Image),
            "content" => Ok(IntentKind::Content),
            other => Err(format!("invalid intent: '{other}'")),
        }
    }
}

/// The artifact type the user asked for, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentTarget {
    Email,
    Post,
    Caption,
    Code,
    Image,
    #[default]
    None,
}

impl IntentTarget {
    /// The text content type this target maps to, if it is one.
    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            IntentTarget::Email => Some(ContentType::Email),
            IntentTarget::Post => Some(ContentType::Post),
            IntentTarget::Caption => Some(ContentType::Caption),
            IntentTarget::Code => Some(ContentType::Code),
            IntentTarget::Image | IntentTarget::None => None,
        }
    }
}

impl fmt::Display for IntentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentTarget::Email => write!(f, "email"),
            IntentTarget::Post => write!(f, "post"),
            IntentTarget::Caption => write!(f, "caption"),
            IntentTarget::Code => write!(f, "code"),
            IntentTarget::Image => write!(f, "image"),
            IntentTarget::None => write!(f, "none"),
        }
    }
}

impl FromStr for IntentTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(IntentTarget::Email),
            "post" => Ok(IntentTarget::Post),
            "caption" => Ok(IntentTarget::Caption),
            "code" => Ok(IntentTarget::Code),
            "image" => Ok(IntentTarget::Image),
            "none" => Ok(IntentTarget::None),
            other => Err(format!("invalid intent type: '{other}'")),
        }
    }
}

/// Classifier verdict for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Intent {
    pub intent: IntentKind,
    #[serde(rename = "type")]
    pub target: IntentTarget,
}

impl Intent {
    pub fn new(intent: IntentKind, target: IntentTarget) -> Self {
        Self { intent, target }
    }

    /// `{chat, none}`: the verdict used whenever classification fails.
    pub fn fallback() -> Self {
        Self::default()
    }

    /// Lenient construction from raw labels: unknown values collapse to
    /// `chat` / `none` instead of failing.
    pub fn coerce(intent: Option<&str>, target: Option<&str>) -> Self {
        Self {
            intent: intent.and_then(|s| s.parse().ok()).unwrap_or_default(),
            target: target.and_then(|s| s.parse().ok()).unwrap_or_default(),
        }
    }

    pub fn wants_image(&self) -> bool {
        self.intent == IntentKind::Image || self.target == IntentTarget::Image
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.intent, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_chat_none() {
        let intent = Intent::fallback();
        assert_eq!(intent.intent, IntentKind::Chat);
        assert_eq!(intent.target, IntentTarget::None);
    }

    #[test]
    fn test_coerce_unknown_values() {
        let intent = Intent::coerce(Some("dance"), Some("tweet"));
        assert_eq!(intent, Intent::fallback());

        let intent = Intent::coerce(Some("CONTENT"), Some("Caption"));
        assert_eq!(intent, Intent::new(IntentKind::Content, IntentTarget::Caption));

        let intent = Intent::coerce(None, Some("image"));
        assert_eq!(intent.intent, IntentKind::Chat);
        assert!(intent.wants_image());
    }

    #[test]
    fn test_intent_serde_uses_type_key() {
        let intent = Intent::new(IntentKind::Content, IntentTarget::Email);
        let json = serde_json::to_value(intent).unwrap();
        assert_eq!(json, serde_json::json!({"intent": "content", "type": "email"}));
    }

    #[test]
    fn test_target_content_type_mapping() {
        assert_eq!(IntentTarget::Post.content_type(), Some(ContentType::Post));
        assert_eq!(IntentTarget::Image.content_type(), None);
        assert_eq!(IntentTarget::None.content_type(), None);
    }
}
