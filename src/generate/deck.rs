use serde::{Deserialize, Serialize};

use crate::config::TemplateStyle;

/// One slide as produced by the content generator. Count and wording are
/// model-dependent; missing fields default rather than failing the parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// In-memory deck: built from generator output, serialized to a file by the
/// renderer, then discarded.
#[derive(Debug, Clone)]
pub struct Deck {
    pub topic: String,
    pub slides: Vec<SlideContent>,
    pub style: TemplateStyle,
}
