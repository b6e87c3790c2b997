use serde::Serialize;

/// How a generation request is seeded: from quoted email context or from a
/// free-form user prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Reply,
    Prompt,
}

impl GenerationMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reply" => Some(GenerationMode::Reply),
            "prompt" => Some(GenerationMode::Prompt),
            _ => None,
        }
    }
}

/// Subject/body pair extracted from raw generated text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedMessage {
    pub subject: Option<String>,
    pub body: String,
}

/// Compose fields after merging a parsed draft into the current editor
/// content. `cursor_pos` is where the caller should place the caret.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposeState {
    pub subject: String,
    pub body: String,
    pub cursor_pos: usize,
}
