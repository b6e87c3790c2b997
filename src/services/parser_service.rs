use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::models::generation::{ComposeState, ParsedMessage};

// Subject labels the models emit across the locales we support.
const SUBJECT_LABELS: &str = "Subject|Betreff|Objet|Asunto|Oggetto|Assunto";

lazy_static! {
    static ref BOLD_SUBJECT_RE: Regex = Regex::new(&format!(
        r"(?i)^\s*\*\*(?:{}):\*\*[ \t]*(.*)",
        SUBJECT_LABELS
    ))
    .unwrap();
    static ref PLAIN_SUBJECT_RE: Regex = Regex::new(&format!(
        r"(?i)^\s*(?:{}):[ \t]*(.*)",
        SUBJECT_LABELS
    ))
    .unwrap();
    static ref BOLD_ASTERISK_RE: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref BOLD_UNDERSCORE_RE: Regex = Regex::new(r"__(.+?)__").unwrap();
    static ref ITALIC_ASTERISK_RE: Regex = Regex::new(r"\*(.+?)\*").unwrap();
    static ref ITALIC_UNDERSCORE_RE: Regex = Regex::new(r"_(.+?)_").unwrap();
    static ref HEADER_RE: Regex = Regex::new(r"(?m)^#+[ \t]+").unwrap();
}

/// Optional structure some models answer with when asked for an email.
#[derive(Deserialize)]
struct JsonDraft {
    subject: Option<String>,
    body: Option<String>,
}

/// Extract a subject/body pair from raw generated text.
///
/// Attempts, first match wins: a JSON object with `subject`/`body` fields,
/// a bold subject label line at the start of the text, the same label line
/// without bold markers, and finally the whole text as the body. The
/// matched label line is removed from the body, and both fields are
/// stripped of lightweight markdown afterwards.
pub fn parse(raw_text: &str) -> ParsedMessage {
    if let Ok(draft) = serde_json::from_str::<JsonDraft>(raw_text.trim()) {
        return ParsedMessage {
            subject: draft.subject.map(|s| strip_markup(&s)),
            body: strip_markup(&draft.body.unwrap_or_default()),
        };
    }

    let (subject, body) = split_subject(raw_text);
    ParsedMessage {
        subject: subject.map(|s| strip_markup(&s)),
        body: strip_markup(&body),
    }
}

/// Merge a parsed draft into the current compose fields. An extracted
/// subject always replaces the current one; the generated body goes in
/// front of any existing content with a blank line between, and the caret
/// lands at the top.
pub fn merge_into_compose(
    parsed: &ParsedMessage,
    current_subject: &str,
    current_body: &str,
) -> ComposeState {
    let subject = match &parsed.subject {
        Some(subject) => subject.clone(),
        None => current_subject.to_string(),
    };
    let body = if current_body.trim().is_empty() {
        parsed.body.clone()
    } else {
        format!("{}\n\n{}", parsed.body, current_body)
    };
    ComposeState {
        subject,
        body,
        cursor_pos: 0,
    }
}

fn split_subject(text: &str) -> (Option<String>, String) {
    for re in [&*BOLD_SUBJECT_RE, &*PLAIN_SUBJECT_RE] {
        if let Some(caps) = re.captures(text) {
            let subject = caps
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            let line_end = caps.get(0).unwrap().end();
            let body = text[line_end..]
                .trim_start_matches(|c| c == '\r' || c == '\n')
                .to_string();
            return (Some(subject), body);
        }
    }
    (None, text.to_string())
}

// One global pass per marker kind, in this order, never re-scanned.
fn strip_markup(text: &str) -> String {
    let text = BOLD_ASTERISK_RE.replace_all(text, "$1");
    let text = BOLD_UNDERSCORE_RE.replace_all(&text, "$1");
    let text = ITALIC_ASTERISK_RE.replace_all(&text, "$1");
    let text = ITALIC_UNDERSCORE_RE.replace_all(&text, "$1");
    HEADER_RE.replace_all(&text, "").into_owned()
}
