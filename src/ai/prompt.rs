//! Prompt construction and response parsing.

use crate::ai::types::{GeneratedContent, PageSubject};

/// System message sent to chat-style providers.
pub const SYSTEM_INSTRUCTION: &str = "You are an SEO content generator. Always respond with valid \
JSON containing: intro (50 words), meta_title (60 chars), meta_description (155 chars).";

/// Length cap for a meta description derived from free text.
pub const FALLBACK_DESCRIPTION_CHARS: usize = 155;

/// Fill `{service}`, `{city}` and `{zip}` in the configured template.
pub fn render_prompt(template: &str, subject: &PageSubject) -> String {
    template
        .replace("{service}", &subject.service)
        .replace("{city}", &subject.city)
        .replace("{zip}", &subject.zip)
}

/// The user message: the rendered prompt plus the JSON answer format.
pub fn user_message(template: &str, subject: &PageSubject) -> String {
    format!(
        "{}\n\nGenerate content for: {} in {}\n\n\
         Respond with JSON: {{\"intro\": \"...\", \"meta_title\": \"...\", \"meta_description\": \"...\"}}",
        render_prompt(template, subject),
        subject.service,
        subject.city
    )
}

/// Strip a surrounding Markdown code fence, if any.
fn unfence(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Interpret provider text. A JSON object with an `intro` is used as is;
/// anything else becomes the intro with derived title and description.
pub fn parse_content(text: &str, subject: &PageSubject) -> GeneratedContent {
    if let Ok(content) = serde_json::from_str::<GeneratedContent>(unfence(text)) {
        return GeneratedContent {
            intro: content.intro.trim().to_string(),
            meta_title: content.meta_title.trim().to_string(),
            meta_description: content.meta_description.trim().to_string(),
        };
    }

    let text = text.trim();
    GeneratedContent {
        intro: text.to_string(),
        meta_title: format!("{} in {}", subject.service, subject.city),
        meta_description: text.chars().take(FALLBACK_DESCRIPTION_CHARS).collect(),
    }
}
