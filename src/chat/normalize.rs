use crate::chat::plain_text::html_to_text;
use crate::types::{ResultItem, SearchResponse, Source};

pub const RESULT_LIST_HEADER: &str = "Here’s what I found:";
pub const FALLBACK_CONTENT: &str =
    "I processed your request but couldn’t find specific information.";
const DOCUMENT_TITLE: &str = "Document";
const EXCERPT_CHARS: usize = 200;

/// The shapes a backend response can take, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseShape<'a> {
    Answer(&'a str),
    Summary(&'a str),
    Content(&'a str),
    ResultList(&'a [ResultItem]),
    Unknown,
}

impl<'a> ResponseShape<'a> {
    pub fn classify(response: &'a SearchResponse) -> Self {
        if let Some(answer) = non_empty(&response.answer) {
            return ResponseShape::Answer(answer);
        }
        if let Some(summary) = non_empty(&response.summary) {
            return ResponseShape::Summary(summary);
        }
        if let Some(content) = non_empty(&response.content) {
            return ResponseShape::Content(content);
        }
        match response.results.as_deref() {
            Some(items) if !items.is_empty() => ResponseShape::ResultList(items),
            _ => ResponseShape::Unknown,
        }
    }

    pub fn render(&self) -> String {
        match self {
            ResponseShape::Answer(text)
            | ResponseShape::Summary(text)
            | ResponseShape::Content(text) => html_to_text(text),
            ResponseShape::ResultList(items) => digest(items),
            ResponseShape::Unknown => FALLBACK_CONTENT.to_string(),
        }
    }
}

/// Uniform view of a backend response, ready to become a bot message.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub content: String,
    pub sources: Vec<Source>,
}

impl NormalizedResult {
    /// A non-empty source list is what opens the sidebar.
    pub fn opens_sidebar(&self) -> bool {
        !self.sources.is_empty()
    }
}

pub fn normalize(response: &SearchResponse) -> NormalizedResult {
    NormalizedResult {
        content: ResponseShape::classify(response).render(),
        sources: sources_for(response),
    }
}

fn digest(items: &[ResultItem]) -> String {
    let mut content = RESULT_LIST_HEADER.to_string();
    for (index, item) in items.iter().enumerate() {
        if let Some(title) = non_empty(&item.title) {
            content.push_str(&format!("\n\n{}. {}", index + 1, title));
        }
        if let Some(summary) = non_empty(&item.summary) {
            content.push('\n');
            content.push_str(&html_to_text(summary));
        } else if let Some(body) = non_empty(&item.content) {
            let excerpt: String = body.chars().take(EXCERPT_CHARS).collect();
            content.push('\n');
            content.push_str(&html_to_text(&excerpt));
            content.push_str("...");
        }
    }
    content
}

// An explicit `sources` field wins even when it is empty.
fn sources_for(response: &SearchResponse) -> Vec<Source> {
    if let Some(sources) = &response.sources {
        return sources.clone();
    }

    response
        .results
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|item| Source {
            title: Some(
                non_empty(&item.title)
                    .unwrap_or(DOCUMENT_TITLE)
                    .to_string(),
            ),
            url: non_empty(&item.url).map(str::to_string),
            content: non_empty(&item.content)
                .or_else(|| non_empty(&item.summary))
                .map(str::to_string),
        })
        .collect()
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
