use leptos::prelude::*;
use pulldown_cmark::{html, Event, Options, Parser};

/// Markdown to HTML. Raw HTML in the input is escaped, never passed through.
pub fn render_markdown(text: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[component]
pub fn MarkdownRenderer(
    #[prop(into)] content: String,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let rendered = render_markdown(&content);

    view! { <div class=format!("markdown-body {}", class) inner_html=rendered></div> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_markdown() {
        let html = render_markdown("**bold** and a list:\n\n1. one\n2. two");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<ol>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("hi <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
