use scraper::{node::Node, ElementRef, Html};

/// Converts backend markup into plain text for display.
///
/// Tags are dropped, entities decoded and runs of whitespace collapsed.
/// Block elements and `<br>` turn into line breaks and links keep their
/// target as `text [href]`. Strings without markup are only trimmed.
pub fn html_to_text(input: &str) -> String {
    if !input.contains('<') && !input.contains('&') {
        return input.trim().to_string();
    }

    let fragment = Html::parse_fragment(input);
    let mut builder = TextBuilder::default();
    walk(fragment.root_element(), &mut builder);
    builder.finish()
}

#[derive(Default)]
struct TextBuilder {
    out: String,
    pending_space: bool,
}

impl TextBuilder {
    fn push_text(&mut self, text: &str) {
        if text.starts_with(char::is_whitespace) {
            self.pending_space = true;
        }
        for word in text.split_whitespace() {
            if self.pending_space && !self.out.is_empty() && !self.out.ends_with('\n') {
                self.out.push(' ');
            }
            self.out.push_str(word);
            self.pending_space = true;
        }
        self.pending_space = text.ends_with(char::is_whitespace);
    }

    fn line_break(&mut self) {
        self.out.push('\n');
        self.pending_space = false;
    }

    fn ensure_newlines(&mut self, count: usize) {
        if self.out.is_empty() {
            return;
        }
        let trailing = self.out.chars().rev().take_while(|c| *c == '\n').count();
        for _ in trailing..count {
            self.out.push('\n');
        }
        self.pending_space = false;
    }

    fn finish(self) -> String {
        self.out.trim().to_string()
    }
}

fn walk(element: ElementRef<'_>, out: &mut TextBuilder) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_text(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    visit(child_element, out);
                }
            }
            _ => {}
        }
    }
}

fn visit(element: ElementRef<'_>, out: &mut TextBuilder) {
    match element.value().name() {
        "br" => out.line_break(),
        "script" | "style" | "head" | "template" => {}
        "a" => {
            let mut inner = TextBuilder::default();
            walk(element, &mut inner);
            let label = inner.finish();
            match element.value().attr("href").map(str::trim) {
                Some(href) if is_followable(href) && href != label => {
                    if label.is_empty() {
                        out.push_text(href);
                    } else {
                        out.push_text(&format!("{} [{}]", label, href));
                    }
                }
                _ => out.push_text(&label),
            }
        }
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "pre" | "table" | "ul"
        | "ol" => {
            out.ensure_newlines(2);
            walk(element, out);
            out.ensure_newlines(2);
        }
        "li" => {
            out.ensure_newlines(1);
            out.push_text("* ");
            walk(element, out);
            out.ensure_newlines(1);
        }
        "div" | "section" | "article" | "tr" | "header" | "footer" => {
            out.ensure_newlines(1);
            walk(element, out);
            out.ensure_newlines(1);
        }
        _ => walk(element, out),
    }
}

fn is_followable(href: &str) -> bool {
    !href.is_empty() && !href.starts_with('#') && !href.starts_with("javascript:")
}
