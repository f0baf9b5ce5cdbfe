use leptos::prelude::*;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::fmt::Write;

/// Renders an assistant answer. Re-renders whenever `content` changes, so a
/// streamed answer grows in place.
#[component]
pub fn MarkdownRenderer(#[prop(into)] content: Signal<String>) -> impl IntoView {
    let rendered_html = Memo::new(move |_| content.with(|text| markdown_to_html(text)));

    view! { <div class="markdown" inner_html=move || rendered_html.get()></div> }
}

/// Converts markdown to HTML. Raw HTML in the input is dropped, never
/// passed through.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html = String::new();
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                        let _ = write!(html, r#"<pre><code class="language-{}">"#, escape(&lang));
                    }
                    _ => html.push_str("<pre><code>"),
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                html.push_str("</code></pre>");
            }
            Event::Start(Tag::Paragraph) => html.push_str("<p>"),
            Event::End(TagEnd::Paragraph) => html.push_str("</p>"),
            Event::Start(Tag::Heading { level, .. }) => {
                let _ = write!(html, "<h{}>", heading(level));
            }
            Event::End(TagEnd::Heading(level)) => {
                let _ = write!(html, "</h{}>", heading(level));
            }
            Event::Start(Tag::Strong) => html.push_str("<strong>"),
            Event::End(TagEnd::Strong) => html.push_str("</strong>"),
            Event::Start(Tag::Emphasis) => html.push_str("<em>"),
            Event::End(TagEnd::Emphasis) => html.push_str("</em>"),
            Event::Start(Tag::Strikethrough) => html.push_str("<del>"),
            Event::End(TagEnd::Strikethrough) => html.push_str("</del>"),
            Event::Start(Tag::Link { dest_url, title, .. }) => {
                let _ = write!(
                    html,
                    r#"<a href="{}" title="{}" target="_blank" rel="noopener noreferrer">"#,
                    escape(safe_url(&dest_url)),
                    escape(&title)
                );
            }
            Event::End(TagEnd::Link) => html.push_str("</a>"),
            Event::Start(Tag::List(None)) => html.push_str("<ul>"),
            Event::Start(Tag::List(Some(start))) => {
                if start == 1 {
                    html.push_str("<ol>");
                } else {
                    let _ = write!(html, r#"<ol start="{start}">"#);
                }
            }
            Event::End(TagEnd::List(false)) => html.push_str("</ul>"),
            Event::End(TagEnd::List(true)) => html.push_str("</ol>"),
            Event::Start(Tag::Item) => html.push_str("<li>"),
            Event::End(TagEnd::Item) => html.push_str("</li>"),
            Event::TaskListMarker(done) => {
                html.push_str(if done {
                    r#"<input type="checkbox" disabled checked> "#
                } else {
                    r#"<input type="checkbox" disabled> "#
                });
            }
            Event::Start(Tag::BlockQuote(_)) => html.push_str("<blockquote>"),
            Event::End(TagEnd::BlockQuote(_)) => html.push_str("</blockquote>"),
            Event::Start(Tag::Table(_)) => html.push_str(r#"<div class="markdown-table"><table>"#),
            Event::End(TagEnd::Table) => html.push_str("</table></div>"),
            Event::Start(Tag::TableHead) => html.push_str("<thead><tr>"),
            Event::End(TagEnd::TableHead) => html.push_str("</tr></thead>"),
            Event::Start(Tag::TableRow) => html.push_str("<tr>"),
            Event::End(TagEnd::TableRow) => html.push_str("</tr>"),
            Event::Start(Tag::TableCell) => html.push_str("<td>"),
            Event::End(TagEnd::TableCell) => html.push_str("</td>"),
            Event::Code(text) => {
                let _ = write!(html, "<code>{}</code>", escape(&text));
            }
            Event::Text(text) => html.push_str(&escape(&text)),
            Event::SoftBreak => html.push(if in_code_block { '\n' } else { ' ' }),
            Event::HardBreak => {
                if in_code_block {
                    html.push('\n');
                } else {
                    html.push_str("<br>");
                }
            }
            Event::Rule => html.push_str("<hr>"),
            _ => {}
        }
    }

    html
}

fn heading(level: HeadingLevel) -> u8 {
    // answers sit inside a drawer with its own title
    (level as u8).max(3)
}

/// Link targets limited to `http`, `https`, `mailto` and relative URLs;
/// anything else becomes `#`.
fn safe_url(url: &str) -> &str {
    let trimmed = url.trim_start();
    let scheme_end = trimmed.find(|c| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(i) if trimmed[i..].starts_with(':') => {
            let scheme = trimmed[..i].to_ascii_lowercase();
            if matches!(scheme.as_str(), "http" | "https" | "mailto") {
                url
            } else {
                "#"
            }
        }
        _ => url,
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = markdown_to_html("# Agenda\n\nDit is **vet** en *schuin*.");
        assert!(html.contains("<h3>Agenda</h3>"));
        assert!(html.contains("<strong>vet</strong>"));
        assert!(html.contains("<em>schuin</em>"));
    }

    #[test]
    fn test_code_block_keeps_indentation() {
        let html = markdown_to_html("```python\ndef hallo():\n    print(\"Hallo\")\n```");
        assert!(html.contains(r#"<code class="language-python">"#));
        assert!(html.contains("    print(&quot;Hallo&quot;)"));
    }

    #[test]
    fn test_raw_html_is_dropped() {
        let html = markdown_to_html("<script>alert(1)</script>\n\nTekst <b>hier</b>");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("Tekst"));
    }

    #[test]
    fn test_script_links_are_neutralized() {
        let html = markdown_to_html("[klik](javascript:alert(document.cookie))");
        assert!(html.contains(r##"<a href="#""##));
        assert!(!html.contains("javascript"));

        let html = markdown_to_html("[a](JavaScript:alert(1)) [b](data:text/html,x) [c]( vbscript:x)");
        assert!(!html.to_lowercase().contains("script:"));
        assert!(!html.contains("data:"));
    }

    #[test]
    fn test_safe_links_are_kept() {
        let html = markdown_to_html(
            "[site](https://example.nl/a?b=c) [mail](mailto:info@example.nl) [lokaal](/docs/d1) [anker](#top)",
        );
        assert!(html.contains(r#"href="https://example.nl/a?b=c""#));
        assert!(html.contains(r#"href="mailto:info@example.nl""#));
        assert!(html.contains(r#"href="/docs/d1""#));
        assert!(html.contains(r##"href="#top""##));
    }

    #[test]
    fn test_partial_answer_renders() {
        // a streamed answer can stop mid-emphasis
        let html = markdown_to_html("Het antwoord is **bijna");
        assert!(html.contains("Het antwoord is"));
    }
}
