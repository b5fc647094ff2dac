//! Markdown to HTML rendering.

use std::collections::HashSet;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::admonition::expand_admonitions;
use crate::codeblock::{fence_language, Highlighter};
use crate::slug::slugify;

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// A rendered Markdown document.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// HTML5 fragment
    pub html: String,
    /// Headings in document order
    pub toc: Vec<TocEntry>,
    /// Nested `<ul>` list of the headings, empty when there are none
    pub toc_html: String,
}

/// Errors that can occur when rendering Markdown.
#[derive(Debug, thiserror::Error)]
pub enum MarkdownError {
    #[error("Failed to highlight code block")]
    Highlight(#[from] syntect::Error),
}

/// Extensions enabled for every document.
pub fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_DEFINITION_LIST
}

/// Markdown renderer with syntax highlighting.
///
/// Loading syntect's syntax definitions is the expensive part, so build one
/// renderer per run and reuse it.
pub struct MarkdownRenderer {
    highlighter: Highlighter,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            highlighter: Highlighter::new(),
        }
    }

    /// Render a Markdown body to HTML.
    ///
    /// Headings get unique ids and a permalink, fenced code is highlighted
    /// for its declared language, and a paragraph containing only `[TOC]`
    /// is replaced by the table of contents.
    pub fn render(&self, source: &str) -> Result<Rendered, MarkdownError> {
        let source = expand_admonitions(source);
        let events: Vec<Event> = Parser::new_ext(&source, options()).collect();

        // Explicit ids are reserved up front so earlier headings can't take them.
        let mut used_ids: HashSet<String> = events
            .iter()
            .filter_map(|event| match event {
                Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
                _ => None,
            })
            .collect();

        let mut out: Vec<Event> = Vec::with_capacity(events.len());
        let mut toc = Vec::new();
        let mut toc_slots = Vec::new();

        let mut i = 0;
        while i < events.len() {
            match &events[i] {
                Event::Start(Tag::Paragraph) => {
                    if let Some(len) = toc_marker_len(&events[i + 1..]) {
                        toc_slots.push(out.len());
                        out.push(Event::Html(CowStr::Borrowed("")));
                        i += 1 + len;
                        continue;
                    }
                    out.push(events[i].clone());
                }

                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(info),
                        CodeBlockKind::Indented => None,
                    };
                    let mut code = String::new();
                    i += 1;
                    while i < events.len() {
                        match &events[i] {
                            Event::End(TagEnd::CodeBlock) => break,
                            Event::Text(text) => code.push_str(text),
                            _ => {}
                        }
                        i += 1;
                    }
                    let html = self.highlighter.highlight(&code, lang)?;
                    out.push(Event::Html(html.into()));
                }

                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => {
                    let level = *level as u8;
                    let mut text = String::new();
                    let mut inner = Vec::new();
                    i += 1;
                    while i < events.len() {
                        match &events[i] {
                            Event::End(TagEnd::Heading(_)) => break,
                            Event::Text(t) | Event::Code(t) => text.push_str(t),
                            _ => {}
                        }
                        inner.push(events[i].clone());
                        i += 1;
                    }

                    let anchor = match id {
                        Some(explicit) => explicit.to_string(),
                        None => unique_id(slugify(&text), &mut used_ids),
                    };

                    let mut open = format!(
                        "<h{} id=\"{}\"",
                        level,
                        html_escape::encode_double_quoted_attribute(&anchor)
                    );
                    if !classes.is_empty() {
                        let joined = classes.iter().map(|c| &**c).collect::<Vec<_>>().join(" ");
                        open.push_str(&format!(
                            " class=\"{}\"",
                            html_escape::encode_double_quoted_attribute(&joined)
                        ));
                    }
                    for (key, value) in attrs {
                        match value {
                            Some(value) => open.push_str(&format!(
                                " {}=\"{}\"",
                                &**key,
                                html_escape::encode_double_quoted_attribute(&**value)
                            )),
                            None => open.push_str(&format!(" {}", &**key)),
                        }
                    }
                    open.push('>');

                    out.push(Event::Html(open.into()));
                    out.extend(inner);
                    out.push(Event::Html(
                        format!(
                            "<a class=\"headerlink\" href=\"#{}\" title=\"Permanent link\"> </a></h{}>\n",
                            html_escape::encode_double_quoted_attribute(&anchor),
                            level
                        )
                        .into(),
                    ));

                    toc.push(TocEntry {
                        title: text.trim().to_string(),
                        id: anchor,
                        level,
                    });
                }

                event => out.push(event.clone()),
            }
            i += 1;
        }

        let toc_html = render_toc(&toc);
        for slot in toc_slots {
            out[slot] = Event::Html(toc_html.clone().into());
        }

        let mut html_output = String::with_capacity(source.len() * 2);
        html::push_html(&mut html_output, out.into_iter());

        Ok(Rendered {
            html: html_output,
            toc,
            toc_html,
        })
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of events up to and including the paragraph end, if the
/// paragraph holds nothing but the `[TOC]` marker.
fn toc_marker_len(events: &[Event]) -> Option<usize> {
    let mut text = String::new();
    for (n, event) in events.iter().enumerate() {
        match event {
            Event::Text(t) => text.push_str(t),
            Event::End(TagEnd::Paragraph) => return (text.trim() == "[TOC]").then_some(n + 1),
            _ => return None,
        }
    }
    None
}

/// Make `base` unique among ids already used, suffixing `_1`, `_2`, ...
fn unique_id(base: String, used: &mut HashSet<String>) -> String {
    let base = if base.is_empty() {
        "section".to_string()
    } else {
        base
    };

    let mut candidate = base.clone();
    let mut n = 1;
    while used.contains(&candidate) {
        candidate = format!("{}_{}", base, n);
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// Render headings as a nested list.
fn render_toc(entries: &[TocEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut html = String::from("<div class=\"toc\">\n");
    let mut stack: Vec<u8> = Vec::new();

    for entry in entries {
        match stack.last() {
            None => {
                html.push_str("<ul>\n");
                stack.push(entry.level);
            }
            Some(&top) if entry.level > top => {
                html.push_str("\n<ul>\n");
                stack.push(entry.level);
            }
            Some(_) => {
                html.push_str("</li>\n");
                while stack.len() > 1 && stack.last().is_some_and(|&top| entry.level < top) {
                    stack.pop();
                    html.push_str("</ul>\n</li>\n");
                }
            }
        }
        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            html_escape::encode_double_quoted_attribute(&entry.id),
            html_escape::encode_text(&entry.title)
        ));
    }

    html.push_str("</li>\n");
    while stack.len() > 1 {
        stack.pop();
        html.push_str("</ul>\n</li>\n");
    }
    html.push_str("</ul>\n</div>\n");
    html
}
