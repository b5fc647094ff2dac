//! Admonition blocks.
//!
//! ```text
//! !!! warning "Mind the gap"
//!     Indented body, parsed as Markdown.
//! ```
//!
//! is rewritten into raw HTML wrappers around the dedented body before the
//! Markdown parser sees it, so the body keeps full Markdown support.

use std::sync::LazyLock;

use regex::Regex;

static OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^!!!\s+([\w-]+(?:\s+[\w-]+)*)(?:\s+"([^"]*)")?\s*$"#)
        .expect("valid admonition pattern")
});

/// Rewrite every top-level `!!!` block in `source`.
pub fn expand_admonitions(source: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let mut out = String::with_capacity(source.len());
    let mut fence: Option<&str> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(marker) = fence_marker(line) {
            match fence {
                None => fence = Some(marker),
                Some(open) if line.trim_start().starts_with(open) => fence = None,
                Some(_) => {}
            }
        }

        let caps = match fence {
            None => OPENER.captures(line),
            Some(_) => None,
        };
        let Some(caps) = caps else {
            out.push_str(line);
            out.push('\n');
            i += 1;
            continue;
        };

        let classes = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
        let kind = caps[1].split_whitespace().next().unwrap_or_default();
        let title = match caps.get(2) {
            Some(t) => t.as_str().to_string(),
            None => capitalize(kind),
        };

        // Body: indented or blank lines following the opener.
        let mut body = Vec::new();
        i += 1;
        while i < lines.len() {
            let next = lines[i];
            if next.trim().is_empty() {
                body.push("");
            } else if let Some(rest) = dedent(next) {
                body.push(rest);
            } else {
                break;
            }
            i += 1;
        }
        while body.last() == Some(&"") {
            body.pop();
        }

        out.push_str(&format!(
            "<div class=\"admonition {}\">\n",
            html_escape::encode_double_quoted_attribute(&classes)
        ));
        if !title.is_empty() {
            out.push_str(&format!(
                "<p class=\"admonition-title\">{}</p>\n",
                html_escape::encode_text(&title)
            ));
        }
        out.push('\n');
        out.push_str(&expand_admonitions(&body.join("\n")));
        out.push_str("\n</div>\n\n");
    }

    out
}

/// Code fence opener/closer on this line, if any.
fn fence_marker(line: &str) -> Option<&'static str> {
    // Four columns of indentation make an indented code block, not a fence.
    if dedent(line).is_some() {
        return None;
    }
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// Strip one level of indentation (four spaces or a tab).
fn dedent(line: &str) -> Option<&str> {
    line.strip_prefix("    ").or_else(|| line.strip_prefix('\t'))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
