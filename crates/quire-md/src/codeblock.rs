//! Fenced code block highlighting.

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// CSS class on the wrapper around every code block.
pub const CODE_CLASS: &str = "codehilite";

/// Language declared on a code fence.
///
/// Takes the first word of the info string, so `rust,ignore` and
/// `{.python}` both resolve. Returns `None` for a bare fence.
pub fn fence_language(info: &str) -> Option<&str> {
    let first = info.split_whitespace().next()?;
    let first = first.split(',').next().unwrap_or(first);
    let lang = first.trim_matches(|c| c == '{' || c == '}' || c == '.');

    if lang.is_empty() {
        None
    } else {
        Some(lang)
    }
}

/// Class-based syntax highlighter.
///
/// The declared language is looked up as-is; nothing is ever guessed from the
/// code itself.
pub struct Highlighter {
    syntax_set: SyntaxSet,
}

impl Highlighter {
    /// Create a highlighter with syntect's bundled syntaxes.
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Render a code block to HTML.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> Result<String, syntect::Error> {
        let body = match lang.and_then(|l| self.syntax_set.find_syntax_by_token(l)) {
            Some(syntax) => {
                let mut generator = ClassedHTMLGenerator::new_with_class_style(
                    syntax,
                    &self.syntax_set,
                    ClassStyle::Spaced,
                );
                for line in LinesWithEndings::from(code) {
                    generator.parse_html_for_line_which_includes_newline(line)?;
                }
                generator.finalize()
            }
            None => html_escape::encode_text(code).into_owned(),
        };

        let class = match lang {
            Some(l) => format!(
                " class=\"language-{}\"",
                html_escape::encode_double_quoted_attribute(l)
            ),
            None => String::new(),
        };

        Ok(format!(
            "<div class=\"{}\"><pre><code{}>{}</code></pre></div>\n",
            CODE_CLASS, class, body
        ))
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}
