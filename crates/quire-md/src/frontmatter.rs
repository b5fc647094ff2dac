//! Front matter extraction and parsing.

use serde::{Deserialize, Deserializer, Serialize};

/// Metadata block at the top of a post or page.
///
/// Every field is optional; callers decide the fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Display title
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Output file stem override
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// ISO-8601 date or datetime, kept as written
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Summary used by the index, the feed and `<meta name="description">`
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Accept any YAML scalar and keep its textual form.
///
/// `date: 2023-01-01` and `title: 1984` both land here as strings.
fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_yaml::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar value, found {:?}",
            other
        ))),
    }
}

/// Extract front matter from a Markdown document.
///
/// Returns the parsed metadata and the body. A document that does not open
/// with `---` has empty metadata and is returned whole as the body.
pub fn extract_frontmatter(source: &str) -> Result<(FrontMatter, &str), FrontmatterError> {
    if !source.starts_with("---") {
        return Ok((FrontMatter::default(), source));
    }

    // Find the closing ---
    let after_open = &source[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let frontmatter = if yaml_content.is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((frontmatter, remaining.trim()))
}

/// Errors that can occur when parsing front matter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed front matter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in front matter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Hello, World
slug: hello
date: 2024-06-01
description: First post
---

# Hello
"#;

        let (fm, body) = extract_frontmatter(source).unwrap();

        assert_eq!(fm.title.as_deref(), Some("Hello, World"));
        assert_eq!(fm.slug.as_deref(), Some("hello"));
        assert_eq!(fm.date.as_deref(), Some("2024-06-01"));
        assert_eq!(fm.description.as_deref(), Some("First post"));
        assert_eq!(body, "# Hello");
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo front matter here.\n";

        let (fm, body) = extract_frontmatter(source).unwrap();

        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, source);
    }

    #[test]
    fn empty_block_is_empty_metadata() {
        let (fm, body) = extract_frontmatter("---\n---\nbody").unwrap();

        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "body");
    }

    #[test]
    fn keeps_numeric_scalars_as_text() {
        let (fm, _) = extract_frontmatter("---\ntitle: 1984\ndate: 2023\n---\n").unwrap();

        assert_eq!(fm.title.as_deref(), Some("1984"));
        assert_eq!(fm.date.as_deref(), Some("2023"));
    }

    #[test]
    fn ignores_unknown_keys() {
        let (fm, _) = extract_frontmatter("---\ntitle: A\ntags: [x, y]\n---\n").unwrap();

        assert_eq!(fm.title.as_deref(), Some("A"));
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let result = extract_frontmatter("---\ntitle: Test\n# No closing");

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let result = extract_frontmatter("---\ntitle: [invalid yaml\n---\n");

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn errors_on_non_scalar_field() {
        let result = extract_frontmatter("---\ntitle:\n  nested: true\n---\n");

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn reserialized_block_parses_back() {
        let source = "---\ntitle: Round trip\ndate: 2024-01-01T10:00:00\n---\n\nSome *body* text.\n";
        let (fm, body) = extract_frontmatter(source).unwrap();

        let rebuilt = format!("---\n{}---\n{}", serde_yaml::to_string(&fm).unwrap(), body);
        let (fm2, body2) = extract_frontmatter(&rebuilt).unwrap();

        assert_eq!(fm2, fm);
        assert_eq!(body2, body);
    }
}
