//! Markdown toolkit for quire.
//!
//! Splits documents into YAML front matter and body, renders Markdown to
//! HTML5 with highlighting, heading anchors, admonitions and a table of
//! contents, and estimates reading time.

pub mod admonition;
pub mod codeblock;
pub mod frontmatter;
pub mod markdown;
pub mod reading;
pub mod slug;

pub use frontmatter::{extract_frontmatter, FrontMatter, FrontmatterError};
pub use markdown::{MarkdownError, MarkdownRenderer, Rendered, TocEntry};
pub use reading::{reading_time, ReadingTime};
pub use slug::slugify;
