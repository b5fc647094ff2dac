//! Template engine for rendering pages and the feed.

use std::path::Path;

use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, Output, State, UndefinedBehavior};
use serde::Serialize;

use quire_md::TocEntry;

use crate::config::{Link, SiteConfig};
use crate::post::PostSummary;

/// Template for posts and the about page.
pub const POST_TEMPLATE: &str = "post.html";
/// Template for the home page.
pub const INDEX_TEMPLATE: &str = "index.html";
/// Template for the RSS feed.
pub const FEED_TEMPLATE: &str = "feed.xml";

/// Values every page can use.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext<'a> {
    pub base_url: &'a str,
    pub site_name: &'a str,
    pub author: &'a str,
    pub tagline: &'a str,
    pub year: i32,
}

impl<'a> SiteContext<'a> {
    pub fn new(site: &'a SiteConfig, year: i32) -> Self {
        Self {
            base_url: &site.base_url,
            site_name: &site.site_name,
            author: &site.author,
            tagline: &site.tagline,
            year,
        }
    }
}

/// Context for `post.html`.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext<'a> {
    #[serde(flatten)]
    pub site: SiteContext<'a>,
    pub title: String,
    pub description: &'a str,
    /// Rendered body HTML
    pub content: &'a str,
    pub toc: &'a [TocEntry],
    pub toc_html: &'a str,
    /// Empty on the about page
    pub iso_date: String,
    pub human_date: String,
    /// `none` on the about page
    pub word_count: Option<usize>,
    pub reading_time: Option<usize>,
}

/// Context for `index.html`.
#[derive(Debug, Clone, Serialize)]
pub struct IndexContext<'a> {
    #[serde(flatten)]
    pub site: SiteContext<'a>,
    pub title: &'a str,
    pub description: &'a str,
    pub posts: &'a [PostSummary],
    pub work_links: &'a [Link],
    pub other_links: &'a [Link],
}

/// Context for `feed.xml`.
#[derive(Debug, Clone, Serialize)]
pub struct FeedContext<'a> {
    #[serde(flatten)]
    pub site: SiteContext<'a>,
    pub description: &'a str,
    pub posts: &'a [PostSummary],
    /// Date of the newest post, empty without posts
    pub build_date: &'a str,
}

/// Template engine using minijinja.
///
/// HTML and XML templates auto-escape, block tags swallow their own line,
/// and referencing an undefined variable is an error.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Load templates on demand from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let mut env = Self::environment();
        env.set_loader(minijinja::path_loader(dir));
        Self { env }
    }

    /// Use the built-in default templates.
    #[cfg(test)]
    pub(crate) fn with_defaults() -> Self {
        let mut env = Self::environment();
        for &(name, source) in DEFAULT_TEMPLATES {
            env.add_template(name, source)
                .expect("default templates are valid");
        }
        Self { env }
    }

    fn environment() -> Environment<'static> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|name| match name.rsplit('.').next() {
            Some("html") | Some("htm") | Some("xml") => AutoEscape::Html,
            _ => AutoEscape::None,
        });
        env.set_formatter(markup_formatter);
        env
    }

    /// Render the named template.
    pub fn render<S: Serialize>(&self, template: &str, context: &S) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;
        tmpl.render(context)
    }
}

/// Escape `& < > " '` in markup templates and leave `/` alone, so URLs stay
/// readable in the output.
fn markup_formatter(out: &mut Output, state: &State, value: &Value) -> Result<(), minijinja::Error> {
    if !matches!(state.auto_escape(), AutoEscape::Html)
        || value.is_safe()
        || value.is_none()
        || value.is_undefined()
    {
        return minijinja::escape_formatter(out, state, value);
    }
    out.write_str(&html_escape::encode_quoted_attribute(&value.to_string()))?;
    Ok(())
}

/// Built-in templates, also written out by `quire init`.
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (POST_TEMPLATE, DEFAULT_POST_TEMPLATE),
    (INDEX_TEMPLATE, DEFAULT_INDEX_TEMPLATE),
    (FEED_TEMPLATE, DEFAULT_FEED_TEMPLATE),
];

pub const DEFAULT_POST_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <meta name="description" content="{{ description }}">
  <meta name="author" content="{{ author }}">
  <link rel="stylesheet" href="{{ base_url }}/styles.css">
  <link rel="alternate" type="application/rss+xml" title="{{ site_name }}" href="{{ base_url }}/feed.xml">
</head>
<body>
  <header class="site-header">
    <a href="{{ base_url }}/" class="site-name">{{ site_name }}</a>
    {% if tagline %}
    <p class="tagline">{{ tagline }}</p>
    {% endif %}
  </header>
  <main>
    <article class="post">
      {% if iso_date %}
      <p class="post-meta">
        <time datetime="{{ iso_date }}">{{ human_date }}</time>
        {% if reading_time %}
        &middot; {{ reading_time }} min read ({{ word_count }} words)
        {% endif %}
      </p>
      {% endif %}
      {% if toc | length > 2 %}
      <nav class="post-toc">
        {{ toc_html | safe }}
      </nav>
      {% endif %}
      {{ content | safe }}
    </article>
  </main>
  <footer class="site-footer">&copy; {{ year }} {{ author }}</footer>
</body>
</html>
"##;

pub const DEFAULT_INDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <meta name="description" content="{{ description }}">
  <meta name="author" content="{{ author }}">
  <link rel="stylesheet" href="{{ base_url }}/styles.css">
  <link rel="alternate" type="application/rss+xml" title="{{ site_name }}" href="{{ base_url }}/feed.xml">
</head>
<body>
  <header class="site-header">
    <a href="{{ base_url }}/" class="site-name">{{ site_name }}</a>
    {% if tagline %}
    <p class="tagline">{{ tagline }}</p>
    {% endif %}
    <nav><a href="{{ base_url }}/about.html">About</a></nav>
  </header>
  <main>
    {% if description %}
    <p class="description">{{ description }}</p>
    {% endif %}
    <section class="posts">
      <h2>Posts</h2>
      {% if posts %}
      <ul class="post-list">
        {% for post in posts %}
        <li>
          <time datetime="{{ post.iso_date }}">{{ post.human_date }}</time>
          <a href="{{ base_url }}/posts/{{ post.slug }}.html">{{ post.title }}</a>
          {% if post.description %}
          <p>{{ post.description }}</p>
          {% endif %}
        </li>
        {% endfor %}
      </ul>
      {% else %}
      <p class="empty">Nothing here yet.</p>
      {% endif %}
    </section>
    {% if work_links %}
    <section class="links">
      <h2>Work</h2>
      <ul>
        {% for link in work_links %}
        <li><a href="{{ link.url }}">{{ link.label }}</a>{% if link.description %} &ndash; {{ link.description }}{% endif %}</li>
        {% endfor %}
      </ul>
    </section>
    {% endif %}
    {% if other_links %}
    <section class="links">
      <h2>Elsewhere</h2>
      <ul>
        {% for link in other_links %}
        <li><a href="{{ link.url }}">{{ link.label }}</a>{% if link.description %} &ndash; {{ link.description }}{% endif %}</li>
        {% endfor %}
      </ul>
    </section>
    {% endif %}
  </main>
  <footer class="site-footer">&copy; {{ year }} {{ author }}</footer>
</body>
</html>
"##;

pub const DEFAULT_FEED_TEMPLATE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
<channel>
  <title>{{ site_name }}</title>
  <link>{{ base_url }}/</link>
  <description>{{ description }}</description>
  <atom:link href="{{ base_url }}/feed.xml" rel="self" type="application/rss+xml"/>
  {% if build_date %}
  <lastBuildDate>{{ build_date }}</lastBuildDate>
  {% endif %}
  {% for post in posts %}
  <item>
    <title>{{ post.title }}</title>
    <link>{{ base_url }}/posts/{{ post.slug }}.html</link>
    <guid isPermaLink="true">{{ base_url }}/posts/{{ post.slug }}.html</guid>
    <pubDate>{{ post.rfc2822 }}</pubDate>
    <description>{{ post.description }}</description>
  </item>
  {% endfor %}
</channel>
</rss>
"##;
