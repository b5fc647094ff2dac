//! Post dates and summaries.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A post's publication date.
///
/// Dates written without a UTC offset are placed on the UTC timeline for
/// ordering, but remember that the offset was unknown so the RFC 2822 form
/// says `-0000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostDate {
    datetime: DateTime<FixedOffset>,
    has_offset: bool,
}

impl PostDate {
    /// Parse an ISO-8601 date (`2024-06-01`) or datetime, with or without an
    /// offset (`2024-06-01T09:30:00+02:00`, `2024-06-01 09:30`).
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let normalized = normalize(input);
        let s = normalized.as_str();

        if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self {
                datetime,
                has_offset: true,
            });
        }

        for format in OFFSET_FORMATS {
            if let Ok(datetime) = DateTime::parse_from_str(s, format) {
                return Ok(Self {
                    datetime,
                    has_offset: true,
                });
            }
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self::from_naive(naive));
            }
        }

        match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Ok(Self::from_date(date)),
            Err(_) => Err(DateError::Invalid(input.to_string())),
        }
    }

    /// Midnight on `date`, offset unknown.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_naive(date.and_time(NaiveTime::MIN))
    }

    fn from_naive(naive: NaiveDateTime) -> Self {
        Self {
            datetime: naive.and_utc().fixed_offset(),
            has_offset: false,
        }
    }

    /// The instant used for ordering.
    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.datetime
    }

    /// `2024-06-01`
    pub fn iso_date(&self) -> String {
        self.datetime.format("%Y-%m-%d").to_string()
    }

    /// `Jun 01, 2024`
    pub fn human_date(&self) -> String {
        self.datetime.format("%b %d, %Y").to_string()
    }

    /// `Sat, 01 Jun 2024 00:00:00 -0000`
    pub fn rfc2822(&self) -> String {
        if self.has_offset {
            self.datetime.format("%a, %d %b %Y %H:%M:%S %z").to_string()
        } else {
            self.datetime.format("%a, %d %b %Y %H:%M:%S -0000").to_string()
        }
    }
}

/// Rewrite ISO-8601 spellings the formats above don't accept into ones they do.
fn normalize(input: &str) -> String {
    let mut s = input.trim().to_string();

    if s.get(10..11) == Some("t") {
        s.replace_range(10..11, "T");
    }
    if s.len() > 10 && (s.ends_with('Z') || s.ends_with('z')) {
        s.pop();
        s.push_str("+00:00");
    }
    if s.len() == 13 && matches!(s.get(10..11), Some("T" | " ")) {
        s.push_str(":00");
    }

    s
}

impl Serialize for PostDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.datetime.to_rfc3339())
    }
}

/// Errors that can occur when parsing a date.
#[derive(Debug, thiserror::Error)]
pub enum DateError {
    #[error("Invalid date {0:?}: expected an ISO-8601 date or datetime")]
    Invalid(String),
}

/// What the index and the feed know about a post.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub title: String,
    pub slug: String,
    pub date: PostDate,
    pub iso_date: String,
    pub human_date: String,
    pub rfc2822: String,
    pub description: String,
    pub word_count: usize,
    pub reading_time: usize,
}

impl PostSummary {
    pub fn new(
        title: String,
        slug: String,
        date: PostDate,
        description: String,
        word_count: usize,
        reading_time: usize,
    ) -> Self {
        Self {
            iso_date: date.iso_date(),
            human_date: date.human_date(),
            rfc2822: date.rfc2822(),
            title,
            slug,
            date,
            description,
            word_count,
            reading_time,
        }
    }
}

/// Sort newest first. Equal dates keep their input order.
pub fn sort_newest_first(posts: &mut [PostSummary]) {
    posts.sort_by(|a, b| b.date.datetime().cmp(&a.date.datetime()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(title: &str, date: &str) -> PostSummary {
        PostSummary::new(
            title.to_string(),
            title.to_lowercase(),
            PostDate::parse(date).unwrap(),
            String::new(),
            0,
            1,
        )
    }

    #[test]
    fn parses_plain_date() {
        let date = PostDate::parse("2023-02-01").unwrap();

        assert_eq!(date.iso_date(), "2023-02-01");
        assert_eq!(date.human_date(), "Feb 01, 2023");
        assert_eq!(date.rfc2822(), "Wed, 01 Feb 2023 00:00:00 -0000");
    }

    #[test]
    fn parses_naive_datetimes() {
        for input in [
            "2024-06-01T09:30:00",
            "2024-06-01 09:30:00",
            "2024-06-01T09:30",
            "2024-06-01 09:30",
            "2024-06-01T09:30:00.250",
            "2024-06-01t09:30:00",
        ] {
            let date = PostDate::parse(input).unwrap();
            assert_eq!(date.iso_date(), "2024-06-01", "{}", input);
            assert_eq!(date.rfc2822(), "Sat, 01 Jun 2024 09:30:00 -0000", "{}", input);
        }
    }

    #[test]
    fn parses_hour_only_datetime() {
        let date = PostDate::parse("2024-06-01T09").unwrap();

        assert_eq!(date.rfc2822(), "Sat, 01 Jun 2024 09:00:00 -0000");
    }

    #[test]
    fn keeps_explicit_offsets() {
        let date = PostDate::parse("2024-06-01T09:30:00+02:00").unwrap();
        assert_eq!(date.rfc2822(), "Sat, 01 Jun 2024 09:30:00 +0200");

        let utc = PostDate::parse("2024-06-01T09:30:00Z").unwrap();
        assert_eq!(utc.rfc2822(), "Sat, 01 Jun 2024 09:30:00 +0000");

        for input in ["2024-06-01T09:30Z", "2024-06-01T09:30:00z", "2024-06-01t09:30:00Z"] {
            let zulu = PostDate::parse(input).unwrap();
            assert_eq!(zulu.rfc2822(), "Sat, 01 Jun 2024 09:30:00 +0000", "{}", input);
        }

        let spaced = PostDate::parse("2024-06-01 09:30:00+02:00").unwrap();
        assert_eq!(spaced, date);
    }

    #[test]
    fn rejects_garbage() {
        for input in ["yesterday", "2024-13-01", "01/02/2024", ""] {
            assert!(
                matches!(PostDate::parse(input), Err(DateError::Invalid(_))),
                "{}",
                input
            );
        }
    }

    #[test]
    fn sorts_newest_first() {
        let mut posts = vec![summary("January", "2024-01-01"), summary("June", "2024-06-01")];

        sort_newest_first(&mut posts);

        assert_eq!(posts[0].title, "June");
        assert_eq!(posts[1].title, "January");
    }

    #[test]
    fn sort_is_stable_for_equal_dates() {
        let mut posts = vec![
            summary("A", "2024-01-01"),
            summary("B", "2024-01-01"),
            summary("C", "2024-03-01"),
        ];

        sort_newest_first(&mut posts);

        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn compares_instants_across_offsets() {
        let mut posts = vec![
            summary("Early", "2024-01-01T10:00:00+02:00"),
            summary("Late", "2024-01-01T09:00:00"),
        ];

        sort_newest_first(&mut posts);

        assert_eq!(posts[0].title, "Late");
    }
}
