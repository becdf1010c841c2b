use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::reading_time::ReadingTime;

#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub banner_url: Option<String>,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub last_publication_date: Option<DateTime<Utc>>,
    pub content: Vec<ContentSection>,
    pub word_count: u64,
    pub reading_time: ReadingTime,
}

impl Post {
    /// A post counts as edited only when both timestamps are known and differ.
    pub fn is_edited(&self) -> bool {
        matches!(
            (self.first_publication_date, self.last_publication_date),
            (Some(first), Some(last)) if first != last
        )
    }
}

/// A block of article content. Body entries are rendered HTML fragments.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentSection {
    Titled { heading: String, body: Vec<String> },
    Untitled { body: Vec<String> },
}

impl ContentSection {
    /// Blank headings are treated as absent.
    pub fn new(heading: Option<String>, body: Vec<String>) -> Self {
        match heading {
            Some(heading) if !heading.trim().is_empty() => {
                ContentSection::Titled { heading, body }
            }
            _ => ContentSection::Untitled { body },
        }
    }

    pub fn heading(&self) -> Option<&str> {
        match self {
            ContentSection::Titled { heading, .. } => Some(heading),
            ContentSection::Untitled { .. } => None,
        }
    }

    pub fn body(&self) -> &[String] {
        match self {
            ContentSection::Titled { body, .. }
            | ContentSection::Untitled { body } => body,
        }
    }
}

#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub first_publication_date: Option<DateTime<Utc>>,
}
