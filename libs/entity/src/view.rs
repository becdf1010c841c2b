use serde::Serialize;

use crate::{
    date::DateFormatter,
    navigation::PostNavigation,
    post::{ContentSection, Post, PostSummary},
};

/// Listing entry with its date already formatted.
#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct PostSummaryView {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub published_at: String,
}

impl PostSummaryView {
    pub fn new(summary: PostSummary, formatter: &DateFormatter) -> Self {
        Self {
            published_at: summary
                .first_publication_date
                .map(|date| formatter.date(date))
                .unwrap_or_default(),
            slug: summary.slug,
            title: summary.title,
            subtitle: summary.subtitle,
            author: summary.author,
        }
    }
}

/// Display-ready article.
#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub banner_url: Option<String>,
    pub published_at: String,
    pub edited_note: String,
    pub reading_time: String,
    pub sections: Vec<ContentSection>,
    pub navigation: PostNavigation,
}

impl PostView {
    pub fn new(
        post: Post,
        navigation: PostNavigation,
        formatter: &DateFormatter,
    ) -> Self {
        Self {
            published_at: post
                .first_publication_date
                .map(|date| formatter.date(date))
                .unwrap_or_default(),
            edited_note: formatter.edited_note(
                post.first_publication_date,
                post.last_publication_date,
            ),
            reading_time: post.reading_time.to_string(),
            slug: post.slug,
            title: post.title,
            author: post.author,
            banner_url: post.banner_url,
            sections: post.content,
            navigation,
        }
    }

    pub fn is_edited(&self) -> bool {
        !self.edited_note.is_empty()
    }
}
