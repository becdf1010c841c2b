use entity::prelude::{ContentSection, PostSummaryView, PostView};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub published_at: String,
}

impl From<PostSummaryView> for PostSummary {
    fn from(view: PostSummaryView) -> Self {
        Self {
            slug: view.slug,
            title: view.title,
            subtitle: view.subtitle,
            author: view.author,
            published_at: view.published_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct GetPostsResponse {
    pub posts: Vec<PostSummary>,
    pub pages: usize,
    pub has_more: bool,
    /// Listing with one more page, absent once the last page is loaded
    pub next: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct Section {
    pub heading: Option<String>,
    /// HTML fragments
    pub body: Vec<String>,
}

impl From<ContentSection> for Section {
    fn from(section: ContentSection) -> Self {
        match section {
            ContentSection::Titled { heading, body } => Self {
                heading: Some(heading),
                body,
            },
            ContentSection::Untitled { body } => Self {
                heading: None,
                body,
            },
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct NavLink {
    pub slug: String,
    pub title: String,
}

impl From<entity::prelude::NavLink> for NavLink {
    fn from(link: entity::prelude::NavLink) -> Self {
        Self {
            slug: link.slug,
            title: link.title,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct Navigation {
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

#[derive(Serialize, ToSchema)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub banner_url: Option<String>,
    pub published_at: String,
    pub edited_note: String,
    pub reading_time: String,
    pub sections: Vec<Section>,
    pub navigation: Navigation,
}

impl From<PostView> for Post {
    fn from(view: PostView) -> Self {
        Self {
            slug: view.slug,
            title: view.title,
            author: view.author,
            banner_url: view.banner_url,
            published_at: view.published_at,
            edited_note: view.edited_note,
            reading_time: view.reading_time,
            sections: view.sections.into_iter().map(Section::from).collect(),
            navigation: Navigation {
                previous: view.navigation.previous.map(NavLink::from),
                next: view.navigation.next.map(NavLink::from),
            },
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct GetPostResponse {
    pub post: Post,
    pub preview: bool,
}
