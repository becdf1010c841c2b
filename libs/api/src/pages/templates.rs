use askama::Template;
use entity::prelude::{PostSummaryView, PostView};

use crate::config::Comments;

use super::labels::Labels;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub labels: &'a Labels,
    pub site_name: &'a str,
    pub title: &'a str,
    pub preview: bool,
    pub posts: Vec<PostSummaryView>,
    /// "load more" target, only while pages remain
    pub next: Option<String>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate<'a> {
    pub labels: &'a Labels,
    pub site_name: &'a str,
    pub title: &'a str,
    pub preview: bool,
    pub post: &'a PostView,
    pub comments: &'a Comments,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate<'a> {
    pub labels: &'a Labels,
    pub site_name: &'a str,
    pub title: &'a str,
    pub preview: bool,
}
