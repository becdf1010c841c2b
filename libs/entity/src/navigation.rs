use serde::Serialize;

#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct NavLink {
    pub slug: String,
    pub title: String,
}

/// Chronological neighbours of a post.
#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct PostNavigation {
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

impl PostNavigation {
    pub fn is_empty(&self) -> bool {
        self.previous.is_none() && self.next.is_none()
    }
}
