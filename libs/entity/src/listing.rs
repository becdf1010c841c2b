use serde::Serialize;

use crate::post::PostSummary;

/// One page of the post listing. `next_page` is the cursor of the following
/// page, `None` once the listing is exhausted.
#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct PostListing {
    pub results: Vec<PostSummary>,
    pub next_page: Option<String>,
}

impl PostListing {
    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }
}
