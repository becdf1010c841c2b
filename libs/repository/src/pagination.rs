use std::future::Future;

use entity::prelude::*;

use crate::Response;

/// Something able to fetch the listing page a cursor refers to.
pub trait PageSource {
    fn next_page(
        &self,
        cursor: &str,
    ) -> impl Future<Output = Response<PostListing>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// More pages exist and none is being fetched.
    Idle,
    Loading,
    /// The last fetched page had no cursor.
    Exhausted,
    /// The last fetch failed; items and cursor are those from before it.
    Failed(String),
}

/// Post listing grown page by page through "load more".
#[derive(Debug, Clone, PartialEq)]
pub struct PostsPagination {
    results: Vec<PostSummary>,
    next_page: Option<String>,
    state: LoadState,
    pages_loaded: usize,
}

impl PostsPagination {
    pub fn new(first: PostListing) -> Self {
        let state = if first.has_next_page() {
            LoadState::Idle
        } else {
            LoadState::Exhausted
        };

        Self {
            results: first.results,
            next_page: first.next_page,
            state,
            pages_loaded: 1,
        }
    }

    pub fn results(&self) -> &[PostSummary] {
        &self.results
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// Whether the "load more" affordance should be offered.
    pub fn can_load_more(&self) -> bool {
        self.next_page.is_some() && self.state != LoadState::Loading
    }

    /// Enters `Loading` and hands out the cursor to fetch. `None` when there
    /// is nothing to load or a fetch is already in flight.
    pub fn begin_load(&mut self) -> Option<String> {
        if !self.can_load_more() {
            return None;
        }
        self.state = LoadState::Loading;
        self.next_page.clone()
    }

    /// Applies the outcome of the fetch started by [`Self::begin_load`].
    pub fn complete(&mut self, result: Response<PostListing>) -> Response<()> {
        match result {
            Ok(page) => {
                self.results.extend(page.results);
                self.next_page = page.next_page;
                self.pages_loaded += 1;
                self.state = if self.next_page.is_some() {
                    LoadState::Idle
                } else {
                    LoadState::Exhausted
                };
                Ok(())
            }
            Err(e) => {
                self.state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetches and appends the next page. `Ok(false)` when no fetch was
    /// issued.
    pub async fn load_more<S: PageSource>(
        &mut self,
        source: &S,
    ) -> Response<bool> {
        let Some(cursor) = self.begin_load() else {
            return Ok(false);
        };

        let result = source.next_page(&cursor).await;
        self.complete(result)?;

        Ok(true)
    }

    pub fn into_listing(self) -> PostListing {
        PostListing {
            results: self.results,
            next_page: self.next_page,
        }
    }
}

#[cfg(test)]
mod test {
    use std::{collections::HashMap, sync::Mutex};

    use prismic::PrismicError;

    use crate::RepositoryError;

    use super::*;

    #[derive(Default)]
    struct Pages {
        pages: HashMap<String, PostListing>,
        requested: Mutex<Vec<String>>,
    }

    impl PageSource for Pages {
        async fn next_page(&self, cursor: &str) -> Response<PostListing> {
            self.requested.lock().unwrap().push(cursor.to_string());
            self.pages.get(cursor).cloned().ok_or_else(|| {
                RepositoryError::InPrismicErr {
                    message: "in fetch next page".to_string(),
                    source: PrismicError::ForeignCursor {
                        cursor: cursor.to_string(),
                    },
                }
            })
        }
    }

    fn listing(slugs: &[&str], next_page: Option<&str>) -> PostListing {
        PostListing {
            results: slugs
                .iter()
                .map(|slug| PostSummary {
                    slug: slug.to_string(),
                    ..Default::default()
                })
                .collect(),
            next_page: next_page.map(ToString::to_string),
        }
    }

    fn slugs(pagination: &PostsPagination) -> Vec<&str> {
        pagination.results().iter().map(|p| p.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn test_pages_are_appended_in_order() {
        // Arrange
        let source = Pages {
            pages: HashMap::from([
                ("page-2".to_string(), listing(&["3", "4"], Some("page-3"))),
                ("page-3".to_string(), listing(&["5"], None)),
            ]),
            ..Default::default()
        };
        let mut pagination =
            PostsPagination::new(listing(&["1", "2"], Some("page-2")));

        // Act
        let second = pagination.load_more(&source).await.unwrap();
        let after_second = slugs(&pagination)
            .into_iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        let third = pagination.load_more(&source).await.unwrap();

        // Assert
        assert!(second && third);
        assert_eq!(after_second, vec!["1", "2", "3", "4"]);
        assert_eq!(slugs(&pagination), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(pagination.pages_loaded(), 3);
        assert_eq!(pagination.state(), &LoadState::Exhausted);
        assert!(!pagination.can_load_more());
    }

    #[tokio::test]
    async fn test_no_fetch_without_cursor() {
        let source = Pages::default();
        let mut pagination = PostsPagination::new(listing(&["1"], None));

        let loaded = pagination.load_more(&source).await.unwrap();

        assert!(!loaded);
        assert_eq!(pagination.state(), &LoadState::Exhausted);
        assert!(source.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let source = Pages {
            pages: HashMap::from([(
                "next".to_string(),
                listing(&["2", "3"], None),
            )]),
            ..Default::default()
        };
        let mut pagination =
            PostsPagination::new(listing(&["1", "2"], Some("next")));

        pagination.load_more(&source).await.unwrap();

        assert_eq!(slugs(&pagination), vec!["1", "2", "2", "3"]);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_items_and_cursor() {
        // Arrange
        let source = Pages::default();
        let mut pagination =
            PostsPagination::new(listing(&["1"], Some("broken")));

        // Act
        let result = pagination.load_more(&source).await;

        // Assert
        assert!(result.is_err());
        assert!(matches!(pagination.state(), LoadState::Failed(_)));
        assert_eq!(slugs(&pagination), vec!["1"]);
        assert_eq!(pagination.next_page(), Some("broken"));
        assert!(pagination.can_load_more());
    }

    #[test]
    fn test_begin_load_is_exclusive() {
        // Arrange
        let mut pagination =
            PostsPagination::new(listing(&["1"], Some("next")));

        // Act
        let first = pagination.begin_load();
        let second = pagination.begin_load();

        // Assert
        assert_eq!(first.as_deref(), Some("next"));
        assert_eq!(second, None);
        assert_eq!(pagination.state(), &LoadState::Loading);
        assert!(!pagination.can_load_more());

        pagination.complete(Ok(listing(&["2"], None))).unwrap();
        assert_eq!(pagination.state(), &LoadState::Exhausted);
        assert_eq!(pagination.into_listing(), listing(&["1", "2"], None));
    }
}
