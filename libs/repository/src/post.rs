use std::sync::Arc;

use chrono::{DateTime, Utc};
use entity::{prelude::*, reading_time};
use prismic::{
    rich_text, ContentFetcher, Document, Ordering, PostDocument,
    PostSummaryData, Predicate, Query, SearchResponse, Section,
};
use tracing::{info, warn};

use crate::{
    pagination::{PageSource, PostsPagination},
    response::{IntoResponse, Response},
    Settings,
};

const FIRST_PUBLICATION_DATE: &str = "document.first_publication_date";

#[derive(Clone, Debug)]
pub struct PostRepository {
    fetcher: Arc<dyn ContentFetcher>,
    settings: Settings,
}

impl PostRepository {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, settings: Settings) -> Self {
        Self { fetcher, settings }
    }

    fn type_predicate(&self) -> Predicate {
        Predicate::at("document.type", self.fetcher.document_type())
    }

    fn summary_fields(&self) -> Vec<String> {
        let document_type = self.fetcher.document_type();
        ["title", "subtitle", "author"]
            .iter()
            .map(|field| format!("{}.{}", document_type, field))
            .collect()
    }

    /// `preview` is the ref of an active preview session.
    pub async fn find_by_slug(
        &self,
        slug: &str,
        preview: Option<&str>,
    ) -> Response<Option<PostEntity>> {
        let document = self
            .fetcher
            .get_by_uid(slug, preview)
            .await
            .into_response("in get by uid")?;

        let words_per_minute = self.settings.words_per_minute;

        Ok(document.map(|document| build_post(document, words_per_minute)))
    }

    /// First listing page, newest posts first.
    pub async fn find_first_page(
        &self,
        preview: Option<&str>,
    ) -> Response<PostListing> {
        let query = Query::new(self.type_predicate())
            .fetch(self.summary_fields())
            .order_by(Ordering::desc(FIRST_PUBLICATION_DATE))
            .page_size(self.settings.page_size)
            .with_ref(preview);

        let response = self
            .fetcher
            .query(query)
            .await
            .into_response("in query first page")?;

        Ok(build_listing(response))
    }

    pub async fn find_next_page(&self, cursor: &str) -> Response<PostListing> {
        let response = self
            .fetcher
            .fetch_page(cursor)
            .await
            .into_response("in fetch next page")?;

        Ok(build_listing(response))
    }

    /// First listing page followed by up to `pages - 1` further pages. A page
    /// that fails to load ends the accumulation with what was loaded so far.
    pub async fn find_pages(
        &self,
        pages: usize,
        preview: Option<&str>,
    ) -> Response<PostsPagination> {
        let first = self.find_first_page(preview).await?;
        let mut pagination = PostsPagination::new(first);

        while pagination.pages_loaded() < pages && pagination.can_load_more() {
            if let Err(e) = pagination.load_more(self).await {
                warn!(
                    task = "load more posts",
                    pages_loaded = pagination.pages_loaded(),
                    error = e.to_string(),
                );
                break;
            }
        }

        Ok(pagination)
    }

    /// Posts published right before and right after `published_at`.
    pub async fn find_navigation(
        &self,
        published_at: DateTime<Utc>,
        preview: Option<&str>,
    ) -> Response<PostNavigation> {
        let previous = self
            .find_neighbour(
                Predicate::date_before(FIRST_PUBLICATION_DATE, published_at),
                Ordering::desc(FIRST_PUBLICATION_DATE),
                preview,
            )
            .await?;
        let next = self
            .find_neighbour(
                Predicate::date_after(FIRST_PUBLICATION_DATE, published_at),
                Ordering::asc(FIRST_PUBLICATION_DATE),
                preview,
            )
            .await?;

        info!(
            task = "find navigation",
            previous = previous.is_some(),
            next = next.is_some()
        );

        Ok(PostNavigation { previous, next })
    }

    /// Site path of the document a preview token was issued for.
    pub async fn resolve_preview(
        &self,
        token: &str,
        document_id: &str,
    ) -> Response<Option<String>> {
        self.fetcher
            .resolve_preview(token, document_id)
            .await
            .into_response("in resolve preview")
    }

    async fn find_neighbour(
        &self,
        predicate: Predicate,
        ordering: Ordering,
        preview: Option<&str>,
    ) -> Response<Option<NavLink>> {
        let query = Query::new(self.type_predicate())
            .and(predicate)
            .fetch([format!("{}.title", self.fetcher.document_type())])
            .order_by(ordering)
            .page_size(1)
            .with_ref(preview);

        let response = self
            .fetcher
            .query(query)
            .await
            .into_response("in query neighbour")?;

        Ok(response.results.into_iter().next().map(|document| NavLink {
            slug: slug(&document),
            title: document.data.title,
        }))
    }
}

impl PageSource for PostRepository {
    async fn next_page(&self, cursor: &str) -> Response<PostListing> {
        self.find_next_page(cursor).await
    }
}

fn slug<T>(document: &Document<T>) -> String {
    document.uid.clone().unwrap_or_else(|| document.id.clone())
}

/// Words of every heading and every body block of the content.
pub fn word_count(sections: &[Section]) -> u64 {
    sections
        .iter()
        .map(|section| {
            reading_time::section_word_count(
                section.heading.as_deref(),
                section.body.iter().map(|block| block.text.as_str()),
            )
        })
        .sum()
}

pub fn build_post(document: PostDocument, words_per_minute: u64) -> PostEntity {
    let word_count = word_count(&document.data.content);
    let slug = slug(&document);
    let data = document.data;

    PostEntity {
        slug,
        title: data.title,
        author: data.author,
        banner_url: data.banner.url,
        first_publication_date: document.first_publication_date,
        last_publication_date: document.last_publication_date,
        content: data
            .content
            .into_iter()
            .map(|section| {
                ContentSection::new(
                    section.heading,
                    rich_text::fragments(&section.body),
                )
            })
            .collect(),
        word_count,
        reading_time: ReadingTime::from_words(word_count, words_per_minute),
    }
}

pub fn build_listing(response: SearchResponse<PostSummaryData>) -> PostListing {
    PostListing {
        results: response
            .results
            .into_iter()
            .map(|document| PostSummary {
                slug: slug(&document),
                first_publication_date: document.first_publication_date,
                title: document.data.title,
                subtitle: document.data.subtitle.unwrap_or_default(),
                author: document.data.author,
            })
            .collect(),
        next_page: response.next_page,
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;
    use prismic::{fake::FakeFetcher, rich_text::RichTextBlock};

    use crate::{init_repository, pagination::LoadState};

    use super::*;

    fn day(d: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2021, 3, d, 12, 0, 0).unwrap())
    }

    fn paragraph(words: usize) -> RichTextBlock {
        RichTextBlock {
            kind: "paragraph".to_string(),
            text: vec!["word"; words].join(" "),
            ..Default::default()
        }
    }

    fn repository(fetcher: FakeFetcher, page_size: u32) -> PostRepository {
        init_repository(
            Arc::new(fetcher),
            Settings {
                page_size,
                ..Default::default()
            },
        )
        .post
    }

    fn blog() -> FakeFetcher {
        FakeFetcher::new(vec![
            FakeFetcher::post("first", "First", day(1), vec![]),
            FakeFetcher::post("second", "Second", day(2), vec![]),
            FakeFetcher::post("third", "Third", day(3), vec![]),
        ])
    }

    #[test]
    fn test_word_count_of_no_sections() {
        assert_eq!(word_count(&[]), 0);
    }

    #[test]
    fn test_reading_time_boundaries() {
        for (words, minutes) in [(0, 0), (199, 1), (200, 1), (201, 2)] {
            let document = FakeFetcher::post(
                "p",
                "P",
                day(1),
                vec![Section {
                    heading: None,
                    body: vec![paragraph(words)],
                }],
            );

            let post = build_post(document, 200);

            assert_eq!(post.word_count, words as u64);
            assert_eq!(post.reading_time.minutes(), minutes);
        }
    }

    #[test]
    fn test_build_post_counts_headings_and_flattens_sections() {
        // Arrange
        let document = FakeFetcher::post(
            "hooks",
            "Como utilizar Hooks",
            day(1),
            vec![
                Section {
                    heading: Some("Proin et varius".to_string()),
                    body: vec![paragraph(100), paragraph(50)],
                },
                Section {
                    heading: None,
                    body: vec![paragraph(48)],
                },
            ],
        );

        // Act
        let post = build_post(document, 200);

        // Assert
        assert_eq!(post.word_count, 201);
        assert_eq!(post.reading_time.to_string(), "2 min");
        assert_eq!(post.slug, "hooks");
        assert_eq!(post.content.len(), 2);
        assert_eq!(post.content[0].heading(), Some("Proin et varius"));
        assert_eq!(post.content[0].body().len(), 2);
        assert!(post.content[0].body()[0].starts_with("<p>word"));
        assert_eq!(post.content[1].heading(), None);
        assert!(!post.is_edited());
    }

    #[tokio::test]
    async fn test_find_by_slug() {
        let repository = repository(blog(), 10);

        let found = repository.find_by_slug("second", None).await.unwrap();
        let missing = repository.find_by_slug("nope", None).await.unwrap();

        assert_eq!(found.unwrap().title, "Second");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_by_slug_reads_drafts_in_preview() {
        // Arrange
        let fetcher = blog().with_preview(
            "preview-ref",
            vec![FakeFetcher::post("draft", "Draft", None, vec![])],
        );
        let repository = repository(fetcher, 10);

        // Act
        let published = repository.find_by_slug("draft", None).await.unwrap();
        let previewed = repository
            .find_by_slug("draft", Some("preview-ref"))
            .await
            .unwrap();

        // Assert
        assert!(published.is_none());
        assert_eq!(previewed.unwrap().first_publication_date, None);
    }

    #[tokio::test]
    async fn test_first_page_is_newest_first() {
        let repository = repository(blog(), 2);

        let listing = repository.find_first_page(None).await.unwrap();

        let slugs: Vec<_> =
            listing.results.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["third", "second"]);
        assert_eq!(listing.results[0].subtitle, "Third subtitle");
        assert!(listing.has_next_page());
    }

    #[tokio::test]
    async fn test_find_pages_accumulates() {
        // Arrange
        let repository = repository(blog(), 1);

        // Act
        let two = repository.find_pages(2, None).await.unwrap();
        let all = repository.find_pages(10, None).await.unwrap();

        // Assert
        assert_eq!(two.results().len(), 2);
        assert_eq!(two.state(), &LoadState::Idle);
        let slugs: Vec<_> =
            all.results().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["third", "second", "first"]);
        assert_eq!(all.state(), &LoadState::Exhausted);
        assert_eq!(all.pages_loaded(), 3);
    }

    #[tokio::test]
    async fn test_find_pages_stops_on_failure() {
        // Arrange
        let fetcher = Arc::new(blog());
        fetcher.fail_pages(true);
        let repository = PostRepository::new(
            fetcher.clone(),
            Settings {
                page_size: 1,
                ..Default::default()
            },
        );

        // Act
        let pagination = repository.find_pages(3, None).await.unwrap();

        // Assert
        assert_eq!(pagination.results().len(), 1);
        assert!(matches!(pagination.state(), LoadState::Failed(_)));
        assert_eq!(fetcher.calls(), vec!["query", "fetch_page"]);
    }

    #[tokio::test]
    async fn test_navigation_in_the_middle() {
        let repository = repository(blog(), 10);

        let navigation = repository
            .find_navigation(day(2).unwrap(), None)
            .await
            .unwrap();

        assert_eq!(navigation.previous.unwrap().slug, "first");
        assert_eq!(navigation.next.unwrap().title, "Third");
    }

    #[tokio::test]
    async fn test_navigation_at_the_edges() {
        // Arrange
        let repository = repository(blog(), 10);

        // Act
        let oldest = repository
            .find_navigation(day(1).unwrap(), None)
            .await
            .unwrap();
        let newest = repository
            .find_navigation(day(3).unwrap(), None)
            .await
            .unwrap();

        // Assert
        assert!(oldest.previous.is_none());
        assert_eq!(oldest.next.unwrap().slug, "second");
        assert_eq!(newest.previous.unwrap().slug, "second");
        assert!(newest.next.is_none());
    }

    #[tokio::test]
    async fn test_navigation_of_single_post_is_empty() {
        let repository = repository(
            FakeFetcher::new(vec![FakeFetcher::post(
                "only",
                "Only",
                day(1),
                vec![],
            )]),
            10,
        );

        let navigation = repository
            .find_navigation(day(1).unwrap(), None)
            .await
            .unwrap();

        assert!(navigation.is_empty());
    }
}
