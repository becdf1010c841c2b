//! In-memory [`ContentFetcher`] evaluating queries the way the search API does.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering as AtomicOrdering},
        Mutex,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use crate::{
    document::{
        Document, Image, PostData, PostDocument, PostSummaryData,
        SearchResponse, Section,
    },
    link,
    predicate::{Predicate, Query},
    ContentFetcher, PrismicError,
};

const CURSOR_PREFIX: &str = "fake://cursor/";

#[derive(Debug, Default)]
pub struct FakeFetcher {
    published: Vec<PostDocument>,
    previews: HashMap<String, Vec<PostDocument>>,
    cursors: Mutex<HashMap<String, (Query, usize)>>,
    fail_pages: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(published: Vec<PostDocument>) -> Self {
        Self {
            published,
            ..Default::default()
        }
    }

    /// Documents only visible when reading at `token`.
    pub fn with_preview(
        mut self,
        token: impl Into<String>,
        drafts: Vec<PostDocument>,
    ) -> Self {
        self.previews.insert(token.into(), drafts);
        self
    }

    /// Makes every following `fetch_page` call fail.
    pub fn fail_pages(&self, fail: bool) {
        self.fail_pages.store(fail, AtomicOrdering::SeqCst);
    }

    /// Names of the trait methods called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn post(
        uid: &str,
        title: &str,
        first_publication_date: Option<DateTime<Utc>>,
        content: Vec<Section>,
    ) -> PostDocument {
        Document {
            id: format!("id-{uid}"),
            uid: Some(uid.to_string()),
            document_type: "posts".to_string(),
            first_publication_date,
            last_publication_date: first_publication_date,
            data: PostData {
                title: title.to_string(),
                subtitle: Some(format!("{title} subtitle")),
                author: "Joseph Oliveira".to_string(),
                banner: Image {
                    url: Some(format!("https://images.example.com/{uid}.png")),
                    alt: None,
                },
                content,
            },
        }
    }

    fn record(&self, call: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_string());
        }
    }

    fn documents(&self, reference: Option<&str>) -> Vec<PostDocument> {
        let drafts = reference
            .and_then(|reference| self.previews.get(reference))
            .cloned()
            .unwrap_or_default();

        let draft_ids: Vec<String> =
            drafts.iter().map(|draft| draft.id.clone()).collect();

        self.published
            .iter()
            .filter(|post| !draft_ids.contains(&post.id))
            .cloned()
            .chain(drafts)
            .collect()
    }

    /// Refs other than the master one must belong to a known preview, the
    /// way the API answers 4xx for an expired ref.
    fn check_ref(&self, reference: Option<&str>) -> Result<(), PrismicError> {
        match reference {
            Some(reference) if !self.previews.contains_key(reference) => {
                Err(PrismicError::FailedStatusCode {
                    status_code: StatusCode::BAD_REQUEST,
                    message: format!("unknown ref: {reference}"),
                })
            }
            _ => Ok(()),
        }
    }

    fn matches(&self, document: &PostDocument, predicate: &Predicate) -> bool {
        let first = document.first_publication_date;
        match predicate {
            Predicate::At { path, value } => match path.as_str() {
                "document.type" => &document.document_type == value,
                "document.id" => &document.id == value,
                path if path.ends_with(".uid") => {
                    document.uid.as_deref() == Some(value.as_str())
                }
                _ => false,
            },
            Predicate::DateBefore { date, .. } => {
                first.is_some_and(|d| d < *date)
            }
            Predicate::DateAfter { date, .. } => {
                first.is_some_and(|d| d > *date)
            }
        }
    }

    fn run(
        &self,
        query: &Query,
        offset: usize,
    ) -> SearchResponse<PostSummaryData> {
        let mut documents: Vec<PostDocument> = self
            .documents(query.reference.as_deref())
            .into_iter()
            .filter(|document| {
                query.predicates.iter().all(|p| self.matches(document, p))
            })
            .collect();

        if let Some(ordering) = query.orderings.first() {
            documents.sort_by_key(|document| document.first_publication_date);
            if ordering.descending {
                documents.reverse();
            }
        }

        let total = documents.len();
        let page_size = query.page_size.unwrap_or(20).max(1) as usize;
        let results: Vec<Document<PostSummaryData>> = documents
            .into_iter()
            .skip(offset)
            .take(page_size)
            .map(summary)
            .collect();

        let next_offset = offset + page_size;
        let next_page = (next_offset < total).then(|| {
            let cursor = format!("{CURSOR_PREFIX}{next_offset}-{}", query.q());
            if let Ok(mut cursors) = self.cursors.lock() {
                cursors.insert(cursor.clone(), (query.clone(), next_offset));
            }
            cursor
        });

        SearchResponse {
            page: (offset / page_size) as u32 + 1,
            results_per_page: page_size as u32,
            total_results_size: total as u32,
            total_pages: total.div_ceil(page_size) as u32,
            next_page,
            prev_page: None,
            results,
        }
    }
}

fn summary(document: PostDocument) -> Document<PostSummaryData> {
    Document {
        id: document.id,
        uid: document.uid,
        document_type: document.document_type,
        first_publication_date: document.first_publication_date,
        last_publication_date: document.last_publication_date,
        data: PostSummaryData {
            title: document.data.title,
            subtitle: document.data.subtitle,
            author: document.data.author,
        },
    }
}

#[async_trait]
impl ContentFetcher for FakeFetcher {
    fn document_type(&self) -> &str {
        "posts"
    }

    async fn get_by_uid(
        &self,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<PostDocument>, PrismicError> {
        self.record("get_by_uid");
        self.check_ref(reference)?;

        Ok(self
            .documents(reference)
            .into_iter()
            .find(|document| document.uid.as_deref() == Some(uid)))
    }

    async fn query(
        &self,
        query: Query,
    ) -> Result<SearchResponse<PostSummaryData>, PrismicError> {
        self.record("query");
        self.check_ref(query.reference.as_deref())?;

        Ok(self.run(&query, 0))
    }

    async fn fetch_page(
        &self,
        next_page: &str,
    ) -> Result<SearchResponse<PostSummaryData>, PrismicError> {
        self.record("fetch_page");

        if self.fail_pages.load(AtomicOrdering::SeqCst) {
            return Err(PrismicError::FailedStatusCode {
                status_code: StatusCode::SERVICE_UNAVAILABLE,
                message: "unavailable".to_string(),
            });
        }

        let cursor = self
            .cursors
            .lock()
            .ok()
            .and_then(|cursors| cursors.get(next_page).cloned());
        let Some((query, offset)) = cursor else {
            return Err(PrismicError::ForeignCursor {
                cursor: next_page.to_string(),
            });
        };

        Ok(self.run(&query, offset))
    }

    async fn resolve_preview(
        &self,
        token: &str,
        document_id: &str,
    ) -> Result<Option<String>, PrismicError> {
        self.record("resolve_preview");

        if !self.previews.contains_key(token) {
            return Ok(None);
        }

        Ok(self
            .documents(Some(token))
            .iter()
            .find(|document| document.id == document_id)
            .map(|document| {
                link::resolve(&document.document_type, document.uid.as_deref())
            }))
    }
}
