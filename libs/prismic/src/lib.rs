use async_trait::async_trait;
use reqwest::StatusCode;

mod client;
pub mod document;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod link;
pub mod predicate;
mod response;
pub mod rich_text;

pub use client::Client;
pub use document::{
    Api, Document, Image, PostData, PostDocument, PostSummaryData,
    PostSummaryDocument, Ref, SearchResponse, Section,
};
pub use predicate::{Ordering, Predicate, Query};

#[derive(Debug, thiserror::Error)]
pub enum PrismicError {
    #[error("in reqwest crate: {}: {}", message, source)]
    ReqwestError {
        source: reqwest::Error,
        message: String,
    },

    #[error("in serde_json crate: {}: {}", message, source)]
    SerdeJsonError {
        source: serde_json::Error,
        message: String,
    },

    #[error("in url crate: {}: {}", message, source)]
    UrlParseError {
        source: url::ParseError,
        message: String,
    },

    #[error("status code: {}, response: {}", status_code, message)]
    FailedStatusCode {
        status_code: StatusCode,
        message: String,
    },

    #[error("no master ref published by {}", endpoint)]
    MissingMasterRef { endpoint: String },

    #[error("cursor does not point at the content endpoint: {}", cursor)]
    ForeignCursor { cursor: String },
}

impl PrismicError {
    /// The content API rejected the request itself, e.g. an expired ref.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PrismicError::FailedStatusCode { status_code, .. }
                if status_code.is_client_error()
        )
    }
}

/// Read access to the headless CMS holding the blog posts.
#[async_trait]
pub trait ContentFetcher: Send + Sync + std::fmt::Debug {
    /// Custom type name of the post documents, e.g. `posts`.
    fn document_type(&self) -> &str;

    /// Post whose uid is `uid`, read at `reference` or at the master ref.
    async fn get_by_uid(
        &self,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<PostDocument>, PrismicError>;

    async fn query(
        &self,
        query: Query,
    ) -> Result<SearchResponse<PostSummaryData>, PrismicError>;

    /// Follows a `next_page` cursor of a previous response.
    async fn fetch_page(
        &self,
        next_page: &str,
    ) -> Result<SearchResponse<PostSummaryData>, PrismicError>;

    /// Path of the document a preview token points at, `None` when the token
    /// or the document cannot be resolved.
    async fn resolve_preview(
        &self,
        token: &str,
        document_id: &str,
    ) -> Result<Option<String>, PrismicError>;
}
