use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    document::{Api, Document, PostDocument, PostSummaryData, SearchResponse},
    link,
    predicate::{Predicate, Query},
    response::IntoResponse,
    ContentFetcher, PrismicError,
};

/// Client of the Prismic REST API v2.
#[derive(Clone, Debug)]
pub struct Client {
    endpoint: Url,
    access_token: Option<String>,
    document_type: String,
    http: reqwest::Client,
}

impl Client {
    /// `endpoint` is the API root, e.g.
    /// `https://spacetraveling.cdn.prismic.io/api/v2`.
    pub fn new(
        endpoint: &str,
        access_token: Option<String>,
        document_type: impl Into<String>,
    ) -> Result<Self, PrismicError> {
        let endpoint = Url::parse(endpoint.trim_end_matches('/'))
            .into_response("failed to parse api endpoint")?;

        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let http = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .into_response("failed to build http client")?;

        Ok(Self {
            endpoint,
            access_token: access_token.filter(|token| !token.is_empty()),
            document_type: document_type.into(),
            http,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<T, PrismicError> {
        debug!(task = "prismic get", url = url.path());

        let response = self
            .http
            .get(url)
            .send()
            .await
            .into_response("failed to send")?;

        let status = response.status();
        let text = response.text().await.into_response("failed to get text")?;

        if !status.is_success() {
            return Err(PrismicError::FailedStatusCode {
                status_code: status,
                message: text,
            });
        }

        serde_json::from_str(&text).into_response("failed to parse response")
    }

    fn with_access_token(&self, mut url: Url) -> Url {
        if let Some(token) = &self.access_token {
            if !url.query_pairs().any(|(key, _)| key == "access_token") {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }
        url
    }

    pub async fn api(&self) -> Result<Api, PrismicError> {
        self.get(self.with_access_token(self.endpoint.clone())).await
    }

    pub async fn master_ref(&self) -> Result<String, PrismicError> {
        let api = self.api().await?;

        api.master_ref()
            .map(ToString::to_string)
            .ok_or_else(|| PrismicError::MissingMasterRef {
                endpoint: self.endpoint.to_string(),
            })
    }

    /// Url of a `documents/search` request read at `reference`.
    pub fn search_url(&self, query: &Query, reference: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(["documents", "search"]);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("ref", reference);
            pairs.append_pair("q", &query.q());
            if let Some(fetch) = query.fetch_param() {
                pairs.append_pair("fetch", &fetch);
            }
            if let Some(page_size) = query.page_size {
                pairs.append_pair("pageSize", &page_size.to_string());
            }
            if let Some(orderings) = query.orderings_param() {
                pairs.append_pair("orderings", &orderings);
            }
        }
        self.with_access_token(url)
    }

    pub async fn search<T: DeserializeOwned>(
        &self,
        query: &Query,
    ) -> Result<SearchResponse<T>, PrismicError> {
        let reference = match &query.reference {
            Some(reference) => reference.clone(),
            None => self.master_ref().await?,
        };

        self.get(self.search_url(query, &reference)).await
    }

    /// Cursors are only followed when they point at this client's endpoint.
    pub fn cursor_url(&self, next_page: &str) -> Result<Url, PrismicError> {
        let url =
            Url::parse(next_page).into_response("failed to parse cursor")?;

        let same_origin = url.origin() == self.endpoint.origin();
        let segments = (url.path_segments(), self.endpoint.path_segments());
        let same_api = match segments {
            (Some(cursor), Some(endpoint)) => {
                let cursor = cursor.collect::<Vec<_>>();
                let endpoint = endpoint
                    .filter(|segment| !segment.is_empty())
                    .collect::<Vec<_>>();
                cursor.starts_with(&endpoint)
            }
            _ => false,
        };
        if !(same_origin && same_api) {
            return Err(PrismicError::ForeignCursor {
                cursor: next_page.to_string(),
            });
        }

        Ok(self.with_access_token(url))
    }
}

#[async_trait]
impl ContentFetcher for Client {
    fn document_type(&self) -> &str {
        &self.document_type
    }

    async fn get_by_uid(
        &self,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<PostDocument>, PrismicError> {
        let query = Query::new(Predicate::at(
            format!("my.{}.uid", self.document_type),
            uid,
        ))
        .page_size(1)
        .with_ref(reference);

        let response = self.search(&query).await?;

        Ok(response.results.into_iter().next())
    }

    async fn query(
        &self,
        query: Query,
    ) -> Result<SearchResponse<PostSummaryData>, PrismicError> {
        self.search(&query).await
    }

    async fn fetch_page(
        &self,
        next_page: &str,
    ) -> Result<SearchResponse<PostSummaryData>, PrismicError> {
        let url = self.cursor_url(next_page)?;

        self.get(url).await
    }

    async fn resolve_preview(
        &self,
        token: &str,
        document_id: &str,
    ) -> Result<Option<String>, PrismicError> {
        let query = Query::new(Predicate::at("document.id", document_id))
            .page_size(1)
            .with_ref(Some(token));

        match self.search::<serde_json::Value>(&query).await {
            Ok(response) => Ok(response.results.first().map(
                |document: &Document<serde_json::Value>| {
                    link::resolve(
                        &document.document_type,
                        document.uid.as_deref(),
                    )
                },
            )),
            Err(e) if e.is_client_error() => {
                warn!(task = "resolve preview", error = e.to_string());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
