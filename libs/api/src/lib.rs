use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use entity::prelude::DateFormatter;
use repository::{init_repository, Repository, Settings};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

pub mod config;
pub mod healthz;
pub mod not_found;
pub mod pages;
pub mod post;
pub mod preview;
mod response;
mod request;

pub use config::{init_config, Config};
pub use preview::PreviewContext;

#[derive(Debug)]
pub enum ApiError {
    AuthError(String),
    NotFound(String),
    /// The preview ref was refused by the content API; the session ends.
    PreviewExpired(String),
    UpstreamError(String),
    ServerError(String),
}

#[derive(Clone, Debug)]
pub struct ApiState {
    repo: Repository,
    config: Config,
    formatter: DateFormatter,
}

impl ApiState {
    pub fn new(repo: Repository, config: Config) -> anyhow::Result<Self> {
        let formatter = config.date_formatter()?;

        Ok(Self {
            repo,
            config,
            formatter,
        })
    }

    /// Number of listing pages to accumulate for a `?pages=` value.
    fn pages(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(1).clamp(1, self.max_pages())
    }

    fn max_pages(&self) -> usize {
        self.config.blog.max_pages.max(1)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        post::get_posts,
        post::get_post,
        preview::enter_preview,
        preview::exit_preview,
        healthz::get_health,
    ),
    components(schemas(
        post::response::GetPostsResponse,
        post::response::GetPostResponse,
        post::response::PostSummary,
        post::response::Post,
        post::response::Section,
        post::response::NavLink,
        post::response::Navigation,
        response::ErrorResponse,
    )),
    tags(
        (name = "posts", description = "Blog posts"),
        (name = "preview", description = "Editorial preview sessions")
    )
)]
struct ApiDoc;

/// Content API client and repositories for a config.
pub fn build_repository(
    config: &Config,
    access_token: Option<String>,
) -> anyhow::Result<Repository> {
    let client = prismic::Client::new(
        &config.prismic.api_endpoint,
        access_token,
        config.prismic.document_type.clone(),
    )
    .context("failed to build prismic client")?;

    Ok(init_repository(
        Arc::new(client),
        Settings {
            page_size: config.prismic.page_size,
            words_per_minute: config.blog.words_per_minute,
        },
    ))
}

pub async fn serve(
    repository: Repository,
    config: Config,
) -> anyhow::Result<Router> {
    info!(task = "start api serving");

    let origins = config
        .server
        .allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("failed to parse allowed origins")?;

    let state = ApiState::new(repository, config)?;

    Ok(router(state).layer(CorsLayer::new().allow_origin(origins)))
}

pub fn router(state: ApiState) -> Router {
    // json api
    let api_router = Router::new()
        .route("/posts", get(post::get_posts))
        .route("/posts/:slug", get(post::get_post))
        .route("/preview", get(preview::enter_preview))
        .route("/exit-preview", get(preview::exit_preview))
        .fallback(not_found::get_404);

    Router::new()
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .route("/api-docs/openapi.json", get(openapi))
        .route("/healthz", get(healthz::get_health))
        .nest("/api", api_router)
        .route("/", get(pages::home))
        .route("/post/:slug", get(pages::post))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
