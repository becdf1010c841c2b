use axum::{
    extract::{Path, Query, State},
    Json,
};
use entity::prelude::*;
use tracing::info;

pub mod response;

use crate::{
    response::{error_for, ApiResponse, ErrorResponse},
    request::Pagination,
    ApiState, PreviewContext,
};

use self::response::{GetPostResponse, GetPostsResponse, PostSummary};

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(Pagination),
    responses(
        (status = 200, description = "Listing", body = GetPostsResponse),
        (status = 401, description = "Preview expired", body = ErrorResponse),
        (status = 502, description = "Content API failed", body = ErrorResponse)
    )
)]
pub async fn get_posts(
    State(state): State<ApiState>,
    preview: PreviewContext,
    Query(pagination): Query<Pagination>,
) -> ApiResponse<Json<GetPostsResponse>> {
    let listing = load_listing(&state, &preview, pagination).await?;

    Ok(Json(GetPostsResponse {
        next: listing
            .has_more
            .then(|| format!("/api/posts?pages={}", listing.pages + 1)),
        pages: listing.pages,
        has_more: listing.has_more,
        posts: listing.posts.into_iter().map(PostSummary::from).collect(),
    }))
}

/// Get a post with its reading time and neighbours
#[utoipa::path(
    get,
    path = "/api/posts/{slug}",
    tag = "posts",
    responses(
        (status = 200, description = "Post", body = GetPostResponse),
        (status = 401, description = "Preview expired", body = ErrorResponse),
        (status = 404, description = "Unknown slug", body = ErrorResponse),
        (status = 502, description = "Content API failed", body = ErrorResponse)
    ),
    params(
        ("slug" = String, Path, description = "post slug"),
    )
)]
pub async fn get_post(
    State(state): State<ApiState>,
    preview: PreviewContext,
    Path(slug): Path<String>,
) -> ApiResponse<Json<GetPostResponse>> {
    let post = load_post(&state, &preview, &slug)
        .await?
        .ok_or_else(|| error_for("404-002"))?;

    Ok(Json(GetPostResponse {
        post: post.into(),
        preview: preview.is_active(),
    }))
}

/// Listing accumulated over the requested number of pages.
pub(crate) struct LoadedListing {
    pub posts: Vec<PostSummaryView>,
    pub pages: usize,
    pub has_more: bool,
}

pub(crate) async fn load_listing(
    state: &ApiState,
    preview: &PreviewContext,
    pagination: Pagination,
) -> ApiResponse<LoadedListing> {
    let pagination = state
        .repo
        .post
        .find_pages(state.pages(pagination.pages), preview.reference())
        .await
        .map_err(|e| preview.upstream_error(e, "502-001"))?;

    let pages = pagination.pages_loaded();
    // past the page cap another request would load the same listing
    let has_more = pagination.can_load_more() && pages < state.max_pages();
    let posts = pagination
        .into_listing()
        .results
        .into_iter()
        .map(|summary| PostSummaryView::new(summary, &state.formatter))
        .collect::<Vec<_>>();

    info!(task = "load listing", pages, posts = posts.len(), has_more);

    Ok(LoadedListing {
        posts,
        pages,
        has_more,
    })
}

/// Post and its neighbours, `None` when no post has this slug.
pub(crate) async fn load_post(
    state: &ApiState,
    preview: &PreviewContext,
    slug: &str,
) -> ApiResponse<Option<PostView>> {
    let Some(post) = state
        .repo
        .post
        .find_by_slug(slug, preview.reference())
        .await
        .map_err(|e| preview.upstream_error(e, "502-002"))?
    else {
        return Ok(None);
    };

    let navigation = match post.first_publication_date {
        Some(published_at) => state
            .repo
            .post
            .find_navigation(published_at, preview.reference())
            .await
            .map_err(|e| preview.upstream_error(e, "502-003"))?,
        None => PostNavigation::default(),
    };

    Ok(Some(PostView::new(post, navigation, &state.formatter)))
}
