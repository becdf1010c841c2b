use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

mod labels;
mod templates;

use crate::{
    post::{load_listing, load_post},
    request::Pagination,
    response::{ApiResponse, IntoApiResponse},
    ApiState, PreviewContext,
};

use self::{
    labels::Labels,
    templates::{HomeTemplate, NotFoundTemplate, PostTemplate},
};

fn render(template: impl Template) -> ApiResponse<Html<String>> {
    IntoApiResponse::into_response(template.render().map(Html), "500-001")
}

/// Listing page, `?pages=N` accumulates N pages.
pub async fn home(
    State(state): State<ApiState>,
    preview: PreviewContext,
    Query(pagination): Query<Pagination>,
) -> ApiResponse<Html<String>> {
    let listing = load_listing(&state, &preview, pagination).await?;

    render(HomeTemplate {
        labels: Labels::for_locale(state.config.blog.locale),
        site_name: &state.config.blog.site_name,
        title: &state.config.blog.site_name,
        preview: preview.is_active(),
        next: listing
            .has_more
            .then(|| format!("/?pages={}", listing.pages + 1)),
        posts: listing.posts,
    })
}

pub async fn post(
    State(state): State<ApiState>,
    preview: PreviewContext,
    Path(slug): Path<String>,
) -> ApiResponse<Response> {
    let Some(post) = load_post(&state, &preview, &slug).await? else {
        return not_found_page(&state, &preview);
    };

    let title = format!("{} | {}", post.title, state.config.blog.site_name);
    let page = render(PostTemplate {
        labels: Labels::for_locale(state.config.blog.locale),
        site_name: &state.config.blog.site_name,
        title: &title,
        preview: preview.is_active(),
        post: &post,
        comments: &state.config.comments,
    })?;

    Ok(page.into_response())
}

pub async fn not_found(
    State(state): State<ApiState>,
    preview: PreviewContext,
) -> Response {
    not_found_page(&state, &preview).unwrap_or_else(IntoResponse::into_response)
}

fn not_found_page(
    state: &ApiState,
    preview: &PreviewContext,
) -> ApiResponse<Response> {
    let labels = Labels::for_locale(state.config.blog.locale);
    let page = render(NotFoundTemplate {
        labels,
        site_name: &state.config.blog.site_name,
        title: labels.not_found,
        preview: preview.is_active(),
    })?;

    Ok((StatusCode::NOT_FOUND, page).into_response())
}
