use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query, State},
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{error, info, warn};

pub mod request;

use repository::RepositoryError;

use crate::{
    response::{error_for, error_message, ApiResponse, ErrorResponse},
    ApiError, ApiState,
};

use self::request::PreviewParam;

pub const PREVIEW_COOKIE: &str = "preview_ref";

/// Preview session of the current request. Handlers receive it explicitly
/// and pass its ref on to the content API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewContext {
    reference: Option<String>,
}

impl PreviewContext {
    pub fn new(reference: Option<String>) -> Self {
        Self {
            reference: reference.filter(|reference| !reference.is_empty()),
        }
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.reference.is_some()
    }

    /// Error for a failed content read. A ref refused by the content API
    /// ends the preview session.
    pub(crate) fn upstream_error(
        &self,
        e: RepositoryError,
        error_code: &str,
    ) -> ApiError {
        if self.is_active() && e.is_client_error() {
            warn!(task = "read preview", error = e.to_string());
            return ApiError::PreviewExpired(error_message("401-001"));
        }

        error!(error_code, error = e.to_string());
        error_for(error_code)
    }
}

/// Expired cookie clearing the preview session.
pub(crate) fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((PREVIEW_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PreviewContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        Ok(Self::new(
            jar.get(PREVIEW_COOKIE)
                .map(|cookie| cookie.value().to_string()),
        ))
    }
}

/// Start a preview session
#[utoipa::path(
    get,
    path = "/api/preview",
    tag = "preview",
    params(PreviewParam),
    responses(
        (status = 307, description = "Redirect to the previewed document"),
        (status = 401, description = "Unknown token", body = ErrorResponse)
    )
)]
pub async fn enter_preview(
    State(state): State<ApiState>,
    jar: CookieJar,
    Query(params): Query<PreviewParam>,
) -> ApiResponse<(CookieJar, Redirect)> {
    let (Some(token), Some(document_id)) = (params.token, params.document_id)
    else {
        warn!(task = "enter preview", error = "missing token or document id");
        return Err(error_for("401-001"));
    };

    let path = match state
        .repo
        .post
        .resolve_preview(&token, &document_id)
        .await
    {
        Ok(Some(path)) => path,
        Ok(None) => {
            warn!(
                task = "enter preview",
                document_id = %document_id,
                error = "unresolved token"
            );
            return Err(error_for("401-001"));
        }
        Err(e) => {
            error!(
                task = "enter preview",
                document_id = %document_id,
                error = e.to_string()
            );
            return Err(error_for("401-001"));
        }
    };

    info!(task = "enter preview", document_id = %document_id, path = %path);

    let cookie = Cookie::build((PREVIEW_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Redirect::temporary(&path)))
}

/// Leave the preview session
#[utoipa::path(
    get,
    path = "/api/exit-preview",
    tag = "preview",
    responses(
        (status = 307, description = "Preview cleared, redirect to home")
    )
)]
pub async fn exit_preview(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.add(removal_cookie());

    (jar, Redirect::temporary("/"))
}
