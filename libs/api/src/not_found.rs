use crate::{response::error_for, ApiError};

pub(super) async fn get_404() -> ApiError {
    error_for("404-001")
}
