use prismic::PrismicError;

use crate::RepositoryError;

pub type Response<T> = Result<T, RepositoryError>;

pub(crate) trait IntoResponse<T> {
    fn into_response(self, message: &str) -> Response<T>;
}

impl<T> IntoResponse<T> for Result<T, PrismicError> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| RepositoryError::InPrismicErr {
            message: message.to_string(),
            source: e,
        })
    }
}
