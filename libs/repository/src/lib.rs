use std::sync::Arc;

use entity::prelude::ReadingTime;
use post::PostRepository;
use prismic::{ContentFetcher, PrismicError};

pub mod pagination;
pub mod post;
mod response;

pub use response::Response;

#[derive(Clone, Debug)]
pub struct Repository {
    pub post: PostRepository,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Posts per listing page.
    pub page_size: u32,
    pub words_per_minute: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: 10,
            words_per_minute: ReadingTime::DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(
        "in prismic crate from unsuccessful content api calls: {}: {}",
        message,
        source
    )]
    InPrismicErr {
        message: String,
        source: PrismicError,
    },
}

impl RepositoryError {
    /// The content API refused the request, e.g. for an expired preview ref.
    pub fn is_client_error(&self) -> bool {
        match self {
            RepositoryError::InPrismicErr { source, .. } => {
                source.is_client_error()
            }
        }
    }
}

pub fn init_repository(
    fetcher: Arc<dyn ContentFetcher>,
    settings: Settings,
) -> Repository {
    Repository {
        post: PostRepository::new(fetcher, settings),
    }
}
