use serde::Deserialize;
use serde_with::serde_as;
use serde_with::DisplayFromStr;
use utoipa::{IntoParams, ToSchema};

/// Listing pages to accumulate, starting from the first one.
#[serde_as]
#[derive(Deserialize, ToSchema, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub pages: Option<usize>,
}
