use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewParam {
    /// Preview ref handed out by the CMS
    pub token: Option<String>,
    /// Document being previewed
    #[serde(rename = "documentId")]
    pub document_id: Option<String>,
}
