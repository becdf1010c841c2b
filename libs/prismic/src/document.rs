use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::rich_text::RichTextBlock;

/// Root of the content API, listing the refs content can be read at.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Api {
    pub refs: Vec<Ref>,
}

impl Api {
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ref {
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse<T> {
    pub page: u32,
    pub results_per_page: u32,
    pub total_results_size: u32,
    pub total_pages: u32,
    pub next_page: Option<String>,
    pub prev_page: Option<String>,
    pub results: Vec<Document<T>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document<T> {
    pub id: String,
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub document_type: String,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub first_publication_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub last_publication_date: Option<DateTime<Utc>>,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostData {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub author: String,
    #[serde(default)]
    pub banner: Image,
    #[serde(default)]
    pub content: Vec<Section>,
}

/// Projection of a post used by listings and navigation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PostSummaryData {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub author: String,
}

/// Image field. An image left empty by the editor arrives as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Group item of the post `content` field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

pub type PostDocument = Document<PostData>;
pub type PostSummaryDocument = Document<PostSummaryData>;

// The API writes offsets without a colon, e.g. `2021-03-25T19:25:28+0000`.
fn deserialize_date<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    DateTime::parse_from_rfc3339(&text)
        .or_else(|_| DateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|date| Some(date.with_timezone(&Utc)))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod test {
    use std::fs;

    use chrono::TimeZone;
    use util::workspace_dir;

    use super::*;

    fn fixture(name: &str) -> String {
        fs::read_to_string(
            workspace_dir().join("libs/prismic/tests/fixtures").join(name),
        )
        .unwrap()
    }

    #[test]
    fn test_deserialize_post() {
        // Arrange
        let text = fixture("post.json");

        // Act
        let response =
            serde_json::from_str::<SearchResponse<PostData>>(&text).unwrap();

        // Assert
        let post = &response.results[0];
        assert_eq!(post.uid.as_deref(), Some("como-utilizar-hooks"));
        assert_eq!(post.document_type, "posts");
        assert_eq!(
            post.first_publication_date,
            Some(Utc.with_ymd_and_hms(2021, 3, 15, 19, 25, 28).unwrap())
        );
        assert_eq!(
            post.last_publication_date,
            Some(Utc.with_ymd_and_hms(2021, 3, 19, 18, 49, 11).unwrap())
        );
        assert_eq!(post.data.content.len(), 2);
        assert!(post.data.banner.url.is_some());
        assert_eq!(response.next_page, None);
    }

    #[test]
    fn test_deserialize_listing() {
        let text = fixture("listing.json");

        let response =
            serde_json::from_str::<SearchResponse<PostSummaryData>>(&text)
                .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(
            response.results[1].data.subtitle.as_deref(),
            Some(
                "Tudo sobre como criar a sua primeira aplicação utilizando \
                 Create React App"
            )
        );
        assert!(response.next_page.is_some());
    }

    #[test]
    fn test_deserialize_api_refs() {
        let text = fixture("api.json");

        let api = serde_json::from_str::<Api>(&text).unwrap();

        assert_eq!(api.master_ref(), Some("YFxX1hIAACIAp4Tm"));
    }

    #[test]
    fn test_empty_image_and_missing_dates() {
        // Arrange
        let text = r#"{
            "id": "draft",
            "uid": null,
            "type": "posts",
            "first_publication_date": null,
            "data": { "title": "t", "author": "a", "banner": {} }
        }"#;

        // Act
        let document = serde_json::from_str::<PostDocument>(text).unwrap();

        // Assert
        assert_eq!(document.data.banner, Image::default());
        assert_eq!(document.first_publication_date, None);
        assert_eq!(document.last_publication_date, None);
        assert!(document.data.content.is_empty());
    }

    #[test]
    fn test_missing_author_is_an_error() {
        let text = r#"{
            "id": "broken", "uid": "broken", "type": "posts",
            "data": { "title": "t" }
        }"#;

        assert!(serde_json::from_str::<PostDocument>(text).is_err());
    }
}
