use std::str::FromStr;

use anyhow::Context;
use entity::prelude::{DateFormatter, Locale};
use toml::{map::Map, Value};
use util::{section_integer, section_str, section_value};

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub prismic: Prismic,
    pub blog: Blog,
    pub comments: Comments,
    pub server: Server,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Prismic {
    pub api_endpoint: String,
    pub document_type: String,
    pub page_size: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Blog {
    pub site_name: String,
    pub words_per_minute: u64,
    pub locale: Locale,
    pub utc_offset_hours: i32,
    /// Upper bound of `?pages=` on listings.
    pub max_pages: usize,
}

/// utterances widget settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Comments {
    pub repo: String,
    pub issue_term: String,
    pub label: String,
    pub theme: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Server {
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prismic: Prismic {
                api_endpoint: "https://spacetraveling.cdn.prismic.io/api/v2"
                    .to_string(),
                document_type: "posts".to_string(),
                page_size: 10,
            },
            blog: Blog {
                site_name: "spacetraveling".to_string(),
                words_per_minute: 200,
                locale: Locale::PtBr,
                utc_offset_hours: -3,
                max_pages: 20,
            },
            comments: Comments {
                repo: "mcaf27/ignite-03-01".to_string(),
                issue_term: "pathname".to_string(),
                label: "comment :speech_balloon:".to_string(),
                theme: "photon-dark".to_string(),
            },
            server: Server {
                port: 8000,
                allowed_origins: vec!["http://localhost:3000".to_string()],
            },
        }
    }
}

impl Config {
    pub fn date_formatter(&self) -> anyhow::Result<DateFormatter> {
        DateFormatter::from_offset_hours(
            self.blog.locale,
            self.blog.utc_offset_hours,
        )
    }
}

pub fn init_config(config: &Map<String, Value>) -> anyhow::Result<Config> {
    let prismic = Prismic {
        api_endpoint: section_str(config, "prismic", "api_endpoint")?,
        document_type: section_str(config, "prismic", "document_type")?,
        page_size: section_integer(config, "prismic", "page_size")?
            .try_into()
            .context("failed to parse prismic.page_size config")?,
    };

    let locale = section_str(config, "blog", "locale")?;
    let blog = Blog {
        site_name: section_str(config, "blog", "site_name")?,
        words_per_minute: section_integer(config, "blog", "words_per_minute")?
            .try_into()
            .context("failed to parse blog.words_per_minute config")?,
        locale: Locale::from_str(&locale)
            .with_context(|| format!("unsupported locale: {locale}"))?,
        utc_offset_hours: section_integer(config, "blog", "utc_offset_hours")?
            .try_into()
            .context("failed to parse blog.utc_offset_hours config")?,
        max_pages: section_integer(config, "blog", "max_pages")?
            .try_into()
            .context("failed to parse blog.max_pages config")?,
    };

    let comments = Comments {
        repo: section_str(config, "comments", "repo")?,
        issue_term: section_str(config, "comments", "issue_term")?,
        label: section_str(config, "comments", "label")?,
        theme: section_str(config, "comments", "theme")?,
    };

    let allowed_origins = section_value(config, "server", "allowed_origins")?
        .as_array()
        .context("failed to parse server.allowed_origins config")?
        .iter()
        .map(|origin| {
            origin
                .as_str()
                .map(ToString::to_string)
                .context("failed to parse server.allowed_origins entry")
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let server = Server {
        port: section_integer(config, "server", "port")?
            .try_into()
            .context("failed to parse server.port config")?,
        allowed_origins,
    };

    Ok(Config {
        prismic,
        blog,
        comments,
        server,
    })
}

#[cfg(test)]
mod test {
    use util::{load_config, parse_config};

    use super::*;

    #[test]
    fn test_workspace_config_matches_default() {
        // Arrange
        let config = load_config("Config.toml").unwrap();

        // Act
        let config = init_config(&config).unwrap();

        // Assert
        assert_eq!(config, Config::default());
        assert!(config.date_formatter().is_ok());
    }

    #[test]
    fn test_unsupported_locale() {
        let mut config = load_config("Config.toml").unwrap();
        let blog = config.get_mut("blog").unwrap().as_table_mut().unwrap();
        blog.insert("locale".to_string(), Value::String("xx".to_string()));

        assert!(init_config(&config).is_err());
    }

    #[test]
    fn test_missing_section() {
        let config = parse_config("[prismic]\napi_endpoint = \"x\"").unwrap();

        assert!(init_config(&config).is_err());
    }
}
