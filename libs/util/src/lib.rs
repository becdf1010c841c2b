use std::path::{Path, PathBuf};

use anyhow::Context;
use toml::{map::Map, Value};

pub fn workspace_dir() -> PathBuf {
    let located = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok());

    match located {
        Some(cargo_path) if !cargo_path.trim().is_empty() => Path::new(
            cargo_path.trim(),
        )
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default(),
        // deployed binaries run without cargo next to the config files
        _ => std::env::current_dir().unwrap_or_default(),
    }
}

pub fn load_config(config_name: &str) -> anyhow::Result<Map<String, Value>> {
    let path = workspace_dir().join(config_name);
    let config = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    parse_config(&config)
}

pub fn load_env() -> anyhow::Result<Map<String, Value>> {
    let workspace_dir = workspace_dir();
    let secrets = std::fs::read_to_string(workspace_dir.join("Secrets.toml"))
        .context("failed to read Secrets.toml")?;

    parse_config(&secrets).context("failed to parse Secrets.toml")
}

pub fn parse_config(text: &str) -> anyhow::Result<Map<String, Value>> {
    let config = toml::from_str::<Map<String, Value>>(text)?;

    Ok(config)
}

/// Looks up `[section] key` in a parsed config table.
pub fn section_value<'a>(
    config: &'a Map<String, Value>,
    section: &str,
    key: &str,
) -> anyhow::Result<&'a Value> {
    config
        .get(section)
        .with_context(|| format!("failed to load {} config", section))?
        .get(key)
        .with_context(|| format!("failed to load {}.{} config", section, key))
}

pub fn section_str(
    config: &Map<String, Value>,
    section: &str,
    key: &str,
) -> anyhow::Result<String> {
    Ok(section_value(config, section, key)?
        .as_str()
        .with_context(|| format!("failed to parse {}.{} config", section, key))?
        .to_string())
}

pub fn section_integer(
    config: &Map<String, Value>,
    section: &str,
    key: &str,
) -> anyhow::Result<i64> {
    section_value(config, section, key)?
        .as_integer()
        .with_context(|| format!("failed to parse {}.{} config", section, key))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_section_lookups() {
        // Arrange
        let config = parse_config(
            r#"
            [blog]
            site_name = "spacetraveling"
            words_per_minute = 200
            "#,
        )
        .unwrap();

        // Act
        let site_name = section_str(&config, "blog", "site_name");
        let wpm = section_integer(&config, "blog", "words_per_minute");
        let missing = section_str(&config, "prismic", "api_endpoint");
        let wrong_type = section_integer(&config, "blog", "site_name");

        // Assert
        assert_eq!(site_name.unwrap(), "spacetraveling");
        assert_eq!(wpm.unwrap(), 200);
        assert!(missing.is_err());
        assert!(wrong_type.is_err());
    }

    #[test]
    fn test_workspace_dir_holds_config() {
        let dir = workspace_dir();

        assert!(dir.join("Config.toml").exists());
    }
}
