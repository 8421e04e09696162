//! Settings file loading.

use crate::schema::Settings;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Parse settings from TOML text. Missing keys take their defaults.
pub fn parse_settings(raw: &str) -> Result<Settings> {
    toml::from_str(raw).context("Failed to parse settings TOML")
}

/// Render effective settings as pretty JSON (for `--print-settings`).
pub fn render_settings(settings: &Settings) -> Result<String> {
    serde_json::to_string_pretty(settings).context("Failed to serialize settings")
}

/// Load and parse settings from disk.
///
/// Returns `Ok(Settings::default())` if the file doesn't exist.
pub async fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!(path = %path.display(), "Settings file does not exist; using defaults");
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    let settings = parse_settings(&raw)
        .with_context(|| format!("Invalid settings at: {}", path.display()))?;

    info!(path = %path.display(), name = %settings.name, "Loaded settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings = parse_settings(
            r#"
            name = "calc"
            intro = "Welcome"

            [hook_order]
            aprecmd_first = true
            "#,
        )
        .unwrap();

        assert_eq!(settings.name, "calc");
        assert_eq!(settings.intro.as_deref(), Some("Welcome"));
        assert_eq!(settings.ruler, "=");
        assert!(settings.hook_order.aprecmd_first);
        assert!(!settings.hook_order.apostcmd_first);
        assert!(settings.use_raw_input);
    }

    #[test]
    fn exempt_commands_parse_as_set() {
        let settings = parse_settings(r#"exempt_commands = ["quit", "quit", "save"]"#).unwrap();
        assert_eq!(settings.exempt_commands.len(), 2);
        assert!(settings.exempt_commands.contains("save"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_settings("name = ").is_err());
    }

    #[test]
    fn rendered_json_round_trips_key_fields() {
        let settings = Settings::named("calc").exempt("quit");
        let json = render_settings(&settings).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "calc");
        assert_eq!(value["completekey"], "tab");
        assert_eq!(value["prompt"], serde_json::Value::Null);
        assert_eq!(value["exempt_commands"][0], "quit");
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("absent.toml")).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn loads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prompt = \"(calc) \"\nuse_raw_input = false").unwrap();

        let settings = load_settings(file.path()).await.unwrap();
        assert_eq!(settings.prompt(), "(calc) ");
        assert!(!settings.use_raw_input);
    }
}
