//! Environment overrides and `${VAR}` substitution for settings.
//!
//! `LINECMD_*` variables replace individual fields. Afterwards the banner
//! fields (`prompt`, `intro`, `doc_leader`) have `${VAR_NAME}` references
//! resolved. Only uppercase `[A-Z_][A-Z0-9_]*` names are matched and
//! `$${}` escapes to a literal `${}`.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::schema::Settings;

/// Matches `${VAR}` and the escaped form `$${VAR}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const ENV_PROMPT: &str = "LINECMD_PROMPT";
pub const ENV_INTRO: &str = "LINECMD_INTRO";
pub const ENV_RULER: &str = "LINECMD_RULER";
pub const ENV_COMPLETEKEY: &str = "LINECMD_COMPLETEKEY";
pub const ENV_RAW_INPUT: &str = "LINECMD_RAW_INPUT";

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced in settings field: {field}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub field: String,
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(settings: Settings) -> Result<Settings> {
    apply_env_overrides_with(settings, &std::env::vars().collect())
}

/// Apply overrides using a provided map (useful for testing).
pub fn apply_env_overrides_with(
    mut settings: Settings,
    env: &HashMap<String, String>,
) -> Result<Settings> {
    if let Some(prompt) = env.get(ENV_PROMPT) {
        settings.prompt = Some(prompt.clone());
    }
    if let Some(intro) = env.get(ENV_INTRO) {
        settings.intro = Some(intro.clone());
    }
    if let Some(ruler) = env.get(ENV_RULER) {
        settings.ruler = ruler.clone();
    }
    if let Some(key) = env.get(ENV_COMPLETEKEY) {
        settings.completekey = (!key.is_empty()).then(|| key.clone());
    }
    if let Some(raw) = env.get(ENV_RAW_INPUT) {
        settings.use_raw_input = parse_flag(ENV_RAW_INPUT, raw)?;
    }

    if let Some(prompt) = settings.prompt.take() {
        settings.prompt = Some(substitute_string(&prompt, env, "prompt")?);
    }
    if let Some(intro) = settings.intro.take() {
        settings.intro = Some(substitute_string(&intro, env, "intro")?);
    }
    settings.doc_leader = substitute_string(&settings.doc_leader, env, "doc_leader")?;

    Ok(settings)
}

fn parse_flag(var: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{var} must be a boolean flag, got \"{other}\""),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, field: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut error: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[1];
        if caps[0].starts_with("$$") {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                error.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    field: field.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = error {
        bail!(err);
    }
    Ok(substituted.into_owned())
}
