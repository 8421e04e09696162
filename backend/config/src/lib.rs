//! `linecmd-config`: construction-time settings for linecmd interpreters.
//!
//! Provides:
//! - Typed settings schema (prompt, banners, help headers, hook ordering)
//! - TOML loading with defaults for missing files
//! - `LINECMD_*` environment overrides and `${ENV_VAR}` substitution
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use schema::{HookOrder, Settings};
pub use io::{load_settings, parse_settings, render_settings};
pub use env::{apply_env_overrides, apply_env_overrides_with, MissingEnvVarError};
pub use validation::{validate, SettingsValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::path::Path;

/// Load settings, apply env overrides, and validate.
///
/// This is the main entry point for binaries. Validation warnings are
/// logged; validation errors fail the load.
pub async fn load_and_prepare(path: &Path) -> Result<Settings> {
    let settings = load_settings(path).await?;
    let settings = apply_env_overrides(settings)?;

    let report = validate(&settings);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Settings warning");
    }
    if let Some(first) = report.errors.first() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Settings error");
        }
        bail!("invalid settings ({} error(s)): {first}", report.errors.len());
    }

    Ok(settings)
}
