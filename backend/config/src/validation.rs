//! Settings validation with field paths and user-friendly messages.

use crate::schema::Settings;
use thiserror::Error;

/// A settings validation finding with field path and message.
#[derive(Debug, Error)]
#[error("Settings validation error at '{path}': {message}")]
pub struct SettingsValidationError {
    pub path: String,
    pub message: String,
}

/// All validation findings from one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<SettingsValidationError>,
    pub warnings: Vec<SettingsValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(SettingsValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(SettingsValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate settings and return a report of all errors and warnings.
pub fn validate(settings: &Settings) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_identchars(settings, &mut report);
    validate_listing(settings, &mut report);
    validate_completion(settings, &mut report);
    validate_exemptions(settings, &mut report);
    report
}

fn validate_identchars(settings: &Settings, report: &mut ValidationReport) {
    if settings.identchars.is_empty() {
        report.error("identchars", "At least one identifier character is required");
    }
    if settings.identchars.chars().any(char::is_whitespace) {
        report.error("identchars", "Whitespace cannot be part of a command name");
    }
}

fn validate_listing(settings: &Settings, report: &mut ValidationReport) {
    if settings.display_width == 0 {
        report.error("display_width", "Display width must be greater than zero");
    }
    if settings.ruler.chars().count() > 1 {
        report.warn("ruler", "Multi-character ruler will be repeated per header character");
    }
}

fn validate_completion(settings: &Settings, report: &mut ValidationReport) {
    if let Some(key) = &settings.completekey {
        if key.trim().is_empty() {
            report.error("completekey", "Completion key cannot be blank; omit it to disable completion");
        }
    }
}

fn validate_exemptions(settings: &Settings, report: &mut ValidationReport) {
    for name in &settings.exempt_commands {
        if name.is_empty() || !name.chars().all(|c| settings.is_identchar(c)) {
            report.warn(
                format!("exempt_commands.{name}"),
                "Not a valid command name; the exemption can never match",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let report = validate(&Settings::default());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn empty_identchars_is_an_error() {
        let settings = Settings {
            identchars: String::new(),
            ..Settings::default()
        };
        let report = validate(&settings);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "identchars");
    }

    #[test]
    fn zero_width_and_blank_key_are_errors() {
        let settings = Settings {
            display_width: 0,
            completekey: Some("  ".into()),
            ..Settings::default()
        };
        let report = validate(&settings);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn odd_exemptions_and_wide_ruler_only_warn() {
        let settings = Settings {
            ruler: "=-".into(),
            ..Settings::default()
        }
        .exempt("not a name");
        let report = validate(&settings);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
    }
}
