//! Settings defaults.

/// Interpreter name used to derive the default prompt.
pub const DEFAULT_NAME: &str = "linecmd";

/// Completion trigger bound when nothing else is configured.
pub const DEFAULT_COMPLETEKEY: &str = "tab";

/// Character repeated under help listing headers.
pub const DEFAULT_RULER: &str = "=";

pub const DEFAULT_DOC_HEADER: &str = "Documented commands (type help <topic>):";
pub const DEFAULT_MISC_HEADER: &str = "Miscellaneous help topics:";
pub const DEFAULT_UNDOC_HEADER: &str = "Undocumented commands:";

/// Column budget for help listings.
pub const DEFAULT_DISPLAY_WIDTH: usize = 80;

/// Characters that may form a command name.
pub fn default_identchars() -> String {
    ('a'..='z')
        .chain('A'..='Z')
        .chain('0'..='9')
        .chain(std::iter::once('_'))
        .collect()
}

/// Prompt derived from an interpreter name (`"<name>> "`).
pub fn prompt_for(name: &str) -> String {
    format!("{name}> ")
}
