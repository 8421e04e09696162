//! Interpreter settings schema.
//!
//! Every field has a default so a partial TOML file (or none at all) yields
//! a usable configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::defaults::{
    default_identchars, prompt_for, DEFAULT_COMPLETEKEY, DEFAULT_DISPLAY_WIDTH,
    DEFAULT_DOC_HEADER, DEFAULT_MISC_HEADER, DEFAULT_NAME, DEFAULT_RULER, DEFAULT_UNDOC_HEADER,
};

// ---------------------------------------------------------------------------
// Hook ordering
// ---------------------------------------------------------------------------

/// Per-phase ordering flags for hybrid interpreters.
///
/// `true` runs the suspension-capable hook of that phase before the blocking
/// one. The flags are read once when an interpreter is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookOrder {
    pub apreloop_first: bool,
    pub aprecmd_first: bool,
    pub apostcmd_first: bool,
    pub apostloop_first: bool,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Construction-time configuration for one interpreter instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Interpreter name; the default prompt is derived from it.
    pub name: String,
    /// Completion trigger key. `None` disables completion.
    pub completekey: Option<String>,
    /// Prompt text. `None` falls back to `"<name>> "`.
    pub prompt: Option<String>,
    /// Banner written once when a loop starts.
    pub intro: Option<String>,
    /// Separator drawn under help headers; empty disables it.
    pub ruler: String,
    /// Text written before the help listing.
    pub doc_leader: String,
    pub doc_header: String,
    pub misc_header: String,
    pub undoc_header: String,
    /// `true`: the line source prompts interactively.
    /// `false`: the prompt goes to the output sink and lines are read raw.
    pub use_raw_input: bool,
    /// Characters that may appear in a command name.
    pub identchars: String,
    /// Column budget for help listings.
    pub display_width: usize,
    pub hook_order: HookOrder,
    /// Commands allowed to stay blocking inside a strict interpreter.
    pub exempt_commands: BTreeSet<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            completekey: Some(DEFAULT_COMPLETEKEY.to_string()),
            prompt: None,
            intro: None,
            ruler: DEFAULT_RULER.to_string(),
            doc_leader: String::new(),
            doc_header: DEFAULT_DOC_HEADER.to_string(),
            misc_header: DEFAULT_MISC_HEADER.to_string(),
            undoc_header: DEFAULT_UNDOC_HEADER.to_string(),
            use_raw_input: true,
            identchars: default_identchars(),
            display_width: DEFAULT_DISPLAY_WIDTH,
            hook_order: HookOrder::default(),
            exempt_commands: BTreeSet::new(),
        }
    }
}

impl Settings {
    /// Settings for an interpreter with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The effective prompt.
    pub fn prompt(&self) -> String {
        self.prompt.clone().unwrap_or_else(|| prompt_for(&self.name))
    }

    /// Whether `c` may appear in a command name.
    pub fn is_identchar(&self, c: char) -> bool {
        self.identchars.contains(c)
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    pub fn with_raw_input(mut self, use_raw_input: bool) -> Self {
        self.use_raw_input = use_raw_input;
        self
    }

    pub fn with_hook_order(mut self, hook_order: HookOrder) -> Self {
        self.hook_order = hook_order;
        self
    }

    /// Permit `name` to remain blocking in a strict interpreter.
    pub fn exempt(mut self, name: impl Into<String>) -> Self {
        self.exempt_commands.insert(name.into());
        self
    }
}
