use thiserror::Error;

use crate::types::Mode;

/// Construction-time failure: the method table cannot form a valid registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("method `{method}` cannot be both a command and a helper")]
    DualRole { method: String },

    #[error("method `{method}` is marked as a {marker} but its body is a {body}")]
    RoleMismatch {
        method: String,
        marker: &'static str,
        body: &'static str,
    },

    #[error("command `{name}` is explicitly registered by both `{first}` and `{second}`")]
    DuplicateCommand {
        name: String,
        first: String,
        second: String,
    },

    #[error("help for `{name}` is explicitly registered by both `{first}` and `{second}`")]
    DuplicateHelper {
        name: String,
        first: String,
        second: String,
    },

    #[error("blocking commands ({}) are not allowed in a strict interpreter", .names.join(", "))]
    BlockingCommands { names: Vec<String> },

    #[error("suspension-capable handlers ({}) cannot run in a blocking interpreter", .names.join(", "))]
    SuspendingInBlocking { names: Vec<String> },

    #[error("helpers ({}) are defined for non-existent commands", .names.join(", "))]
    OrphanHelpers { names: Vec<String> },
}

/// Call-time failure: the interpreter variant cannot run the requested entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{mode} interpreter cannot run {entry}")]
pub struct CapabilityError {
    pub mode: Mode,
    pub entry: String,
}

impl CapabilityError {
    pub fn new(mode: Mode, entry: impl Into<String>) -> Self {
        Self {
            mode,
            entry: entry.into(),
        }
    }
}

/// Top-level error type for running an interpreter.
#[derive(Debug, Error)]
pub enum CmdError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// A handler, helper, or hook failed; propagated unchanged.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

pub type CmdResult<T> = std::result::Result<T, CmdError>;
