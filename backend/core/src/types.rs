use std::collections::VecDeque;
use std::fmt;

/// Line surfaced to handlers when the line source is exhausted.
pub const EOF_LINE: &str = "EOF";

/// Execution flavor of a handler, helper, or hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Runs to completion without ceding control.
    Blocking,
    /// Must be awaited; may cede control at its await points.
    Suspending,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blocking => "blocking",
            Self::Suspending => "suspension-capable",
        })
    }
}

/// Interpreter variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Blocking loop; blocking handlers and hooks only.
    Blocking,
    /// Suspension-capable loop; blocking commands only when exempted.
    Strict,
    /// Suspension-capable loop running both flavors.
    Hybrid,
}

impl Mode {
    /// Whether hooks of the given flavor run under this mode.
    pub fn runs_hooks_of(self, kind: Kind) -> bool {
        !matches!(
            (self, kind),
            (Self::Blocking, Kind::Suspending) | (Self::Strict, Kind::Blocking)
        )
    }

    /// Whether the blocking `cmdloop` entry point is available.
    pub fn supports_blocking_loop(self) -> bool {
        self == Self::Blocking
    }

    /// Whether the suspension-capable `acmdloop` entry point is available.
    pub fn supports_suspending_loop(self) -> bool {
        self != Self::Blocking
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blocking => "blocking",
            Self::Strict => "strict",
            Self::Hybrid => "hybrid",
        })
    }
}

/// Per-loop-invocation state, created at loop entry and dropped at exit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Last non-empty line dispatched; empty after `EOF`.
    pub lastcmd: String,
    /// Lines consulted before the line source.
    pub cmdqueue: VecDeque<String>,
    /// Set once a dispatch (after line-end hooks) signals termination.
    pub stop: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose pending queue is pre-filled.
    pub fn with_queue(cmdqueue: impl IntoIterator<Item = String>) -> Self {
        Self {
            cmdqueue: cmdqueue.into_iter().collect(),
            ..Self::default()
        }
    }
}
