/// Hook shapes and phases.
use std::fmt;

use futures::future::BoxFuture;
use linecmd_commands::Shell;
use linecmd_core::Kind;

/// Lifecycle points at which hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    /// Once, before the first prompt.
    LoopStart,
    /// Before each dispatch; may rewrite the line.
    LineStart,
    /// After each dispatch; may change the stop signal.
    LineEnd,
    /// Once, when the loop terminates.
    LoopEnd,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LoopStart => "loop-start",
            Self::LineStart => "line-start",
            Self::LineEnd => "line-end",
            Self::LoopEnd => "loop-end",
        })
    }
}

/// A hook tagged with its execution flavor.
#[derive(Clone, Copy)]
pub enum Hook<B, S> {
    Blocking(B),
    Suspending(S),
}

impl<B, S> Hook<B, S> {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Blocking(_) => Kind::Blocking,
            Self::Suspending(_) => Kind::Suspending,
        }
    }
}

impl<B, S> fmt::Debug for Hook<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook({})", self.kind())
    }
}

// ---------------------------------------------------------------------------
// Function shapes
// ---------------------------------------------------------------------------

/// Loop-start / loop-end hook.
pub type BlockingLoopHook<T> = fn(&mut Shell<T>) -> anyhow::Result<()>;
pub type SuspendingLoopHook<T> = for<'a> fn(&'a mut Shell<T>) -> BoxFuture<'a, anyhow::Result<()>>;

/// Line-start hook: receives the line, returns the line to dispatch.
pub type BlockingLineStartHook<T> = fn(&mut Shell<T>, String) -> anyhow::Result<String>;
pub type SuspendingLineStartHook<T> =
    for<'a> fn(&'a mut Shell<T>, String) -> BoxFuture<'a, anyhow::Result<String>>;

/// Line-end hook: receives the stop signal and line, returns the stop signal.
pub type BlockingLineEndHook<T> = fn(&mut Shell<T>, bool, &str) -> anyhow::Result<bool>;
pub type SuspendingLineEndHook<T> =
    for<'a> fn(&'a mut Shell<T>, bool, &'a str) -> BoxFuture<'a, anyhow::Result<bool>>;

pub type LoopHook<T> = Hook<BlockingLoopHook<T>, SuspendingLoopHook<T>>;
pub type LineStartHook<T> = Hook<BlockingLineStartHook<T>, SuspendingLineStartHook<T>>;
pub type LineEndHook<T> = Hook<BlockingLineEndHook<T>, SuspendingLineEndHook<T>>;

/// One blocking and one suspension-capable slot for a phase.
pub struct HookSlots<B, S> {
    pub blocking: Option<B>,
    pub suspending: Option<S>,
}

impl<B, S> Default for HookSlots<B, S> {
    fn default() -> Self {
        Self {
            blocking: None,
            suspending: None,
        }
    }
}

impl<B: Copy, S: Copy> HookSlots<B, S> {
    /// Occupied slots in execution order.
    pub fn ordered(&self, suspending_first: bool) -> Vec<Hook<B, S>> {
        let blocking = self.blocking.map(Hook::Blocking);
        let suspending = self.suspending.map(Hook::Suspending);
        let pair = if suspending_first {
            [suspending, blocking]
        } else {
            [blocking, suspending]
        };
        pair.into_iter().flatten().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.blocking.is_none() && self.suspending.is_none()
    }
}
