//! Method descriptors: the explicit registration pass that feeds the registry.
//!
//! An interpreter's commands, helpers, and help topics are described by a
//! [`MethodTable`] of [`Method`] values. Each method carries its own name, a
//! body, and optional role markers; methods without markers fall back to the
//! `do_<name>` / `help_<name>` naming conventions.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use linecmd_core::Kind;

use crate::help::clean_doc;
use crate::shell::Shell;

/// Prefix that makes a method a command by convention.
pub const COMMAND_PREFIX: &str = "do_";
/// Prefix that makes a method a helper by convention.
pub const HELPER_PREFIX: &str = "help_";

// ---------------------------------------------------------------------------
// Function shapes
// ---------------------------------------------------------------------------

/// Blocking command body. Returns `true` to stop the loop.
pub type BlockingCommand<T> = fn(&mut Shell<T>, &str) -> anyhow::Result<bool>;

/// Suspension-capable command body.
pub type SuspendingCommand<T> =
    for<'a> fn(&'a mut Shell<T>, &'a str) -> BoxFuture<'a, anyhow::Result<bool>>;

/// Blocking help renderer.
pub type BlockingHelp<T> = fn(&mut Shell<T>) -> anyhow::Result<()>;

/// Suspension-capable help renderer.
pub type SuspendingHelp<T> = for<'a> fn(&'a mut Shell<T>) -> BoxFuture<'a, anyhow::Result<()>>;

// ---------------------------------------------------------------------------
// Handler / Helper
// ---------------------------------------------------------------------------

/// A command implementation, tagged with its execution flavor.
pub enum Handler<T> {
    Blocking(BlockingCommand<T>),
    Suspending(SuspendingCommand<T>),
}

impl<T> Handler<T> {
    pub fn blocking(f: BlockingCommand<T>) -> Self {
        Self::Blocking(f)
    }

    pub fn suspending(f: SuspendingCommand<T>) -> Self {
        Self::Suspending(f)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Blocking(_) => Kind::Blocking,
            Self::Suspending(_) => Kind::Suspending,
        }
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handler<T> {}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({})", self.kind())
    }
}

/// Renders help for one command or topic.
pub enum Helper<T> {
    Blocking(BlockingHelp<T>),
    Suspending(SuspendingHelp<T>),
    /// Static text, already cleaned.
    Doc(Arc<str>),
}

impl<T> Helper<T> {
    /// Doc helpers never suspend, so they count as blocking.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Suspending(_) => Kind::Suspending,
            Self::Blocking(_) | Self::Doc(_) => Kind::Blocking,
        }
    }
}

impl<T> Clone for Helper<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Blocking(f) => Self::Blocking(*f),
            Self::Suspending(f) => Self::Suspending(*f),
            Self::Doc(text) => Self::Doc(Arc::clone(text)),
        }
    }
}

impl<T> fmt::Debug for Helper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doc(text) => f.debug_tuple("Doc").field(text).finish(),
            other => write!(f, "Helper({})", other.kind()),
        }
    }
}

/// What a method does when invoked.
pub enum Body<T> {
    Command(Handler<T>),
    Help(Helper<T>),
}

impl<T> Body<T> {
    pub(crate) fn role(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Help(_) => "helper",
        }
    }
}

// ---------------------------------------------------------------------------
// Method descriptor
// ---------------------------------------------------------------------------

/// One entry of a method table.
///
/// ```ignore
/// Method::blocking("greet", greet).command().doc("Say hello.")
/// Method::blocking("do_quit", do_quit)
/// Method::text("help_greet", "Usage: greet NAME")
/// ```
pub struct Method<T> {
    pub(crate) name: String,
    pub(crate) body: Body<T>,
    pub(crate) command_mark: Option<String>,
    pub(crate) helper_mark: Option<String>,
    pub(crate) topic_mark: Option<String>,
    pub(crate) doc: Option<String>,
}

impl<T> Method<T> {
    fn with_body(name: impl Into<String>, body: Body<T>) -> Self {
        Self {
            name: name.into(),
            body,
            command_mark: None,
            helper_mark: None,
            topic_mark: None,
            doc: None,
        }
    }

    pub fn blocking(name: impl Into<String>, f: BlockingCommand<T>) -> Self {
        Self::with_body(name, Body::Command(Handler::Blocking(f)))
    }

    pub fn suspending(name: impl Into<String>, f: SuspendingCommand<T>) -> Self {
        Self::with_body(name, Body::Command(Handler::Suspending(f)))
    }

    pub fn blocking_helper(name: impl Into<String>, f: BlockingHelp<T>) -> Self {
        Self::with_body(name, Body::Help(Helper::Blocking(f)))
    }

    pub fn suspending_helper(name: impl Into<String>, f: SuspendingHelp<T>) -> Self {
        Self::with_body(name, Body::Help(Helper::Suspending(f)))
    }

    /// A helper that writes fixed text (cleaned like a docstring).
    pub fn text(name: impl Into<String>, text: &str) -> Self {
        Self::with_body(name, Body::Help(Helper::Doc(Arc::from(clean_doc(text)))))
    }

    /// Mark as a command under the method's own name.
    pub fn command(mut self) -> Self {
        self.command_mark = Some(self.name.clone());
        self
    }

    /// Mark as a command under an explicit name.
    pub fn command_as(mut self, name: impl Into<String>) -> Self {
        self.command_mark = Some(name.into());
        self
    }

    /// Mark as the helper of the named command.
    pub fn helps(mut self, target: impl Into<String>) -> Self {
        self.helper_mark = Some(target.into());
        self
    }

    /// Mark as a help-only topic.
    pub fn topic(mut self, name: impl Into<String>) -> Self {
        self.topic_mark = Some(name.into());
        self
    }

    /// Attach a docstring; documented commands get a help entry for free.
    pub fn doc(mut self, text: impl Into<String>) -> Self {
        self.doc = Some(text.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The full set of methods one interpreter exposes, plus its overrides.
pub struct MethodTable<T> {
    pub(crate) methods: Vec<Method<T>>,
    pub(crate) default: Option<Handler<T>>,
    pub(crate) emptyline: Option<Handler<T>>,
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self {
            methods: Vec::new(),
            default: None,
            emptyline: None,
        }
    }
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, method: Method<T>) -> Self {
        self.methods.push(method);
        self
    }

    pub fn push(&mut self, method: Method<T>) {
        self.methods.push(method);
    }

    /// Replace the unknown-command handler; it receives the whole line.
    pub fn on_default(mut self, handler: Handler<T>) -> Self {
        self.default = Some(handler);
        self
    }

    /// Replace the empty-line behavior (repeat last command).
    pub fn on_emptyline(mut self, handler: Handler<T>) -> Self {
        self.emptyline = Some(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<T> Extend<Method<T>> for MethodTable<T> {
    fn extend<I: IntoIterator<Item = Method<T>>>(&mut self, iter: I) {
        self.methods.extend(iter);
    }
}
