//! `linecmd-commands`: command registration and dispatch.
//!
//! - [`types`]: method descriptors and handler shapes
//! - [`registry`]: the registry builder
//! - [`parser`]: line parsing
//! - [`dispatch`]: routing and invocation on [`Shell`]
//! - [`help`]: built-in `help` and listing layout
//! - [`completion`]: tab-completion candidates

pub mod completion;
pub mod dispatch;
pub mod help;
pub mod parser;
pub mod registry;
pub mod shell;
pub mod types;

pub use completion::{complete, completer};
pub use dispatch::Route;
pub use help::{clean_doc, columnize, help_blocking, help_suspending, list_topics, HELP_DOC};
pub use parser::{parse_line, ParsedLine};
pub use registry::{Registry, HELP_COMMAND};
pub use shell::Shell;
pub use types::{
    BlockingCommand, BlockingHelp, Body, Handler, Helper, Method, MethodTable, SuspendingCommand,
    SuspendingHelp,
};

/// Re-exported so handler authors can name `BoxFuture` without a direct dependency.
pub use futures::future::BoxFuture;
