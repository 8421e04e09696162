//! `linecmd`: line-oriented command interpreters.
//!
//! Three variants share one registry, parser, and dispatch engine:
//!
//! - **blocking**: blocking handlers and hooks only, driven by [`Interpreter::cmdloop`]
//! - **strict**: suspension-capable handlers only (blocking ones must be exempted),
//!   driven by [`Interpreter::acmdloop`]
//! - **hybrid**: both flavors, with per-phase hook ordering, driven by
//!   [`Interpreter::acmdloop`]
//!
//! ```ignore
//! let mut interp = Interpreter::builder(State::default())
//!     .method(Method::blocking("do_greet", greet).doc("Say hello."))
//!     .method(Method::suspending("do_fetch", fetch))
//!     .hybrid()?;
//! interp.acmdloop().await?;
//! ```

pub mod builder;
pub mod interpreter;
pub mod scope;

pub use builder::InterpreterBuilder;
pub use interpreter::{Interpreter, LoopState};
pub use scope::CompleterScope;

pub use linecmd_commands::{
    BlockingCommand, BlockingHelp, BoxFuture, Handler, Helper, Method, MethodTable, Shell,
    SuspendingCommand, SuspendingHelp,
};
pub use linecmd_config::{HookOrder, Settings};
pub use linecmd_core::{
    BufferSink, CapabilityError, CmdError, CmdResult, Completer, CompletionRequest, LineEditor,
    LineSource, MemoryEditor, Mode, OutputSink, ReaderSource, RegistrationError, ScriptSource,
    Session, SharedEditor, StdinSource, WriterSink,
};
pub use linecmd_hooks::HookRegistry;
