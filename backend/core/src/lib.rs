pub mod error;
pub mod io;
pub mod types;

pub use error::{CapabilityError, CmdError, CmdResult, RegistrationError};
pub use io::{
    stdout_sink, BufferSink, Completer, CompletionRequest, LineEditor, LineSource, MemoryEditor,
    OutputSink, ReaderSource, ScriptSource, SharedEditor, StdinSource, WriterSink,
};
pub use types::{Kind, Mode, Session, EOF_LINE};
