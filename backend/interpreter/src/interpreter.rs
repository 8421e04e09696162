//! The command loop.
//!
//! One [`Interpreter`] drives one loop at a time. Each loop invocation owns a
//! fresh [`Session`]; the interpreter itself can be looped again after it
//! terminates.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use linecmd_commands::{completer, Shell};
use linecmd_core::{
    CapabilityError, CmdError, CmdResult, LineSource, Mode, Session, SharedEditor, EOF_LINE,
};
use linecmd_hooks::HookSequencer;
use tracing::{debug, info, warn};

use crate::builder::InterpreterBuilder;
use crate::scope::CompleterScope;

/// Lifecycle of an interpreter's loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Looping,
    Terminated,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Looping => "looping",
            Self::Terminated => "terminated",
        })
    }
}

pub struct Interpreter<T> {
    shell: Shell<T>,
    hooks: HookSequencer<T>,
    source: Box<dyn LineSource>,
    editor: Option<SharedEditor>,
    pending: VecDeque<String>,
    state: LoopState,
}

impl<T: Send + 'static> Interpreter<T> {
    pub fn builder(state: T) -> InterpreterBuilder<T> {
        InterpreterBuilder::new(state)
    }

    pub(crate) fn from_parts(
        shell: Shell<T>,
        hooks: HookSequencer<T>,
        source: Box<dyn LineSource>,
        editor: Option<SharedEditor>,
        pending: VecDeque<String>,
    ) -> Self {
        Self {
            shell,
            hooks,
            source,
            editor,
            pending,
            state: LoopState::Idle,
        }
    }

    pub fn mode(&self) -> Mode {
        self.shell.registry().mode()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn shell(&self) -> &Shell<T> {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut Shell<T> {
        &mut self.shell
    }

    /// Queue a line for the next loop invocation, ahead of the line source.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.pending.push_back(line.into());
    }

    /// Dispatch a single line outside a loop (blocking path).
    pub fn onecmd(&mut self, session: &mut Session, line: &str) -> CmdResult<bool> {
        self.shell.onecmd(session, line)
    }

    /// Dispatch a single line outside a loop, awaiting suspending handlers.
    pub async fn aonecmd(&mut self, session: &mut Session, line: &str) -> CmdResult<bool> {
        self.shell.onecmd_async(session, line).await
    }

    // -----------------------------------------------------------------------
    // Loops
    // -----------------------------------------------------------------------

    /// Run the blocking loop until a handler signals stop.
    ///
    /// Only available on blocking interpreters.
    pub fn cmdloop(&mut self) -> CmdResult<()> {
        self.enter("cmdloop", Mode::supports_blocking_loop)?;
        let mut session = Session::with_queue(self.pending.drain(..));
        let mut scope = None;

        let body = self.blocking_body(&mut session, &mut scope);
        let teardown = self
            .hooks
            .loop_end_blocking(&mut self.shell)
            .map_err(CmdError::from);
        drop(scope);
        self.finish(body, teardown)
    }

    /// Run the suspension-capable loop until a handler signals stop.
    ///
    /// Available on strict and hybrid interpreters.
    pub async fn acmdloop(&mut self) -> CmdResult<()> {
        self.enter("acmdloop", Mode::supports_suspending_loop)?;
        let mut session = Session::with_queue(self.pending.drain(..));
        let mut scope = None;

        let body = self.suspending_body(&mut session, &mut scope).await;
        let teardown = self
            .hooks
            .loop_end(&mut self.shell)
            .await
            .map_err(CmdError::from);
        drop(scope);
        self.finish(body, teardown)
    }

    fn blocking_body(
        &mut self,
        session: &mut Session,
        scope: &mut Option<CompleterScope>,
    ) -> CmdResult<()> {
        self.hooks.loop_start_blocking(&mut self.shell)?;
        *scope = self.install_completer();
        self.write_intro()?;

        while !session.stop {
            let line = self.next_line(session)?;
            let line = self.hooks.line_start_blocking(&mut self.shell, line)?;
            let stop = self.shell.onecmd(session, &line)?;
            session.stop = self.hooks.line_end_blocking(&mut self.shell, stop, &line)?;
            session.cmdqueue.extend(self.shell.take_queued());
        }
        Ok(())
    }

    async fn suspending_body(
        &mut self,
        session: &mut Session,
        scope: &mut Option<CompleterScope>,
    ) -> CmdResult<()> {
        self.hooks.loop_start(&mut self.shell).await?;
        *scope = self.install_completer();
        self.write_intro()?;

        while !session.stop {
            let line = self.next_line(session)?;
            let line = self.hooks.line_start(&mut self.shell, line).await?;
            let stop = self.shell.onecmd_async(session, &line).await?;
            session.stop = self.hooks.line_end(&mut self.shell, stop, &line).await?;
            session.cmdqueue.extend(self.shell.take_queued());
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Loop plumbing
    // -----------------------------------------------------------------------

    fn enter(&mut self, entry: &str, supported: fn(Mode) -> bool) -> CmdResult<()> {
        let mode = self.mode();
        if !supported(mode) {
            return Err(CapabilityError::new(mode, entry).into());
        }
        info!("[Interpreter] {} {} starting", mode, entry);
        self.state = LoopState::Looping;
        Ok(())
    }

    fn finish(&mut self, body: CmdResult<()>, teardown: CmdResult<()>) -> CmdResult<()> {
        self.state = LoopState::Terminated;
        if let Err(e) = self.shell.flush() {
            warn!("[Interpreter] flushing output failed: {}", e);
        }
        info!("[Interpreter] loop terminated");
        match (body, teardown) {
            (Err(body), Err(teardown)) => {
                warn!("[Interpreter] loop-end hook failed during error exit: {}", teardown);
                Err(body)
            }
            (Err(body), Ok(())) => Err(body),
            (Ok(()), teardown) => teardown,
        }
    }

    fn install_completer(&self) -> Option<CompleterScope> {
        let settings = self.shell.settings();
        if !settings.use_raw_input {
            return None;
        }
        let key = settings.completekey.as_deref()?;
        let editor = self.editor.as_ref()?;
        let complete = completer(self.shell.registry_handle(), self.shell.settings_handle());
        Some(CompleterScope::install(Arc::clone(editor), complete, key))
    }

    fn write_intro(&mut self) -> CmdResult<()> {
        if let Some(intro) = self.shell.settings().intro.clone() {
            if !intro.is_empty() {
                self.shell.writeln(&intro)?;
            }
        }
        Ok(())
    }

    /// Next line from the session queue, else the line source. End of input
    /// becomes `EOF`.
    fn next_line(&mut self, session: &mut Session) -> CmdResult<String> {
        if let Some(line) = session.cmdqueue.pop_front() {
            return Ok(line);
        }
        let prompt = self.shell.settings().prompt();
        let read = if self.shell.settings().use_raw_input {
            self.source.read_line(Some(&prompt))?
        } else {
            self.shell.write(&prompt)?;
            self.shell.flush()?;
            self.source.read_line(None)?
        };
        let line = match read {
            Some(line) => line.trim_end_matches(&['\r', '\n'][..]).to_string(),
            None => EOF_LINE.to_string(),
        };
        debug!("[Interpreter] read {:?}", line);
        Ok(line)
    }
}
