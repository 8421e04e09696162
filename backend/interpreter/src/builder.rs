/// Interpreter builder.
use std::collections::VecDeque;
use std::sync::Arc;

use linecmd_commands::{Method, MethodTable, Registry, Shell};
use linecmd_config::Settings;
use linecmd_core::{
    stdout_sink, LineSource, Mode, OutputSink, RegistrationError, SharedEditor, StdinSource,
};
use linecmd_hooks::{HookRegistry, HookSequencer};
use tracing::info;

use crate::interpreter::Interpreter;

/// Collects everything an interpreter needs; [`build`](Self::build) runs the
/// registration pass and fails fast on an invalid method table.
pub struct InterpreterBuilder<T> {
    state: T,
    settings: Settings,
    methods: MethodTable<T>,
    hooks: HookRegistry<T>,
    source: Option<Box<dyn LineSource>>,
    output: Option<Box<dyn OutputSink>>,
    editor: Option<SharedEditor>,
    queue: VecDeque<String>,
}

impl<T: Send + 'static> InterpreterBuilder<T> {
    pub fn new(state: T) -> Self {
        Self {
            state,
            settings: Settings::default(),
            methods: MethodTable::new(),
            hooks: HookRegistry::new(),
            source: None,
            output: None,
            editor: None,
            queue: VecDeque::new(),
        }
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the method table.
    pub fn methods(mut self, methods: MethodTable<T>) -> Self {
        self.methods = methods;
        self
    }

    /// Append one method to the table.
    pub fn method(mut self, method: Method<T>) -> Self {
        self.methods.push(method);
        self
    }

    pub fn hooks(mut self, hooks: HookRegistry<T>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Line source; defaults to stdin.
    pub fn source(mut self, source: impl LineSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Output sink; defaults to stdout.
    pub fn output(mut self, output: impl OutputSink + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Line editor that receives the completer while a loop runs.
    pub fn editor(mut self, editor: SharedEditor) -> Self {
        self.editor = Some(editor);
        self
    }

    /// Pre-queue a line for the first loop.
    pub fn queue(mut self, line: impl Into<String>) -> Self {
        self.queue.push_back(line.into());
        self
    }

    pub fn build(self, mode: Mode) -> Result<Interpreter<T>, RegistrationError> {
        let registry = Registry::build(self.methods, mode, &self.settings.exempt_commands)?;
        let settings = Arc::new(self.settings);
        let hooks = HookSequencer::new(self.hooks, mode, settings.hook_order);

        let source: Box<dyn LineSource> = match self.source {
            Some(source) => source,
            None => Box::new(StdinSource),
        };
        let output: Box<dyn OutputSink> = match self.output {
            Some(output) => output,
            None => Box::new(stdout_sink()),
        };

        info!(
            "[Interpreter] built {} interpreter {} with {} commands",
            mode,
            settings.name,
            registry.len()
        );
        let shell = Shell::new(self.state, output, Arc::new(registry), settings);
        Ok(Interpreter::from_parts(shell, hooks, source, self.editor, self.queue))
    }

    pub fn blocking(self) -> Result<Interpreter<T>, RegistrationError> {
        self.build(Mode::Blocking)
    }

    /// Suspension-only interpreter; blocking commands must be exempted.
    pub fn strict(self) -> Result<Interpreter<T>, RegistrationError> {
        self.build(Mode::Strict)
    }

    pub fn hybrid(self) -> Result<Interpreter<T>, RegistrationError> {
        self.build(Mode::Hybrid)
    }
}
