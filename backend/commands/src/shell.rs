/// Handler-side view of a running interpreter.
///
/// Every command, helper, and hook receives `&mut Shell<T>`: the user state,
/// the output sink, and read access to the registry and settings.
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;

use linecmd_config::Settings;
use linecmd_core::OutputSink;

use crate::parser::{parse_line, ParsedLine};
use crate::registry::Registry;

pub struct Shell<T> {
    /// User state shared by all handlers of this interpreter.
    pub state: T,
    out: Box<dyn OutputSink>,
    registry: Arc<Registry<T>>,
    settings: Arc<Settings>,
    outbox: VecDeque<String>,
}

impl<T> Shell<T> {
    pub fn new(
        state: T,
        out: Box<dyn OutputSink>,
        registry: Arc<Registry<T>>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            state,
            out,
            registry,
            settings,
            outbox: VecDeque::new(),
        }
    }

    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_str(text)
    }

    pub fn writeln(&mut self, text: &str) -> io::Result<()> {
        self.out.write_str(text)?;
        self.out.write_str("\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn registry(&self) -> &Registry<T> {
        &self.registry
    }

    pub fn registry_handle(&self) -> Arc<Registry<T>> {
        Arc::clone(&self.registry)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_handle(&self) -> Arc<Settings> {
        Arc::clone(&self.settings)
    }

    /// Queue a line to run after the current dispatch finishes.
    pub fn enqueue(&mut self, line: impl Into<String>) {
        self.outbox.push_back(line.into());
    }

    /// Drain lines queued by handlers, oldest first.
    pub fn take_queued(&mut self) -> impl Iterator<Item = String> + '_ {
        self.outbox.drain(..)
    }

    /// Parse a line with this interpreter's identifier set and shell shorthand.
    pub fn parse(&self, line: &str) -> ParsedLine {
        let settings = &self.settings;
        parse_line(
            line,
            |c| settings.is_identchar(c),
            self.registry.has_command("shell"),
        )
    }
}
