//! Abstract line source, output sink, and line-editor capability.
//!
//! The interpreter core never touches a terminal directly: lines come from a
//! [`LineSource`], text goes to an [`OutputSink`], and completion is wired
//! through an injected [`LineEditor`].

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError};

// ---------------------------------------------------------------------------
// Line source
// ---------------------------------------------------------------------------

/// Produces input lines one at a time.
pub trait LineSource: Send {
    /// Read the next line without its terminator. `Ok(None)` is end of input.
    ///
    /// `prompt` is `Some` in raw-input mode, where the source itself is
    /// responsible for displaying it.
    fn read_line(&mut self, prompt: Option<&str>) -> io::Result<Option<String>>;
}

/// Interactive terminal input: prompts on stdout, reads stdin.
#[derive(Debug, Default)]
pub struct StdinSource;

impl LineSource for StdinSource {
    fn read_line(&mut self, prompt: Option<&str>) -> io::Result<Option<String>> {
        if let Some(prompt) = prompt {
            let mut stdout = io::stdout().lock();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_terminator(line)))
    }
}

/// Pre-supplied input from any buffered reader (files, pipes).
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead + Send> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead + Send> LineSource for ReaderSource<R> {
    fn read_line(&mut self, _prompt: Option<&str>) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_terminator(line)))
    }
}

/// A fixed script of lines, exhausted in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptSource {
    lines: VecDeque<String>,
}

impl ScriptSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a block of text on newlines.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptSource {
    fn read_line(&mut self, _prompt: Option<&str>) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

fn strip_terminator(mut line: String) -> String {
    let kept = line.trim_end_matches(&['\r', '\n'][..]).len();
    line.truncate(kept);
    line
}

// ---------------------------------------------------------------------------
// Output sink
// ---------------------------------------------------------------------------

/// Accepts text for display. Writes are visible before the next write.
pub trait OutputSink: Send {
    fn write_str(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Adapts any `io::Write` (stdout, files, sockets) into an [`OutputSink`].
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> OutputSink for WriterSink<W> {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Sink writing to the process stdout.
pub fn stdout_sink() -> WriterSink<io::Stdout> {
    WriterSink::new(io::stdout())
}

/// In-memory sink; clones share one buffer so callers can inspect output
/// after handing a clone to an interpreter.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    buffer: Arc<Mutex<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return and clear the buffered text.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.buffer.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl OutputSink for BufferSink {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Line editor capability
// ---------------------------------------------------------------------------

/// One completion query from a line editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// The word being completed.
    pub text: String,
    /// The whole input buffer.
    pub buffer: String,
    /// Byte offsets of `text` within `buffer`.
    pub begidx: usize,
    pub endidx: usize,
}

/// Completion callback installed into a line editor.
pub type Completer = Arc<dyn Fn(&CompletionRequest) -> Vec<String> + Send + Sync>;

/// Interactive line-editing capability (key binding and completion hook).
pub trait LineEditor: Send {
    /// Bind the completion trigger key.
    fn bind(&mut self, trigger: &str);

    fn set_completer(&mut self, completer: Option<Completer>);

    fn completer(&self) -> Option<Completer>;
}

/// Editor shared between an interpreter and the code driving the terminal.
pub type SharedEditor = Arc<Mutex<dyn LineEditor>>;

/// Headless editor that records bindings; useful when no terminal library
/// is attached.
#[derive(Default)]
pub struct MemoryEditor {
    bindings: Vec<String>,
    completer: Option<Completer>,
}

impl MemoryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }

    /// Run the installed completer, if any.
    pub fn complete(&self, request: &CompletionRequest) -> Vec<String> {
        self.completer
            .as_ref()
            .map(|complete| complete(request))
            .unwrap_or_default()
    }
}

impl LineEditor for MemoryEditor {
    fn bind(&mut self, trigger: &str) {
        self.bindings.push(trigger.to_string());
    }

    fn set_completer(&mut self, completer: Option<Completer>) {
        self.completer = completer;
    }

    fn completer(&self) -> Option<Completer> {
        self.completer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_source_strips_terminators() {
        let mut source = ReaderSource::new(io::Cursor::new("foo\r\nbar\nbaz"));
        assert_eq!(source.read_line(None).unwrap().as_deref(), Some("foo"));
        assert_eq!(source.read_line(None).unwrap().as_deref(), Some("bar"));
        assert_eq!(source.read_line(None).unwrap().as_deref(), Some("baz"));
        assert_eq!(source.read_line(None).unwrap(), None);
    }

    #[test]
    fn reader_source_keeps_blank_lines() {
        let mut source = ReaderSource::new(io::Cursor::new("\nx\n"));
        assert_eq!(source.read_line(None).unwrap().as_deref(), Some(""));
        assert_eq!(source.read_line(None).unwrap().as_deref(), Some("x"));
        assert_eq!(source.read_line(None).unwrap(), None);
    }

    #[test]
    fn script_source_drains_in_order() {
        let mut source = ScriptSource::from_text("one\ntwo");
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.read_line(Some("> ")).unwrap().as_deref(), Some("one"));
        assert_eq!(source.read_line(None).unwrap().as_deref(), Some("two"));
        assert_eq!(source.read_line(None).unwrap(), None);
    }

    #[test]
    fn buffer_sink_clones_share_storage() {
        let sink = BufferSink::new();
        let mut handle = sink.clone();
        handle.write_str("hello ").unwrap();
        handle.write_str("world").unwrap();
        assert_eq!(sink.contents(), "hello world");
        assert_eq!(sink.take(), "hello world");
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn writer_sink_writes_bytes() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_str("abc").unwrap();
        assert_eq!(sink.into_inner(), b"abc");
    }

    #[test]
    fn memory_editor_swaps_completers() {
        let mut editor = MemoryEditor::new();
        assert!(editor.completer().is_none());

        let completer: Completer = Arc::new(|req: &CompletionRequest| vec![format!("{}!", req.text)]);
        editor.set_completer(Some(completer));
        editor.bind("tab");

        let request = CompletionRequest {
            text: "he".into(),
            buffer: "he".into(),
            begidx: 0,
            endidx: 2,
        };
        assert_eq!(editor.complete(&request), vec!["he!".to_string()]);
        assert_eq!(editor.bindings(), ["tab".to_string()]);
    }
}
