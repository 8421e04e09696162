/// Dispatch engine: route a line to a handler and invoke it.
///
/// Routing is shared by the blocking and suspension-capable paths; only the
/// final invocation differs.
use linecmd_core::{CapabilityError, CmdResult, Session, EOF_LINE};
use tracing::debug;

use crate::shell::Shell;
use crate::types::Handler;

/// Where a line ends up.
pub enum Route<T> {
    /// Empty line with nothing to repeat.
    Nothing,
    /// Invoke a handler with an argument string.
    Call { handler: Handler<T>, args: String },
    /// No handler and no `default` override.
    Unknown { line: String },
}

impl<T> std::fmt::Debug for Route<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nothing => f.write_str("Nothing"),
            Self::Call { handler, args } => f
                .debug_struct("Call")
                .field("handler", handler)
                .field("args", args)
                .finish(),
            Self::Unknown { line } => f.debug_struct("Unknown").field("line", line).finish(),
        }
    }
}

impl<T> Shell<T> {
    /// Resolve `line` to a route, updating `session.lastcmd`.
    ///
    /// An empty line repeats `lastcmd` (or calls the `emptyline` override).
    /// Unparseable lines, empty command names, and unknown commands go to the
    /// `default` override, or become [`Route::Unknown`].
    pub fn route(&self, session: &mut Session, line: &str) -> Route<T> {
        let parsed = self.parse(line);
        if parsed.line.is_empty() {
            if let Some(handler) = self.registry().emptyline_handler() {
                return Route::Call {
                    handler,
                    args: String::new(),
                };
            }
            if session.lastcmd.is_empty() {
                return Route::Nothing;
            }
            let last = session.lastcmd.clone();
            debug!("[Dispatch] repeating {:?}", last);
            return self.route(session, &last);
        }

        let (Some(command), Some(args)) = (parsed.command, parsed.args) else {
            return self.fallback(parsed.line);
        };

        if parsed.line == EOF_LINE {
            session.lastcmd.clear();
        } else {
            session.lastcmd.clone_from(&parsed.line);
        }

        if command.is_empty() {
            return self.fallback(parsed.line);
        }
        match self.registry().command(&command) {
            Some(handler) => Route::Call { handler, args },
            None => self.fallback(parsed.line),
        }
    }

    fn fallback(&self, line: String) -> Route<T> {
        match self.registry().default_handler() {
            Some(handler) => Route::Call {
                handler,
                args: line,
            },
            None => Route::Unknown { line },
        }
    }

    /// Report an unrecognized line.
    pub fn unknown_syntax(&mut self, line: &str) -> std::io::Result<()> {
        self.writeln(&format!("Unknown syntax: {line}"))
    }

    /// Dispatch one line on the blocking path. Returns the stop signal.
    ///
    /// A suspension-capable handler cannot run here and yields a
    /// [`CapabilityError`].
    pub fn onecmd(&mut self, session: &mut Session, line: &str) -> CmdResult<bool> {
        match self.route(session, line) {
            Route::Nothing => Ok(false),
            Route::Unknown { line } => {
                self.unknown_syntax(&line)?;
                Ok(false)
            }
            Route::Call { handler, args } => match handler {
                Handler::Blocking(f) => Ok(f(self, &args)?),
                Handler::Suspending(_) => Err(CapabilityError::new(
                    self.registry().mode(),
                    "a suspension-capable handler on the blocking path",
                )
                .into()),
            },
        }
    }

    /// Dispatch one line, awaiting suspension-capable handlers.
    pub async fn onecmd_async(&mut self, session: &mut Session, line: &str) -> CmdResult<bool> {
        let route = self.route(session, line);
        match route {
            Route::Nothing => Ok(false),
            Route::Unknown { line } => {
                self.unknown_syntax(&line)?;
                Ok(false)
            }
            Route::Call { handler, args } => match handler {
                Handler::Blocking(f) => Ok(f(self, &args)?),
                Handler::Suspending(f) => Ok(f(self, &args).await?),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::types::{Method, MethodTable};
    use futures::future::BoxFuture;
    use linecmd_config::Settings;
    use linecmd_core::{BufferSink, CmdError, Mode};
    use std::collections::BTreeSet;
    use std::sync::Arc;

    #[derive(Default)]
    struct Calls(Vec<String>);

    fn do_foo(shell: &mut Shell<Calls>, args: &str) -> anyhow::Result<bool> {
        shell.state.0.push(format!("foo:{args}"));
        shell.writeln("foo-ran")?;
        Ok(false)
    }

    fn do_quit(_: &mut Shell<Calls>, _: &str) -> anyhow::Result<bool> {
        Ok(true)
    }

    fn do_fail(_: &mut Shell<Calls>, _: &str) -> anyhow::Result<bool> {
        anyhow::bail!("boom")
    }

    fn do_nap<'a>(shell: &'a mut Shell<Calls>, args: &'a str) -> BoxFuture<'a, anyhow::Result<bool>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            shell.state.0.push(format!("nap:{args}"));
            Ok(false)
        })
    }

    fn catch_all(shell: &mut Shell<Calls>, line: &str) -> anyhow::Result<bool> {
        shell.state.0.push(format!("default:{line}"));
        Ok(false)
    }

    fn table() -> MethodTable<Calls> {
        MethodTable::new()
            .with(Method::blocking("do_foo", do_foo))
            .with(Method::blocking("do_quit", do_quit))
            .with(Method::blocking("do_fail", do_fail))
    }

    fn shell(table: MethodTable<Calls>, mode: Mode) -> (Shell<Calls>, BufferSink) {
        let sink = BufferSink::new();
        let registry = Registry::build(table, mode, &BTreeSet::new()).unwrap();
        let shell = Shell::new(
            Calls::default(),
            Box::new(sink.clone()),
            Arc::new(registry),
            Arc::new(Settings::default()),
        );
        (shell, sink)
    }

    #[test]
    fn empty_line_repeats_last_command() {
        let (mut shell, sink) = shell(table(), Mode::Blocking);
        let mut session = Session::new();

        shell.onecmd(&mut session, "foo 1").unwrap();
        shell.onecmd(&mut session, "   ").unwrap();
        assert_eq!(sink.contents(), "foo-ran\nfoo-ran\n");
        assert_eq!(shell.state.0, ["foo:1", "foo:1"]);
    }

    #[test]
    fn empty_line_without_history_does_nothing() {
        let (mut shell, sink) = shell(table(), Mode::Blocking);
        let mut session = Session::new();
        assert!(matches!(shell.route(&mut session, ""), Route::Nothing));
        assert!(!shell.onecmd(&mut session, "").unwrap());
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn unknown_command_reports_syntax() {
        let (mut shell, sink) = shell(table(), Mode::Blocking);
        let mut session = Session::new();
        assert!(!shell.onecmd(&mut session, "zzz").unwrap());
        assert_eq!(sink.contents(), "Unknown syntax: zzz\n");
        assert_eq!(session.lastcmd, "zzz");
    }

    #[test]
    fn non_identifier_line_is_unknown_not_empty() {
        let (mut shell, sink) = shell(table(), Mode::Blocking);
        let mut session = Session::new();
        shell.onecmd(&mut session, "foo").unwrap();
        shell.onecmd(&mut session, "%%").unwrap();
        assert_eq!(sink.contents(), "foo-ran\nUnknown syntax: %%\n");
        assert_eq!(session.lastcmd, "%%");
    }

    #[test]
    fn eof_clears_last_command() {
        let (mut shell, _) = shell(table(), Mode::Blocking);
        let mut session = Session::new();
        shell.onecmd(&mut session, "foo").unwrap();
        shell.onecmd(&mut session, EOF_LINE).unwrap();
        assert!(session.lastcmd.is_empty());
    }

    #[test]
    fn default_override_receives_whole_line() {
        let (mut shell, sink) = shell(
            table().on_default(Handler::blocking(catch_all)),
            Mode::Blocking,
        );
        let mut session = Session::new();
        shell.onecmd(&mut session, " what is this ").unwrap();
        shell.onecmd(&mut session, "!nope").unwrap();
        assert_eq!(shell.state.0, ["default:what is this", "default:!nope"]);
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn emptyline_override_replaces_repeat() {
        let (mut shell, _) = shell(
            table().on_emptyline(Handler::blocking(catch_all)),
            Mode::Blocking,
        );
        let mut session = Session::new();
        shell.onecmd(&mut session, "foo").unwrap();
        shell.onecmd(&mut session, "").unwrap();
        assert_eq!(shell.state.0, ["foo:", "default:"]);
    }

    #[test]
    fn stop_signal_and_errors_propagate() {
        let (mut shell, _) = shell(table(), Mode::Blocking);
        let mut session = Session::new();
        assert!(shell.onecmd(&mut session, "quit").unwrap());
        let err = shell.onecmd(&mut session, "fail").unwrap_err();
        assert!(matches!(err, CmdError::Handler(_)));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn blocking_path_refuses_suspending_handler() {
        let (mut shell, _) = shell(
            table().with(Method::suspending("do_nap", do_nap)),
            Mode::Hybrid,
        );
        let mut session = Session::new();
        let err = shell.onecmd(&mut session, "nap").unwrap_err();
        assert!(matches!(err, CmdError::Capability(_)));
    }

    #[tokio::test]
    async fn async_path_runs_both_flavors() {
        let (mut shell, sink) = shell(
            table().with(Method::suspending("do_nap", do_nap)),
            Mode::Hybrid,
        );
        let mut session = Session::new();
        shell.onecmd_async(&mut session, "nap 5").await.unwrap();
        shell.onecmd_async(&mut session, "foo x").await.unwrap();
        shell.onecmd_async(&mut session, "").await.unwrap();
        assert_eq!(shell.state.0, ["nap:5", "foo:x", "foo:x"]);
        assert_eq!(sink.contents(), "foo-ran\nfoo-ran\n");
    }
}
