/// Hook sequencer.
///
/// Runs each phase's hooks strictly one after another, in the order chosen by
/// that phase's [`HookOrder`] flag (blocking first unless the flag is set).
/// Line-start hooks thread the line through; line-end hooks thread the stop
/// signal. Hooks of a flavor the interpreter mode cannot run are dropped at
/// construction with a warning.
use linecmd_commands::Shell;
use linecmd_config::HookOrder;
use linecmd_core::{Kind, Mode};
use tracing::{debug, warn};

use crate::registry::HookRegistry;
use crate::types::{BlockingLoopHook, Hook, HookPhase, HookSlots, SuspendingLoopHook};

pub struct HookSequencer<T> {
    hooks: HookRegistry<T>,
    order: HookOrder,
}

impl<T> HookSequencer<T> {
    /// Ordering flags are read once here and fixed for the sequencer's lifetime.
    pub fn new(mut hooks: HookRegistry<T>, mode: Mode, order: HookOrder) -> Self {
        retain_runnable(&mut hooks.loop_start, HookPhase::LoopStart, mode);
        retain_runnable(&mut hooks.line_start, HookPhase::LineStart, mode);
        retain_runnable(&mut hooks.line_end, HookPhase::LineEnd, mode);
        retain_runnable(&mut hooks.loop_end, HookPhase::LoopEnd, mode);
        Self { hooks, order }
    }

    pub fn order(&self) -> HookOrder {
        self.order
    }

    // -----------------------------------------------------------------------
    // Suspension-capable path
    // -----------------------------------------------------------------------

    pub async fn loop_start(&self, shell: &mut Shell<T>) -> anyhow::Result<()> {
        run_loop_hooks(&self.hooks.loop_start, self.order.apreloop_first, HookPhase::LoopStart, shell)
            .await
    }

    /// Returns the line to dispatch.
    pub async fn line_start(&self, shell: &mut Shell<T>, mut line: String) -> anyhow::Result<String> {
        for hook in self.hooks.line_start.ordered(self.order.aprecmd_first) {
            debug!("[Hooks] {} {:?}", HookPhase::LineStart, hook);
            line = match hook {
                Hook::Blocking(f) => f(shell, line)?,
                Hook::Suspending(f) => f(shell, line).await?,
            };
        }
        Ok(line)
    }

    /// Returns the (possibly changed) stop signal.
    pub async fn line_end(&self, shell: &mut Shell<T>, mut stop: bool, line: &str) -> anyhow::Result<bool> {
        for hook in self.hooks.line_end.ordered(self.order.apostcmd_first) {
            debug!("[Hooks] {} {:?}", HookPhase::LineEnd, hook);
            stop = match hook {
                Hook::Blocking(f) => f(shell, stop, line)?,
                Hook::Suspending(f) => f(shell, stop, line).await?,
            };
        }
        Ok(stop)
    }

    pub async fn loop_end(&self, shell: &mut Shell<T>) -> anyhow::Result<()> {
        run_loop_hooks(&self.hooks.loop_end, self.order.apostloop_first, HookPhase::LoopEnd, shell)
            .await
    }

    // -----------------------------------------------------------------------
    // Blocking path
    // -----------------------------------------------------------------------

    pub fn loop_start_blocking(&self, shell: &mut Shell<T>) -> anyhow::Result<()> {
        match self.hooks.loop_start.blocking {
            Some(f) => f(shell),
            None => Ok(()),
        }
    }

    pub fn line_start_blocking(&self, shell: &mut Shell<T>, line: String) -> anyhow::Result<String> {
        match self.hooks.line_start.blocking {
            Some(f) => f(shell, line),
            None => Ok(line),
        }
    }

    pub fn line_end_blocking(&self, shell: &mut Shell<T>, stop: bool, line: &str) -> anyhow::Result<bool> {
        match self.hooks.line_end.blocking {
            Some(f) => f(shell, stop, line),
            None => Ok(stop),
        }
    }

    pub fn loop_end_blocking(&self, shell: &mut Shell<T>) -> anyhow::Result<()> {
        match self.hooks.loop_end.blocking {
            Some(f) => f(shell),
            None => Ok(()),
        }
    }
}

async fn run_loop_hooks<T>(
    slots: &HookSlots<BlockingLoopHook<T>, SuspendingLoopHook<T>>,
    suspending_first: bool,
    phase: HookPhase,
    shell: &mut Shell<T>,
) -> anyhow::Result<()> {
    for hook in slots.ordered(suspending_first) {
        debug!("[Hooks] {} {:?}", phase, hook);
        match hook {
            Hook::Blocking(f) => f(shell)?,
            Hook::Suspending(f) => f(shell).await?,
        }
    }
    Ok(())
}

fn retain_runnable<B, S>(slots: &mut HookSlots<B, S>, phase: HookPhase, mode: Mode) {
    if slots.blocking.is_some() && !mode.runs_hooks_of(Kind::Blocking) {
        warn!("[Hooks] ignoring blocking {} hook in {} interpreter", phase, mode);
        slots.blocking = None;
    }
    if slots.suspending.is_some() && !mode.runs_hooks_of(Kind::Suspending) {
        warn!("[Hooks] ignoring suspension-capable {} hook in {} interpreter", phase, mode);
        slots.suspending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use linecmd_commands::{MethodTable, Registry};
    use linecmd_config::Settings;
    use linecmd_core::BufferSink;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    type Log = Vec<&'static str>;

    fn shell(mode: Mode) -> Shell<Log> {
        let registry = Registry::build(MethodTable::new(), mode, &BTreeSet::new()).unwrap();
        Shell::new(
            Vec::new(),
            Box::new(BufferSink::new()),
            Arc::new(registry),
            Arc::new(Settings::default()),
        )
    }

    fn preloop(shell: &mut Shell<Log>) -> anyhow::Result<()> {
        shell.state.push("preloop");
        Ok(())
    }

    fn apreloop(shell: &mut Shell<Log>) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            shell.state.push("apreloop");
            Ok(())
        })
    }

    fn precmd(shell: &mut Shell<Log>, line: String) -> anyhow::Result<String> {
        shell.state.push("precmd");
        Ok(format!("{line} +sync"))
    }

    fn aprecmd(shell: &mut Shell<Log>, line: String) -> BoxFuture<'_, anyhow::Result<String>> {
        Box::pin(async move {
            shell.state.push("aprecmd");
            Ok(format!("{line} +async"))
        })
    }

    fn postcmd(shell: &mut Shell<Log>, stop: bool, _line: &str) -> anyhow::Result<bool> {
        shell.state.push("postcmd");
        Ok(!stop)
    }

    fn apostcmd<'a>(shell: &'a mut Shell<Log>, stop: bool, line: &'a str) -> BoxFuture<'a, anyhow::Result<bool>> {
        Box::pin(async move {
            shell.state.push("apostcmd");
            Ok(stop || line == "exit")
        })
    }

    fn failing(_: &mut Shell<Log>) -> anyhow::Result<()> {
        anyhow::bail!("hook failed")
    }

    fn all_hooks() -> HookRegistry<Log> {
        HookRegistry::new()
            .preloop(preloop)
            .apreloop(apreloop)
            .precmd(precmd)
            .aprecmd(aprecmd)
            .postcmd(postcmd)
            .apostcmd(apostcmd)
    }

    #[tokio::test]
    async fn default_order_runs_blocking_first() {
        let sequencer = HookSequencer::new(all_hooks(), Mode::Hybrid, HookOrder::default());
        let mut shell = shell(Mode::Hybrid);

        sequencer.loop_start(&mut shell).await.unwrap();
        let line = sequencer.line_start(&mut shell, "noop".into()).await.unwrap();
        assert_eq!(line, "noop +sync +async");
        assert_eq!(shell.state, ["preloop", "apreloop", "precmd", "aprecmd"]);
    }

    #[tokio::test]
    async fn flag_flips_only_its_phase() {
        let order = HookOrder {
            aprecmd_first: true,
            ..HookOrder::default()
        };
        let sequencer = HookSequencer::new(all_hooks(), Mode::Hybrid, order);
        let mut shell = shell(Mode::Hybrid);

        sequencer.loop_start(&mut shell).await.unwrap();
        let line = sequencer.line_start(&mut shell, "noop".into()).await.unwrap();
        sequencer.line_end(&mut shell, false, &line).await.unwrap();
        assert_eq!(line, "noop +async +sync");
        assert_eq!(
            shell.state,
            ["preloop", "apreloop", "aprecmd", "precmd", "postcmd", "apostcmd"]
        );
    }

    #[tokio::test]
    async fn stop_signal_threads_through_line_end() {
        let mut shell = shell(Mode::Hybrid);

        let blocking_first = HookSequencer::new(all_hooks(), Mode::Hybrid, HookOrder::default());
        assert!(blocking_first.line_end(&mut shell, false, "x").await.unwrap());

        let order = HookOrder {
            apostcmd_first: true,
            ..HookOrder::default()
        };
        let suspending_first = HookSequencer::new(all_hooks(), Mode::Hybrid, order);
        assert!(!suspending_first.line_end(&mut shell, true, "x").await.unwrap());
    }

    #[tokio::test]
    async fn strict_mode_drops_blocking_hooks() {
        let sequencer = HookSequencer::new(all_hooks(), Mode::Strict, HookOrder::default());
        let mut shell = shell(Mode::Strict);
        sequencer.loop_start(&mut shell).await.unwrap();
        let line = sequencer.line_start(&mut shell, "x".into()).await.unwrap();
        assert_eq!(line, "x +async");
        assert_eq!(shell.state, ["apreloop", "aprecmd"]);
    }

    #[test]
    fn blocking_mode_runs_blocking_side_only() {
        let sequencer = HookSequencer::new(all_hooks(), Mode::Blocking, HookOrder::default());
        let mut shell = shell(Mode::Blocking);
        sequencer.loop_start_blocking(&mut shell).unwrap();
        let line = sequencer.line_start_blocking(&mut shell, "x".into()).unwrap();
        let stop = sequencer.line_end_blocking(&mut shell, false, &line).unwrap();
        sequencer.loop_end_blocking(&mut shell).unwrap();
        assert_eq!(line, "x +sync");
        assert!(stop);
        assert_eq!(shell.state, ["preloop", "precmd", "postcmd"]);
    }

    #[tokio::test]
    async fn hook_errors_propagate() {
        let hooks = HookRegistry::new().postloop(failing).apostloop(apreloop);
        let sequencer = HookSequencer::new(hooks, Mode::Hybrid, HookOrder::default());
        let mut shell = shell(Mode::Hybrid);
        let err = sequencer.loop_end(&mut shell).await.unwrap_err();
        assert_eq!(err.to_string(), "hook failed");
        assert!(shell.state.is_empty());
    }
}
