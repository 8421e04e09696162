/// Hook registry: at most one blocking and one suspension-capable hook per phase.
use tracing::debug;

use crate::types::{
    BlockingLineEndHook, BlockingLineStartHook, BlockingLoopHook, HookSlots,
    SuspendingLineEndHook, SuspendingLineStartHook, SuspendingLoopHook,
};

/// Hooks supplied when building an interpreter. Setting a slot twice keeps
/// the last hook.
pub struct HookRegistry<T> {
    pub(crate) loop_start: HookSlots<BlockingLoopHook<T>, SuspendingLoopHook<T>>,
    pub(crate) line_start: HookSlots<BlockingLineStartHook<T>, SuspendingLineStartHook<T>>,
    pub(crate) line_end: HookSlots<BlockingLineEndHook<T>, SuspendingLineEndHook<T>>,
    pub(crate) loop_end: HookSlots<BlockingLoopHook<T>, SuspendingLoopHook<T>>,
}

impl<T> Default for HookRegistry<T> {
    fn default() -> Self {
        Self {
            loop_start: HookSlots::default(),
            line_start: HookSlots::default(),
            line_end: HookSlots::default(),
            loop_end: HookSlots::default(),
        }
    }
}

impl<T> HookRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preloop(mut self, hook: BlockingLoopHook<T>) -> Self {
        debug!("[Hooks] registered blocking loop-start hook");
        self.loop_start.blocking = Some(hook);
        self
    }

    pub fn apreloop(mut self, hook: SuspendingLoopHook<T>) -> Self {
        debug!("[Hooks] registered suspending loop-start hook");
        self.loop_start.suspending = Some(hook);
        self
    }

    pub fn precmd(mut self, hook: BlockingLineStartHook<T>) -> Self {
        self.line_start.blocking = Some(hook);
        self
    }

    pub fn aprecmd(mut self, hook: SuspendingLineStartHook<T>) -> Self {
        self.line_start.suspending = Some(hook);
        self
    }

    pub fn postcmd(mut self, hook: BlockingLineEndHook<T>) -> Self {
        self.line_end.blocking = Some(hook);
        self
    }

    pub fn apostcmd(mut self, hook: SuspendingLineEndHook<T>) -> Self {
        self.line_end.suspending = Some(hook);
        self
    }

    pub fn postloop(mut self, hook: BlockingLoopHook<T>) -> Self {
        debug!("[Hooks] registered blocking loop-end hook");
        self.loop_end.blocking = Some(hook);
        self
    }

    pub fn apostloop(mut self, hook: SuspendingLoopHook<T>) -> Self {
        debug!("[Hooks] registered suspending loop-end hook");
        self.loop_end.suspending = Some(hook);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.loop_start.is_empty()
            && self.line_start.is_empty()
            && self.line_end.is_empty()
            && self.loop_end.is_empty()
    }
}
