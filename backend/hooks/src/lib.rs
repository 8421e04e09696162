pub mod pipeline;
pub mod registry;
pub mod types;

pub use pipeline::HookSequencer;
pub use registry::HookRegistry;
pub use types::{
    BlockingLineEndHook, BlockingLineStartHook, BlockingLoopHook, Hook, HookPhase, HookSlots,
    LineEndHook, LineStartHook, LoopHook, SuspendingLineEndHook, SuspendingLineStartHook,
    SuspendingLoopHook,
};
