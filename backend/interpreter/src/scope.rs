/// Scoped completer installation on an injected line editor.
use std::sync::PoisonError;

use linecmd_core::{Completer, SharedEditor};
use tracing::debug;

/// Installs a completer and binds its trigger key; the previous completer is
/// restored when the scope drops, including on error paths.
pub struct CompleterScope {
    editor: SharedEditor,
    previous: Option<Completer>,
}

impl CompleterScope {
    pub fn install(editor: SharedEditor, completer: Completer, trigger: &str) -> Self {
        let previous = {
            let mut guard = editor.lock().unwrap_or_else(PoisonError::into_inner);
            let previous = guard.completer();
            guard.set_completer(Some(completer));
            guard.bind(trigger);
            previous
        };
        debug!("[Scope] completer installed on {}", trigger);
        Self { editor, previous }
    }
}

impl Drop for CompleterScope {
    fn drop(&mut self) {
        let mut guard = self.editor.lock().unwrap_or_else(PoisonError::into_inner);
        guard.set_completer(self.previous.take());
        debug!("[Scope] completer restored");
    }
}
