/// Tab-completion logic for command names and help topics.
use std::collections::BTreeSet;
use std::sync::Arc;

use linecmd_config::Settings;
use linecmd_core::{Completer, CompletionRequest};

use crate::parser::parse_line;
use crate::registry::{Registry, HELP_COMMAND};

/// Candidates for the word described by `request`, sorted and de-duplicated.
///
/// The first word completes against command names; the argument of `help`
/// completes against commands and topics. Other arguments get nothing.
pub fn complete<T>(
    registry: &Registry<T>,
    settings: &Settings,
    request: &CompletionRequest,
) -> Vec<String> {
    let line = request.buffer.trim_start();
    let stripped = request.buffer.len() - line.len();
    let begidx = request.begidx.saturating_sub(stripped);
    let text = request.text.as_str();

    let candidates: BTreeSet<&str> = if begidx == 0 {
        registry.command_names().filter(|n| n.starts_with(text)).collect()
    } else {
        let parsed = parse_line(
            line,
            |c| settings.is_identchar(c),
            registry.has_command("shell"),
        );
        match parsed.command.as_deref() {
            Some(HELP_COMMAND) => registry
                .command_names()
                .chain(registry.topic_names())
                .filter(|n| n.starts_with(text))
                .collect(),
            _ => BTreeSet::new(),
        }
    };
    candidates.into_iter().map(str::to_string).collect()
}

/// Wrap [`complete`] as a callback for a line editor.
pub fn completer<T: Send + 'static>(registry: Arc<Registry<T>>, settings: Arc<Settings>) -> Completer {
    Arc::new(move |request: &CompletionRequest| complete(&registry, &settings, request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::Shell;
    use crate::types::{Method, MethodTable};
    use linecmd_core::Mode;

    fn noop(_: &mut Shell<()>, _: &str) -> anyhow::Result<bool> {
        Ok(false)
    }

    fn registry() -> Registry<()> {
        let table = MethodTable::new()
            .with(Method::blocking("do_greet", noop))
            .with(Method::blocking("do_grep", noop))
            .with(Method::blocking("do_quit", noop))
            .with(Method::text("gremlins_text", "Beware.").topic("gremlins"));
        Registry::build(table, Mode::Blocking, &BTreeSet::new()).unwrap()
    }

    fn request(buffer: &str, text: &str) -> CompletionRequest {
        let endidx = buffer.len();
        CompletionRequest {
            text: text.into(),
            buffer: buffer.into(),
            begidx: endidx - text.len(),
            endidx,
        }
    }

    #[test]
    fn first_word_completes_commands() {
        let reg = registry();
        let settings = Settings::default();
        assert_eq!(complete(&reg, &settings, &request("gr", "gr")), ["greet", "grep"]);
        assert_eq!(complete(&reg, &settings, &request("   q", "q")), ["quit"]);
        assert_eq!(
            complete(&reg, &settings, &request("", "")),
            ["greet", "grep", "help", "quit"]
        );
    }

    #[test]
    fn help_argument_includes_topics() {
        let reg = registry();
        let settings = Settings::default();
        assert_eq!(
            complete(&reg, &settings, &request("help gr", "gr")),
            ["greet", "gremlins", "grep"]
        );
        assert_eq!(complete(&reg, &settings, &request("?gr", "gr")).len(), 3);
    }

    #[test]
    fn other_arguments_get_nothing() {
        let reg = registry();
        let settings = Settings::default();
        assert!(complete(&reg, &settings, &request("greet gr", "gr")).is_empty());
        assert!(complete(&reg, &settings, &request("%% gr", "gr")).is_empty());
    }

    #[test]
    fn completer_wraps_registry() {
        let complete = completer(Arc::new(registry()), Arc::new(Settings::default()));
        assert_eq!(complete(&request("qu", "qu")), ["quit"]);
    }
}
