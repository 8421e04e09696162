/// Registry builder.
///
/// Scans a [`MethodTable`] once, classifies each method (explicit marker
/// first, then the `do_` / `help_` conventions), and produces the immutable
/// command, helper, and topic mappings for one interpreter.
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use linecmd_core::{Kind, Mode, RegistrationError};
use tracing::debug;

use crate::help::{clean_doc, help_blocking, help_suspending, HELP_DOC};
use crate::types::{
    Body, Handler, Helper, Method, MethodTable, COMMAND_PREFIX, HELPER_PREFIX,
};

/// Name of the built-in help command.
pub const HELP_COMMAND: &str = "help";

// ---------------------------------------------------------------------------
// Ordered map
// ---------------------------------------------------------------------------

/// Name-keyed map that remembers first-insertion order for listings.
struct Ordered<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Default for Ordered<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> Ordered<V> {
    fn get(&self, name: &str) -> Option<&V> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Insert or replace in place.
    fn insert(&mut self, name: String, value: V) {
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
            }
        }
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    fn values(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Built name→handler and name→helper mappings. Immutable after `build`.
pub struct Registry<T> {
    mode: Mode,
    commands: Ordered<Handler<T>>,
    helpers: HashMap<String, Helper<T>>,
    topics: Ordered<Helper<T>>,
    default: Option<Handler<T>>,
    emptyline: Option<Handler<T>>,
}

/// Which method claimed a name explicitly, for duplicate reporting.
#[derive(Default)]
struct Claims {
    commands: HashMap<String, String>,
    helpers: HashMap<String, String>,
    topics: HashMap<String, String>,
}

impl<T: Send + 'static> Registry<T> {
    /// Classify every method of `table` and validate the result for `mode`.
    ///
    /// `exempt` names commands allowed to stay blocking in strict mode.
    pub fn build(
        table: MethodTable<T>,
        mode: Mode,
        exempt: &BTreeSet<String>,
    ) -> Result<Self, RegistrationError> {
        let MethodTable {
            methods,
            default,
            emptyline,
        } = table;

        let mut registry = Self {
            mode,
            commands: Ordered::default(),
            helpers: HashMap::new(),
            topics: Ordered::default(),
            default,
            emptyline,
        };
        let mut docs: HashMap<String, String> = HashMap::new();
        let mut claims = Claims::default();
        let mut shadowed: Vec<(String, Handler<T>)> = Vec::new();

        for method in methods {
            registry.classify(method, &mut docs, &mut claims, &mut shadowed)?;
        }

        if !registry.commands.contains(HELP_COMMAND) {
            let builtin = if mode == Mode::Blocking {
                Handler::Blocking(help_blocking::<T>)
            } else {
                Handler::Suspending(help_suspending::<T>)
            };
            registry.commands.insert(HELP_COMMAND.to_string(), builtin);
            docs.entry(HELP_COMMAND.to_string())
                .or_insert_with(|| HELP_DOC.to_string());
        }

        for (name, doc) in docs {
            let cleaned = clean_doc(&doc);
            if cleaned.trim().is_empty() || registry.helpers.contains_key(&name) {
                continue;
            }
            debug!("[Registry] synthesized doc helper for {}", name);
            registry.helpers.insert(name, Helper::Doc(Arc::from(cleaned)));
        }

        registry.check_mode(exempt, &shadowed)?;

        let mut orphans: Vec<String> = registry
            .helpers
            .keys()
            .filter(|name| !registry.commands.contains(name))
            .cloned()
            .collect();
        if !orphans.is_empty() {
            orphans.sort();
            return Err(RegistrationError::OrphanHelpers { names: orphans });
        }

        debug!(
            "[Registry] built mode={} commands=[{}] helpers={} topics={}",
            mode,
            registry.commands.names().collect::<Vec<_>>().join(", "),
            registry.helpers.len(),
            registry.topics.len()
        );
        Ok(registry)
    }

    fn classify(
        &mut self,
        method: Method<T>,
        docs: &mut HashMap<String, String>,
        claims: &mut Claims,
        shadowed: &mut Vec<(String, Handler<T>)>,
    ) -> Result<(), RegistrationError> {
        let Method {
            name,
            body,
            command_mark,
            helper_mark,
            topic_mark,
            doc,
        } = method;

        let role = body.role();
        let marks = [command_mark.is_some(), helper_mark.is_some(), topic_mark.is_some()];
        if marks.iter().filter(|&&m| m).count() > 1 {
            return Err(RegistrationError::DualRole { method: name });
        }

        if let Some(target) = command_mark {
            let Body::Command(handler) = body else {
                return Err(mismatch(name, "command", role));
            };
            claim(&mut claims.commands, &target, &name, |first| {
                RegistrationError::DuplicateCommand {
                    name: target.clone(),
                    first,
                    second: name.clone(),
                }
            })?;
            if let Some(previous) = self.commands.get(&target).copied() {
                debug!("[Registry] {} overrides convention command {}", name, target);
                shadowed.push((target.clone(), previous));
            }
            self.commands.insert(target.clone(), handler);
            if let Some(doc) = doc {
                docs.insert(target, doc);
            }
        } else if let Some(target) = helper_mark {
            let Body::Help(helper) = body else {
                return Err(mismatch(name, "helper", role));
            };
            claim(&mut claims.helpers, &target, &name, |first| {
                RegistrationError::DuplicateHelper {
                    name: target.clone(),
                    first,
                    second: name.clone(),
                }
            })?;
            self.helpers.insert(target, helper);
        } else if let Some(topic) = topic_mark {
            let Body::Help(helper) = body else {
                return Err(mismatch(name, "topic", role));
            };
            claim(&mut claims.topics, &topic, &name, |first| {
                RegistrationError::DuplicateHelper {
                    name: topic.clone(),
                    first,
                    second: name.clone(),
                }
            })?;
            self.topics.insert(topic, helper);
        } else if let Some(target) = name.strip_prefix(COMMAND_PREFIX) {
            let Body::Command(handler) = body else {
                return Err(mismatch(name, "command", role));
            };
            // A shadowed legacy method still counts for mode checks and
            // lends its doc when the explicit command has none.
            if self.commands.contains(target) {
                debug!("[Registry] {} shadowed by an explicit command", name);
                shadowed.push((target.to_string(), handler));
                if let Some(doc) = doc {
                    docs.entry(target.to_string()).or_insert(doc);
                }
            } else {
                self.commands.insert(target.to_string(), handler);
                if let Some(doc) = doc {
                    docs.insert(target.to_string(), doc);
                }
            }
        } else if let Some(target) = name.strip_prefix(HELPER_PREFIX) {
            let Body::Help(helper) = body else {
                return Err(mismatch(name, "helper", role));
            };
            if self.helpers.contains_key(target) {
                debug!("[Registry] {} shadowed by an explicit helper", name);
            } else {
                self.helpers.insert(target.to_string(), helper);
            }
        } else {
            debug!("[Registry] ignoring plain method {}", name);
        }
        Ok(())
    }

    fn check_mode(
        &self,
        exempt: &BTreeSet<String>,
        shadowed: &[(String, Handler<T>)],
    ) -> Result<(), RegistrationError> {
        let overrides = [("default", self.default), ("emptyline", self.emptyline)];
        let handlers = self
            .commands
            .values()
            .map(|(name, handler)| (name, *handler))
            .chain(
                overrides
                    .iter()
                    .filter_map(|(name, handler)| handler.map(|h| (*name, h))),
            );

        match self.mode {
            Mode::Blocking => {
                let mut names: Vec<String> = handlers
                    .filter(|(_, h)| h.kind() == Kind::Suspending)
                    .map(|(name, _)| name.to_string())
                    .chain(
                        self.helpers
                            .iter()
                            .map(|(name, helper)| (name.as_str(), helper))
                            .chain(self.topics.values())
                            .filter(|(_, h)| h.kind() == Kind::Suspending)
                            .map(|(name, _)| format!("{HELPER_PREFIX}{name}")),
                    )
                    .collect();
                if !names.is_empty() {
                    names.sort();
                    names.dedup();
                    return Err(RegistrationError::SuspendingInBlocking { names });
                }
            }
            Mode::Strict => {
                // `help` is always allowed to stay blocking.
                let mut names: Vec<String> = handlers
                    .chain(shadowed.iter().map(|(name, h)| (name.as_str(), *h)))
                    .filter(|(name, h)| {
                        h.kind() == Kind::Blocking
                            && *name != HELP_COMMAND
                            && !exempt.contains(*name)
                    })
                    .map(|(name, _)| name.to_string())
                    .collect();
                if !names.is_empty() {
                    names.sort();
                    names.dedup();
                    return Err(RegistrationError::BlockingCommands { names });
                }
            }
            Mode::Hybrid => {}
        }
        Ok(())
    }
}

impl<T> Registry<T> {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn command(&self, name: &str) -> Option<Handler<T>> {
        self.commands.get(name).copied()
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains(name)
    }

    pub fn helper(&self, name: &str) -> Option<Helper<T>> {
        self.helpers.get(name).cloned()
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    pub fn topic(&self, name: &str) -> Option<Helper<T>> {
        self.topics.get(name).cloned()
    }

    /// Helper for a command, falling back to a help-only topic.
    pub fn lookup_help(&self, name: &str) -> Option<Helper<T>> {
        self.helper(name).or_else(|| self.topic(name))
    }

    /// Command names in registration order.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.names()
    }

    /// Topic names in registration order.
    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.topics.names()
    }

    pub fn default_handler(&self) -> Option<Handler<T>> {
        self.default
    }

    pub fn emptyline_handler(&self) -> Option<Handler<T>> {
        self.emptyline
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.len() == 0
    }
}

fn mismatch(method: String, marker: &'static str, body: &'static str) -> RegistrationError {
    RegistrationError::RoleMismatch {
        method,
        marker,
        body,
    }
}

fn claim(
    claims: &mut HashMap<String, String>,
    target: &str,
    method: &str,
    duplicate: impl FnOnce(String) -> RegistrationError,
) -> Result<(), RegistrationError> {
    if let Some(first) = claims.get(target) {
        return Err(duplicate(first.clone()));
    }
    claims.insert(target.to_string(), method.to_string());
    Ok(())
}
