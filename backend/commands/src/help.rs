/// Built-in `help` command and listing helpers.
use futures::future::BoxFuture;
use linecmd_core::{CapabilityError, Mode};

use crate::shell::Shell;
use crate::types::Helper;

/// Docstring of the built-in `help` command.
pub const HELP_DOC: &str = r#"List available commands with "help" or detailed help with "help cmd"."#;

/// Blocking `help [topic]`.
pub fn help_blocking<T>(shell: &mut Shell<T>, arg: &str) -> anyhow::Result<bool> {
    let topic = arg.trim();
    if topic.is_empty() {
        list_topics(shell)?;
        return Ok(false);
    }
    let helper = shell.registry().lookup_help(topic);
    match helper {
        Some(Helper::Blocking(f)) => f(shell)?,
        Some(Helper::Doc(text)) => shell.write(&text)?,
        Some(Helper::Suspending(_)) => {
            return Err(CapabilityError::new(Mode::Blocking, format!("help for {topic}")).into());
        }
        None => no_help(shell, topic)?,
    }
    Ok(false)
}

/// Suspension-capable `help [topic]`; awaits suspension-capable helpers.
pub fn help_suspending<'a, T: Send>(
    shell: &'a mut Shell<T>,
    arg: &'a str,
) -> BoxFuture<'a, anyhow::Result<bool>> {
    Box::pin(async move {
        let topic = arg.trim();
        if topic.is_empty() {
            list_topics(shell)?;
            return Ok(false);
        }
        let helper = shell.registry().lookup_help(topic);
        match helper {
            Some(Helper::Suspending(f)) => f(shell).await?,
            Some(Helper::Blocking(f)) => f(shell)?,
            Some(Helper::Doc(text)) => shell.write(&text)?,
            None => no_help(shell, topic)?,
        }
        Ok(false)
    })
}

fn no_help<T>(shell: &mut Shell<T>, topic: &str) -> std::io::Result<()> {
    shell.writeln(&format!("No help available for: {topic}"))
}

/// Write the three-group command listing.
pub fn list_topics<T>(shell: &mut Shell<T>) -> std::io::Result<()> {
    let registry = shell.registry_handle();
    let settings = shell.settings_handle();

    let (documented, undocumented): (Vec<&str>, Vec<&str>) =
        registry.command_names().partition(|name| registry.has_helper(name));
    let topics: Vec<&str> = registry.topic_names().collect();

    shell.writeln(&settings.doc_leader)?;
    print_topics(shell, &settings.doc_header, &documented)?;
    print_topics(shell, &settings.misc_header, &topics)?;
    print_topics(shell, &settings.undoc_header, &undocumented)
}

/// Write one listing group: header, ruler, columnized names, blank line.
/// Empty groups write nothing.
pub fn print_topics<T>(shell: &mut Shell<T>, header: &str, names: &[&str]) -> std::io::Result<()> {
    if names.is_empty() {
        return Ok(());
    }
    let settings = shell.settings_handle();
    shell.writeln(header)?;
    if !settings.ruler.is_empty() {
        shell.writeln(&settings.ruler.repeat(header.chars().count()))?;
    }
    let width = settings.display_width.saturating_sub(1);
    shell.write(&columnize(names, width))?;
    shell.writeln("")
}

/// Lay out `items` column-major in as few rows as fit `width`.
///
/// Columns are separated by two spaces. An empty list renders `<empty>`.
pub fn columnize(items: &[&str], width: usize) -> String {
    match items {
        [] => return "<empty>\n".to_string(),
        [only] => return format!("{only}\n"),
        _ => {}
    }
    let size = items.len();
    let len = |i: usize| items[i].chars().count();

    let mut layout = None;
    for nrows in 1..size {
        let ncols = size.div_ceil(nrows);
        let mut colwidths = Vec::with_capacity(ncols);
        let mut total = 0;
        for col in 0..ncols {
            let colwidth = (0..nrows)
                .map(|row| row + nrows * col)
                .take_while(|&i| i < size)
                .map(len)
                .max()
                .unwrap_or(0);
            colwidths.push(colwidth);
            total += colwidth + 2;
            if total > width + 2 {
                break;
            }
        }
        if total <= width + 2 {
            layout = Some((nrows, ncols, colwidths));
            break;
        }
    }
    let (nrows, ncols, colwidths) = layout.unwrap_or((size, 1, vec![0]));

    let mut out = String::new();
    for row in 0..nrows {
        let mut texts: Vec<&str> = (0..ncols)
            .map(|col| items.get(row + nrows * col).copied().unwrap_or(""))
            .collect();
        while texts.last().is_some_and(|t| t.is_empty()) {
            texts.pop();
        }
        let padded: Vec<String> = texts
            .iter()
            .zip(&colwidths)
            .map(|(text, &w)| format!("{text:<w$}"))
            .collect();
        out.push_str(&padded.join("  "));
        out.push('\n');
    }
    out
}

/// Normalize a docstring: expand tabs, drop the common indentation of the
/// lines after the first, trim surrounding blank lines.
pub fn clean_doc(doc: &str) -> String {
    let lines: Vec<String> = doc.split('\n').map(expand_tabs).collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim_start().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min();

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            cleaned.push(line.trim_start());
            continue;
        }
        match margin {
            Some(margin) => {
                let cut = line
                    .char_indices()
                    .nth(margin)
                    .map_or(line.len(), |(idx, _)| idx);
                cleaned.push(&line[cut..]);
            }
            None => cleaned.push(line),
        }
    }

    let start = cleaned.iter().position(|l| !l.is_empty()).unwrap_or(cleaned.len());
    let end = cleaned.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    cleaned[start..end.max(start)].join("\n")
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = 8 - column % 8;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::types::{Method, MethodTable};
    use linecmd_config::Settings;
    use linecmd_core::{BufferSink, Session};
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn noop(_: &mut Shell<()>, _: &str) -> anyhow::Result<bool> {
        Ok(false)
    }

    fn custom_help(shell: &mut Shell<()>) -> anyhow::Result<()> {
        shell.writeln("custom help text")?;
        Ok(())
    }

    fn async_help(shell: &mut Shell<()>) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            shell.writeln("async help text")?;
            Ok(())
        })
    }

    fn shell(table: MethodTable<()>, mode: Mode, settings: Settings) -> (Shell<()>, BufferSink) {
        let sink = BufferSink::new();
        let registry = Registry::build(table, mode, &BTreeSet::new()).unwrap();
        let shell = Shell::new((), Box::new(sink.clone()), Arc::new(registry), Arc::new(settings));
        (shell, sink)
    }

    fn sample() -> MethodTable<()> {
        MethodTable::new()
            .with(Method::blocking("do_greet", noop).doc("Say hello."))
            .with(Method::blocking("do_quit", noop))
            .with(Method::blocking("do_custom", noop))
            .with(Method::blocking_helper("help_custom", custom_help))
            .with(Method::text("about_text", "\n    About this shell.\n").topic("about"))
    }

    #[test]
    fn columnize_fits_single_row() {
        assert_eq!(columnize(&["a", "bb", "ccc"], 79), "a  bb  ccc\n");
    }

    #[test]
    fn columnize_wraps_column_major() {
        let out = columnize(&["alpha", "beta", "gamma", "delta", "eps"], 14);
        assert_eq!(out, "alpha  delta\nbeta   eps  \ngamma\n");
    }

    #[test]
    fn columnize_edge_cases() {
        assert_eq!(columnize(&[], 80), "<empty>\n");
        assert_eq!(columnize(&["solo"], 80), "solo\n");
        assert_eq!(columnize(&["toolong", "words"], 3), "toolong\nwords\n");
    }

    #[test]
    fn clean_doc_strips_indentation() {
        assert_eq!(clean_doc("  One line.  "), "One line.  ");
        assert_eq!(clean_doc("First.\n    Second.\n      Indented.\n"), "First.\nSecond.\n  Indented.");
        assert_eq!(clean_doc("\n\n\tTabbed.\n"), "Tabbed.");
        assert_eq!(clean_doc("\n\n"), "");
    }

    #[test]
    fn listing_has_three_groups() {
        let (mut shell, sink) = shell(sample(), Mode::Blocking, Settings::default());
        help_blocking(&mut shell, "").unwrap();
        let expected = "\n\
            Documented commands (type help <topic>):\n\
            ========================================\n\
            greet  custom  help\n\
            \n\
            Miscellaneous help topics:\n\
            ==========================\n\
            about\n\
            \n\
            Undocumented commands:\n\
            ======================\n\
            quit\n\
            \n";
        assert_eq!(sink.contents(), expected);
    }

    #[test]
    fn empty_ruler_omits_separator() {
        let mut settings = Settings::default();
        settings.ruler.clear();
        settings.doc_leader = "Commands:".into();
        let (mut shell, sink) = shell(MethodTable::new(), Mode::Blocking, settings);
        help_blocking(&mut shell, "").unwrap();
        assert_eq!(
            sink.contents(),
            "Commands:\nDocumented commands (type help <topic>):\nhelp\n\n"
        );
    }

    #[test]
    fn help_topic_variants() {
        let (mut shell, sink) = shell(sample(), Mode::Blocking, Settings::default());
        help_blocking(&mut shell, "greet").unwrap();
        help_blocking(&mut shell, " custom ").unwrap();
        help_blocking(&mut shell, "about").unwrap();
        help_blocking(&mut shell, "quit").unwrap();
        assert_eq!(
            sink.contents(),
            "Say hello.custom help text\nAbout this shell.No help available for: quit\n"
        );
    }

    #[test]
    fn help_of_help_is_its_doc() {
        let (mut shell, sink) = shell(MethodTable::new(), Mode::Blocking, Settings::default());
        let mut session = Session::new();
        shell.onecmd(&mut session, "?help").unwrap();
        assert_eq!(sink.contents(), HELP_DOC);
    }

    #[tokio::test]
    async fn suspending_help_awaits_helpers() {
        let table = MethodTable::new()
            .with(Method::blocking("do_thing", noop))
            .with(Method::suspending_helper("help_thing", async_help));
        let (mut shell, sink) = shell(table, Mode::Hybrid, Settings::default());
        let mut session = Session::new();
        shell.onecmd_async(&mut session, "help thing").await.unwrap();
        shell.onecmd_async(&mut session, "help nothing").await.unwrap();
        assert_eq!(
            sink.contents(),
            "async help text\nNo help available for: nothing\n"
        );
    }
}
