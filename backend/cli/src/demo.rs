//! Demo command set.
//!
//! The same shell is assembled for every interpreter mode; only `shell` and
//! `wait` change flavor.

use std::time::Duration;

use anyhow::Context;
use futures::future::BoxFuture;
use linecmd::{HookRegistry, Method, MethodTable, Mode, Shell};
use tracing::info;

/// Demo state carried across commands.
#[derive(Debug, Default)]
pub struct Demo {
    pub counter: u64,
}

type Sh = Shell<Demo>;

/// Commands that stay blocking; exempted when running strict.
pub const BLOCKING_COMMANDS: [&str; 4] = ["echo", "count", "exit", "EOF"];

const SHELL_DOC: &str = "
    Run a command through `sh -c` and print its output.
    Also reachable as `!<command>`.
";

const MODES_TOPIC: &str = "
    blocking  every command runs to completion; `wait` is unavailable
    strict    commands must be suspension-capable unless exempted
    hybrid    blocking and suspension-capable commands side by side
";

pub fn methods(mode: Mode) -> MethodTable<Demo> {
    let mut table = MethodTable::new()
        .with(Method::blocking("echo", echo).command().doc("Print the arguments."))
        .with(Method::blocking("do_count", count).doc("Increment the counter and show it."))
        .with(Method::blocking("do_exit", exit).doc("Leave the shell."))
        .with(Method::blocking("do_EOF", eof))
        .with(Method::text("modes_topic", MODES_TOPIC).topic("modes"));

    match mode {
        Mode::Blocking => {
            table.push(Method::blocking("do_shell", shell_blocking).doc(SHELL_DOC));
        }
        Mode::Strict | Mode::Hybrid => {
            table.push(
                Method::suspending("shell_async", shell_async)
                    .command_as("shell")
                    .doc(SHELL_DOC),
            );
            table.push(Method::suspending("do_wait", wait).doc("Sleep for the given milliseconds."));
        }
    }
    table
}

pub fn hooks(mode: Mode) -> HookRegistry<Demo> {
    match mode {
        Mode::Blocking => HookRegistry::new().postloop(report),
        Mode::Strict | Mode::Hybrid => HookRegistry::new().apostloop(areport),
    }
}

fn echo(shell: &mut Sh, args: &str) -> anyhow::Result<bool> {
    shell.writeln(args)?;
    Ok(false)
}

fn count(shell: &mut Sh, _: &str) -> anyhow::Result<bool> {
    shell.state.counter += 1;
    let text = shell.state.counter.to_string();
    shell.writeln(&text)?;
    Ok(false)
}

fn exit(_: &mut Sh, _: &str) -> anyhow::Result<bool> {
    Ok(true)
}

fn eof(shell: &mut Sh, _: &str) -> anyhow::Result<bool> {
    shell.writeln("")?;
    Ok(true)
}

fn shell_blocking(shell: &mut Sh, args: &str) -> anyhow::Result<bool> {
    let output = std::process::Command::new("sh")
        .arg("-c")
        .arg(args)
        .output()
        .with_context(|| format!("running `{args}`"))?;
    shell.write(&String::from_utf8_lossy(&output.stdout))?;
    shell.write(&String::from_utf8_lossy(&output.stderr))?;
    Ok(false)
}

fn shell_async<'a>(shell: &'a mut Sh, args: &'a str) -> BoxFuture<'a, anyhow::Result<bool>> {
    Box::pin(async move {
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(args)
            .output()
            .await
            .with_context(|| format!("running `{args}`"))?;
        shell.write(&String::from_utf8_lossy(&output.stdout))?;
        shell.write(&String::from_utf8_lossy(&output.stderr))?;
        Ok(false)
    })
}

fn wait<'a>(shell: &'a mut Sh, args: &'a str) -> BoxFuture<'a, anyhow::Result<bool>> {
    Box::pin(async move {
        let Ok(millis) = args.parse::<u64>() else {
            shell.writeln("usage: wait <milliseconds>")?;
            return Ok(false);
        };
        tokio::time::sleep(Duration::from_millis(millis)).await;
        shell.writeln(&format!("waited {millis}ms"))?;
        Ok(false)
    })
}

fn report(shell: &mut Sh) -> anyhow::Result<()> {
    info!(counter = shell.state.counter, "session finished");
    Ok(())
}

fn areport(shell: &mut Sh) -> BoxFuture<'_, anyhow::Result<()>> {
    Box::pin(async move { report(shell) })
}
