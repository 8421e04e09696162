mod demo;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use linecmd::{Interpreter, Mode, ReaderSource};
use linecmd_config::{load_and_prepare, render_settings};
use linecmd_logging::init_logger;

use demo::Demo;

#[derive(Parser)]
#[command(name = "linecmd")]
#[command(about = "linecmd: a small line-oriented command shell")]
#[command(version)]
struct Cli {
    /// Settings file (TOML); a missing file means defaults
    #[arg(short, long, default_value = "linecmd.toml")]
    config: PathBuf,

    /// Interpreter variant
    #[arg(short, long, value_enum, default_value_t = ModeArg::Hybrid)]
    mode: ModeArg,

    /// Read commands from a file instead of the terminal
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Directory for daily-rolling JSON logs
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_settings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Blocking,
    Strict,
    Hybrid,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Blocking => Mode::Blocking,
            ModeArg::Strict => Mode::Strict,
            ModeArg::Hybrid => Mode::Hybrid,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_dir.as_deref(), &cli.log_level);

    let mode = Mode::from(cli.mode);
    let mut settings = load_and_prepare(&cli.config).await?;
    if mode == Mode::Strict {
        settings
            .exempt_commands
            .extend(demo::BLOCKING_COMMANDS.iter().map(|name| name.to_string()));
    }
    if settings.intro.is_none() {
        settings.intro = Some(format!(
            "linecmd demo ({mode} mode). Type help or ? to list commands."
        ));
    }

    let mut builder = Interpreter::builder(Demo::default())
        .methods(demo::methods(mode))
        .hooks(demo::hooks(mode));
    if let Some(path) = &cli.script {
        let file = File::open(path)
            .with_context(|| format!("opening script {}", path.display()))?;
        settings.use_raw_input = false;
        builder = builder.source(ReaderSource::new(BufReader::new(file)));
    }

    if cli.print_settings {
        println!("{}", render_settings(&settings)?);
        return Ok(());
    }

    info!(%mode, config = %cli.config.display(), "Starting linecmd");
    let mut interp = builder.settings(settings).build(mode)?;
    match mode {
        Mode::Blocking => interp.cmdloop()?,
        Mode::Strict | Mode::Hybrid => interp.acmdloop().await?,
    }
    Ok(())
}
