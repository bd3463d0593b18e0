use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rawline::{EditorError, KeyCode, LineEditor, Session, SessionHandle, TerminalConfig};
use tracing::warn;

const COMMANDS: &[&str] = &["echo", "exit", "help", "history"];

/// Line-editing shell demo: echoes what you type.
#[derive(Debug, Parser)]
#[command(name = "rawline", version)]
struct Cli {
    /// History file, loaded at start and saved on exit.
    #[arg(long)]
    history: Option<PathBuf>,

    /// Prompt to show.
    #[arg(long)]
    prompt: Option<String>,

    /// Config file (default: ~/.config/rawline/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not enable bracketed paste.
    #[arg(long)]
    no_paste: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let mut session = Session::open_with_config(&config).context("opening terminal")?;
    // A subscriber may already be installed by an embedding program.
    let _ = session.logger_setup();
    session.restore_on_panic();
    if let Err(err) = session.restore_on_signals() {
        warn!("Signal handling unavailable: {}", err);
    }
    session.set_auto_complete_callback(complete_command);

    let mut out = session.out();
    loop {
        let line = match session.read_line() {
            Ok(line) => line,
            Err(EditorError::Eof | EditorError::Interrupted) => break,
            Err(err) => return Err(err).context("reading input"),
        };
        match line.trim() {
            "" => {}
            "exit" => break,
            "help" => writeln!(out, "commands: {}", COMMANDS.join(", "))?,
            "history" => {
                for (i, entry) in session.editor().history().iter().enumerate() {
                    writeln!(out, "{:>4}  {}", i + 1, entry)?;
                }
            }
            other => writeln!(out, "{}", other.strip_prefix("echo ").unwrap_or(other))?,
        }
    }

    session.close()?;
    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<TerminalConfig> {
    let mut config = match &cli.config {
        Some(path) => TerminalConfig::load_from(path)?,
        None => TerminalConfig::load()?,
    };
    if let Some(history) = &cli.history {
        config.history_file = Some(history.clone());
    }
    if let Some(prompt) = &cli.prompt {
        config.prompt = prompt.clone();
    }
    if cli.no_paste {
        config.bracketed_paste = false;
    }
    Ok(config)
}

/// Tab completes the command word; with several matches they are listed.
fn complete_command(
    session: &SessionHandle,
    line: &str,
    pos: usize,
    key: KeyCode,
) -> Option<(String, usize)> {
    if key != KeyCode::Tab || pos != line.len() || line.contains(' ') {
        return None;
    }
    let matches: Vec<&str> = COMMANDS
        .iter()
        .copied()
        .filter(|c| c.starts_with(line))
        .collect();
    match matches.as_slice() {
        [] => None,
        [only] => {
            let done = format!("{} ", only);
            let len = done.len();
            Some((done, len))
        }
        several => {
            let _ = writeln!(session.out(), "{}", several.join("  "));
            None
        }
    }
}
