use std::io::{self, BufReader};
use std::process::ExitCode;

use anyhow::{bail, Context};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use installer_app_core::{CommandSpec, SessionState};
use installer_cli::{commands, RunOptions};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the installer and follow its progress
    Run {
        #[arg(long, help = "Command line run through the system shell")]
        shell: Option<String>,
        #[arg(long, env = "INSTALLER_LOG_FILE", help = "Transcript file path")]
        log_file: Option<Utf8PathBuf>,
        #[arg(long, conflicts_with = "log_file", help = "Do not write a transcript")]
        no_log_file: bool,
        #[arg(long, help = "Lines kept in the in-memory log")]
        log_capacity: Option<usize>,
        #[arg(long, help = "Write the final log to this file")]
        export_log: Option<Utf8PathBuf>,
        /// Installer program and arguments, after `--`
        #[arg(last = true)]
        argv: Vec<String>,
    },
    /// Classify captured installer output and print the events as JSON lines
    Classify {
        /// Input file; reads stdin when omitted
        file: Option<Utf8PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    match cli.command {
        Commands::Run {
            shell,
            log_file,
            no_log_file,
            log_capacity,
            export_log,
            argv,
        } => {
            let command = match (shell, argv.is_empty()) {
                (Some(line), true) => CommandSpec::shell(line)?,
                (None, false) => CommandSpec::argv(argv)?,
                (Some(_), false) => {
                    bail!("Pass either --shell or a command after `--`, not both")
                }
                (None, true) => {
                    bail!("No installer command given; use --shell or `-- <program> [args...]`")
                }
            };
            let opts = RunOptions::new(log_file, no_log_file, log_capacity, export_log);
            let state = commands::cmd_run(command, opts)?;
            Ok(if state == SessionState::Succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Classify { file } => {
            let stdout = io::stdout().lock();
            match file {
                Some(path) => {
                    let f = std::fs::File::open(&path)
                        .with_context(|| format!("Failed to open {path}"))?;
                    commands::cmd_classify(BufReader::new(f), stdout)?;
                }
                None => {
                    commands::cmd_classify(io::stdin().lock(), stdout)?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
