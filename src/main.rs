use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use psound::config::{self, TomlStore};
use psound::notifier::{COMMAND, REGISTRATION};
use psound::stdio::{self, StdioHost};
use psound::{CommandPlayer, Notifier};

#[derive(Parser, Debug)]
#[command(name = "psound", version, about = "Play a soundfile for incoming messages")]
struct Cli {
    /// Options file (defaults to <config dir>/psound/psound.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Read host events as JSON lines from stdin
    Run,
    /// Play the configured sound once
    Test,
    /// Show registration data and command help
    Info,
    /// Write default options to the config file
    Init,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let store = TomlStore::new(cli.config.unwrap_or_else(TomlStore::default_path));

    match execute(cli.command, store) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("psound: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Cmd, mut store: TomlStore) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        Cmd::Run => {
            let mut notifier = Notifier::new(store, CommandPlayer);
            let (stats, _) = stdio::run(&mut notifier, io::stdin().lock(), io::stdout())?;
            tracing::info!(
                events = stats.events,
                malformed = stats.malformed,
                filtered = stats.filtered,
                command_errors = stats.command_errors,
                "input closed"
            );
        }
        Cmd::Test => {
            let host = StdioHost::new(io::stdout());
            let mut notifier = Notifier::new(store, CommandPlayer);
            notifier.init(&host);
            if notifier.notify(&host).is_err() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Cmd::Info => print_info(),
        Cmd::Init => {
            config::apply_defaults(&mut store)?;
            println!("{}", store.path().display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_info() {
    let r = &REGISTRATION;
    println!("{} {} ({})", r.name, r.version, r.license);
    println!("{}", r.description);
    println!("author: {}", r.author);
    println!();
    println!("/{} {}", COMMAND.name, COMMAND.args);
    println!();
    println!("{}", COMMAND.args_description);
    println!();
    println!("completion: {}", COMMAND.completion);
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}
