//! mytalk
//!
//! `mytalk port` waits for one talk request; `mytalk hostname port` sends one.

use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use tokio::net::TcpStream;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mytalk::console::{PlainConsole, WindowedConsole};
use mytalk::establish::{establish_client, establish_server, Established, StdinPrompt};
use mytalk::output::{print_error, print_info, print_usage};
use mytalk::session::converse;
use mytalk::signal::interrupt_token;
use talk_core::config::{self, Mode, Options};
use talk_core::identity::local_hostname;
use talk_core::{ConfigError, TalkError};

#[derive(Parser)]
#[command(name = "mytalk")]
#[command(author, version, about = "Talk to another user over TCP")]
struct Cli {
    /// Verbose output (repeat for more)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Accept the incoming request without asking (server only)
    #[arg(short = 'a')]
    auto_accept: bool,

    /// Plain line mode instead of the split-screen window
    #[arg(short = 'N')]
    no_windowing: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// `port` to listen, or `hostname port` to connect
    #[arg(value_name = "ARGS")]
    positionals: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => {
            print_usage(None);
            std::process::exit(1);
        }
    };

    // Setup logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mode = match select_mode(&cli) {
        Ok(mode) => mode,
        Err(err) => {
            match err.downcast_ref::<ConfigError>() {
                Some(ConfigError::Usage) => print_usage(None),
                Some(ConfigError::InvalidPort(_)) => print_usage(Some("invalid port number.")),
                _ => print_error(&err.to_string()),
            }
            std::process::exit(1);
        }
    };

    if mode.options().verbose() {
        print_summary(&mode);
    }

    let code = match run(mode).await {
        Ok(()) => 0,
        Err(err) => {
            print_error(&err.to_string());
            err.downcast_ref::<TalkError>()
                .map(TalkError::exit_code)
                .unwrap_or(1)
        }
    };

    // Blocked stdin readers are abandoned here
    std::process::exit(code);
}

/// Merge flags over the config file and pick the role
fn select_mode(cli: &Cli) -> Result<Mode> {
    // Error messages already carry their cause; print the outermost only
    let file = config::resolve_config(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    let options = Options::from_flags(cli.verbose, cli.auto_accept, cli.no_windowing, &file);
    let mode = Mode::from_positionals(&cli.positionals, options)?;
    tracing::debug!(?mode, "Selected mode");
    Ok(mode)
}

fn print_summary(mode: &Mode) {
    let options = mode.options();
    let on_off = |flag: bool| if flag { "On" } else { "Off" };

    print_info(&format!("Mytalk mode = {}", mode.role()));
    print_info(&format!("Hostname: {}", mode.host().unwrap_or("N/A")));
    print_info(&format!("Port number: {}", mode.port()));
    print_info(&format!("Verbosity = {}", options.verbosity));
    print_info(&format!(
        "Authorization required = {}",
        on_off(!options.auto_accept)
    ));
    print_info(&format!("Windowing = {}", on_off(options.windowing)));
    tracing::debug!("Running on {}", local_hostname());
}

async fn run(mode: Mode) -> Result<()> {
    let cancel = interrupt_token();
    let options = mode.options().clone();

    let established = tokio::select! {
        _ = cancel.cancelled() => {
            tracing::info!("Interrupted before the dialogue started");
            return Ok(());
        }
        result = establish(&mode, &options) => result?,
    };

    let session = match established {
        Established::Accepted(session) => session,
        Established::Rejected { peer } => {
            tracing::info!("No talk with {}", peer);
            return Ok(());
        }
    };

    let outcome = if options.windowing {
        let console = WindowedConsole::new(cancel.clone());
        converse(session, console, options.verbosity, &cancel).await?
    } else {
        converse(session, PlainConsole::stdin(), options.verbosity, &cancel).await?
    };

    tracing::info!(?outcome, "Talk finished");
    Ok(())
}

async fn establish(mode: &Mode, options: &Options) -> Result<Established<TcpStream>, TalkError> {
    match mode {
        Mode::Server { port, .. } => establish_server(*port, options, &mut StdinPrompt).await,
        Mode::Client { host, port, .. } => establish_client(host, *port, options).await,
    }
}
