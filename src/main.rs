use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use clap::{Parser, Subcommand};
use raslan::clipboard::SystemClipboard;
use raslan::config::{self, RaslanConfig};
use raslan::render::format_message;
use raslan::repl::{self, LineBuffer, ReplCommand};
use raslan::session::{Session, SessionState, TurnOutcome};
use raslan::theme::Theme;
use raslan::transport::{ChatTransport, ProxyClient, TransportError};
use raslan::view::{self, TerminalView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::Level;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    TurnFailed(String),
}

#[derive(Parser, Debug)]
#[command(name = "raslan", about = "Ask Raslan: chat with a hosted model through the backend proxy")]
struct Cli {
    /// Proxy base URL.
    #[arg(long, env = "RASLAN_API_URL", default_value = config::DEFAULT_API_URL)]
    base_url: String,

    /// Chat endpoint path under the base URL.
    #[arg(long, env = "RASLAN_CHAT_PATH", default_value = config::DEFAULT_CHAT_PATH)]
    chat_path: String,

    /// Model identifier forwarded to the provider.
    #[arg(long, env = "RASLAN_MODEL", default_value = config::DEFAULT_MODEL)]
    model: String,

    /// Maximum reply size in tokens.
    #[arg(long, env = "RASLAN_MAX_TOKENS", default_value_t = config::DEFAULT_MAX_TOKENS, value_parser = config::parse_max_tokens)]
    max_tokens: u32,

    /// Log verbosity on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat session (default).
    Chat,
    /// Check that the backend proxy is up.
    Health,
    /// Ask a single question and print the reply.
    Ask {
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(level).init();

    let config = resolve_config(&cli);
    let client = ProxyClient::new(&config)?;
    tracing::info!(url = client.chat_url(), model = %config.model, "raslan starting");
    let client: Arc<dyn ChatTransport> = Arc::new(client);

    match cli.command {
        None | Some(Command::Chat) => run_chat(client, &config).await,
        Some(Command::Health) => run_health(client.as_ref()).await,
        Some(Command::Ask { text }) => run_ask(client, &config, &text.join(" ")).await,
    }
}

/// Flags win over `RASLAN_*` variables, which win over the defaults.
fn resolve_config(cli: &Cli) -> RaslanConfig {
    RaslanConfig::new(cli.base_url.clone(), cli.chat_path.clone(), cli.model.clone(), cli.max_tokens)
}

async fn run_health(client: &dyn ChatTransport) -> Result<(), CliError> {
    let health = client.check_health().await?;
    println!("{}", health.status);
    Ok(())
}

async fn run_ask(client: Arc<dyn ChatTransport>, config: &RaslanConfig, text: &str) -> Result<(), CliError> {
    let session = Session::new(client, config);
    let outcome = session.send_message(text).await;
    let reply = session
        .active_messages()
        .await
        .pop()
        .map(|message| message.content)
        .unwrap_or_default();

    match outcome {
        TurnOutcome::Completed => {
            println!("{}", format_message(&reply, Theme::default()));
            Ok(())
        }
        TurnOutcome::Skipped => Err(CliError::TurnFailed("nothing to send".to_owned())),
        TurnOutcome::Failed | TurnOutcome::Orphaned => Err(CliError::TurnFailed(reply)),
    }
}

async fn run_chat(client: Arc<dyn ChatTransport>, config: &RaslanConfig) -> Result<(), CliError> {
    let session = Session::new(client, config);
    let terminal = Arc::new(Mutex::new(TerminalView::new(io::stdout())));
    session
        .subscribe({
            let terminal = terminal.clone();
            move |state: &SessionState| {
                let mut terminal = terminal.lock().unwrap_or_else(PoisonError::into_inner);
                if let Err(e) = terminal.render(state) {
                    tracing::warn!(error = %e, "render failed");
                }
            }
        })
        .await;

    println!("Ask Raslan. Type /help for commands.");
    spawn_health_check(&session);

    let clipboard = SystemClipboard;
    let mut buffer = LineBuffer::default();
    let mut in_flight: Vec<JoinHandle<TurnOutcome>> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let Some(input) = buffer.push(&line) else {
            continue;
        };
        let command = match repl::parse_line(&input) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            ReplCommand::Send(text) => match session.submit(&text).await {
                Some(turn) => {
                    in_flight.retain(|turn| !turn.is_finished());
                    in_flight.push(turn);
                }
                None => eprintln!("still waiting for the previous reply"),
            },
            ReplCommand::New => {
                session.new_conversation().await;
            }
            ReplCommand::List => print!("{}", view::format_conversation_list(&session.snapshot().await)),
            ReplCommand::Select(id) => {
                if !session.select_conversation(id).await {
                    eprintln!("no conversation #{id}");
                }
            }
            ReplCommand::Delete(id) => {
                if !session.delete_conversation(id).await {
                    eprintln!("cannot delete #{id}: unknown or the last remaining conversation");
                }
            }
            ReplCommand::Clear => session.clear_active_conversation().await,
            ReplCommand::Copy(index) => {
                if let Err(e) = session.copy_message(index, &clipboard).await {
                    eprintln!("{e}");
                }
            }
            ReplCommand::Theme => {
                session.toggle_theme().await;
            }
            ReplCommand::Health => spawn_health_check(&session),
            ReplCommand::Help => println!("{}", repl::HELP),
            ReplCommand::Quit => break,
        }
    }

    // Piped input ends before the last reply arrives.
    for turn in in_flight {
        if let Err(e) = turn.await {
            tracing::warn!(error = %e, "chat turn task failed");
        }
    }
    Ok(())
}

fn spawn_health_check(session: &Session) {
    let session = session.clone();
    tokio::spawn(async move {
        session.check_health().await;
    });
}

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;
