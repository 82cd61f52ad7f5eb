//! reveil - an interactive alarm scheduler.
//!
//! Reads one request per line from stdin, queues accepted requests on a
//! shared alarm queue, and fires them from a dedicated worker when their
//! deadline arrives.

use clap::Parser;
use reveil::{AlarmService, Dispatcher, Event, EventBus, EventHandler, RequestKind, Worker};
use std::io::Write;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing::{debug, info};

/// reveil - an interactive alarm scheduler
#[derive(Parser)]
#[command(name = "reveil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Suppress the interactive prompt (useful when piping input)
    #[arg(long)]
    no_prompt: bool,
}

/// Prints user-facing scheduler events to the terminal.
struct ConsoleHandler;

#[async_trait::async_trait]
impl EventHandler for ConsoleHandler {
    async fn handle(&self, event: &Event) {
        match event {
            Event::RequestQueued {
                kind,
                message_type,
                message_number,
                queued_at,
                replaced,
                ..
            } => {
                let label = if *replaced { "replacement " } else { "" };
                match kind {
                    RequestKind::Schedule | RequestKind::Cancel => println!(
                        "{} {}request with message number {} queued at {}",
                        kind,
                        label,
                        message_number,
                        queued_at.timestamp()
                    ),
                    _ => println!(
                        "{} request with message type {} queued at {}",
                        kind,
                        message_type,
                        queued_at.timestamp()
                    ),
                }
            }
            Event::RequestRejected { reason, .. } => {
                eprintln!("Error: {}", reason);
            }
            Event::AlarmFired {
                delay_seconds,
                message,
                ..
            } => {
                println!("({}) {}", delay_seconds, message);
            }
            Event::ControlExpired {
                kind, message_type, ..
            } => {
                info!(%kind, %message_type, "control request expired");
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let event_bus = Arc::new(EventBus::new());
    event_bus.register(Arc::new(ConsoleHandler)).await;

    let service = Arc::new(AlarmService::new(Arc::clone(&event_bus)));
    let dispatcher = Dispatcher::new(Arc::clone(&service), Arc::clone(&event_bus));

    let worker = Worker::new(Arc::clone(&service), Arc::clone(&event_bus));
    let worker_task = tokio::spawn(worker.run());

    tokio::select! {
        result = read_requests(dispatcher, !cli.no_prompt) => {
            result?;
            debug!("input closed");
        }
        _ = tokio::signal::ctrl_c() => {
            debug!("interrupted");
        }
    }

    worker_task.abort();
    Ok(())
}

/// Read request lines from stdin until EOF.
async fn read_requests(dispatcher: Dispatcher, show_prompt: bool) -> std::io::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        if show_prompt {
            print!("Alarm> ");
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };

        if line.trim().is_empty() {
            continue;
        }

        // Rejections are already reported through the event bus.
        if let Err(error) = dispatcher.dispatch_line(&line).await {
            debug!(%error, "request discarded");
        }
    }
}
