//! Line-oriented chat front end.
//!
//! Reads one line at a time, keeps reading while a reply is outstanding, and
//! renders transcript changes as they happen. Lines starting with `/` are
//! commands; everything else is a question for the assistant.

use crate::{
    Error, Result,
    backend::{ChatResponse, HISTORY_LIMIT, HistoryEntry},
    chat::{ChatClient, ChatMessage, Role, SkipReason},
};
use std::{future::Future, pin::Pin};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Quick-start questions offered before the first message.
pub const SUGGESTIONS: [&str; 4] = [
    "What projects has Sriram built?",
    "What programming languages does Sriram know?",
    "Tell me about his internship experience",
    "What is Sriram studying?",
];

pub const WELCOME: &str = "Ask me anything about Sriram's background, skills, or projects.";

const HELP: &str = "\
Commands:
  /suggest       list suggested questions
  /ask <n>       send suggested question <n>
  /history [n]   show the last n messages stored by the backend (max 20)
  /health        check that the backend is up
  /status        show which resume the backend uses and whether its API key is set
  /help          show this help
  /quit          leave the chat";

const TYPING: &str = "...";
pub const STILL_WAITING: &str = "Still waiting for the previous reply.";
const BUSY: &str = "Wait for the current reply before querying the backend.";

type InFlight = Pin<Box<dyn Future<Output = Result<ChatResponse>> + Send>>;

enum Command {
    Say(String),
    Ask(usize),
    Suggest,
    History(usize),
    Health,
    Status,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Say(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match name {
        "quit" | "exit" => Command::Quit,
        "help" => Command::Help,
        "suggest" => Command::Suggest,
        "health" => Command::Health,
        "status" => Command::Status,
        "history" => match arg.map(str::parse::<usize>) {
            None => Command::History(HISTORY_LIMIT),
            Some(Ok(n)) if n > 0 => Command::History(n.min(HISTORY_LIMIT)),
            Some(_) => Command::Unknown(line.to_string()),
        },
        "ask" => match arg.map(str::parse::<usize>) {
            Some(Ok(n)) => Command::Ask(n),
            _ => Command::Unknown(line.to_string()),
        },
        _ => Command::Unknown(line.to_string()),
    }
}

/// Formats one transcript entry. Continuation lines are indented under the label.
pub fn render_message(message: &ChatMessage) -> String {
    let label = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let indent = " ".repeat(label.len() + 2);
    let separator = format!("\n{}", indent);
    let body = message.content.lines().collect::<Vec<_>>().join(separator.as_str());
    format!("{}> {}", label, body)
}

pub fn render_error(error: &str) -> String {
    format!("⚠ {}", error)
}

fn render_history_entry(entry: &HistoryEntry) -> String {
    match entry.recorded_at() {
        Some(at) => format!("[{}] {}: {}", at.format("%Y-%m-%d %H:%M"), entry.role, entry.content),
        None => format!("{}: {}", entry.role, entry.content),
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

async fn write_suggestions<W: AsyncWrite + Unpin>(writer: &mut W) -> Result<()> {
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        write_line(writer, &format!("  {}. {}", i + 1, suggestion)).await?;
    }
    Ok(())
}

async fn wait_for(in_flight: &mut Option<InFlight>) -> Result<ChatResponse> {
    match in_flight.as_mut() {
        Some(request) => request.await,
        None => std::future::pending().await,
    }
}

/// Applies a finished exchange and renders whatever it produced.
async fn conclude<W: AsyncWrite + Unpin>(
    client: &mut ChatClient,
    writer: &mut W,
    result: Result<ChatResponse>,
) -> Result<()> {
    client.complete(result)?;

    if client.error().is_empty() {
        if let Some(reply) = client.transcript().last() {
            write_line(writer, &render_message(reply)).await?;
        }
    } else {
        write_line(writer, &render_error(client.error())).await?;
    }
    Ok(())
}

/// Starts a chat exchange for `text` without waiting for its reply.
async fn send<W: AsyncWrite + Unpin>(
    client: &mut ChatClient,
    writer: &mut W,
    in_flight: &mut Option<InFlight>,
    text: &str,
) -> Result<()> {
    client.set_input(text);
    match client.begin(text) {
        Ok(request) => {
            if let Some(message) = client.transcript().last() {
                write_line(writer, &render_message(message)).await?;
            }
            write_line(writer, TYPING).await?;

            let backend = client.backend();
            let exchange: InFlight = Box::pin(async move { backend.send_message(request).await });
            *in_flight = Some(exchange);
        }
        Err(SkipReason::Pending) => write_line(writer, STILL_WAITING).await?,
        Err(SkipReason::Empty) => {}
    }
    Ok(())
}

/// Handles one input line. Returns `false` when the user asked to leave.
async fn handle_line<W: AsyncWrite + Unpin>(
    client: &mut ChatClient,
    writer: &mut W,
    in_flight: &mut Option<InFlight>,
    line: &str,
) -> Result<bool> {
    let command = parse_command(line.trim());

    // Backend lookups are awaited inline and would hold back a pending reply
    if client.is_pending()
        && matches!(command, Command::History(_) | Command::Health | Command::Status)
    {
        write_line(writer, BUSY).await?;
        return Ok(true);
    }

    match command {
        Command::Say(text) => send(client, writer, in_flight, &text).await?,
        Command::Ask(n) => match n.checked_sub(1).and_then(|i| SUGGESTIONS.get(i)) {
            Some(question) => send(client, writer, in_flight, question).await?,
            None => {
                write_line(
                    writer,
                    &format!("Pick a suggestion between 1 and {}.", SUGGESTIONS.len()),
                )
                .await?
            }
        },
        Command::Suggest => write_suggestions(writer).await?,
        Command::History(limit) => match client.backend().recent_history(limit).await {
            Ok(entries) if entries.is_empty() => write_line(writer, "No stored messages yet.").await?,
            Ok(entries) => {
                for entry in &entries {
                    write_line(writer, &render_history_entry(entry)).await?;
                }
            }
            Err(e) => write_line(writer, &render_error(&e.user_message())).await?,
        },
        Command::Health => match client.backend().health().await {
            Ok(health) => {
                write_line(writer, &format!("{}: {}", health.status, health.message)).await?
            }
            Err(e) => write_line(writer, &render_error(&e.user_message())).await?,
        },
        Command::Status => write_status(client, writer).await?,
        Command::Help => write_line(writer, HELP).await?,
        Command::Quit => return Ok(false),
        Command::Unknown(input) => {
            write_line(writer, &format!("Unknown command: {}", input)).await?
        }
    }
    Ok(true)
}

/// Resume and key diagnostics from the backend.
async fn write_status<W: AsyncWrite + Unpin>(client: &ChatClient, writer: &mut W) -> Result<()> {
    let backend = client.backend();

    match backend.resume_status().await {
        Ok(resume) => {
            write_line(
                writer,
                &format!("resume: {} ({} characters)", resume.source, resume.characters),
            )
            .await?;
            if let Some(first) = resume.preview.lines().find(|l| !l.trim().is_empty()) {
                write_line(writer, &format!("  {}", first.trim())).await?;
            }
        }
        Err(e) => write_line(writer, &render_error(&e.user_message())).await?,
    }

    match backend.config_status().await {
        Ok(status) if status.openrouter_key_set => {
            write_line(
                writer,
                &format!("api key: set ({} characters)", status.openrouter_key_length),
            )
            .await?
        }
        Ok(status) => {
            let dotenv = if status.dotenv_exists { "present" } else { "missing" };
            write_line(
                writer,
                &format!("api key: not set ({} is {})", status.dotenv_path, dotenv),
            )
            .await?
        }
        Err(e) => write_line(writer, &render_error(&e.user_message())).await?,
    }
    Ok(())
}

/// Runs the chat loop until `/quit` or end of input.
///
/// An outstanding request is always allowed to finish before returning, even
/// when reading input or writing output fails; that failure is returned once
/// the exchange has concluded.
pub async fn run<R, W>(client: &mut ChatClient, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut in_flight: Option<InFlight> = None;
    let mut failure: Option<Error> = None;

    if client.transcript().is_empty() {
        write_line(&mut writer, WELCOME).await?;
        write_suggestions(&mut writer).await?;
        write_line(&mut writer, "Type /help for commands.").await?;
    }

    loop {
        let step = tokio::select! {
            biased;

            result = wait_for(&mut in_flight) => {
                in_flight = None;
                conclude(client, &mut writer, result).await.map(|()| true)
            }

            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => handle_line(client, &mut writer, &mut in_flight, &line).await,
                    Ok(None) => {
                        debug!("End of input");
                        Ok(false)
                    }
                    Err(e) => Err(e.into()),
                }
            }
        };

        match step {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                warn!("Chat loop stopped: {}", e);
                failure = Some(e);
                break;
            }
        }
    }

    // Requests are never aborted
    if in_flight.is_some() {
        let result = wait_for(&mut in_flight).await;
        if failure.is_some() {
            // Output is unreliable; settle the exchange without rendering it
            if let Err(e) = client.complete(result) {
                warn!("Could not settle pending exchange: {}", e);
            }
        } else if let Err(e) = conclude(client, &mut writer, result).await {
            failure = Some(e);
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
