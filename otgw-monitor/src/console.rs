use std::io;

use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::app::App;
use crate::charts::SeriesSummary;
use crate::errors::CommandError;
use crate::services::{HistoryState, LinkState};

const DEFAULT_LOG_LINES: usize = 20;

const HELP: &str = "\
Available commands:
  help                     - Show this message
  status                   - Connection, transcript and chart summary
  log [n]                  - Print the last n transcript lines (default 20)
  history [hours]          - Reload the charts for the last hours
  history <from> <to>      - Reload the charts for a range, e.g. 2024-03-07T08:00
  heating on|off           - Switch central heating on the gateway
  exit                     - Exit console
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Log(usize),
    History(Option<u32>),
    HistoryRange(OffsetDateTime, OffsetDateTime),
    Heating(bool),
    Exit,
}

/// Parses one console line. Range arguments are read as wall-clock time in `offset`.
pub fn parse_command(line: &str, offset: UtcOffset) -> Result<Command, CommandError> {
    let mut args = line.split_whitespace();
    let name = args.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
    let args: Vec<&str> = args.collect();

    match (name.as_str(), args.as_slice()) {
        ("help" | "?", []) => Ok(Command::Help),
        ("status", []) => Ok(Command::Status),
        ("log", []) => Ok(Command::Log(DEFAULT_LOG_LINES)),
        ("log", [count]) => count
            .parse::<usize>()
            .map(Command::Log)
            .map_err(|e| invalid("log", count, e)),
        ("log", _) => Err(CommandError::Usage("log [n]")),
        ("history", []) => Ok(Command::History(None)),
        ("history", [hours]) => match hours.parse::<u32>() {
            Ok(0) => Err(invalid("history", hours, "must be greater than zero")),
            Ok(hours) => Ok(Command::History(Some(hours))),
            Err(e) => Err(invalid("history", hours, e)),
        },
        ("history", [from, to]) => {
            let from = parse_local(from, offset)?;
            let to = parse_local(to, offset)?;
            if from > to {
                return Err(CommandError::Usage("history <from> <to> with from before to"));
            }
            Ok(Command::HistoryRange(from, to))
        }
        ("history", _) => Err(CommandError::Usage("history [hours] | history <from> <to>")),
        ("heating", [state]) => match state.to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => Ok(Command::Heating(true)),
            "off" | "false" | "0" => Ok(Command::Heating(false)),
            _ => Err(invalid("heating", state, "expected on or off")),
        },
        ("heating", _) => Err(CommandError::Usage("heating on|off")),
        ("exit" | "quit", []) => Ok(Command::Exit),
        _ => Err(CommandError::Unknown(name.clone())),
    }
}

fn parse_local(value: &str, offset: UtcOffset) -> Result<OffsetDateTime, CommandError> {
    PrimitiveDateTime::parse(value, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
        .map(|local| local.assume_offset(offset))
        .map_err(|e| invalid("history", value, e))
}

fn invalid(command: &'static str, value: &str, reason: impl ToString) -> CommandError {
    CommandError::InvalidArgument {
        command,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Reads commands line by line until `exit` or end of input.
pub async fn run_console<R, W>(app: &App, input: R, output: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    output.write_all(b"=== otgw monitor console ===\n").await?;
    output.write_all(b"Type 'help' for available commands\n").await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line, app.offset()) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e @ CommandError::Unknown(_)) => {
                output.write_all(format!("{e}\nType 'help' for available commands\n").as_bytes()).await?;
                output.flush().await?;
                continue;
            }
            Err(e) => {
                output.write_all(format!("{e}\n").as_bytes()).await?;
                output.flush().await?;
                continue;
            }
        };

        if command == Command::Exit {
            output.write_all(b"Exiting console...\n").await?;
            output.flush().await?;
            break;
        }

        let reply = execute(app, command).await;
        output.write_all(reply.as_bytes()).await?;
        output.flush().await?;
    }

    Ok(())
}

async fn execute(app: &App, command: Command) -> String {
    match command {
        Command::Help => HELP.to_string(),
        Command::Status => status(app).await,
        Command::Log(count) => {
            let lines = app.state().transcript.lock().await.tail(count);
            if lines.is_empty() {
                return "No messages received yet\n".to_string();
            }
            lines.into_iter().map(|line| line + "\n").collect()
        }
        Command::History(hours) => {
            let hours = hours.unwrap_or(app.settings().history.range_hours);
            match app.reload_recent(hours).await {
                Ok(data) => format!("Loaded {} samples for the last {} hours\n", data.temperature.len(), hours),
                Err(e) => format!("Failed to load history: {e}\n"),
            }
        }
        Command::HistoryRange(from, to) => match app.reload_history(from, to).await {
            Ok(data) => format!("Loaded {} samples from {} to {}\n", data.temperature.len(), from, to),
            Err(e) => format!("Failed to load history: {e}\n"),
        },
        Command::Heating(enable) => {
            let _ = app.set_heating(enable);
            format!("Heating {} requested\n", if enable { "on" } else { "off" })
        }
        Command::Exit => String::new(),
    }
}

async fn status(app: &App) -> String {
    let link = match app.link_state() {
        LinkState::Connected => "connected",
        LinkState::Disconnected => "disconnected",
    };

    let (held, total) = {
        let transcript = app.state().transcript.lock().await;
        (transcript.len(), transcript.total())
    };

    let history = match &*app.state().history.read().await {
        HistoryState::Idle => "not loaded".to_string(),
        HistoryState::Loading { from, to } => format!("loading {from} .. {to}"),
        HistoryState::Ready { from, to, points } => format!("{points} samples, {from} .. {to}"),
        HistoryState::Failed(reason) => format!("failed: {reason}"),
    };

    let (temperature, flame) = {
        let charts = app.state().charts.lock().await;
        (charts.temperature.summary(), charts.flame.summary())
    };

    format!(
        "Gateway:     {} ({})\nTranscript:  {} held, {} received\nHistory:     {}\nTemperature: {}\nFlame:       {}\n",
        app.settings().gateway.ws_url(),
        link,
        held,
        total,
        history,
        describe(&temperature),
        describe(&flame),
    )
}

fn describe(summary: &SeriesSummary) -> String {
    match (summary.min, summary.max, summary.last) {
        (Some(min), Some(max), Some(last)) => {
            format!("{} points, min {min}, max {max}, last {last}", summary.count)
        }
        _ => format!("{} points", summary.count),
    }
}
