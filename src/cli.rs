use std::{
    env,
    io::{self, Write},
    process::{Command, Stdio},
};

use chrono::{Local, NaiveDate};

use newsdesk::{
    api::{moderation::CommentStatus, subscribers::SubscriberStatus, AdminClient},
    calendar::{load_calendar, CalendarEvent, EventFilter, EventStore, LoadStatus},
    session::SessionStore,
    storage::config::Config,
};

pub const USAGE: &str = "Usage:
  newsdesk [--sample]
  newsdesk --agenda [YYYY/MM/DD]
  newsdesk login <email>
  newsdesk logout
  newsdesk moderation [list [pending|approved|rejected|spam]]
  newsdesk moderation <approve|reject|spam> <id>...
  newsdesk subscribers [--status S] [--search Q] [--page N]
  newsdesk subscribers set-status <id> <active|paused|unsubscribed>
  newsdesk subscribers export <csv|json> [id...]
  newsdesk security [show]
  newsdesk security set key=value...
  newsdesk journal [list|clear]";

#[derive(Debug, Clone, PartialEq)]
pub enum CliMode {
    Default { sample: bool },
    AgendaDate(NaiveDate),
    Login { email: String },
    Logout,
    Moderation(ModerationCommand),
    Subscribers(SubscriberCommand),
    Security(SecurityCommand),
    Journal(JournalCommand),
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModerationCommand {
    List(Option<CommentStatus>),
    Act { action: String, ids: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubscriberCommand {
    List { status: Option<SubscriberStatus>, search: Option<String>, page: u32 },
    SetStatus { id: String, status: SubscriberStatus },
    Export { format: ExportFormat, ids: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SecurityCommand {
    Show,
    Set(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalCommand {
    List,
    Clear,
}

pub fn parse_cli_mode() -> Result<CliMode, String> {
    parse_args(env::args().skip(1))
}

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliMode, String> {
    let mut args = args.into_iter();
    let Some(first) = args.next() else {
        return Ok(CliMode::Default { sample: false });
    };

    match first.as_str() {
        "--sample" => match args.next() {
            None => Ok(CliMode::Default { sample: true }),
            Some(arg) => Err(format!("Unknown argument: {}", arg)),
        },
        "--agenda" => {
            let date = match args.next() {
                Some(date_str) => NaiveDate::parse_from_str(&date_str, "%Y/%m/%d")
                    .map_err(|_| format!("Invalid date '{}'. Use YYYY/MM/DD.", date_str))?,
                None => Local::now().date_naive(),
            };
            Ok(CliMode::AgendaDate(date))
        }
        "--help" | "-h" | "help" => Ok(CliMode::Help),
        "login" => {
            let email = args.next().ok_or("login requires an email address")?;
            Ok(CliMode::Login { email })
        }
        "logout" => Ok(CliMode::Logout),
        "moderation" => parse_moderation(args.collect()).map(CliMode::Moderation),
        "subscribers" => parse_subscribers(args.collect()).map(CliMode::Subscribers),
        "security" => parse_security(args.collect()).map(CliMode::Security),
        "journal" => match args.next().as_deref() {
            None | Some("list") => Ok(CliMode::Journal(JournalCommand::List)),
            Some("clear") => Ok(CliMode::Journal(JournalCommand::Clear)),
            Some(other) => Err(format!("Unknown journal command: {}", other)),
        },
        _ => Err(format!("Unknown argument: {}", first)),
    }
}

fn parse_moderation(args: Vec<String>) -> Result<ModerationCommand, String> {
    match args.first().map(String::as_str) {
        None | Some("list") => {
            let status = match args.get(1) {
                None => None,
                Some(s) => Some(CommentStatus::parse(s).ok_or_else(|| format!("Unknown comment status: {}", s))?),
            };
            Ok(ModerationCommand::List(status))
        }
        Some(action @ ("approve" | "reject" | "spam")) => {
            let ids: Vec<String> = args[1..].to_vec();
            if ids.is_empty() {
                return Err(format!("{} requires at least one comment id", action));
            }
            Ok(ModerationCommand::Act { action: action.to_string(), ids })
        }
        Some(other) => Err(format!("Unknown moderation command: {}", other)),
    }
}

fn parse_subscribers(args: Vec<String>) -> Result<SubscriberCommand, String> {
    match args.first().map(String::as_str) {
        Some("set-status") => {
            let [_, id, status] = args.as_slice() else {
                return Err("set-status requires <id> <status>".to_string());
            };
            let status = SubscriberStatus::parse(status).ok_or_else(|| format!("Unknown subscriber status: {}", status))?;
            Ok(SubscriberCommand::SetStatus { id: id.clone(), status })
        }
        Some("export") => {
            let format = match args.get(1).map(String::as_str) {
                Some("csv") => ExportFormat::Csv,
                Some("json") => ExportFormat::Json,
                _ => return Err("export requires csv or json".to_string()),
            };
            Ok(SubscriberCommand::Export { format, ids: args[2..].to_vec() })
        }
        _ => {
            let mut status = None;
            let mut search = None;
            let mut page = 1;
            let mut iter = args.into_iter();
            while let Some(flag) = iter.next() {
                let value = iter.next().ok_or_else(|| format!("{} requires a value", flag))?;
                match flag.as_str() {
                    "--status" if value == "all" => status = None,
                    "--status" => {
                        status = Some(SubscriberStatus::parse(&value).ok_or_else(|| format!("Unknown subscriber status: {}", value))?)
                    }
                    "--search" => search = Some(value),
                    "--page" => page = value.parse().map_err(|_| format!("Invalid page: {}", value))?,
                    _ => return Err(format!("Unknown argument: {}", flag)),
                }
            }
            Ok(SubscriberCommand::List { status, search, page })
        }
    }
}

fn parse_security(args: Vec<String>) -> Result<SecurityCommand, String> {
    match args.first().map(String::as_str) {
        None | Some("show") => Ok(SecurityCommand::Show),
        Some("set") if args.len() > 1 => Ok(SecurityCommand::Set(args[1..].to_vec())),
        Some("set") => Err("set requires at least one key=value".to_string()),
        Some(other) => Err(format!("Unknown security command: {}", other)),
    }
}

pub async fn run_agenda_mode(date: NaiveDate) -> Result<(), io::Error> {
    let config = Config::load_or_create().map_err(|e| io::Error::other(e.to_string()))?;
    let session = SessionStore::new(&config.session.path).load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable session: {}", e);
        None
    });
    let client = AdminClient::new(&config.api)
        .map_err(|e| io::Error::other(e.to_string()))?
        .with_session(session.as_ref());

    let mut store = EventStore::new();
    if let LoadStatus::Failed(message) = load_calendar(&client, config.api.article_limit, &mut store).await {
        eprintln!("{}", message);
    }

    let mut events = store.events_for_date(date, &EventFilter::default());
    events.sort_by_key(|event| event.scheduled_for);
    let agenda = format_agenda_text(date, &events, &config.ui.time_format);
    display_with_pager(&agenda)
}

fn format_agenda_text(date: NaiveDate, events: &[&CalendarEvent], time_format: &str) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Content schedule - {}", date.format("%A, %B %d, %Y")));
    lines.push(String::new());

    if events.is_empty() {
        lines.push("Nothing scheduled.".to_string());
    } else {
        for event in events {
            lines.push(format!("- {}", build_agenda_line(event, time_format, usize::MAX)));
        }
    }

    lines.join("\n")
}

fn build_agenda_line(event: &CalendarEvent, time_format: &str, width: usize) -> String {
    let line = format!(
        "{:<8} {} {:<13} {:<11} {} ({}, {})",
        event.time_label(time_format),
        event.priority.icon(),
        event.content_type.label(),
        event.status.label(),
        event.title,
        event.author,
        event.category,
    );
    truncate_to_width(&line, width)
}

pub fn truncate_to_width(line: &str, width: usize) -> String {
    if width > 0 && line.chars().count() > width {
        let mut truncated = line.chars().take(width.saturating_sub(1)).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        line.to_string()
    }
}

pub fn display_with_pager(text: &str) -> Result<(), io::Error> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let Some(cmd) = parts.next() else {
        print!("{text}");
        return Ok(());
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd).args(&args).stdin(Stdio::piped()).spawn() {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(_) => {
            print!("{text}");
        }
    }

    Ok(())
}
