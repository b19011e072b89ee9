use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

use newsdesk::{
    api::{
        moderation::{Comment, CommentStatus, ModerationAction, ModerationQueue},
        security::SecurityOverview,
        subscribers::{export_csv, export_json, export_selection, Subscriber, SubscriberPage, SubscriberQuery},
        AdminClient,
    },
    session::{Session, SessionStore},
    storage::{config::Config, Change, Journal, PendingChange},
};

use crate::cli::{
    truncate_to_width, ExportFormat, JournalCommand, ModerationCommand, SecurityCommand, SubscriberCommand,
};

const EXPORT_PAGE_SIZE: u32 = 100;

struct AdminContext {
    sessions: SessionStore,
    client: AdminClient,
    session: Option<Session>,
}

impl AdminContext {
    fn load() -> Result<Self> {
        let config = Config::load_or_create().context("Failed to load config")?;
        let sessions = SessionStore::new(&config.session.path);
        let session = sessions.load().context("Failed to read session")?;
        let client = AdminClient::new(&config.api)?.with_session(session.as_ref());
        Ok(Self { sessions, client, session })
    }
}

pub async fn run_login(email: &str) -> Result<()> {
    let ctx = AdminContext::load()?;

    eprint!("Password for {}: ", email);
    io::stderr().flush()?;
    let mut password = String::new();
    io::stdin().lock().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("Password is required");
    }

    let session = ctx.client.login(email, password).await?;
    ctx.sessions.save(&session)?;

    let name = session.user.as_ref().map(|u| u.display_name().to_string()).unwrap_or_else(|| email.to_string());
    println!("Logged in as {}", name);
    Ok(())
}

pub fn run_logout() -> Result<()> {
    let config = Config::load_or_create().context("Failed to load config")?;
    if SessionStore::new(&config.session.path).logout()? {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

pub async fn run_moderation(command: ModerationCommand) -> Result<()> {
    let ctx = AdminContext::load()?;

    match command {
        ModerationCommand::List(status) => {
            let queue = ModerationQueue::new(ctx.client.moderation_queue().await?);
            print!("{}", format_queue(&queue, status.unwrap_or_default()));
        }
        ModerationCommand::Act { action, ids } => {
            let action = ModerationAction::parse(&action).with_context(|| format!("Unknown action {}", action))?;
            if let [id] = ids.as_slice() {
                ctx.client.moderate(id, action).await?;
                println!("Comment {} marked {}.", id, action.resulting_status().label().to_lowercase());
            } else {
                let outcome = ctx.client.moderate_many(&ids, action).await?;
                println!(
                    "{}: {} succeeded, {} failed.",
                    action.verb(),
                    outcome.succeeded,
                    outcome.failed
                );
                if outcome.failed > 0 {
                    bail!("{} of {} comments could not be updated", outcome.failed, ids.len());
                }
            }
        }
    }
    Ok(())
}

fn format_queue(queue: &ModerationQueue, tab: CommentStatus) -> String {
    let tabs: Vec<String> = CommentStatus::ALL
        .iter()
        .map(|status| {
            let label = format!("{} ({})", status.label(), queue.count(*status));
            if *status == tab { format!("[{}]", label) } else { label }
        })
        .collect();

    let mut out = format!("{}\n\n", tabs.join("  "));
    let comments = queue.with_status(tab);
    if comments.is_empty() {
        out.push_str(&format!("No {} comments.\n", tab.label().to_lowercase()));
    }
    for comment in comments {
        out.push_str(&format_comment(comment));
    }
    out
}

fn format_comment(comment: &Comment) -> String {
    let submitted = comment
        .submitted_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown time".to_string());
    format!(
        "{}  {} <{}> on \"{}\" at {} from {}\n    {}\n",
        comment.id,
        comment.author,
        comment.email,
        comment.article_title,
        submitted,
        comment.ip_address,
        truncate_to_width(&comment.content.replace('\n', " "), 100),
    )
}

pub async fn run_subscribers(command: SubscriberCommand) -> Result<()> {
    let ctx = AdminContext::load()?;

    match command {
        SubscriberCommand::List { status, search, page } => {
            let query = SubscriberQuery { page, status, search, ..SubscriberQuery::default() };
            let page = ctx.client.subscribers(&query).await?;
            print!("{}", format_subscriber_page(&page));
        }
        SubscriberCommand::SetStatus { id, status } => {
            ctx.client.set_subscriber_status(&id, status).await?;
            println!("Subscriber {} is now {}.", id, status.as_str());
        }
        SubscriberCommand::Export { format, ids } => {
            let all = fetch_all_subscribers(&ctx.client).await?;
            let selected = export_selection(&all, &ids);
            if selected.len() < ids.len() {
                tracing::warn!("{} requested subscriber ids were not found", ids.len() - selected.len());
            }
            let output = match format {
                ExportFormat::Csv => export_csv(&selected),
                ExportFormat::Json => export_json(&selected)?,
            };
            println!("{}", output);
        }
    }
    Ok(())
}

async fn fetch_all_subscribers(client: &AdminClient) -> Result<Vec<Subscriber>> {
    let mut query = SubscriberQuery { limit: EXPORT_PAGE_SIZE, ..SubscriberQuery::default() };
    let mut all = Vec::new();
    loop {
        let page = client.subscribers(&query).await?;
        let fetched = page.subscribers.len();
        all.extend(page.subscribers);
        if fetched == 0 || query.page >= page.pagination.total_pages {
            break;
        }
        query.page += 1;
    }
    Ok(all)
}

fn format_subscriber_page(page: &SubscriberPage) -> String {
    let stats = &page.stats;
    let mut out = format!(
        "Total {}  Active {}  Paused {}  Unsubscribed {}\n\n",
        stats.total, stats.active, stats.paused, stats.unsubscribed
    );
    out.push_str(&format!(
        "{:<10} {:<32} {:<20} {:<13} {:<14} {:>6} {}\n",
        "ID", "Email", "Name", "Status", "Subscribed", "Emails", "Engagement"
    ));
    for sub in &page.subscribers {
        out.push_str(&format!(
            "{:<10} {:<32} {:<20} {:<13} {:<14} {:>6} {}\n",
            truncate_to_width(&sub.id, 10),
            truncate_to_width(&sub.email, 32),
            truncate_to_width(sub.name.as_deref().unwrap_or("-"), 20),
            sub.status.as_str(),
            sub.subscribed_on(),
            sub.emails_received,
            sub.engagement_rate(),
        ));
    }
    let pagination = &page.pagination;
    out.push_str(&format!(
        "\nPage {} of {} ({} subscribers)\n",
        pagination.page,
        pagination.total_pages.max(1),
        pagination.total
    ));
    out
}

pub async fn run_security(command: SecurityCommand) -> Result<()> {
    let ctx = AdminContext::load()?;

    match command {
        SecurityCommand::Show => {
            let overview = ctx.client.security_overview().await?;
            print!("{}", format_security_report(&overview));
        }
        SecurityCommand::Set(assignments) => {
            if !ctx.session.as_ref().is_some_and(Session::is_super_admin) {
                bail!("Changing security settings requires a super admin session");
            }
            let mut settings = ctx.client.security_overview().await?.settings;
            for assignment in &assignments {
                settings.assign(assignment)?;
            }
            ctx.client.save_security_settings(&settings).await?;
            println!("Security settings saved.");
        }
    }
    Ok(())
}

fn format_security_report(overview: &SecurityOverview) -> String {
    let stats = &overview.stats;
    let settings = &overview.settings;
    let mut out = format!(
        "Security score: {} ({})\nFailed logins (24h): {}  Blocked IPs: {}  Active sessions: {}\n",
        stats.security_score,
        stats.score_label(),
        stats.failed_logins_24h,
        stats.blocked_ips,
        stats.active_sessions,
    );
    out.push_str(&format!("High severity events: {}\n\nSettings\n", overview.high_severity_count()));

    let rows: [(&str, String); 10] = [
        ("mfaRequired", settings.mfa_required.to_string()),
        ("sessionTimeout", format!("{} min", settings.session_timeout)),
        ("maxLoginAttempts", settings.max_login_attempts.to_string()),
        ("passwordMinLength", settings.password_min_length.to_string()),
        ("passwordRequireSpecial", settings.password_require_special.to_string()),
        ("passwordRequireNumbers", settings.password_require_numbers.to_string()),
        ("passwordExpiry", format!("{} days", settings.password_expiry)),
        ("ipWhitelistEnabled", settings.ip_whitelist_enabled.to_string()),
        ("rateLimiting", settings.rate_limiting.to_string()),
        ("bruteForceProtection", settings.brute_force_protection.to_string()),
    ];
    for (key, value) in rows {
        out.push_str(&format!("  {:<24} {}\n", key, value));
    }

    out.push_str("\nRecent events\n");
    if overview.events.is_empty() {
        out.push_str("  None\n");
    }
    for event in &overview.events {
        out.push_str(&format!(
            "  {} {:<8} {:<20} {} ({}{})\n",
            event.event_type.icon(),
            format!("{:?}", event.severity).to_lowercase(),
            event.timestamp,
            event.description,
            event.ip,
            event.user.as_deref().map(|u| format!(", {}", u)).unwrap_or_default(),
        ));
    }
    out
}

pub fn run_journal(command: JournalCommand) -> Result<()> {
    let config = Config::load_or_create().context("Failed to load config")?;
    let journal = Journal::open(&config.journal.path)
        .with_context(|| format!("Failed to open journal at {}", config.journal.path.display()))?;

    match command {
        JournalCommand::List => {
            let pending = journal.pending()?;
            if pending.is_empty() {
                println!("No unsynced calendar changes.");
            }
            for entry in &pending {
                println!("{}", format_pending(entry));
            }
        }
        JournalCommand::Clear => {
            let dropped = journal.clear()?;
            println!("Dropped {} unsynced changes.", dropped);
        }
    }
    Ok(())
}

fn format_pending(entry: &PendingChange) -> String {
    let detail = match &entry.change {
        Change::Reschedule { from, to, .. } => {
            format!("{} -> {}", from.format("%Y-%m-%d %H:%M"), to.format("%Y-%m-%d %H:%M"))
        }
        Change::Upsert(event) => format!("\"{}\" at {}", event.title, event.scheduled_for.format("%Y-%m-%d %H:%M")),
        Change::Delete { .. } => String::new(),
    };
    format!(
        "#{:<4} {} {:<10} {:<38} {}",
        entry.id,
        entry.created_at.format("%Y-%m-%d %H:%M"),
        entry.change.operation(),
        entry.change.event_id(),
        detail
    )
    .trim_end()
    .to_string()
}
