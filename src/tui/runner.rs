use std::io;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use newsdesk::{
    api::AdminClient,
    app::{AppState, Mode},
    calendar::{load_calendar, LoadStatus},
    input::{command_mode, drag_mode, insert_mode, normal_mode},
    session::SessionStore,
    storage::{config::Config, Journal},
};

use crate::tui::{presentation::ui, sample_events::add_sample_events};

/// Everything the event loop needs besides the state it draws.
struct Backends {
    client: AdminClient,
    article_limit: u32,
    journal: Option<Journal>,
    sample: bool,
}

impl Backends {
    fn pending_count(&self) -> Option<usize> {
        let journal = self.journal.as_ref()?;
        journal
            .count()
            .map_err(|e| tracing::warn!("Failed to count pending changes: {}", e))
            .ok()
    }

    fn flush_changes(&self, app: &mut AppState) {
        let changes = app.take_changes();
        let Some(journal) = &self.journal else {
            return;
        };
        for change in &changes {
            if let Err(e) = journal.record(change) {
                tracing::error!("Failed to journal {} of {}: {}", change.operation(), change.event_id(), e);
                app.set_error(format!("Change not saved locally: {}", e));
            }
        }
    }
}

pub async fn run_tui(sample: bool) -> Result<(), io::Error> {
    let config = Config::load_or_create().map_err(|e| io::Error::other(e.to_string()))?;

    let session = SessionStore::new(&config.session.path).load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable session: {}", e);
        None
    });
    let client = AdminClient::new(&config.api)
        .map_err(|e| io::Error::other(e.to_string()))?
        .with_session(session.as_ref());
    let journal = match Journal::open(&config.journal.path) {
        Ok(journal) => Some(journal),
        Err(e) => {
            tracing::error!("Change journal unavailable: {}", e);
            None
        }
    };
    let backends = Backends { client, article_limit: config.api.article_limit, journal, sample };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::with_config(&config);
    if let Some(user) = session.as_ref().and_then(|s| s.user.as_ref()) {
        tracing::info!("Signed in as {}", user.display_name());
    }

    let res = match reload(&mut terminal, &mut app, &backends).await {
        Ok(()) => run_app(&mut terminal, &mut app, &backends).await,
        Err(e) => Err(e),
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

async fn reload<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    backends: &Backends,
) -> io::Result<()> {
    app.load_status = LoadStatus::Loading;
    terminal.draw(|f| ui(f, app, backends.pending_count()))?;

    app.load_status = load_calendar(&backends.client, backends.article_limit, &mut app.store).await;
    if backends.sample {
        add_sample_events(app);
    }
    app.reset_event_selection();

    match &app.load_status {
        LoadStatus::Failed(message) => app.set_error(message.clone()),
        LoadStatus::Loaded(count) => app.set_info(format!("Loaded {} events", count)),
        _ => {}
    }
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    backends: &Backends,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app, backends.pending_count()))?;

        if let TermEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match app.mode {
                Mode::Normal => {
                    if app.show_help {
                        handle_help_keys(key.code, app);
                    } else {
                        match key.code {
                            KeyCode::Char('q') => return Ok(()),
                            _ => normal_mode::handle_key(key.code, app),
                        }
                    }
                }
                Mode::Command => {
                    if handle_command_mode(key.code, app, terminal, backends).await? {
                        return Ok(());
                    }
                }
                Mode::Insert => insert_mode::handle_key(key.code, app),
                Mode::Drag => {
                    if let Some(drop) = drag_mode::handle_key(key.code, app) {
                        tracing::info!("Moved {} from {} to {}", drop.event_id, drop.from, drop.to);
                    }
                }
                Mode::ConfirmDelete => handle_delete_confirmation(key.code, app),
            }
            backends.flush_changes(app);
        }
    }
}

fn handle_help_keys(code: KeyCode, app: &mut AppState) {
    match code {
        KeyCode::Char('j') => {
            app.help_scroll = app.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') => {
            app.help_scroll = app.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.show_help = false;
            app.help_scroll = 0;
        }
        _ => {}
    }
}

async fn handle_command_mode<B: ratatui::backend::Backend>(
    code: KeyCode,
    app: &mut AppState,
    terminal: &mut Terminal<B>,
    backends: &Backends,
) -> io::Result<bool> {
    match code {
        KeyCode::Enter => {
            let cmd = command_mode::parse_command(&app.command_buffer);
            match command_mode::execute_command(cmd, app) {
                command_mode::CommandOutcome::Quit => return Ok(true),
                command_mode::CommandOutcome::Reload => reload(terminal, app, backends).await?,
                command_mode::CommandOutcome::Continue => {}
            }
            Ok(false)
        }
        KeyCode::Esc => {
            app.command_buffer.clear();
            app.mode = Mode::Normal;
            Ok(false)
        }
        KeyCode::Backspace => {
            app.command_buffer.pop();
            Ok(false)
        }
        KeyCode::Char(c) => {
            app.command_buffer.push(c);
            Ok(false)
        }
        _ => Ok(false),
    }
}

fn handle_delete_confirmation(code: KeyCode, app: &mut AppState) {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(event_id) = &app.delete_confirmation_event_id {
                tracing::info!("Deleting event: {}", event_id);
            }
            app.confirm_delete();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}
