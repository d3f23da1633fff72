pub mod app;
pub mod event;
mod views;
mod widgets;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self as ct_event, Event};
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use uuid::Uuid;
use ventra_core::api::OutreachApi;
use ventra_core::auth::AuthService;
use ventra_core::blob::BlobClient;
use ventra_core::config::VentraConfig;
use ventra_core::model::*;
use ventra_core::store::StoreClient;
use ventra_core::{history, ingest, send};

use self::app::{App, Screen};
use self::event::{AsyncAction, AsyncResult};

/// Entry point for the interactive TUI mode.
pub async fn run_tui(config: &VentraConfig) -> Result<()> {
    let auth = AuthService::new(&config.supabase);
    let store = Arc::new(StoreClient::new(
        &config.supabase.url,
        &config.supabase.anon_key,
    ));
    let blob = BlobClient::new(
        &config.supabase.url,
        &config.supabase.anon_key,
        &config.supabase.bucket,
    );
    let api = OutreachApi::new(&config.api.base_url);

    // Keep the store's bearer token in step with auth events
    let mut sessions = auth.subscribe();
    let token_store = Arc::clone(&store);
    tokio::spawn(async move {
        while sessions.changed().await.is_ok() {
            let token = sessions
                .borrow()
                .1
                .as_ref()
                .map(|s| s.access_token.clone());
            token_store.set_access_token(token);
        }
    });

    // Channels for async communication
    let (action_tx, action_rx) = mpsc::unbounded_channel::<AsyncAction>();
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<AsyncResult>();

    tokio::spawn(worker_loop(auth, store, blob, api, action_rx, result_tx));

    // Resolve the saved session before anything renders past the splash
    action_tx.send(AsyncAction::CheckSession)?;

    let mut terminal = ratatui::init();
    let mut app = App::new();

    let result = run_loop(&mut terminal, &mut app, &action_tx, &mut result_rx);

    ratatui::restore();
    result
}

fn run_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    action_tx: &mpsc::UnboundedSender<AsyncAction>,
    result_rx: &mut mpsc::UnboundedReceiver<AsyncResult>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        // Poll for async results (non-blocking)
        while let Ok(result) = result_rx.try_recv() {
            app.handle_result(result);
        }

        // Completed workflows flag the lists they invalidated
        if app.refresh_dashboard {
            app.refresh_dashboard = false;
            app.dashboard.loading();
            let _ = action_tx.send(AsyncAction::LoadDashboard);
        }
        if app.refresh_startups {
            app.refresh_startups = false;
            app.startups.loading();
            let _ = action_tx.send(AsyncAction::LoadStartups);
        }
        if app.refresh_emails {
            app.refresh_emails = false;
            app.emails.loading();
            let _ = action_tx.send(AsyncAction::LoadEmails);
        }

        // Poll for keyboard events (50ms timeout for responsive UI)
        if ct_event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = ct_event::read()? {
                if let Some(action) = app.handle_key(key) {
                    let _ = action_tx.send(action);
                }
            }
        }

        app.tick_message();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Hold the splash until the session gate has resolved
    let splash_active = std::time::Instant::now() < app.splash_until;
    if !app.session_checked || splash_active {
        views::splash::render(frame, area, !app.session_checked);
        return;
    }

    match app.screen {
        Screen::Login | Screen::SignUp => views::login::render(frame, app, area),
        Screen::Dashboard => views::dashboard::render(frame, app, area),
        Screen::Startups => views::startups::render(frame, app, area),
        Screen::Send => views::send::render(frame, app, area),
        Screen::Emails => views::emails::render(frame, app, area),
        Screen::Upload => views::upload::render(frame, app, area),
    }

    if let Some((severity, message)) = &app.message {
        widgets::message_bar::render(frame, *severity, message);
    }
}

/// Async worker loop: processes actions against the collaborator clients.
async fn worker_loop(
    auth: AuthService,
    store: Arc<StoreClient>,
    blob: BlobClient,
    api: OutreachApi,
    mut action_rx: mpsc::UnboundedReceiver<AsyncAction>,
    result_tx: mpsc::UnboundedSender<AsyncResult>,
) {
    while let Some(action) = action_rx.recv().await {
        let result = match action {
            AsyncAction::CheckSession => {
                let session = auth.current_session().await;
                AsyncResult::SessionChecked(session.map(|s| s.user))
            }
            AsyncAction::SignIn { email, password } => {
                match auth.sign_in(&email, &password).await {
                    Ok(session) => AsyncResult::SignedIn(session.user),
                    Err(e) => AsyncResult::Error(e.to_string()),
                }
            }
            AsyncAction::SignUp { email, password } => {
                match auth.sign_up(&email, &password).await {
                    Ok(()) => AsyncResult::SignedUp,
                    Err(e) => AsyncResult::Error(e.to_string()),
                }
            }
            AsyncAction::SignOut => match auth.sign_out().await {
                Ok(()) => AsyncResult::SignedOut,
                Err(e) => AsyncResult::Error(e.to_string()),
            },
            AsyncAction::LoadDashboard => match load_dashboard(&store).await {
                Ok(stats) => AsyncResult::Dashboard(stats),
                Err(e) => AsyncResult::Error(e.to_string()),
            },
            AsyncAction::LoadStartups => match store.list_startups().await {
                Ok(startups) => AsyncResult::Startups(startups),
                Err(e) => AsyncResult::Error(e.to_string()),
            },
            AsyncAction::AddStartup { form } => match store.add_startup(&form).await {
                Ok(startup) => AsyncResult::StartupAdded(startup),
                Err(e) => AsyncResult::Error(e.to_string()),
            },
            AsyncAction::LoadEmails => match store.list_emails(None).await {
                Ok(rows) => {
                    AsyncResult::Emails(history::resolve_startups(store.as_ref(), rows).await)
                }
                Err(e) => AsyncResult::Error(e.to_string()),
            },
            AsyncAction::SendEmails { kind, ids } => {
                match do_send(&store, &api, kind, &ids, &result_tx).await {
                    Ok(outcome) => AsyncResult::SendFinished(outcome),
                    Err(e) => AsyncResult::Error(e.to_string()),
                }
            }
            AsyncAction::UploadCsv { path } => match do_upload(&blob, &api, &path).await {
                Ok(inserted) => AsyncResult::Uploaded { inserted },
                Err(e) => AsyncResult::Error(e.to_string()),
            },
        };
        if result_tx.send(result).is_err() {
            break; // UI closed
        }
    }
}

async fn load_dashboard(store: &StoreClient) -> ventra_core::Result<DashboardStats> {
    // The counts and the recent page are independent; completion order
    // does not matter, so issue them together
    let (startups, emails, viewed, recent_rows) = tokio::join!(
        store.count_startups(),
        store.count_emails(),
        store.count_viewed_emails(),
        store.list_emails(Some(5)),
    );
    let (startups, emails, viewed) = (startups?, emails?, viewed?);
    let recent = history::resolve_startups(store, recent_rows?).await;
    Ok(DashboardStats {
        startups,
        emails,
        viewed,
        recent,
    })
}

async fn do_send(
    store: &StoreClient,
    api: &OutreachApi,
    kind: EmailKind,
    ids: &[Uuid],
    result_tx: &mpsc::UnboundedSender<AsyncResult>,
) -> ventra_core::Result<send::SendOutcome> {
    let startups = store.list_startups().await?;
    let targets: Vec<&Startup> = ids
        .iter()
        .filter_map(|id| startups.iter().find(|s| s.id == *id))
        .collect();

    let progress_tx = result_tx.clone();
    let outcome = send::send_all(api, kind, &targets, |current, total| {
        let _ = progress_tx.send(AsyncResult::SendProgress { current, total });
    })
    .await;
    Ok(outcome)
}

async fn do_upload(blob: &BlobClient, api: &OutreachApi, path: &str) -> ventra_core::Result<u64> {
    let declared_type = ingest::declared_type_for(path);
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ventra_core::VentraError::InvalidInput(format!("failed to read {path}: {e}")))?;
    let now_millis = chrono::Utc::now().timestamp_millis();
    ingest::upload_and_process(blob, api, path, declared_type, bytes, now_millis).await
}
