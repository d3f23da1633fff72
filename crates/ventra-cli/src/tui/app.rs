use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use uuid::Uuid;
use ventra_core::model::*;
use ventra_core::resource::{Remote, Severity};
use ventra_core::send::{SelectionSet, SendOutcome, SendPhase};

use super::event::{AsyncAction, AsyncResult};
use super::widgets::text_field::TextInput;

/// Which screen is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    SignUp,
    Dashboard,
    Startups,
    Send,
    Emails,
    Upload,
}

impl Screen {
    /// Everything past the auth gate needs a signed-in user.
    pub fn requires_auth(self) -> bool {
        !matches!(self, Screen::Login | Screen::SignUp)
    }
}

/// Fields on the add-startup form, in Tab order.
const FORM_FIELDS: usize = 6;

/// Central application state.
pub struct App {
    pub screen: Screen,
    pub should_quit: bool,

    // -- Session gate --
    /// False until the saved session has been checked; the splash stays
    /// up and no redirect decisions are made before then.
    pub session_checked: bool,
    pub user: Option<UserIdentity>,

    // -- Auth forms (login + signup share the fields) --
    pub auth_email: TextInput,
    pub auth_password: TextInput,
    pub auth_field: usize, // 0=email, 1=password
    pub auth_busy: bool,

    // -- Dashboard --
    pub dashboard: Remote<DashboardStats>,

    // -- Startups list + add form --
    pub startups: Remote<Vec<Startup>>,
    pub startups_cursor: usize,
    pub form_open: bool,
    pub form: [TextInput; FORM_FIELDS], // name, email, website, linkedin, industry, tech stack
    pub form_field: usize,

    // -- Send --
    pub selection: SelectionSet,
    pub send_kind: EmailKind,
    pub send_phase: SendPhase,

    // -- Emails --
    pub emails: Remote<Vec<ResolvedEmail>>,
    pub emails_cursor: usize,

    // -- Upload --
    pub upload_path: TextInput,
    pub upload_busy: bool,

    // -- Refresh flags (picked up by the run loop) --
    pub refresh_dashboard: bool,
    pub refresh_startups: bool,
    pub refresh_emails: bool,

    // -- Notification toast --
    pub message: Option<(Severity, String)>,
    pub message_timer: u8, // ticks remaining

    // -- Splash --
    pub splash_until: std::time::Instant,
}

impl App {
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
            should_quit: false,

            session_checked: false,
            user: None,

            auth_email: TextInput::default(),
            auth_password: TextInput::default(),
            auth_field: 0,
            auth_busy: false,

            dashboard: Remote::Idle,

            startups: Remote::Idle,
            startups_cursor: 0,
            form_open: false,
            form: Default::default(),
            form_field: 0,

            selection: SelectionSet::default(),
            send_kind: EmailKind::Outreach,
            send_phase: SendPhase::Idle,

            emails: Remote::Idle,
            emails_cursor: 0,

            upload_path: TextInput::default(),
            upload_busy: false,

            refresh_dashboard: false,
            refresh_startups: false,
            refresh_emails: false,

            message: None,
            message_timer: 0,

            splash_until: std::time::Instant::now() + std::time::Duration::from_millis(800),
        }
    }

    /// Navigate with the gate's redirect rules: signed-out users land on
    /// Login, signed-in users never see Login/SignUp again.
    pub fn goto(&mut self, screen: Screen) {
        if !self.session_checked {
            return;
        }
        self.screen = if self.user.is_none() && screen.requires_auth() {
            Screen::Login
        } else if self.user.is_some() && !screen.requires_auth() {
            Screen::Dashboard
        } else {
            screen
        };
    }

    /// Process an async result from the worker.
    pub fn handle_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::SessionChecked(user) => {
                self.session_checked = true;
                let signed_in = user.is_some();
                self.user = user;
                if signed_in {
                    self.screen = Screen::Dashboard;
                    self.refresh_dashboard = true;
                    self.refresh_startups = true;
                } else {
                    self.screen = Screen::Login;
                }
            }
            AsyncResult::SignedIn(user) => {
                self.user = Some(user);
                self.auth_busy = false;
                self.auth_password.clear();
                self.screen = Screen::Dashboard;
                self.refresh_dashboard = true;
                self.refresh_startups = true;
            }
            AsyncResult::SignedUp => {
                self.auth_busy = false;
                self.auth_password.clear();
                self.screen = Screen::Login;
                self.toast(
                    Severity::Success,
                    "Account created. Check your email for a confirmation link.",
                );
            }
            AsyncResult::SignedOut => {
                self.user = None;
                self.dashboard = Remote::Idle;
                self.startups = Remote::Idle;
                self.emails = Remote::Idle;
                self.selection.clear();
                self.screen = Screen::Login;
            }
            AsyncResult::Dashboard(stats) => self.dashboard.ready(stats),
            AsyncResult::Startups(startups) => {
                if self.startups_cursor >= startups.len() {
                    self.startups_cursor = startups.len().saturating_sub(1);
                }
                self.startups.ready(startups);
            }
            AsyncResult::StartupAdded(startup) => {
                self.form_open = false;
                self.form = Default::default();
                self.form_field = 0;
                // Prepend the store-returned row rather than refetching
                if let Remote::Ready(list) = &mut self.startups {
                    list.insert(0, startup);
                } else {
                    self.refresh_startups = true;
                }
                self.refresh_dashboard = true;
                self.toast(Severity::Success, "Startup added successfully!");
            }
            AsyncResult::Emails(emails) => {
                if self.emails_cursor >= emails.len() {
                    self.emails_cursor = emails.len().saturating_sub(1);
                }
                self.emails.ready(emails);
            }
            AsyncResult::SendProgress { current, total } => {
                self.send_phase = SendPhase::Sending { current, total };
            }
            AsyncResult::SendFinished(outcome) => {
                self.send_phase = SendPhase::Finished;
                if matches!(outcome, SendOutcome::Completed { .. }) {
                    self.selection.clear();
                }
                let (severity, text) = outcome.message();
                self.toast(severity, &text);
                self.refresh_emails = true;
                self.refresh_dashboard = true;
            }
            AsyncResult::Uploaded { inserted } => {
                self.upload_busy = false;
                self.upload_path.clear();
                let (severity, text) = ventra_core::ingest::success_message(inserted);
                self.toast(severity, &text);
                self.refresh_startups = true;
                self.refresh_dashboard = true;
            }
            AsyncResult::Error(msg) => {
                self.auth_busy = false;
                self.upload_busy = false;
                if self.send_phase != SendPhase::Idle {
                    self.send_phase = SendPhase::Idle;
                }
                // A load that was in flight shows the failure in place
                if self.dashboard.is_loading() {
                    self.dashboard.fail(msg.clone());
                }
                if self.startups.is_loading() {
                    self.startups.fail(msg.clone());
                }
                if self.emails.is_loading() {
                    self.emails.fail(msg.clone());
                }
                self.toast(Severity::Error, &msg);
            }
        }
    }

    /// Handle a key event. Returns an optional async action to dispatch.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }
        if !self.session_checked {
            return None;
        }

        match self.screen {
            Screen::Login | Screen::SignUp => self.handle_auth(key),
            Screen::Dashboard => self.handle_dashboard(key),
            Screen::Startups if self.form_open => self.handle_form(key),
            Screen::Startups => self.handle_startups(key),
            Screen::Send => self.handle_send(key),
            Screen::Emails => self.handle_emails(key),
            Screen::Upload => self.handle_upload(key),
        }
    }

    fn handle_auth(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            // Toggle between login and signup
            self.screen = match self.screen {
                Screen::SignUp => Screen::Login,
                _ => Screen::SignUp,
            };
            return None;
        }
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.auth_field = 1 - self.auth_field;
                None
            }
            KeyCode::Enter => {
                if self.auth_busy
                    || self.auth_email.value().trim().is_empty()
                    || self.auth_password.value().is_empty()
                {
                    return None;
                }
                self.auth_busy = true;
                let email = self.auth_email.value().trim().to_string();
                let password = self.auth_password.value().to_string();
                if self.screen == Screen::SignUp {
                    Some(AsyncAction::SignUp { email, password })
                } else {
                    Some(AsyncAction::SignIn { email, password })
                }
            }
            _ => {
                let field = if self.auth_field == 0 {
                    &mut self.auth_email
                } else {
                    &mut self.auth_password
                };
                field.handle_key(key);
                None
            }
        }
    }

    fn handle_dashboard(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('r') => {
                self.dashboard.loading();
                Some(AsyncAction::LoadDashboard)
            }
            KeyCode::Char('o') => Some(AsyncAction::SignOut),
            _ => self.handle_nav(key),
        }
    }

    fn handle_startups(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                None
            }
            KeyCode::Char('n') => {
                self.form_open = true;
                self.form = Default::default();
                self.form_field = 0;
                None
            }
            KeyCode::Char('r') => {
                self.startups.loading();
                Some(AsyncAction::LoadStartups)
            }
            _ => self.handle_nav(key),
        }
    }

    fn handle_form(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            let form = self.form_values();
            // Validation happens in the worker; errors come back as a toast
            return Some(AsyncAction::AddStartup { form });
        }
        match key.code {
            KeyCode::Esc => {
                self.form_open = false;
                None
            }
            KeyCode::Tab | KeyCode::Down => {
                self.form_field = (self.form_field + 1) % FORM_FIELDS;
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form_field = if self.form_field == 0 {
                    FORM_FIELDS - 1
                } else {
                    self.form_field - 1
                };
                None
            }
            _ => {
                self.form[self.form_field].handle_key(key);
                None
            }
        }
    }

    fn handle_send(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        let sending = matches!(self.send_phase, SendPhase::Sending { .. });
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                None
            }
            KeyCode::Char(' ') if !sending => {
                if let Some(id) = self.startup_id_at_cursor() {
                    self.selection.toggle(id);
                }
                None
            }
            KeyCode::Char('a') if !sending => {
                let ids: Vec<Uuid> = self
                    .startups
                    .value()
                    .map(|s| s.iter().map(|x| x.id).collect())
                    .unwrap_or_default();
                self.selection.toggle_all(&ids);
                None
            }
            KeyCode::Char('f') if !sending => {
                self.send_kind = self.send_kind.toggled();
                None
            }
            KeyCode::Enter if !sending => {
                if self.selection.is_empty() {
                    return None;
                }
                let ids: Vec<Uuid> = self
                    .startups
                    .value()
                    .map(|startups| {
                        self.selection
                            .selected_from(startups)
                            .iter()
                            .map(|s| s.id)
                            .collect()
                    })
                    .unwrap_or_default();
                if ids.is_empty() {
                    return None;
                }
                self.send_phase = SendPhase::Sending {
                    current: 0,
                    total: ids.len(),
                };
                Some(AsyncAction::SendEmails {
                    kind: self.send_kind,
                    ids,
                })
            }
            KeyCode::Char('r') if !sending => {
                self.startups.loading();
                Some(AsyncAction::LoadStartups)
            }
            _ if sending => None,
            _ => self.handle_nav(key),
        }
    }

    fn handle_emails(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                None
            }
            KeyCode::Char('r') => {
                self.emails.loading();
                Some(AsyncAction::LoadEmails)
            }
            _ => self.handle_nav(key),
        }
    }

    fn handle_upload(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Enter => {
                if self.upload_busy || self.upload_path.value().trim().is_empty() {
                    return None;
                }
                self.upload_busy = true;
                Some(AsyncAction::UploadCsv {
                    path: self.upload_path.value().trim().to_string(),
                })
            }
            KeyCode::Esc => {
                self.goto(Screen::Dashboard);
                None
            }
            // Digits type into the path, so leaving this screen is Esc only
            _ => {
                self.upload_path.handle_key(key);
                None
            }
        }
    }

    /// Number keys hop between the signed-in screens.
    fn handle_nav(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        let (target, load) = match key.code {
            KeyCode::Char('1') => (Screen::Dashboard, self.dashboard_load()),
            KeyCode::Char('2') => (Screen::Startups, self.startups_load()),
            KeyCode::Char('3') => (Screen::Send, self.startups_load()),
            KeyCode::Char('4') => (Screen::Emails, self.emails_load()),
            KeyCode::Char('5') => (Screen::Upload, None),
            _ => return None,
        };
        self.goto(target);
        load
    }

    fn dashboard_load(&mut self) -> Option<AsyncAction> {
        if matches!(self.dashboard, Remote::Idle) {
            self.dashboard.loading();
            Some(AsyncAction::LoadDashboard)
        } else {
            None
        }
    }

    fn startups_load(&mut self) -> Option<AsyncAction> {
        if matches!(self.startups, Remote::Idle) {
            self.startups.loading();
            Some(AsyncAction::LoadStartups)
        } else {
            None
        }
    }

    fn emails_load(&mut self) -> Option<AsyncAction> {
        if matches!(self.emails, Remote::Idle) {
            self.emails.loading();
            Some(AsyncAction::LoadEmails)
        } else {
            None
        }
    }

    fn form_values(&self) -> NewStartup {
        NewStartup {
            name: self.form[0].value().trim().to_string(),
            email: self.form[1].value().trim().to_string(),
            website: self.form[2].value().trim().to_string(),
            linkedin: self.form[3].value().trim().to_string(),
            industry: self.form[4].value().trim().to_string(),
            tech_stack: self.form[5].value().trim().to_string(),
        }
    }

    fn startup_id_at_cursor(&self) -> Option<Uuid> {
        self.startups
            .value()
            .and_then(|s| s.get(self.startups_cursor))
            .map(|s| s.id)
    }

    fn move_cursor(&mut self, delta: i32) {
        let len = match self.screen {
            Screen::Emails => self.emails.value().map(Vec::len).unwrap_or(0),
            _ => self.startups.value().map(Vec::len).unwrap_or(0),
        };
        let cursor = match self.screen {
            Screen::Emails => &mut self.emails_cursor,
            _ => &mut self.startups_cursor,
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = (*cursor as i32 + delta).clamp(0, len as i32 - 1) as usize;
    }

    fn toast(&mut self, severity: Severity, text: &str) {
        self.message = Some((severity, text.to_string()));
        self.message_timer = 100; // ~5s at 50ms tick
    }

    /// Tick the toast timer down.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
    }
}
