use uuid::Uuid;
use ventra_core::model::*;
use ventra_core::send::SendOutcome;

/// Actions the UI sends to the async worker task.
#[derive(Debug)]
pub enum AsyncAction {
    /// Restore and validate the saved session (initial gate check).
    CheckSession,
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    SignOut,
    /// Load counters + recent activity for the dashboard.
    LoadDashboard,
    LoadStartups,
    AddStartup { form: NewStartup },
    /// Load emails and resolve their startup relations.
    LoadEmails,
    /// Send one email per ID, sequentially, aborting on first failure.
    SendEmails { kind: EmailKind, ids: Vec<Uuid> },
    UploadCsv { path: String },
}

/// Results the async worker sends back to the UI.
#[derive(Debug)]
pub enum AsyncResult {
    /// The saved session was checked; `None` means not signed in.
    SessionChecked(Option<UserIdentity>),
    SignedIn(UserIdentity),
    /// Account created; confirmation email pending.
    SignedUp,
    SignedOut,
    Dashboard(DashboardStats),
    Startups(Vec<Startup>),
    StartupAdded(Startup),
    Emails(Vec<ResolvedEmail>),
    /// Progress before each send; `current` is zero-based.
    SendProgress { current: usize, total: usize },
    SendFinished(SendOutcome),
    Uploaded { inserted: u64 },
    /// An error occurred during an async operation.
    Error(String),
}
