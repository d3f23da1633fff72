mod tui;

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use uuid::Uuid;
use ventra_core::auth::AuthService;
use ventra_core::blob::BlobClient;
use ventra_core::config::VentraConfig;
use ventra_core::history;
use ventra_core::ingest;
use ventra_core::model::*;
use ventra_core::resource::Severity;
use ventra_core::send::{self, SelectionSet};
use ventra_core::store::StoreClient;
use ventra_core::{api::OutreachApi, VentraError};

#[derive(Parser)]
#[command(name = "ventra", about = "Ventra: startup outreach CRM", version)]
enum Cli {
    /// Sign in with email and password
    Login {
        /// Account email
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account (a confirmation email is sent before sign-in works)
    Signup {
        /// Account email
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and clear the saved session
    Logout,
    /// Show the signed-in account
    Whoami {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the OAuth authorize URL for a provider (google, github)
    Authorize {
        /// Provider name
        provider: String,
    },
    /// Show counters and recent email activity
    Dashboard {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// List and add startups
    #[command(subcommand)]
    Startups(StartupsCmd),
    /// List sent emails, newest first
    Emails {
        /// Maximum number of emails to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Send outreach or follow-up emails to selected startups
    Send {
        /// Email kind: outreach or followup
        #[arg(long, default_value = "outreach")]
        kind: String,
        /// Send to every startup
        #[arg(long)]
        all: bool,
        /// Startup ID to send to (can be repeated)
        #[arg(long = "id")]
        ids: Vec<Uuid>,
    },
    /// Upload a CSV of startups and trigger processing
    Upload {
        /// Path to the CSV file
        path: String,
    },
    /// Launch the interactive TUI
    Tui,
}

#[derive(clap::Subcommand)]
enum StartupsCmd {
    /// List all startups, newest first
    List {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a single startup
    Add {
        /// Company name
        #[arg(long)]
        name: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Website URL (http:// or https://)
        #[arg(long)]
        website: Option<String>,
        /// LinkedIn URL (http:// or https://)
        #[arg(long)]
        linkedin: Option<String>,
        /// Industry
        #[arg(long)]
        industry: Option<String>,
        /// Tech stack
        #[arg(long)]
        tech_stack: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut config = VentraConfig::load(Some(&std::env::current_dir()?))
        .unwrap_or_else(|_| VentraConfig::default());
    for warning in config.validate() {
        tracing::warn!("{warning}");
    }

    run(cli, &config).await
}

async fn run(cli: Cli, config: &VentraConfig) -> Result<()> {
    match cli {
        Cli::Login { email, password } => {
            let auth = AuthService::new(&config.supabase);
            cmd_login(&auth, &email, password).await
        }
        Cli::Signup { email, password } => {
            let auth = AuthService::new(&config.supabase);
            cmd_signup(&auth, &email, password).await
        }
        Cli::Logout => {
            let auth = AuthService::new(&config.supabase);
            cmd_logout(&auth).await
        }
        Cli::Whoami { json } => {
            let auth = AuthService::new(&config.supabase);
            cmd_whoami(&auth, json).await
        }
        Cli::Authorize { provider } => {
            let auth = AuthService::new(&config.supabase);
            println!("{}", auth.authorize_url(&provider));
            Ok(())
        }
        Cli::Dashboard { json } => {
            let store = make_store(config).await?;
            cmd_dashboard(&store, json).await
        }
        Cli::Startups(StartupsCmd::List { json }) => {
            let store = make_store(config).await?;
            cmd_startups_list(&store, json).await
        }
        Cli::Startups(StartupsCmd::Add {
            name,
            email,
            website,
            linkedin,
            industry,
            tech_stack,
        }) => {
            let store = make_store(config).await?;
            let form = NewStartup {
                name,
                email,
                website: website.unwrap_or_default(),
                linkedin: linkedin.unwrap_or_default(),
                industry: industry.unwrap_or_default(),
                tech_stack: tech_stack.unwrap_or_default(),
            };
            cmd_startups_add(&store, &form).await
        }
        Cli::Emails { limit, json } => {
            let store = make_store(config).await?;
            cmd_emails(&store, limit, json).await
        }
        Cli::Send { kind, all, ids } => {
            let store = make_store(config).await?;
            let api = OutreachApi::new(&config.api.base_url);
            cmd_send(&store, &api, &kind, all, &ids).await
        }
        Cli::Upload { path } => {
            let blob = BlobClient::new(
                &config.supabase.url,
                &config.supabase.anon_key,
                &config.supabase.bucket,
            );
            let api = OutreachApi::new(&config.api.base_url);
            cmd_upload(&blob, &api, &path).await
        }
        Cli::Tui => tui::run_tui(config).await,
    }
}

/// Store client carrying the saved session's token, if one is valid.
/// Read-only commands still work anonymously when RLS allows it.
async fn make_store(config: &VentraConfig) -> Result<StoreClient> {
    let auth = AuthService::new(&config.supabase);
    let session = auth.current_session().await;
    let store = StoreClient::new(&config.supabase.url, &config.supabase.anon_key);
    store.set_access_token(session.map(|s| s.access_token));
    Ok(store)
}

fn read_password(provided: Option<String>) -> Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn cmd_login(auth: &AuthService, email: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password)?;
    let session = auth.sign_in(email, &password).await?;
    let who = session.user.email.as_deref().unwrap_or(email);
    println!("{} Signed in as {}", "✓".green(), who.cyan());
    Ok(())
}

async fn cmd_signup(auth: &AuthService, email: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password)?;
    auth.sign_up(email, &password).await?;
    println!(
        "{} Account created. Check {} for a confirmation link, then run {}.",
        "✓".green(),
        email.cyan(),
        "ventra login".cyan()
    );
    Ok(())
}

async fn cmd_logout(auth: &AuthService) -> Result<()> {
    auth.sign_out().await?;
    println!("{} Signed out.", "✓".green());
    Ok(())
}

async fn cmd_whoami(auth: &AuthService, json: bool) -> Result<()> {
    let Some(session) = auth.current_session().await else {
        bail!("Not signed in. Run `ventra login` first.");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&session.user)?);
        return Ok(());
    }
    println!(
        "  {}  {}",
        format!("{:<8}", "User").dimmed(),
        session.user.email.as_deref().unwrap_or("(no email)")
    );
    println!("  {}  {}", format!("{:<8}", "ID").dimmed(), session.user.id);
    Ok(())
}

async fn cmd_dashboard(store: &StoreClient, json: bool) -> Result<()> {
    let (startups, emails, viewed, recent_rows) = tokio::join!(
        store.count_startups(),
        store.count_emails(),
        store.count_viewed_emails(),
        store.list_emails(Some(5)),
    );
    let (startups, emails, viewed) = (startups?, emails?, viewed?);
    let recent = history::resolve_startups(store, recent_rows?).await;

    let stats = DashboardStats {
        startups,
        emails,
        viewed,
        recent,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "  {}  {}   {}  {}   {}  {}",
        "Startups".dimmed(),
        stats.startups.to_string().cyan(),
        "Emails".dimmed(),
        stats.emails.to_string().cyan(),
        "Viewed".dimmed(),
        stats.viewed.to_string().cyan(),
    );

    if stats.recent.is_empty() {
        println!("\n  No emails sent yet.");
        return Ok(());
    }

    println!("\n  {}", "Recent activity".dimmed());
    println!("{}", "─".repeat(78).dimmed());
    for email in &stats.recent {
        print_email_row(email);
    }
    Ok(())
}

async fn cmd_startups_list(store: &StoreClient, json: bool) -> Result<()> {
    let startups = store.list_startups().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&startups)?);
        return Ok(());
    }

    if startups.is_empty() {
        println!("No startups yet. Add one with `ventra startups add` or `ventra upload`.");
        return Ok(());
    }

    println!(
        "  {}  {}  {}  {}",
        format!("{:<8}", "ID").dimmed(),
        format!("{:<24}", "Name").dimmed(),
        format!("{:<30}", "Email").dimmed(),
        "Added".dimmed(),
    );
    println!("{}", "─".repeat(78).dimmed());
    for startup in &startups {
        let short_id = &startup.id.to_string()[..8];
        println!(
            "  {}  {:<24}  {:<30}  {}",
            short_id.cyan(),
            truncate(&startup.name, 24),
            truncate(&startup.email, 30),
            startup.created_at.format("%Y-%m-%d"),
        );
    }
    println!("{}", "─".repeat(78).dimmed());
    println!(
        "  {} startup{}",
        startups.len(),
        if startups.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

async fn cmd_startups_add(store: &StoreClient, form: &NewStartup) -> Result<()> {
    let startup = store.add_startup(form).await?;
    println!("{} Startup added successfully!", "✓".green());
    println!(
        "  {} {} <{}>",
        (&startup.id.to_string()[..8]).cyan(),
        startup.name,
        startup.email
    );
    Ok(())
}

async fn cmd_emails(store: &StoreClient, limit: Option<usize>, json: bool) -> Result<()> {
    let rows = store.list_emails(limit).await?;
    let emails = history::resolve_startups(store, rows).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&emails)?);
        return Ok(());
    }

    if emails.is_empty() {
        println!("No emails sent yet.");
        return Ok(());
    }

    println!(
        "  {}  {}  {}  {}",
        format!("{:<10}", "Sent").dimmed(),
        format!("{:<24}", "To").dimmed(),
        format!("{:<30}", "Subject").dimmed(),
        "Status".dimmed(),
    );
    println!("{}", "─".repeat(78).dimmed());
    for email in &emails {
        print_email_row(email);
    }
    println!("{}", "─".repeat(78).dimmed());
    println!(
        "  {} email{}",
        emails.len(),
        if emails.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

fn print_email_row(email: &ResolvedEmail) {
    let sent = email
        .sent_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "—".to_string());
    let subject = email.subject.as_deref().unwrap_or("(no subject)");
    let mut status = if email.viewed { "viewed" } else { "sent" }.to_string();
    if email.follow_up {
        status.push_str(" · follow-up");
    }
    println!(
        "  {:<10}  {:<24}  {:<30}  {}",
        sent,
        truncate(&email.startup.name, 24).magenta(),
        truncate(subject, 30),
        status.dimmed(),
    );
}

async fn cmd_send(
    store: &StoreClient,
    api: &OutreachApi,
    kind: &str,
    all: bool,
    ids: &[Uuid],
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let startups = store.list_startups().await?;
    if startups.is_empty() {
        bail!("No startups to send to.");
    }

    let mut selection = SelectionSet::default();
    if all {
        let every: Vec<Uuid> = startups.iter().map(|s| s.id).collect();
        selection.toggle_all(&every);
    } else {
        for id in ids {
            if !startups.iter().any(|s| s.id == *id) {
                bail!("Unknown startup ID: {id}");
            }
            selection.toggle(*id);
        }
    }
    if selection.is_empty() {
        bail!("Nothing selected. Pass --all or at least one --id.");
    }

    let targets = selection.selected_from(&startups);
    let outcome = send::send_all(api, kind, &targets, |index, total| {
        println!(
            "  {} {}/{} {}",
            "→".dimmed(),
            index + 1,
            total,
            targets[index].name
        );
    })
    .await;

    let (severity, message) = outcome.message();
    match severity {
        Severity::Success => {
            println!("{} {}", "✓".green(), message);
            Ok(())
        }
        Severity::Error => bail!(message),
    }
}

fn parse_kind(kind: &str) -> Result<EmailKind> {
    match kind {
        "outreach" => Ok(EmailKind::Outreach),
        "followup" => Ok(EmailKind::Followup),
        other => bail!("unknown email kind: {other} (expected outreach or followup)"),
    }
}

async fn cmd_upload(blob: &BlobClient, api: &OutreachApi, path: &str) -> Result<()> {
    let declared_type = ingest::declared_type_for(path);
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {path}"))?;
    let now_millis = chrono::Utc::now().timestamp_millis();

    println!("{}", "Uploading...".cyan());
    let inserted = match ingest::upload_and_process(blob, api, path, declared_type, bytes, now_millis)
        .await
    {
        Ok(inserted) => inserted,
        Err(VentraError::InvalidInput(message)) => bail!(message),
        Err(err) => bail!(err.to_string()),
    };

    let (_, message) = ingest::success_message(inserted);
    println!("{} {}", "✓".green(), message);
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("outreach").unwrap(), EmailKind::Outreach);
        assert_eq!(parse_kind("followup").unwrap(), EmailKind::Followup);
        assert!(parse_kind("newsletter").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-10", 10), "exactly-10");
        let cut = truncate("definitely too long for this", 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with('…'));
    }
}
