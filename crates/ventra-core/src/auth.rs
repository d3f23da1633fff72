//! Identity provider client and session lifecycle.
//!
//! The provider (Supabase GoTrue) owns authentication end to end; this
//! module signs in/up/out over its REST surface, persists the issued
//! session to disk, and broadcasts every session replacement through a
//! single notification channel. Consumers subscribe for the lifetime of
//! their scope; dropping the receiver is the unsubscribe.

use chrono::{Duration, Utc};
use serde::Deserialize;
use std::path::PathBuf;
use tokio::sync::watch;

use crate::config::{self, SupabaseConfig};
use crate::error::{Result, VentraError};
use crate::model::{AuthEvent, Session, UserIdentity};

/// REST client for the GoTrue endpoints under `{base_url}/auth/v1`.
pub struct AuthClient {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: UserIdentity,
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
            user: token.user,
        }
    }
}

impl AuthClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(5))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let token: TokenResponse = self
            .post_json(&url, &serde_json::json!({ "email": email, "password": password }))
            .await?;
        Ok(token.into())
    }

    /// Registers a new user. The provider sends a confirmation email; no
    /// session is established until the address is confirmed.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<()> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let _: serde_json::Value = self
            .post_json(&url, &serde_json::json!({ "email": email, "password": password }))
            .await?;
        Ok(())
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(VentraError::Auth(extract_message(&body, status.as_u16())));
        }
        Ok(())
    }

    /// Validates a token by fetching the user it belongs to.
    pub async fn get_user(&self, access_token: &str) -> Result<UserIdentity> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(VentraError::Auth(extract_message(&body, status.as_u16())));
        }
        serde_json::from_str(&body)
            .map_err(|e| VentraError::Auth(format!("unexpected user response: {e}")))
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/token?grant_type=refresh_token", self.base_url);
        let token: TokenResponse = self
            .post_json(&url, &serde_json::json!({ "refresh_token": refresh_token }))
            .await?;
        Ok(token.into())
    }

    /// The provider authorize URL for a redirect-based OAuth sign-in. The
    /// flow itself completes out-of-band; the session hub is the
    /// completion path.
    pub fn authorize_url(&self, provider: &str, redirect_to: Option<&str>) -> String {
        let mut url = format!("{}/auth/v1/authorize?provider={provider}", self.base_url);
        if let Some(redirect) = redirect_to {
            url.push_str("&redirect_to=");
            url.push_str(redirect);
        }
        url
    }

    async fn post_json<R: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<R> {
        let resp = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(VentraError::Auth(extract_message(&text, status.as_u16())));
        }
        serde_json::from_str(&text)
            .map_err(|e| VentraError::Auth(format!("unexpected auth response: {e}")))
    }
}

/// GoTrue error bodies vary by endpoint; surface whichever message field
/// is present, verbatim.
fn extract_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    format!("auth request failed with status {status}")
}

// ---------------------------------------------------------------------------
// Persisted session file
// ---------------------------------------------------------------------------

/// Session persisted at `~/.config/ventra/session.toml` so a sign-in
/// survives process restarts.
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            path: config::session_file_path(),
        }
    }

    /// Store rooted at an explicit path (tests).
    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Returns `None` if the file is missing or unparseable.
    pub fn load(&self) -> Option<Session> {
        let path = self.path.as_ref()?;
        let contents = std::fs::read_to_string(path).ok()?;
        toml::from_str(&contents).ok()
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| VentraError::Config("cannot determine config directory".to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| VentraError::Config(format!("failed to create config dir: {e}")))?;
        }
        let text = toml::to_string_pretty(session)
            .map_err(|e| VentraError::Config(format!("failed to serialize session: {e}")))?;
        std::fs::write(path, text)
            .map_err(|e| VentraError::Config(format!("failed to write session file: {e}")))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if path.exists() {
                std::fs::remove_file(path)
                    .map_err(|e| VentraError::Config(format!("failed to remove session file: {e}")))?;
            }
        }
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Session hub
// ---------------------------------------------------------------------------

/// Single notification channel for session changes. Every sign-in,
/// sign-out, and token refresh replaces the held value here.
pub struct SessionHub {
    tx: watch::Sender<(AuthEvent, Option<Session>)>,
}

impl SessionHub {
    pub fn new() -> Self {
        let (tx, _) = watch::channel((AuthEvent::InitialSession, None));
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<(AuthEvent, Option<Session>)> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: AuthEvent, session: Option<Session>) {
        // send_replace rather than send: publishing must not fail just
        // because no view is currently subscribed.
        self.tx.send_replace((event, session));
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Auth service
// ---------------------------------------------------------------------------

/// Client + persisted file + hub, the surface the rest of the app uses.
pub struct AuthService {
    client: AuthClient,
    store: SessionStore,
    hub: SessionHub,
    oauth_redirect: Option<String>,
}

impl AuthService {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            client: AuthClient::new(&config.url, &config.anon_key),
            store: SessionStore::new(),
            hub: SessionHub::new(),
            oauth_redirect: config.oauth_redirect.clone(),
        }
    }

    pub fn with_store(mut self, store: SessionStore) -> Self {
        self.store = store;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<(AuthEvent, Option<Session>)> {
        self.hub.subscribe()
    }

    /// The initial session query behind the gate. Any failure is logged
    /// and treated as "no session"; there is no retry.
    pub async fn current_session(&self) -> Option<Session> {
        let session = match self.load_and_validate().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("session check failed, treating as signed out: {e}");
                None
            }
        };
        self.hub.publish(AuthEvent::InitialSession, session.clone());
        session
    }

    async fn load_and_validate(&self) -> Result<Option<Session>> {
        let Some(session) = self.store.load() else {
            return Ok(None);
        };
        if session.is_expired(Utc::now()) {
            let refreshed = self.client.refresh(&session.refresh_token).await?;
            self.store.save(&refreshed)?;
            return Ok(Some(refreshed));
        }
        self.client.get_user(&session.access_token).await?;
        Ok(Some(session))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let session = self.client.sign_in_with_password(email, password).await?;
        self.store.save(&session)?;
        self.hub.publish(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<()> {
        self.client.sign_up(email, password).await
    }

    pub async fn sign_out(&self) -> Result<()> {
        if let Some(session) = self.store.load() {
            // Best effort: a failed remote revoke still signs out locally.
            if let Err(e) = self.client.sign_out(&session.access_token).await {
                tracing::warn!("remote sign-out failed: {e}");
            }
        }
        self.store.clear()?;
        self.hub.publish(AuthEvent::SignedOut, None);
        Ok(())
    }

    pub async fn refresh(&self) -> Result<Session> {
        let session = self
            .store
            .load()
            .ok_or_else(|| VentraError::Auth("no session to refresh".to_string()))?;
        let refreshed = self.client.refresh(&session.refresh_token).await?;
        self.store.save(&refreshed)?;
        self.hub
            .publish(AuthEvent::TokenRefreshed, Some(refreshed.clone()));
        Ok(refreshed)
    }

    pub fn authorize_url(&self, provider: &str) -> String {
        self.client
            .authorize_url(provider, self.oauth_redirect.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session() -> Session {
        Session {
            access_token: "at".into(),
            refresh_token: "rt".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user: UserIdentity {
                id: "user-1".into(),
                email: Some("ops@23ventures.example".into()),
            },
        }
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/v1/token")
            .match_query(mockito::Matcher::UrlEncoded(
                "grant_type".into(),
                "password".into(),
            ))
            .match_header("apikey", "anon")
            .with_status(200)
            .with_body(
                r#"{"access_token":"tok","refresh_token":"ref","expires_in":3600,
                    "user":{"id":"user-1","email":"ops@23ventures.example"}}"#,
            )
            .create_async()
            .await;

        let client = AuthClient::new(&server.url(), "anon");
        let session = client
            .sign_in_with_password("ops@23ventures.example", "hunter2")
            .await
            .unwrap();
        assert_eq!(session.access_token, "tok");
        assert_eq!(session.user.id, "user-1");
        assert!(!session.is_expired(Utc::now()));
    }

    #[tokio::test]
    async fn test_sign_in_error_surfaces_provider_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/v1/token")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error_description":"Invalid login credentials"}"#)
            .create_async()
            .await;

        let client = AuthClient::new(&server.url(), "anon");
        let err = client
            .sign_in_with_password("ops@23ventures.example", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_get_user_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/user")
            .with_status(401)
            .with_body(r#"{"msg":"invalid JWT"}"#)
            .create_async()
            .await;

        let client = AuthClient::new(&server.url(), "anon");
        let err = client.get_user("stale").await.unwrap_err();
        assert_eq!(err.to_string(), "invalid JWT");
    }

    #[test]
    fn test_authorize_url() {
        let client = AuthClient::new("https://abc.supabase.co", "anon");
        assert_eq!(
            client.authorize_url("github", Some("https://app.example/dashboard")),
            "https://abc.supabase.co/auth/v1/authorize?provider=github&redirect_to=https://app.example/dashboard"
        );
        assert_eq!(
            client.authorize_url("github", None),
            "https://abc.supabase.co/auth/v1/authorize?provider=github"
        );
    }

    #[test]
    fn test_session_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.toml"));
        assert!(store.load().is_none());

        let s = session();
        store.save(&s).unwrap();
        assert_eq!(store.load().unwrap(), s);

        store.clear().unwrap();
        assert!(store.load().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_session_store_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "not valid toml [").unwrap();
        assert!(SessionStore::at(path).load().is_none());
    }

    #[tokio::test]
    async fn test_hub_publishes_to_subscribers() {
        let hub = SessionHub::new();
        let mut rx = hub.subscribe();
        assert_eq!(rx.borrow().0, AuthEvent::InitialSession);

        hub.publish(AuthEvent::SignedIn, Some(session()));
        rx.changed().await.unwrap();
        let (event, current) = rx.borrow_and_update().clone();
        assert_eq!(event, AuthEvent::SignedIn);
        assert!(current.is_some());

        hub.publish(AuthEvent::SignedOut, None);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().0, AuthEvent::SignedOut);
        assert!(rx.borrow().1.is_none());
    }

    #[test]
    fn test_extract_message_fallback() {
        assert_eq!(
            extract_message("not json", 500),
            "auth request failed with status 500"
        );
        assert_eq!(extract_message(r#"{"msg":"nope"}"#, 400), "nope");
    }
}
