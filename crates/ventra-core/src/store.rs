//! Relational store client (Supabase PostgREST).
//!
//! The store owns every Startup and Email row; this client only reads
//! collections, inserts single rows, and asks for counts. Queries carry
//! the anon key plus the signed-in user's token when one is present.

use serde::de::DeserializeOwned;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, VentraError};
use crate::history::StartupLookup;
use crate::model::{EmailRecord, NewStartup, Startup, StartupRef};

const STARTUP_COLUMNS: &str = "id,name,email,website,linkedin,industry,tech_stack,created_at";

pub struct StoreClient {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
    access_token: RwLock<Option<String>>,
}

impl StoreClient {
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        Self {
            base_url: format!("{}/rest/v1", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(5))
                .build()
                .expect("failed to build HTTP client"),
            access_token: RwLock::new(None),
        }
    }

    /// Swap the bearer token when the session changes. Unset falls back
    /// to the anon key.
    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().expect("token lock poisoned") = token;
    }

    fn bearer(&self) -> String {
        self.access_token
            .read()
            .expect("token lock poisoned")
            .clone()
            .unwrap_or_else(|| self.anon_key.clone())
    }

    /// All startups, newest first. No pagination.
    pub async fn list_startups(&self) -> Result<Vec<Startup>> {
        let url = format!(
            "{}/startups?select={STARTUP_COLUMNS}&order=created_at.desc",
            self.base_url
        );
        self.get_rows(&url).await
    }

    /// Validates, applies the placeholder URL defaults, and inserts. The
    /// returned row is the store's, authoritative for `id`/`created_at`.
    pub async fn add_startup(&self, form: &NewStartup) -> Result<Startup> {
        form.validate()?;
        let row = form.normalized();

        let url = format!("{}/startups?select={STARTUP_COLUMNS}", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(VentraError::Store(extract_message(&body, status.as_u16())));
        }
        let mut rows: Vec<Startup> = serde_json::from_str(&body)
            .map_err(|e| VentraError::Store(format!("unexpected insert response: {e}")))?;
        rows.pop()
            .ok_or_else(|| VentraError::Store("insert returned no row".to_string()))
    }

    /// All emails, most recently sent first.
    pub async fn list_emails(&self, limit: Option<usize>) -> Result<Vec<EmailRecord>> {
        let mut url = format!("{}/emails?select=*&order=sent_at.desc", self.base_url);
        if let Some(limit) = limit {
            url.push_str(&format!("&limit={limit}"));
        }
        self.get_rows(&url).await
    }

    pub async fn count_startups(&self) -> Result<u64> {
        self.count("startups", None).await
    }

    pub async fn count_emails(&self) -> Result<u64> {
        self.count("emails", None).await
    }

    pub async fn count_viewed_emails(&self) -> Result<u64> {
        self.count("emails", Some(("viewed", "true"))).await
    }

    /// Exact row count via a HEAD request, optionally with one equality
    /// filter.
    async fn count(&self, table: &str, filter: Option<(&str, &str)>) -> Result<u64> {
        let mut url = format!("{}/{table}?select=*", self.base_url);
        if let Some((column, value)) = filter {
            url.push_str(&format!("&{column}=eq.{value}"));
        }
        let resp = self
            .http
            .head(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(VentraError::Store(format!(
                "count of {table} failed with status {status}"
            )));
        }
        resp.headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| VentraError::Store(format!("store returned no count for {table}")))
    }

    async fn get_rows<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        let resp = self
            .http
            .get(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(VentraError::Store(extract_message(&body, status.as_u16())));
        }
        serde_json::from_str(&body)
            .map_err(|e| VentraError::Store(format!("unexpected store response: {e}")))
    }
}

impl StartupLookup for StoreClient {
    async fn startup_ref(&self, id: Uuid) -> Result<StartupRef> {
        let url = format!(
            "{}/startups?select=name,email&id=eq.{id}&limit=1",
            self.base_url
        );
        let mut rows: Vec<StartupRef> = self.get_rows(&url).await?;
        rows.pop()
            .ok_or_else(|| VentraError::Store(format!("startup {id} not found")))
    }
}

/// PostgREST error bodies carry a `message` field; surface it verbatim.
fn extract_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|v| v.as_str()) {
            return message.to_string();
        }
    }
    format!("store request failed with status {status}")
}

/// `content-range: 0-24/3573` or `*/0` — the count follows the slash.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.parse().ok()
}
