//! Processing API client.
//!
//! A companion HTTP service does the actual work of composing/sending
//! outreach emails and of parsing uploaded CSVs into startup rows. This
//! client wraps its two endpoints and normalizes their error bodies.

use serde::Deserialize;

use crate::error::{Result, VentraError};
use crate::model::SendRequest;

/// Sends one outreach or follow-up email. The bulk workflow drives this
/// once per selected startup.
pub trait EmailSender {
    fn send_email(
        &self,
        request: &SendRequest,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Turns an uploaded CSV object into startup rows, returning how many
/// were inserted.
pub trait CsvProcessor {
    fn process_csv(&self, path: &str) -> impl std::future::Future<Output = Result<u64>> + Send;
}

pub struct OutreachApi {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct ProcessResponse {
    #[serde(default)]
    inserted: u64,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl OutreachApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(5))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// The API's `error` field when present, else the given fallback.
    fn failure_message(body: &str, fallback: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl EmailSender for OutreachApi {
    async fn send_email(&self, request: &SendRequest) -> Result<()> {
        let url = format!("{}/api/send-email", self.base_url);
        let resp = self.http.post(&url).json(request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VentraError::Api(Self::failure_message(&body, "Send failed")));
        }
        Ok(())
    }
}

impl CsvProcessor for OutreachApi {
    async fn process_csv(&self, path: &str) -> Result<u64> {
        let url = format!("{}/api/process-csv", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "path": path }))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(VentraError::Api(Self::failure_message(
                &body,
                "Processing failed",
            )));
        }
        let parsed: ProcessResponse = serde_json::from_str(&body)
            .map_err(|e| VentraError::Api(format!("unexpected processing response: {e}")))?;
        Ok(parsed.inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EmailKind, Startup};

    fn startup() -> Startup {
        serde_json::from_str(
            r#"{"id":"7f6c3a1e-6a29-4c80-b7a5-3f4dbb1c9a01","name":"Acme",
                "email":"founders@acme.io","industry":"fintech",
                "created_at":"2025-05-01T12:00:00Z"}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_email_ok() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/send-email")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "type": "outreach",
                "recipient_email": "founders@acme.io",
            })))
            .with_status(200)
            .with_body(r#"{"message":"sent"}"#)
            .create_async()
            .await;

        let api = OutreachApi::new(&server.url());
        let request = SendRequest::for_startup(EmailKind::Outreach, &startup());
        api.send_email(&request).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_email_error_field() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/send-email")
            .with_status(500)
            .with_body(r#"{"error":"SMTP relay rejected the message"}"#)
            .create_async()
            .await;

        let api = OutreachApi::new(&server.url());
        let request = SendRequest::for_startup(EmailKind::Followup, &startup());
        let err = api.send_email(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "SMTP relay rejected the message");
    }

    #[tokio::test]
    async fn test_send_email_fallback_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/send-email")
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let api = OutreachApi::new(&server.url());
        let request = SendRequest::for_startup(EmailKind::Outreach, &startup());
        let err = api.send_email(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "Send failed");
    }

    #[tokio::test]
    async fn test_process_csv_reports_inserted() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/process-csv")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({"path": "1714560000000_leads.csv"}),
            ))
            .with_status(200)
            .with_body(r#"{"inserted":42}"#)
            .create_async()
            .await;

        let api = OutreachApi::new(&server.url());
        assert_eq!(api.process_csv("1714560000000_leads.csv").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_process_csv_fallback_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/process-csv")
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let api = OutreachApi::new(&server.url());
        let err = api.process_csv("x.csv").await.unwrap_err();
        assert_eq!(err.to_string(), "Processing failed");
    }
}
