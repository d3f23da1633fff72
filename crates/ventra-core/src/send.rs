//! Bulk email sending.
//!
//! The operator picks a set of startups and an email kind; the workflow
//! walks the selection strictly in list order, one request at a time,
//! and stops at the first failure. There is no retry and no cancel.

use std::collections::HashSet;
use uuid::Uuid;

use crate::api::EmailSender;
use crate::model::{EmailKind, SendRequest, Startup};
use crate::resource::Severity;

/// Which startups are ticked. Identity only; the list itself stays in
/// whatever collection the caller loaded.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    ids: HashSet<Uuid>,
}

impl SelectionSet {
    pub fn toggle(&mut self, id: Uuid) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Select-all flips on cardinality: everything selected clears the
    /// set, anything less selects the whole list.
    pub fn toggle_all(&mut self, all: &[Uuid]) {
        if self.ids.len() == all.len() {
            self.ids.clear();
        } else {
            self.ids = all.iter().copied().collect();
        }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// The selected startups in the order the list shows them.
    pub fn selected_from<'a>(&self, startups: &'a [Startup]) -> Vec<&'a Startup> {
        startups.iter().filter(|s| self.ids.contains(&s.id)).collect()
    }
}

/// Where a bulk send currently is. `Sending.current` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPhase {
    Idle,
    Sending { current: usize, total: usize },
    Finished,
}

/// Terminal result of one bulk run. `sent` counts requests that
/// succeeded before the run ended either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Completed { sent: usize },
    Aborted { sent: usize, error: String },
}

impl SendOutcome {
    /// Operator-facing notification. An abort surfaces only the failing
    /// error, not how far the run got.
    pub fn message(&self) -> (Severity, String) {
        match self {
            SendOutcome::Completed { sent } => (
                Severity::Success,
                format!("Successfully sent {sent} emails."),
            ),
            SendOutcome::Aborted { error, .. } => (Severity::Error, error.clone()),
        }
    }
}

/// Sends one email per startup, in order, aborting on the first error.
/// `on_progress` fires before each request with (zero-based index, total).
pub async fn send_all<S, F>(
    sender: &S,
    kind: EmailKind,
    startups: &[&Startup],
    mut on_progress: F,
) -> SendOutcome
where
    S: EmailSender,
    F: FnMut(usize, usize),
{
    let total = startups.len();
    let mut sent = 0;
    for (index, startup) in startups.iter().enumerate() {
        on_progress(index, total);
        let request = SendRequest::for_startup(kind, startup);
        if let Err(err) = sender.send_email(&request).await {
            return SendOutcome::Aborted {
                sent,
                error: err.to_string(),
            };
        }
        sent += 1;
    }
    SendOutcome::Completed { sent }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, VentraError};
    use std::sync::Mutex;

    struct RecordingSender {
        sent: Mutex<Vec<String>>,
        fail_on: Option<usize>,
    }

    impl RecordingSender {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    impl EmailSender for RecordingSender {
        async fn send_email(&self, request: &SendRequest) -> Result<()> {
            let mut sent = self.sent.lock().unwrap();
            if self.fail_on == Some(sent.len()) {
                return Err(VentraError::Api("Send failed".to_string()));
            }
            sent.push(request.recipient_email.clone());
            Ok(())
        }
    }

    fn startups(n: usize) -> Vec<Startup> {
        (0..n)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "id": Uuid::new_v4(),
                    "name": format!("Startup {i}"),
                    "email": format!("founders{i}@example.io"),
                    "created_at": "2025-05-01T12:00:00Z",
                }))
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_toggle_all_cardinality() {
        let rows = startups(3);
        let ids: Vec<Uuid> = rows.iter().map(|s| s.id).collect();
        let mut selection = SelectionSet::default();

        selection.toggle_all(&ids);
        assert_eq!(selection.len(), 3);

        // One deselected: toggle-all selects everything again
        selection.toggle(ids[1]);
        selection.toggle_all(&ids);
        assert_eq!(selection.len(), 3);

        // Fully selected: toggle-all clears
        selection.toggle_all(&ids);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_selected_from_preserves_list_order() {
        let rows = startups(4);
        let mut selection = SelectionSet::default();
        selection.toggle(rows[3].id);
        selection.toggle(rows[0].id);

        let picked = selection.selected_from(&rows);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].id, rows[0].id);
        assert_eq!(picked[1].id, rows[3].id);
    }

    #[tokio::test]
    async fn test_send_all_sequential_order() {
        let rows = startups(3);
        let refs: Vec<&Startup> = rows.iter().collect();
        let sender = RecordingSender::new(None);
        let mut progress = Vec::new();

        let outcome = send_all(&sender, EmailKind::Outreach, &refs, |i, n| {
            progress.push((i, n));
        })
        .await;

        assert_eq!(outcome, SendOutcome::Completed { sent: 3 });
        assert_eq!(progress, vec![(0, 3), (1, 3), (2, 3)]);
        let sent = sender.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec!["founders0@example.io", "founders1@example.io", "founders2@example.io"]
        );
    }

    #[tokio::test]
    async fn test_send_all_aborts_on_first_failure() {
        let rows = startups(4);
        let refs: Vec<&Startup> = rows.iter().collect();
        let sender = RecordingSender::new(Some(1));

        let outcome = send_all(&sender, EmailKind::Followup, &refs, |_, _| {}).await;

        assert_eq!(
            outcome,
            SendOutcome::Aborted {
                sent: 1,
                error: "Send failed".to_string()
            }
        );
        // Nothing after the failure went out
        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_outcome_messages() {
        let (severity, text) = SendOutcome::Completed { sent: 5 }.message();
        assert_eq!(severity, Severity::Success);
        assert_eq!(text, "Successfully sent 5 emails.");

        let (severity, text) = SendOutcome::Aborted {
            sent: 2,
            error: "Send failed".to_string(),
        }
        .message();
        assert_eq!(severity, Severity::Error);
        // The partial count stays out of the operator-facing message
        assert_eq!(text, "Send failed");
    }
}
