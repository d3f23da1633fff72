//! Email history resolution.
//!
//! Email rows may arrive with their startup relation embedded, with only
//! a `startup_id`, or with neither. This module turns every shape into a
//! `ResolvedEmail` with a concrete sender reference, falling back to
//! "Unknown" rather than failing the page.

use uuid::Uuid;

use crate::error::Result;
use crate::model::{EmailRecord, ResolvedEmail, StartupRef};

/// Seam for per-row startup lookups so resolution is testable without a
/// live store.
pub trait StartupLookup: Sync {
    fn startup_ref(&self, id: Uuid) -> impl std::future::Future<Output = Result<StartupRef>> + Send;
}

/// Resolves a page of email rows. Lookups for rows missing the embedded
/// relation run concurrently; a lookup failure degrades that one row to
/// the unknown placeholder and is logged, never propagated.
pub async fn resolve_startups<L: StartupLookup>(
    lookup: &L,
    emails: Vec<EmailRecord>,
) -> Vec<ResolvedEmail> {
    let futures = emails.into_iter().map(|email| async move {
        let startup = match (email.startup, email.startup_id) {
            (Some(embedded), _) => embedded,
            (None, Some(id)) => match lookup.startup_ref(id).await {
                Ok(found) => found,
                Err(err) => {
                    tracing::warn!("failed to resolve startup {id}: {err}");
                    StartupRef::unknown()
                }
            },
            (None, None) => StartupRef::unknown(),
        };
        ResolvedEmail {
            id: email.id,
            subject: email.subject,
            follow_up: email.follow_up,
            sent_at: email.sent_at,
            viewed: email.viewed,
            startup,
        }
    });
    futures::future::join_all(futures).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VentraError;
    use std::collections::HashMap;

    struct MapLookup {
        refs: HashMap<Uuid, StartupRef>,
    }

    impl StartupLookup for MapLookup {
        async fn startup_ref(&self, id: Uuid) -> Result<StartupRef> {
            self.refs
                .get(&id)
                .cloned()
                .ok_or_else(|| VentraError::Store(format!("startup {id} not found")))
        }
    }

    fn email(startup: Option<StartupRef>, startup_id: Option<Uuid>) -> EmailRecord {
        EmailRecord {
            id: Uuid::new_v4(),
            startup_id,
            subject: Some("Quick intro".to_string()),
            follow_up: false,
            sent_at: None,
            viewed: false,
            startup,
        }
    }

    #[tokio::test]
    async fn test_embedded_relation_skips_lookup() {
        let lookup = MapLookup {
            refs: HashMap::new(),
        };
        let embedded = StartupRef {
            name: "Acme".to_string(),
            email: "founders@acme.io".to_string(),
        };
        let resolved = resolve_startups(&lookup, vec![email(Some(embedded), None)]).await;
        assert_eq!(resolved[0].startup.name, "Acme");
    }

    #[tokio::test]
    async fn test_lookup_by_id() {
        let id = Uuid::new_v4();
        let mut refs = HashMap::new();
        refs.insert(
            id,
            StartupRef {
                name: "Beacon".to_string(),
                email: "hello@beacon.dev".to_string(),
            },
        );
        let lookup = MapLookup { refs };
        let resolved = resolve_startups(&lookup, vec![email(None, Some(id))]).await;
        assert_eq!(resolved[0].startup.email, "hello@beacon.dev");
    }

    #[tokio::test]
    async fn test_failed_lookup_degrades_to_unknown() {
        let lookup = MapLookup {
            refs: HashMap::new(),
        };
        let rows = vec![email(None, Some(Uuid::new_v4())), email(None, None)];
        let resolved = resolve_startups(&lookup, rows).await;
        // Both rows survive with the placeholder reference
        assert_eq!(resolved.len(), 2);
        for row in &resolved {
            assert_eq!(row.startup.name, "Unknown");
            assert_eq!(row.startup.email, "unknown@example.com");
        }
    }
}
