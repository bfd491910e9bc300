/// Notification center core engine
///
/// Orchestrates identity resolution, the scope policy and the notification
/// store behind the caller-facing contract: list, unread count,
/// mark-all-read and delete-one. Holds no mutable state of its own; every
/// operation recomputes the caller's session and scope from the token.
use crate::auth::IdentityResolver;
use crate::error::{AppError, Result};
use crate::models::Notification;
use crate::scope::{scope_filter, ScopeFilter};
use crate::store::{DeleteOutcome, NotificationStore};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub struct NotificationCenter {
    store: Arc<dyn NotificationStore>,
    resolver: IdentityResolver,
}

impl NotificationCenter {
    pub fn new(store: Arc<dyn NotificationStore>, resolver: IdentityResolver) -> Self {
        Self { store, resolver }
    }

    /// List the caller's notifications, most recent first. Unauthenticated
    /// callers get an empty list, not an error.
    pub async fn list(&self, token: Option<&str>) -> Result<Vec<Notification>> {
        let session = self.resolver.resolve(token).await;
        let filter = scope_filter(&session);
        if filter == ScopeFilter::Nothing {
            return Ok(Vec::new());
        }
        self.store.query(&filter).await
    }

    /// Number of unread notifications within the caller's scope
    pub async fn unread_count(&self, token: Option<&str>) -> Result<u64> {
        let session = self.resolver.resolve(token).await;
        let filter = scope_filter(&session);
        if filter == ScopeFilter::Nothing {
            return Ok(0);
        }
        self.store.count_unread(&filter).await
    }

    /// Mark every unread notification within the caller's scope as read and
    /// return the number of records updated.
    ///
    /// The id set is always recomputed here from the resolved session, never
    /// taken from caller input, so a member cannot touch another member's
    /// records. Ids deleted between the snapshot and the batch update are
    /// skipped by the store without failing the batch.
    pub async fn mark_all_read(&self, token: Option<&str>) -> Result<u64> {
        let session = self.resolver.resolve(token).await;
        let filter = scope_filter(&session);
        if filter == ScopeFilter::Nothing {
            return Ok(0);
        }

        let unread = self.store.unread_ids(&filter).await?;
        if unread.is_empty() {
            debug!("No unread notifications in scope");
            return Ok(0);
        }

        let updated = self.store.mark_read(&unread).await?;
        info!(
            caller_id = ?session.caller_id,
            updated,
            "Marked in-scope notifications read"
        );
        Ok(updated)
    }

    /// Delete one notification by id.
    ///
    /// A missing id is `NotFound` (also the result of losing a race with a
    /// concurrent delete). An id that exists outside the caller's scope is
    /// `Forbidden`; the response does not say what the record contains.
    /// Unauthenticated callers are refused before any store round-trip.
    pub async fn delete_notification(&self, token: Option<&str>, id: Uuid) -> Result<()> {
        let session = self.resolver.resolve(token).await;
        let filter = scope_filter(&session);
        if filter == ScopeFilter::Nothing {
            return Err(AppError::Forbidden);
        }

        let Some(existing) = self.store.get(id).await? else {
            return Err(AppError::NotFound);
        };
        if !filter.matches(&existing) {
            return Err(AppError::Forbidden);
        }

        match self.store.delete(id).await? {
            DeleteOutcome::Deleted => {
                info!(caller_id = ?session.caller_id, notification_id = %id, "Deleted notification");
                Ok(())
            }
            // Deleted by a concurrent caller after the scope check
            DeleteOutcome::NotFound => Err(AppError::NotFound),
        }
    }
}
