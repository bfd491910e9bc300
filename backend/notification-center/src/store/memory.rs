/// In-memory notification store
///
/// Mirrors the Postgres store's contract over a map guarded by one RwLock.
/// Mutations take the write lock for their whole duration, so a batch
/// read-marking is observed either entirely or not at all. Used by the
/// test suite and for running the service without a database.
use crate::error::Result;
use crate::models::{NewNotification, Notification};
use crate::scope::ScopeFilter;
use crate::store::{DeleteOutcome, NotificationStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryNotificationStore {
    records: RwLock<HashMap<Uuid, Notification>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn query(&self, filter: &ScopeFilter) -> Result<Vec<Notification>> {
        let records = self.records.read().await;
        let mut matched: Vec<Notification> = records
            .values()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matched)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Notification>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn unread_ids(&self, filter: &ScopeFilter) -> Result<Vec<Uuid>> {
        let matched = self.query(filter).await?;
        Ok(matched
            .into_iter()
            .filter(|n| !n.is_read)
            .map(|n| n.id)
            .collect())
    }

    async fn count_unread(&self, filter: &ScopeFilter) -> Result<u64> {
        let ids = self.unread_ids(filter).await?;
        Ok(ids.len() as u64)
    }

    async fn mark_read(&self, ids: &[Uuid]) -> Result<u64> {
        let mut records = self.records.write().await;
        let mut updated = 0;
        for id in ids {
            if let Some(record) = records.get_mut(id) {
                if !record.is_read {
                    record.is_read = true;
                    updated += 1;
                }
            }
            // Missing ids were deleted since the snapshot; skip them
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<DeleteOutcome> {
        let mut records = self.records.write().await;
        match records.remove(&id) {
            Some(_) => Ok(DeleteOutcome::Deleted),
            None => Ok(DeleteOutcome::NotFound),
        }
    }

    async fn insert(&self, new: NewNotification) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: new.message,
            target: new.target,
            image_url: new.image_url,
            is_read: false,
            created_at: Utc::now(),
        };

        let mut records = self.records.write().await;
        records.insert(notification.id, notification.clone());
        Ok(notification)
    }
}
