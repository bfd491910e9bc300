//! Notification store: durable keyed collection of notification records.
//!
//! The store answers scoped reads and applies mutations; it performs no
//! authorization of its own. Callers go through the notification center,
//! which computes the scope filter before dispatching here.

mod memory;
mod postgres;

pub use memory::MemoryNotificationStore;
pub use postgres::PgNotificationStore;

use crate::error::Result;
use crate::models::{NewNotification, Notification};
use crate::scope::ScopeFilter;
use async_trait::async_trait;
use uuid::Uuid;

/// Outcome of a delete; a missing id is a distinct result, not a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Fetch all notifications matching the filter, most recent first.
    /// Ties on the timestamp break by id ascending so ordering is
    /// deterministic.
    async fn query(&self, filter: &ScopeFilter) -> Result<Vec<Notification>>;

    /// Fetch a single notification by id, regardless of scope
    async fn get(&self, id: Uuid) -> Result<Option<Notification>>;

    /// Ids of currently unread notifications within the filter
    async fn unread_ids(&self, filter: &ScopeFilter) -> Result<Vec<Uuid>>;

    /// Number of unread notifications within the filter
    async fn count_unread(&self, filter: &ScopeFilter) -> Result<u64>;

    /// Mark the listed notifications read as a single atomic unit and return
    /// the number of records actually updated. Already-read or
    /// concurrently-deleted ids are skipped without failing the batch.
    async fn mark_read(&self, ids: &[Uuid]) -> Result<u64>;

    /// Delete one notification by id
    async fn delete(&self, id: Uuid) -> Result<DeleteOutcome>;

    /// Ingest a record from an upstream workflow. The scope is fixed here
    /// and never changes afterwards.
    async fn insert(&self, new: NewNotification) -> Result<Notification>;
}
