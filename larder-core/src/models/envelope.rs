//! The record envelope every syncable entity lives in.
//!
//! A [`Record`] pairs the entity's own fields with a [`SyncMeta`] that carries
//! identity, ownership, soft-delete and sync bookkeeping. The only ways to
//! produce a changed record are [`Record::new`], [`Record::updated`] and
//! [`Record::deleted`], and all three stamp the record as pending.

use chrono::{DateTime, SubsecRound, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{SyncStatus, Table};
use crate::wire::FieldMap;

/// Current time at the precision the store persists (microseconds).
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A field that holds the local id of a parent record in another table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    /// Local field name holding the parent id.
    pub field: &'static str,
    /// Table the parent lives in.
    pub table: Table,
}

/// Implemented by every entity that can live inside a [`Record`].
pub trait Entity:
    Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const TABLE: Table;
    /// Local field name to wire field name table.
    const FIELDS: FieldMap;
    /// Parent references; translated between local and remote ids on the wire.
    const REFS: &'static [FieldRef] = &[];

    /// Copies local-only fields from the version being replaced by a
    /// remote one. Fields absent from [`Entity::FIELDS`] never arrive over
    /// the wire, so without this they would reset to their defaults.
    fn retain_local_fields(&mut self, _previous: &Self) {}
}

/// Sync bookkeeping shared by all entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncMeta {
    pub id: Uuid,
    pub remote_id: Option<String>,
    pub user_id: Option<String>,
    pub sync_status: SyncStatus,
    pub last_sync: DateTime<Utc>,
    pub is_local: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    /// Competing remote version, or the remote's rejection, while in conflict.
    pub conflict_data: Option<serde_json::Value>,
}

impl SyncMeta {
    pub fn new_local(owner: Option<String>) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            remote_id: None,
            user_id: owner,
            sync_status: SyncStatus::Pending,
            last_sync: now,
            is_local: true,
            is_deleted: false,
            created_at: now,
            conflict_data: None,
        }
    }

    /// Meta for a record that arrived from the remote and was never edited here.
    pub fn from_remote(remote_id: Option<String>, owner: Option<String>) -> Self {
        Self {
            remote_id,
            sync_status: SyncStatus::Synced,
            is_local: false,
            ..Self::new_local(owner)
        }
    }

    pub fn stamp_pending(&mut self) {
        self.sync_status = SyncStatus::Pending;
        self.is_local = true;
        self.last_sync = timestamp_now();
    }

    pub fn mark_synced(&mut self, remote_id: Option<String>) {
        if remote_id.is_some() {
            self.remote_id = remote_id;
        }
        self.sync_status = SyncStatus::Synced;
        self.is_local = false;
        self.last_sync = timestamp_now();
        self.conflict_data = None;
    }

    pub fn mark_conflict(&mut self, data: serde_json::Value) {
        self.sync_status = SyncStatus::Conflict;
        self.conflict_data = Some(data);
    }

    pub fn is_pending(&self) -> bool {
        self.sync_status == SyncStatus::Pending
    }

    pub fn is_conflict(&self) -> bool {
        self.sync_status == SyncStatus::Conflict
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub meta: SyncMeta,
    pub data: T,
}

impl<T: Entity> Record<T> {
    /// Allocates a record, runs the initializer, then stamps ownership and
    /// pending state. The initializer cannot override the stamp.
    pub fn new(owner: Option<String>, initializer: impl FnOnce(&mut T)) -> Self {
        let mut data = T::default();
        initializer(&mut data);
        let mut meta = SyncMeta::new_local(None);
        meta.user_id = owner;
        meta.stamp_pending();
        Self { meta, data }
    }

    /// A copy with the mutator applied and the sync fields re-stamped, even
    /// when the mutator changes nothing.
    pub fn updated(&self, mutator: impl FnOnce(&mut T)) -> Self {
        let mut next = self.clone();
        mutator(&mut next.data);
        next.meta.stamp_pending();
        next
    }

    /// Soft-delete through the update path. Never touches child records.
    pub fn deleted(&self) -> Self {
        let mut next = self.updated(|_| {});
        next.meta.is_deleted = true;
        next
    }

    pub fn id(&self) -> Uuid {
        self.meta.id
    }

    pub fn table(&self) -> Table {
        T::TABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, Recipe};

    #[test]
    fn test_new_record_is_pending_and_owned() {
        let before = timestamp_now();
        let record = Record::<Recipe>::new(Some("alice".into()), |r| r.name = "Soup".into());
        let after = timestamp_now();

        assert_eq!(record.data.name, "Soup");
        assert_eq!(record.meta.user_id.as_deref(), Some("alice"));
        assert_eq!(record.meta.sync_status, SyncStatus::Pending);
        assert!(record.meta.is_local);
        assert!(!record.meta.is_deleted);
        assert!(record.meta.last_sync >= before && record.meta.last_sync <= after);
    }

    #[test]
    fn test_update_restamps_synced_record() {
        let mut record = Record::<Recipe>::new(None, |r| r.name = "Soup".into());
        record.meta.mark_synced(Some("r-1".into()));
        let synced_at = record.meta.last_sync;

        let touched = record.updated(|_| {});
        assert_eq!(touched.meta.sync_status, SyncStatus::Pending);
        assert!(touched.meta.is_local);
        assert!(touched.meta.last_sync >= synced_at);
        assert_eq!(touched.meta.remote_id.as_deref(), Some("r-1"));
        assert_eq!(touched.data, record.data);
    }

    #[test]
    fn test_update_leaves_original_untouched() {
        let record = Record::<Recipe>::new(None, |r| r.name = "Soup".into());
        let renamed = record.updated(|r| r.name = "Stew".into());
        assert_eq!(record.data.name, "Soup");
        assert_eq!(renamed.data.name, "Stew");
        assert_eq!(renamed.id(), record.id());
    }

    #[test]
    fn test_deleted_sets_tombstone_and_pending() {
        let mut record = Record::<Ingredient>::new(None, |i| i.name = "salt".into());
        record.meta.mark_synced(Some("i-1".into()));

        let deleted = record.deleted();
        assert!(deleted.meta.is_deleted);
        assert!(deleted.meta.is_pending());
        assert_eq!(deleted.data.name, "salt");
    }

    #[test]
    fn test_mark_synced_clears_conflict() {
        let mut meta = SyncMeta::new_local(None);
        meta.mark_conflict(serde_json::json!({"reason": "invalid"}));
        assert!(meta.is_conflict());

        meta.mark_synced(None);
        assert_eq!(meta.sync_status, SyncStatus::Synced);
        assert!(meta.conflict_data.is_none());
        assert!(!meta.is_local);
    }

    #[test]
    fn test_from_remote_is_synced() {
        let meta = SyncMeta::from_remote(Some("r-9".into()), Some("bob".into()));
        assert_eq!(meta.sync_status, SyncStatus::Synced);
        assert!(!meta.is_local);
        assert_eq!(meta.remote_id.as_deref(), Some("r-9"));
    }
}
