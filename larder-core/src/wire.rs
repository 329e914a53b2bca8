//! Remote wire format.
//!
//! Local fields use snake_case names; the remote service uses its own names
//! (mostly camelCase, with a few renames such as `approved` → `isApproved`).
//! Each entity declares the translation once as a [`FieldMap`]. Fields
//! missing from the map are local-only and never leave the device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Entity, FieldRef, Record, Table};

#[derive(Error, Debug)]
pub enum WireError {
    #[error("Failed to convert fields: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a {expected} record, got {actual}")]
    TableMismatch { expected: Table, actual: Table },

    #[error("Field '{0}' is not an object map")]
    NotAnObject(&'static str),

    #[error("Reference field '{field}' has invalid value '{value}'")]
    InvalidReference { field: &'static str, value: String },
}

/// Explicit local ↔ remote field name table.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    pairs: &'static [(&'static str, &'static str)],
}

impl FieldMap {
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self { pairs }
    }

    pub fn remote_name(&self, local: &str) -> Option<&'static str> {
        self.pairs
            .iter()
            .find(|(l, _)| *l == local)
            .map(|(_, r)| *r)
    }

    pub fn local_name(&self, remote: &str) -> Option<&'static str> {
        self.pairs
            .iter()
            .find(|(_, r)| *r == remote)
            .map(|(l, _)| *l)
    }

    /// Renames mapped keys to their remote names and drops the rest.
    pub fn to_remote(&self, local: &Map<String, Value>) -> Map<String, Value> {
        self.pairs
            .iter()
            .filter_map(|(l, r)| local.get(*l).map(|v| (r.to_string(), v.clone())))
            .collect()
    }

    /// Renames mapped keys to their local names and drops unknown keys.
    pub fn to_local(&self, remote: &Map<String, Value>) -> Map<String, Value> {
        self.pairs
            .iter()
            .filter_map(|(l, r)| remote.get(*r).map(|v| (l.to_string(), v.clone())))
            .collect()
    }
}

/// One record as exchanged with the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRecord {
    pub table: Table,
    /// The originating device's local id.
    pub client_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted: bool,
    /// Entity fields under their remote names.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl WireRecord {
    /// Serializes a record. Reference fields still hold local ids; callers
    /// swap them for remote ids with [`WireRecord::set_reference`].
    pub fn encode<T: Entity>(record: &Record<T>) -> Result<Self, WireError> {
        let local = match serde_json::to_value(&record.data)? {
            Value::Object(map) => map,
            _ => return Err(WireError::NotAnObject("data")),
        };
        Ok(Self {
            table: T::TABLE,
            client_id: record.meta.id,
            remote_id: record.meta.remote_id.clone(),
            owner: record.meta.user_id.clone(),
            updated_at: record.meta.last_sync,
            deleted: record.meta.is_deleted,
            fields: T::FIELDS.to_remote(&local),
        })
    }

    /// Builds the entity from the remote fields. Reference fields must
    /// already hold local ids (see [`WireRecord::set_reference`]).
    pub fn decode<T: Entity>(&self) -> Result<T, WireError> {
        if self.table != T::TABLE {
            return Err(WireError::TableMismatch {
                expected: T::TABLE,
                actual: self.table,
            });
        }
        let local = T::FIELDS.to_local(&self.fields);
        Ok(serde_json::from_value(Value::Object(local))?)
    }

    /// Value of a reference field, looked up by its local field name.
    pub fn reference<T: Entity>(&self, field_ref: &FieldRef) -> Option<&str> {
        T::FIELDS
            .remote_name(field_ref.field)
            .and_then(|name| self.fields.get(name))
            .and_then(Value::as_str)
    }

    pub fn set_reference<T: Entity>(&mut self, field_ref: &FieldRef, value: impl Into<String>) {
        if let Some(name) = T::FIELDS.remote_name(field_ref.field) {
            self.fields
                .insert(name.to_string(), Value::String(value.into()));
        }
    }

    /// Parses a reference field that holds a local id.
    pub fn local_reference<T: Entity>(&self, field_ref: &FieldRef) -> Result<Uuid, WireError> {
        let value = self.reference::<T>(field_ref).unwrap_or_default();
        Uuid::parse_str(value).map_err(|_| WireError::InvalidReference {
            field: field_ref.field,
            value: value.to_string(),
        })
    }
}
