//! Remote service interfaces.
//!
//! The sync orchestrator only talks to the remote through these traits:
//! [`RemoteSyncApi`] exchanges serialized records, [`ImageTransfer`] moves
//! image binaries addressed by logical image id. HTTP implementations live
//! in [`client`].

mod client;
mod error;

pub use client::{check_server, HttpImageTransfer, HttpSyncApi};
pub use error::TransportError;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Table;
use crate::wire::WireRecord;

/// The remote's verdict on one pushed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushOutcome {
    pub client_id: Uuid,
    #[serde(flatten)]
    pub result: PushResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PushResult {
    Accepted {
        #[serde(rename = "remoteId")]
        remote_id: String,
    },
    Rejected {
        reason: String,
    },
}

impl PushOutcome {
    pub fn accepted(client_id: Uuid, remote_id: impl Into<String>) -> Self {
        Self {
            client_id,
            result: PushResult::Accepted {
                remote_id: remote_id.into(),
            },
        }
    }

    pub fn rejected(client_id: Uuid, reason: impl Into<String>) -> Self {
        Self {
            client_id,
            result: PushResult::Rejected {
                reason: reason.into(),
            },
        }
    }
}

#[async_trait]
pub trait RemoteSyncApi: Send + Sync {
    /// Submits one table's batch; returns a verdict per accepted or rejected record.
    async fn push(
        &self,
        user: &str,
        table: Table,
        records: Vec<WireRecord>,
    ) -> Result<Vec<PushOutcome>, TransportError>;

    /// Every record changed after `since`, tombstones included.
    async fn pull(
        &self,
        user: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<WireRecord>, TransportError>;
}

#[async_trait]
pub trait ImageTransfer: Send + Sync {
    async fn upload(&self, logical_id: &str, bytes: Vec<u8>) -> Result<(), TransportError>;

    /// `Ok(None)` means the remote has no image for this id; an `Err` means
    /// the retrieval itself failed and should be retried.
    async fn retrieve(&self, logical_id: &str) -> Result<Option<Vec<u8>>, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_outcome_json() {
        let id = Uuid::new_v4();
        let accepted = serde_json::to_value(PushOutcome::accepted(id, "r-1")).unwrap();
        assert_eq!(accepted["status"], "accepted");
        assert_eq!(accepted["remoteId"], "r-1");
        assert_eq!(accepted["clientId"], id.to_string());

        let rejected: PushOutcome = serde_json::from_value(serde_json::json!({
            "clientId": id,
            "status": "rejected",
            "reason": "name is required",
        }))
        .unwrap();
        assert_eq!(rejected, PushOutcome::rejected(id, "name is required"));
    }
}
