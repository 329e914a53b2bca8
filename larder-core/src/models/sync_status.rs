use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a record stands relative to the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Local change not yet confirmed by the remote.
    #[default]
    Pending,
    /// Local state matches the last known remote state.
    Synced,
    /// Local and remote diverged; needs explicit resolution.
    Conflict,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
            SyncStatus::Conflict => "conflict",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SyncStatus::Pending),
            "synced" => Ok(SyncStatus::Synced),
            "conflict" => Ok(SyncStatus::Conflict),
            _ => Err(format!(
                "Invalid sync status '{}'. Valid options: pending, synced, conflict",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_status_display() {
        assert_eq!(format!("{}", SyncStatus::Pending), "pending");
        assert_eq!(format!("{}", SyncStatus::Synced), "synced");
        assert_eq!(format!("{}", SyncStatus::Conflict), "conflict");
    }

    #[test]
    fn test_sync_status_from_str() {
        assert_eq!(SyncStatus::from_str("PENDING").unwrap(), SyncStatus::Pending);
        assert_eq!(SyncStatus::from_str("synced").unwrap(), SyncStatus::Synced);
        assert_eq!(
            SyncStatus::from_str("Conflict").unwrap(),
            SyncStatus::Conflict
        );
        assert!(SyncStatus::from_str("dirty").is_err());
    }

    #[test]
    fn test_sync_status_json() {
        let json = serde_json::to_string(&SyncStatus::Conflict).unwrap();
        assert_eq!(json, "\"conflict\"");
    }
}
