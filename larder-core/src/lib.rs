//! Larder Core Library
//!
//! Shared types and logic for Larder applications: the syncable record
//! envelope, entity models, the remote wire format, quantity scaling, the
//! recipe image pipeline, and clients for the remote sync service.

pub mod imaging;
pub mod models;
pub mod scaling;
pub mod sync;
pub mod wire;

pub use imaging::{ImageArtifacts, ImageInput, ImagePipeline, TransformError};
pub use models::{
    timestamp_now, Entity, FieldRef, Ingredient, Recipe, RecipeImage, RecipeTag, Record,
    SyncMeta, SyncStatus, Table, Tag,
};
pub use sync::{
    HttpImageTransfer, HttpSyncApi, ImageTransfer, PushOutcome, PushResult, RemoteSyncApi,
    TransportError,
};
pub use wire::{FieldMap, WireError, WireRecord};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
