use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::envelope::Entity;
use super::Table;
use crate::wire::FieldMap;

/// Resolved artifact paths for a recipe's image, keyed by the recipe's
/// logical `sync_id` rather than its local id.
///
/// Only `sync_id` travels on the wire; the binary goes through the image
/// transfer client and the paths are local to this device.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecipeImage {
    pub sync_id: String,
    pub image_path: Option<PathBuf>,
    pub thumbnail_path: Option<PathBuf>,
    /// Digest of the normalized source bytes the artifacts were built from.
    pub source_digest: Option<String>,
    /// The remote binary could not be fetched; retry on the next pull.
    pub fetch_pending: bool,
}

impl Entity for RecipeImage {
    const TABLE: Table = Table::RecipeImages;
    const FIELDS: FieldMap = FieldMap::new(&[("sync_id", "syncId")]);

    fn retain_local_fields(&mut self, previous: &Self) {
        self.image_path = previous.image_path.clone();
        self.thumbnail_path = previous.thumbnail_path.clone();
        self.source_digest = previous.source_digest.clone();
        self.fetch_pending = previous.fetch_pending;
    }
}

impl RecipeImage {
    pub fn new(sync_id: impl Into<String>) -> Self {
        Self {
            sync_id: sync_id.into(),
            ..Self::default()
        }
    }

    pub fn has_artifacts(&self) -> bool {
        self.image_path.is_some()
    }
}
