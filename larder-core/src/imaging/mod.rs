//! Recipe image pipeline.
//!
//! Every source image becomes exactly two JPEG artifacts: a 1024×633 main
//! image and an 80×80 thumbnail, written under the images directory and
//! named after the recipe's logical image id. [`needs_processing`] is the
//! idempotence gate and must be consulted before [`ImagePipeline::process`].

mod error;
mod pipeline;

pub use error::TransformError;
pub use pipeline::{ImageArtifacts, ImageInput, ImagePipeline};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Strips a data-URI header and decodes base64 text, so the same picture
/// compares equal however it was encoded. Raw binary passes through.
pub fn normalize(raw: &[u8]) -> Vec<u8> {
    let payload = strip_data_uri(raw);
    let trimmed = payload.trim_ascii();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match STANDARD.decode(trimmed) {
        Ok(decoded) => decoded,
        Err(_) => payload.to_vec(),
    }
}

fn strip_data_uri(raw: &[u8]) -> &[u8] {
    if !raw.starts_with(b"data:") {
        return raw;
    }
    match raw.iter().position(|b| *b == b',') {
        Some(comma) => &raw[comma + 1..],
        None => raw,
    }
}

/// Whether `new_image` has to go through the pipeline.
///
/// No new image never needs work; a new image with nothing existing always
/// does; otherwise only when the normalized bytes differ.
pub fn needs_processing(new_image: Option<&[u8]>, existing_image: Option<&[u8]>) -> bool {
    match (new_image, existing_image) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(new), Some(existing)) => normalize(new) != normalize(existing),
    }
}

/// [`needs_processing`] against the digest stored from an earlier run.
pub fn needs_processing_digest(new_image: Option<&[u8]>, existing_digest: Option<&str>) -> bool {
    match (new_image, existing_digest) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(new), Some(existing)) => digest(new) != existing,
    }
}

/// Hex SHA-256 of the normalized bytes.
pub fn digest(image: &[u8]) -> String {
    format!("{:x}", Sha256::digest(normalize(image)))
}
