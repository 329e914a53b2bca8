use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::error::TransformError;
use super::normalize;

/// Main image target, in pixels.
pub const MAIN_SIZE: (u32, u32) = (1024, 633);
/// Square thumbnail target, in pixels.
pub const THUMBNAIL_SIZE: (u32, u32) = (80, 80);
pub const MAIN_QUALITY: u8 = 80;
pub const THUMBNAIL_QUALITY: u8 = 60;

/// Where the source image comes from.
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// An image file already on disk.
    File(PathBuf),
    /// Encoded bytes, possibly base64 or a data URI; staged before decoding.
    Encoded(Vec<u8>),
}

/// The two artifacts produced for one logical image id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifacts {
    pub main_image_path: PathBuf,
    pub thumbnail_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ImagePipeline {
    images_dir: PathBuf,
    staging_dir: PathBuf,
}

impl ImagePipeline {
    pub fn new(images_dir: impl Into<PathBuf>, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            staging_dir: staging_dir.into(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Output paths for a logical id; stable across runs.
    pub fn artifact_paths(&self, logical_id: &str) -> ImageArtifacts {
        let stem = file_stem(logical_id);
        ImageArtifacts {
            main_image_path: self.images_dir.join(format!("{}.jpg", stem)),
            thumbnail_path: self.images_dir.join(format!("{}_thumb.jpg", stem)),
        }
    }

    /// Produces both artifacts, or `None` if any step fails.
    pub fn process(&self, input: ImageInput, logical_id: &str) -> Option<ImageArtifacts> {
        match self.try_process(input, logical_id) {
            Ok(artifacts) => {
                tracing::debug!(logical_id, "Processed recipe image");
                Some(artifacts)
            }
            Err(e) => {
                tracing::warn!(logical_id, "Image processing failed: {}", e);
                None
            }
        }
    }

    pub fn try_process(
        &self,
        input: ImageInput,
        logical_id: &str,
    ) -> Result<ImageArtifacts, TransformError> {
        let source = match input {
            ImageInput::File(path) => decode_file(&path)?,
            ImageInput::Encoded(bytes) => {
                let staged = self.stage(&bytes, logical_id)?;
                // Dropping `staged` removes the file on every path out of here.
                decode_file(staged.path())?
            }
        };

        fs::create_dir_all(&self.images_dir)?;
        let artifacts = self.artifact_paths(logical_id);

        let (width, height) = MAIN_SIZE;
        let main = source.resize_to_fill(width, height, FilterType::Lanczos3);
        write_jpeg(&main, &artifacts.main_image_path, MAIN_QUALITY)?;

        let (width, height) = THUMBNAIL_SIZE;
        let thumbnail = source.resize_to_fill(width, height, FilterType::Triangle);
        write_jpeg(&thumbnail, &artifacts.thumbnail_path, THUMBNAIL_QUALITY)?;

        Ok(artifacts)
    }

    /// Writes normalized bytes to a uniquely named staging file.
    fn stage(
        &self,
        bytes: &[u8],
        logical_id: &str,
    ) -> Result<tempfile::NamedTempFile, TransformError> {
        let normalized = normalize(bytes);
        if normalized.is_empty() {
            return Err(TransformError::EmptyInput);
        }
        fs::create_dir_all(&self.staging_dir)?;

        let prefix = format!(
            "{}-{}-",
            file_stem(logical_id),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        );
        let mut staged = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".img")
            .tempfile_in(&self.staging_dir)?;
        staged.write_all(&normalized)?;
        staged.flush()?;
        Ok(staged)
    }

    /// Removes staging files older than `max_age`; they can only be left by
    /// a process that died mid-transform.
    pub fn sweep_staging(&self, max_age: Duration) -> std::io::Result<usize> {
        let entries = match fs::read_dir(&self.staging_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let now = SystemTime::now();
        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();
            if age >= max_age {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!("Removed {} orphaned staging file(s)", removed);
        }
        Ok(removed)
    }

    /// Deletes both artifacts for a logical id. Missing files are fine.
    pub fn remove_artifacts(&self, logical_id: &str) -> std::io::Result<()> {
        let artifacts = self.artifact_paths(logical_id);
        for path in [artifacts.main_image_path, artifacts.thumbnail_path] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

fn decode_file(path: &Path) -> Result<DynamicImage, TransformError> {
    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Err(TransformError::EmptyInput);
    }
    Ok(image::load_from_memory(&bytes)?)
}

fn write_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<(), TransformError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
    writer.flush()?;
    Ok(())
}

/// Keeps logical ids safe to use as file names.
fn file_stem(logical_id: &str) -> String {
    logical_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
