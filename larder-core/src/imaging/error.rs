use thiserror::Error;

/// Errors from decoding, resizing or encoding an image.
///
/// The pipeline never lets these escape [`super::ImagePipeline::process`];
/// they degrade to "no image".
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Image input is empty")]
    EmptyInput,

    #[error("Image I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec failed: {0}")]
    Codec(#[from] image::ImageError),
}
