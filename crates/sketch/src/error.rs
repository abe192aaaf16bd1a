use fabricator_common::CommonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SketchError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    InvalidPrecision(#[from] CommonError),

    #[error("Geometric computation error: {0}")]
    Geometry(String),

    #[error("Image processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, SketchError>;
