//! Asset loading: image decoding and the equirectangular Earth texture

pub mod image_loader;
pub mod texture;

pub use image_loader::ImageData;
pub use texture::{SeamEstimate, Texture, TextureError};

use std::path::PathBuf;
use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// File does not exist
    #[error("Asset not found: {0:?}")]
    NotFound(PathBuf),

    /// Failed to read or decode an asset
    #[error("Load failed: {0}")]
    LoadFailed(String),
}
