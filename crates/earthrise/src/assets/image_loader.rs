//! Texture image decoding
//!
//! Any format the `image` crate was built with is decoded to a tightly
//! packed RGB8 buffer, top row first. Alpha is dropped.

use std::path::Path;

use image::DynamicImage;

use crate::assets::AssetError;

/// Decoded RGB8 pixels ready to back a [`Texture`](crate::assets::Texture)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Row-major RGB bytes
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Always 3
    pub channels: u8,
}

impl ImageData {
    /// Decode an image file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }

        log::debug!("Decoding texture image {}", path.display());
        let decoded = image::open(path)
            .map_err(|e| AssetError::LoadFailed(format!("{}: {e}", path.display())))?;
        let image = Self::from_dynamic(decoded);
        log::info!("Decoded {}x{} image from {}", image.width, image.height, path.display());
        Ok(image)
    }

    /// Decode an in-memory encoded image
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| AssetError::LoadFailed(format!("in-memory image: {e}")))?;
        Ok(Self::from_dynamic(decoded))
    }

    fn from_dynamic(decoded: DynamicImage) -> Self {
        let rgb = decoded.into_rgb8();
        let (width, height) = rgb.dimensions();
        if width != 2 * height {
            log::warn!("Image is {width}x{height}; equirectangular textures are normally 2:1");
        }
        Self {
            data: rgb.into_raw(),
            width,
            height,
            channels: 3,
        }
    }

    /// Uniformly coloured image
    pub fn solid_color(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self {
            data: rgb.repeat(width as usize * height as usize),
            width,
            height,
            channels: 3,
        }
    }

    /// Bytes per row
    pub const fn row_stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(image: &image::RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_solid_color_layout() {
        let img = ImageData::solid_color(4, 2, [255, 0, 0]);
        assert_eq!((img.width, img.height, img.channels), (4, 2, 3));
        assert_eq!(img.data.len(), 24);
        assert_eq!(img.row_stride(), 12);
        assert_eq!(&img.data[21..24], &[255, 0, 0]);
    }

    #[test]
    fn test_png_decodes_top_row_first() {
        let source = image::RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8 * 10, y as u8 * 20, 7]));
        let img = ImageData::from_bytes(&encode_png(&source)).unwrap();
        assert_eq!((img.width, img.height, img.channels), (3, 2, 3));
        // Pixel (2, 1)
        assert_eq!(&img.data[(3 + 2) * 3..(3 + 2) * 3 + 3], &[20, 20, 7]);
    }

    #[test]
    fn test_png_file_on_disk() {
        let source = image::RgbImage::from_pixel(4, 2, image::Rgb([1, 2, 3]));
        let path = std::env::temp_dir().join(format!("earthrise_image_{}.png", std::process::id()));
        std::fs::write(&path, encode_png(&source)).unwrap();

        let img = ImageData::from_file(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(img.unwrap(), ImageData::solid_color(4, 2, [1, 2, 3]));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = ImageData::from_file("no_such_texture.png");
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(matches!(ImageData::from_bytes(b"not an image"), Err(AssetError::LoadFailed(_))));
    }
}
