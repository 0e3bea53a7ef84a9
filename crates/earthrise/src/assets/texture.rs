//! Equirectangular Earth texture and nearest-neighbour sampling.
//!
//! Pixel access follows one flat contract:
//! `row_stride * row + channels * column + channel`.

use thiserror::Error;

use crate::assets::{AssetError, ImageData};
use crate::foundation::math::{
    constants::{HALF_PI, PI, TAU},
    utils::{deg_to_rad, lon_lat, rad_to_deg},
    Vec3,
};

/// Construction-time texture failures
#[derive(Error, Debug)]
pub enum TextureError {
    /// Width or height is zero
    #[error("Texture has zero dimension: {width}x{height}")]
    ZeroDimension {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },

    /// Fewer than three colour channels
    #[error("Texture needs at least 3 channels, got {0}")]
    TooFewChannels(u8),

    /// Row stride shorter than one row of pixels
    #[error("Row stride {stride} is smaller than the minimum {min}")]
    StrideTooSmall {
        /// Declared row stride in bytes
        stride: usize,
        /// Bytes needed for one row
        min: usize,
    },

    /// Pixel buffer shorter than the declared layout
    #[error("Pixel buffer holds {len} bytes, layout needs {required}")]
    BufferTooSmall {
        /// Actual buffer length
        len: usize,
        /// Length required by width, height, stride and channels
        required: usize,
    },

    /// Layout size does not fit in `usize`
    #[error("Texture layout overflows: {width}x{height}, stride {row_stride}, {channels} channels")]
    LayoutOverflow {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Declared row stride in bytes
        row_stride: usize,
        /// Channels per pixel
        channels: u8,
    },

    /// Source image could not be read or decoded
    #[error("Texture source unreadable: {0}")]
    Asset(#[from] AssetError),
}

/// Result of the column-wise seam search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeamEstimate {
    /// Column with the sharpest jump from its left neighbour
    pub best_column: u32,
    /// Summed absolute channel difference at that column
    pub score: u64,
    /// Longitude offset that moves the seam to the image edge, degrees
    pub suggested_offset_deg: f64,
}

/// Immutable decoded pixel buffer with a fixed longitude calibration
#[derive(Debug, Clone)]
pub struct Texture {
    data: Vec<u8>,
    width: u32,
    height: u32,
    row_stride: usize,
    channels: u8,
    lon_offset: f64,
}

impl Texture {
    /// Wrap a raw pixel buffer, validating its layout.
    pub fn from_raw(
        data: Vec<u8>,
        width: u32,
        height: u32,
        row_stride: usize,
        channels: u8,
        lon_offset_deg: f64,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroDimension { width, height });
        }
        if channels < 3 {
            return Err(TextureError::TooFewChannels(channels));
        }
        let overflow = || TextureError::LayoutOverflow { width, height, row_stride, channels };
        let min_stride = (width as usize)
            .checked_mul(usize::from(channels))
            .ok_or_else(overflow)?;
        if row_stride < min_stride {
            return Err(TextureError::StrideTooSmall { stride: row_stride, min: min_stride });
        }
        let required = row_stride
            .checked_mul(height as usize - 1)
            .and_then(|rows| rows.checked_add(min_stride))
            .ok_or_else(overflow)?;
        if data.len() < required {
            return Err(TextureError::BufferTooSmall { len: data.len(), required });
        }

        Ok(Self {
            data,
            width,
            height,
            row_stride,
            channels,
            lon_offset: deg_to_rad(lon_offset_deg),
        })
    }

    /// Build from decoded image data
    pub fn from_image_data(image: ImageData, lon_offset_deg: f64) -> Result<Self, TextureError> {
        let stride = image.row_stride();
        Self::from_raw(image.data, image.width, image.height, stride, image.channels, lon_offset_deg)
    }

    /// Load and decode an image file
    pub fn load<P: AsRef<std::path::Path>>(path: P, lon_offset_deg: f64) -> Result<Self, TextureError> {
        let texture = Self::from_image_data(ImageData::from_file(path)?, lon_offset_deg)?;
        log::info!(
            "Texture ready: {}x{}, {} channels, longitude offset {:.3} deg",
            texture.width,
            texture.height,
            texture.channels,
            lon_offset_deg
        );
        Ok(texture)
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub const fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Channels per pixel
    pub const fn channels(&self) -> u8 {
        self.channels
    }

    /// Longitude offset in radians
    pub const fn lon_offset(&self) -> f64 {
        self.lon_offset
    }

    /// RGB at (`column`, `row`); callers keep both in range
    fn texel(&self, column: u32, row: u32) -> [u8; 3] {
        let base = self.row_stride * row as usize + self.channels as usize * column as usize;
        [self.data[base], self.data[base + 1], self.data[base + 2]]
    }

    /// Nearest texel for a longitude/latitude pair in radians.
    ///
    /// Longitude wraps; latitude clamps at the poles.
    pub fn sample_lon_lat(&self, lon: f64, lat: f64) -> [u8; 3] {
        let u = ((lon + self.lon_offset + PI) / TAU).rem_euclid(1.0);
        let v = ((HALF_PI - lat) / PI).clamp(0.0, 1.0);

        let column = ((u * f64::from(self.width)).floor() as u32) % self.width;
        let row = ((v * f64::from(self.height)).floor() as u32).min(self.height - 1);
        self.texel(column, row)
    }

    /// Nearest texel along a unit direction in ECEF
    pub fn sample_direction(&self, direction: &Vec3) -> [u8; 3] {
        let (lon, lat) = lon_lat(direction);
        self.sample_lon_lat(lon, lat)
    }

    /// Find the texture's longitude seam.
    ///
    /// Every column is scored by the summed absolute channel difference to
    /// its left neighbour (column 0 compares against the last column), over
    /// every `max(height / 512, 1)`-th row. The highest score wins. A lone
    /// odd column jumps on both sides, so equal scores are broken by the
    /// difference to the right neighbour, then by the lowest column.
    pub fn estimate_seam_offset(&self) -> SeamEstimate {
        let row_step = (self.height / 512).max(1) as usize;
        let left_scores: Vec<u64> = (0..self.width)
            .map(|column| {
                let left = (column + self.width - 1) % self.width;
                self.column_difference(column, left, row_step)
            })
            .collect();

        let mut best_column = 0;
        let mut best_key = (0u64, 0u64);
        for (column, &score) in (0u32..).zip(left_scores.iter()) {
            let right = left_scores[((column + 1) % self.width) as usize];
            if (score, right) > best_key {
                best_key = (score, right);
                best_column = column;
            }
        }

        SeamEstimate {
            best_column,
            score: best_key.0,
            suggested_offset_deg: -f64::from(best_column) * 360.0 / f64::from(self.width),
        }
    }

    fn column_difference(&self, column: u32, other: u32, row_step: usize) -> u64 {
        (0..self.height)
            .step_by(row_step)
            .map(|row| {
                let a = self.texel(column, row);
                let b = self.texel(other, row);
                a.iter()
                    .zip(b.iter())
                    .map(|(&x, &y)| u64::from(x.abs_diff(y)))
                    .sum::<u64>()
            })
            .sum()
    }

    /// Longitude (degrees) at the left edge of `column`, before the offset
    pub fn column_longitude_deg(&self, column: u32) -> f64 {
        rad_to_deg(f64::from(column) / f64::from(self.width) * TAU - PI)
    }
}
