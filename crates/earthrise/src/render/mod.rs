//! # Rendering System
//!
//! Software rasterisation of the Earth disk as seen from the Moon.
//!
//! ## Architecture
//!
//! - **Rasterizer**: per-frame setup and the per-pixel unproject/sample/shade loop
//! - **Lighting**: Lambertian sun shading with night floor, gamma and exposure
//! - **Ocean**: HSV water classifier and colour boost
//! - **Overlay**: optional debug geometry drawn after the main pass
//! - **Frame**: the RGB8 output buffer and line drawing

pub mod frame;
pub mod lighting;
pub mod ocean;
pub mod overlay;
pub mod rasterizer;

pub use frame::RasterFrame;
pub use lighting::{ShadingModel, ShadingParameters};
pub use ocean::{OceanClassifier, WaterParameters};
pub use overlay::OverlayGeometry;
pub use rasterizer::{DiskProjection, EarthRenderer, EngineError, FrameGeometry};
