//! # Earthrise
//!
//! Renders the Earth as it would appear from a fixed site on the lunar
//! surface at any instant: correct phase, rotation and orientation, drawn as
//! an orthographically projected, sun-shaded disk over an equirectangular
//! texture.
//!
//! ## Features
//!
//! - **Ephemeris**: GMST sidereal angle and low-precision Sun/Moon directions
//! - **View Basis**: observer frame anchored at the Apollo 11 site
//! - **Texture Sampling**: nearest-neighbour equirectangular lookup with seam calibration
//! - **Shading**: Lambertian sunlight with a night floor and an ocean boost
//! - **Debug Overlay**: rotation axis, sun arrow and terminator
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use earthrise::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RenderConfig::default();
//!     let texture = Texture::load("earth.jpg", config.texture_lon_offset_deg)?;
//!     let renderer = EarthRenderer::new(config, Some(texture))?;
//!     let frame = renderer.render(TimeInstant::now());
//!     println!("{}x{} frame, {:.0}% lit", frame.width(), frame.height(), frame.lit_fraction() * 100.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ephemeris;
pub mod view;
pub mod assets;
pub mod render;

pub use render::{EarthRenderer, EngineError};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        assets::{ImageData, SeamEstimate, Texture, TextureError},
        config::{Config, ConfigError, RenderConfig},
        ephemeris::Ephemeris,
        foundation::{
            math::{Mat3, Vec3},
            time::{Stopwatch, TimeInstant},
        },
        render::{FrameGeometry, OverlayGeometry, RasterFrame, ShadingParameters, WaterParameters},
        view::{Calibration, ViewBasis},
        EarthRenderer, EngineError,
    };
}
