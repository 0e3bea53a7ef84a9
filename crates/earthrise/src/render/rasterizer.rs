//! Spherical rasterizer
//!
//! Every pixel inside the Earth disk is unprojected orthographically onto the
//! front hemisphere of a unit sphere. That view-space point is also the
//! surface normal; rotated into ECEF it selects the texel and the sun shading.

use std::path::Path;

use thiserror::Error;

use crate::assets::{Texture, TextureError};
use crate::config::{ConfigError, RenderConfig};
use crate::ephemeris::Ephemeris;
use crate::foundation::math::{utils::rad_to_deg, Mat3, Vec3};
use crate::foundation::time::{Stopwatch, TimeInstant};
use crate::render::frame::RasterFrame;
use crate::render::lighting::ShadingModel;
use crate::render::ocean::OceanClassifier;
use crate::render::overlay::OverlayGeometry;
use crate::view::{Calibration, ViewBasis};

/// Renderer construction errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Texture could not be built
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    /// Textured rendering requested without a texture
    #[error("A texture is required unless the test pattern is enabled")]
    MissingTexture,
}

/// Orthographic mapping between frame pixels and the unit Earth disk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskProjection {
    /// Disk centre, x pixels
    pub center_x: f64,
    /// Disk centre, y pixels
    pub center_y: f64,
    /// Disk radius, pixels
    pub radius: f64,
}

impl DiskProjection {
    /// Largest centred disk that fits a `width` × `height` frame
    pub fn for_frame(width: u32, height: u32) -> Self {
        Self {
            center_x: f64::from(width) / 2.0,
            center_y: f64::from(height) / 2.0,
            radius: f64::from(width.min(height)) / 2.0,
        }
    }

    /// View-space sphere point under the centre of pixel (`x`, `y`), or `None`
    /// outside the disk. Screen Y is flipped so +Y is up.
    pub fn unproject(&self, x: u32, y: u32) -> Option<Vec3> {
        let dx = (f64::from(x) + 0.5 - self.center_x) / self.radius;
        let dy = -(f64::from(y) + 0.5 - self.center_y) / self.radius;
        let r2 = dx * dx + dy * dy;
        if r2 > 1.0 {
            return None;
        }
        Some(Vec3::new(dx, dy, (1.0 - r2).sqrt()))
    }

    /// Screen position of a view-space direction
    pub fn project(&self, v: &Vec3) -> (f64, f64) {
        (self.center_x + v.x * self.radius, self.center_y - v.y * self.radius)
    }
}

/// Per-frame setup shared by every pixel, rebuilt for each instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    /// Sun and Moon for the instant
    pub ephemeris: Ephemeris,
    /// ECEF→view basis
    pub basis: ViewBasis,
    /// View→ECEF rotation
    pub view_to_ecef: Mat3,
}

impl FrameGeometry {
    /// Evaluate the ephemeris and observer basis at `t`
    pub fn at(t: TimeInstant, calibration: &Calibration) -> Self {
        let ephemeris = Ephemeris::at(t);
        let basis = ViewBasis::new(&ephemeris, calibration);
        Self {
            ephemeris,
            basis,
            view_to_ecef: basis.view_to_ecef_matrix(),
        }
    }
}

/// Renders Earth as seen from the lunar observation site
#[derive(Debug, Clone)]
pub struct EarthRenderer {
    config: RenderConfig,
    texture: Option<Texture>,
    shading: ShadingModel,
    ocean: OceanClassifier,
}

impl EarthRenderer {
    /// Build a renderer from a validated configuration.
    ///
    /// `texture` may only be `None` when the test pattern is enabled.
    pub fn new(config: RenderConfig, texture: Option<Texture>) -> Result<Self, EngineError> {
        config.validate()?;
        if texture.is_none() && !config.test_pattern {
            return Err(EngineError::MissingTexture);
        }

        log::info!(
            "Renderer ready: {}x{}, shading {}, test pattern {}, debug overlay {}",
            config.width,
            config.height,
            if config.shading.disabled { "off" } else { "on" },
            config.test_pattern,
            config.debug_overlay
        );

        Ok(Self {
            shading: ShadingModel::new(config.shading),
            ocean: OceanClassifier::new(config.water),
            config,
            texture,
        })
    }

    /// Build a renderer, loading the texture (if any) with the configured
    /// longitude offset
    pub fn from_config(config: RenderConfig, texture_path: Option<&Path>) -> Result<Self, EngineError> {
        let texture = texture_path
            .map(|path| Texture::load(path, config.texture_lon_offset_deg))
            .transpose()?;
        Self::new(config, texture)
    }

    /// Configuration in use
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Texture in use, if any
    pub const fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Per-frame geometry at `t` with this renderer's calibration
    pub fn geometry(&self, t: TimeInstant) -> FrameGeometry {
        FrameGeometry::at(t, &self.config.calibration)
    }

    /// Render a fresh frame for `t`
    pub fn render(&self, t: TimeInstant) -> RasterFrame {
        let mut frame = RasterFrame::new(self.config.width, self.config.height);
        self.render_into(t, &mut frame);
        frame
    }

    /// Render `t` into a caller-owned frame, resizing it when needed.
    ///
    /// Returns the geometry the frame was drawn with.
    pub fn render_into(&self, t: TimeInstant, frame: &mut RasterFrame) -> FrameGeometry {
        let stopwatch = Stopwatch::start_new();
        let geometry = self.geometry(t);
        let (width, height) = (self.config.width, self.config.height);
        let disk = DiskProjection::for_frame(width, height);
        let sun = geometry.ephemeris.sun_ecef;
        let texture = self.texture.as_ref().filter(|_| !self.config.test_pattern);

        frame.reset(width, height);
        for y in 0..height {
            for x in 0..width {
                let Some(normal_view) = disk.unproject(x, y) else {
                    continue;
                };
                let rgb = match texture {
                    Some(texture) => {
                        let normal = geometry.view_to_ecef * normal_view;
                        self.surface_color(texture, &normal, &sun)
                    }
                    None => test_pattern_color(&normal_view),
                };
                frame.set_pixel(x, y, rgb);
            }
        }

        if self.config.debug_overlay {
            OverlayGeometry::compute(&geometry.basis, &sun, &disk).draw(frame);
        }

        let (sun_lon, sun_lat) = geometry.ephemeris.sub_solar_point();
        let (moon_lon, moon_lat) = geometry.ephemeris.sub_lunar_point();
        log::debug!(
            "Frame at {}: sidereal {:.4} rad, sub-solar ({:.2}, {:.2}), sub-lunar ({:.2}, {:.2}), {:.1} ms",
            t,
            geometry.ephemeris.sidereal_angle,
            rad_to_deg(sun_lon),
            rad_to_deg(sun_lat),
            rad_to_deg(moon_lon),
            rad_to_deg(moon_lat),
            stopwatch.elapsed_millis()
        );
        geometry
    }

    /// Shaded texture colour for an ECEF surface normal
    fn surface_color(&self, texture: &Texture, normal: &Vec3, sun: &Vec3) -> [u8; 3] {
        let base = texture.sample_direction(normal);
        let brightness = self.shading.brightness(normal, sun);
        let mut color = base.map(|c| (f64::from(c) / 255.0 * brightness).clamp(0.0, 1.0));
        if self.ocean.is_ocean(base) {
            color = self.ocean.boost(color);
        }
        color.map(quantize)
    }
}

/// Colour straight from the view-space normal: x→red, y→green, depth→blue
fn test_pattern_color(normal_view: &Vec3) -> [u8; 3] {
    [
        (normal_view.x + 1.0) / 2.0,
        (normal_view.y + 1.0) / 2.0,
        normal_view.z,
    ]
    .map(quantize)
}

fn quantize(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
