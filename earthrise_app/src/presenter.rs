//! Frame presentation
//!
//! The redraw loop hands every finished frame to a [`FramePresenter`]. The
//! bundled [`LogPresenter`] only reports what was drawn.

use std::time::Duration;

use anyhow::Result;
use earthrise::foundation::math::utils::rad_to_deg;
use earthrise::prelude::*;

/// What the loop knows about a finished frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    /// Zero-based frame counter
    pub index: u64,
    /// Instant the frame shows
    pub time: TimeInstant,
    /// Ephemeris and basis used for the frame
    pub geometry: FrameGeometry,
    /// Wall-clock time spent rendering
    pub render_time: Duration,
}

/// Receives finished frames from the redraw loop
pub trait FramePresenter {
    /// Show one frame. Errors stop the loop.
    fn present(&mut self, frame: &RasterFrame, info: &FrameInfo) -> Result<()>;
}

/// Reports each frame through `log`
#[derive(Debug, Default)]
pub struct LogPresenter {
    presented: u64,
}

impl LogPresenter {
    /// Frames presented so far
    pub const fn presented(&self) -> u64 {
        self.presented
    }
}

impl FramePresenter for LogPresenter {
    fn present(&mut self, frame: &RasterFrame, info: &FrameInfo) -> Result<()> {
        let (sun_lon, sun_lat) = info.geometry.ephemeris.sub_solar_point();
        let (moon_lon, moon_lat) = info.geometry.ephemeris.sub_lunar_point();
        log::info!(
            "Frame {} at {}: {}x{}, {:.1}% lit, rendered in {:.1} ms",
            info.index,
            info.time,
            frame.width(),
            frame.height(),
            frame.lit_fraction() * 100.0,
            info.render_time.as_secs_f64() * 1000.0
        );
        log::info!(
            "  sub-solar ({:.2}, {:.2}) deg, sub-lunar ({:.2}, {:.2}) deg",
            rad_to_deg(sun_lon),
            rad_to_deg(sun_lat),
            rad_to_deg(moon_lon),
            rad_to_deg(moon_lat)
        );
        self.presented += 1;
        Ok(())
    }
}
