//! Debug overlay: rotation axis, sun direction and day/night terminator.
//!
//! Geometry is computed first as screen-space data ([`OverlayGeometry`]) and
//! rasterised afterwards, so the visibility rules can be checked without
//! touching pixels. A view-space vector faces the observer when its Z is
//! strictly positive; anything else is skipped.

use crate::foundation::math::{utils::deg_to_rad, Vec3};
use crate::render::frame::RasterFrame;
use crate::render::rasterizer::DiskProjection;
use crate::view::ViewBasis;

/// Earth rotation axis colour
pub const AXIS_COLOR: [u8; 3] = [0, 200, 255];

/// Sun direction colour
pub const SUN_COLOR: [u8; 3] = [255, 220, 0];

/// Terminator colour
pub const TERMINATOR_COLOR: [u8; 3] = [255, 64, 64];

/// Arrow length as a multiple of the disk radius
const ARROW_LENGTH: f64 = 1.2;

/// Arrow head barb length as a multiple of the disk radius
const BARB_LENGTH: f64 = 0.08;

const BARB_ANGLE_DEG: f64 = 25.0;

/// Terminator sampling step, degrees
const TERMINATOR_STEP_DEG: u32 = 1;

/// A screen-space point, pixels
pub type ScreenPoint = (f64, f64);

/// Arrow from the disk centre towards a projected direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    /// Start point (disk centre)
    pub tail: ScreenPoint,
    /// Tip
    pub head: ScreenPoint,
    /// Head barb end points; both equal `head` when the arrow has no length
    pub barbs: [ScreenPoint; 2],
}

impl Arrow {
    fn toward(direction_view: &Vec3, disk: &DiskProjection) -> Self {
        let tail = (disk.center_x, disk.center_y);
        let head = (
            disk.center_x + direction_view.x * disk.radius * ARROW_LENGTH,
            disk.center_y - direction_view.y * disk.radius * ARROW_LENGTH,
        );

        let (ux, uy) = (head.0 - tail.0, head.1 - tail.1);
        let length = ux.hypot(uy);
        if length < f64::EPSILON {
            return Self { tail, head, barbs: [head, head] };
        }

        let back = (-ux / length, -uy / length);
        let barb_len = disk.radius * BARB_LENGTH;
        let barbs = [BARB_ANGLE_DEG, -BARB_ANGLE_DEG].map(|angle| {
            let (s, c) = deg_to_rad(angle).sin_cos();
            (
                head.0 + (back.0 * c - back.1 * s) * barb_len,
                head.1 + (back.0 * s + back.1 * c) * barb_len,
            )
        });
        Self { tail, head, barbs }
    }

    fn draw(&self, frame: &mut RasterFrame, rgb: [u8; 3]) {
        frame.draw_line(self.tail, self.head, rgb);
        for barb in self.barbs {
            frame.draw_line(self.head, barb, rgb);
        }
    }
}

/// Screen-space overlay for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayGeometry {
    /// Earth's north pole direction, when it faces the observer
    pub axis_arrow: Option<Arrow>,
    /// Sun direction, when it faces the observer
    pub sun_arrow: Option<Arrow>,
    /// Visible runs of the terminator; each run is drawn as a connected path
    pub terminator: Vec<Vec<ScreenPoint>>,
}

impl OverlayGeometry {
    /// Project the overlay for a basis, an ECEF sun direction and a disk.
    pub fn compute(basis: &ViewBasis, sun_ecef: &Vec3, disk: &DiskProjection) -> Self {
        let facing = |v: Vec3| (v.z > 0.0).then_some(v);

        let axis_arrow = facing(basis.ecef_to_view(&Vec3::z())).map(|v| Arrow::toward(&v, disk));
        let sun_arrow = facing(basis.ecef_to_view(sun_ecef)).map(|v| Arrow::toward(&v, disk));
        if axis_arrow.is_none() {
            log::trace!("Rotation axis faces away, arrow skipped");
        }
        if sun_arrow.is_none() {
            log::trace!("Sun faces away, arrow skipped");
        }

        Self {
            axis_arrow,
            sun_arrow,
            terminator: terminator_paths(basis, sun_ecef, disk),
        }
    }

    /// Rasterise the overlay on top of `frame`
    pub fn draw(&self, frame: &mut RasterFrame) {
        if let Some(arrow) = &self.axis_arrow {
            arrow.draw(frame, AXIS_COLOR);
        }
        if let Some(arrow) = &self.sun_arrow {
            arrow.draw(frame, SUN_COLOR);
        }
        for path in &self.terminator {
            for segment in path.windows(2) {
                frame.draw_line(segment[0], segment[1], TERMINATOR_COLOR);
            }
        }
    }
}

/// The great circle normal to the sun, split into runs that face the observer.
fn terminator_paths(basis: &ViewBasis, sun_ecef: &Vec3, disk: &DiskProjection) -> Vec<Vec<ScreenPoint>> {
    let sun = sun_ecef.normalize();
    let a = {
        let a = sun.cross(&Vec3::z());
        if a.norm() > 1e-9 { a } else { sun.cross(&Vec3::x()) }
    }
    .normalize();
    let b = sun.cross(&a);

    let mut paths: Vec<Vec<ScreenPoint>> = Vec::new();
    let mut current: Vec<ScreenPoint> = Vec::new();
    let mut first_visible = false;

    for step in (0..=360u32).step_by(TERMINATOR_STEP_DEG as usize) {
        let (s, c) = deg_to_rad(f64::from(step)).sin_cos();
        let v = basis.ecef_to_view(&(a * c + b * s));
        if v.z > 0.0 {
            if step == 0 {
                first_visible = true;
            }
            current.push(disk.project(&v));
        } else if !current.is_empty() {
            paths.push(std::mem::take(&mut current));
        }
    }

    // A run that reaches 360 continues the run that started at 0.
    if !current.is_empty() {
        if first_visible && !paths.is_empty() {
            let head = paths.remove(0);
            current.extend(head.into_iter().skip(1));
        }
        paths.push(current);
    }

    paths.retain(|path| path.len() >= 2);
    paths
}
