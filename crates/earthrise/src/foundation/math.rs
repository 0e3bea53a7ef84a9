//! Math utilities and types
//!
//! Double precision vector and matrix aliases over `nalgebra`, plus the axis
//! rotations and spherical conversions used by the ephemeris and view code.

pub use nalgebra::{Matrix3, Vector3};

/// 3D vector type (unit directions in ECI, ECEF or view space)
pub type Vec3 = Vector3<f64>;

/// 3x3 matrix type (rotations and frame transforms)
pub type Mat3 = Matrix3<f64>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;

    /// 2 * Pi
    pub const TAU: f64 = std::f64::consts::TAU;

    /// Pi / 2
    pub const HALF_PI: f64 = std::f64::consts::FRAC_PI_2;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f64 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f64 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f64) -> f64 {
        radians * constants::RAD_TO_DEG
    }

    /// `asin` with its argument clamped to [-1, 1].
    ///
    /// Composed rotations can push a unit component a few ulps past 1.0.
    pub fn safe_asin(x: f64) -> f64 {
        x.clamp(-1.0, 1.0).asin()
    }

    /// `acos` with its argument clamped to [-1, 1].
    pub fn safe_acos(x: f64) -> f64 {
        x.clamp(-1.0, 1.0).acos()
    }

    /// Longitude and latitude (radians) of a unit direction.
    pub fn lon_lat(direction: &Vec3) -> (f64, f64) {
        (direction.y.atan2(direction.x), safe_asin(direction.z))
    }

    /// Unit direction for a longitude/latitude pair (radians).
    pub fn from_lon_lat(lon: f64, lat: f64) -> Vec3 {
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        Vec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }
}

/// Extension trait for `Mat3` with the axis rotations used across the crate
pub trait Mat3Ext {
    /// Active rotation by `angle` radians about the X axis
    fn rotation_x(angle: f64) -> Mat3;

    /// Active rotation by `angle` radians about the Z axis
    fn rotation_z(angle: f64) -> Mat3;

    /// Build a matrix whose rows are the three given vectors
    fn from_row_vectors(r0: &Vec3, r1: &Vec3, r2: &Vec3) -> Mat3;
}

impl Mat3Ext for Mat3 {
    fn rotation_x(angle: f64) -> Mat3 {
        let (s, c) = angle.sin_cos();
        Mat3::new(
            1.0, 0.0, 0.0,
            0.0, c, -s,
            0.0, s, c,
        )
    }

    fn rotation_z(angle: f64) -> Mat3 {
        let (s, c) = angle.sin_cos();
        Mat3::new(
            c, -s, 0.0,
            s, c, 0.0,
            0.0, 0.0, 1.0,
        )
    }

    fn from_row_vectors(r0: &Vec3, r1: &Vec3, r2: &Vec3) -> Mat3 {
        Mat3::new(
            r0.x, r0.y, r0.z,
            r1.x, r1.y, r1.z,
            r2.x, r2.y, r2.z,
        )
    }
}
