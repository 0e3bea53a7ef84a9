//! Observer-fixed view basis.
//!
//! Models a fixed site on the lunar surface looking back at Earth. The basis
//! rows are right `r`, up `u` and forward `f` expressed in ECEF, so the matrix
//! maps ECEF vectors into view space and its transpose maps them back.

use serde::{Deserialize, Serialize};

use crate::ephemeris::{eci_to_ecef, Ephemeris};
use crate::foundation::math::{
    utils::{deg_to_rad, from_lon_lat},
    Mat3, Mat3Ext, Vec3,
};

/// Selenographic latitude of the observation site (Apollo 11), degrees
pub const SITE_LAT_DEG: f64 = 0.674_08;

/// Selenographic east longitude of the observation site (Apollo 11), degrees
pub const SITE_LON_EAST_DEG: f64 = 23.472_97;

/// IAU mean lunar pole right ascension, degrees
pub const MOON_POLE_RA_DEG: f64 = 269.9949;

/// IAU mean lunar pole declination, degrees
pub const MOON_POLE_DEC_DEG: f64 = 66.5392;

/// Lunar prime meridian angle at J2000, degrees
pub const MOON_W0_DEG: f64 = 38.3213;

/// Lunar prime meridian rate, degrees per day
pub const MOON_W_RATE_DEG: f64 = 13.176_358_15;

/// Default longitude yaw applied about the Earth's polar axis, degrees.
///
/// Tuned against a reference renderer; compensates for the coarse lunar
/// ephemeris and the texture seam convention. Not an astronomical constant.
pub const DEFAULT_FUDGE_LON_DEG: f64 = -200.0;

/// Default screen-plane roll, degrees. Tuned against a reference renderer.
pub const DEFAULT_ROLL_DEG: f64 = 225.0;

const DEGENERATE_NORM: f64 = 1e-12;

/// Fixed visual calibration rotations applied after the astronomical basis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Yaw about the Earth's polar axis, degrees
    pub fudge_lon_deg: f64,
    /// Roll in the screen plane, degrees
    pub roll_deg: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            fudge_lon_deg: DEFAULT_FUDGE_LON_DEG,
            roll_deg: DEFAULT_ROLL_DEG,
        }
    }
}

impl Calibration {
    /// No calibration at all; the bare astronomical basis
    pub const IDENTITY: Self = Self {
        fudge_lon_deg: 0.0,
        roll_deg: 0.0,
    };
}

/// Unit normal of the observation site in the Moon body-fixed frame.
///
/// Longitudes are taken west-positive, so the east longitude is negated.
pub fn site_body_vector() -> Vec3 {
    from_lon_lat(deg_to_rad(-SITE_LON_EAST_DEG), deg_to_rad(SITE_LAT_DEG))
}

/// Moon body-fixed to ECI rotation for a number of days since J2000.
///
/// `Rz(α_p + 90°) · Rx(90° − δ_p) · Rz(W)`, rightmost applied first.
pub fn moon_body_to_eci(days_since_j2000: f64) -> Mat3 {
    let w = MOON_W0_DEG + MOON_W_RATE_DEG * days_since_j2000;
    Mat3::rotation_z(deg_to_rad(MOON_POLE_RA_DEG + 90.0))
        * Mat3::rotation_x(deg_to_rad(90.0 - MOON_POLE_DEC_DEG))
        * Mat3::rotation_z(deg_to_rad(w))
}

/// Orthonormal ECEF→view frame for one rendered instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBasis {
    matrix: Mat3,
}

impl ViewBasis {
    /// Build the basis for the instant captured in `ephemeris`.
    pub fn new(ephemeris: &Ephemeris, calibration: &Calibration) -> Self {
        let site_eci = moon_body_to_eci(ephemeris.time.days_since_j2000()) * site_body_vector();
        let site_ecef = eci_to_ecef(&site_eci, ephemeris.sidereal_angle);
        Self::from_directions(&ephemeris.moon_ecef, &site_ecef, calibration)
    }

    /// Build the basis from an Earth→Moon direction and a site normal, both ECEF.
    pub fn from_directions(moon_ecef: &Vec3, site_ecef: &Vec3, calibration: &Calibration) -> Self {
        let forward = moon_ecef.normalize();
        let up = project_onto_plane(site_ecef, &forward)
            .or_else(|| project_onto_plane(&Vec3::z(), &forward))
            .or_else(|| project_onto_plane(&Vec3::x(), &forward))
            .unwrap_or_else(Vec3::y);
        let right = up.cross(&forward).normalize();

        let astronomical = Mat3::from_row_vectors(&right, &up, &forward);
        let matrix = Mat3::rotation_z(deg_to_rad(calibration.roll_deg))
            * astronomical
            * Mat3::rotation_z(deg_to_rad(calibration.fudge_lon_deg));
        Self { matrix }
    }

    /// ECEF→view rotation
    pub const fn ecef_to_view_matrix(&self) -> &Mat3 {
        &self.matrix
    }

    /// View→ECEF rotation (the transpose, valid because the basis is orthonormal)
    pub fn view_to_ecef_matrix(&self) -> Mat3 {
        self.matrix.transpose()
    }

    /// Rotate an ECEF vector into view space
    pub fn ecef_to_view(&self, v: &Vec3) -> Vec3 {
        self.matrix * v
    }

    /// Rotate a view-space vector back into ECEF
    pub fn view_to_ecef(&self, v: &Vec3) -> Vec3 {
        self.matrix.tr_mul(v)
    }

    /// Right vector (row 0)
    pub fn right(&self) -> Vec3 {
        self.matrix.row(0).transpose()
    }

    /// Up vector (row 1)
    pub fn up(&self) -> Vec3 {
        self.matrix.row(1).transpose()
    }

    /// Forward vector (row 2)
    pub fn forward(&self) -> Vec3 {
        self.matrix.row(2).transpose()
    }
}

fn project_onto_plane(v: &Vec3, normal: &Vec3) -> Option<Vec3> {
    let projected = v - normal * v.dot(normal);
    let norm = projected.norm();
    (norm > DEGENERATE_NORM).then(|| projected / norm)
}
