//! Low-precision ephemeris.
//!
//! Greenwich sidereal angle plus apparent Sun and Moon directions as pure
//! functions of a [`TimeInstant`]. Accuracy is a few degrees: no nutation,
//! precession, libration or elliptical lunar motion.

use crate::foundation::math::{
    constants::TAU,
    utils::{deg_to_rad, lon_lat, safe_asin},
    Mat3, Mat3Ext, Vec3,
};
use crate::foundation::time::{TimeInstant, SECONDS_PER_DAY};

/// Mean obliquity of the ecliptic, degrees
pub const OBLIQUITY_DEG: f64 = 23.439;

/// GMST polynomial constant term, seconds (IAU 1982)
pub const GMST_BASE_SECONDS: f64 = 67_310.548_41;

/// GMST linear rate, seconds per Julian century
pub const GMST_RATE_SECONDS: f64 = 876_600.0 * 3600.0 + 8_640_184.812_866;

/// Julian day.
pub fn julian_day(t: TimeInstant) -> f64 {
    t.julian_day()
}

/// Days since J2000.0.
pub fn days_since_j2000(t: TimeInstant) -> f64 {
    t.days_since_j2000()
}

/// Unreduced GMST in sidereal seconds.
pub fn gmst_seconds(t: TimeInstant) -> f64 {
    let centuries = t.julian_centuries();
    GMST_BASE_SECONDS
        + GMST_RATE_SECONDS * centuries
        + 0.093_104 * centuries * centuries
        - 6.2e-6 * centuries * centuries * centuries
}

/// Greenwich mean sidereal angle in radians, within [0, 2π).
pub fn sidereal_angle(t: TimeInstant) -> f64 {
    let mut seconds = gmst_seconds(t) % SECONDS_PER_DAY;
    if seconds < 0.0 {
        seconds += SECONDS_PER_DAY;
    }
    let angle = seconds / SECONDS_PER_DAY * TAU;
    if angle >= TAU { 0.0 } else { angle }
}

/// Equatorial unit vector for an ecliptic longitude (degrees) at zero
/// ecliptic latitude.
fn ecliptic_to_equatorial(lambda_deg: f64) -> Vec3 {
    let lambda = deg_to_rad(lambda_deg);
    let eps = deg_to_rad(OBLIQUITY_DEG);
    let ra = (eps.cos() * lambda.sin()).atan2(lambda.cos());
    let dec = safe_asin(eps.sin() * lambda.sin());
    Vec3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin())
}

/// Apparent Sun direction in ECI.
pub fn sun_direction_eci(t: TimeInstant) -> Vec3 {
    let n = t.days_since_j2000();
    let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
    let mean_anomaly = deg_to_rad((357.528 + 0.985_600_3 * n).rem_euclid(360.0));
    let lambda = mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin();
    ecliptic_to_equatorial(lambda)
}

/// Moon direction in ECI from a circular orbit in the ecliptic plane.
pub fn moon_direction_eci(t: TimeInstant) -> Vec3 {
    let n = t.days_since_j2000();
    let lambda = (218.316 + 13.176_396 * n).rem_euclid(360.0);
    ecliptic_to_equatorial(lambda)
}

/// Rotation taking ECI vectors into ECEF for a sidereal angle.
pub fn eci_to_ecef_matrix(theta: f64) -> Mat3 {
    Mat3::rotation_z(theta)
}

/// Rotate an ECI vector into ECEF.
pub fn eci_to_ecef(v: &Vec3, theta: f64) -> Vec3 {
    eci_to_ecef_matrix(theta) * v
}

/// Ground-track point (longitude, latitude in radians) beneath an ECI direction.
pub fn sub_point_lon_lat(direction: &Vec3, theta: f64) -> (f64, f64) {
    lon_lat(&eci_to_ecef(direction, theta))
}

/// Every ephemeris output a frame needs, evaluated once per instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ephemeris {
    /// Instant the values were computed for
    pub time: TimeInstant,
    /// Greenwich sidereal angle, radians
    pub sidereal_angle: f64,
    /// Sun direction, ECI
    pub sun_eci: Vec3,
    /// Moon direction, ECI
    pub moon_eci: Vec3,
    /// Sun direction, ECEF
    pub sun_ecef: Vec3,
    /// Moon direction, ECEF
    pub moon_ecef: Vec3,
}

impl Ephemeris {
    /// Evaluate the ephemeris at `t`
    pub fn at(t: TimeInstant) -> Self {
        let theta = sidereal_angle(t);
        let sun_eci = sun_direction_eci(t);
        let moon_eci = moon_direction_eci(t);
        Self {
            time: t,
            sidereal_angle: theta,
            sun_eci,
            moon_eci,
            sun_ecef: eci_to_ecef(&sun_eci, theta),
            moon_ecef: eci_to_ecef(&moon_eci, theta),
        }
    }

    /// Sub-solar point (longitude, latitude in radians)
    pub fn sub_solar_point(&self) -> (f64, f64) {
        sub_point_lon_lat(&self.sun_eci, self.sidereal_angle)
    }

    /// Sub-lunar point (longitude, latitude in radians)
    pub fn sub_lunar_point(&self) -> (f64, f64) {
        sub_point_lon_lat(&self.moon_eci, self.sidereal_angle)
    }
}
