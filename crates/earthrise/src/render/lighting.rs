//! Lighting system
//!
//! Lambertian sunlight with a night floor, gamma falloff and exposure. The
//! brightness is left unclamped; colour composition clamps later.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Static shading tunables, fixed for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingParameters {
    /// Minimum brightness on the night side, in [0, 1]
    pub night_floor: f64,
    /// Falloff exponent applied to the cosine term, > 0
    pub gamma: f64,
    /// Overall brightness multiplier, > 0
    pub exposure: f64,
    /// Force uniform full brightness
    pub disabled: bool,
}

impl Default for ShadingParameters {
    fn default() -> Self {
        Self {
            night_floor: 0.08,
            gamma: 1.0,
            exposure: 1.0,
            disabled: false,
        }
    }
}

impl ShadingParameters {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.night_floor) {
            return Err(format!("Night floor must be within [0, 1], got {}", self.night_floor));
        }
        if self.gamma.is_nan() || self.gamma <= 0.0 {
            return Err(format!("Gamma must be positive, got {}", self.gamma));
        }
        if self.exposure.is_nan() || self.exposure <= 0.0 {
            return Err(format!("Exposure must be positive, got {}", self.exposure));
        }
        Ok(())
    }
}

/// Sun shading for a sphere surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingModel {
    params: ShadingParameters,
}

impl ShadingModel {
    /// Create a shading model from its parameters
    pub const fn new(params: ShadingParameters) -> Self {
        Self { params }
    }

    /// Parameters this model was built with
    pub const fn params(&self) -> &ShadingParameters {
        &self.params
    }

    /// Brightness of a surface with normal `normal` lit from `sun`.
    ///
    /// `(night_floor + (1 - night_floor) * max(n·s, 0)^gamma) * exposure`, or
    /// exactly 1.0 when shading is disabled.
    pub fn brightness(&self, normal: &Vec3, sun: &Vec3) -> f64 {
        if self.params.disabled {
            return 1.0;
        }
        let lambert = normal.dot(sun).max(0.0).powf(self.params.gamma);
        let floor = self.params.night_floor;
        (floor + (1.0 - floor) * lambert) * self.params.exposure
    }
}

impl Default for ShadingModel {
    fn default() -> Self {
        Self::new(ShadingParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_terminator_brightness_is_night_floor_times_exposure() {
        let params = ShadingParameters { exposure: 1.4, ..Default::default() };
        let model = ShadingModel::new(params);
        let b = model.brightness(&Vec3::x(), &Vec3::y());
        assert_relative_eq!(b, params.night_floor * params.exposure);
    }

    #[test]
    fn test_subsolar_brightness_is_exposure() {
        let params = ShadingParameters { gamma: 2.5, exposure: 1.3, ..Default::default() };
        let b = ShadingModel::new(params).brightness(&Vec3::z(), &Vec3::z());
        assert_relative_eq!(b, 1.3);
    }

    #[test]
    fn test_default_brightness_bounds() {
        let params = ShadingParameters::default();
        let model = ShadingModel::new(params);
        assert_relative_eq!(model.brightness(&Vec3::x(), &Vec3::y()), params.night_floor * params.exposure);
        assert_relative_eq!(model.brightness(&Vec3::y(), &Vec3::y()), params.exposure);
    }

    #[test]
    fn test_far_side_clamps_to_night_floor() {
        let model = ShadingModel::default();
        let b = model.brightness(&Vec3::x(), &(-Vec3::x()));
        assert_relative_eq!(b, model.params().night_floor);
    }

    #[test]
    fn test_gamma_shapes_falloff() {
        let params = ShadingParameters { night_floor: 0.0, gamma: 2.0, ..Default::default() };
        let sun = Vec3::new(0.5, 0.0, 0.75_f64.sqrt());
        let b = ShadingModel::new(params).brightness(&Vec3::z(), &sun);
        assert_relative_eq!(b, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_exposure_is_not_clamped() {
        let params = ShadingParameters { exposure: 2.0, ..Default::default() };
        let b = ShadingModel::new(params).brightness(&Vec3::z(), &Vec3::z());
        assert!(b > 1.0);
    }

    #[test]
    fn test_disabled_shading_is_uniform() {
        let params = ShadingParameters { disabled: true, exposure: 3.0, ..Default::default() };
        let model = ShadingModel::new(params);
        assert_eq!(model.brightness(&Vec3::x(), &(-Vec3::x())), 1.0);
        assert_eq!(model.brightness(&Vec3::x(), &Vec3::x()), 1.0);
    }

    #[test]
    fn test_validation() {
        assert!(ShadingParameters::default().validate().is_ok());
        assert!(ShadingParameters { gamma: 0.0, ..Default::default() }.validate().is_err());
        assert!(ShadingParameters { night_floor: 1.5, ..Default::default() }.validate().is_err());
        assert!(ShadingParameters { exposure: -1.0, ..Default::default() }.validate().is_err());
    }
}
