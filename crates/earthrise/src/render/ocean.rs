//! Heuristic ocean tint.
//!
//! Texture colours whose hue falls in a blue band with enough saturation are
//! treated as water and boosted after shading. Icecaps, shallow water and
//! some cloud tints will be misclassified; that is accepted.

use serde::{Deserialize, Serialize};

/// Hue, saturation and value of an 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue in degrees, [0, 360)
    pub hue: f64,
    /// Saturation, [0, 1]
    pub saturation: f64,
    /// Value, [0, 1]
    pub value: f64,
}

impl Hsv {
    /// Convert an 8-bit RGB triple
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| f64::from(c) / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta <= 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let saturation = if max <= 0.0 { 0.0 } else { delta / max };

        Self {
            hue: if hue >= 360.0 { hue - 360.0 } else { hue },
            saturation,
            value: max,
        }
    }
}

/// Ocean classifier tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterParameters {
    /// Multiplier applied to shaded ocean colour
    pub boost: f64,
    /// Lower bound of the water hue band, degrees (inclusive)
    pub hue_lo_deg: f64,
    /// Upper bound of the water hue band, degrees (inclusive)
    pub hue_hi_deg: f64,
    /// Minimum saturation for water
    pub sat_min: f64,
}

impl Default for WaterParameters {
    fn default() -> Self {
        Self {
            boost: 1.15,
            hue_lo_deg: 180.0,
            hue_hi_deg: 250.0,
            sat_min: 0.2,
        }
    }
}

impl WaterParameters {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.boost.is_nan() || self.boost < 0.0 {
            return Err(format!("Water boost must be non-negative, got {}", self.boost));
        }
        if self.hue_lo_deg > self.hue_hi_deg {
            return Err(format!(
                "Water hue band is inverted: {} > {}",
                self.hue_lo_deg, self.hue_hi_deg
            ));
        }
        if !(0.0..=1.0).contains(&self.sat_min) {
            return Err(format!("Water saturation minimum must be within [0, 1], got {}", self.sat_min));
        }
        Ok(())
    }
}

/// Classifies texture colours as ocean and applies the boost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OceanClassifier {
    params: WaterParameters,
}

impl OceanClassifier {
    /// Create a classifier from its parameters
    pub const fn new(params: WaterParameters) -> Self {
        Self { params }
    }

    /// Parameters this classifier was built with
    pub const fn params(&self) -> &WaterParameters {
        &self.params
    }

    /// Whether an unshaded texture colour looks like open water
    pub fn is_ocean(&self, rgb: [u8; 3]) -> bool {
        let hsv = Hsv::from_rgb(rgb);
        (self.params.hue_lo_deg..=self.params.hue_hi_deg).contains(&hsv.hue)
            && hsv.saturation >= self.params.sat_min
    }

    /// Scale a shaded colour by the boost, clamped to [0, 1]
    pub fn boost(&self, color: [f64; 3]) -> [f64; 3] {
        color.map(|c| (c * self.params.boost).clamp(0.0, 1.0))
    }
}

impl Default for OceanClassifier {
    fn default() -> Self {
        Self::new(WaterParameters::default())
    }
}
