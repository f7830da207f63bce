//! Mutable view state and the enum-like settings it carries.
//!
//! Every enum here parses through `FromStr`; the dataset setters only assign
//! on a successful parse, so an unrecognized name leaves the prior value.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::prelude::{ImagingDefaults, RcsError};

pub use crate::math::resample::{GridSize, Interpolation};
pub use crate::math::window::WindowKind;

/// Smallest modulus fed to the logarithmic conversions.
pub const MAGNITUDE_FLOOR: f64 = 1e-15;

/// Sweep axis used by waterfall and 2D ISAR products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRange {
    /// φ sweep at the active θ.
    Horizontal,
    /// θ sweep at the active φ.
    Vertical,
}

impl AspectRange {
    pub fn name(self) -> &'static str {
        match self {
            AspectRange::Horizontal => "Horizontal",
            AspectRange::Vertical => "Vertical",
        }
    }
}

impl fmt::Display for AspectRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AspectRange {
    type Err = RcsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(AspectRange::Horizontal),
            "vertical" => Ok(AspectRange::Vertical),
            _ => Err(RcsError::Value(format!("unknown aspect range '{value}'"))),
        }
    }
}

/// Conversion applied to every complex value of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionFunction {
    #[serde(rename = "identity")]
    Identity,
    #[serde(rename = "abs")]
    Abs,
    #[serde(rename = "dB10")]
    DB10,
    #[serde(rename = "dB20")]
    DB20,
}

impl ConversionFunction {
    pub fn name(self) -> &'static str {
        match self {
            ConversionFunction::Identity => "identity",
            ConversionFunction::Abs => "abs",
            ConversionFunction::DB10 => "dB10",
            ConversionFunction::DB20 => "dB20",
        }
    }

    /// Real-valued conversions leave the imaginary part at zero.
    pub fn is_real(self) -> bool {
        self != ConversionFunction::Identity
    }

    pub fn apply(self, value: Complex64) -> Complex64 {
        let floored = || value.norm().max(MAGNITUDE_FLOOR);
        match self {
            ConversionFunction::Identity => value,
            ConversionFunction::Abs => Complex64::new(value.norm(), 0.0),
            ConversionFunction::DB10 => Complex64::new(10.0 * floored().log10(), 0.0),
            ConversionFunction::DB20 => Complex64::new(20.0 * floored().log10(), 0.0),
        }
    }
}

impl fmt::Display for ConversionFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConversionFunction {
    type Err = RcsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "identity" | "none" => Ok(ConversionFunction::Identity),
            "abs" => Ok(ConversionFunction::Abs),
            "db10" => Ok(ConversionFunction::DB10),
            "db20" => Ok(ConversionFunction::DB20),
            _ => Err(RcsError::Value(format!(
                "unknown conversion function '{value}'"
            ))),
        }
    }
}

/// Snapshot of every caller-controlled setting that shapes a product.
///
/// Products take a copy of this at call time and never observe later
/// mutations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub frequency: f64,
    pub incident_wave_theta: f64,
    pub incident_wave_phi: f64,
    pub data_conversion_function: ConversionFunction,
    pub window: WindowKind,
    pub window_size: usize,
    pub aspect_range: AspectRange,
    pub upsample_range: usize,
    pub upsample_azimuth: usize,
    pub upsample_elevation: usize,
    pub interpolation: Interpolation,
    pub extrapolate: bool,
    pub gridsize: GridSize,
}

impl ViewState {
    pub fn from_defaults(defaults: &ImagingDefaults, frequency: f64, theta: f64, phi: f64) -> Self {
        Self {
            frequency,
            incident_wave_theta: theta,
            incident_wave_phi: phi,
            data_conversion_function: defaults.data_conversion_function,
            window: defaults.window,
            window_size: defaults.window_size.max(1),
            aspect_range: defaults.aspect_range,
            upsample_range: defaults.upsample_range,
            upsample_azimuth: defaults.upsample_azimuth,
            upsample_elevation: defaults.upsample_elevation,
            interpolation: defaults.interpolation,
            extrapolate: defaults.extrapolate,
            gridsize: defaults.gridsize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_functions() {
        let value = Complex64::new(3.0, 4.0);
        assert_eq!(ConversionFunction::Identity.apply(value), value);
        assert_eq!(ConversionFunction::Abs.apply(value).re, 5.0);
        let db20 = ConversionFunction::DB20.apply(Complex64::new(10.0, 0.0));
        assert!((db20.re - 20.0).abs() < 1e-12);
        let db10 = ConversionFunction::DB10.apply(Complex64::new(100.0, 0.0));
        assert!((db10.re - 20.0).abs() < 1e-12);
    }

    #[test]
    fn log_conversions_floor_zero_modulus() {
        let zero = Complex64::new(0.0, 0.0);
        assert!((ConversionFunction::DB20.apply(zero).re + 300.0).abs() < 1e-9);
        assert!((ConversionFunction::DB10.apply(zero).re + 150.0).abs() < 1e-9);
        assert!(ConversionFunction::DB20.apply(zero).re.is_finite());
    }

    #[test]
    fn parse_settings() {
        assert_eq!("dB20".parse::<ConversionFunction>().unwrap(), ConversionFunction::DB20);
        assert_eq!("None".parse::<ConversionFunction>().unwrap(), ConversionFunction::Identity);
        assert_eq!("Vertical".parse::<AspectRange>().unwrap(), AspectRange::Vertical);
        assert!("diagonal".parse::<AspectRange>().is_err());
        assert!("dB30".parse::<ConversionFunction>().is_err());
    }

    #[test]
    fn defaults_seed_the_view() {
        let view = ViewState::from_defaults(&ImagingDefaults::default(), 1.0, 2.0, 3.0);
        assert_eq!(view.window, WindowKind::Flat);
        assert_eq!(view.window_size, 1024);
        assert_eq!(view.data_conversion_function, ConversionFunction::DB20);
        assert_eq!(view.gridsize, GridSize::Middle);
        assert!(view.extrapolate);
        assert_eq!(view.incident_wave_phi, 3.0);
    }
}
