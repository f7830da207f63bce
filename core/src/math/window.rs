use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::prelude::RcsError;

/// Tapering kernels applied before every inverse transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowKind {
    Flat,
    Hamming,
    Hann,
}

impl WindowKind {
    pub fn name(self) -> &'static str {
        match self {
            WindowKind::Flat => "Flat",
            WindowKind::Hamming => "Hamming",
            WindowKind::Hann => "Hann",
        }
    }

    /// Symmetric kernel of `length` samples.
    pub fn kernel(self, length: usize) -> Array1<f64> {
        if length <= 1 {
            return Array1::ones(length);
        }
        let denominator = (length - 1) as f64;
        let cosine_taper = |a0: f64, a1: f64| {
            Array1::from_iter(
                (0..length).map(|n| a0 - a1 * (2.0 * PI * n as f64 / denominator).cos()),
            )
        };
        match self {
            WindowKind::Flat => Array1::ones(length),
            WindowKind::Hamming => cosine_taper(0.54, 0.46),
            WindowKind::Hann => cosine_taper(0.5, 0.5),
        }
    }

    /// Kernel scaled to unit mean so a point scatterer keeps its amplitude.
    pub fn normalized(self, length: usize) -> Array1<f64> {
        let kernel = self.kernel(length);
        let sum = kernel.sum();
        if sum <= f64::EPSILON {
            return kernel;
        }
        kernel * (length as f64 / sum)
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowKind {
    type Err = RcsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flat" | "rectangular" => Ok(WindowKind::Flat),
            "hamming" => Ok(WindowKind::Hamming),
            "hann" | "hanning" => Ok(WindowKind::Hann),
            _ => Err(RcsError::Value(format!("unknown window '{value}'"))),
        }
    }
}
