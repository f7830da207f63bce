use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::prelude::SPEED_OF_LIGHT;

/// Ideal isotropic point scatterer; position in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointScatterer {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub amplitude: f64,
}

impl PointScatterer {
    pub fn new(x: f64, y: f64, z: f64, amplitude: f64) -> Self {
        Self { x, y, z, amplitude }
    }
}

/// Two-way response of `scatterers` for a radar looking from (θ, φ) in
/// degrees; a scatterer at down-range `r` contributes `A·exp(-j·4πf·r/c)`.
pub fn monostatic_response(
    freq_hz: f64,
    theta: f64,
    phi: f64,
    scatterers: &[PointScatterer],
) -> Complex64 {
    let (theta, phi) = (theta.to_radians(), phi.to_radians());
    let look = [theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos()];
    let wavenumber = 4.0 * PI * freq_hz / SPEED_OF_LIGHT;
    scatterers
        .iter()
        .map(|s| {
            let projected = s.x * look[0] + s.y * look[1] + s.z * look[2];
            Complex64::from_polar(s.amplitude, -wavenumber * projected)
        })
        .sum()
}
