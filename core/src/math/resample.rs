use std::fmt;
use std::str::FromStr;

use ndarray::{Array, Axis, Dimension, Slice};
use num_complex::Complex64;
use rustfft::num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::prelude::RcsError;

/// Interpolation mode for aspect resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Linear,
    Nearest,
}

impl Interpolation {
    pub fn name(self) -> &'static str {
        match self {
            Interpolation::Linear => "linear",
            Interpolation::Nearest => "nearest",
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interpolation {
    type Err = RcsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Interpolation::Linear),
            "nearest" => Ok(Interpolation::Nearest),
            _ => Err(RcsError::Value(format!("unknown interpolation '{value}'"))),
        }
    }
}

/// Where the measured block sits inside a padded aperture.
///
/// `Inside` keeps it at the leading edge, `Outside` at the trailing edge and
/// `Middle` centres it. Placement moves the phase origin of the transformed
/// image; magnitudes are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridSize {
    Inside,
    Outside,
    Middle,
}

impl GridSize {
    pub fn name(self) -> &'static str {
        match self {
            GridSize::Inside => "Inside",
            GridSize::Outside => "Outside",
            GridSize::Middle => "Middle",
        }
    }

    /// `(source_start, destination_start, count)` for moving `available`
    /// samples into `length` slots.
    fn offsets(self, available: usize, length: usize) -> (usize, usize, usize) {
        if length >= available {
            let slack = length - available;
            let dst = match self {
                GridSize::Inside => 0,
                GridSize::Outside => slack,
                GridSize::Middle => slack / 2,
            };
            (0, dst, available)
        } else {
            let excess = available - length;
            let src = match self {
                GridSize::Inside => 0,
                GridSize::Outside => excess,
                GridSize::Middle => excess / 2,
            };
            (src, 0, length)
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GridSize {
    type Err = RcsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inside" => Ok(GridSize::Inside),
            "outside" => Ok(GridSize::Outside),
            "middle" => Ok(GridSize::Middle),
            _ => Err(RcsError::Value(format!("unknown gridsize '{value}'"))),
        }
    }
}

/// Uniform-grid resampling and zero padding.
pub struct Resampler;

impl Resampler {
    /// `count` evenly spaced points from `start` to `stop` inclusive.
    pub fn uniform_grid(start: f64, stop: f64, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (count - 1) as f64;
                (0..count).map(|i| start + step * i as f64).collect()
            }
        }
    }

    /// Resamples `samples` observed at ascending `positions` onto `target`.
    ///
    /// Targets outside the observed span are extrapolated when `extrapolate`
    /// is set (linearly from the end segment, or by repeating the edge sample
    /// in nearest mode) and filled with zero otherwise.
    pub fn interpolate(
        positions: &[f64],
        samples: &[Complex64],
        target: &[f64],
        mode: Interpolation,
        extrapolate: bool,
    ) -> Vec<Complex64> {
        let count = positions.len().min(samples.len());
        if count == 0 {
            return vec![Complex64::zero(); target.len()];
        }
        let positions = &positions[..count];
        let samples = &samples[..count];
        let first = positions[0];
        let last = positions[count - 1];
        let tolerance = 1e-9 * (last - first).abs().max(first.abs()).max(f64::MIN_POSITIVE);

        target
            .iter()
            .map(|&t| {
                let outside = t < first - tolerance || t > last + tolerance;
                if outside && !extrapolate {
                    return Complex64::zero();
                }
                if count == 1 {
                    return samples[0];
                }
                let segment = positions
                    .partition_point(|&p| p <= t)
                    .clamp(1, count - 1);
                let (x0, x1) = (positions[segment - 1], positions[segment]);
                let (y0, y1) = (samples[segment - 1], samples[segment]);
                match mode {
                    Interpolation::Nearest => {
                        if (t - x0).abs() <= (x1 - t).abs() {
                            y0
                        } else {
                            y1
                        }
                    }
                    Interpolation::Linear => {
                        let span = x1 - x0;
                        if span.abs() <= f64::EPSILON {
                            return y0;
                        }
                        let weight = (t - x0) / span;
                        y0 + (y1 - y0) * weight
                    }
                }
            })
            .collect()
    }

    /// Zero-pads or truncates a 1D sequence to `length`.
    pub fn pad(samples: &[Complex64], length: usize, placement: GridSize) -> Vec<Complex64> {
        let mut padded = vec![Complex64::zero(); length];
        let (src, dst, count) = placement.offsets(samples.len(), length);
        padded[dst..dst + count].copy_from_slice(&samples[src..src + count]);
        padded
    }

    /// Zero-pads or truncates `data` along `axis` to `length`.
    pub fn pad_axis<D: Dimension>(
        data: &Array<Complex64, D>,
        axis: Axis,
        length: usize,
        placement: GridSize,
    ) -> Array<Complex64, D> {
        let mut shape = data.raw_dim();
        shape[axis.index()] = length;
        let mut padded = Array::zeros(shape);
        let (src, dst, count) = placement.offsets(data.len_of(axis), length);
        padded
            .slice_axis_mut(axis, Slice::from(dst..dst + count))
            .assign(&data.slice_axis(axis, Slice::from(src..src + count)));
        padded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn linear_interpolation_between_samples() {
        let out = Resampler::interpolate(
            &[0.0, 1.0, 3.0],
            &[c(0.0), c(2.0), c(6.0)],
            &[0.5, 2.0],
            Interpolation::Linear,
            true,
        );
        assert!((out[0].re - 1.0).abs() < 1e-12);
        assert!((out[1].re - 4.0).abs() < 1e-12);
    }

    #[test]
    fn nearest_interpolation_picks_closer_sample() {
        let out = Resampler::interpolate(
            &[0.0, 1.0],
            &[c(5.0), c(7.0)],
            &[0.2, 0.8],
            Interpolation::Nearest,
            false,
        );
        assert_eq!(out, vec![c(5.0), c(7.0)]);
    }

    #[test]
    fn outside_span_is_zero_without_extrapolation() {
        let out = Resampler::interpolate(
            &[0.0, 1.0],
            &[c(1.0), c(2.0)],
            &[-1.0, 2.0, 1.0],
            Interpolation::Linear,
            false,
        );
        assert_eq!(out[0], c(0.0));
        assert_eq!(out[1], c(0.0));
        assert_eq!(out[2], c(2.0));
    }

    #[test]
    fn outside_span_extrapolates_linearly() {
        let out = Resampler::interpolate(
            &[0.0, 1.0],
            &[c(1.0), c(2.0)],
            &[-1.0, 3.0],
            Interpolation::Linear,
            true,
        );
        assert!((out[0].re - 0.0).abs() < 1e-12);
        assert!((out[1].re - 4.0).abs() < 1e-12);
    }

    #[test]
    fn pad_placements() {
        let data = [c(1.0), c(2.0)];
        let inside = Resampler::pad(&data, 4, GridSize::Inside);
        let outside = Resampler::pad(&data, 4, GridSize::Outside);
        let middle = Resampler::pad(&data, 4, GridSize::Middle);
        assert_eq!(inside, vec![c(1.0), c(2.0), c(0.0), c(0.0)]);
        assert_eq!(outside, vec![c(0.0), c(0.0), c(1.0), c(2.0)]);
        assert_eq!(middle, vec![c(0.0), c(1.0), c(2.0), c(0.0)]);
    }

    #[test]
    fn pad_truncates_when_shorter() {
        let data = [c(1.0), c(2.0), c(3.0), c(4.0)];
        assert_eq!(Resampler::pad(&data, 2, GridSize::Inside), vec![c(1.0), c(2.0)]);
        assert_eq!(Resampler::pad(&data, 2, GridSize::Outside), vec![c(3.0), c(4.0)]);
        assert_eq!(Resampler::pad(&data, 2, GridSize::Middle), vec![c(2.0), c(3.0)]);
    }

    #[test]
    fn pad_axis_only_touches_requested_axis() {
        let data = Array2::from_elem((2, 3), c(1.0));
        let padded = Resampler::pad_axis(&data, Axis(1), 6, GridSize::Outside);
        assert_eq!(padded.dim(), (2, 6));
        assert_eq!(padded[[0, 2]], c(0.0));
        assert_eq!(padded[[1, 3]], c(1.0));
    }

    #[test]
    fn uniform_grid_endpoints() {
        let grid = Resampler::uniform_grid(-1.0, 1.0, 5);
        assert_eq!(grid, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    }
}
