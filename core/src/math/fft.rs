use std::sync::Arc;

use ndarray::{Array, Array1, Axis, Dimension};
use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};

/// Helper that wraps an inverse `rustfft` plan for reuse across lanes.
pub struct FftHelper {
    fft: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex64>,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_inverse(size);
        let scratch = vec![Complex64::zero(); fft.get_inplace_scratch_len()];
        Self { fft, scratch }
    }

    pub fn len(&self) -> usize {
        self.fft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// In-place inverse transform normalized by `1/N`.
    pub fn inverse(&mut self, buffer: &mut [Complex64]) {
        if buffer.is_empty() {
            return;
        }
        self.fft.process_with_scratch(buffer, &mut self.scratch);
        let scale = 1.0 / buffer.len() as f64;
        buffer.iter_mut().for_each(|value| *value *= scale);
    }

    /// Applies [`FftHelper::inverse`] to every lane of `data` along `axis`.
    ///
    /// The lane length must match the planned size.
    pub fn inverse_axis<D: Dimension>(&mut self, data: &mut Array<Complex64, D>, axis: Axis) {
        let mut lane_buffer = vec![Complex64::zero(); self.len()];
        for mut lane in data.lanes_mut(axis) {
            lane_buffer
                .iter_mut()
                .zip(lane.iter())
                .for_each(|(dst, src)| *dst = *src);
            self.inverse(&mut lane_buffer);
            lane.iter_mut()
                .zip(lane_buffer.iter())
                .for_each(|(dst, src)| *dst = *src);
        }
    }
}

/// Rotates every lane along `axis` so the zero bin lands at index `n / 2`.
pub fn fftshift_axis<D: Dimension>(data: &mut Array<Complex64, D>, axis: Axis) {
    let length = data.len_of(axis);
    if length < 2 {
        return;
    }
    let mut lane_buffer = vec![Complex64::zero(); length];
    for mut lane in data.lanes_mut(axis) {
        lane_buffer
            .iter_mut()
            .zip(lane.iter())
            .for_each(|(dst, src)| *dst = *src);
        lane_buffer.rotate_right(length / 2);
        lane.iter_mut()
            .zip(lane_buffer.iter())
            .for_each(|(dst, src)| *dst = *src);
    }
}

/// Axis matching a shifted transform: `(k - n/2) * step` for `k` in `0..n`.
pub fn centered_axis(length: usize, step: f64) -> Array1<f64> {
    let half = (length / 2) as f64;
    Array1::from_iter((0..length).map(|k| (k as f64 - half) * step))
}
