use ndarray::{s, Array1, ArrayView1, Axis};
use num_complex::Complex64;

use crate::dataset::view::{ConversionFunction, ViewState};
use crate::domain::DomainDescriptor;
use crate::math::fft::{centered_axis, fftshift_axis, FftHelper};
use crate::math::resample::{GridSize, Resampler};
use crate::math::stats::StatsHelper;
use crate::prelude::{ImagingStage, RcsError, RcsResult, StageInput};
use crate::processing::product::RangeProfile;
use crate::telemetry::log::LogManager;

/// Windowed, padded inverse transform of one frequency sweep.
///
/// Shared by the range profile and every row of the waterfall.
pub(crate) struct RangeCompressor {
    window: Array1<f64>,
    size: usize,
    fft: FftHelper,
    conversion: ConversionFunction,
}

impl RangeCompressor {
    pub(crate) fn new(num_freq: usize, view: &ViewState) -> Self {
        let size = view.window_size.max(1);
        Self {
            window: view.window.normalized(num_freq),
            size,
            fft: FftHelper::new(size),
            conversion: view.data_conversion_function,
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn compress(&mut self, sweep: ArrayView1<Complex64>) -> Array1<Complex64> {
        let windowed: Vec<Complex64> = sweep
            .iter()
            .zip(self.window.iter())
            .map(|(value, weight)| *value * *weight)
            .collect();
        let mut padded = Resampler::pad(&windowed, self.size, GridSize::Inside);
        self.fft.inverse(&mut padded);

        let measured = windowed.len().min(self.size).max(1);
        let gain = self.size as f64 / measured as f64;
        let mut profile = Array1::from(padded);
        profile.mapv_inplace(|value| value * gain);
        fftshift_axis(&mut profile, Axis(0));
        profile.mapv(|value| self.conversion.apply(value))
    }
}

/// Frequency descriptor and centred down-range axis for an `fft_len`-point
/// transform of `freqs_hz`.
pub(crate) fn down_range(
    freqs_hz: &[f64],
    fft_len: usize,
) -> RcsResult<(DomainDescriptor, Array1<f64>)> {
    let descriptor = DomainDescriptor::from_frequency(freqs_hz)?;
    let period = descriptor
        .range_period
        .ok_or_else(|| RcsError::Configuration("range period unavailable".into()))?;
    let axis = centered_axis(fft_len, period / fft_len as f64);
    Ok((descriptor, axis))
}

pub(crate) fn require_frequencies(freqs_hz: &[f64], product: &str) -> RcsResult<()> {
    if freqs_hz.len() < 2 {
        return Err(RcsError::InsufficientSamples(format!(
            "{product} needs at least two frequencies, found {}",
            freqs_hz.len()
        )));
    }
    Ok(())
}

/// Range profile at the active θ/φ.
pub struct RangeProfileStage {
    logger: LogManager,
}

impl RangeProfileStage {
    pub fn new() -> Self {
        Self {
            logger: LogManager::scoped("range_profile"),
        }
    }
}

impl Default for RangeProfileStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagingStage for RangeProfileStage {
    type Output = RangeProfile;

    fn form(&self, input: &StageInput<'_>) -> RcsResult<RangeProfile> {
        let freqs = input.frequencies_hz();
        require_frequencies(&freqs, "range profile")?;

        let (theta, phi) = (input.theta_index(), input.phi_index());
        let values = input.table.values();
        let sweep = values.slice(s![.., theta, phi]);

        let mut compressor = RangeCompressor::new(freqs.len(), &input.view);
        let profile = compressor.compress(sweep);
        let (_, ranges) = down_range(&freqs, compressor.size())?;

        self.logger.record(&format!(
            "{} bins from {} frequencies, peak {:.4}, rms {:.4}",
            profile.len(),
            freqs.len(),
            StatsHelper::peak(profile.iter()),
            StatsHelper::rms(profile.iter())
        ));

        Ok(RangeProfile {
            conversion: input.view.data_conversion_function,
            ranges,
            values: profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{ImagingDefaults, SPEED_OF_LIGHT};
    use crate::processing::fixtures::{linspace, point_table};

    fn view() -> ViewState {
        let mut view = ViewState::from_defaults(&ImagingDefaults::default(), 9.5, 90.0, 0.0);
        view.data_conversion_function = ConversionFunction::Abs;
        view
    }

    #[test]
    fn point_scatterer_peaks_at_its_range() {
        let table = point_table(
            &linspace(9.5, 10.5, 64),
            &[90.0],
            &[0.0],
            &[(2.0, 0.0, 0.0, 1.0)],
        );
        let input = StageInput {
            table: &table,
            view: view(),
            frequency_scale: 1e9,
        };
        let profile = RangeProfileStage::new().form(&input).unwrap();
        assert_eq!(profile.len(), 1024);
        assert_eq!(profile.ranges.len(), 1024);

        let (peak_index, peak) = profile
            .values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.re.total_cmp(&b.1.re))
            .unwrap();
        let resolution = SPEED_OF_LIGHT / (2.0 * 64.0 * (1e9 / 63.0));
        assert!((profile.ranges[peak_index] - 2.0).abs() < resolution);
        assert!(peak.re > 0.95 && peak.re < 1.01, "peak {}", peak.re);
    }

    #[test]
    fn length_follows_window_size_not_sample_count() {
        let table = point_table(&[9.9, 10.0, 10.1], &[80.0, 90.0, 100.0], &[0.0], &[(0.3, 0.0, 0.0, 1.0)]);
        let mut view = view();
        let stage = RangeProfileStage::new();

        let profile = stage
            .form(&StageInput { table: &table, view, frequency_scale: 1e9 })
            .unwrap();
        assert_eq!(profile.len(), 1024);

        view.window_size = 2;
        let profile = stage
            .form(&StageInput { table: &table, view, frequency_scale: 1e9 })
            .unwrap();
        assert_eq!(profile.len(), 2);
    }

    #[test]
    fn single_frequency_is_insufficient() {
        let table = point_table(&[10.0], &[90.0], &[0.0], &[(0.0, 0.0, 0.0, 1.0)]);
        let input = StageInput {
            table: &table,
            view: view(),
            frequency_scale: 1e9,
        };
        assert!(matches!(
            RangeProfileStage::new().form(&input),
            Err(RcsError::InsufficientSamples(_))
        ));
    }
}
