use std::f64::consts::PI;

use ndarray::{s, Array, Array1, Array2, Axis, Dimension, RemoveAxis};
use num_complex::Complex64;

use crate::dataset::view::{AspectRange, Interpolation, ViewState};
use crate::math::fft::{centered_axis, fftshift_axis, FftHelper};
use crate::math::matrix::MatrixHelper;
use crate::math::resample::Resampler;
use crate::math::stats::StatsHelper;
use crate::prelude::{ImagingStage, RcsError, RcsResult, StageInput, SPEED_OF_LIGHT};
use crate::processing::product::IsarImage;
use crate::processing::range::{down_range, require_frequencies};
use crate::telemetry::log::LogManager;

/// Resamples an angular sweep onto a uniform cross-range wavenumber grid.
///
/// A sample at aspect offset `Δ` and frequency `f` sits at
/// `ky = (4πf/c)·sin(Δ)`. The target grid is uniform in `ky` over the span
/// seen at the centre frequency, so rows below it need extrapolation at the
/// edges and rows above it are clipped.
///
/// `sin` is only monotonic over `|Δ| <= 90°`, so wider sweeps keep the
/// centred sub-aperture inside that range.
pub(crate) struct AspectKeystone {
    /// Index of the first kept input angle.
    start: usize,
    /// `sin(Δ)` of every kept angle, ascending.
    positions: Vec<f64>,
    /// Uniform `sin(Δ)` grid at the centre frequency.
    grid: Vec<f64>,
    center_freq: f64,
    /// Cross-range wavenumber spacing of the grid, rad/m.
    ky_step: f64,
}

impl AspectKeystone {
    pub(crate) fn new(angles_deg: &[f64], center_freq: f64, axis_name: &str) -> RcsResult<Self> {
        let insufficient = |count: usize| {
            RcsError::InsufficientSamples(format!(
                "{axis_name} sweep needs at least two angles, found {count}"
            ))
        };
        let count = angles_deg.len();
        if count < 2 {
            return Err(insufficient(count));
        }
        let center = (angles_deg[0] + angles_deg[count - 1]) / 2.0;
        let within = |a: &f64| (a - center).abs() <= MAX_OFFSET_DEG + 1e-9;
        let start = angles_deg.iter().position(|a| within(a)).unwrap_or(count);
        let kept = angles_deg[start..].iter().take_while(|a| within(*a)).count();
        if kept < 2 {
            return Err(insufficient(kept));
        }

        let positions: Vec<f64> = angles_deg[start..start + kept]
            .iter()
            .map(|a| (a - center).clamp(-MAX_OFFSET_DEG, MAX_OFFSET_DEG).to_radians().sin())
            .collect();
        let grid = Resampler::uniform_grid(positions[0], positions[kept - 1], kept);
        let center_wavenumber = 4.0 * PI * center_freq / SPEED_OF_LIGHT;
        let ky_step = center_wavenumber * (grid[1] - grid[0]);
        Ok(Self {
            start,
            positions,
            grid,
            center_freq,
            ky_step,
        })
    }

    /// Number of kept angles, which is also the resampled lane length.
    pub(crate) fn len(&self) -> usize {
        self.grid.len()
    }

    /// Input angle range feeding the grid.
    pub(crate) fn kept(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len()
    }

    /// Pixel spacing of an `fft_len`-point cross-range transform, metres.
    pub(crate) fn cross_range_step(&self, fft_len: usize) -> f64 {
        2.0 * PI / (self.ky_step * fft_len as f64)
    }

    /// Resamples every lane along `axis`; axis 0 of `data` must be frequency.
    /// The output holds [`AspectKeystone::len`] samples along `axis`.
    pub(crate) fn apply<D>(
        &self,
        data: &Array<Complex64, D>,
        axis: Axis,
        freqs_hz: &[f64],
        mode: Interpolation,
        extrapolate: bool,
    ) -> Array<Complex64, D>
    where
        D: Dimension + RemoveAxis,
    {
        let lane_axis = Axis(axis.index() - 1);
        let mut shape = data.raw_dim();
        shape[axis.index()] = self.len();
        let mut resampled = Array::zeros(shape);
        for ((source, mut target), &freq) in data
            .axis_iter(Axis(0))
            .zip(resampled.axis_iter_mut(Axis(0)))
            .zip(freqs_hz)
        {
            let ratio = self.center_freq / freq;
            let targets: Vec<f64> = self.grid.iter().map(|g| g * ratio).collect();
            for (source_lane, mut target_lane) in source
                .lanes(lane_axis)
                .into_iter()
                .zip(target.lanes_mut(lane_axis))
            {
                let samples: Vec<Complex64> =
                    source_lane.iter().skip(self.start).take(self.len()).copied().collect();
                let lane = Resampler::interpolate(
                    &self.positions,
                    &samples,
                    &targets,
                    mode,
                    extrapolate,
                );
                target_lane
                    .iter_mut()
                    .zip(lane)
                    .for_each(|(dst, src)| *dst = src);
            }
        }
        resampled
    }

    /// Debug line naming the kept sub-aperture when the sweep was cut.
    pub(crate) fn log_sub_aperture(&self, logger: &LogManager, axis_name: &str, total: usize) {
        if self.len() < total {
            let kept = self.kept();
            logger.debug(&format!(
                "{axis_name} sweep of {total} angles imaged over indices {}..{}",
                kept.start, kept.end
            ));
        }
    }
}

/// Largest aspect offset from the sweep centre that is imaged, degrees.
const MAX_OFFSET_DEG: f64 = 90.0;

/// Pads each axis per `gridsize`, inverse-transforms and shifts it with a
/// `N/n` gain, then applies the magnitude conversion.
pub(crate) fn form_image<D: Dimension>(
    aperture: Array<Complex64, D>,
    lengths: &[usize],
    view: &ViewState,
) -> Array<Complex64, D> {
    let mut image = aperture;
    for (index, &length) in lengths.iter().enumerate() {
        let axis = Axis(index);
        let measured = image.len_of(axis).max(1);
        image = Resampler::pad_axis(&image, axis, length, view.gridsize);
        FftHelper::new(length).inverse_axis(&mut image, axis);
        let gain = length as f64 / measured as f64;
        image.mapv_inplace(|value| value * gain);
        fftshift_axis(&mut image, axis);
    }
    let conversion = view.data_conversion_function;
    image.mapv_inplace(|value| conversion.apply(value));
    image
}

/// Transform length along one axis: the requested upsampling, never fewer
/// than the measured samples.
pub(crate) fn transform_length(upsample: usize, measured: usize) -> usize {
    upsample.max(measured)
}

/// Down-range × cross-range image over the configured sweep axis.
pub struct Isar2dStage {
    logger: LogManager,
}

impl Isar2dStage {
    pub fn new() -> Self {
        Self {
            logger: LogManager::scoped("isar_2d"),
        }
    }
}

impl Default for Isar2dStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagingStage for Isar2dStage {
    type Output = IsarImage;

    fn form(&self, input: &StageInput<'_>) -> RcsResult<IsarImage> {
        let view = input.view;
        let freqs = input.frequencies_hz();
        require_frequencies(&freqs, "ISAR 2D")?;

        let values = input.table.values();
        let (angles, slice): (Array1<f64>, Array2<Complex64>) = match view.aspect_range {
            AspectRange::Horizontal => (
                input.table.phis().to_owned(),
                values.slice(s![.., input.theta_index(), ..]).to_owned(),
            ),
            AspectRange::Vertical => (
                input.table.thetas().to_owned(),
                values.slice(s![.., .., input.phi_index()]).to_owned(),
            ),
        };

        let range_len = transform_length(view.upsample_range, freqs.len());
        let (descriptor, down_range) = down_range(&freqs, range_len)?;
        let keystone = AspectKeystone::new(
            angles.as_slice().unwrap_or_default(),
            descriptor.center_freq,
            view.aspect_range.name(),
        )?;
        keystone.log_sub_aperture(&self.logger, view.aspect_range.name(), angles.len());
        let cross_len = transform_length(view.upsample_azimuth, keystone.len());

        let keyed = keystone.apply(&slice, Axis(1), &freqs, view.interpolation, view.extrapolate);
        let window = MatrixHelper::outer(
            view.window.normalized(freqs.len()).view(),
            view.window.normalized(keystone.len()).view(),
        );
        let aperture = keyed * window.mapv(Complex64::from);
        let image = form_image(aperture, &[range_len, cross_len], &view);

        self.logger.record(&format!(
            "{} aperture {}x{} -> {}x{}, peak {:.4}, rms {:.4}",
            view.aspect_range,
            freqs.len(),
            keystone.len(),
            range_len,
            cross_len,
            StatsHelper::peak(image.iter()),
            StatsHelper::rms(image.iter())
        ));

        Ok(IsarImage {
            conversion: view.data_conversion_function,
            down_range,
            cross_range: centered_axis(cross_len, keystone.cross_range_step(cross_len)),
            values: image,
        })
    }
}
