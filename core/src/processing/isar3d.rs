use ndarray::{s, Axis};
use num_complex::Complex64;

use crate::math::fft::centered_axis;
use crate::math::matrix::MatrixHelper;
use crate::math::stats::StatsHelper;
use crate::prelude::{ImagingStage, RcsResult, StageInput};
use crate::processing::isar::{form_image, transform_length, AspectKeystone};
use crate::processing::product::IsarVolume;
use crate::processing::range::{down_range, require_frequencies};
use crate::telemetry::log::LogManager;

/// Down-range × cross-range × elevation volume over the full θ/φ sweep.
///
/// Cross-range comes from the φ sweep and elevation from `90° - θ`, so
/// positive elevation points toward θ = 0.
pub struct Isar3dStage {
    logger: LogManager,
}

impl Isar3dStage {
    pub fn new() -> Self {
        Self {
            logger: LogManager::scoped("isar_3d"),
        }
    }
}

impl Default for Isar3dStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagingStage for Isar3dStage {
    type Output = IsarVolume;

    fn form(&self, input: &StageInput<'_>) -> RcsResult<IsarVolume> {
        let view = input.view;
        let freqs = input.frequencies_hz();
        require_frequencies(&freqs, "ISAR 3D")?;

        // [freq, phi, elevation] with elevation ascending.
        let volume = input
            .table
            .values()
            .permuted_axes([0, 2, 1])
            .slice(s![.., .., ..;-1])
            .to_owned();
        let phis = input.table.phis().to_vec();
        let elevations: Vec<f64> = input.table.thetas().iter().rev().map(|t| 90.0 - t).collect();

        let range_len = transform_length(view.upsample_range, freqs.len());
        let (descriptor, down_range) = down_range(&freqs, range_len)?;
        let azimuth = AspectKeystone::new(&phis, descriptor.center_freq, "Horizontal")?;
        let elevation = AspectKeystone::new(&elevations, descriptor.center_freq, "Vertical")?;
        azimuth.log_sub_aperture(&self.logger, "Horizontal", phis.len());
        elevation.log_sub_aperture(&self.logger, "Vertical", elevations.len());
        let cross_len = transform_length(view.upsample_azimuth, azimuth.len());
        let elevation_len = transform_length(view.upsample_elevation, elevation.len());

        let keyed = azimuth.apply(&volume, Axis(1), &freqs, view.interpolation, view.extrapolate);
        let keyed = elevation.apply(&keyed, Axis(2), &freqs, view.interpolation, view.extrapolate);
        let window = MatrixHelper::outer3(
            view.window.normalized(freqs.len()).view(),
            view.window.normalized(azimuth.len()).view(),
            view.window.normalized(elevation.len()).view(),
        );
        let aperture = keyed * window.mapv(Complex64::from);
        let image = form_image(aperture, &[range_len, cross_len, elevation_len], &view);

        self.logger.record(&format!(
            "aperture {}x{}x{} -> {}x{}x{}, peak {:.4}, rms {:.4}",
            freqs.len(),
            azimuth.len(),
            elevation.len(),
            range_len,
            cross_len,
            elevation_len,
            StatsHelper::peak(image.iter()),
            StatsHelper::rms(image.iter())
        ));

        Ok(IsarVolume {
            conversion: view.data_conversion_function,
            down_range,
            cross_range: centered_axis(cross_len, azimuth.cross_range_step(cross_len)),
            elevation: centered_axis(elevation_len, elevation.cross_range_step(elevation_len)),
            values: image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::view::{ConversionFunction, ViewState};
    use crate::prelude::{ImagingDefaults, RcsError};
    use crate::processing::fixtures::{linspace, point_table};
    use crate::processing::product::Plane;

    fn view() -> ViewState {
        let mut view = ViewState::from_defaults(&ImagingDefaults::default(), 9.5, 90.0, 0.0);
        view.data_conversion_function = ConversionFunction::Abs;
        view.upsample_range = 32;
        view.upsample_azimuth = 32;
        view.upsample_elevation = 32;
        view
    }

    #[test]
    fn point_scatterer_lands_in_volume() {
        let table = point_table(
            &linspace(9.5, 10.5, 16),
            &linspace(87.0, 93.0, 9),
            &linspace(-3.0, 3.0, 9),
            &[(0.5, 0.3, 0.2, 1.0)],
        );
        let input = StageInput {
            table: &table,
            view: view(),
            frequency_scale: 1e9,
        };
        let volume = Isar3dStage::new().form(&input).unwrap();
        assert_eq!(volume.values.dim(), (32, 32, 32));

        let ((i, j, k), _) = volume
            .values
            .indexed_iter()
            .max_by(|a, b| a.1.re.total_cmp(&b.1.re))
            .unwrap();
        assert!((volume.down_range[i] - 0.5).abs() < 0.15);
        assert!((volume.cross_range[j] - 0.3).abs() < 0.15);
        assert!((volume.elevation[k] - 0.2).abs() < 0.15);

        let cut = volume.plane_cut(Plane::Xy, volume.elevation[k]);
        assert_eq!(cut.values.dim(), (32, 32));
        assert_eq!(cut.values[[i, j]], volume.values[[i, j, k]]);
    }

    #[test]
    fn zero_upsampling_keeps_native_size() {
        let table = point_table(&[9.9, 10.0, 10.1], &[89.0, 90.0, 91.0], &[-1.0, 0.0, 1.0], &[]);
        let mut view = view();
        view.upsample_range = 0;
        view.upsample_azimuth = 0;
        view.upsample_elevation = 0;
        let input = StageInput {
            table: &table,
            view,
            frequency_scale: 1e9,
        };
        let volume = Isar3dStage::new().form(&input).unwrap();
        assert_eq!(volume.values.dim(), (3, 3, 3));
    }

    #[test]
    fn flat_elevation_is_insufficient() {
        let table = point_table(&[9.9, 10.0], &[90.0], &[-1.0, 1.0], &[]);
        let input = StageInput {
            table: &table,
            view: view(),
            frequency_scale: 1e9,
        };
        assert!(matches!(
            Isar3dStage::new().form(&input),
            Err(RcsError::InsufficientSamples(_))
        ));
    }
}
