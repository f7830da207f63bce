use serde::{Deserialize, Serialize};

use crate::dataset::store::SampleTable;
use crate::dataset::view::{AspectRange, ConversionFunction, GridSize, Interpolation, ViewState};
use crate::math::stats::StatsHelper;
use crate::math::window::WindowKind;

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Default policy applied to a freshly loaded dataset's view state.
///
/// Every field maps one-to-one onto a [`crate::ViewState`] field, so tests can
/// load the same sample store under different starting policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagingDefaults {
    /// Tapering kernel, `Flat`.
    pub window: WindowKind,
    /// Range-profile transform length, 1024.
    pub window_size: usize,
    /// Magnitude conversion, `dB20`.
    pub data_conversion_function: ConversionFunction,
    /// Sweep axis used by waterfall and 2D ISAR, `Horizontal`.
    pub aspect_range: AspectRange,
    /// Down-range transform length for ISAR, 512.
    pub upsample_range: usize,
    /// Cross-range transform length for ISAR, 64.
    pub upsample_azimuth: usize,
    /// Elevation transform length for 3D ISAR, 64.
    pub upsample_elevation: usize,
    /// Aspect resampling mode, `linear`.
    pub interpolation: Interpolation,
    /// Extrapolate outside the observed aspect span, `true`.
    pub extrapolate: bool,
    /// Placement of measured data inside the padded aperture, `Middle`.
    pub gridsize: GridSize,
}

impl Default for ImagingDefaults {
    fn default() -> Self {
        Self {
            window: WindowKind::Flat,
            window_size: 1024,
            data_conversion_function: ConversionFunction::DB20,
            aspect_range: AspectRange::Horizontal,
            upsample_range: 512,
            upsample_azimuth: 64,
            upsample_elevation: 64,
            interpolation: Interpolation::Linear,
            extrapolate: true,
            gridsize: GridSize::Middle,
        }
    }
}

/// Common error type for loading, domain construction and image formation.
#[derive(thiserror::Error, Debug)]
pub enum RcsError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("invalid value: {0}")]
    Value(String),
    #[error("insufficient samples: {0}")]
    InsufficientSamples(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type RcsResult<T> = Result<T, RcsError>;

/// Immutable inputs of one product computation: the raw table plus a view
/// snapshot taken at call time.
#[derive(Debug, Clone, Copy)]
pub struct StageInput<'a> {
    pub table: &'a SampleTable,
    pub view: ViewState,
    /// Hz per unit of the table's frequency axis.
    pub frequency_scale: f64,
}

impl StageInput<'_> {
    pub fn frequencies_hz(&self) -> Vec<f64> {
        self.table
            .frequencies()
            .iter()
            .map(|f| f * self.frequency_scale)
            .collect()
    }

    /// Index of the active θ within the table.
    pub fn theta_index(&self) -> usize {
        let thetas = self.table.thetas();
        StatsHelper::nearest_index(thetas.as_slice().unwrap_or_default(), self.view.incident_wave_theta)
            .unwrap_or(0)
    }

    /// Index of the active φ within the table.
    pub fn phi_index(&self) -> usize {
        let phis = self.table.phis();
        StatsHelper::nearest_index(phis.as_slice().unwrap_or_default(), self.view.incident_wave_phi)
            .unwrap_or(0)
    }
}

/// A product former: a pure function of a [`StageInput`].
pub trait ImagingStage {
    type Output;

    fn form(&self, input: &StageInput<'_>) -> RcsResult<Self::Output>;
}
