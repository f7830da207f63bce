use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ndarray::{s, Array1, Array2, ArrayView1};
use num_complex::Complex64;

use crate::dataset::metadata::{Metadata, ModelPart};
use crate::dataset::store::{SampleTable, FREQ_COLUMN, PHI_COLUMN, THETA_COLUMN};
use crate::dataset::view::{ViewState, WindowKind};
use crate::domain::units::{convert_units, parse_quantity, unit_scale, UnitFamily};
use crate::domain::DomainDescriptor;
use crate::math::stats::StatsHelper;
use crate::prelude::{ImagingDefaults, ImagingStage, RcsError, RcsResult, StageInput};
use crate::processing::product::{
    Isar3dView, IsarImage, IsarVolume, Plane, RangeProfile, RcsCut, RcsMap, Waterfall,
};
use crate::processing::{Isar2dStage, Isar3dStage, RangeProfileStage, WaterfallStage};
use crate::telemetry::log::LogManager;

/// A monostatic RCS solution: immutable metadata and samples plus the view
/// state every product is formed from.
///
/// Products are recomputed from a snapshot of the view on every call.
pub struct RcsDataset {
    input_file: PathBuf,
    metadata: Metadata,
    table: Option<SampleTable>,
    /// Hz per unit of the stored frequency axis.
    frequency_scale: f64,
    view: ViewState,
    logger: LogManager,
}

impl RcsDataset {
    pub fn load<P: AsRef<Path>>(path: P) -> RcsResult<Self> {
        Self::load_with(path, ImagingDefaults::default())
    }

    /// Loads the metadata at `path` and the sample store it references,
    /// resolved relative to the metadata file.
    pub fn load_with<P: AsRef<Path>>(path: P, defaults: ImagingDefaults) -> RcsResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(RcsError::NotFound(format!(
                "JSON file does not exist.: {}",
                path.display()
            )));
        }
        let metadata = Metadata::read(path)
            .map_err(|err| RcsError::Validation(format!("{}: {err}", path.display())))?;
        let frequency_scale = match metadata.frequency_units.as_deref() {
            None => 1.0,
            Some(unit) => match unit_scale(unit) {
                Some((UnitFamily::Frequency, scale)) => scale,
                _ => {
                    return Err(RcsError::Validation(format!(
                        "'{unit}' is not a frequency unit"
                    )))
                }
            },
        };

        let table = match metadata.monostatic_file.as_deref() {
            None => None,
            Some(file) => {
                let store = path.parent().unwrap_or_else(|| Path::new("")).join(file);
                let table = SampleTable::read_csv(&store).map_err(|err| {
                    RcsError::Validation(format!(
                        "Monostatic file is invalid.: {}: {err}",
                        store.display()
                    ))
                })?;
                Some(table)
            }
        };

        let first = |axis: Option<f64>| axis.unwrap_or(0.0);
        let view = ViewState::from_defaults(
            &defaults,
            first(table.as_ref().and_then(|t| t.frequencies().first().copied())),
            first(table.as_ref().and_then(|t| t.thetas().first().copied())),
            first(table.as_ref().and_then(|t| t.phis().first().copied())),
        );

        let logger = LogManager::scoped("dataset");
        match &table {
            Some(table) => logger.record(&format!(
                "loaded '{}' channel {}: {} frequencies, {} theta, {} phi",
                metadata.solution,
                table.name(),
                table.frequencies().len(),
                table.thetas().len(),
                table.phis().len()
            )),
            None => logger.record(&format!(
                "loaded '{}' without a sample store",
                metadata.solution
            )),
        }

        Ok(Self {
            input_file: path.to_path_buf(),
            metadata,
            table,
            frequency_scale,
            view,
            logger,
        })
    }

    /// Polarization channel of the sample store, empty without one.
    pub fn name(&self) -> &str {
        self.table.as_ref().map_or("", |t| t.name())
    }

    pub fn solution(&self) -> &str {
        &self.metadata.solution
    }

    pub fn input_file(&self) -> &Path {
        &self.input_file
    }

    pub fn frequency_units(&self) -> Option<&str> {
        self.metadata.frequency_units.as_deref()
    }

    pub fn model_units(&self) -> Option<&str> {
        self.metadata.model_units.as_deref()
    }

    pub fn model_info(&self) -> &BTreeMap<String, ModelPart> {
        &self.metadata.model_info
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn raw_data(&self) -> Option<&SampleTable> {
        self.table.as_ref()
    }

    pub fn frequencies(&self) -> Array1<f64> {
        self.axis(|t| t.frequencies().to_owned())
    }

    pub fn available_incident_wave_theta(&self) -> Array1<f64> {
        self.axis(|t| t.thetas().to_owned())
    }

    pub fn available_incident_wave_phi(&self) -> Array1<f64> {
        self.axis(|t| t.phis().to_owned())
    }

    fn axis(&self, pick: impl Fn(&SampleTable) -> Array1<f64>) -> Array1<f64> {
        self.table.as_ref().map_or_else(|| Array1::zeros(0), pick)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn frequency(&self) -> f64 {
        self.view.frequency
    }

    pub fn incident_wave_theta(&self) -> f64 {
        self.view.incident_wave_theta
    }

    pub fn incident_wave_phi(&self) -> f64 {
        self.view.incident_wave_phi
    }

    /// Selects the sampled frequency nearest `value` and returns it.
    pub fn set_frequency(&mut self, value: f64) -> f64 {
        self.view.frequency =
            self.select("frequency", &self.frequencies(), value, self.view.frequency);
        self.view.frequency
    }

    /// Selects a frequency given with units, e.g. `"10GHz"`; a bare number is
    /// in the dataset's frequency units.
    pub fn set_frequency_str(&mut self, text: &str) -> RcsResult<f64> {
        let target = self.frequency_units().unwrap_or("Hz").to_string();
        let value = parse_quantity(text, &target)?;
        Ok(self.set_frequency(value))
    }

    pub fn set_incident_wave_theta(&mut self, value: f64) -> f64 {
        self.view.incident_wave_theta = self.select(
            "incident_wave_theta",
            &self.available_incident_wave_theta(),
            value,
            self.view.incident_wave_theta,
        );
        self.view.incident_wave_theta
    }

    pub fn set_incident_wave_phi(&mut self, value: f64) -> f64 {
        self.view.incident_wave_phi = self.select(
            "incident_wave_phi",
            &self.available_incident_wave_phi(),
            value,
            self.view.incident_wave_phi,
        );
        self.view.incident_wave_phi
    }

    /// Snapped `value`, or `current` when it cannot be placed on `axis`.
    fn select(&self, field: &str, axis: &Array1<f64>, value: f64, current: f64) -> f64 {
        snap(axis, value).unwrap_or_else(|| {
            self.logger
                .warn(&format!("rejected {field} {value}, keeping {current}"));
            current
        })
    }

    /// Returns whether `name` was accepted; otherwise the window is unchanged.
    pub fn set_window(&mut self, name: &str) -> bool {
        let parsed = self.parse_setting("window", name, self.view.window);
        parsed.map(|value| self.view.window = value).is_some()
    }

    pub fn set_interpolation(&mut self, name: &str) -> bool {
        let parsed = self.parse_setting("interpolation", name, self.view.interpolation);
        parsed.map(|value| self.view.interpolation = value).is_some()
    }

    pub fn set_gridsize(&mut self, name: &str) -> bool {
        let parsed = self.parse_setting("gridsize", name, self.view.gridsize);
        parsed.map(|value| self.view.gridsize = value).is_some()
    }

    pub fn set_aspect_range(&mut self, name: &str) -> bool {
        let parsed = self.parse_setting("aspect_range", name, self.view.aspect_range);
        parsed.map(|value| self.view.aspect_range = value).is_some()
    }

    pub fn set_data_conversion_function(&mut self, name: &str) -> bool {
        let parsed = self.parse_setting(
            "data_conversion_function",
            name,
            self.view.data_conversion_function,
        );
        parsed
            .map(|value| self.view.data_conversion_function = value)
            .is_some()
    }

    /// Range-profile transform length; zero is rejected.
    pub fn set_window_size(&mut self, size: usize) -> bool {
        if size == 0 {
            self.logger.warn(&format!(
                "rejected window_size 0, keeping {}",
                self.view.window_size
            ));
            return false;
        }
        self.view.window_size = size;
        true
    }

    pub fn set_upsample_range(&mut self, size: usize) {
        self.view.upsample_range = size;
    }

    pub fn set_upsample_azimuth(&mut self, size: usize) {
        self.view.upsample_azimuth = size;
    }

    pub fn set_upsample_elevation(&mut self, size: usize) {
        self.view.upsample_elevation = size;
    }

    pub fn set_extrapolate(&mut self, extrapolate: bool) {
        self.view.extrapolate = extrapolate;
    }

    fn parse_setting<T>(&self, field: &str, text: &str, current: T) -> Option<T>
    where
        T: FromStr<Err = RcsError> + fmt::Display,
    {
        match text.parse::<T>() {
            Ok(value) => Some(value),
            Err(err) => {
                self.logger
                    .warn(&format!("rejected {field} '{text}', keeping {current}: {err}"));
                None
            }
        }
    }

    /// Raw kernel of the named (or configured) window at `length` (or the
    /// configured window size).
    pub fn window_function(&self, name: Option<&str>, length: Option<usize>) -> Array1<f64> {
        let kind = match name {
            None => self.view.window,
            Some(name) => self
                .parse_setting::<WindowKind>("window", name, self.view.window)
                .unwrap_or(self.view.window),
        };
        kind.kernel(length.unwrap_or(self.view.window_size))
    }

    pub fn magnitude_convert(&self, value: Complex64) -> Complex64 {
        self.view.data_conversion_function.apply(value)
    }

    fn active_indices(&self) -> Option<(&SampleTable, usize, usize, usize)> {
        let table = self.table.as_ref()?;
        let nearest = |axis: ArrayView1<'_, f64>, value: f64| {
            StatsHelper::nearest_index(axis.as_slice().unwrap_or_default(), value).unwrap_or(0)
        };
        Some((
            table,
            nearest(table.frequencies(), self.view.frequency),
            nearest(table.thetas(), self.view.incident_wave_theta),
            nearest(table.phis(), self.view.incident_wave_phi),
        ))
    }

    /// Converted RCS at the active frequency, θ and φ.
    pub fn rcs(&self) -> Option<Complex64> {
        let (table, f, t, p) = self.active_indices()?;
        table.get(f, t, p).map(|value| self.magnitude_convert(value))
    }

    /// RCS over frequency at the active θ and φ.
    pub fn rcs_active_theta_phi(&self) -> RcsCut {
        match self.active_indices() {
            Some((table, _, t, p)) => self.cut(
                FREQ_COLUMN,
                table.frequencies().to_owned(),
                table.values().slice(s![.., t, p]).to_owned(),
            ),
            None => self.empty_cut(FREQ_COLUMN),
        }
    }

    /// RCS over θ × φ at the active frequency.
    pub fn rcs_active_frequency(&self) -> RcsMap {
        let conversion = self.view.data_conversion_function;
        match self.active_indices() {
            Some((table, f, _, _)) => RcsMap {
                conversion,
                thetas: table.thetas().to_owned(),
                phis: table.phis().to_owned(),
                values: table.values().slice(s![f, .., ..]).mapv(|v| conversion.apply(v)),
            },
            None => RcsMap {
                conversion,
                thetas: Array1::zeros(0),
                phis: Array1::zeros(0),
                values: Array2::zeros((0, 0)),
            },
        }
    }

    /// RCS over φ at the active frequency and θ.
    pub fn rcs_active_theta(&self) -> RcsCut {
        match self.active_indices() {
            Some((table, f, t, _)) => self.cut(
                PHI_COLUMN,
                table.phis().to_owned(),
                table.values().slice(s![f, t, ..]).to_owned(),
            ),
            None => self.empty_cut(PHI_COLUMN),
        }
    }

    /// RCS over θ at the active frequency and φ.
    pub fn rcs_active_phi(&self) -> RcsCut {
        match self.active_indices() {
            Some((table, f, _, p)) => self.cut(
                THETA_COLUMN,
                table.thetas().to_owned(),
                table.values().slice(s![f, .., p]).to_owned(),
            ),
            None => self.empty_cut(THETA_COLUMN),
        }
    }

    fn cut(&self, axis_name: &'static str, axis: Array1<f64>, values: Array1<Complex64>) -> RcsCut {
        let conversion = self.view.data_conversion_function;
        RcsCut {
            conversion,
            axis_name,
            axis,
            values: values.mapv(|v| conversion.apply(v)),
        }
    }

    fn empty_cut(&self, axis_name: &'static str) -> RcsCut {
        self.cut(axis_name, Array1::zeros(0), Array1::zeros(0))
    }

    /// Frequency-primary domain of the sample sweep, in Hz.
    pub fn domain_descriptor(&self) -> RcsResult<DomainDescriptor> {
        let freqs: Vec<f64> = self
            .frequencies()
            .iter()
            .map(|f| f * self.frequency_scale)
            .collect();
        let mut descriptor = DomainDescriptor::from_frequency(&freqs)?;
        descriptor.calculate_aspect_domain()?;
        Ok(descriptor)
    }

    /// Factor from `model_units` to metres; 1 when the units are unset.
    pub fn model_scale_to_meters(&self) -> RcsResult<f64> {
        match self.model_units() {
            None => Ok(1.0),
            Some(unit) => convert_units(1.0, unit, "m"),
        }
    }

    fn stage_input(&self) -> Option<StageInput<'_>> {
        self.table.as_ref().map(|table| StageInput {
            table,
            view: self.view,
            frequency_scale: self.frequency_scale,
        })
    }

    pub fn range_profile(&self) -> RcsResult<RangeProfile> {
        match self.stage_input() {
            Some(input) => RangeProfileStage::new().form(&input),
            None => Ok(RangeProfile::empty(self.view.data_conversion_function)),
        }
    }

    pub fn waterfall(&self) -> RcsResult<Waterfall> {
        match self.stage_input() {
            Some(input) => WaterfallStage::new().form(&input),
            None => Ok(Waterfall::empty(
                self.view.aspect_range,
                self.view.data_conversion_function,
            )),
        }
    }

    pub fn isar_2d(&self) -> RcsResult<IsarImage> {
        match self.stage_input() {
            Some(input) => Isar2dStage::new().form(&input),
            None => Ok(IsarImage::empty(self.view.data_conversion_function)),
        }
    }

    pub fn isar_3d(&self) -> RcsResult<IsarVolume> {
        match self.stage_input() {
            Some(input) => Isar3dStage::new().form(&input),
            None => Ok(IsarVolume::empty(self.view.data_conversion_function)),
        }
    }

    /// The full volume when `plane_cut` is `None`, otherwise the `xy`, `xz`
    /// or `yz` plane nearest `plane_offset`.
    pub fn isar_3d_cut(
        &self,
        plane_cut: Option<&str>,
        plane_offset: Option<f64>,
    ) -> RcsResult<Isar3dView> {
        let Some(name) = plane_cut else {
            return Ok(Isar3dView::Volume(self.isar_3d()?));
        };
        let plane = name.parse::<Plane>()?;
        let offset = match plane_offset {
            Some(offset) if offset.is_finite() => offset,
            Some(offset) => {
                return Err(RcsError::Value(format!(
                    "plane offset {offset} is not finite"
                )))
            }
            None => {
                return Err(RcsError::Value(format!(
                    "plane cut '{plane}' needs a plane offset"
                )))
            }
        };
        let volume = self.isar_3d()?;
        Ok(Isar3dView::Plane(volume.plane_cut(plane, offset)))
    }
}

impl fmt::Debug for RcsDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RcsDataset")
            .field("input_file", &self.input_file)
            .field("solution", &self.metadata.solution)
            .field("channel", &self.name())
            .field("view", &self.view)
            .finish()
    }
}

/// Nearest sampled value, clamped to the sweep ends; `value` itself when the
/// sweep is empty. NaN has no nearest sample.
fn snap(axis: &Array1<f64>, value: f64) -> Option<f64> {
    if value.is_nan() {
        return None;
    }
    if axis.is_empty() {
        return Some(value);
    }
    StatsHelper::nearest_index(axis.as_slice().unwrap_or_default(), value).map(|index| axis[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::view::{AspectRange, ConversionFunction, GridSize, Interpolation};
    use crate::prelude::SPEED_OF_LIGHT;
    use crate::processing::fixtures::{linspace, point_table};
    use proptest::prelude::*;
    use tempfile::{tempdir, TempDir};

    fn metadata(store: Option<&str>) -> Metadata {
        Metadata {
            solution: "Trihedral_RCS".into(),
            monostatic_file: store.map(String::from),
            model_units: Some("mm".into()),
            frequency_units: Some("GHz".into()),
            model_info: BTreeMap::new(),
        }
    }

    fn write_dataset(table: &SampleTable) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        table.write_csv(dir.path().join("rcs_data.csv")).unwrap();
        let path = dir.path().join("trihedral.json");
        metadata(Some("rcs_data.csv")).write(&path).unwrap();
        (dir, path)
    }

    /// 3 frequencies × 3 θ × 2 φ around a scatterer off the origin.
    fn small_dataset() -> (TempDir, RcsDataset) {
        let table = point_table(
            &[9.9, 10.0, 10.1],
            &[80.0, 90.0, 100.0],
            &[-5.0, 5.0],
            &[(0.3, 0.1, 0.05, 2.0)],
        );
        let (dir, path) = write_dataset(&table);
        let dataset = RcsDataset::load(&path).unwrap();
        (dir, dataset)
    }

    #[test]
    fn missing_metadata_is_not_found() {
        let dir = tempdir().unwrap();
        let err = RcsDataset::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, RcsError::NotFound(_)));
        assert!(err.to_string().contains("JSON file does not exist."));
    }

    #[test]
    fn missing_store_is_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trihedral.json");
        metadata(Some("absent.csv")).write(&path).unwrap();
        match RcsDataset::load(&path) {
            Err(RcsError::Validation(message)) => {
                assert!(message.starts_with("Monostatic file is invalid."))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_store_is_invalid() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("rcs_data.csv"), "Freq,IWavePhi\n1,2\n").unwrap();
        let path = dir.path().join("trihedral.json");
        metadata(Some("rcs_data.csv")).write(&path).unwrap();
        assert!(matches!(RcsDataset::load(&path), Err(RcsError::Validation(_))));
    }

    #[test]
    fn metadata_without_store_yields_empty_products() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geometry.json");
        metadata(None).write(&path).unwrap();
        let dataset = RcsDataset::load(&path).unwrap();

        assert_eq!(dataset.name(), "");
        assert!(dataset.raw_data().is_none());
        assert!(dataset.rcs().is_none());
        assert!(dataset.range_profile().unwrap().is_empty());
        assert!(dataset.waterfall().unwrap().is_empty());
        assert!(dataset.isar_2d().unwrap().is_empty());
        match dataset.isar_3d_cut(Some("xy"), Some(0.0)).unwrap() {
            Isar3dView::Plane(plane) => assert!(plane.values.is_empty()),
            other => panic!("expected plane, got {other:?}"),
        }
    }

    #[test]
    fn identity_and_initial_selection() {
        let (_dir, dataset) = small_dataset();
        assert_eq!(dataset.solution(), "Trihedral_RCS");
        assert_eq!(dataset.name(), "HH");
        assert_eq!(dataset.frequency_units(), Some("GHz"));
        assert_eq!(dataset.model_units(), Some("mm"));
        assert!(dataset.input_file().ends_with("trihedral.json"));
        assert!((dataset.model_scale_to_meters().unwrap() - 1e-3).abs() < 1e-15);

        assert_eq!(dataset.frequency(), 9.9);
        assert_eq!(dataset.incident_wave_theta(), 80.0);
        assert_eq!(dataset.incident_wave_phi(), -5.0);
        assert_eq!(dataset.view().window_size, 1024);
        assert_eq!(dataset.view().data_conversion_function, ConversionFunction::DB20);
        assert_eq!(dataset.view().gridsize, GridSize::Middle);
    }

    #[test]
    fn selection_snaps_to_sampled_values() {
        let (_dir, mut dataset) = small_dataset();
        assert_eq!(dataset.set_incident_wave_theta(10.0), 80.0);
        assert_eq!(dataset.set_incident_wave_theta(86.0), 90.0);
        assert_eq!(dataset.set_incident_wave_theta(500.0), 100.0);
        assert_eq!(dataset.set_incident_wave_phi(1.0), 5.0);
        assert_eq!(dataset.set_incident_wave_phi(-90.0), -5.0);
        assert_eq!(dataset.set_frequency(11.0), 10.1);

        assert_eq!(dataset.set_frequency_str("9900MHz").unwrap(), 9.9);
        assert_eq!(dataset.set_frequency_str("10.08GHz").unwrap(), 10.1);
        assert_eq!(dataset.set_frequency_str("10").unwrap(), 10.0);
        assert!(dataset.set_frequency_str("10mm").is_err());
        assert_eq!(dataset.frequency(), 10.0);
    }

    #[test]
    fn nan_selection_keeps_previous_value() {
        let (_dir, mut dataset) = small_dataset();
        dataset.set_incident_wave_theta(90.0);
        assert_eq!(dataset.set_incident_wave_theta(f64::NAN), 90.0);
        assert_eq!(dataset.incident_wave_theta(), 90.0);
        assert_eq!(dataset.set_incident_wave_phi(f64::NAN), -5.0);
        assert_eq!(dataset.set_frequency(f64::NAN), 9.9);
        assert_eq!(dataset.set_incident_wave_phi(f64::INFINITY), 5.0);
    }

    #[test]
    fn full_circle_sweep_images_centred_sub_aperture() {
        let phis: Vec<f64> = (0..36).map(|i| i as f64 * 10.0).collect();
        let table = point_table(&linspace(9.8, 10.2, 8), &[90.0], &phis, &[(0.3, 0.0, 0.0, 1.0)]);
        let (_dir, path) = write_dataset(&table);
        let mut dataset = RcsDataset::load(&path).unwrap();
        dataset.set_upsample_range(16);
        dataset.set_upsample_azimuth(16);

        assert!(dataset.waterfall().is_ok());
        let image = dataset.isar_2d().unwrap();
        // 18 of 36 angles lie within 90 degrees of the 175 degree centre.
        assert_eq!(image.values.dim(), (16, 18));
        assert_eq!(image.cross_range.len(), 18);

        let phis = linspace(0.0, 180.0, 19);
        let table = point_table(&linspace(9.8, 10.2, 8), &[90.0], &phis, &[]);
        let (_dir, path) = write_dataset(&table);
        let dataset = RcsDataset::load(&path).unwrap();
        assert!(dataset.isar_2d().is_ok());
    }

    #[test]
    fn invalid_settings_keep_previous_value() {
        let (_dir, mut dataset) = small_dataset();

        assert!(dataset.set_window("Hamming"));
        assert!(!dataset.set_window("invented"));
        assert_eq!(dataset.view().window, WindowKind::Hamming);

        assert!(dataset.set_interpolation("nearest"));
        assert!(!dataset.set_interpolation("cubic"));
        assert_eq!(dataset.view().interpolation, Interpolation::Nearest);

        assert!(dataset.set_gridsize("Inside"));
        assert!(!dataset.set_gridsize("Sideways"));
        assert_eq!(dataset.view().gridsize, GridSize::Inside);

        assert!(dataset.set_aspect_range("Vertical"));
        assert!(!dataset.set_aspect_range("Diagonal"));
        assert_eq!(dataset.view().aspect_range, AspectRange::Vertical);

        assert!(dataset.set_data_conversion_function("abs"));
        assert!(!dataset.set_data_conversion_function("dB30"));
        assert_eq!(dataset.view().data_conversion_function, ConversionFunction::Abs);

        assert!(!dataset.set_window_size(0));
        assert_eq!(dataset.view().window_size, 1024);
    }

    #[test]
    fn window_function_follows_request_or_view() {
        let (_dir, mut dataset) = small_dataset();
        assert_eq!(dataset.window_function(None, None), Array1::<f64>::ones(1024));

        let hann = dataset.window_function(Some("Hann"), Some(5));
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (value, expected) in hann.iter().zip(expected) {
            assert!((value - expected).abs() < 1e-12);
        }

        dataset.set_window("Hamming");
        let fallback = dataset.window_function(Some("invented"), Some(3));
        assert!((fallback[0] - 0.08).abs() < 1e-12);
        assert!((fallback[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rcs_cuts_follow_active_selection() {
        let (_dir, mut dataset) = small_dataset();
        dataset.set_data_conversion_function("abs");
        let rcs = dataset.rcs().unwrap();
        assert!((rcs.re - 2.0).abs() < 1e-12);
        assert!((dataset.magnitude_convert(Complex64::new(0.0, -3.0)).re - 3.0).abs() < 1e-12);

        let over_freq = dataset.rcs_active_theta_phi();
        assert_eq!(over_freq.axis_name, FREQ_COLUMN);
        assert_eq!(over_freq.values.len(), 3);
        assert!(over_freq.values.iter().all(|v| (v.re - 2.0).abs() < 1e-12));

        assert_eq!(dataset.rcs_active_theta().axis.to_vec(), vec![-5.0, 5.0]);
        assert_eq!(dataset.rcs_active_phi().axis.to_vec(), vec![80.0, 90.0, 100.0]);
        assert_eq!(dataset.rcs_active_frequency().values.dim(), (3, 2));

        dataset.set_data_conversion_function("dB20");
        let db = dataset.rcs().unwrap();
        assert!((db.re - 20.0 * 2f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn domain_descriptor_uses_hertz() {
        let (_dir, dataset) = small_dataset();
        let descriptor = dataset.domain_descriptor().unwrap();
        assert!((descriptor.center_freq - 10.0e9).abs() < 1.0);
        let expected = SPEED_OF_LIGHT / (2.0 * 3.0 * 0.1e9);
        let resolution = descriptor.range_resolution.unwrap();
        assert!((resolution - expected).abs() / expected < 1e-9);
    }

    #[test]
    fn range_profile_length_follows_window_size() {
        let (_dir, mut dataset) = small_dataset();
        assert_eq!(dataset.range_profile().unwrap().len(), 1024);
        dataset.set_window_size(256);
        assert_eq!(dataset.range_profile().unwrap().len(), 256);
    }

    #[test]
    fn products_follow_view_changes() {
        let (_dir, mut dataset) = small_dataset();
        let flat = dataset.range_profile().unwrap();
        dataset.set_window("Hann");
        let hann = dataset.range_profile().unwrap();
        assert_ne!(flat.values, hann.values);
        dataset.set_window("Flat");
        assert_eq!(dataset.range_profile().unwrap(), flat);
    }

    #[test]
    fn waterfall_stacks_along_selected_axis() {
        let (_dir, mut dataset) = small_dataset();
        dataset.set_window_size(64);

        let horizontal = dataset.waterfall().unwrap();
        assert_eq!(horizontal.values.dim(), (2, 64));
        let profile = dataset.range_profile().unwrap();
        assert_eq!(horizontal.values.row(0), profile.values);

        dataset.set_aspect_range("Vertical");
        let vertical = dataset.waterfall().unwrap();
        assert_eq!(vertical.values.dim(), (3, 64));
        dataset.set_incident_wave_theta(100.0);
        let profile = dataset.range_profile().unwrap();
        assert_eq!(vertical.values.row(2), profile.values);
    }

    #[test]
    fn plane_cut_arguments_are_checked_per_call() {
        let (_dir, mut dataset) = small_dataset();
        dataset.set_upsample_range(8);
        dataset.set_upsample_azimuth(8);
        dataset.set_upsample_elevation(8);

        assert!(matches!(
            dataset.isar_3d_cut(Some("xy"), None),
            Err(RcsError::Value(_))
        ));
        assert!(matches!(
            dataset.isar_3d_cut(Some("ab"), Some(0.0)),
            Err(RcsError::Value(_))
        ));

        match dataset.isar_3d_cut(None, None).unwrap() {
            Isar3dView::Volume(volume) => assert_eq!(volume.values.dim(), (8, 8, 8)),
            other => panic!("expected volume, got {other:?}"),
        }
        match dataset.isar_3d_cut(Some("YZ"), Some(0.0)).unwrap() {
            Isar3dView::Plane(plane) => {
                assert_eq!(plane.plane, Plane::Yz);
                assert_eq!(plane.values.dim(), (8, 8));
            }
            other => panic!("expected plane, got {other:?}"),
        }
    }

    #[test]
    fn isar_2d_needs_two_angles() {
        let table = point_table(&[9.9, 10.0], &[90.0], &[0.0], &[(0.0, 0.0, 0.0, 1.0)]);
        let (_dir, path) = write_dataset(&table);
        let dataset = RcsDataset::load(&path).unwrap();
        assert!(matches!(
            dataset.isar_2d(),
            Err(RcsError::InsufficientSamples(_))
        ));
        assert_eq!(dataset.range_profile().unwrap().len(), 1024);
    }

    #[test]
    fn custom_defaults_seed_the_view() {
        let table = point_table(&[9.9, 10.0], &[90.0], &[0.0], &[]);
        let (_dir, path) = write_dataset(&table);
        let defaults = ImagingDefaults {
            window: WindowKind::Hann,
            window_size: 128,
            ..ImagingDefaults::default()
        };
        let dataset = RcsDataset::load_with(&path, defaults).unwrap();
        assert_eq!(dataset.view().window, WindowKind::Hann);
        assert_eq!(dataset.range_profile().unwrap().len(), 128);
    }

    proptest! {
        #[test]
        fn theta_snaps_to_nearest_sample(theta in -360.0f64..360.0) {
            let (_dir, mut dataset) = small_dataset();
            let snapped = dataset.set_incident_wave_theta(theta);
            let thetas = dataset.available_incident_wave_theta();
            prop_assert!(thetas.iter().any(|&t| t == snapped));
            let best = thetas
                .iter()
                .map(|t| (t - theta).abs())
                .fold(f64::INFINITY, f64::min);
            prop_assert!(((snapped - theta).abs() - best).abs() < 1e-12);
        }
    }
}
