use anyhow::{anyhow, Context};
use rcscore::RcsDataset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Product the workflow forms and exports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductKind {
    #[serde(rename = "rcs")]
    Rcs,
    #[serde(rename = "range_profile")]
    RangeProfile,
    #[serde(rename = "waterfall")]
    Waterfall,
    #[serde(rename = "isar_2d")]
    Isar2d,
    #[serde(rename = "isar_3d")]
    Isar3d,
}

impl ProductKind {
    pub const ALL: [ProductKind; 5] = [
        ProductKind::Rcs,
        ProductKind::RangeProfile,
        ProductKind::Waterfall,
        ProductKind::Isar2d,
        ProductKind::Isar3d,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ProductKind::Rcs => "rcs",
            ProductKind::RangeProfile => "range_profile",
            ProductKind::Waterfall => "waterfall",
            ProductKind::Isar2d => "isar_2d",
            ProductKind::Isar3d => "isar_3d",
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for ProductKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ProductKind::ALL
            .into_iter()
            .find(|kind| kind.name() == value.trim())
            .ok_or_else(|| anyhow!("unknown product '{value}'"))
    }
}

/// Frequency override, either a bare number in the dataset's units or a
/// quantity such as `"10GHz"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrequencySetting {
    Value(f64),
    Quantity(String),
}

/// View-state overrides named after the dataset fields. Enum-like settings
/// stay strings so the dataset's reject-and-keep policy decides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOverrides {
    pub frequency: Option<FrequencySetting>,
    pub incident_wave_theta: Option<f64>,
    pub incident_wave_phi: Option<f64>,
    pub data_conversion_function: Option<String>,
    pub window: Option<String>,
    pub window_size: Option<usize>,
    pub aspect_range: Option<String>,
    pub upsample_range: Option<usize>,
    pub upsample_azimuth: Option<usize>,
    pub upsample_elevation: Option<usize>,
    pub interpolation: Option<String>,
    pub extrapolate: Option<bool>,
    pub gridsize: Option<String>,
}

impl ViewOverrides {
    /// Applies every override and returns the names of rejected fields.
    pub fn apply(&self, dataset: &mut RcsDataset) -> anyhow::Result<Vec<&'static str>> {
        let mut rejected = Vec::new();

        match &self.frequency {
            Some(FrequencySetting::Value(value)) => {
                dataset.set_frequency(*value);
            }
            Some(FrequencySetting::Quantity(text)) => {
                dataset
                    .set_frequency_str(text)
                    .with_context(|| format!("frequency override '{text}'"))?;
            }
            None => {}
        }
        if let Some(theta) = self.incident_wave_theta {
            dataset.set_incident_wave_theta(theta);
        }
        if let Some(phi) = self.incident_wave_phi {
            dataset.set_incident_wave_phi(phi);
        }

        let settings: [(&'static str, &Option<String>, fn(&mut RcsDataset, &str) -> bool); 5] = [
            (
                "data_conversion_function",
                &self.data_conversion_function,
                RcsDataset::set_data_conversion_function,
            ),
            ("window", &self.window, RcsDataset::set_window),
            ("aspect_range", &self.aspect_range, RcsDataset::set_aspect_range),
            ("interpolation", &self.interpolation, RcsDataset::set_interpolation),
            ("gridsize", &self.gridsize, RcsDataset::set_gridsize),
        ];
        for (field, value, setter) in settings {
            if let Some(value) = value {
                if !setter(dataset, value) {
                    rejected.push(field);
                }
            }
        }

        if let Some(size) = self.window_size {
            if !dataset.set_window_size(size) {
                rejected.push("window_size");
            }
        }
        if let Some(size) = self.upsample_range {
            dataset.set_upsample_range(size);
        }
        if let Some(size) = self.upsample_azimuth {
            dataset.set_upsample_azimuth(size);
        }
        if let Some(size) = self.upsample_elevation {
            dataset.set_upsample_elevation(size);
        }
        if let Some(extrapolate) = self.extrapolate {
            dataset.set_extrapolate(extrapolate);
        }
        Ok(rejected)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("tools/data/products")
}

fn default_products() -> Vec<ProductKind> {
    ProductKind::ALL.to_vec()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub metadata: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_products")]
    pub products: Vec<ProductKind>,
    /// `xy`, `xz` or `yz`; the 3D product is exported as a volume without it.
    #[serde(default)]
    pub plane_cut: Option<String>,
    #[serde(default)]
    pub plane_offset: Option<f64>,
    #[serde(default)]
    pub view: ViewOverrides,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let mut config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        if config.metadata.is_relative() {
            if let Some(parent) = path_ref.parent() {
                config.metadata = parent.join(&config.metadata);
            }
        }
        Ok(config)
    }

    pub fn from_args(
        metadata: PathBuf,
        output_dir: Option<PathBuf>,
        products: Vec<ProductKind>,
    ) -> Self {
        Self {
            metadata,
            output_dir: output_dir.unwrap_or_else(default_output_dir),
            products: if products.is_empty() {
                default_products()
            } else {
                products
            },
            plane_cut: None,
            plane_offset: None,
            view: ViewOverrides::default(),
        }
    }
}
