use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::prelude::RcsResult;

type PartTuple = (String, [u8; 3], f64, String);

/// Geometry part consumed by the presentation layer; stored on disk as
/// `[mesh_file, [r, g, b], scale_factor, units]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PartTuple", into = "PartTuple")]
pub struct ModelPart {
    pub mesh_file: String,
    pub color: [u8; 3],
    pub scale_factor: f64,
    pub units: String,
}

impl From<PartTuple> for ModelPart {
    fn from((mesh_file, color, scale_factor, units): PartTuple) -> Self {
        Self {
            mesh_file,
            color,
            scale_factor,
            units,
        }
    }
}

impl From<ModelPart> for PartTuple {
    fn from(part: ModelPart) -> Self {
        (part.mesh_file, part.color, part.scale_factor, part.units)
    }
}

/// Persisted description of one monostatic solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub solution: String,
    /// Sample store file name, resolved relative to the metadata file.
    #[serde(default)]
    pub monostatic_file: Option<String>,
    #[serde(default)]
    pub model_units: Option<String>,
    #[serde(default)]
    pub frequency_units: Option<String>,
    #[serde(default)]
    pub model_info: BTreeMap<String, ModelPart>,
}

impl Metadata {
    pub fn read<P: AsRef<Path>>(path: P) -> RcsResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> RcsResult<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        Ok(())
    }
}
