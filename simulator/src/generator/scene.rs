use anyhow::Context;
use num_complex::Complex64;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rcscore::dataset::{monostatic_response, Metadata, PointScatterer, RawSample, SampleTable};
use rcscore::domain::convert_units;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Evenly spaced angle sweep in degrees, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    pub start: f64,
    pub stop: f64,
    pub count: usize,
}

impl Sweep {
    pub fn values(&self) -> Vec<f64> {
        match self.count {
            0 => Vec::new(),
            1 => vec![self.start],
            count => (0..count)
                .map(|i| self.start + (self.stop - self.start) * i as f64 / (count - 1) as f64)
                .collect(),
        }
    }
}

/// Configuration for synthesizing a monostatic point-scatterer solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub solution: String,
    pub channel: String,
    pub frequency_units: String,
    pub model_units: String,
    /// Sweep in `frequency_units`.
    pub frequency: Sweep,
    pub theta: Sweep,
    pub phi: Sweep,
    pub scatterers: Vec<PointScatterer>,
    /// Peak of the uniform complex noise added to every sample.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            solution: "PointScatterers".into(),
            channel: "HH".into(),
            frequency_units: "GHz".into(),
            model_units: "m".into(),
            frequency: Sweep {
                start: 9.5,
                stop: 10.5,
                count: 64,
            },
            theta: Sweep {
                start: 85.0,
                stop: 95.0,
                count: 11,
            },
            phi: Sweep {
                start: -5.0,
                stop: 5.0,
                count: 21,
            },
            scatterers: vec![
                PointScatterer::new(0.0, 0.0, 0.0, 1.0),
                PointScatterer::new(1.5, -0.8, 0.0, 0.7),
                PointScatterer::new(-1.0, 1.2, 0.4, 0.5),
            ],
            noise: 0.01,
            seed: 0,
        }
    }
}

impl SceneConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scene config {}", path_ref.display()))?;
        let config: SceneConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scene config {}", path_ref.display()))?;
        Ok(config)
    }
}

pub fn build_table(config: &SceneConfig) -> anyhow::Result<SampleTable> {
    let hz_per_unit = convert_units(1.0, &config.frequency_units, "Hz")
        .with_context(|| format!("frequency units '{}'", config.frequency_units))?;
    let frequencies = config.frequency.values();
    let thetas = config.theta.values();
    let phis = config.phi.values();
    let sample_count = frequencies
        .len()
        .checked_mul(thetas.len())
        .and_then(|n| n.checked_mul(phis.len()))
        .context("overflow computing sample count for scene")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut samples = Vec::with_capacity(sample_count);
    for &frequency in &frequencies {
        for &theta in &thetas {
            for &phi in &phis {
                let mut value =
                    monostatic_response(frequency * hz_per_unit, theta, phi, &config.scatterers);
                if config.noise > 0.0 {
                    value += Complex64::new(
                        rng.gen_range(-config.noise..config.noise),
                        rng.gen_range(-config.noise..config.noise),
                    );
                }
                samples.push(RawSample::new(frequency, theta, phi, value));
            }
        }
    }

    SampleTable::from_samples(config.channel.clone(), &samples)
        .context("assembling synthesized sample table")
}

/// Writes `<solution>.csv` and `<solution>.json` into `output_dir` and returns
/// the metadata path.
pub fn write_scene(config: &SceneConfig, output_dir: &Path) -> anyhow::Result<PathBuf> {
    let table = build_table(config)?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating scene directory {}", output_dir.display()))?;

    let store_name = format!("{}.csv", config.solution);
    table
        .write_csv(output_dir.join(&store_name))
        .with_context(|| format!("writing sample store {store_name}"))?;

    let metadata = Metadata {
        solution: config.solution.clone(),
        monostatic_file: Some(store_name),
        model_units: Some(config.model_units.clone()),
        frequency_units: Some(config.frequency_units.clone()),
        model_info: BTreeMap::new(),
    };
    let metadata_path = output_dir.join(format!("{}.json", config.solution));
    metadata
        .write(&metadata_path)
        .with_context(|| format!("writing metadata {}", metadata_path.display()))?;

    log::info!(
        "synthesized {} samples of {} scatterers into {}",
        table.len(),
        config.scatterers.len(),
        metadata_path.display()
    );
    Ok(metadata_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcscore::RcsDataset;
    use tempfile::tempdir;

    fn small_scene() -> SceneConfig {
        SceneConfig {
            frequency: Sweep {
                start: 9.8,
                stop: 10.2,
                count: 8,
            },
            theta: Sweep {
                start: 88.0,
                stop: 92.0,
                count: 5,
            },
            phi: Sweep {
                start: -2.0,
                stop: 2.0,
                count: 9,
            },
            ..SceneConfig::default()
        }
    }

    #[test]
    fn sweep_values_include_both_ends() {
        let sweep = Sweep {
            start: -1.0,
            stop: 1.0,
            count: 5,
        };
        assert_eq!(sweep.values(), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(Sweep { count: 1, ..sweep }.values(), vec![-1.0]);
    }

    #[test]
    fn scene_round_trips_through_dataset() {
        let dir = tempdir().unwrap();
        let config = small_scene();
        let metadata = write_scene(&config, dir.path()).unwrap();

        let dataset = RcsDataset::load(&metadata).unwrap();
        assert_eq!(dataset.solution(), "PointScatterers");
        assert_eq!(dataset.name(), "HH");
        assert_eq!(dataset.frequencies().len(), 8);
        assert_eq!(dataset.available_incident_wave_theta().len(), 5);
        assert_eq!(dataset.available_incident_wave_phi().len(), 9);
    }

    #[test]
    fn seeded_noise_is_repeatable() {
        let config = SceneConfig {
            seed: 13,
            noise: 0.1,
            ..small_scene()
        };
        let first = build_table(&config).unwrap();
        let second = build_table(&config).unwrap();
        assert_eq!(first, second);

        let other = build_table(&SceneConfig { seed: 14, ..config }).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn unknown_frequency_units_fail() {
        let config = SceneConfig {
            frequency_units: "furlong".into(),
            ..small_scene()
        };
        assert!(build_table(&config).is_err());
    }
}
