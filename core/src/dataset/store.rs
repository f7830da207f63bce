//! Immutable monostatic sample table and its CSV codec.
//!
//! The store header is `Freq,IWavePhi,IWaveTheta,re(<CH>),im(<CH>)`; the key
//! columns may appear in any order and `<CH>` names the polarization channel.

use std::path::Path;

use ndarray::{Array1, Array3, ArrayView1, ArrayView3};
use num_complex::Complex64;

use crate::prelude::{RcsError, RcsResult};

pub const FREQ_COLUMN: &str = "Freq";
pub const PHI_COLUMN: &str = "IWavePhi";
pub const THETA_COLUMN: &str = "IWaveTheta";

/// One complex scattering value keyed by frequency and incident angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub frequency: f64,
    pub theta: f64,
    pub phi: f64,
    pub value: Complex64,
}

impl RawSample {
    pub fn new(frequency: f64, theta: f64, phi: f64, value: Complex64) -> Self {
        Self {
            frequency,
            theta,
            phi,
            value,
        }
    }
}

/// Full frequency × θ × φ grid of samples with ascending axes.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    name: String,
    frequencies: Array1<f64>,
    thetas: Array1<f64>,
    phis: Array1<f64>,
    /// Indexed `[frequency, theta, phi]`.
    values: Array3<Complex64>,
}

impl SampleTable {
    /// Indexes `samples` into a grid; keys must be unique and cover every
    /// frequency/θ/φ combination.
    pub fn from_samples(name: impl Into<String>, samples: &[RawSample]) -> RcsResult<Self> {
        if samples.is_empty() {
            return Err(RcsError::Validation("sample table is empty".into()));
        }
        let frequencies = unique_axis(samples.iter().map(|s| s.frequency), FREQ_COLUMN)?;
        let thetas = unique_axis(samples.iter().map(|s| s.theta), THETA_COLUMN)?;
        let phis = unique_axis(samples.iter().map(|s| s.phi), PHI_COLUMN)?;

        let shape = (frequencies.len(), thetas.len(), phis.len());
        if shape.0 * shape.1 * shape.2 != samples.len() {
            return Err(RcsError::Validation(format!(
                "{} samples do not form a full {}x{}x{} frequency/theta/phi grid",
                samples.len(),
                shape.0,
                shape.1,
                shape.2
            )));
        }

        let mut values = Array3::from_elem(shape, Complex64::new(0.0, 0.0));
        let mut filled = Array3::from_elem(shape, false);
        for sample in samples {
            let index = (
                position(&frequencies, sample.frequency),
                position(&thetas, sample.theta),
                position(&phis, sample.phi),
            );
            if filled[index] {
                return Err(RcsError::Validation(format!(
                    "duplicate sample at Freq={}, IWaveTheta={}, IWavePhi={}",
                    sample.frequency, sample.theta, sample.phi
                )));
            }
            filled[index] = true;
            values[index] = sample.value;
        }

        Ok(Self {
            name: name.into(),
            frequencies: Array1::from(frequencies),
            thetas: Array1::from(thetas),
            phis: Array1::from(phis),
            values,
        })
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> RcsResult<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| RcsError::Validation(format!("missing column '{name}'")))
        };
        let freq_idx = column(FREQ_COLUMN)?;
        let theta_idx = column(THETA_COLUMN)?;
        let phi_idx = column(PHI_COLUMN)?;
        let (re_idx, name) = headers
            .iter()
            .enumerate()
            .find_map(|(idx, h)| {
                h.trim()
                    .strip_prefix("re(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .map(|name| (idx, name.to_string()))
            })
            .ok_or_else(|| RcsError::Validation("missing column 're(<channel>)'".into()))?;
        let im_idx = column(&format!("im({name})"))?;

        let mut samples = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let field = |idx: usize| -> RcsResult<f64> {
                let text = record.get(idx).unwrap_or("").trim();
                text.parse::<f64>().map_err(|_| {
                    RcsError::Validation(format!("row {}: '{}' is not a number", row + 1, text))
                })
            };
            samples.push(RawSample::new(
                field(freq_idx)?,
                field(theta_idx)?,
                field(phi_idx)?,
                Complex64::new(field(re_idx)?, field(im_idx)?),
            ));
        }
        Self::from_samples(name, &samples)
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> RcsResult<()> {
        let mut writer = csv::Writer::from_path(path.as_ref())?;
        writer.write_record([
            FREQ_COLUMN.to_string(),
            PHI_COLUMN.to_string(),
            THETA_COLUMN.to_string(),
            format!("re({})", self.name),
            format!("im({})", self.name),
        ])?;
        for sample in self.samples() {
            writer.write_record([
                sample.frequency.to_string(),
                sample.phi.to_string(),
                sample.theta.to_string(),
                sample.value.re.to_string(),
                sample.value.im.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Polarization channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frequencies(&self) -> ArrayView1<'_, f64> {
        self.frequencies.view()
    }

    pub fn thetas(&self) -> ArrayView1<'_, f64> {
        self.thetas.view()
    }

    pub fn phis(&self) -> ArrayView1<'_, f64> {
        self.phis.view()
    }

    pub fn values(&self) -> ArrayView3<'_, Complex64> {
        self.values.view()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, freq_idx: usize, theta_idx: usize, phi_idx: usize) -> Option<Complex64> {
        self.values.get((freq_idx, theta_idx, phi_idx)).copied()
    }

    /// Samples in frequency-major, then θ, then φ order.
    pub fn samples(&self) -> impl Iterator<Item = RawSample> + '_ {
        self.values
            .indexed_iter()
            .map(move |((f, t, p), value)| {
                RawSample::new(self.frequencies[f], self.thetas[t], self.phis[p], *value)
            })
    }
}

fn unique_axis<I: Iterator<Item = f64>>(values: I, column: &str) -> RcsResult<Vec<f64>> {
    let mut axis: Vec<f64> = values.collect();
    if axis.iter().any(|v| !v.is_finite()) {
        return Err(RcsError::Validation(format!(
            "column '{column}' contains non-finite keys"
        )));
    }
    axis.sort_by(f64::total_cmp);
    axis.dedup();
    Ok(axis)
}

fn position(axis: &[f64], value: f64) -> usize {
    axis.partition_point(|&v| v < value)
}
