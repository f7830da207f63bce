//! Point-scatterer sample tables for stage tests.

use crate::dataset::scatterer::{monostatic_response, PointScatterer};
use crate::dataset::store::{RawSample, SampleTable};

/// `(x, y, z, amplitude)` in metres.
pub(crate) type Scatterer = (f64, f64, f64, f64);

/// Table with frequencies in GHz.
pub(crate) fn point_table(
    freqs_ghz: &[f64],
    thetas: &[f64],
    phis: &[f64],
    scatterers: &[Scatterer],
) -> SampleTable {
    let scatterers: Vec<PointScatterer> = scatterers
        .iter()
        .map(|&(x, y, z, amplitude)| PointScatterer::new(x, y, z, amplitude))
        .collect();
    let mut samples = Vec::new();
    for &f in freqs_ghz {
        for &t in thetas {
            for &p in phis {
                let value = monostatic_response(f * 1e9, t, p, &scatterers);
                samples.push(RawSample::new(f, t, p, value));
            }
        }
    }
    SampleTable::from_samples("HH", &samples).expect("fixture grid is complete")
}

pub(crate) fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| start + (stop - start) * i as f64 / (count - 1) as f64)
        .collect()
}
