use ndarray::{s, Array1, Array2};

use crate::dataset::view::AspectRange;
use crate::math::stats::StatsHelper;
use crate::prelude::{ImagingStage, RcsResult, StageInput};
use crate::processing::product::Waterfall;
use crate::processing::range::{down_range, require_frequencies, RangeCompressor};
use crate::telemetry::log::LogManager;

/// Range profiles for every angle of the configured sweep axis.
///
/// `Horizontal` walks φ at the active θ, `Vertical` walks θ at the active φ.
pub struct WaterfallStage {
    logger: LogManager,
}

impl WaterfallStage {
    pub fn new() -> Self {
        Self {
            logger: LogManager::scoped("waterfall"),
        }
    }
}

impl Default for WaterfallStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagingStage for WaterfallStage {
    type Output = Waterfall;

    fn form(&self, input: &StageInput<'_>) -> RcsResult<Waterfall> {
        let freqs = input.frequencies_hz();
        require_frequencies(&freqs, "waterfall")?;

        let values = input.table.values();
        let (theta, phi) = (input.theta_index(), input.phi_index());
        let aspect_range = input.view.aspect_range;
        let angles: Array1<f64> = match aspect_range {
            AspectRange::Horizontal => input.table.phis().to_owned(),
            AspectRange::Vertical => input.table.thetas().to_owned(),
        };

        let mut compressor = RangeCompressor::new(freqs.len(), &input.view);
        let mut stacked = Array2::zeros((angles.len(), compressor.size()));
        for (index, mut row) in stacked.rows_mut().into_iter().enumerate() {
            let sweep = match aspect_range {
                AspectRange::Horizontal => values.slice(s![.., theta, index]),
                AspectRange::Vertical => values.slice(s![.., index, phi]),
            };
            row.assign(&compressor.compress(sweep));
        }

        let (_, ranges) = down_range(&freqs, compressor.size())?;
        self.logger.record(&format!(
            "{} sweep: {}x{} table, peak {:.4}",
            aspect_range,
            stacked.nrows(),
            stacked.ncols(),
            StatsHelper::peak(stacked.iter())
        ));

        Ok(Waterfall {
            aspect_range,
            conversion: input.view.data_conversion_function,
            angles,
            ranges,
            values: stacked,
        })
    }
}
