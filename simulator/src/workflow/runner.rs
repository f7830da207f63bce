use crate::workflow::config::{ProductKind, WorkflowConfig};
use crate::workflow::export::CsvExport;
use anyhow::Context;
use rcscore::processing::Isar3dView;
use rcscore::telemetry::MetricsRecorder;
use rcscore::RcsDataset;
use std::fs;
use std::path::PathBuf;

pub struct ProductReport {
    pub kind: ProductKind,
    pub path: PathBuf,
    pub rows: usize,
}

pub struct WorkflowResult {
    pub solution: String,
    pub channel: String,
    pub reports: Vec<ProductReport>,
    pub failures: Vec<(ProductKind, String)>,
    pub rejected: Vec<&'static str>,
    /// `(formed, failed)` from the run's metrics.
    pub metrics: (usize, usize),
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Loads the dataset, applies the view overrides and exports every
    /// requested product. A failing product is recorded and skipped.
    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let mut dataset = RcsDataset::load(&self.config.metadata)
            .with_context(|| format!("loading dataset {}", self.config.metadata.display()))?;
        let rejected = self
            .config
            .view
            .apply(&mut dataset)
            .context("applying view overrides")?;
        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!("creating output directory {}", self.config.output_dir.display())
        })?;

        let metrics = MetricsRecorder::new();
        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for &kind in &self.config.products {
            match self.export(&dataset, kind) {
                Ok(report) => {
                    metrics.record_formed();
                    reports.push(report);
                }
                Err(err) => {
                    metrics.record_failed();
                    log::warn!("{kind} failed: {err:#}");
                    failures.push((kind, format!("{err:#}")));
                }
            }
        }

        Ok(WorkflowResult {
            solution: dataset.solution().to_string(),
            channel: dataset.name().to_string(),
            reports,
            failures,
            rejected,
            metrics: metrics.snapshot(),
        })
    }

    fn export(&self, dataset: &RcsDataset, kind: ProductKind) -> anyhow::Result<ProductReport> {
        let path = self.config.output_dir.join(format!("{kind}.csv"));
        let export = CsvExport::create(&path)?;
        let rows = match kind {
            ProductKind::Rcs => export.rcs_cut(&dataset.rcs_active_theta_phi())?,
            ProductKind::RangeProfile => export.range_profile(&dataset.range_profile()?)?,
            ProductKind::Waterfall => export.waterfall(&dataset.waterfall()?)?,
            ProductKind::Isar2d => export.isar_image(&dataset.isar_2d()?)?,
            ProductKind::Isar3d => {
                let view = dataset.isar_3d_cut(
                    self.config.plane_cut.as_deref(),
                    self.config.plane_offset,
                )?;
                match view {
                    Isar3dView::Volume(volume) => export.isar_volume(&volume)?,
                    Isar3dView::Plane(plane) => export.plane_image(&plane)?,
                }
            }
        };
        Ok(ProductReport { kind, path, rows })
    }
}
