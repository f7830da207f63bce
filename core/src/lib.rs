//! Monostatic RCS data model and image-formation core.
//!
//! Raw scattering samples swept over frequency and incident angles are loaded
//! once into an immutable table; range profiles, waterfalls and ISAR images are
//! formed on demand from the current view state through windowing, aspect
//! resampling, zero padding and inverse transforms.

pub mod dataset;
pub mod domain;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use dataset::{Metadata, RcsDataset, SampleTable, ViewState};
pub use domain::DomainDescriptor;
pub use prelude::{ImagingDefaults, RcsError, RcsResult};
