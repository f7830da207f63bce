pub mod metadata;
pub mod rcs;
pub mod scatterer;
pub mod store;
pub mod view;

pub use metadata::{Metadata, ModelPart};
pub use rcs::RcsDataset;
pub use scatterer::{monostatic_response, PointScatterer};
pub use store::{RawSample, SampleTable};
pub use view::{AspectRange, ConversionFunction, GridSize, Interpolation, ViewState, WindowKind};
