pub mod isar;
pub mod isar3d;
pub mod product;
pub mod range;
pub mod waterfall;

#[cfg(test)]
pub(crate) mod fixtures;

pub use isar::Isar2dStage;
pub use isar3d::Isar3dStage;
pub use product::{
    Isar3dView, IsarImage, IsarVolume, Plane, PlaneImage, RangeProfile, RcsCut, RcsMap, Waterfall,
};
pub use range::RangeProfileStage;
pub use waterfall::WaterfallStage;
