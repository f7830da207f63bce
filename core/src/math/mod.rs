pub mod fft;
pub mod matrix;
pub mod resample;
pub mod stats;
pub mod window;

pub use fft::FftHelper;
pub use matrix::MatrixHelper;
pub use resample::{GridSize, Interpolation, Resampler};
pub use stats::StatsHelper;
pub use window::WindowKind;
