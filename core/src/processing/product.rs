//! Tabular products handed to the presentation layer.
//!
//! Values are stored after magnitude conversion; when the conversion is real
//! valued (see [`ConversionFunction::is_real`]) only the real part is
//! meaningful.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, Array3, Axis};
use num_complex::Complex64;

use crate::dataset::view::{AspectRange, ConversionFunction};
use crate::math::stats::StatsHelper;
use crate::prelude::RcsError;

/// Range profile at the active frequency sweep, θ and φ.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeProfile {
    pub conversion: ConversionFunction,
    /// Down-range in metres, centred on zero.
    pub ranges: Array1<f64>,
    pub values: Array1<Complex64>,
}

impl RangeProfile {
    pub fn empty(conversion: ConversionFunction) -> Self {
        Self {
            conversion,
            ranges: Array1::zeros(0),
            values: Array1::zeros(0),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Range profiles stacked along the configured sweep axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Waterfall {
    pub aspect_range: AspectRange,
    pub conversion: ConversionFunction,
    /// Sweep angles in degrees, one per row.
    pub angles: Array1<f64>,
    pub ranges: Array1<f64>,
    /// Indexed `[angle, range]`.
    pub values: Array2<Complex64>,
}

impl Waterfall {
    pub fn empty(aspect_range: AspectRange, conversion: ConversionFunction) -> Self {
        Self {
            aspect_range,
            conversion,
            angles: Array1::zeros(0),
            ranges: Array1::zeros(0),
            values: Array2::zeros((0, 0)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Down-range × cross-range image.
#[derive(Debug, Clone, PartialEq)]
pub struct IsarImage {
    pub conversion: ConversionFunction,
    pub down_range: Array1<f64>,
    pub cross_range: Array1<f64>,
    /// Indexed `[down_range, cross_range]`.
    pub values: Array2<Complex64>,
}

impl IsarImage {
    pub fn empty(conversion: ConversionFunction) -> Self {
        Self {
            conversion,
            down_range: Array1::zeros(0),
            cross_range: Array1::zeros(0),
            values: Array2::zeros((0, 0)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(down_range, cross_range)` of the brightest pixel.
    pub fn peak_position(&self) -> Option<(f64, f64)> {
        peak_index(self.values.indexed_iter())
            .map(|(i, j)| (self.down_range[i], self.cross_range[j]))
    }
}

/// Axis-aligned plane through an [`IsarVolume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Down-range × cross-range at an elevation offset.
    Xy,
    /// Down-range × elevation at a cross-range offset.
    Xz,
    /// Cross-range × elevation at a down-range offset.
    Yz,
}

impl Plane {
    pub fn name(self) -> &'static str {
        match self {
            Plane::Xy => "xy",
            Plane::Xz => "xz",
            Plane::Yz => "yz",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Plane {
    type Err = RcsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "xy" => Ok(Plane::Xy),
            "xz" => Ok(Plane::Xz),
            "yz" => Ok(Plane::Yz),
            _ => Err(RcsError::Value(format!(
                "invalid plane cut '{value}', expected 'xy', 'xz' or 'yz'"
            ))),
        }
    }
}

/// Down-range × cross-range × elevation volume.
#[derive(Debug, Clone, PartialEq)]
pub struct IsarVolume {
    pub conversion: ConversionFunction,
    pub down_range: Array1<f64>,
    pub cross_range: Array1<f64>,
    pub elevation: Array1<f64>,
    /// Indexed `[down_range, cross_range, elevation]`.
    pub values: Array3<Complex64>,
}

impl IsarVolume {
    pub fn empty(conversion: ConversionFunction) -> Self {
        Self {
            conversion,
            down_range: Array1::zeros(0),
            cross_range: Array1::zeros(0),
            elevation: Array1::zeros(0),
            values: Array3::zeros((0, 0, 0)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Plane nearest to `offset` along the plane normal.
    pub fn plane_cut(&self, plane: Plane, offset: f64) -> PlaneImage {
        let (normal, coordinates, first_axis, second_axis) = match plane {
            Plane::Xy => (Axis(2), &self.elevation, &self.down_range, &self.cross_range),
            Plane::Xz => (Axis(1), &self.cross_range, &self.down_range, &self.elevation),
            Plane::Yz => (Axis(0), &self.down_range, &self.cross_range, &self.elevation),
        };
        let index = StatsHelper::nearest_index(coordinates.as_slice().unwrap_or_default(), offset);
        match index {
            Some(index) => PlaneImage {
                plane,
                offset: coordinates[index],
                conversion: self.conversion,
                first_axis: first_axis.clone(),
                second_axis: second_axis.clone(),
                values: self.values.index_axis(normal, index).to_owned(),
            },
            None => PlaneImage {
                plane,
                offset,
                conversion: self.conversion,
                first_axis: Array1::zeros(0),
                second_axis: Array1::zeros(0),
                values: Array2::zeros((0, 0)),
            },
        }
    }
}

/// Slice of an [`IsarVolume`]; `offset` is the coordinate actually used.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneImage {
    pub plane: Plane,
    pub offset: f64,
    pub conversion: ConversionFunction,
    pub first_axis: Array1<f64>,
    pub second_axis: Array1<f64>,
    pub values: Array2<Complex64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Isar3dView {
    Volume(IsarVolume),
    Plane(PlaneImage),
}

/// RCS along one sweep dimension with the others held at their active value.
#[derive(Debug, Clone, PartialEq)]
pub struct RcsCut {
    pub conversion: ConversionFunction,
    /// Sweep column name (`Freq`, `IWaveTheta` or `IWavePhi`).
    pub axis_name: &'static str,
    pub axis: Array1<f64>,
    pub values: Array1<Complex64>,
}

/// RCS over θ × φ at the active frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct RcsMap {
    pub conversion: ConversionFunction,
    pub thetas: Array1<f64>,
    pub phis: Array1<f64>,
    /// Indexed `[theta, phi]`.
    pub values: Array2<Complex64>,
}

fn peak_index<'a, I, Ix>(values: I) -> Option<Ix>
where
    I: Iterator<Item = (Ix, &'a Complex64)>,
{
    values
        .fold(None, |best: Option<(Ix, f64)>, (index, value)| {
            let magnitude = value.norm();
            match best {
                Some((_, peak)) if peak >= magnitude => best,
                _ => Some((index, magnitude)),
            }
        })
        .map(|(index, _)| index)
}
