use anyhow::Context;
use num_complex::Complex64;
use rcscore::dataset::ConversionFunction;
use rcscore::processing::{IsarImage, IsarVolume, Plane, PlaneImage, RangeProfile, RcsCut, Waterfall};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Long-format CSV: one row per sample, coordinates first, then `re,im`, or
/// a single `value` column when the product's conversion is real valued.
pub struct CsvExport<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
    real: bool,
}

impl CsvExport<File> {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> CsvExport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            rows: 0,
            real: false,
        }
    }

    fn header(&mut self, coordinates: &[&str], conversion: ConversionFunction) -> anyhow::Result<()> {
        self.real = conversion.is_real();
        let mut header: Vec<&str> = coordinates.to_vec();
        if self.real {
            header.push("value");
        } else {
            header.extend(["re", "im"]);
        }
        self.writer.write_record(&header)?;
        Ok(())
    }

    fn row(&mut self, coordinates: &[f64], value: Complex64) -> anyhow::Result<()> {
        let values = if self.real {
            vec![value.re]
        } else {
            vec![value.re, value.im]
        };
        let record: Vec<String> = coordinates
            .iter()
            .chain(values.iter())
            .map(|v| v.to_string())
            .collect();
        self.writer.write_record(&record)?;
        self.rows += 1;
        Ok(())
    }

    pub fn rcs_cut(mut self, cut: &RcsCut) -> anyhow::Result<usize> {
        self.header(&[cut.axis_name], cut.conversion)?;
        for (&coordinate, &value) in cut.axis.iter().zip(cut.values.iter()) {
            self.row(&[coordinate], value)?;
        }
        self.finish()
    }

    pub fn range_profile(mut self, profile: &RangeProfile) -> anyhow::Result<usize> {
        self.header(&["range_m"], profile.conversion)?;
        for (&range, &value) in profile.ranges.iter().zip(profile.values.iter()) {
            self.row(&[range], value)?;
        }
        self.finish()
    }

    pub fn waterfall(mut self, waterfall: &Waterfall) -> anyhow::Result<usize> {
        self.header(&["angle_deg", "range_m"], waterfall.conversion)?;
        for ((a, r), &value) in waterfall.values.indexed_iter() {
            self.row(&[waterfall.angles[a], waterfall.ranges[r]], value)?;
        }
        self.finish()
    }

    pub fn isar_image(mut self, image: &IsarImage) -> anyhow::Result<usize> {
        self.header(&["down_range_m", "cross_range_m"], image.conversion)?;
        for ((i, j), &value) in image.values.indexed_iter() {
            self.row(&[image.down_range[i], image.cross_range[j]], value)?;
        }
        self.finish()
    }

    pub fn isar_volume(mut self, volume: &IsarVolume) -> anyhow::Result<usize> {
        self.header(
            &["down_range_m", "cross_range_m", "elevation_m"],
            volume.conversion,
        )?;
        for ((i, j, k), &value) in volume.values.indexed_iter() {
            self.row(
                &[volume.down_range[i], volume.cross_range[j], volume.elevation[k]],
                value,
            )?;
        }
        self.finish()
    }

    pub fn plane_image(mut self, image: &PlaneImage) -> anyhow::Result<usize> {
        let columns = match image.plane {
            Plane::Xy => ["down_range_m", "cross_range_m"],
            Plane::Xz => ["down_range_m", "elevation_m"],
            Plane::Yz => ["cross_range_m", "elevation_m"],
        };
        self.header(&columns, image.conversion)?;
        for ((i, j), &value) in image.values.indexed_iter() {
            self.row(&[image.first_axis[i], image.second_axis[j]], value)?;
        }
        self.finish()
    }

    fn finish(mut self) -> anyhow::Result<usize> {
        self.writer.flush().context("flushing product export")?;
        Ok(self.rows)
    }
}
