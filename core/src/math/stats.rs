use num_complex::Complex64;

pub struct StatsHelper;

impl StatsHelper {
    pub fn rms<'a, I>(samples: I) -> f64
    where
        I: IntoIterator<Item = &'a Complex64>,
    {
        let (count, sum_sq) = samples
            .into_iter()
            .fold((0usize, 0.0), |(n, acc), v| (n + 1, acc + v.norm_sqr()));
        if count == 0 {
            return 0.0;
        }
        (sum_sq / count as f64).sqrt()
    }

    pub fn peak<'a, I>(samples: I) -> f64
    where
        I: IntoIterator<Item = &'a Complex64>,
    {
        samples.into_iter().map(|v| v.norm()).fold(0.0, f64::max)
    }

    /// Index of the value in an ascending `axis` closest to `value`.
    ///
    /// Values outside the axis snap to the nearest end; ties resolve to the
    /// lower index.
    pub fn nearest_index(axis: &[f64], value: f64) -> Option<usize> {
        if axis.is_empty() || value.is_nan() {
            return None;
        }
        let upper = axis.partition_point(|&v| v < value);
        if upper == 0 {
            return Some(0);
        }
        if upper == axis.len() {
            return Some(axis.len() - 1);
        }
        let lower = upper - 1;
        if (value - axis[lower]) <= (axis[upper] - value) {
            Some(lower)
        } else {
            Some(upper)
        }
    }
}
