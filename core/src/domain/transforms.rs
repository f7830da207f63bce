//! Frequency, range and aspect-angle domain relations.
//!
//! A descriptor is built from exactly one primary domain and derives the
//! others from it:
//!
//! * `fft_bandwidth = num_freq * delta_freq`
//! * `range_resolution = c / (2 * fft_bandwidth)`
//! * `range_period = num_freq * range_resolution`
//! * `cross_range_resolution = (λc / 2) / (2 * sin(aspect_angle / 2))`
//!
//! Frequencies are in Hz, ranges in metres and angles in degrees.

use ndarray::Array1;

use crate::prelude::{RcsError, RcsResult, SPEED_OF_LIGHT};

/// Which domain a descriptor was constructed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryDomain {
    Frequency,
    Range,
    Aspect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainDescriptor {
    primary: PrimaryDomain,
    pub center_freq: f64,
    pub freq_domain: Option<Array1<f64>>,
    pub num_freq: Option<usize>,
    pub delta_freq: Option<f64>,
    pub fft_bandwidth: Option<f64>,
    pub range_domain: Option<Array1<f64>>,
    /// Down-range resolution; for an aspect-primary descriptor this is the
    /// resolution of the cross-range image axis.
    pub range_resolution: Option<f64>,
    pub range_period: Option<f64>,
    pub aspect_domain: Option<Array1<f64>>,
    pub aspect_angle: Option<f64>,
    pub num_aspect_angle: Option<usize>,
    pub cross_range_resolution: Option<f64>,
}

impl DomainDescriptor {
    /// Builds a descriptor from exactly one of the three domains.
    ///
    /// `range_domain` and `aspect_domain` also need `center_freq`; a frequency
    /// domain supplies its own (the sample nearest the midpoint).
    pub fn new(
        freq_domain: Option<&[f64]>,
        range_domain: Option<&[f64]>,
        aspect_domain: Option<&[f64]>,
        center_freq: Option<f64>,
    ) -> RcsResult<Self> {
        let require_center = || {
            center_freq
                .ok_or_else(|| RcsError::Configuration("Center frequency is missing.".into()))
        };
        match (freq_domain, range_domain, aspect_domain) {
            (Some(freqs), None, None) => Self::from_frequency(freqs),
            (None, Some(ranges), None) => Self::from_range(ranges, require_center()?),
            (None, None, Some(angles)) => Self::from_aspect(angles, require_center()?),
            _ => Err(RcsError::Configuration(
                "Incorrect number of domains were passed.".into(),
            )),
        }
    }

    pub fn from_frequency(freqs: &[f64]) -> RcsResult<Self> {
        let num_freq = freqs.len();
        if num_freq < 2 {
            return Err(RcsError::Configuration(
                "Frequency domain needs at least two samples.".into(),
            ));
        }
        let delta_freq = freqs[1] - freqs[0];
        if delta_freq <= 0.0 {
            return Err(RcsError::Configuration(
                "Frequency domain must be strictly increasing.".into(),
            ));
        }
        let center_freq = freqs[num_freq / 2];
        let fft_bandwidth = num_freq as f64 * delta_freq;
        let mut descriptor = Self::empty(PrimaryDomain::Frequency, center_freq);
        descriptor.freq_domain = Some(Array1::from_iter(freqs.iter().copied()));
        descriptor.set_frequency_fields(num_freq, delta_freq, fft_bandwidth);
        descriptor.set_range_fields(num_freq, SPEED_OF_LIGHT / (2.0 * fft_bandwidth));
        Ok(descriptor)
    }

    pub fn from_range(ranges: &[f64], center_freq: f64) -> RcsResult<Self> {
        let num_range = ranges.len();
        if num_range < 2 {
            return Err(RcsError::Configuration(
                "Range domain needs at least two samples.".into(),
            ));
        }
        let range_resolution = ranges[1] - ranges[0];
        if range_resolution <= 0.0 {
            return Err(RcsError::Configuration(
                "Range domain must be strictly increasing.".into(),
            ));
        }
        let fft_bandwidth = SPEED_OF_LIGHT / (2.0 * range_resolution);
        let delta_freq = fft_bandwidth / num_range as f64;
        let mut descriptor = Self::empty(PrimaryDomain::Range, center_freq);
        descriptor.set_range_fields(num_range, range_resolution);
        descriptor.range_domain = Some(Array1::from_iter(ranges.iter().copied()));
        descriptor.set_frequency_fields(num_range, delta_freq, fft_bandwidth);
        descriptor.freq_domain = Some(frequency_domain_from_bandwidth(
            Some(center_freq),
            Some(fft_bandwidth),
            Some(num_range),
        )?);
        Ok(descriptor)
    }

    pub fn from_aspect(angles: &[f64], center_freq: f64) -> RcsResult<Self> {
        let num_aspect_angle = angles.len();
        if num_aspect_angle < 2 {
            return Err(RcsError::Configuration(
                "Aspect domain needs at least two samples.".into(),
            ));
        }
        let aspect_angle = angles[num_aspect_angle - 1] - angles[0];
        let cross_range_resolution = cross_range_resolution(center_freq, aspect_angle)?;
        let mut descriptor = Self::empty(PrimaryDomain::Aspect, center_freq);
        descriptor.aspect_domain = Some(Array1::from_iter(angles.iter().copied()));
        descriptor.aspect_angle = Some(aspect_angle);
        descriptor.num_aspect_angle = Some(num_aspect_angle);
        descriptor.cross_range_resolution = Some(cross_range_resolution);
        descriptor.range_resolution = Some(cross_range_resolution);
        descriptor.range_period = Some(num_aspect_angle as f64 * cross_range_resolution);
        Ok(descriptor)
    }

    pub fn primary(&self) -> PrimaryDomain {
        self.primary
    }

    /// Derives the aspect sweep whose cross-range resolution matches the
    /// current range resolution, with one angle per range sample.
    ///
    /// Only reads the range fields, so repeated calls yield identical results.
    /// An aspect-primary descriptor keeps its supplied sweep.
    pub fn calculate_aspect_domain(&mut self) -> RcsResult<()> {
        if self.primary == PrimaryDomain::Aspect {
            return Ok(());
        }
        let (resolution, period) = match (self.range_resolution, self.range_period) {
            (Some(resolution), Some(period)) => (resolution, period),
            _ => {
                return Err(RcsError::Configuration(
                    "Range domain is missing.".into(),
                ))
            }
        };
        let wavelength = SPEED_OF_LIGHT / self.center_freq;
        let half_sine = (wavelength / (4.0 * resolution)).min(1.0);
        let aspect_angle = (2.0 * half_sine.asin()).to_degrees();
        let num_aspect_angle = (period / resolution).round().max(2.0) as usize;

        self.aspect_angle = Some(aspect_angle);
        self.num_aspect_angle = Some(num_aspect_angle);
        self.cross_range_resolution = Some(cross_range_resolution(self.center_freq, aspect_angle)?);
        self.aspect_domain = Some(Array1::linspace(
            -aspect_angle / 2.0,
            aspect_angle / 2.0,
            num_aspect_angle,
        ));
        Ok(())
    }

    fn empty(primary: PrimaryDomain, center_freq: f64) -> Self {
        Self {
            primary,
            center_freq,
            freq_domain: None,
            num_freq: None,
            delta_freq: None,
            fft_bandwidth: None,
            range_domain: None,
            range_resolution: None,
            range_period: None,
            aspect_domain: None,
            aspect_angle: None,
            num_aspect_angle: None,
            cross_range_resolution: None,
        }
    }

    fn set_frequency_fields(&mut self, num_freq: usize, delta_freq: f64, fft_bandwidth: f64) {
        self.num_freq = Some(num_freq);
        self.delta_freq = Some(delta_freq);
        self.fft_bandwidth = Some(fft_bandwidth);
    }

    fn set_range_fields(&mut self, count: usize, range_resolution: f64) {
        let range_period = count as f64 * range_resolution;
        self.range_resolution = Some(range_resolution);
        self.range_period = Some(range_period);
        self.range_domain = Some(Array1::from_iter(
            (0..count).map(|i| i as f64 * range_resolution),
        ));
    }
}

/// `(λc / 2) / (2 * sin(aspect_angle / 2))` for an angular span in degrees.
pub fn cross_range_resolution(center_freq: f64, aspect_angle: f64) -> RcsResult<f64> {
    if center_freq <= 0.0 {
        return Err(RcsError::Configuration(
            "Center frequency must be positive.".into(),
        ));
    }
    let half_span_sine = (aspect_angle.abs().to_radians() / 2.0).sin();
    if half_span_sine <= f64::EPSILON {
        return Err(RcsError::Configuration(
            "Aspect domain has no angular span.".into(),
        ));
    }
    let wavelength = SPEED_OF_LIGHT / center_freq;
    Ok((wavelength / 2.0) / (2.0 * half_span_sine))
}

/// Uniform frequency array of `num_samples` points spaced
/// `fft_bandwidth / num_samples` apart, with `center_freq` at index `n / 2`.
pub fn frequency_domain_from_bandwidth(
    center_freq: Option<f64>,
    fft_bandwidth: Option<f64>,
    num_samples: Option<usize>,
) -> RcsResult<Array1<f64>> {
    let (center_freq, fft_bandwidth, num_samples) = match (center_freq, fft_bandwidth, num_samples)
    {
        (Some(fc), Some(bw), Some(n)) if n > 0 => (fc, bw, n),
        _ => {
            return Err(RcsError::Configuration(
                "Center frequency, bandwidth and sample count are required.".into(),
            ))
        }
    };
    let delta_freq = fft_bandwidth / num_samples as f64;
    let half = (num_samples / 2) as f64;
    Ok(Array1::from_iter(
        (0..num_samples).map(|i| center_freq + (i as f64 - half) * delta_freq),
    ))
}
