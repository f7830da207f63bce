use std::f64::consts::PI;

use crate::prelude::{RcsError, RcsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFamily {
    Frequency,
    Length,
    Angle,
}

/// Family and SI scale (Hz, m, rad) of a unit name.
pub fn unit_scale(unit: &str) -> Option<(UnitFamily, f64)> {
    let scale = match unit.trim() {
        "Hz" | "hz" => (UnitFamily::Frequency, 1.0),
        "kHz" | "khz" => (UnitFamily::Frequency, 1e3),
        "MHz" | "mhz" => (UnitFamily::Frequency, 1e6),
        "GHz" | "ghz" => (UnitFamily::Frequency, 1e9),
        "THz" | "thz" => (UnitFamily::Frequency, 1e12),
        "nm" => (UnitFamily::Length, 1e-9),
        "um" => (UnitFamily::Length, 1e-6),
        "mm" => (UnitFamily::Length, 1e-3),
        "cm" => (UnitFamily::Length, 1e-2),
        "dm" => (UnitFamily::Length, 1e-1),
        "m" | "meter" | "meters" => (UnitFamily::Length, 1.0),
        "km" => (UnitFamily::Length, 1e3),
        "mil" => (UnitFamily::Length, 2.54e-5),
        "in" | "inch" => (UnitFamily::Length, 0.0254),
        "ft" => (UnitFamily::Length, 0.3048),
        "yd" => (UnitFamily::Length, 0.9144),
        "deg" | "degree" | "degrees" => (UnitFamily::Angle, PI / 180.0),
        "rad" => (UnitFamily::Angle, 1.0),
        _ => return None,
    };
    Some(scale)
}

/// Splits `"10GHz"` into `(10.0, "GHz")`; a bare number has an empty unit.
pub fn split_num_units(text: &str) -> RcsResult<(f64, String)> {
    let text = text.trim();
    let numeric_end = text
        .char_indices()
        .find(|(_, ch)| !(ch.is_ascii_digit() || matches!(ch, '.' | '+' | '-' | 'e' | 'E')))
        .map_or(text.len(), |(idx, _)| idx);

    // An exponent marker may belong to the unit ("2em"), so back off until the
    // prefix parses.
    let mut end = numeric_end;
    while end > 0 {
        if let Ok(value) = text[..end].parse::<f64>() {
            return Ok((value, text[end..].trim().to_string()));
        }
        end -= 1;
    }
    Err(RcsError::Value(format!("'{text}' does not start with a number")))
}

/// Converts `value` between two units of the same family.
pub fn convert_units(value: f64, from: &str, to: &str) -> RcsResult<f64> {
    let (from_family, from_scale) =
        unit_scale(from).ok_or_else(|| RcsError::Value(format!("unknown unit '{from}'")))?;
    let (to_family, to_scale) =
        unit_scale(to).ok_or_else(|| RcsError::Value(format!("unknown unit '{to}'")))?;
    if from_family != to_family {
        return Err(RcsError::Value(format!(
            "cannot convert '{from}' to '{to}'"
        )));
    }
    Ok(value * from_scale / to_scale)
}

/// Parses a quantity such as `"2.5GHz"` into `target` units; a bare number is
/// taken to be in `target` already.
pub fn parse_quantity(text: &str, target: &str) -> RcsResult<f64> {
    let (value, unit) = split_num_units(text)?;
    if unit.is_empty() {
        return Ok(value);
    }
    convert_units(value, &unit, target)
}
