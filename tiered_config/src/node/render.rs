//! Default text rendering of nodes.
//!
//! Scalars render plainly; sequences and mappings render in YAML flow style,
//! e.g. `{server: {hosts: [a, b]}}`. String destinations and error messages
//! both use this rendering.

use std::fmt;

use super::{Node, Scalar};

/// Render a float using its shortest round-trip digits.
///
/// Magnitudes from `1e21` upwards, or below `1e-4`, use an exponent with an
/// explicit sign so that the text matches what YAML authors write:
///
/// ```rust
/// use tiered_config::format_float;
///
/// assert_eq!(format_float(f64::MAX), "1.7976931348623157e+308");
/// assert_eq!(format_float(2.5), "2.5");
/// assert_eq!(format_float(3.0), "3");
/// assert_eq!(format_float(1.5e-7), "1.5e-7");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "+Inf" } else { "-Inf" });
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e21).contains(&magnitude) {
        let text = format!("{value:e}");
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        };
    }
    value.to_string()
}

pub(crate) fn scalar_text(scalar: &Scalar) -> String {
    scalar.to_string()
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::UInt(value) => write!(f, "{value}"),
            Self::Float(value) => f.write_str(&format_float(*value)),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => scalar.fmt(f),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt(f)?;
                }
                f.write_str("]")
            }
            Self::Mapping(mapping) => {
                f.write_str("{")?;
                for (index, (key, value)) in mapping.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}
