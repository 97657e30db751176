//! Conversion of scalar nodes into primitive Rust types.
//!
//! Integers are range-checked through `i128`, so every integer width rejects
//! overflow and negative values land on unsigned targets only as errors.
//! Floats convert into integers only when they are finite and integral.
//! Strings are parsed as integers first and as floats second.

use crate::node::{Scalar, format_float};

/// Types that can be produced from a single scalar node.
pub(crate) trait Coerce: Sized {
    /// Name used for the target in conversion errors.
    const KIND: &'static str;

    /// Convert `scalar`, returning `None` when it does not fit.
    fn coerce(scalar: &Scalar) -> Option<Self>;
}

// 2^127, the first magnitude that no longer fits an i128.
const I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
const I128_FLOOR: f64 = -170_141_183_460_469_231_731_687_303_715_884_105_728.0;

fn integral_float(value: f64) -> Option<i128> {
    if !value.is_finite() || value.fract() != 0.0 || !(I128_FLOOR..I128_LIMIT).contains(&value) {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is integral and inside the i128 range"
    )]
    let whole = value as i128;
    Some(whole)
}

fn integer(scalar: &Scalar) -> Option<i128> {
    match scalar {
        Scalar::Int(value) => Some(i128::from(*value)),
        Scalar::UInt(value) => Some(i128::from(*value)),
        Scalar::Float(value) => integral_float(*value),
        Scalar::String(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i128>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_float))
        }
        Scalar::Null | Scalar::Bool(_) => None,
    }
}

macro_rules! coerce_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl Coerce for $ty {
            const KIND: &'static str = stringify!($ty);

            fn coerce(scalar: &Scalar) -> Option<Self> {
                integer(scalar).and_then(|value| Self::try_from(value).ok())
            }
        }
    )*};
}

coerce_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

fn mentions_infinity(text: &str) -> bool {
    text.to_ascii_lowercase().contains("inf")
}

impl Coerce for f64 {
    const KIND: &'static str = "f64";

    #[expect(
        clippy::cast_precision_loss,
        reason = "integers map onto the nearest representable float"
    )]
    fn coerce(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Int(value) => Some(*value as Self),
            Scalar::UInt(value) => Some(*value as Self),
            Scalar::Float(value) => Some(*value),
            Scalar::String(text) => {
                let trimmed = text.trim();
                let parsed: Self = trimmed.parse().ok()?;
                // Overflow parses to infinity; only an explicit literal may.
                (!parsed.is_infinite() || mentions_infinity(trimmed)).then_some(parsed)
            }
            Scalar::Null | Scalar::Bool(_) => None,
        }
    }
}

impl Coerce for f32 {
    const KIND: &'static str = "f32";

    fn coerce(scalar: &Scalar) -> Option<Self> {
        let wide = f64::coerce(scalar)?;
        if wide.is_finite() && wide.abs() > f64::from(Self::MAX) {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "range checked above; precision loss is expected"
        )]
        let narrow = wide as Self;
        Some(narrow)
    }
}

impl Coerce for bool {
    const KIND: &'static str = "bool";

    fn coerce(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Bool(value) => Some(*value),
            Scalar::Null => None,
            other => match other.to_string().trim() {
                "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
                "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
                _ => None,
            },
        }
    }
}

impl Coerce for String {
    const KIND: &'static str = "string";

    fn coerce(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Null => None,
            Scalar::Float(value) => Some(format_float(*value)),
            other => Some(other.to_string()),
        }
    }
}

impl Coerce for char {
    const KIND: &'static str = "char";

    fn coerce(scalar: &Scalar) -> Option<Self> {
        let text = String::coerce(scalar)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }
}
