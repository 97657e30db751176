//! Destinations parsed from their text form.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use camino::Utf8PathBuf;

use super::{Decoder, Populate, Shape};
use crate::error::{DecodeError, DecodeResult};
use crate::value::parse_duration;

/// Parse the text at `key` (or `default`) with [`FromStr`] into `target`.
///
/// This backs `#[config(from_str)]` types. The parser's error message is
/// reported unchanged.
///
/// # Errors
///
/// Returns [`DecodeError::Parse`] when parsing fails.
pub fn populate_from_str<T>(
    target: &mut T,
    decoder: &Decoder<'_>,
    key: &str,
    default: Option<&str>,
) -> DecodeResult<()>
where
    T: FromStr,
    T::Err: Display,
{
    if let Some(text) = decoder.text(key, default) {
        *target = text.parse().map_err(|err| DecodeError::parse(key, err))?;
    }
    Ok(())
}

impl Populate for Duration {
    const SHAPE: Shape = Shape::CustomText;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        default: Option<&str>,
    ) -> DecodeResult<()> {
        if let Some(text) = decoder.text(key, default) {
            *self = parse_duration(&text).map_err(|err| DecodeError::parse(key, err))?;
        }
        Ok(())
    }
}

macro_rules! populate_parsed {
    ($($ty:ty),* $(,)?) => {$(
        impl Populate for $ty {
            const SHAPE: Shape = Shape::CustomText;

            fn populate(
                &mut self,
                decoder: &mut Decoder<'_>,
                key: &str,
                default: Option<&str>,
            ) -> DecodeResult<()> {
                populate_from_str(self, decoder, key, default)
            }
        }
    )*};
}

populate_parsed!(PathBuf, Utf8PathBuf);
