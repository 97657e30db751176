//! Primitive destinations.

use super::{Decoder, Populate, Shape};
use crate::error::DecodeResult;

macro_rules! populate_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Populate for $ty {
            const SHAPE: Shape = Shape::Scalar;

            fn populate(
                &mut self,
                decoder: &mut Decoder<'_>,
                key: &str,
                default: Option<&str>,
            ) -> DecodeResult<()> {
                if let Some(value) = decoder.scalar::<Self>(key, default)? {
                    *self = value;
                }
                Ok(())
            }
        }
    )*};
}

populate_scalar!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
);
