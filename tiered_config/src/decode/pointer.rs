//! Optional and pointer-like destinations.
//!
//! Shared pointers are the only way a destination graph can contain a cycle,
//! so they register their address with the decoder before descending.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Decoder, Populate, Shape};
use crate::error::{DecodeError, DecodeResult};

impl<T: Populate + Default> Populate for Option<T> {
    const SHAPE: Shape = Shape::Optional;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        default: Option<&str>,
    ) -> DecodeResult<()> {
        if decoder.lookup(key).is_none() {
            return Ok(());
        }
        self.get_or_insert_with(T::default)
            .populate(decoder, key, default)
    }
}

impl<T: Populate> Populate for Box<T> {
    const SHAPE: Shape = Shape::Optional;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        default: Option<&str>,
    ) -> DecodeResult<()> {
        self.as_mut().populate(decoder, key, default)
    }
}

impl<T: Populate> Populate for Rc<RefCell<T>> {
    const SHAPE: Shape = Shape::Optional;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        default: Option<&str>,
    ) -> DecodeResult<()> {
        decoder.enter(Rc::as_ptr(self).addr(), key)?;
        let mut inner = self.try_borrow_mut().map_err(|_| DecodeError::Borrowed {
            key: key.to_owned(),
        })?;
        inner.populate(decoder, key, default)
    }
}

impl<T: Populate> Populate for Arc<Mutex<T>> {
    const SHAPE: Shape = Shape::Optional;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        default: Option<&str>,
    ) -> DecodeResult<()> {
        decoder.enter(Arc::as_ptr(self).addr(), key)?;
        let mut inner = self.try_lock().ok_or_else(|| DecodeError::Borrowed {
            key: key.to_owned(),
        })?;
        inner.populate(decoder, key, default)
    }
}
