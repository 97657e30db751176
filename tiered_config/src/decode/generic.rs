//! Destinations that take raw nodes.

use super::{Decoder, Populate, Shape};
use crate::error::{DecodeError, DecodeResult};
use crate::node::{Mapping, Node};

impl Populate for Node {
    const SHAPE: Shape = Shape::Generic;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        default: Option<&str>,
    ) -> DecodeResult<()> {
        let value = decoder.get(key);
        match (value.value(), default) {
            (Some(raw), _) => *self = raw.clone(),
            (None, Some(literal)) => *self = Self::from(literal),
            (None, None) => {}
        }
        Ok(())
    }

    fn from_raw(_key: &str, raw: &Node) -> Option<DecodeResult<Self>> {
        Some(Ok(raw.clone()))
    }
}

fn require_mapping(key: &str, raw: &Node) -> DecodeResult<Mapping> {
    raw.as_mapping()
        .cloned()
        .ok_or_else(|| DecodeError::Capability {
            key: key.to_owned(),
            required: "mapping",
            found: raw.type_name(),
        })
}

impl Populate for Mapping {
    const SHAPE: Shape = Shape::Generic;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        _default: Option<&str>,
    ) -> DecodeResult<()> {
        if let Some(raw) = decoder.lookup(key) {
            *self = require_mapping(key, &raw)?;
        }
        Ok(())
    }

    fn from_raw(key: &str, raw: &Node) -> Option<DecodeResult<Self>> {
        Some(require_mapping(key, raw))
    }
}
