//! Sequence, array and map destinations.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};
use std::str::FromStr;

use super::{Decoder, Populate, Shape, short_type_name};
use crate::error::{DecodeError, DecodeResult};
use crate::node::{Node, join_key};

/// Decode `key.0`, `key.1`, … until the first index without a value.
fn decode_items<T: Populate + Default>(
    decoder: &mut Decoder<'_>,
    key: &str,
) -> DecodeResult<Vec<T>> {
    let mut items = Vec::new();
    loop {
        let item_key = join_key(key, &items.len().to_string());
        if decoder.lookup(&item_key).is_none() {
            return Ok(items);
        }
        let mut item = T::default();
        item.populate(decoder, &item_key, None)?;
        items.push(item);
    }
}

impl<T: Populate + Default> Populate for Vec<T> {
    const SHAPE: Shape = Shape::Sequence;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        _default: Option<&str>,
    ) -> DecodeResult<()> {
        let items = decode_items(decoder, key)?;
        if !items.is_empty() {
            *self = items;
        }
        Ok(())
    }
}

impl<T: Populate + Default> Populate for VecDeque<T> {
    const SHAPE: Shape = Shape::Sequence;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        _default: Option<&str>,
    ) -> DecodeResult<()> {
        let items = decode_items(decoder, key)?;
        if !items.is_empty() {
            *self = items.into();
        }
        Ok(())
    }
}

impl<T: Populate, const N: usize> Populate for [T; N] {
    const SHAPE: Shape = Shape::FixedSequence;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        _default: Option<&str>,
    ) -> DecodeResult<()> {
        for (index, slot) in self.iter_mut().enumerate() {
            let item_key = join_key(key, &index.to_string());
            // Absent records are still visited so their field defaults apply.
            if T::SHAPE == Shape::Record || decoder.lookup(&item_key).is_some() {
                slot.populate(decoder, &item_key, None)?;
            }
        }
        Ok(())
    }
}

/// Decode the entries of the mapping at `key`, or `None` when it is absent.
fn decode_entries<K, V>(decoder: &mut Decoder<'_>, key: &str) -> DecodeResult<Option<Vec<(K, V)>>>
where
    K: FromStr,
    K::Err: Display,
    V: Populate + Default,
{
    let Some(node) = decoder.lookup(key) else {
        return Ok(None);
    };
    let found = node.type_name();
    let Node::Mapping(mapping) = node else {
        return Err(DecodeError::ExpectedMapping {
            key: key.to_owned(),
            found,
        });
    };
    let mut entries = Vec::with_capacity(mapping.len());
    for (name, raw) in mapping.children() {
        if name.is_empty() {
            return Err(DecodeError::EmptyMapKey {
                key: key.to_owned(),
            });
        }
        let entry_key = join_key(key, name);
        let parsed = name.parse::<K>().map_err(|_| DecodeError::Conversion {
            key: entry_key.clone(),
            literal: name.clone(),
            source_kind: "string",
            target_kind: short_type_name::<K>(),
        })?;
        let value = match V::from_raw(&entry_key, raw) {
            Some(result) => result?,
            None => {
                let mut value = V::default();
                value.populate(decoder, &entry_key, None)?;
                value
            }
        };
        entries.push((parsed, value));
    }
    Ok(Some(entries))
}

impl<K, V, S> Populate for HashMap<K, V, S>
where
    K: FromStr + Eq + Hash,
    K::Err: Display,
    V: Populate + Default,
    S: BuildHasher + Default,
{
    const SHAPE: Shape = Shape::Map;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        _default: Option<&str>,
    ) -> DecodeResult<()> {
        if let Some(entries) = decode_entries(decoder, key)? {
            *self = entries.into_iter().collect();
        }
        Ok(())
    }
}

impl<K, V> Populate for BTreeMap<K, V>
where
    K: FromStr + Ord,
    K::Err: Display,
    V: Populate + Default,
{
    const SHAPE: Shape = Shape::Map;

    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        _default: Option<&str>,
    ) -> DecodeResult<()> {
        if let Some(entries) = decode_entries(decoder, key)? {
            *self = entries.into_iter().collect();
        }
        Ok(())
    }
}
