//! Building node trees from YAML text and from serialisable data.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_saphyr::Options;

use super::{Mapping, Node, Scalar};
use crate::{ConfigError, ConfigResult};

impl Node {
    /// Parse one YAML document.
    ///
    /// Booleans follow YAML 1.2 strictly, so `yes` and `on` stay strings.
    /// Empty documents (blank or comment-only) parse to an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] naming `source_name` when the text is
    /// not valid YAML.
    pub fn from_yaml_str(source_name: &str, contents: &str) -> ConfigResult<Self> {
        if is_blank_document(contents) {
            return Ok(Self::empty_mapping());
        }
        let node: Self = serde_saphyr::from_str_with_options(
            contents,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
        .map_err(|err| ConfigError::parse(source_name, err))?;
        Ok(if node.is_null() {
            Self::empty_mapping()
        } else {
            node
        })
    }

    /// Convert any serialisable value into the document model.
    ///
    /// The value is serialised to JSON data and then read back through the
    /// same [`Deserialize`] implementation used for YAML, so static data and
    /// parsed documents produce identical trees. JSON maps only carry string
    /// keys; integer keys are stringified, which is also how paths address
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] when `data` cannot be serialised.
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> ConfigResult<Self> {
        let json = serde_json::to_value(data)?;
        Ok(Self::deserialize(json)?)
    }
}

fn is_blank_document(contents: &str) -> bool {
    contents.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, sequence or mapping")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Node, E> {
        if let Ok(small) = i64::try_from(v) {
            return Ok(Node::from(small));
        }
        u64::try_from(v)
            .map(Node::from)
            .map_err(|_| E::custom(format!("integer {v} is out of range")))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Node, E> {
        u64::try_from(v)
            .map(Node::from)
            .map_err(|_| E::custom(format!("integer {v} is out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<Node, E> {
        Ok(Node::from(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Node>()? {
            items.push(item);
        }
        Ok(Node::Sequence(items.into()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut mapping = Mapping::new();
        while let Some((key, value)) = map.next_entry::<Scalar, Node>()? {
            mapping.insert(key, value);
        }
        Ok(Node::Mapping(Arc::new(mapping)))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Node::deserialize(deserializer)? {
            Node::Scalar(scalar) => Ok(scalar),
            other => Err(de::Error::custom(format!(
                "mapping keys must be scalars, found {}",
                other.type_name()
            ))),
        }
    }
}
