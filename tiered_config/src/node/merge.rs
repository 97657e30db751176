//! Deterministic deep merge of node trees.

use std::sync::Arc;

use tracing::debug;

use super::{Node, ROOT, join_key, render};
use crate::{ConfigError, ConfigResult};

/// Merge `src` into `dst`.
///
/// Two mappings merge key by key: keys missing from `dst` are inserted and
/// keys present on both sides merge recursively. Keys are compared
/// case-insensitively, as lookups are, and the existing spelling is kept. A scalar `src` replaces
/// whatever `dst` holds, as does a sequence landing on a scalar or another
/// sequence.
///
/// # Errors
///
/// Returns [`ConfigError::MergeConflict`] when a mapping lands on a
/// non-mapping or a sequence lands on a mapping. `dst` may already hold
/// entries merged before the conflicting path was reached.
///
/// # Examples
///
/// ```rust
/// use tiered_config::{Node, merge};
///
/// let mut base = Node::from_yaml_str("base", "a: {keep: 1, override: 0}")?;
/// let over = Node::from_yaml_str("over", "a: {override: 2}")?;
/// merge(&mut base, over)?;
/// assert_eq!(base.to_string(), "{a: {keep: 1, override: 2}}");
/// # Ok::<_, tiered_config::ConfigError>(())
/// ```
pub fn merge(dst: &mut Node, src: Node) -> ConfigResult<()> {
    merge_at(dst, src, ROOT)
}

fn merge_at(dst: &mut Node, src: Node, path: &str) -> ConfigResult<()> {
    let destination_kind = dst.type_name();
    match (dst, src) {
        (Node::Mapping(shared), Node::Mapping(src_map)) => {
            let dst_map = Arc::make_mut(shared);
            for (key, value) in Arc::unwrap_or_clone(src_map).entries {
                let rendered = render::scalar_text(&key);
                match dst_map.entry_mut(&rendered) {
                    Some(existing) => merge_at(existing, value, &join_key(path, &rendered))?,
                    None => dst_map.insert(key, value),
                }
            }
            Ok(())
        }
        (_, src @ Node::Mapping(_)) | (Node::Mapping(_), src @ Node::Sequence(_)) => {
            Err(ConfigError::MergeConflict {
                path: path.to_owned(),
                source_kind: src.type_name(),
                destination_kind,
            })
        }
        (slot, src) => {
            *slot = src;
            Ok(())
        }
    }
}

/// Merge mapping-rooted documents left to right, later documents winning.
pub(crate) fn merge_documents<I>(documents: I) -> ConfigResult<Node>
where
    I: IntoIterator<Item = (String, Node)>,
{
    let mut merged = Node::empty_mapping();
    for (source_name, document) in documents {
        if !matches!(document, Node::Mapping(_)) {
            return Err(ConfigError::NonMappingRoot {
                source_name,
                found: document.type_name(),
            });
        }
        debug!(source = %source_name, "merging configuration document");
        merge(&mut merged, document)?;
    }
    Ok(merged)
}
