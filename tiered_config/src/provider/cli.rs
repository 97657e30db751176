//! Command-line flags as a provider.
//!
//! Only arguments the user actually typed contribute; clap defaults count as
//! absent so that files and the environment can still supply those keys.

use std::ffi::OsString;
use std::iter;
use std::sync::Arc;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use super::TreeProvider;
use crate::node::{Mapping, Node, SEPARATOR, merge};
use crate::ConfigResult;

const NAME: &str = "cmd";

fn accepts_many(arg: &Arg) -> bool {
    matches!(arg.get_action(), ArgAction::Append)
        || arg.get_value_delimiter().is_some()
        || arg
            .get_num_args()
            .is_some_and(|range| range.max_values() > 1)
}

fn indexed(values: Vec<String>) -> Node {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| (index.to_string(), value))
        .collect::<Mapping>()
        .into()
}

fn arg_node(arg: &Arg, matches: &ArgMatches) -> Option<Node> {
    let id = arg.get_id().as_str();
    match arg.get_action() {
        ArgAction::SetTrue | ArgAction::SetFalse => {
            return matches.try_get_one::<bool>(id).ok().flatten().map(|flag| Node::from(*flag));
        }
        ArgAction::Count => {
            return matches
                .try_get_one::<u8>(id)
                .ok()
                .flatten()
                .map(|count| Node::from(i64::from(*count)));
        }
        _ => {}
    }
    let values: Vec<String> = matches
        .try_get_raw(id)
        .ok()
        .flatten()?
        .map(|raw| raw.to_string_lossy().into_owned())
        .collect();
    if accepts_many(arg) {
        Some(indexed(values))
    } else {
        values.into_iter().last().map(Node::from)
    }
}

/// Build a provider named `cmd` from parsed matches.
///
/// Argument ids containing `.` become nested mappings, so `--server-port`
/// declared with `id = "server.port"` is served at `server.port`. Arguments
/// that accept several values become mappings keyed `0`, `1`, … which
/// decode into sequences.
///
/// # Errors
///
/// Returns [`crate::ConfigError::MergeConflict`] when two ids disagree about
/// the shape of a key, such as `server` next to `server.port`.
pub fn command_line_provider(
    command: &Command,
    matches: &ArgMatches,
) -> ConfigResult<Arc<TreeProvider>> {
    let mut root = Node::empty_mapping();
    for arg in command.get_arguments() {
        let id = arg.get_id().as_str();
        if matches.value_source(id) != Some(ValueSource::CommandLine) {
            continue;
        }
        let Some(node) = arg_node(arg, matches) else {
            continue;
        };
        let nested = id.rsplit(SEPARATOR).fold(node, |child, segment| {
            iter::once((segment, child)).collect::<Mapping>().into()
        });
        merge(&mut root, nested)?;
    }
    Ok(TreeProvider::from_node(NAME, root))
}

/// Parse `args` against `command` and build a provider from the matches.
///
/// # Errors
///
/// Returns [`crate::ConfigError::CommandLine`] when parsing fails, including
/// for help and version requests, and the errors of
/// [`command_line_provider`] otherwise.
pub fn command_line_provider_from_args<I, T>(
    command: &Command,
    args: I,
) -> ConfigResult<Arc<TreeProvider>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command.clone().try_get_matches_from(args)?;
    command_line_provider(command, &matches)
}
