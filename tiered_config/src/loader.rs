//! Builder assembling the usual provider stack for an application.
//!
//! Priority, highest first: explicitly added providers, command-line flags,
//! environment variables, custom lookups, YAML documents (later documents
//! win) and serialised defaults.

use std::io::ErrorKind;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{ArgMatches, Command};
use serde::Serialize;
use tracing::debug;

use crate::node::{Node, ROOT, merge_documents};
use crate::provider::{
    ExpandProvider, LookupFn, LookupProvider, Provider, ProviderGroup, TreeProvider,
    command_line_provider,
};
use crate::{ConfigError, ConfigResult, Populate};

enum Document {
    File { path: Utf8PathBuf, required: bool },
    Inline { label: String, contents: String },
}

/// Builder for a [`ProviderGroup`] covering files, environment and flags.
///
/// # Examples
///
/// ```rust
/// use tiered_config::{ConfigLoader, Populate};
///
/// #[derive(Debug, Default, Populate)]
/// struct Server {
///     host: String,
///     #[config(default = "8080")]
///     port: u16,
/// }
///
/// let server: Server = ConfigLoader::new("demo")
///     .yaml_str("base", "host: example.org")
///     .yaml_str("override", "host: internal.example.org")
///     .load()?;
/// assert_eq!(server.host, "internal.example.org");
/// assert_eq!(server.port, 8080);
/// # Ok::<_, tiered_config::ConfigError>(())
/// ```
pub struct ConfigLoader {
    name: String,
    documents: Vec<Document>,
    env_prefix: Option<String>,
    lookups: Vec<Arc<dyn Provider>>,
    command_line: Option<(Command, ArgMatches)>,
    defaults: Option<ConfigResult<Node>>,
    extra: Vec<Arc<dyn Provider>>,
    expand: Option<LookupFn>,
}

impl ConfigLoader {
    /// Creates a loader whose group is called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
            env_prefix: None,
            lookups: Vec::new(),
            command_line: None,
            defaults: None,
            extra: Vec::new(),
            expand: None,
        }
    }

    /// Adds a YAML file that must exist.
    #[must_use]
    pub fn yaml_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.documents.push(Document::File {
            path: path.into(),
            required: true,
        });
        self
    }

    /// Adds a YAML file that is skipped when it does not exist.
    #[must_use]
    pub fn optional_yaml_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.documents.push(Document::File {
            path: path.into(),
            required: false,
        });
        self
    }

    /// Adds an inline YAML document labelled `label` in diagnostics.
    #[must_use]
    pub fn yaml_str(mut self, label: impl Into<String>, contents: impl Into<String>) -> Self {
        self.documents.push(Document::Inline {
            label: label.into(),
            contents: contents.into(),
        });
        self
    }

    /// Reads environment variables named `PREFIX_KEY__CHILD`.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Adds a function-backed source just below the environment.
    #[must_use]
    pub fn lookup<F>(mut self, name: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.lookups.push(LookupProvider::new(name, lookup));
        self
    }

    /// Uses flags the user typed on the command line.
    #[must_use]
    pub fn command_line(mut self, command: &Command, matches: &ArgMatches) -> Self {
        self.command_line = Some((command.clone(), matches.clone()));
        self
    }

    /// Serves `defaults` below every other source.
    ///
    /// Serialisation errors are reported by [`ConfigLoader::build`].
    #[must_use]
    pub fn with_defaults<T: Serialize + ?Sized>(mut self, defaults: &T) -> Self {
        self.defaults = Some(Node::from_serialize(defaults));
        self
    }

    /// Adds a provider above every built-in source.
    ///
    /// Providers added later rank below those added earlier.
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.extra.push(provider);
        self
    }

    /// Expands `${VAR}` references in documents and defaults from the
    /// process environment.
    #[must_use]
    pub fn expand_env(self) -> Self {
        self.expand_with(|name: &str| std::env::var(name).ok())
    }

    /// Expands `${VAR}` references in documents and defaults with `mapper`.
    #[must_use]
    pub fn expand_with<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.expand = Some(Arc::new(mapper));
        self
    }

    fn read_documents(documents: Vec<Document>) -> ConfigResult<Vec<(String, Node)>> {
        let mut parsed = Vec::with_capacity(documents.len());
        for document in documents {
            match document {
                Document::Inline { label, contents } => {
                    let node = Node::from_yaml_str(&label, &contents)?;
                    parsed.push((label, node));
                }
                Document::File { path, required } => match std::fs::read_to_string(&path) {
                    Ok(contents) => {
                        let node = Node::from_yaml_str(path.as_str(), &contents)?;
                        parsed.push((path.into_string(), node));
                    }
                    Err(err) if !required && err.kind() == ErrorKind::NotFound => {
                        debug!(path = %path, "optional configuration file not found");
                    }
                    Err(source) => return Err(ConfigError::File { path, source }),
                },
            }
        }
        Ok(parsed)
    }

    /// Builds the provider group.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while reading or merging documents,
    /// serialising defaults or collecting command-line flags.
    pub fn build(self) -> ConfigResult<Arc<ProviderGroup>> {
        let Self {
            name,
            documents,
            env_prefix,
            lookups,
            command_line,
            defaults,
            extra,
            expand,
        } = self;
        let expanded = |provider: Arc<dyn Provider>| -> Arc<dyn Provider> {
            if let Some(mapper) = &expand {
                return ExpandProvider::with_lookup(provider, Arc::clone(mapper));
            }
            provider
        };

        let mut layers = extra;
        if let Some((command, matches)) = &command_line {
            let flags = command_line_provider(command, matches)?;
            // An empty flag tree would still answer for the root.
            if flags.get(ROOT).child_keys().is_empty() {
                debug!(loader = %name, "no command-line flags supplied");
            } else {
                layers.push(flags);
            }
        }
        if let Some(prefix) = &env_prefix {
            layers.push(LookupProvider::env(prefix));
        }
        layers.extend(lookups);
        if !documents.is_empty() {
            let merged = merge_documents(Self::read_documents(documents)?)?;
            layers.push(expanded(TreeProvider::from_node("yaml", merged)));
        }
        if let Some(node) = defaults.transpose()? {
            layers.push(expanded(TreeProvider::from_node("defaults", node)));
        }
        debug!(loader = %name, layers = layers.len(), "configuration sources assembled");
        Ok(ProviderGroup::new(name, layers))
    }

    /// Builds the group and populates a fresh `T` from its root.
    ///
    /// # Errors
    ///
    /// Returns errors from [`ConfigLoader::build`] and
    /// [`ConfigError::Decode`] when population fails.
    pub fn load<T: Populate + Default>(self) -> ConfigResult<T> {
        let group = self.build()?;
        let mut target = T::default();
        group.get(ROOT).populate(&mut target)?;
        Ok(target)
    }
}
