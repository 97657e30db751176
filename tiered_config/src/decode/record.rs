//! Field tables and validation hooks for derived records.

use std::error::Error;

/// Static description of a record, emitted by `#[derive(Populate)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDescriptor {
    /// Rust name of the type.
    pub name: &'static str,
    /// Fields in declaration order, excluding skipped ones.
    pub fields: &'static [FieldDescriptor],
}

impl RecordDescriptor {
    /// Find the descriptor of the field named `field`.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|descriptor| descriptor.field == field)
    }
}

/// How one field maps onto configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust name of the field.
    pub field: &'static str,
    /// Key segment the field is read from.
    pub key: &'static str,
    /// Literal used when the key has no value.
    pub default: Option<&'static str>,
    /// Whether population fails when the key has no value and no default.
    pub required: bool,
}

/// Types with a derive-generated field table.
pub trait Record {
    /// The type's field table, built once.
    fn descriptor() -> &'static RecordDescriptor;
}

/// Cross-field validation run after a record is populated.
///
/// Opt in with `#[config(validate)]`.
///
/// ```rust
/// use tiered_config::{Populate, Validate};
///
/// #[derive(Default, Populate)]
/// #[config(validate)]
/// struct Window {
///     min: u32,
///     max: u32,
/// }
///
/// impl Validate for Window {
///     fn validate(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///         if self.min > self.max {
///             return Err("min must not exceed max".into());
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validate {
    /// Check the populated value.
    ///
    /// # Errors
    ///
    /// Returns the reason the value is unacceptable; it is wrapped in
    /// [`crate::DecodeError::Validation`] unchanged.
    fn validate(&self) -> Result<(), Box<dyn Error + Send + Sync>>;
}
