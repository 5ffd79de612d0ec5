//! Bulk field assignment by name.
//!
//! Objects describe their assignable fields with a static [`FieldSchema`];
//! schemas chain to their base kind's schema the way the object types
//! inherit. [`set_fields`] looks each name up along that chain and hands the
//! value to [`Reflect::set_field`] of the most-derived schema that declares the
//! name and passes the [`FieldFilter`].
//!
//! Values are [`serde_json::Value`]s; implementations convert them with
//! [`assign`], which reports shape mismatches as
//! [`DepError::InvalidFieldValue`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use deporder::core::DepError;
//! use deporder::fields::{FieldDef, FieldSchema, Reflect, Visibility, assign, set_serialized_fields};
//! use serde_json::{Value, json};
//!
//! static SPAWNER: FieldSchema = FieldSchema {
//!     kind: "Spawner",
//!     base: None,
//!     fields: &[FieldDef::new("rate", Visibility::Serialized)],
//! };
//!
//! #[derive(Default)]
//! struct Spawner {
//!     rate: f32,
//! }
//!
//! impl Reflect for Spawner {
//!     fn schema(&self) -> &'static FieldSchema {
//!         &SPAWNER
//!     }
//!
//!     fn set_field(&mut self, _owner: &str, name: &str, value: Value) -> Result<(), DepError> {
//!         match name {
//!             "rate" => assign(&mut self.rate, name, value),
//!             _ => unreachable!("schema only lists 'rate'"),
//!         }
//!     }
//!
//!     fn get_field(&self, name: &str) -> Option<Value> {
//!         (name == "rate").then(|| json!(self.rate))
//!     }
//! }
//!
//! let mut spawner = Spawner::default();
//! set_serialized_fields(&mut spawner, [("rate", json!(2.5))])?;
//! assert_eq!(spawner.rate, 2.5);
//! # Ok::<(), DepError>(())
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::DepError;
use crate::resolver::check_not_absent;

/// Declared visibility of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Publicly visible; assignable by default.
    Public,
    /// Not public but explicitly marked serializable; assignable by default.
    Serialized,
    /// Neither; rejected by [`SerializableOnly`].
    Private,
}

/// One field of a [`FieldSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub visibility: Visibility,
}

impl FieldDef {
    #[must_use]
    pub const fn new(name: &'static str, visibility: Visibility) -> Self {
        Self {
            name,
            visibility,
        }
    }
}

/// Fields declared by one kind, chained to its base kind's schema.
#[derive(Debug)]
pub struct FieldSchema {
    pub kind: &'static str,
    pub base: Option<&'static FieldSchema>,
    pub fields: &'static [FieldDef],
}

impl FieldSchema {
    /// Iterate from this schema to the root of the chain.
    pub fn ancestry(&'static self) -> impl Iterator<Item = &'static FieldSchema> {
        std::iter::successors(Some(self), |schema| schema.base)
    }

    /// Most-derived declaration of `name` accepted by `filter`.
    pub fn lookup<F>(&'static self, name: &str, filter: &F) -> Option<(&'static FieldSchema, &'static FieldDef)>
    where
        F: FieldFilter + ?Sized,
    {
        self.ancestry().find_map(|schema| {
            schema
                .fields
                .iter()
                .find(|field| field.name == name && filter.accepts(schema, field))
                .map(|field| (schema, field))
        })
    }
}

/// Predicate deciding which fields may be assigned in bulk.
pub trait FieldFilter {
    fn accepts(&self, owner: &FieldSchema, field: &FieldDef) -> bool;
}

impl<F> FieldFilter for F
where
    F: Fn(&FieldSchema, &FieldDef) -> bool,
{
    fn accepts(&self, owner: &FieldSchema, field: &FieldDef) -> bool {
        self(owner, field)
    }
}

/// Accepts public and serialized fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializableOnly;

impl FieldFilter for SerializableOnly {
    fn accepts(&self, _owner: &FieldSchema, field: &FieldDef) -> bool {
        matches!(field.visibility, Visibility::Public | Visibility::Serialized)
    }
}

/// Accepts exactly the listed field names, whatever their visibility.
#[derive(Debug, Clone, Copy)]
pub struct AllowList<'a>(pub &'a [&'a str]);

impl FieldFilter for AllowList<'_> {
    fn accepts(&self, _owner: &FieldSchema, field: &FieldDef) -> bool {
        self.0.contains(&field.name)
    }
}

/// Objects whose fields can be assigned by name.
pub trait Reflect {
    /// Schema of the object's most-derived kind.
    fn schema(&self) -> &'static FieldSchema;

    /// Assign `value` to the field `name` declared by the schema of kind `owner`.
    ///
    /// Only called for names [`FieldSchema::lookup`] resolved, so `owner`
    /// disambiguates a derived field hiding a base field of the same name.
    fn set_field(&mut self, owner: &str, name: &str, value: Value) -> Result<(), DepError>;

    /// Current value of `name`, or `None` if the object has no such field.
    fn get_field(&self, name: &str) -> Option<Value>;
}

/// Deserialize `value` into `slot`.
///
/// # Errors
///
/// [`DepError::InvalidFieldValue`] if `value` does not fit `T`; `slot` is
/// left untouched.
pub fn assign<T: DeserializeOwned>(slot: &mut T, field: &str, value: Value) -> Result<(), DepError> {
    *slot = serde_json::from_value(value).map_err(|e| DepError::InvalidFieldValue {
        field: field.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Assign every `(name, value)` pair to `target`.
///
/// All names are resolved before anything is assigned, so an unknown or
/// filtered name leaves `target` unchanged. A value that fails to convert
/// stops the assignment at that field.
///
/// # Errors
///
/// - [`DepError::UnserializableField`] if a name is not declared along the
///   schema chain, or only by fields `filter` rejects
/// - [`DepError::InvalidFieldValue`] from [`Reflect::set_field`]
pub fn set_fields<R, F, N>(
    target: &mut R,
    values: impl IntoIterator<Item = (N, Value)>,
    filter: &F,
) -> Result<(), DepError>
where
    R: Reflect + ?Sized,
    F: FieldFilter + ?Sized,
    N: AsRef<str>,
{
    let schema = target.schema();
    let mut resolved = Vec::new();

    for (name, value) in values {
        let name = name.as_ref();
        let Some((owner, field)) = schema.lookup(name, filter) else {
            return Err(DepError::UnserializableField {
                kind: schema.kind.to_string(),
                field: name.to_string(),
            });
        };
        resolved.push((owner.kind, field.name, value));
    }

    tracing::trace!("Assigning {} field(s) on '{}'", resolved.len(), schema.kind);
    for (owner, name, value) in resolved {
        target.set_field(owner, name, value)?;
    }
    Ok(())
}

/// [`set_fields`] with the [`SerializableOnly`] filter.
///
/// # Errors
///
/// As [`set_fields`].
pub fn set_serialized_fields<R, N>(
    target: &mut R,
    values: impl IntoIterator<Item = (N, Value)>,
) -> Result<(), DepError>
where
    R: Reflect + ?Sized,
    N: AsRef<str>,
{
    set_fields(target, values, &SerializableOnly)
}

/// Fail if any named field is missing or null.
///
/// # Errors
///
/// [`DepError::MissingRequiredValue`] naming the first absent field.
pub fn require_fields<R: Reflect + ?Sized>(target: &R, names: &[&str]) -> Result<(), DepError> {
    for &name in names {
        let value = target.get_field(name).filter(|v| !v.is_null());
        check_not_absent(value, Some(name))?;
    }
    Ok(())
}
