//! Core types for deporder
//!
//! This module holds the pieces every other module builds on:
//!
//! ## `error` - Error Handling
//! - [`DepError`] - Enumerated failure modes of the resolver and its adapters
//! - [`ErrorKind`] - Fieldless tag for matching on error categories
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format
//!
//! ## `kind` - Item Identity
//! - [`Typed`] - Items that report a kind
//! - [`Kind`] - Bound for kind keys
//! - [`KindName`] - String-named kind used by manifests and the CLI
//! - [`DependencySet`] - Deduplicated, declaration-ordered set of kinds
//!
//! # Examples
//!
//! ```rust,no_run
//! use deporder::core::{DepError, KindName, Typed};
//!
//! struct Component {
//!     name: &'static str,
//! }
//!
//! impl Typed for Component {
//!     type Kind = KindName;
//!
//!     fn kind(&self) -> KindName {
//!         KindName::from(self.name)
//!     }
//! }
//!
//! fn require(found: bool) -> Result<(), DepError> {
//!     if found {
//!         Ok(())
//!     } else {
//!         Err(DepError::MissingMainComponent {
//!             kind: "Rigidbody".to_string(),
//!         })
//!     }
//! }
//! ```

pub mod error;
pub mod kind;

pub use error::{DepError, ErrorContext, ErrorKind, IntoAnyhowWithContext, user_friendly_error};
pub use kind::{DependencySet, Kind, KindName, Typed};
