//! deporder - dependency ordering for typed items
//!
//! Orders a collection of typed items so that every item follows the kinds it
//! declares as dependencies, and validates structural requirements between
//! components of an object tree.
//!
//! # Architecture Overview
//!
//! - Items expose a kind through [`Typed`]
//! - Declarations are read through a [`DependencySource`]: a closure, the
//!   [`DeclarationRegistry`](declaration::DeclarationRegistry) or an adapter
//!   over a host engine's metadata
//! - [`resolve_order`] produces a deterministic dependency-respecting order,
//!   reporting cycles with the chain that caused them
//! - Point checks ([`check_no_duplicates`], [`check_cross_satisfied`],
//!   [`check_main_present`], [`check_not_absent`]) validate sets before use
//!
//! # Core Modules
//!
//! - [`core`] - Error types and the item/kind model
//! - [`resolver`] - Ordering algorithm, consistency checks, dependency graph
//! - [`declaration`] - Registry of kinds, rules and declarations
//! - [`hierarchy`] - Component lookups over an object tree
//! - [`fields`] - Bulk field population through reflection
//! - [`config`] - Resolver options
//! - [`manifest`] - TOML manifest describing kinds, declarations and sets
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use deporder::core::KindName;
//! use deporder::declaration::DeclarationRegistry;
//! use deporder::resolve_order;
//!
//! let mut registry = DeclarationRegistry::with_builtin_rules();
//! registry.define_kind("Transform", Some("Component"))?;
//! registry.define_kind("Rigidbody", Some("Component"))?;
//! registry.require("Rigidbody", ["Transform"])?;
//!
//! let items: Vec<KindName> = ["Rigidbody", "Transform"].into_iter().map(KindName::from).collect();
//! let ordered = resolve_order(&items, &registry, true)?;
//! assert_eq!(ordered[0].as_str(), "Transform");
//! # Ok::<(), deporder::core::DepError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod declaration;
pub mod fields;
pub mod hierarchy;
pub mod manifest;
pub mod resolver;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::core::{DepError, DependencySet, ErrorKind, KindName, Typed};
pub use crate::resolver::{
    DependencySource, Resolver, check_cross_satisfied, check_main_present, check_no_duplicates,
    check_not_absent, extract_dependencies, resolve_order,
};
