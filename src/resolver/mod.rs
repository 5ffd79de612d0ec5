//! Dependency ordering and consistency checks.
//!
//! This module orders a set of typed items so that every item follows the
//! kinds it declares as dependencies, and answers the point checks callers
//! need before using such a set.
//!
//! # Architecture Overview
//!
//! Declarations are read through the [`DependencySource`] strategy trait. The
//! resolver never knows where a declaration came from: a closure, the
//! [`DeclarationRegistry`](crate::declaration::DeclarationRegistry) or a host
//! engine adapter all look the same.
//!
//! - [`order`] - The ordering algorithm ([`resolve_order`])
//! - [`checks`] - Duplicate, cross-set, main item and required value checks
//! - [`dependency_graph`] - Graph view used for cycle chains and tree rendering
//! - [`Resolver`] - Facade bundling a source, a [`ResolverConfig`] and an
//!   optional error mapper
//!
//! # Resolution Process
//!
//! 1. **Extraction**: Each item's declared kinds are read once and deduplicated
//! 2. **Presence**: The set of kinds present anywhere in the input is computed
//! 3. **Scan**: Remaining items are scanned in input order; the first item whose
//!    present dependencies are all placed is moved to the output
//! 4. **Restart**: The scan restarts from the front after every placement
//! 5. **Failure**: A scan that places nothing reports the cycle it found
//!
//! ## Algorithm Complexity
//!
//! - **Time**: O(n² · d) where n is the item count and d the average number of
//!   declared dependencies
//! - **Space**: O(n) working state, dropped on return
//!
//! The linear rescan is what makes the order deterministic: among eligible
//! items the one earliest in the input always wins.
//!
//! # Examples
//!
//! ```rust,no_run
//! use deporder::core::{KindName, Typed};
//! use deporder::resolver::resolve_order;
//!
//! let items: Vec<KindName> = ["C", "A", "B"].into_iter().map(KindName::from).collect();
//! let source = |kind: &KindName| -> Vec<Option<KindName>> {
//!     match kind.as_str() {
//!         "B" | "C" => vec![Some(KindName::from("A"))],
//!         _ => Vec::new(),
//!     }
//! };
//!
//! let ordered = resolve_order(&items, &source, true)?;
//! let names: Vec<&str> = ordered.iter().map(|k| k.as_str()).collect();
//! assert_eq!(names, ["A", "C", "B"]);
//! # Ok::<(), deporder::core::DepError>(())
//! ```

pub mod checks;
pub mod dependency_graph;
pub mod order;

pub use checks::{check_cross_satisfied, check_main_present, check_no_duplicates, check_not_absent};
pub use dependency_graph::DependencyGraph;
pub use order::resolve_order;

use std::collections::HashMap;

use crate::config::ResolverConfig;
use crate::core::{DepError, DependencySet, Kind, Typed};

/// Source of dependency declarations.
///
/// Returns the raw declared references for a kind. Absent references are
/// reported as `None` and dropped by [`extract_dependencies`]. Implementations
/// must be pure: the resolver may query the same kind more than once.
///
/// Implemented for closures `Fn(&K) -> impl IntoIterator<Item = Option<K>>` so
/// callers can inject a declaration lookup without defining a type.
pub trait DependencySource<K> {
    /// Raw declared dependency references of `kind`.
    fn declared(&self, kind: &K) -> Vec<Option<K>>;
}

impl<K, F, I> DependencySource<K> for F
where
    F: Fn(&K) -> I,
    I: IntoIterator<Item = Option<K>>,
{
    fn declared(&self, kind: &K) -> Vec<Option<K>> {
        self(kind).into_iter().collect()
    }
}

/// Declared dependencies of `kind`, deduplicated and with absent references removed.
pub fn extract_dependencies<K, S>(source: &S, kind: &K) -> DependencySet<K>
where
    K: Kind,
    S: DependencySource<K> + ?Sized,
{
    source.declared(kind).into_iter().flatten().collect()
}

type ErrorMapper<'s> = Box<dyn Fn(DepError) -> anyhow::Error + 's>;

/// Facade over the resolver functions.
///
/// Holds the declaration source and the [`ResolverConfig`], and converts every
/// [`DepError`] through an optional caller-supplied mapper. Without a mapper
/// the error is returned as-is inside [`anyhow::Error`], so callers can still
/// `downcast_ref::<DepError>()`.
///
/// # Examples
///
/// ```rust,no_run
/// use deporder::config::ResolverConfig;
/// use deporder::core::{DepError, ErrorKind, KindName};
/// use deporder::resolver::Resolver;
///
/// let source = |_: &KindName| -> Vec<Option<KindName>> { Vec::new() };
/// let resolver = Resolver::new(&source)
///     .with_config(ResolverConfig::lenient())
///     .with_error_mapper(|e: DepError| match e.kind() {
///         ErrorKind::CircularDependency => anyhow::anyhow!("build order is cyclic: {e}"),
///         _ => e.into(),
///     });
///
/// let items = vec![KindName::from("A")];
/// let ordered = resolver.order(&items)?;
/// assert_eq!(ordered.len(), 1);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct Resolver<'s, S: ?Sized> {
    source: &'s S,
    config: ResolverConfig,
    error_mapper: Option<ErrorMapper<'s>>,
}

impl<'s, S: ?Sized> Resolver<'s, S> {
    /// Create a resolver with the default configuration.
    pub fn new(source: &'s S) -> Self {
        Self {
            source,
            config: ResolverConfig::default(),
            error_mapper: None,
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Convert every error through `mapper` before returning it.
    #[must_use]
    pub fn with_error_mapper(mut self, mapper: impl Fn(DepError) -> anyhow::Error + 's) -> Self {
        self.error_mapper = Some(Box::new(mapper));
        self
    }

    /// The active configuration.
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn fail(&self, error: DepError) -> anyhow::Error {
        match &self.error_mapper {
            Some(mapper) => mapper(error),
            None => anyhow::Error::from(error),
        }
    }

    /// Declared dependencies of `kind`.
    pub fn dependencies_of<K>(&self, kind: &K) -> DependencySet<K>
    where
        K: Kind,
        S: DependencySource<K>,
    {
        extract_dependencies(self.source, kind)
    }

    /// Order `items`, running the duplicate check first when configured.
    pub fn order<'a, T>(&self, items: &'a [T]) -> anyhow::Result<Vec<&'a T>>
    where
        T: Typed,
        S: DependencySource<T::Kind>,
    {
        if self.config.check_duplicates {
            check_no_duplicates(items).map_err(|e| self.fail(e))?;
        }
        resolve_order(items, self.source, self.config.error_on_missing).map_err(|e| self.fail(e))
    }

    /// See [`check_no_duplicates`].
    pub fn check_duplicates<'a, T: Typed>(
        &self,
        items: &'a [T],
    ) -> anyhow::Result<HashMap<T::Kind, &'a T>> {
        check_no_duplicates(items).map_err(|e| self.fail(e))
    }

    /// See [`check_cross_satisfied`].
    pub fn check_satisfied<D, P>(&self, dependents: &[D], providers: &[P]) -> anyhow::Result<()>
    where
        D: Typed,
        P: Typed<Kind = D::Kind>,
        S: DependencySource<D::Kind>,
    {
        check_cross_satisfied(dependents, providers, self.source).map_err(|e| self.fail(e))
    }

    /// See [`check_main_present`].
    pub fn check_main<'a, T>(
        &self,
        items: impl IntoIterator<Item = &'a T>,
        main: &T,
    ) -> anyhow::Result<()>
    where
        T: Typed + ?Sized + 'a,
    {
        check_main_present(items, main).map_err(|e| self.fail(e))
    }
}
