//! Item identity and dependency sets.
//!
//! An item is anything that can report its [kind](Typed::kind). The resolver
//! never owns items; it borrows them and reads their kind and the dependency
//! view supplied by a [`DependencySource`](crate::resolver::DependencySource).

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

/// Bound shared by every kind type used as a map or set key.
pub trait Kind: Clone + Eq + Hash + fmt::Display {}

impl<T> Kind for T where T: Clone + Eq + Hash + fmt::Display {}

/// An item with an identifiable kind.
///
/// The kind plays the role of the item's runtime type: two items of the same
/// kind are duplicates, and dependency declarations name kinds.
pub trait Typed {
    /// The key type identifying an item's kind.
    type Kind: Kind;

    /// The kind of this item.
    fn kind(&self) -> Self::Kind;
}

impl<T: Typed + ?Sized> Typed for &T {
    type Kind = T::Kind;

    fn kind(&self) -> Self::Kind {
        (**self).kind()
    }
}

impl<T: Typed + ?Sized> Typed for Box<T> {
    type Kind = T::Kind;

    fn kind(&self) -> Self::Kind {
        (**self).kind()
    }
}

/// String-named kind used by manifests, the declaration registry and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindName(String);

impl KindName {
    /// Create a kind name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KindName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for KindName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for KindName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A kind name is its own item, which lets plain kind lists be ordered directly.
impl Typed for KindName {
    type Kind = Self;

    fn kind(&self) -> Self {
        self.clone()
    }
}

/// Deduplicated set of kinds, in declaration order.
///
/// Order does not affect set semantics. It is kept so that error messages and
/// tree renderings list dependencies the way they were declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySet<K> {
    kinds: Vec<K>,
}

impl<K: Kind> DependencySet<K> {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kinds: Vec::new(),
        }
    }

    /// Insert a kind, returning `false` if it was already present.
    pub fn insert(&mut self, kind: K) -> bool {
        if self.kinds.contains(&kind) {
            false
        } else {
            self.kinds.push(kind);
            true
        }
    }

    /// Whether `kind` is in the set.
    pub fn contains(&self, kind: &K) -> bool {
        self.kinds.contains(kind)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.kinds.iter()
    }

    /// Number of kinds in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Whether every kind satisfies `contained`.
    pub fn is_subset_of(&self, contained: impl Fn(&K) -> bool) -> bool {
        self.kinds.iter().all(contained)
    }

    /// Kinds for which `contained` is false, in declaration order.
    pub fn missing_from<'a>(
        &'a self,
        contained: impl Fn(&K) -> bool + 'a,
    ) -> impl Iterator<Item = &'a K> + 'a {
        self.kinds.iter().filter(move |kind| !contained(kind))
    }
}

impl<K: Kind> Default for DependencySet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kind> FromIterator<K> for DependencySet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: Kind> Extend<K> for DependencySet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for kind in iter {
            self.insert(kind);
        }
    }
}

impl<K> IntoIterator for DependencySet<K> {
    type Item = K;
    type IntoIter = std::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.kinds.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a DependencySet<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.kinds.iter()
    }
}

impl<K: fmt::Display> fmt::Display for DependencySet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{kind}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_set_deduplicates_in_order() {
        let set: DependencySet<&str> = ["B", "A", "B", "C", "A"].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec!["B", "A", "C"]);
        assert_eq!(set.to_string(), "{B, A, C}");
    }

    #[test]
    fn test_dependency_set_subset_and_missing() {
        let set: DependencySet<&str> = ["X", "Y"].into_iter().collect();
        let present = ["X"];
        assert!(!set.is_subset_of(|k| present.contains(k)));
        let missing: Vec<_> = set.missing_from(|k| present.contains(k)).collect();
        assert_eq!(missing, vec![&"Y"]);

        let present = ["X", "Y", "Z"];
        assert!(set.is_subset_of(|k| present.contains(k)));
    }

    #[test]
    fn test_kind_name_is_typed() {
        let name = KindName::from("Transform");
        assert_eq!(name.kind(), name);
        assert_eq!(name.as_str(), "Transform");
        assert_eq!(format!("{name}"), "Transform");
    }
}
