//! Presence and consistency checks over item sets.
//!
//! None of these order anything. They are the guards callers run before or
//! alongside [`resolve_order`](super::resolve_order).

use std::collections::{HashMap, HashSet};

use super::{DependencySource, extract_dependencies};
use crate::core::{DepError, DependencySet, Typed};

/// Map each kind to its item, failing on the first repeated kind.
///
/// The returned map gives callers O(1) lookups of an item by the kind other
/// items depend on.
///
/// # Errors
///
/// [`DepError::DuplicateDependency`] naming the first kind seen twice.
pub fn check_no_duplicates<T: Typed>(items: &[T]) -> Result<HashMap<T::Kind, &T>, DepError> {
    let mut by_kind = HashMap::with_capacity(items.len());
    for item in items {
        let kind = item.kind();
        if by_kind.contains_key(&kind) {
            return Err(DepError::DuplicateDependency {
                kind: kind.to_string(),
            });
        }
        by_kind.insert(kind, item);
    }
    Ok(by_kind)
}

/// Check that `providers` supply every kind any of `dependents` declares.
///
/// A pure set difference: order and the dependents' own kinds are irrelevant.
///
/// # Errors
///
/// [`DepError::UnsatisfiedDependency`] listing every missing kind, in the
/// order the dependents declare them.
pub fn check_cross_satisfied<D, P, S>(
    dependents: &[D],
    providers: &[P],
    source: &S,
) -> Result<(), DepError>
where
    D: Typed,
    P: Typed<Kind = D::Kind>,
    S: DependencySource<D::Kind> + ?Sized,
{
    let required: DependencySet<D::Kind> = dependents
        .iter()
        .flat_map(|dependent| extract_dependencies(source, &dependent.kind()))
        .collect();
    let provided: HashSet<D::Kind> = providers.iter().map(Typed::kind).collect();

    let missing: Vec<String> =
        required.missing_from(|k| provided.contains(k)).map(ToString::to_string).collect();

    if missing.is_empty() {
        Ok(())
    } else {
        tracing::debug!("Providers lack {} required kind(s)", missing.len());
        Err(DepError::UnsatisfiedDependency {
            missing,
        })
    }
}

/// Check that `main` is one of `items`, by identity.
///
/// Two distinct items of the same kind are not interchangeable here: the
/// exact instance must be in the collection.
///
/// # Errors
///
/// [`DepError::MissingMainComponent`] naming the kind of `main`.
pub fn check_main_present<'a, T>(items: impl IntoIterator<Item = &'a T>, main: &T) -> Result<(), DepError>
where
    T: Typed + ?Sized + 'a,
{
    if items.into_iter().any(|item| std::ptr::eq(item, main)) {
        Ok(())
    } else {
        Err(DepError::MissingMainComponent {
            kind: main.kind().to_string(),
        })
    }
}

/// Return the value, or fail if it is absent.
///
/// `field_name` only feeds the error message.
///
/// # Errors
///
/// [`DepError::MissingRequiredValue`] when `value` is `None`.
pub fn check_not_absent<V>(value: Option<V>, field_name: Option<&str>) -> Result<V, DepError> {
    value.ok_or_else(|| DepError::MissingRequiredValue {
        field: field_name.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ErrorKind, KindName};

    #[derive(Debug)]
    struct Comp(&'static str);

    impl Typed for Comp {
        type Kind = &'static str;

        fn kind(&self) -> &'static str {
            self.0
        }
    }

    fn requires(kind: &&'static str) -> Vec<Option<&'static str>> {
        match *kind {
            "Player" => vec![Some("X"), Some("Y")],
            "Enemy" => vec![Some("Y"), None],
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_no_duplicates_returns_one_entry_per_item() {
        let items = [Comp("A"), Comp("B"), Comp("C")];
        let map = check_no_duplicates(&items).unwrap();
        assert_eq!(map.len(), 3);
        assert!(std::ptr::eq(map["B"], &items[1]));
    }

    #[test]
    fn test_duplicate_kind_fails() {
        let items = [Comp("A"), Comp("B"), Comp("A")];
        let err = check_no_duplicates(&items).unwrap_err();
        assert_eq!(
            err,
            DepError::DuplicateDependency {
                kind: "A".to_string()
            }
        );
    }

    #[test]
    fn test_cross_set_missing_kind_is_named() {
        let dependents = [Comp("Player")];
        let providers = [Comp("X")];
        let err = check_cross_satisfied(&dependents, &providers, &requires).unwrap_err();
        assert_eq!(
            err,
            DepError::UnsatisfiedDependency {
                missing: vec!["Y".to_string()]
            }
        );
    }

    #[test]
    fn test_cross_set_satisfied() {
        let dependents = [Comp("Player"), Comp("Enemy")];
        let providers = [Comp("Y"), Comp("X"), Comp("Z")];
        check_cross_satisfied(&dependents, &providers, &requires).unwrap();
    }

    #[test]
    fn test_cross_set_lists_every_missing_kind_once() {
        let dependents = [Comp("Enemy"), Comp("Player")];
        let providers: [Comp; 0] = [];
        let err = check_cross_satisfied(&dependents, &providers, &requires).unwrap_err();
        assert_eq!(
            err,
            DepError::UnsatisfiedDependency {
                missing: vec!["Y".to_string(), "X".to_string()]
            }
        );
    }

    #[test]
    fn test_cross_set_with_no_dependents() {
        let dependents: [Comp; 0] = [];
        let providers = [Comp("X")];
        assert!(check_cross_satisfied(&dependents, &providers, &requires).is_ok());
    }

    #[test]
    fn test_main_present_by_identity() {
        let comp_a = Comp("A");
        let comp_b = Comp("B");
        let comp_c = Comp("C");
        let items = [&comp_a, &comp_b];

        check_main_present(items.iter().copied(), &comp_b).unwrap();

        let err = check_main_present(items.iter().copied(), &comp_c).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingMainComponent);
        assert!(err.to_string().contains("'C'"));
    }

    #[test]
    fn test_main_present_rejects_equal_kind_other_instance() {
        let items = [KindName::from("A")];
        let other = KindName::from("A");
        assert!(check_main_present(items.iter(), &other).is_err());
        assert!(check_main_present(items.iter(), &items[0]).is_ok());
    }

    #[test]
    fn test_not_absent() {
        let value = 7;
        assert_eq!(*check_not_absent(Some(&value), Some("count")).unwrap(), 7);

        let err = check_not_absent::<&i32>(None, Some("count")).unwrap_err();
        assert_eq!(
            err,
            DepError::MissingRequiredValue {
                field: Some("count".to_string())
            }
        );

        let err = check_not_absent::<i32>(None, None).unwrap_err();
        assert_eq!(err.to_string(), "Required value is missing");
    }
}
