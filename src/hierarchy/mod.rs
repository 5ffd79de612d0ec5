//! Component lookups over an object tree.
//!
//! Host engines organise objects in a tree where every node carries a list of
//! components. The [`ObjectTree`] trait is the narrow view this crate needs
//! of such a tree; [`Scene`] is an in-memory implementation.
//!
//! - [`get_component_in_parent`] - the component of a given type on the parent node
//! - [`get_components_in_children`] - at least N components in the node's subtree
//! - [`get_component_in_children`] - the first component in the node's subtree
//! - [`order_components`] / [`validate_requirements`] - feed a node's component
//!   kinds to the resolver
//!
//! Subtree lookups visit the node itself first, then its descendants depth
//! first in child order. Inactive nodes, and everything below them, are
//! skipped unless `include_inactive` is set. A start node under an inactive
//! ancestor is itself inactive, so nothing is found below it.

pub mod scene;

pub use scene::{NodeId, Scene};

use std::any::Any;

use crate::core::{DepError, KindName};
use crate::resolver::{DependencySource, check_cross_satisfied, resolve_order};

/// Read access to a tree of nodes carrying components.
pub trait ObjectTree {
    /// Node handle.
    type Node: Copy + Eq;

    /// The parent of `node`, or `None` for a root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Direct children of `node`, in order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Whether `node` itself is active, ignoring its ancestors.
    fn is_active_self(&self, node: Self::Node) -> bool;

    /// Whether `node` and all of its ancestors are active.
    fn is_active_in_hierarchy(&self, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if !self.is_active_self(n) {
                return false;
            }
            current = self.parent(n);
        }
        true
    }

    /// Components of type `T` attached to `node`, in attachment order.
    fn components<T: Any>(&self, node: Self::Node) -> Vec<&T>;

    /// Kinds of every component attached to `node`, in attachment order.
    fn component_kinds(&self, node: Self::Node) -> Vec<KindName>;

    /// Display name of `node`, for error messages.
    fn node_name(&self, node: Self::Node) -> String;
}

/// Short, path-free name of `T` for error messages.
pub(crate) fn type_label<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// The first `T` component on the parent of `node`.
///
/// # Errors
///
/// - [`DepError::MissingParent`] if `node` is a root
/// - [`DepError::MissingComponentInParent`] if the parent has no `T`
pub fn get_component_in_parent<T, G>(tree: &G, node: G::Node) -> Result<&T, DepError>
where
    T: Any,
    G: ObjectTree,
{
    let Some(parent) = tree.parent(node) else {
        return Err(DepError::MissingParent {
            node: tree.node_name(node),
        });
    };

    tree.components::<T>(parent).into_iter().next().ok_or_else(|| {
        DepError::MissingComponentInParent {
            kind: type_label::<T>(),
            node: tree.node_name(node),
        }
    })
}

/// Every `T` component in the subtree of `node`, requiring at least `min_count`.
///
/// # Errors
///
/// [`DepError::MissingComponentInChildren`] if fewer than `min_count` were found.
pub fn get_components_in_children<T, G>(
    tree: &G,
    node: G::Node,
    include_inactive: bool,
    min_count: usize,
) -> Result<Vec<&T>, DepError>
where
    T: Any,
    G: ObjectTree,
{
    let mut found = Vec::new();
    let mut stack = if include_inactive || tree.is_active_in_hierarchy(node) {
        vec![node]
    } else {
        Vec::new()
    };

    while let Some(current) = stack.pop() {
        if !include_inactive && !tree.is_active_self(current) {
            continue;
        }
        found.extend(tree.components::<T>(current));

        let mut children = tree.children(current);
        children.reverse();
        stack.extend(children);
    }

    if found.len() < min_count {
        return Err(DepError::MissingComponentInChildren {
            kind: type_label::<T>(),
            node: tree.node_name(node),
            expected: min_count,
            found: found.len(),
        });
    }

    Ok(found)
}

/// The first `T` component in the subtree of `node`.
///
/// # Errors
///
/// [`DepError::MissingComponentInChildren`] if there is none.
pub fn get_component_in_children<T, G>(
    tree: &G,
    node: G::Node,
    include_inactive: bool,
) -> Result<&T, DepError>
where
    T: Any,
    G: ObjectTree,
{
    let mut found = get_components_in_children::<T, G>(tree, node, include_inactive, 1)?;
    Ok(found.swap_remove(0))
}

/// Order the component kinds on `node` by their declared requirements.
///
/// # Errors
///
/// As [`resolve_order`].
pub fn order_components<G, S>(
    tree: &G,
    node: G::Node,
    source: &S,
    error_on_missing: bool,
) -> Result<Vec<KindName>, DepError>
where
    G: ObjectTree,
    S: DependencySource<KindName> + ?Sized,
{
    let kinds = tree.component_kinds(node);
    let ordered = resolve_order(&kinds, source, error_on_missing)?;
    Ok(ordered.into_iter().cloned().collect())
}

/// Check that every component on `node` finds its required kinds on the same node.
///
/// # Errors
///
/// [`DepError::UnsatisfiedDependency`] listing the missing kinds.
pub fn validate_requirements<G, S>(tree: &G, node: G::Node, source: &S) -> Result<(), DepError>
where
    G: ObjectTree,
    S: DependencySource<KindName> + ?Sized,
{
    let kinds = tree.component_kinds(node);
    check_cross_satisfied(&kinds, &kinds, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::declaration::{COMPONENT, DeclarationRegistry};

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    #[derive(Debug, PartialEq)]
    struct Collider(&'static str);

    #[derive(Debug)]
    struct Rigidbody;

    /// root
    /// ├── body (Collider "hull")
    /// │   └── wheel (Collider "wheel")
    /// └── hidden [inactive] (Collider "ghost")
    fn vehicle() -> (Scene, NodeId, NodeId, NodeId, NodeId) {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        scene.add_component(root, Health(10));
        let body = scene.spawn_child(root, "body");
        scene.add_component(body, Collider("hull"));
        let wheel = scene.spawn_child(body, "wheel");
        scene.add_component(wheel, Collider("wheel"));
        let hidden = scene.spawn_child(root, "hidden");
        scene.add_component(hidden, Collider("ghost"));
        scene.set_active(hidden, false);
        (scene, root, body, wheel, hidden)
    }

    #[test]
    fn test_type_label() {
        assert_eq!(type_label::<Collider>(), "Collider");
        assert_eq!(type_label::<Vec<u8>>(), "Vec");
    }

    #[test]
    fn test_component_in_parent() {
        let (scene, root, body, wheel, _) = vehicle();
        assert_eq!(get_component_in_parent::<Health, _>(&scene, body).unwrap(), &Health(10));
        assert_eq!(get_component_in_parent::<Collider, _>(&scene, wheel).unwrap(), &Collider("hull"));

        let err = get_component_in_parent::<Health, _>(&scene, root).unwrap_err();
        assert_eq!(
            err,
            DepError::MissingParent {
                node: "root".to_string()
            }
        );

        let err = get_component_in_parent::<Health, _>(&scene, wheel).unwrap_err();
        assert_eq!(
            err,
            DepError::MissingComponentInParent {
                kind: "Health".to_string(),
                node: "wheel".to_string(),
            }
        );
    }

    #[test]
    fn test_components_in_children_skips_inactive() {
        let (scene, root, ..) = vehicle();
        let colliders = get_components_in_children::<Collider, _>(&scene, root, false, 0).unwrap();
        assert_eq!(colliders, [&Collider("hull"), &Collider("wheel")]);

        let colliders = get_components_in_children::<Collider, _>(&scene, root, true, 3).unwrap();
        assert_eq!(colliders, [&Collider("hull"), &Collider("wheel"), &Collider("ghost")]);
    }

    #[test]
    fn test_components_in_children_includes_self() {
        let (scene, _, body, ..) = vehicle();
        let first = get_component_in_children::<Collider, _>(&scene, body, false).unwrap();
        assert_eq!(first, &Collider("hull"));
    }

    #[test]
    fn test_components_in_children_minimum() {
        let (scene, root, ..) = vehicle();
        let err = get_components_in_children::<Collider, _>(&scene, root, false, 3).unwrap_err();
        assert_eq!(
            err,
            DepError::MissingComponentInChildren {
                kind: "Collider".to_string(),
                node: "root".to_string(),
                expected: 3,
                found: 2,
            }
        );

        let err = get_component_in_children::<Rigidbody, _>(&scene, root, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingComponentInChildren);
    }

    #[test]
    fn test_inactive_start_node() {
        let (scene, _, _, _, hidden) = vehicle();
        assert!(get_component_in_children::<Collider, _>(&scene, hidden, false).is_err());
        assert!(get_component_in_children::<Collider, _>(&scene, hidden, true).is_ok());
    }

    #[test]
    fn test_start_node_under_inactive_ancestor() {
        let mut scene = Scene::new();
        let root = scene.spawn("root");
        let child = scene.spawn_child(root, "child");
        scene.add_component(child, Collider("c"));
        scene.set_active(root, false);

        assert!(scene.is_active_self(child));
        assert!(!scene.is_active_in_hierarchy(child));
        let err = get_components_in_children::<Collider, _>(&scene, child, false, 1).unwrap_err();
        assert_eq!(
            err,
            DepError::MissingComponentInChildren {
                kind: "Collider".to_string(),
                node: "child".to_string(),
                expected: 1,
                found: 0,
            }
        );

        let found = get_components_in_children::<Collider, _>(&scene, child, true, 1).unwrap();
        assert_eq!(found, vec![&Collider("c")]);
    }

    #[test]
    fn test_order_and_validate_node_components() {
        let mut registry = DeclarationRegistry::with_builtin_rules();
        registry.define_kind("Rigidbody", Some(COMPONENT)).unwrap();
        registry.define_kind("Collider", Some(COMPONENT)).unwrap();
        registry.define_kind("Health", Some(COMPONENT)).unwrap();
        registry.require("Collider", ["Rigidbody"]).unwrap();

        let mut scene = Scene::new();
        let node = scene.spawn("crate");
        scene.add_component(node, Collider("box"));
        scene.add_component(node, Health(1));

        let err = validate_requirements(&scene, node, &registry).unwrap_err();
        assert_eq!(
            err,
            DepError::UnsatisfiedDependency {
                missing: vec!["Rigidbody".to_string()]
            }
        );

        scene.add_component(node, Rigidbody);
        validate_requirements(&scene, node, &registry).unwrap();

        let ordered = order_components(&scene, node, &registry, true).unwrap();
        let ordered: Vec<&str> = ordered.iter().map(KindName::as_str).collect();
        assert_eq!(ordered, ["Health", "Rigidbody", "Collider"]);
    }
}
