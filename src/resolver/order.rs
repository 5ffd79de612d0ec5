//! Dependency-respecting ordering of typed items.

use std::collections::HashSet;

use super::dependency_graph::DependencyGraph;
use super::{DependencySource, extract_dependencies};
use crate::core::{DepError, DependencySet, Typed};

/// An item still waiting for placement, with its kind and declarations read once.
struct Pending<'a, T: Typed> {
    item: &'a T,
    kind: T::Kind,
    dependencies: DependencySet<T::Kind>,
}

/// Order `items` so that every item comes after the kinds it depends on.
///
/// Dependencies on kinds that are not present in `items` do not constrain the
/// order. With `error_on_missing` set they are an error instead: the first
/// scanned item declaring such a kind fails with
/// [`DepError::MissingDependency`].
///
/// Among items that are ready at the same time, the one earliest in `items`
/// is placed first, and the scan restarts from the front after every
/// placement. The output is therefore a deterministic permutation of the
/// input.
///
/// Items sharing a kind are ordered as independent entries; placing one of
/// them satisfies dependents of that kind. Use
/// [`check_no_duplicates`](super::check_no_duplicates) first when kinds must
/// be unique.
///
/// # Errors
///
/// - [`DepError::MissingDependency`] in strict mode, as above
/// - [`DepError::CircularDependency`] when the remaining items cannot be
///   placed; the error names one cycle among them
pub fn resolve_order<'a, T, S>(
    items: &'a [T],
    source: &S,
    error_on_missing: bool,
) -> Result<Vec<&'a T>, DepError>
where
    T: Typed,
    S: DependencySource<T::Kind> + ?Sized,
{
    let present: HashSet<T::Kind> = items.iter().map(Typed::kind).collect();

    let mut remaining: Vec<Pending<'a, T>> = items
        .iter()
        .map(|item| {
            let kind = item.kind();
            let dependencies = extract_dependencies(source, &kind);
            Pending {
                item,
                kind,
                dependencies,
            }
        })
        .collect();

    if !error_on_missing {
        for pending in &remaining {
            for missing in pending.dependencies.missing_from(|k| present.contains(k)) {
                tracing::debug!(
                    "Ignoring dependency of '{}' on '{}': not present in the item set",
                    pending.kind,
                    missing
                );
            }
        }
    }

    let mut placed: HashSet<T::Kind> = HashSet::with_capacity(present.len());
    let mut ordered: Vec<&'a T> = Vec::with_capacity(items.len());
    let mut round = 0usize;

    while !remaining.is_empty() {
        round += 1;
        let mut ready = None;

        for (index, pending) in remaining.iter().enumerate() {
            if error_on_missing
                && let Some(missing) =
                    pending.dependencies.missing_from(|k| present.contains(k)).next()
            {
                return Err(DepError::MissingDependency {
                    kind: pending.kind.to_string(),
                    dependency: missing.to_string(),
                });
            }

            if pending.dependencies.is_subset_of(|k| !present.contains(k) || placed.contains(k)) {
                ready = Some(index);
                break;
            }
        }

        let Some(index) = ready else {
            let chain = describe_cycle(&remaining);
            tracing::debug!("Resolution stalled after {} round(s): {}", round, chain);
            return Err(DepError::CircularDependency {
                chain,
            });
        };

        let pending = remaining.remove(index);
        tracing::trace!("Round {}: placed '{}'", round, pending.kind);
        placed.insert(pending.kind);
        ordered.push(pending.item);
    }

    tracing::debug!("Ordered {} item(s) in {} round(s)", ordered.len(), round);
    Ok(ordered)
}

/// Render one cycle among items that could not be placed.
fn describe_cycle<T: Typed>(remaining: &[Pending<'_, T>]) -> String {
    let stuck: HashSet<&T::Kind> = remaining.iter().map(|p| &p.kind).collect();
    let mut graph = DependencyGraph::new();
    for pending in remaining {
        graph.add_kind(pending.kind.clone());
        for dependency in pending.dependencies.iter().filter(|k| stuck.contains(k)) {
            graph.add_dependency(pending.kind.clone(), dependency.clone());
        }
    }

    match graph.find_cycle() {
        Some(cycle) => DependencyGraph::format_chain(&cycle),
        None => remaining.iter().map(|p| p.kind.to_string()).collect::<Vec<_>>().join(", "),
    }
}
