use std::collections::{HashMap, HashSet};

use crate::catalog::Relationship;

/// Bidirectional transitive closure of the focus entity over the
/// relationship set, the focus itself included. `None` focus means no
/// filtering is active and every node counts as related.
///
/// Uses an explicit worklist so pathological relationship graphs cannot
/// overflow the call stack; the visited set bounds traversal on cycles.
pub(in crate::app) fn related_set(
    focus: Option<&str>,
    relationships: &[Relationship],
) -> Option<HashSet<String>> {
    let focus = focus?;

    let mut downstream: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut upstream: HashMap<&str, Vec<&str>> = HashMap::new();
    for rel in relationships {
        downstream
            .entry(rel.source.as_str())
            .or_default()
            .push(rel.target.as_str());
        upstream
            .entry(rel.target.as_str())
            .or_default()
            .push(rel.source.as_str());
    }

    let mut visited = HashSet::from([focus.to_string()]);
    let mut stack = vec![focus];

    while let Some(current) = stack.pop() {
        let neighbor_lists = [downstream.get(current), upstream.get(current)];
        for neighbors in neighbor_lists.into_iter().flatten() {
            for &next in neighbors {
                if visited.insert(next.to_string()) {
                    stack.push(next);
                }
            }
        }
    }

    Some(visited)
}

/// An edge is related only when both endpoints are.
pub(in crate::app) fn edge_related(
    related: Option<&HashSet<String>>,
    source: &str,
    target: &str,
) -> bool {
    match related {
        None => true,
        Some(set) => set.contains(source) && set.contains(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(source: &str, target: &str) -> Relationship {
        Relationship {
            id: format!("{source}->{target}"),
            source: source.to_string(),
            target: target.to_string(),
            description: None,
        }
    }

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn no_focus_means_no_filtering() {
        assert_eq!(related_set(None, &[rel("a", "b")]), None);
        assert!(edge_related(None, "a", "b"));
    }

    #[test]
    fn chain_is_reachable_from_the_middle() {
        let rels = [rel("a", "b"), rel("b", "c")];
        assert_eq!(related_set(Some("b"), &rels), Some(set(&["a", "b", "c"])));
    }

    #[test]
    fn reachability_is_symmetric() {
        let rels = [rel("a", "b"), rel("b", "c"), rel("d", "c")];
        let ids = ["a", "b", "c", "d"];
        for focus in ids {
            let related = related_set(Some(focus), &rels).unwrap();
            for other in ids {
                if related.contains(other) {
                    let back = related_set(Some(other), &rels).unwrap();
                    assert!(back.contains(focus), "{other} should reach back to {focus}");
                }
            }
        }
    }

    #[test]
    fn cycles_terminate() {
        let rels = [rel("a", "b"), rel("b", "a")];
        assert_eq!(related_set(Some("a"), &rels), Some(set(&["a", "b"])));
    }

    #[test]
    fn empty_relationships_yield_only_the_focus() {
        assert_eq!(related_set(Some("a"), &[]), Some(set(&["a"])));
    }

    #[test]
    fn unrelated_component_is_excluded() {
        let rels = [rel("a", "b"), rel("x", "y")];
        let related = related_set(Some("a"), &rels).unwrap();
        assert_eq!(related, set(&["a", "b"]));
        assert!(edge_related(Some(&related), "a", "b"));
        assert!(!edge_related(Some(&related), "x", "y"));
        assert!(!edge_related(Some(&related), "a", "x"));
    }
}
