/// Barycenter ordering within ranks: alternating downward and upward
/// sweeps reorder each rank by the mean position of its neighbors in the
/// adjacent rank, keeping the ordering with the fewest crossings seen.
/// Ties break on node index, so the result is deterministic.
pub(super) fn order_ranks(
    ranks: &[usize],
    edges: &[(usize, usize)],
    sweeps: usize,
) -> Vec<Vec<usize>> {
    let node_count = ranks.len();
    if node_count == 0 {
        return Vec::new();
    }

    let rank_count = ranks.iter().copied().max().unwrap_or(0) + 1;
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
    for node in 0..node_count {
        layers[ranks[node]].push(node);
    }

    let mut outgoing = vec![Vec::new(); node_count];
    let mut incoming = vec![Vec::new(); node_count];
    for &(source, target) in edges {
        outgoing[source].push(target);
        incoming[target].push(source);
    }

    let mut best_crossings = count_crossings(&layers, &outgoing);
    let mut best_layers = layers.clone();

    for sweep in 0..sweeps {
        if sweep % 2 == 0 {
            for rank in 1..rank_count {
                barycenter_pass(&mut layers, rank, &incoming, node_count);
            }
        } else {
            for rank in (0..rank_count.saturating_sub(1)).rev() {
                barycenter_pass(&mut layers, rank, &outgoing, node_count);
            }
        }

        let crossings = count_crossings(&layers, &outgoing);
        if crossings < best_crossings {
            best_crossings = crossings;
            best_layers = layers.clone();
        }
        if best_crossings == 0 {
            break;
        }
    }

    best_layers
}

fn barycenter_pass(
    layers: &mut [Vec<usize>],
    rank: usize,
    neighbors: &[Vec<usize>],
    node_count: usize,
) {
    // Position of every node within its own layer. Long edges carry no
    // virtual nodes, so a neighbor may sit several ranks away; its
    // in-layer position still serves as the barycenter key.
    let mut reference = vec![0usize; node_count];
    for layer in layers.iter() {
        for (index, &node) in layer.iter().enumerate() {
            reference[node] = index;
        }
    }

    let mut keyed = layers[rank]
        .iter()
        .map(|&node| {
            let adjacent = &neighbors[node];
            let key = if adjacent.is_empty() {
                f64::MAX
            } else {
                adjacent.iter().map(|&other| reference[other]).sum::<usize>() as f64
                    / adjacent.len() as f64
            };
            (node, key)
        })
        .collect::<Vec<_>>();

    keyed.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    layers[rank] = keyed.into_iter().map(|(node, _)| node).collect();
}

/// Pairwise inversion count between consecutive ranks.
pub(super) fn count_crossings(layers: &[Vec<usize>], outgoing: &[Vec<usize>]) -> usize {
    let node_count = outgoing.len();
    let mut position = vec![usize::MAX; node_count];
    for layer in layers {
        for (index, &node) in layer.iter().enumerate() {
            position[node] = index;
        }
    }

    let mut crossings = 0;
    for window in layers.windows(2) {
        let [upper, lower] = window else {
            continue;
        };
        let lower_set = lower.iter().copied().collect::<std::collections::HashSet<_>>();

        let mut pairs = Vec::new();
        for &source in upper {
            for &target in &outgoing[source] {
                if lower_set.contains(&target) {
                    pairs.push((position[source], position[target]));
                }
            }
        }

        for first in 0..pairs.len() {
            for second in (first + 1)..pairs.len() {
                let (a1, b1) = pairs[first];
                let (a2, b2) = pairs[second];
                if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                    crossings += 1;
                }
            }
        }
    }
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_pairs_have_no_crossings() {
        // 0 -> 2, 1 -> 3 laid out in index order never cross.
        let layers = order_ranks(&[0, 0, 1, 1], &[(0, 2), (1, 3)], 8);
        let mut outgoing = vec![Vec::new(); 4];
        outgoing[0].push(2);
        outgoing[1].push(3);
        assert_eq!(count_crossings(&layers, &outgoing), 0);
    }

    #[test]
    fn crossed_pair_is_untangled() {
        // 0 -> 3, 1 -> 2 crosses in index order; one sweep resolves it.
        let layers = order_ranks(&[0, 0, 1, 1], &[(0, 3), (1, 2)], 8);
        let mut outgoing = vec![Vec::new(); 4];
        outgoing[0].push(3);
        outgoing[1].push(2);
        assert_eq!(count_crossings(&layers, &outgoing), 0);
    }

    #[test]
    fn ordering_is_deterministic() {
        let ranks = [0, 0, 0, 1, 1, 1];
        let edges = [(0, 5), (1, 4), (2, 3), (0, 3)];
        assert_eq!(order_ranks(&ranks, &edges, 8), order_ranks(&ranks, &edges, 8));
    }

    #[test]
    fn every_node_keeps_its_rank() {
        let ranks = [0, 1, 1, 2];
        let layers = order_ranks(&ranks, &[(0, 1), (0, 2), (1, 3)], 8);
        for (rank, layer) in layers.iter().enumerate() {
            for &node in layer {
                assert_eq!(ranks[node], rank);
            }
        }
    }
}
