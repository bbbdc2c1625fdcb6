/// Drops self-loops and duplicate edges, then reverses the back edges
/// found by an iterative depth-first sweep so the result is acyclic.
/// Nodes are visited in index order, which keeps the output stable for
/// identical input.
pub(super) fn acyclic_edges(node_count: usize, edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut cleaned = edges
        .iter()
        .copied()
        .filter(|&(source, target)| {
            source != target && source < node_count && target < node_count
        })
        .collect::<Vec<_>>();
    cleaned.sort_unstable();
    cleaned.dedup();

    let mut outgoing = vec![Vec::new(); node_count];
    for &(source, target) in &cleaned {
        outgoing[source].push(target);
    }

    const UNVISITED: u8 = 0;
    const ON_STACK: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNVISITED; node_count];
    let mut result = Vec::with_capacity(cleaned.len());
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..node_count {
        if state[start] != UNVISITED {
            continue;
        }

        state[start] = ON_STACK;
        stack.push((start, 0));

        while let Some(&(node, next_index)) = stack.last() {
            if next_index >= outgoing[node].len() {
                state[node] = DONE;
                stack.pop();
                continue;
            }

            stack.last_mut().expect("stack is non-empty").1 += 1;
            let target = outgoing[node][next_index];

            match state[target] {
                ON_STACK => result.push((target, node)),
                UNVISITED => {
                    result.push((node, target));
                    state[target] = ON_STACK;
                    stack.push((target, 0));
                }
                _ => result.push((node, target)),
            }
        }
    }

    result.sort_unstable();
    result.dedup();
    result
}

/// Longest path from the roots of an acyclic edge set, via Kahn's
/// algorithm: a node's rank is one more than the deepest of its
/// predecessors.
pub(super) fn assign_ranks(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut outgoing = vec![Vec::new(); node_count];
    let mut in_degree = vec![0usize; node_count];
    for &(source, target) in edges {
        outgoing[source].push(target);
        in_degree[target] += 1;
    }

    let mut queue = (0..node_count)
        .filter(|&node| in_degree[node] == 0)
        .collect::<Vec<_>>();
    let mut rank = vec![0usize; node_count];
    let mut cursor = 0;

    while cursor < queue.len() {
        let node = queue[cursor];
        cursor += 1;

        for &target in &outgoing[node] {
            if rank[target] < rank[node] + 1 {
                rank[target] = rank[node] + 1;
            }
            in_degree[target] -= 1;
            if in_degree[target] == 0 {
                queue.push(target);
            }
        }
    }

    rank
}
