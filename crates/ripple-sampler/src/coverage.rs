//! Greedy max-coverage over an RR store.

use ripple_core::{IndexedMinHeap, NodeId};

use crate::rr::RrStore;

/// Pick up to `k` nodes greedily maximizing the number of covered RR sets.
///
/// The heap stores negative residual coverage, so the minimum entry is the
/// best remaining candidate. Nodes in `excluded` are neither picked nor
/// tracked. Returns fewer than `k` nodes when the candidate pool runs out.
pub fn select_max_coverage(store: &RrStore, k: usize, excluded: &[NodeId]) -> Vec<NodeId> {
    let n = store.node_space();
    let mut is_excluded = vec![false; n];
    for &node in excluded {
        if node < n {
            is_excluded[node] = true;
        }
    }

    let mut heap: IndexedMinHeap<f64> = IndexedMinHeap::new(n);
    for node in 0..n {
        if is_excluded[node] || store.containing(node).is_empty() {
            continue;
        }
        heap.insert_or_update(node, -(store.containing(node).len() as f64));
    }

    let mut covered = vec![false; store.len()];
    let mut picks = Vec::with_capacity(k);

    for _ in 0..k {
        if heap.is_empty() {
            break;
        }
        let best = heap.pop();
        picks.push(best);

        for &rr in store.containing(best) {
            if covered[rr] {
                continue;
            }
            covered[rr] = true;
            // Everyone else in this set just lost one unit of residual
            // coverage.
            for &w in store.set(rr) {
                if is_excluded[w] || !heap.contains(w) {
                    continue;
                }
                let current = heap.value_of(w).unwrap_or(0.0);
                heap.insert_or_update(w, current + 1.0);
            }
        }
    }

    picks
}

/// Number of distinct RR sets covered by `nodes`.
pub fn coverage_count(store: &RrStore, nodes: &[NodeId]) -> usize {
    if nodes.is_empty() || store.is_empty() {
        return 0;
    }
    let mut covered = vec![false; store.len()];
    let mut count = 0;
    for &node in nodes {
        if node >= store.node_space() {
            continue;
        }
        for &rr in store.containing(node) {
            if !covered[rr] {
                covered[rr] = true;
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store with hand-written membership.
    fn store_from(sets: &[&[NodeId]], node_space: usize) -> RrStore {
        let mut store = RrStore::new(node_space);
        for set in sets {
            store.absorb(set.to_vec());
        }
        store
    }

    #[test]
    fn picks_the_dominant_node_first() {
        // Node 0 covers three sets, node 1 two, node 2 one.
        let store = store_from(&[&[0, 1], &[0, 1], &[0], &[2]], 3);
        let picks = select_max_coverage(&store, 2, &[]);
        assert_eq!(picks[0], 0);
        // After 0 is taken, node 1 covers nothing new; node 2 covers one.
        assert_eq!(picks[1], 2);
    }

    #[test]
    fn coverage_is_monotone_in_picks() {
        let store = store_from(&[&[0, 1], &[1, 2], &[2, 3], &[3, 0], &[4]], 5);
        let picks = select_max_coverage(&store, 5, &[]);
        let mut last = 0;
        for j in 1..=picks.len() {
            let c = coverage_count(&store, &picks[..j]);
            assert!(c >= last);
            last = c;
        }
        assert_eq!(last, store.len());
    }

    #[test]
    fn excluded_nodes_are_never_picked() {
        let store = store_from(&[&[0, 1], &[0, 1], &[0, 2]], 3);
        let picks = select_max_coverage(&store, 3, &[0]);
        assert!(!picks.contains(&0));
        assert_eq!(picks[0], 1);
    }

    #[test]
    fn short_result_when_pool_exhausts() {
        let store = store_from(&[&[0], &[0]], 2);
        let picks = select_max_coverage(&store, 5, &[]);
        assert_eq!(picks, vec![0]);
    }

    #[test]
    fn empty_store_covers_nothing() {
        let store = RrStore::new(4);
        assert!(select_max_coverage(&store, 3, &[]).is_empty());
        assert_eq!(coverage_count(&store, &[0, 1]), 0);
    }
}
