//! Blocker selection for influence minimization.
//!
//! Only RR sets that touch a negative seed matter: covering one with a
//! blocker severs the sampled influence route to that seed. The greedy is
//! the same max-coverage loop restricted to the risky sets, with the
//! negative seeds themselves barred from candidacy.

use ripple_core::{IndexedMinHeap, NodeId};

use crate::rr::RrStore;

/// Pick up to `k` blockers covering the most risky RR sets.
pub fn select_blockers(store: &RrStore, k: usize, negative_seeds: &[NodeId]) -> Vec<NodeId> {
    let n = store.node_space();
    let mut is_negative = vec![false; n];
    for &s in negative_seeds {
        if s < n {
            is_negative[s] = true;
        }
    }

    // Risky RR sets: those containing at least one negative seed.
    let mut is_risky = vec![false; store.len()];
    let mut risky = Vec::new();
    for &s in negative_seeds {
        if s >= n {
            continue;
        }
        for &rr in store.containing(s) {
            if !is_risky[rr] {
                is_risky[rr] = true;
                risky.push(rr);
            }
        }
    }

    // Count candidate appearances inside the risky sets.
    let mut degree = vec![0usize; n];
    for &rr in &risky {
        for &node in store.set(rr) {
            if !is_negative[node] {
                degree[node] += 1;
            }
        }
    }

    let mut heap: IndexedMinHeap<f64> = IndexedMinHeap::new(n);
    for node in 0..n {
        if !is_negative[node] && degree[node] > 0 {
            heap.insert_or_update(node, -(degree[node] as f64));
        }
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
            if !is_risky[rr] || covered[rr] {
                continue;
            }
            covered[rr] = true;
            for &node in store.set(rr) {
                if is_negative[node] || !heap.contains(node) {
                    continue;
                }
                let current = heap.value_of(node).unwrap_or(0.0);
                heap.insert_or_update(node, current + 1.0);
            }
        }
    }

    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::{Graph, ProbabilityModel, PropagationModel, TrialStream};

    use crate::rr::RrSampler;

    #[test]
    fn chain_blocker_sits_next_to_the_seed() {
        // 0 -> 1 -> 2 -> 3 -> 4 with certain WC edges. Every RR set that
        // reaches the negative seed 0 passes through node 1, so 1 is the
        // only sensible single blocker.
        let mut s = TrialStream::new(11);
        let g = Graph::from_edges(&[(0, 1), (1, 2), (2, 3), (3, 4)], &mut s).unwrap();
        let sampler = RrSampler::new(&g, PropagationModel::Ic, ProbabilityModel::Wc);
        let mut store = RrStore::new(g.node_count());
        sampler.extend_targeted(&mut store, 500, &[0], 42);

        let picks = select_blockers(&store, 1, &[0]);
        assert_eq!(picks, vec![1]);
    }

    #[test]
    fn negative_seeds_are_not_candidates() {
        let mut store = RrStore::new(3);
        store.absorb(vec![0, 1]);
        store.absorb(vec![0, 1]);
        store.absorb(vec![0, 2]);
        let picks = select_blockers(&store, 2, &[0]);
        assert!(!picks.contains(&0));
        assert_eq!(picks[0], 1);
    }

    #[test]
    fn only_risky_sets_count() {
        let mut store = RrStore::new(4);
        // Sets 0 and 1 touch the negative seed 0; set 2 does not.
        store.absorb(vec![0, 1]);
        store.absorb(vec![0, 2]);
        store.absorb(vec![3, 2, 1]);
        let picks = select_blockers(&store, 1, &[0]);
        // 1 and 2 each cover one risky set; 3 covers none. The tie goes to
        // the heap's deterministic order.
        assert_eq!(picks.len(), 1);
        assert_ne!(picks[0], 3);
        assert_ne!(picks[0], 0);
    }

    #[test]
    fn empty_negative_seeds_yield_no_blockers() {
        let mut store = RrStore::new(2);
        store.absorb(vec![0, 1]);
        assert!(select_blockers(&store, 3, &[]).is_empty());
    }
}
