//! Reverse Reachable set sampling.
//!
//! An RR set rooted at r collects the nodes that could have activated r,
//! sampled by running the diffusion model backwards over the transposed
//! adjacency. Sets are generated in parallel, one PRNG substream per set
//! index, then merged in index order so the store is identical for any
//! thread count.

use rayon::prelude::*;

use ripple_core::{Graph, NodeId, ProbabilityModel, PropagationModel, TrialStream};

/// Two-sided RR store: `set(i)` lists the members of RR set i in visit
/// order, `containing(v)` lists the indices of the sets that hold v.
/// `i ∈ containing(v) ⇔ v ∈ set(i)`, by construction.
pub struct RrStore {
    by_idx: Vec<Vec<NodeId>>,
    by_node: Vec<Vec<usize>>,
}

impl RrStore {
    pub fn new(node_space: usize) -> Self {
        Self {
            by_idx: Vec::new(),
            by_node: vec![Vec::new(); node_space],
        }
    }

    /// Discard all sets while keeping the node space.
    pub fn reset(&mut self) {
        self.by_idx.clear();
        for list in &mut self.by_node {
            list.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.by_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_idx.is_empty()
    }

    pub fn node_space(&self) -> usize {
        self.by_node.len()
    }

    pub fn set(&self, i: usize) -> &[NodeId] {
        &self.by_idx[i]
    }

    pub fn containing(&self, v: NodeId) -> &[usize] {
        &self.by_node[v]
    }

    pub(crate) fn absorb(&mut self, members: Vec<NodeId>) {
        let idx = self.by_idx.len();
        for &v in &members {
            self.by_node[v].push(idx);
        }
        self.by_idx.push(members);
    }
}

pub struct RrSampler<'g> {
    graph: &'g Graph,
    propagation: PropagationModel,
    probability: ProbabilityModel,
}

impl<'g> RrSampler<'g> {
    pub fn new(
        graph: &'g Graph,
        propagation: PropagationModel,
        probability: ProbabilityModel,
    ) -> Self {
        Self {
            graph,
            propagation,
            probability,
        }
    }

    /// Append `count` RR sets with uniformly drawn roots.
    pub fn extend(&self, store: &mut RrStore, count: usize, seed: u64) {
        let base = store.len();
        let sets: Vec<Vec<NodeId>> = (0..count)
            .into_par_iter()
            .map(|i| {
                let mut stream = TrialStream::substream(seed, (base + i) as u64);
                let root = stream.below(self.graph.node_count());
                self.sample(root, None, &mut stream)
            })
            .collect();
        for members in sets {
            store.absorb(members);
        }
    }

    /// Append `count` RR sets that stop expanding as soon as they touch a
    /// target node. Concentrates samples on the edges that actually reach
    /// the targets.
    pub fn extend_targeted(
        &self,
        store: &mut RrStore,
        count: usize,
        targets: &[NodeId],
        seed: u64,
    ) {
        let mut is_target = vec![false; self.graph.node_count()];
        for &t in targets {
            if t < is_target.len() {
                is_target[t] = true;
            }
        }

        let base = store.len();
        let sets: Vec<Vec<NodeId>> = (0..count)
            .into_par_iter()
            .map(|i| {
                let mut stream = TrialStream::substream(seed, (base + i) as u64);
                let root = stream.below(self.graph.node_count());
                self.sample(root, Some(&is_target), &mut stream)
            })
            .collect();
        for members in sets {
            store.absorb(members);
        }
    }

    /// One RR set from `root`. With `halt_at`, the walk returns as soon as
    /// a visited node is a target (the root included).
    fn sample(
        &self,
        root: NodeId,
        halt_at: Option<&[bool]>,
        stream: &mut TrialStream,
    ) -> Vec<NodeId> {
        let mut members = vec![root];
        if let Some(targets) = halt_at {
            if targets[root] {
                return members;
            }
        }

        let mut visited = vec![false; self.graph.node_count()];
        visited[root] = true;
        let mut head = 0;

        match self.propagation {
            PropagationModel::Ic => {
                while head < members.len() {
                    let u = members[head];
                    head += 1;
                    let preds = self.graph.predecessors(u);
                    let probs = self.graph.pred_probs(u, self.probability);
                    for (&v, &p) in preds.iter().zip(probs) {
                        if !visited[v] && stream.unit() < p {
                            visited[v] = true;
                            members.push(v);
                            if let Some(targets) = halt_at {
                                if targets[v] {
                                    return members;
                                }
                            }
                        }
                    }
                }
            }
            PropagationModel::Lt => {
                while head < members.len() {
                    let u = members[head];
                    head += 1;
                    let preds = self.graph.predecessors(u);
                    if preds.is_empty() {
                        continue;
                    }
                    // Roulette over the in-edge weights; one draw per hop.
                    // The draw may exceed the total weight, in which case
                    // the hop selects nothing.
                    let mut roll = stream.unit_open();
                    let probs = self.graph.pred_probs(u, self.probability);
                    for (&v, &w) in preds.iter().zip(probs) {
                        roll -= w;
                        if roll <= 0.0 {
                            if !visited[v] {
                                visited[v] = true;
                                members.push(v);
                                if let Some(targets) = halt_at {
                                    if targets[v] {
                                        return members;
                                    }
                                }
                            }
                            break;
                        }
                    }
                }
            }
        }

        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(NodeId, NodeId)]) -> Graph {
        let mut s = TrialStream::new(11);
        Graph::from_edges(edges, &mut s).unwrap()
    }

    fn assert_bijection(store: &RrStore) {
        for i in 0..store.len() {
            for &v in store.set(i) {
                assert!(store.containing(v).contains(&i));
            }
        }
        for v in 0..store.node_space() {
            for &i in store.containing(v) {
                assert!(store.set(i).contains(&v));
            }
        }
    }

    #[test]
    fn bijection_holds_for_ic() {
        let g = graph(&[(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)]);
        let sampler = RrSampler::new(&g, PropagationModel::Ic, ProbabilityModel::Wc);
        let mut store = RrStore::new(g.node_count());
        sampler.extend(&mut store, 200, 42);
        assert_eq!(store.len(), 200);
        assert_bijection(&store);
    }

    #[test]
    fn bijection_holds_for_lt() {
        let g = graph(&[(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)]);
        let sampler = RrSampler::new(&g, PropagationModel::Lt, ProbabilityModel::Wc);
        let mut store = RrStore::new(g.node_count());
        sampler.extend(&mut store, 200, 42);
        assert_bijection(&store);
    }

    #[test]
    fn wc_chain_reaches_back_to_head() {
        // All WC probabilities on a chain are 1, so the RR set of root r
        // is exactly {r, r-1, ..., 0} in visit order.
        let g = graph(&[(0, 1), (1, 2), (2, 3)]);
        let sampler = RrSampler::new(&g, PropagationModel::Ic, ProbabilityModel::Wc);
        let mut store = RrStore::new(g.node_count());
        sampler.extend(&mut store, 50, 7);
        for i in 0..store.len() {
            let set = store.set(i);
            let root = set[0];
            let expected: Vec<NodeId> = (0..=root).rev().collect();
            assert_eq!(set, expected.as_slice());
        }
    }

    #[test]
    fn targeted_sets_stop_at_the_target() {
        let g = graph(&[(0, 1), (1, 2), (2, 3), (3, 4)]);
        let sampler = RrSampler::new(&g, PropagationModel::Ic, ProbabilityModel::Wc);
        let mut store = RrStore::new(g.node_count());
        sampler.extend_targeted(&mut store, 100, &[2], 3);
        for i in 0..store.len() {
            let set = store.set(i);
            // Nothing upstream of the target is ever visited.
            if let Some(at) = set.iter().position(|&v| v == 2) {
                assert_eq!(at, set.len() - 1);
                assert!(!set.contains(&1));
                assert!(!set.contains(&0));
            }
        }
        assert_bijection(&store);
    }

    #[test]
    fn same_seed_same_store() {
        let g = graph(&[(0, 1), (1, 2), (2, 0), (2, 3)]);
        let sampler = RrSampler::new(&g, PropagationModel::Ic, ProbabilityModel::Co);

        let mut a = RrStore::new(g.node_count());
        let mut b = RrStore::new(g.node_count());
        sampler.extend(&mut a, 300, 9);
        sampler.extend(&mut b, 300, 9);
        for i in 0..a.len() {
            assert_eq!(a.set(i), b.set(i));
        }
    }

    #[test]
    fn store_is_independent_of_thread_count() {
        let g = graph(&[(0, 1), (1, 2), (2, 0), (2, 3), (3, 1)]);
        let sampler = RrSampler::new(&g, PropagationModel::Lt, ProbabilityModel::Co);

        let single = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();
        let many = rayon::ThreadPoolBuilder::new()
            .num_threads(8)
            .build()
            .unwrap();

        let mut a = RrStore::new(g.node_count());
        let mut b = RrStore::new(g.node_count());
        single.install(|| sampler.extend(&mut a, 500, 21));
        many.install(|| sampler.extend(&mut b, 500, 21));

        assert_eq!(a.len(), b.len());
        for i in 0..a.len() {
            assert_eq!(a.set(i), b.set(i));
        }
        for v in 0..a.node_space() {
            assert_eq!(a.containing(v), b.containing(v));
        }
    }

    #[test]
    fn reset_clears_both_sides() {
        let g = graph(&[(0, 1), (1, 2)]);
        let sampler = RrSampler::new(&g, PropagationModel::Ic, ProbabilityModel::Wc);
        let mut store = RrStore::new(g.node_count());
        sampler.extend(&mut store, 20, 1);
        store.reset();
        assert!(store.is_empty());
        for v in 0..store.node_space() {
            assert!(store.containing(v).is_empty());
        }
    }
}
