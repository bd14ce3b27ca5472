//! Blocker-by-blocker recovery animation.
//!
//! Step 0 is the Monte-Carlo estimate with no blockers; step i applies the
//! first i blockers. A node is "recovered" the first time it drops out of
//! the active set, and the recovered set only grows.

use ripple_core::{Graph, NodeId, ProbabilityModel, PropagationModel, TrialStream};

use crate::forward::ForwardSim;
use crate::types::{NodeState, SimulationStep, ACTIVATION_THRESHOLD, VISIBLE_PROB_FLOOR};

pub fn blocking_animation(
    graph: &Graph,
    propagation: PropagationModel,
    probability: ProbabilityModel,
    seeds: &[NodeId],
    blockers: &[NodeId],
    trials: usize,
    seed: u64,
) -> Vec<SimulationStep> {
    let sim = ForwardSim::new(graph, propagation, probability);
    let n = graph.node_count();

    let mut steps = Vec::with_capacity(blockers.len() + 1);

    let baseline = sim.estimate(seeds, &[], trials, TrialStream::mix(seed, 0));
    let mut step0 = SimulationStep::at(0);
    let mut previously_active = vec![false; n];
    for (v, &p) in baseline.iter().enumerate() {
        if p >= ACTIVATION_THRESHOLD {
            step0.node_states.push(NodeState::thresholded(v, p));
            previously_active[v] = true;
        } else if p > VISIBLE_PROB_FLOOR {
            step0.node_states.push(NodeState::thresholded(v, p));
        }
    }
    steps.push(step0);

    let mut ever_recovered = vec![false; n];

    for i in 0..blockers.len() {
        let applied = &blockers[..=i];
        let probs = sim.estimate(seeds, applied, trials, TrialStream::mix(seed, (i + 1) as u64));

        let mut record = SimulationStep::at(i + 1);
        let mut active_now = vec![false; n];
        for (v, &p) in probs.iter().enumerate() {
            if p >= ACTIVATION_THRESHOLD {
                record.node_states.push(NodeState::thresholded(v, p));
                active_now[v] = true;
            } else if p > VISIBLE_PROB_FLOOR {
                record.node_states.push(NodeState::thresholded(v, p));
            }
        }

        for v in 0..n {
            if previously_active[v] && !active_now[v] && !ever_recovered[v] {
                record.newly_recovered.push(v);
                ever_recovered[v] = true;
            }
        }

        previously_active = active_now;
        steps.push(record);
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(NodeId, NodeId)]) -> Graph {
        let mut s = TrialStream::new(11);
        Graph::from_edges(edges, &mut s).unwrap()
    }

    #[test]
    fn chain_recovers_downstream_nodes_once() {
        let g = graph(&[(0, 1), (1, 2), (2, 3)]);
        let steps = blocking_animation(
            &g,
            PropagationModel::Ic,
            ProbabilityModel::Wc,
            &[0],
            &[1],
            200,
            42,
        );

        assert_eq!(steps.len(), 2);
        // Everything is active before blocking.
        assert_eq!(steps[0].node_states.len(), 4);
        assert!(steps[0].newly_recovered.is_empty());
        // Blocking node 1 rescues 1, 2 and 3.
        let mut recovered = steps[1].newly_recovered.clone();
        recovered.sort_unstable();
        assert_eq!(recovered, vec![1, 2, 3]);
    }

    #[test]
    fn recovered_sets_are_pairwise_disjoint() {
        let g = graph(&[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]);
        let steps = blocking_animation(
            &g,
            PropagationModel::Ic,
            ProbabilityModel::Wc,
            &[0],
            &[1, 2, 3],
            500,
            42,
        );

        let mut seen = std::collections::HashSet::new();
        for step in &steps {
            for &v in &step.newly_recovered {
                assert!(seen.insert(v), "node {v} recovered twice");
            }
        }
    }

    #[test]
    fn no_blockers_means_a_single_step() {
        let g = graph(&[(0, 1)]);
        let steps = blocking_animation(
            &g,
            PropagationModel::Ic,
            ProbabilityModel::Wc,
            &[0],
            &[],
            100,
            42,
        );
        assert_eq!(steps.len(), 1);
    }
}
