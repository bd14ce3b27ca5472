//! Shared pre-processing for the cohesive-subgraph searches.
//!
//! All three peelers operate inside the same search space: the influenced
//! nodes (those present in the final-influence listing), restricted to the
//! weakly-connected component around the first influenced query node.

use serde::{Deserialize, Serialize};
use tracing::debug;

use ripple_core::{Graph, NodeId};
use ripple_sim::NodeState;

/// Packaged community result.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Community {
    pub node_ids: Vec<NodeId>,
    pub node_count: usize,
    pub average_influence_prob: f64,
}

/// Outcome of one peeling search.
#[derive(Clone, Debug)]
pub enum PeelOutcome {
    Found(Community),
    /// No query node appears among the influenced nodes.
    NoQueryInfluenced,
    /// Peeling removed every node, or no query node survived it.
    NoSurvivor,
}

/// The weakly-connected influenced region around the query nodes.
pub struct SearchSpace {
    /// Membership mask over the full node space.
    pub in_space: Vec<bool>,
    /// Members in discovery order.
    pub members: Vec<NodeId>,
    /// Query nodes that are influenced (search starts from the first).
    pub valid_queries: Vec<NodeId>,
    /// Influence probability per node, zero outside the final states.
    prob: Vec<f64>,
}

impl SearchSpace {
    /// Build the search space, or `None` when no query node is influenced.
    pub fn prepare(
        graph: &Graph,
        final_states: &[NodeState],
        query_nodes: &[NodeId],
    ) -> Option<Self> {
        let n = graph.node_count();
        let mut influenced = vec![false; n];
        let mut prob = vec![0.0f64; n];
        for ns in final_states {
            if ns.id < n {
                influenced[ns.id] = true;
                prob[ns.id] = ns.probability;
            }
        }

        let valid_queries: Vec<NodeId> = query_nodes
            .iter()
            .copied()
            .filter(|&q| q < n && influenced[q])
            .collect();
        debug!(valid = valid_queries.len(), "influenced query nodes");
        if valid_queries.is_empty() {
            return None;
        }

        // Weak component: walk both edge directions inside the influenced
        // set.
        let mut in_space = vec![false; n];
        let mut members = Vec::new();
        let start = valid_queries[0];
        in_space[start] = true;
        members.push(start);
        let mut head = 0;
        while head < members.len() {
            let u = members[head];
            head += 1;
            for &v in graph.successors(u).iter().chain(graph.predecessors(u)) {
                if influenced[v] && !in_space[v] {
                    in_space[v] = true;
                    members.push(v);
                }
            }
        }
        debug!(size = members.len(), "search space (weak component)");

        Some(Self {
            in_space,
            members,
            valid_queries,
            prob,
        })
    }

    /// First query node still present in `survivors`.
    pub fn surviving_query(&self, survivors: &[bool]) -> Option<NodeId> {
        self.valid_queries.iter().copied().find(|&q| survivors[q])
    }

    /// Package a component with its mean influence probability.
    pub fn package(&self, component: Vec<NodeId>) -> Community {
        let node_count = component.len();
        let average_influence_prob = if node_count > 0 {
            component.iter().map(|&v| self.prob[v]).sum::<f64>() / node_count as f64
        } else {
            0.0
        };
        debug!(size = node_count, "final community");
        Community {
            node_ids: component,
            node_count,
            average_influence_prob,
        }
    }
}

/// Connected component of `start` inside `candidates`, following the given
/// adjacency lists.
pub fn extract_component(
    start: NodeId,
    adjacency: &[Vec<NodeId>],
    candidates: &[bool],
) -> Vec<NodeId> {
    let mut component = Vec::new();
    let mut seen = vec![false; candidates.len()];
    if !candidates[start] {
        return component;
    }
    seen[start] = true;
    component.push(start);
    let mut head = 0;
    while head < component.len() {
        let u = component[head];
        head += 1;
        for &v in &adjacency[u] {
            if candidates[v] && !seen[v] {
                seen[v] = true;
                component.push(v);
            }
        }
    }
    component
}

/// Undirected adjacency restricted to the search space, deduplicated and
/// sorted per node.
pub fn undirected_adjacency(graph: &Graph, space: &SearchSpace) -> Vec<Vec<NodeId>> {
    let n = graph.node_count();
    let mut adj = vec![Vec::new(); n];
    for &u in &space.members {
        for &v in graph.successors(u).iter().chain(graph.predecessors(u)) {
            if space.in_space[v] && v != u {
                adj[u].push(v);
            }
        }
    }
    for list in &mut adj {
        list.sort_unstable();
        list.dedup();
    }
    adj
}
