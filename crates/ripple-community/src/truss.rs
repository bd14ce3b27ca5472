//! k-truss extraction: edge peeling by triangle support.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use ripple_core::{Graph, NodeId};
use ripple_sim::NodeState;

use crate::space::{extract_component, undirected_adjacency, PeelOutcome, SearchSpace};

type UndirectedEdge = (NodeId, NodeId);

fn make_edge(u: NodeId, v: NodeId) -> UndirectedEdge {
    (u.min(v), u.max(v))
}

/// k-truss community around the query nodes: every surviving edge closes
/// at least k - 2 triangles whose edges also survive. Requires k >= 2.
pub fn find_k_truss_community(
    graph: &Graph,
    k: usize,
    final_states: &[NodeState],
    query_nodes: &[NodeId],
) -> PeelOutcome {
    debug!(k, influenced = final_states.len(), "k-truss search");
    assert!(k >= 2, "k-truss requires k >= 2");
    let min_support = k - 2;

    let Some(space) = SearchSpace::prepare(graph, final_states, query_nodes) else {
        return PeelOutcome::NoQueryInfluenced;
    };

    let adj = undirected_adjacency(graph, &space);

    // Count triangle supports and remember each edge's witnesses (the
    // third vertex of every triangle it closes). Enumerating u < v < w
    // once per triangle still increments all three edges.
    let mut support: BTreeMap<UndirectedEdge, usize> = BTreeMap::new();
    let mut witnesses: BTreeMap<UndirectedEdge, Vec<NodeId>> = BTreeMap::new();
    let mut edges: BTreeSet<UndirectedEdge> = BTreeSet::new();

    for &u in &space.members {
        for (i, &v) in adj[u].iter().enumerate() {
            edges.insert(make_edge(u, v));
            if v < u {
                continue;
            }
            for &w in &adj[u][i + 1..] {
                if adj[v].binary_search(&w).is_ok() {
                    // Triangle (u, v, w) with u < v < w.
                    for (a, b, c) in [(u, v, w), (u, w, v), (v, w, u)] {
                        let e = make_edge(a, b);
                        *support.entry(e).or_insert(0) += 1;
                        witnesses.entry(e).or_default().push(c);
                    }
                }
            }
        }
    }
    debug!(
        edges = edges.len(),
        supported = support.len(),
        "triangle supports computed"
    );

    // Peel edges below the support bar; removing one weakens the other
    // two edges of each triangle it witnessed.
    let mut removal: Vec<UndirectedEdge> = edges
        .iter()
        .copied()
        .filter(|e| support.get(e).copied().unwrap_or(0) < min_support)
        .collect();

    let mut head = 0;
    while head < removal.len() {
        let edge = removal[head];
        head += 1;
        if !edges.remove(&edge) {
            continue;
        }
        let (u, v) = edge;
        let Some(third_parties) = witnesses.get(&edge) else {
            continue;
        };
        for &w in third_parties {
            for other in [make_edge(u, w), make_edge(v, w)] {
                if edges.contains(&other) {
                    let s = support.entry(other).or_insert(0);
                    *s = s.saturating_sub(1);
                    if *s < min_support {
                        removal.push(other);
                    }
                }
            }
        }
    }
    debug!(remaining = edges.len(), "k-truss peel done");

    // Collect surviving nodes and their induced adjacency.
    let n = graph.node_count();
    let mut survivors = vec![false; n];
    let mut truss_adj = vec![Vec::new(); n];
    for &(u, v) in &edges {
        survivors[u] = true;
        survivors[v] = true;
        truss_adj[u].push(v);
        truss_adj[v].push(u);
    }

    let Some(start) = space.surviving_query(&survivors) else {
        return PeelOutcome::NoSurvivor;
    };
    let component = extract_component(start, &truss_adj, &survivors);
    PeelOutcome::Found(space.package(component))
}
