//! Degree-constrained peeling: directed (k,l)-core and undirected k-core.

use tracing::debug;

use ripple_core::{Graph, NodeId};
use ripple_sim::NodeState;

use crate::space::{extract_component, undirected_adjacency, PeelOutcome, SearchSpace};

/// Directed (k,l)-core community around the query nodes: every surviving
/// node keeps >= k in-neighbors and >= l out-neighbors inside the core.
pub fn find_kl_core_community(
    graph: &Graph,
    k: usize,
    l: usize,
    final_states: &[NodeState],
    query_nodes: &[NodeId],
) -> PeelOutcome {
    debug!(k, l, influenced = final_states.len(), "(k,l)-core search");
    let Some(space) = SearchSpace::prepare(graph, final_states, query_nodes) else {
        return PeelOutcome::NoQueryInfluenced;
    };

    let n = graph.node_count();
    let mut alive = space.in_space.clone();
    let mut in_deg = vec![0usize; n];
    let mut out_deg = vec![0usize; n];
    for &u in &space.members {
        in_deg[u] = graph
            .predecessors(u)
            .iter()
            .filter(|&&v| space.in_space[v])
            .count();
        out_deg[u] = graph
            .successors(u)
            .iter()
            .filter(|&&v| space.in_space[v])
            .count();
    }

    let mut queued = vec![false; n];
    let mut removal: Vec<NodeId> = Vec::new();
    for &u in &space.members {
        if in_deg[u] < k || out_deg[u] < l {
            queued[u] = true;
            removal.push(u);
        }
    }

    let mut head = 0;
    while head < removal.len() {
        let u = removal[head];
        head += 1;
        if !alive[u] {
            continue;
        }
        alive[u] = false;

        // Dropping u lowers the out-degree of its predecessors and the
        // in-degree of its successors.
        for &v in graph.predecessors(u) {
            if alive[v] {
                out_deg[v] -= 1;
                if out_deg[v] < l && !queued[v] {
                    queued[v] = true;
                    removal.push(v);
                }
            }
        }
        for &v in graph.successors(u) {
            if alive[v] {
                in_deg[v] -= 1;
                if in_deg[v] < k && !queued[v] {
                    queued[v] = true;
                    removal.push(v);
                }
            }
        }
    }

    let survivors = alive;
    debug!(
        remaining = survivors.iter().filter(|&&a| a).count(),
        "(k,l)-core peel done"
    );

    let Some(start) = space.surviving_query(&survivors) else {
        return PeelOutcome::NoSurvivor;
    };

    // Weak connectivity over the surviving set.
    let mut both_ways = vec![Vec::new(); n];
    for u in 0..n {
        if !survivors[u] {
            continue;
        }
        for &v in graph.successors(u).iter().chain(graph.predecessors(u)) {
            if survivors[v] {
                both_ways[u].push(v);
            }
        }
    }
    let component = extract_component(start, &both_ways, &survivors);
    PeelOutcome::Found(space.package(component))
}

/// Undirected k-core community: directed edges collapse to undirected
/// inside the search space, then nodes of undirected degree < k peel away.
pub fn find_k_core_community(
    graph: &Graph,
    k: usize,
    final_states: &[NodeState],
    query_nodes: &[NodeId],
) -> PeelOutcome {
    debug!(k, influenced = final_states.len(), "k-core search");
    let Some(space) = SearchSpace::prepare(graph, final_states, query_nodes) else {
        return PeelOutcome::NoQueryInfluenced;
    };

    let adj = undirected_adjacency(graph, &space);
    let n = graph.node_count();
    let mut alive = space.in_space.clone();
    let mut degree: Vec<usize> = (0..n).map(|u| adj[u].len()).collect();

    let mut queued = vec![false; n];
    let mut removal: Vec<NodeId> = Vec::new();
    for &u in &space.members {
        if degree[u] < k {
            queued[u] = true;
            removal.push(u);
        }
    }

    let mut head = 0;
    while head < removal.len() {
        let u = removal[head];
        head += 1;
        if !alive[u] {
            continue;
        }
        alive[u] = false;
        for &v in &adj[u] {
            if alive[v] {
                degree[v] -= 1;
                if degree[v] < k && !queued[v] {
                    queued[v] = true;
                    removal.push(v);
                }
            }
        }
    }

    debug!(
        remaining = alive.iter().filter(|&&a| a).count(),
        "k-core peel done"
    );

    let Some(start) = space.surviving_query(&alive) else {
        return PeelOutcome::NoSurvivor;
    };
    let component = extract_component(start, &adj, &alive);
    PeelOutcome::Found(space.package(component))
}
