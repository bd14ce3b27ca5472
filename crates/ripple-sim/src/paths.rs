//! Path extraction from witness-tracked trials.

use ripple_core::NodeId;

use crate::forward::Witness;
use crate::types::{Edge, ACTIVATION_THRESHOLD};

/// How many edges a main-path listing may carry.
pub const MAIN_PATH_LIMIT: usize = 50;

/// The strongest parent -> child edges of one traced trial, ordered by
/// edge probability descending (then by endpoints, so equal-probability
/// listings are stable).
pub fn main_paths(witness: &[Option<Witness>], limit: usize) -> Vec<Edge> {
    let mut weighted: Vec<(f64, Edge)> = witness
        .iter()
        .enumerate()
        .filter_map(|(child, w)| match w {
            Some(Witness::Parent { parent, prob }) => {
                Some((*prob, Edge::new(*parent, child)))
            }
            _ => None,
        })
        .collect();

    weighted.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| (a.1.source, a.1.target).cmp(&(b.1.source, b.1.target)))
    });
    weighted.truncate(limit);
    weighted.into_iter().map(|(_, e)| e).collect()
}

/// Edges of the un-blocked witness tree whose child is no longer active
/// under the blocked probability estimate.
pub fn cut_off_edges(witness: &[Option<Witness>], blocked_probs: &[f64]) -> Vec<Edge> {
    witness
        .iter()
        .enumerate()
        .filter_map(|(child, w)| match w {
            Some(Witness::Parent { parent, .. })
                if blocked_probs[child] < ACTIVATION_THRESHOLD =>
            {
                Some(Edge::new(*parent, child))
            }
            _ => None,
        })
        .collect()
}

/// The deepest root-to-leaf path of the witness tree, with its depth.
///
/// Depth of a seed is 0; every hop adds 1. Ties resolve to the lowest
/// node id, which the id-ordered scan provides.
pub fn deepest_path(witness: &[Option<Witness>]) -> Option<(Vec<NodeId>, usize)> {
    let n = witness.len();
    let mut depth: Vec<Option<usize>> = vec![None; n];

    let mut deepest: Option<(NodeId, usize)> = None;
    for v in 0..n {
        if witness[v].is_none() {
            continue;
        }
        let d = depth_of(v, witness, &mut depth);
        match deepest {
            Some((_, best)) if d <= best => {}
            _ => deepest = Some((v, d)),
        }
    }

    let (mut node, score) = deepest?;
    let mut sequence = vec![node];
    while let Some(Witness::Parent { parent, .. }) = witness[node] {
        node = parent;
        sequence.push(node);
    }
    sequence.reverse();
    Some((sequence, score))
}

fn depth_of(v: NodeId, witness: &[Option<Witness>], memo: &mut [Option<usize>]) -> usize {
    // Walk up to the nearest memoized ancestor, then unwind.
    let mut chain = Vec::new();
    let mut node = v;
    let base = loop {
        if let Some(d) = memo[node] {
            break d;
        }
        match witness[node] {
            Some(Witness::Parent { parent, .. }) => {
                chain.push(node);
                node = parent;
            }
            _ => break 0,
        }
    };
    if memo[node].is_none() {
        memo[node] = Some(base);
    }
    let mut d = base;
    for &link in chain.iter().rev() {
        d += 1;
        memo[link] = Some(d);
    }
    memo[v].unwrap_or(base)
}
