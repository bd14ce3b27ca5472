//! Immutable directed graph snapshot with precomputed edge probabilities.
//!
//! Both the forward and the transposed adjacency are materialized, each with
//! the three probability vectors (WC, TR, CO) laid out parallel to the
//! neighbor lists. The constructor is the only writer; every query shares
//! the snapshot read-only.

use crate::error::{EngineError, Result};
use crate::model::ProbabilityModel;
use crate::stream::TrialStream;
use crate::NodeId;

const TRIVALENCY_PROBS: [f64; 3] = [0.1, 0.01, 0.001];

pub struct Graph {
    n: usize,
    m: usize,

    succ: Vec<Vec<NodeId>>,
    pred: Vec<Vec<NodeId>>,

    succ_wc: Vec<Vec<f64>>,
    succ_tr: Vec<Vec<f64>>,
    succ_co: Vec<Vec<f64>>,

    pred_wc: Vec<Vec<f64>>,
    pred_tr: Vec<Vec<f64>>,
    pred_co: Vec<Vec<f64>>,
}

impl Graph {
    /// Build a snapshot from a directed edge list.
    ///
    /// Node count is 1 + the maximum id seen. Duplicate edges are kept.
    /// The TR probability is drawn once per edge and written to both
    /// adjacency views, so lookup from either side agrees.
    pub fn from_edges(edges: &[(NodeId, NodeId)], stream: &mut TrialStream) -> Result<Self> {
        if edges.is_empty() {
            return Err(EngineError::InputMissing(
                "edge list contains no edges".into(),
            ));
        }

        let n = edges
            .iter()
            .map(|&(u, v)| u.max(v))
            .max()
            .unwrap_or(0)
            + 1;
        let m = edges.len();

        let mut in_deg = vec![0usize; n];
        for &(_, v) in edges {
            in_deg[v] += 1;
        }

        let mut g = Self {
            n,
            m,
            succ: vec![Vec::new(); n],
            pred: vec![Vec::new(); n],
            succ_wc: vec![Vec::new(); n],
            succ_tr: vec![Vec::new(); n],
            succ_co: vec![Vec::new(); n],
            pred_wc: vec![Vec::new(); n],
            pred_tr: vec![Vec::new(); n],
            pred_co: vec![Vec::new(); n],
        };

        for &(u, v) in edges {
            let wc = if in_deg[v] > 0 {
                1.0 / in_deg[v] as f64
            } else {
                0.0
            };
            let tr = TRIVALENCY_PROBS[stream.below(TRIVALENCY_PROBS.len())];

            g.succ[u].push(v);
            g.succ_wc[u].push(wc);
            g.succ_tr[u].push(tr);
            g.succ_co[u].push(0.1);

            g.pred[v].push(u);
            g.pred_wc[v].push(wc);
            g.pred_tr[v].push(tr);
            g.pred_co[v].push(0.1);
        }

        Ok(g)
    }

    pub fn node_count(&self) -> usize {
        self.n
    }

    pub fn edge_count(&self) -> usize {
        self.m
    }

    /// Out-neighbors of u, in input edge order.
    pub fn successors(&self, u: NodeId) -> &[NodeId] {
        &self.succ[u]
    }

    /// In-neighbors of v, in input edge order.
    pub fn predecessors(&self, v: NodeId) -> &[NodeId] {
        &self.pred[v]
    }

    pub fn out_degree(&self, u: NodeId) -> usize {
        self.succ[u].len()
    }

    pub fn in_degree(&self, v: NodeId) -> usize {
        self.pred[v].len()
    }

    /// Edge probabilities parallel to `successors(u)`.
    pub fn succ_probs(&self, u: NodeId, model: ProbabilityModel) -> &[f64] {
        match model {
            ProbabilityModel::Wc => &self.succ_wc[u],
            ProbabilityModel::Tr => &self.succ_tr[u],
            ProbabilityModel::Co => &self.succ_co[u],
        }
    }

    /// Edge probabilities parallel to `predecessors(v)`.
    pub fn pred_probs(&self, v: NodeId, model: ProbabilityModel) -> &[f64] {
        match model {
            ProbabilityModel::Wc => &self.pred_wc[v],
            ProbabilityModel::Tr => &self.pred_tr[v],
            ProbabilityModel::Co => &self.pred_co[v],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::DEFAULT_SEED;

    fn chain() -> Graph {
        let mut s = TrialStream::new(DEFAULT_SEED);
        Graph::from_edges(&[(0, 1), (1, 2), (2, 3)], &mut s).unwrap()
    }

    #[test]
    fn counts_and_adjacency() {
        let g = chain();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.successors(0), &[1]);
        assert_eq!(g.predecessors(2), &[1]);
        assert_eq!(g.out_degree(3), 0);
        assert_eq!(g.in_degree(0), 0);
    }

    #[test]
    fn wc_is_inverse_in_degree() {
        let mut s = TrialStream::new(DEFAULT_SEED);
        // Node 2 has two predecessors, so both edges into it carry 0.5.
        let g = Graph::from_edges(&[(0, 2), (1, 2), (2, 3)], &mut s).unwrap();
        assert_eq!(g.succ_probs(0, ProbabilityModel::Wc), &[0.5]);
        assert_eq!(g.pred_probs(2, ProbabilityModel::Wc), &[0.5, 0.5]);
        assert_eq!(g.pred_probs(3, ProbabilityModel::Wc), &[1.0]);
    }

    #[test]
    fn probabilities_agree_across_views() {
        let mut s = TrialStream::new(7);
        let edges = [(0, 1), (1, 2), (2, 0), (0, 2), (2, 1)];
        let g = Graph::from_edges(&edges, &mut s).unwrap();

        for model in [
            ProbabilityModel::Wc,
            ProbabilityModel::Tr,
            ProbabilityModel::Co,
        ] {
            for u in 0..g.node_count() {
                for (i, &v) in g.successors(u).iter().enumerate() {
                    let fwd = g.succ_probs(u, model)[i];
                    // Find the same edge on the transposed side.
                    let j = g
                        .predecessors(v)
                        .iter()
                        .position(|&w| w == u)
                        .expect("edge missing from transposed view");
                    let rev = g.pred_probs(v, model)[j];
                    assert_eq!(fwd.to_bits(), rev.to_bits());
                }
            }
        }
    }

    #[test]
    fn trivalency_values_come_from_the_palette() {
        let mut s = TrialStream::new(99);
        let edges: Vec<(NodeId, NodeId)> = (0..50).map(|i| (i, i + 1)).collect();
        let g = Graph::from_edges(&edges, &mut s).unwrap();
        for u in 0..g.node_count() {
            for &p in g.succ_probs(u, ProbabilityModel::Tr) {
                assert!(TRIVALENCY_PROBS.contains(&p));
            }
        }
    }

    #[test]
    fn duplicate_edges_are_kept() {
        let mut s = TrialStream::new(DEFAULT_SEED);
        let g = Graph::from_edges(&[(0, 1), (0, 1)], &mut s).unwrap();
        assert_eq!(g.successors(0), &[1, 1]);
        assert_eq!(g.in_degree(1), 2);
        assert_eq!(g.pred_probs(1, ProbabilityModel::Wc), &[0.5, 0.5]);
    }

    #[test]
    fn empty_edge_list_is_missing_input() {
        let mut s = TrialStream::new(DEFAULT_SEED);
        assert!(matches!(
            Graph::from_edges(&[], &mut s),
            Err(EngineError::InputMissing(_))
        ));
    }
}
