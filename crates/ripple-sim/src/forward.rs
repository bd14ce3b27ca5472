//! Forward Monte-Carlo diffusion.
//!
//! Trials run in parallel, one PRNG substream per trial id, and the
//! per-node activation counts are summed afterwards; the estimate is
//! bit-identical for any thread count. Blocked nodes are never activated
//! and a blocked seed does not start propagation.

use rayon::prelude::*;

use ripple_core::{Graph, NodeId, ProbabilityModel, PropagationModel, TrialStream};

/// Why a node ended a traced trial activated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Witness {
    /// The node was a live seed.
    Seed,
    /// First neighbor whose firing (IC) or weight contribution (LT)
    /// activated the node, with the probability of that edge.
    Parent { parent: NodeId, prob: f64 },
}

pub struct ForwardSim<'g> {
    graph: &'g Graph,
    propagation: PropagationModel,
    probability: ProbabilityModel,
}

impl<'g> ForwardSim<'g> {
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

    /// Per-node activation probability over `trials` independent runs.
    pub fn estimate(
        &self,
        seeds: &[NodeId],
        blockers: &[NodeId],
        trials: usize,
        seed: u64,
    ) -> Vec<f64> {
        let n = self.graph.node_count();
        if trials == 0 {
            return vec![0.0; n];
        }
        let is_blocked = self.blocked_mask(blockers);

        let counts = (0..trials)
            .into_par_iter()
            .map(|t| {
                let mut stream = TrialStream::substream(seed, t as u64);
                let activated = self.run_trial(seeds, &is_blocked, &mut stream);
                activated.into_iter().map(u32::from).collect::<Vec<u32>>()
            })
            .reduce(
                || vec![0u32; n],
                |mut acc, activated| {
                    for (a, hit) in acc.iter_mut().zip(activated) {
                        *a += hit;
                    }
                    acc
                },
            );

        counts
            .into_iter()
            .map(|c| c as f64 / trials as f64)
            .collect()
    }

    /// One trial recording the activation witness of every reached node.
    /// `None` marks nodes the trial never activated.
    pub fn trace(&self, seeds: &[NodeId], blockers: &[NodeId], seed: u64) -> Vec<Option<Witness>> {
        let n = self.graph.node_count();
        let is_blocked = self.blocked_mask(blockers);
        let mut stream = TrialStream::new(seed);

        let mut witness: Vec<Option<Witness>> = vec![None; n];
        let mut queue = Vec::new();
        for &s in seeds {
            if s < n && !is_blocked[s] && witness[s].is_none() {
                witness[s] = Some(Witness::Seed);
                queue.push(s);
            }
        }

        match self.propagation {
            PropagationModel::Ic => {
                let mut head = 0;
                while head < queue.len() {
                    let u = queue[head];
                    head += 1;
                    let succs = self.graph.successors(u);
                    let probs = self.graph.succ_probs(u, self.probability);
                    for (&v, &p) in succs.iter().zip(probs) {
                        if witness[v].is_some() || is_blocked[v] {
                            continue;
                        }
                        if stream.unit() < p {
                            witness[v] = Some(Witness::Parent { parent: u, prob: p });
                            queue.push(v);
                        }
                    }
                }
            }
            PropagationModel::Lt => {
                let thresholds: Vec<f64> = (0..n).map(|_| stream.unit()).collect();
                let mut weight = vec![0.0f64; n];
                let mut head = 0;
                while head < queue.len() {
                    let u = queue[head];
                    head += 1;
                    let succs = self.graph.successors(u);
                    let probs = self.graph.succ_probs(u, self.probability);
                    for (&v, &w) in succs.iter().zip(probs) {
                        if witness[v].is_some() || is_blocked[v] {
                            continue;
                        }
                        weight[v] += w;
                        if weight[v] >= thresholds[v] {
                            witness[v] = Some(Witness::Parent { parent: u, prob: w });
                            queue.push(v);
                        }
                    }
                }
            }
        }

        witness
    }

    fn run_trial(&self, seeds: &[NodeId], is_blocked: &[bool], stream: &mut TrialStream) -> Vec<bool> {
        let n = self.graph.node_count();
        let mut activated = vec![false; n];
        let mut queue = Vec::new();
        for &s in seeds {
            if s < n && !is_blocked[s] && !activated[s] {
                activated[s] = true;
                queue.push(s);
            }
        }

        match self.propagation {
            PropagationModel::Ic => {
                let mut head = 0;
                while head < queue.len() {
                    let u = queue[head];
                    head += 1;
                    let succs = self.graph.successors(u);
                    let probs = self.graph.succ_probs(u, self.probability);
                    for (&v, &p) in succs.iter().zip(probs) {
                        if activated[v] || is_blocked[v] {
                            continue;
                        }
                        if stream.unit() < p {
                            activated[v] = true;
                            queue.push(v);
                        }
                    }
                }
            }
            PropagationModel::Lt => {
                // Fresh threshold per node per trial.
                let thresholds: Vec<f64> = (0..n).map(|_| stream.unit()).collect();
                let mut weight = vec![0.0f64; n];
                let mut head = 0;
                while head < queue.len() {
                    let u = queue[head];
                    head += 1;
                    let succs = self.graph.successors(u);
                    let probs = self.graph.succ_probs(u, self.probability);
                    for (&v, &w) in succs.iter().zip(probs) {
                        if activated[v] || is_blocked[v] {
                            continue;
                        }
                        weight[v] += w;
                        if weight[v] >= thresholds[v] {
                            activated[v] = true;
                            queue.push(v);
                        }
                    }
                }
            }
        }

        activated
    }

    fn blocked_mask(&self, blockers: &[NodeId]) -> Vec<bool> {
        let n = self.graph.node_count();
        let mut mask = vec![false; n];
        for &b in blockers {
            if b < n {
                mask[b] = true;
            }
        }
        mask
    }
}
