//! Two-phase IMM sample scheduler.
//!
//! Phase 1 doubles a guess of the optimal spread until a greedy pick over a
//! fresh batch of RR sets beats the n / 2^x bar; phase 2 sizes the final
//! batch from that lower bound and runs the greedy once more, which carries
//! the (1 - 1/e - epsilon) guarantee.

use ripple_core::{Graph, NodeId, ProbabilityModel, PropagationModel, TrialStream};

use crate::coverage::{coverage_count, select_max_coverage};
use crate::rr::{RrSampler, RrStore};

/// ln C(n, k) by the stable sum of log ratios; k past n/2 reflects.
pub fn log_binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let k = k.min(n - k);
    let mut acc = 0.0;
    for i in 1..=k {
        acc += ((n - i + 1) as f64).ln() - (i as f64).ln();
    }
    acc
}

/// Select `k` seeds for influence maximization.
///
/// Returns the seed set together with the final RR store, which the caller
/// may keep for coverage-based diagnostics. Stage seeds for the two phases
/// are derived from `seed` so reruns are reproducible.
pub fn select_seeds(
    graph: &Graph,
    propagation: PropagationModel,
    probability: ProbabilityModel,
    k: usize,
    epsilon: f64,
    seed: u64,
) -> (Vec<NodeId>, RrStore) {
    let n = graph.node_count();
    let k = k.min(n);
    let sampler = RrSampler::new(graph, propagation, probability);
    let mut store = RrStore::new(n);

    let opt_lower = phase1(n, &sampler, &mut store, k, epsilon, seed);
    let r = phase2_count(n, k, epsilon, opt_lower);

    store.reset();
    sampler.extend(&mut store, r, TrialStream::mix(seed, u64::MAX));
    let picks = select_max_coverage(&store, k, &[]);
    (picks, store)
}

/// Phase 1: geometric search for a lower bound on the optimal spread.
fn phase1(
    n: usize,
    sampler: &RrSampler<'_>,
    store: &mut RrStore,
    k: usize,
    epsilon: f64,
    seed: u64,
) -> f64 {
    let ln_n = (n as f64).ln();
    let epsilon_prime = epsilon * 2f64.sqrt();
    let log2_n = ln_n / 2f64.ln();

    let max_rounds = log2_n.ceil().max(1.0) as u32;
    for x in 1..=max_rounds {
        let batch = ((2.0 + 2.0 / 3.0 * epsilon_prime)
            * (ln_n + log_binomial(n, k) + log2_n.ln())
            * 2f64.powi(x as i32)
            / (epsilon_prime * epsilon_prime))
            .ceil()
            .max(1.0) as usize;

        store.reset();
        sampler.extend(store, batch, TrialStream::mix(seed, x as u64));
        let picks = select_max_coverage(store, k, &[]);
        let fraction = coverage_count(store, &picks) as f64 / store.len() as f64;
        let spread = fraction * n as f64;

        if fraction > 1.0 / 2f64.powi(x as i32) {
            return spread / (1.0 + epsilon_prime);
        }
    }

    // Exhausted the doubling schedule: every spread estimate stayed under
    // the bar. Floor the bound at 1 so phase 2 stays finite.
    1.0
}

/// Phase 2 sample count from the phase-1 lower bound.
fn phase2_count(n: usize, k: usize, epsilon: f64, opt_lower: f64) -> usize {
    let ln_n = (n as f64).ln();
    let e = std::f64::consts::E;
    let alpha = (ln_n + 2f64.ln()).sqrt();
    let beta = ((1.0 - 1.0 / e) * (log_binomial(n, k) + ln_n + 2f64.ln())).sqrt();
    let r = (2.0 * n as f64 / (epsilon * epsilon)) * ((1.0 - 1.0 / e) * alpha + beta).powi(2)
        / opt_lower;
    r.ceil().max(1.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn graph(edges: &[(NodeId, NodeId)]) -> Graph {
        let mut s = TrialStream::new(11);
        Graph::from_edges(edges, &mut s).unwrap()
    }

    #[test]
    fn log_binomial_matches_direct_computation() {
        // C(10, 3) = 120
        assert_relative_eq!(log_binomial(10, 3), 120f64.ln(), epsilon = 1e-9);
        // Reflection: C(10, 7) = C(10, 3)
        assert_relative_eq!(log_binomial(10, 7), log_binomial(10, 3), epsilon = 1e-12);
        assert_eq!(log_binomial(5, 0), 0.0);
        assert_eq!(log_binomial(5, 5), 0.0);
        assert_eq!(log_binomial(3, 4), f64::NEG_INFINITY);
    }

    #[test]
    fn chain_head_is_the_best_seed() {
        // WC on a chain makes every edge certain, so node 0 reaches all.
        let g = graph(&[(0, 1), (1, 2), (2, 3)]);
        let (seeds, store) =
            select_seeds(&g, PropagationModel::Ic, ProbabilityModel::Wc, 1, 0.1, 42);
        assert_eq!(seeds, vec![0]);
        // Node 0 is in every RR set, so one seed covers the whole store.
        assert_eq!(coverage_count(&store, &seeds), store.len());
    }

    #[test]
    fn star_hub_is_the_best_seed() {
        let edges: Vec<(NodeId, NodeId)> = (1..10).map(|leaf| (0, leaf)).collect();
        let g = graph(&edges);
        let (seeds, _) =
            select_seeds(&g, PropagationModel::Ic, ProbabilityModel::Wc, 1, 0.1, 42);
        assert_eq!(seeds, vec![0]);
    }

    #[test]
    fn runs_are_reproducible() {
        let g = graph(&[(0, 1), (1, 2), (2, 0), (1, 3), (3, 4)]);
        let (a, _) = select_seeds(&g, PropagationModel::Ic, ProbabilityModel::Co, 2, 0.2, 7);
        let (b, _) = select_seeds(&g, PropagationModel::Ic, ProbabilityModel::Co, 2, 0.2, 7);
        assert_eq!(a, b);
    }
}
