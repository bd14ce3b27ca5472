//! Seed generation for queries that synthesize their own seed sets.

use tracing::info;

use ripple_core::{
    EngineError, Graph, NodeId, ProbabilityModel, PropagationModel, Result, SeedMode, TrialStream,
};
use ripple_sampler::select_seeds;

/// Produce `count` seed nodes according to `mode`.
///
/// `Manual` requires a non-empty explicit list and returns it unchanged;
/// the other modes ignore it. `count >= n` degenerates to "all nodes".
pub fn generate_seeds(
    graph: &Graph,
    propagation: PropagationModel,
    probability: ProbabilityModel,
    mode: SeedMode,
    count: usize,
    manual: &[NodeId],
    epsilon: f64,
    seed: u64,
) -> Result<Vec<NodeId>> {
    if mode == SeedMode::Manual {
        if manual.is_empty() {
            return Err(EngineError::InputMissing(
                "manual seed mode needs an explicit seed list".into(),
            ));
        }
        return Ok(manual.to_vec());
    }

    let n = graph.node_count();
    if count == 0 {
        return Err(EngineError::ConfigInvalid(
            "seed count must be positive".into(),
        ));
    }
    if count >= n {
        return Ok((0..n).collect());
    }

    match mode {
        SeedMode::Imm => {
            info!(count, "generating seeds via IMM");
            let (seeds, _) = select_seeds(graph, propagation, probability, count, epsilon, seed);
            Ok(seeds)
        }
        SeedMode::Random => {
            info!(count, "generating seeds uniformly at random");
            let mut stream = TrialStream::new(seed);
            Ok(stream.sample_indices(n, count))
        }
        SeedMode::Degree => {
            info!(count, "generating seeds by out-degree");
            let mut ranked: Vec<NodeId> = (0..n).collect();
            ranked.sort_by_key(|&v| (std::cmp::Reverse(graph.out_degree(v)), v));
            ranked.truncate(count);
            Ok(ranked)
        }
        SeedMode::Manual => unreachable!("handled above"),
    }
}
