//! Query orchestration.
//!
//! Each function walks one query family end to end: bind models, run the
//! samplers/simulators/peelers, package a result record. Exhausted pools
//! and zero-influence runs produce well-formed empty results with a
//! message; only bad configuration and missing inputs return errors.

use tracing::info;

use ripple_community::{
    find_k_core_community, find_k_truss_community, find_kl_core_community, Community, PeelOutcome,
};
use ripple_core::{
    EngineError, Graph, NodeId, ProbabilityModel, PropagationModel, Result, SeedMode, TrialStream,
};
use ripple_sampler::{select_blockers, select_seeds, RrSampler, RrStore};
use ripple_sim::{
    blocking_animation, cut_off_edges, deepest_path, main_paths, probability_wave, ForwardSim,
    NodeState, WaveConfig, ACTIVATION_THRESHOLD, VISIBLE_PROB_FLOOR,
};

use crate::report::{
    AnimationReport, CommunityReport, CriticalPath, CriticalPathReport, FinalInfluenceReport,
    InfluenceSummary, MaximizeReport, MinimizeReport, RankedNode, ResultIds,
};
use crate::seeds::generate_seeds;
use crate::{DEFAULT_TRIALS, MINIMIZATION_SAMPLES};

/// Everything a query needs besides its own parameters.
#[derive(Clone, Copy)]
pub struct QueryContext<'g> {
    pub graph: &'g Graph,
    pub propagation: PropagationModel,
    pub probability: ProbabilityModel,
    /// Root seed; each pipeline stage derives its own substream from it.
    pub seed: u64,
}

impl QueryContext<'_> {
    fn stage_seed(&self, stage: u64) -> u64 {
        TrialStream::mix(self.seed, stage)
    }

    fn sim(&self) -> ForwardSim<'_> {
        ForwardSim::new(self.graph, self.propagation, self.probability)
    }
}

/// How negative seeds for minimization are obtained.
#[derive(Clone, Debug)]
pub struct NegativeSeedSpec {
    pub mode: SeedMode,
    pub count: usize,
    pub manual: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug)]
pub enum CommunityKind {
    KlCore { k: usize, l: usize },
    KCore { k: usize },
    KTruss { k: usize },
}

fn active_count(probs: &[f64]) -> usize {
    probs.iter().filter(|&&p| p >= ACTIVATION_THRESHOLD).count()
}

/// Influence maximization: IMM seed selection, accurate influence count,
/// main propagation paths.
pub fn maximize_query(
    ctx: &QueryContext<'_>,
    k: usize,
    epsilon: f64,
    ids: &mut dyn ResultIds,
) -> Result<MaximizeReport> {
    if k == 0 {
        return Err(EngineError::ConfigInvalid(
            "seed budget must be positive".into(),
        ));
    }
    info!(k, epsilon, "influence maximization");

    let (seeds, _store) = select_seeds(
        ctx.graph,
        ctx.propagation,
        ctx.probability,
        k,
        epsilon,
        ctx.stage_seed(1),
    );

    let sim = ctx.sim();
    let probs = sim.estimate(&seeds, &[], DEFAULT_TRIALS, ctx.stage_seed(2));
    let final_influence =
        InfluenceSummary::from_count(active_count(&probs), ctx.graph.node_count());

    let witness = sim.trace(&seeds, &[], ctx.stage_seed(3));
    let paths = main_paths(&witness, ripple_sim::MAIN_PATH_LIMIT);

    let message = format!(
        "Influence maximization complete. Using propagation model '{}' and probability model \
         '{}'. Selected {} seed nodes, resulting in a simulated influence of {} nodes.",
        ctx.propagation,
        ctx.probability,
        seeds.len(),
        final_influence.count,
    );

    Ok(MaximizeReport {
        result_id: ids.next(),
        seed_nodes: seeds
            .iter()
            .map(|&id| RankedNode { id, priority: 0.0 })
            .collect(),
        final_influence,
        main_propagation_paths: paths,
        message,
    })
}

/// Influence minimization: pick blockers against a negative seed set and
/// report the before/after influence together with the cut-off edges.
pub fn minimize_query(
    ctx: &QueryContext<'_>,
    budget: usize,
    negative: &NegativeSeedSpec,
    epsilon: f64,
    ids: &mut dyn ResultIds,
) -> Result<MinimizeReport> {
    if budget == 0 {
        return Err(EngineError::ConfigInvalid(
            "blocker budget must be positive".into(),
        ));
    }

    let negative_seeds = if negative.manual.is_empty() {
        let count = negative.count.max(1);
        generate_seeds(
            ctx.graph,
            ctx.propagation,
            ctx.probability,
            negative.mode,
            count,
            &negative.manual,
            epsilon,
            ctx.stage_seed(1),
        )?
    } else {
        negative.manual.clone()
    };
    info!(
        budget,
        negatives = negative_seeds.len(),
        "influence minimization"
    );

    let sim = ctx.sim();
    let probs_before = sim.estimate(&negative_seeds, &[], DEFAULT_TRIALS, ctx.stage_seed(2));
    let influence_before =
        InfluenceSummary::from_count(active_count(&probs_before), ctx.graph.node_count());

    // Blocker selection samples its own RR store; any store built during
    // seed generation is gone by now.
    let sampler = RrSampler::new(ctx.graph, ctx.propagation, ctx.probability);
    let mut store = RrStore::new(ctx.graph.node_count());
    sampler.extend_targeted(
        &mut store,
        MINIMIZATION_SAMPLES,
        &negative_seeds,
        ctx.stage_seed(3),
    );
    let blockers = select_blockers(&store, budget, &negative_seeds);

    let probs_after = sim.estimate(
        &negative_seeds,
        &blockers,
        DEFAULT_TRIALS,
        ctx.stage_seed(4),
    );
    let influence_after =
        InfluenceSummary::from_count(active_count(&probs_after), ctx.graph.node_count());

    let witness = sim.trace(&negative_seeds, &[], ctx.stage_seed(5));
    let cut_off_paths = cut_off_edges(&witness, &probs_after);

    let reduction_ratio = if influence_before.count > 0 {
        (influence_before.count - influence_after.count.min(influence_before.count)) as f64
            / influence_before.count as f64
    } else {
        0.0
    };

    let message = format!(
        "Influence minimization complete. Selected {} blocking nodes, reducing influence by \
         approximately {:.1}%. Found {} sample cut-off paths.",
        blockers.len(),
        reduction_ratio * 100.0,
        cut_off_paths.len(),
    );

    Ok(MinimizeReport {
        original_result_id: ids.next(),
        blocked_result_id: ids.next(),
        blocking_nodes: blockers
            .iter()
            .map(|&id| RankedNode { id, priority: 0.0 })
            .collect(),
        seed_nodes: negative_seeds,
        influence_before,
        influence_after,
        reduction_ratio,
        cut_off_paths,
        message,
    })
}

/// Converged per-node activation probabilities for the given seeds and
/// blockers. Nodes below the visibility floor are omitted.
pub fn final_influence_query(
    ctx: &QueryContext<'_>,
    seeds: &[NodeId],
    blockers: &[NodeId],
    ids: &mut dyn ResultIds,
) -> Result<FinalInfluenceReport> {
    if seeds.is_empty() {
        return Err(EngineError::InputMissing("initial nodes are empty".into()));
    }

    let probs = ctx
        .sim()
        .estimate(seeds, blockers, DEFAULT_TRIALS, ctx.stage_seed(1));

    let mut final_states = Vec::new();
    let mut total_influence = 0.0;
    for (id, &p) in probs.iter().enumerate() {
        if p > VISIBLE_PROB_FLOOR {
            final_states.push(NodeState::thresholded(id, p));
            total_influence += p;
        }
    }

    Ok(FinalInfluenceReport {
        result_id: ids.next(),
        final_states,
        total_influence,
    })
}

/// Probability-wave animation steps.
pub fn probability_animation_query(
    ctx: &QueryContext<'_>,
    seeds: &[NodeId],
    blockers: &[NodeId],
    ids: &mut dyn ResultIds,
) -> Result<AnimationReport> {
    if seeds.is_empty() {
        return Err(EngineError::InputMissing("initial nodes are empty".into()));
    }
    let steps = probability_wave(
        ctx.graph,
        ctx.propagation,
        ctx.probability,
        seeds,
        blockers,
        &WaveConfig::default(),
    );
    Ok(AnimationReport::new(ids.next(), steps))
}

/// Blocker-by-blocker recovery animation steps.
pub fn blocking_animation_query(
    ctx: &QueryContext<'_>,
    seeds: &[NodeId],
    blockers: &[NodeId],
    ids: &mut dyn ResultIds,
) -> Result<AnimationReport> {
    if seeds.is_empty() {
        return Err(EngineError::InputMissing("initial nodes are empty".into()));
    }
    let steps = blocking_animation(
        ctx.graph,
        ctx.propagation,
        ctx.probability,
        seeds,
        blockers,
        DEFAULT_TRIALS,
        ctx.stage_seed(1),
    );
    Ok(AnimationReport::new(ids.next(), steps))
}

/// Cohesive-community search over the influenced subgraph.
pub fn community_query(
    ctx: &QueryContext<'_>,
    kind: CommunityKind,
    seed_budget: usize,
    seed_mode: SeedMode,
    manual_seeds: &[NodeId],
    epsilon: f64,
    ids: &mut dyn ResultIds,
) -> Result<CommunityReport> {
    if let CommunityKind::KTruss { k } = kind {
        if k < 2 {
            return Err(EngineError::ConfigInvalid(
                "k-truss requires k >= 2".into(),
            ));
        }
    }

    let query_nodes = if manual_seeds.is_empty() {
        generate_seeds(
            ctx.graph,
            ctx.propagation,
            ctx.probability,
            seed_mode,
            seed_budget,
            manual_seeds,
            epsilon,
            ctx.stage_seed(1),
        )?
    } else {
        manual_seeds.to_vec()
    };

    let probs = ctx
        .sim()
        .estimate(&query_nodes, &[], DEFAULT_TRIALS, ctx.stage_seed(2));
    let final_states: Vec<NodeState> = probs
        .iter()
        .enumerate()
        .filter(|(_, &p)| p > VISIBLE_PROB_FLOOR)
        .map(|(id, &p)| NodeState::thresholded(id, p))
        .collect();

    if final_states.is_empty() {
        return Ok(CommunityReport {
            result_id: ids.next(),
            community: Community::default(),
            message: "Generated seeds did not result in any influence, cannot perform community \
                      analysis."
                .into(),
            final_states,
            seed_nodes: query_nodes,
        });
    }

    let outcome = match kind {
        CommunityKind::KlCore { k, l } => {
            find_kl_core_community(ctx.graph, k, l, &final_states, &query_nodes)
        }
        CommunityKind::KCore { k } => {
            find_k_core_community(ctx.graph, k, &final_states, &query_nodes)
        }
        CommunityKind::KTruss { k } => {
            find_k_truss_community(ctx.graph, k, &final_states, &query_nodes)
        }
    };

    let condition = match kind {
        CommunityKind::KlCore { k, l } => format!("({k},{l})-core"),
        CommunityKind::KCore { k } => format!("{k}-core"),
        CommunityKind::KTruss { k } => format!("{k}-truss"),
    };

    let (community, message) = match outcome {
        PeelOutcome::Found(c) => {
            let message = format!(
                "Found a community that satisfies the {} condition with an average influence \
                 probability of {:.6}.",
                condition, c.average_influence_prob,
            );
            (c, message)
        }
        PeelOutcome::NoQueryInfluenced => (
            Community::default(),
            "None of the query nodes were influenced; community search cannot start.".into(),
        ),
        PeelOutcome::NoSurvivor => (
            Community::default(),
            format!(
                "No community satisfying the {} condition was found for the generated seeds.",
                condition,
            ),
        ),
    };

    Ok(CommunityReport {
        result_id: ids.next(),
        community,
        message,
        final_states,
        seed_nodes: query_nodes,
    })
}

/// Deepest propagation path of one witness-tracked trial.
pub fn critical_paths_query(
    ctx: &QueryContext<'_>,
    seeds: &[NodeId],
    ids: &mut dyn ResultIds,
) -> Result<CriticalPathReport> {
    if seeds.is_empty() {
        return Err(EngineError::InputMissing("initial nodes are empty".into()));
    }

    let witness = ctx.sim().trace(seeds, &[], ctx.stage_seed(1));
    let (critical_paths, message) = match deepest_path(&witness) {
        Some((nodes, depth)) => {
            let message = format!(
                "Successfully found a deepest propagation path with length {depth}."
            );
            (
                vec![CriticalPath {
                    nodes,
                    score: depth as f64,
                    kind: "deepest".into(),
                }],
                message,
            )
        }
        None => (
            Vec::new(),
            "Simulation produced no activated nodes; no propagation path exists.".into(),
        ),
    };

    Ok(CriticalPathReport {
        result_id: ids.next(),
        critical_paths,
        message,
    })
}
