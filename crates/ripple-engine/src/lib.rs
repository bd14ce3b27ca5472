pub mod queries;
pub mod report;
pub mod seeds;

// Engine-wide defaults.

/// Monte-Carlo trial count used for accurate influence estimates.
pub const DEFAULT_TRIALS: usize = 10_000;

/// RR sets generated for blocker selection.
pub const MINIMIZATION_SAMPLES: usize = 100_000;

pub use queries::{
    blocking_animation_query, community_query, critical_paths_query, final_influence_query,
    maximize_query, minimize_query, probability_animation_query, CommunityKind, NegativeSeedSpec,
    QueryContext,
};
pub use report::{
    AnimationReport, CommunityReport, CriticalPath, CriticalPathReport, FinalInfluenceReport,
    InfluenceSummary, MaximizeReport, MinimizeReport, RankedNode, ResultIds,
};
pub use seeds::generate_seeds;
