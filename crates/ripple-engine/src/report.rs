//! Result records returned by the query orchestrators.

use serde::{Deserialize, Serialize};

use ripple_community::Community;
use ripple_core::NodeId;
use ripple_sim::{Edge, NodeState, SimulationStep};

/// Source of result identifiers. Id generation lives outside the engine;
/// callers hand in whatever scheme they use (the CLI stamps UUIDs, tests
/// use counters).
pub trait ResultIds {
    fn next(&mut self) -> String;
}

/// A selected node with its selection priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankedNode {
    pub id: NodeId,
    pub priority: f64,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct InfluenceSummary {
    pub count: usize,
    pub ratio: f64,
}

impl InfluenceSummary {
    pub fn from_count(count: usize, n: usize) -> Self {
        Self {
            count,
            ratio: if n > 0 { count as f64 / n as f64 } else { 0.0 },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaximizeReport {
    pub result_id: String,
    pub seed_nodes: Vec<RankedNode>,
    pub final_influence: InfluenceSummary,
    pub main_propagation_paths: Vec<Edge>,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MinimizeReport {
    pub original_result_id: String,
    pub blocked_result_id: String,
    pub blocking_nodes: Vec<RankedNode>,
    pub seed_nodes: Vec<NodeId>,
    pub influence_before: InfluenceSummary,
    pub influence_after: InfluenceSummary,
    pub reduction_ratio: f64,
    pub cut_off_paths: Vec<Edge>,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinalInfluenceReport {
    pub result_id: String,
    pub final_states: Vec<NodeState>,
    pub total_influence: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnimationReport {
    pub result_id: String,
    pub total_steps: usize,
    pub simulation_steps: Vec<SimulationStep>,
}

impl AnimationReport {
    pub fn new(result_id: String, simulation_steps: Vec<SimulationStep>) -> Self {
        Self {
            result_id,
            total_steps: simulation_steps.len().saturating_sub(1),
            simulation_steps,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommunityReport {
    pub result_id: String,
    pub community: Community,
    pub message: String,
    pub final_states: Vec<NodeState>,
    pub seed_nodes: Vec<NodeId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CriticalPath {
    pub nodes: Vec<NodeId>,
    pub score: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CriticalPathReport {
    pub result_id: String,
    pub critical_paths: Vec<CriticalPath>,
    pub message: String,
}
