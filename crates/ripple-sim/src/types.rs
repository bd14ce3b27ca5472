//! Shared record types for simulation output.

use serde::{Deserialize, Serialize};

use ripple_core::NodeId;

/// Probability at or above which a node counts as "active" in thresholded
/// views (final counts, animation states, cut-off checks).
pub const ACTIVATION_THRESHOLD: f64 = 0.5;

/// Nodes below this probability are omitted from per-node listings.
pub const VISIBLE_PROB_FLOOR: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationState {
    Active,
    Inactive,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeState {
    pub id: NodeId,
    pub state: ActivationState,
    pub probability: f64,
}

impl NodeState {
    pub fn thresholded(id: NodeId, probability: f64) -> Self {
        let state = if probability >= ACTIVATION_THRESHOLD {
            ActivationState::Active
        } else {
            ActivationState::Inactive
        };
        Self {
            id,
            state,
            probability,
        }
    }
}

/// Network snapshot after one animation step.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimulationStep {
    pub step: usize,
    pub newly_activated: Vec<NodeId>,
    pub newly_recovered: Vec<NodeId>,
    pub node_states: Vec<NodeState>,
}

impl SimulationStep {
    pub fn at(step: usize) -> Self {
        Self {
            step,
            ..Default::default()
        }
    }
}

/// Directed edge as it appears in path listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }
}
