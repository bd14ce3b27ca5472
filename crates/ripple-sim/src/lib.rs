pub mod forward;
pub mod paths;
pub mod recovery;
pub mod types;
pub mod wave;

pub use forward::{ForwardSim, Witness};
pub use paths::{cut_off_edges, deepest_path, main_paths, MAIN_PATH_LIMIT};
pub use recovery::blocking_animation;
pub use types::{
    ActivationState, Edge, NodeState, SimulationStep, ACTIVATION_THRESHOLD, VISIBLE_PROB_FLOOR,
};
pub use wave::{probability_wave, WaveConfig};
