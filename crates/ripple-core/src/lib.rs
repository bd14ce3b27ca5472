pub mod error;
pub mod graph;
pub mod heap;
pub mod model;
pub mod stream;

// Core types
pub type NodeId = usize;

pub use error::{EngineError, Result};
pub use graph::Graph;
pub use heap::IndexedMinHeap;
pub use model::{ProbabilityModel, PropagationModel, SeedMode};
pub use stream::TrialStream;
