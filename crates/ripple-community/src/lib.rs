pub mod peel;
pub mod space;
pub mod truss;

pub use peel::{find_k_core_community, find_kl_core_community};
pub use space::{Community, PeelOutcome, SearchSpace};
pub use truss::find_k_truss_community;
