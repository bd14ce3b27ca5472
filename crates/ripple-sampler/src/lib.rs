pub mod blocker;
pub mod coverage;
pub mod imm;
pub mod rr;

pub use blocker::select_blockers;
pub use coverage::{coverage_count, select_max_coverage};
pub use imm::{log_binomial, select_seeds};
pub use rr::{RrSampler, RrStore};
