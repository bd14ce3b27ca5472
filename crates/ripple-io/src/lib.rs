pub mod cli;
pub mod loader;

pub use cli::{Cli, Commands, UuidIds};
pub use loader::{load_graph, read_edge_list};
