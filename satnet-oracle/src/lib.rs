//! Offline oracle routing precompiler (§4.5): pure batch transformer from
//! epoch files to epoch files with injected `ip route` commands.

pub mod adjacency;
pub mod dijkstra;
pub mod precompiler;
pub mod types;

pub use precompiler::{precompile, PrecompileInput};
pub use types::{NodeDirectory, NodeInfo};
