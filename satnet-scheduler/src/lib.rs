//! Epoch scheduler: virtual clock driving link/task deltas into the store (§4.4).

pub mod clock;
pub mod directory;
pub mod release;
pub mod scheduler;

pub use scheduler::{run, Mode};
