//! Deployer and worker executor abstraction (§4.2).

pub mod deployer;
pub mod executor;

pub use deployer::{deploy, remove_orphans, DeployResult};
pub use executor::{SshWorkerExecutor, WorkerCommand, WorkerCommandOutput, WorkerExecutor};
