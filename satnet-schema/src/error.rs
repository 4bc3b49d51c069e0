use thiserror::Error;

/// The error taxonomy shared by every NetSatBench component.
///
/// Leaf components surface one of these kinds; control commands downcast
/// the top-level `anyhow::Error` chain back to a `SatNetError` at the
/// process boundary to pick an exit code.
#[derive(Error, Debug)]
pub enum SatNetError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("insufficient capacity: node {node:?} needs cpu={cpu_request} mem={mem_request}, no worker has residual capacity")]
    InsufficientCapacity {
        node: String,
        cpu_request: f64,
        mem_request: u64,
    },

    #[error("address pool exhausted for rule {rule:?}")]
    AddressPoolExhausted { rule: String },

    #[error("store error: {0}")]
    StoreError(String),

    #[error("worker exec failed (exit={exit_code}): {stderr}")]
    WorkerExecError { exit_code: i32, stderr: String },

    #[error("kernel operation failed: {0}")]
    KernelOpError(String),

    #[error("epoch file parse error in {file:?}: {reason}")]
    EpochParseError { file: String, reason: String },
}

impl SatNetError {
    /// The CLI exit code documented for `init`/`deploy` (§6).
    pub fn exit_code(&self) -> i32 {
        match self {
            SatNetError::ValidationError(_) => 2,
            SatNetError::InsufficientCapacity { .. } => 3,
            SatNetError::AddressPoolExhausted { .. } => 4,
            SatNetError::StoreError(_) => 1,
            SatNetError::WorkerExecError { .. } => 5,
            SatNetError::KernelOpError(_) => 1,
            SatNetError::EpochParseError { .. } => 1,
        }
    }
}
