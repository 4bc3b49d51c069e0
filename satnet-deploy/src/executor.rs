//! Worker executor abstraction (§6, §9 REDESIGN FLAGS "string-heavy shell invocations").

use std::time::Duration;

use async_trait::async_trait;
use satnet_schema::error::SatNetError;
use satnet_schema::model::WorkerSpec;

/// A typed remote command, replacing ad-hoc shell-string concatenation.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub stdin: Option<Vec<u8>>,
    pub deadline: Duration,
}

impl WorkerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            stdin: None,
            deadline: Duration::from_secs(30),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I: IntoIterator<Item = S>, S: Into<String>>(mut self, args: I) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Result of one remote command invocation.
#[derive(Debug, Clone)]
pub struct WorkerCommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: i32,
}

/// The only abstraction allowed to touch remote hosts (§6).
#[async_trait]
pub trait WorkerExecutor: Send + Sync {
    async fn exec(
        &self,
        worker: &WorkerSpec,
        command: WorkerCommand,
    ) -> Result<WorkerCommandOutput, SatNetError>;
}

/// `openssh`-backed implementation: one authenticated session per call,
/// streaming stdout/stderr and the exit code, bounded by a per-invocation
/// deadline (default 30s, §5).
pub struct SshWorkerExecutor;

#[async_trait]
impl WorkerExecutor for SshWorkerExecutor {
    async fn exec(
        &self,
        worker: &WorkerSpec,
        command: WorkerCommand,
    ) -> Result<WorkerCommandOutput, SatNetError> {
        let destination = format!("{}@{}", worker.ssh_user, worker.ip);
        let session = tokio::time::timeout(
            command.deadline,
            openssh::Session::connect_mux(
                &destination,
                openssh::KnownHosts::Accept,
            ),
        )
        .await
        .map_err(|_| SatNetError::WorkerExecError {
            exit_code: -1,
            stderr: format!("connection to {destination} timed out"),
        })?
        .map_err(|e| SatNetError::WorkerExecError {
            exit_code: -1,
            stderr: format!("connection to {destination} failed: {e}"),
        })?;

        let mut remote_command = session.command(&command.program);
        remote_command.args(&command.args);
        for (key, value) in &command.env {
            remote_command.env(key, value);
        }

        let run = async {
            if let Some(stdin) = &command.stdin {
                remote_command.stdin(openssh::Stdio::piped());
                let mut child = remote_command
                    .spawn()
                    .await
                    .map_err(|e| ssh_exec_error(&e))?;
                use tokio::io::AsyncWriteExt;
                if let Some(mut pipe) = child.stdin().take() {
                    let _ = pipe.write_all(stdin).await;
                    let _ = pipe.shutdown().await;
                }
                child.wait_with_output().await.map_err(|e| ssh_exec_error(&e))
            } else {
                remote_command
                    .output()
                    .await
                    .map_err(|e| ssh_exec_error(&e))
            }
        };

        let output = tokio::time::timeout(command.deadline, run)
            .await
            .map_err(|_| SatNetError::WorkerExecError {
                exit_code: -1,
                stderr: format!("command on {destination} timed out"),
            })??;

        let exit_code = output.status.code().unwrap_or(-1);
        let _ = session.close().await;

        Ok(WorkerCommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code,
        })
    }
}

fn ssh_exec_error(err: &openssh::Error) -> SatNetError {
    SatNetError::WorkerExecError {
        exit_code: -1,
        stderr: err.to_string(),
    }
}
