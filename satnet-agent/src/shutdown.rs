//! Adapts the process-wide shutdown flag to [`proxmox_worker_task::WorkerTaskContext`]
//! so the link reconciler can guard new kernel mutations with
//! `fail_on_shutdown()` the same way the teacher's long-running workers do.

use proxmox_worker_task::WorkerTaskContext;

pub struct DaemonShutdownContext;

impl WorkerTaskContext for DaemonShutdownContext {
    fn abort_requested(&self) -> bool {
        proxmox_daemon::state::is_shutdown_requested()
    }

    fn shutdown_requested(&self) -> bool {
        proxmox_daemon::state::is_shutdown_requested()
    }
}
