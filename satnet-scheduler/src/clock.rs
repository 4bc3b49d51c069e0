//! Virtual clock (§4.4): epoch file `i` is released at
//! `wall0 + (time_i - t0)`, where `t0` is the first file's `time` and
//! `wall0` is the wall-clock instant the scheduler started.

use std::time::Duration;

/// `t0`/`wall0` pair plus the skew-aware sleep helper.
pub struct VirtualClock {
    t0: i64,
    wall0: std::time::Instant,
}

impl VirtualClock {
    pub fn start(t0: i64) -> Self {
        Self {
            t0,
            wall0: std::time::Instant::now(),
        }
    }

    /// Sleeps until `time_i` should be released, or returns immediately
    /// (logging skew) if that instant has already passed.
    pub async fn wait_for_release(&self, time_i: i64) {
        let offset = time_i - self.t0;
        if offset < 0 {
            log::warn!("epoch file time {time_i} precedes t0 {t0}; releasing immediately", t0 = self.t0);
            return;
        }
        let target = self.wall0 + Duration::from_secs(offset as u64);
        let now = std::time::Instant::now();
        if target <= now {
            let skew = now.saturating_duration_since(target);
            log::warn!("release time already passed by {skew:?}, releasing immediately");
            return;
        }
        tokio::time::sleep(target - now).await;
    }
}
