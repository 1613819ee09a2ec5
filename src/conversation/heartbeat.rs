//! Keep-alive hook that ticks while a voice session is connected.
//!
//! No protocol currently needs a keep-alive payload, so a tick only logs.

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

pub struct Heartbeat {
    period: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Heartbeat {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            task: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking.  Idempotent; needs a tokio runtime, otherwise it logs
    /// and stays stopped.
    pub fn start(&self) {
        let Ok(mut task) = self.task.lock() else {
            return;
        };
        if task.is_some() {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("conversation: no runtime, heartbeat not started");
            return;
        };

        let period = self.period.max(Duration::from_millis(1));
        *task = Some(runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                log::trace!("conversation: heartbeat tick");
            }
        }));
        log::debug!("conversation: heartbeat started ({period:?})");
    }

    pub fn stop(&self) {
        if let Some(task) = self.task.lock().ok().and_then(|mut t| t.take()) {
            task.abort();
            log::debug!("conversation: heartbeat stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().map(|t| t.is_some()).unwrap_or(false)
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_stop_cycle() {
        let hb = Heartbeat::new(Duration::from_secs(15));
        assert!(!hb.is_running());

        hb.start();
        hb.start();
        assert!(hb.is_running());

        hb.stop();
        assert!(!hb.is_running());
        hb.stop();
    }

    #[test]
    fn start_without_runtime_is_a_no_op() {
        let hb = Heartbeat::new(Duration::from_secs(15));
        hb.start();
        assert!(!hb.is_running());
    }
}
