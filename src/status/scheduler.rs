use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::types::StatusError;

use super::sync::Reconciler;

enum State {
    Unmounted,
    Running(JoinHandle<()>),
    Stopped,
}

/// Owns the repeating task that drives [`Reconciler::tick`].
///
/// The first tick fires one full interval after `mount`. Every tick runs as its
/// own task, so a slow tick never holds back the timer and ticks may overlap.
/// `unmount` stops the timer but leaves ticks already in flight alone.
pub struct StatusSync {
    reconciler: Arc<Reconciler>,
    state: State,
}

impl StatusSync {
    pub fn new(reconciler: Reconciler) -> Self {
        Self {
            reconciler: Arc::new(reconciler),
            state: State::Unmounted,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    /// Starts the timer on the current tokio runtime.
    ///
    /// Fails with [`StatusError::NoRuntime`] when called outside one.
    pub fn mount(&mut self) -> Result<(), StatusError> {
        if !matches!(self.state, State::Unmounted) {
            return Err(StatusError::AlreadyMounted);
        }

        let period = self.reconciler.config().update_interval();
        if period.is_zero() {
            return Err(StatusError::Config(
                "updateInterval must be greater than zero".to_string(),
            ));
        }

        let runtime = Handle::try_current().map_err(|_| StatusError::NoRuntime)?;
        let reconciler = Arc::clone(&self.reconciler);
        let handle = runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut tick: u64 = 0;
            loop {
                ticker.tick().await;
                tick += 1;
                debug!(tick, "Firing status tick");
                let reconciler = Arc::clone(&reconciler);
                tokio::spawn(async move {
                    reconciler.tick().await;
                });
            }
        });

        info!(
            interval_ms = self.reconciler.config().update_interval_ms,
            targets = self.reconciler.config().targets.len(),
            "Status sync mounted"
        );
        self.state = State::Running(handle);
        Ok(())
    }

    /// Stops future ticks. Calling it again, or before mount, does nothing.
    pub fn unmount(&mut self) {
        match std::mem::replace(&mut self.state, State::Stopped) {
            State::Running(handle) => {
                handle.abort();
                info!("Status sync unmounted");
            }
            State::Unmounted => self.state = State::Unmounted,
            State::Stopped => debug!("Status sync already unmounted"),
        }
    }
}

impl Drop for StatusSync {
    fn drop(&mut self) {
        if let State::Running(handle) = &self.state {
            handle.abort();
        }
    }
}
