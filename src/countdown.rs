//! Once-per-second countdown owned by a screen. The task publishes the seconds
//! left on a `watch` channel and runs its callback once on reaching zero.
//! Dropping the `Countdown` cancels the task, so the callback never fires for a
//! screen that is gone.

use std::time::Duration;
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::debug;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Countdown {
    remaining: watch::Receiver<u32>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawns the countdown on the current runtime. `on_zero` runs exactly once
    /// when the count reaches zero, unless the countdown is cancelled first.
    pub fn start<F>(seconds: u32, on_zero: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, remaining) = watch::channel(seconds);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut left = seconds;
            while left > 0 {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        debug!(left, "countdown cancelled");
                        return;
                    }
                    () = tokio::time::sleep(TICK) => {
                        left -= 1;
                        tx.send_replace(left);
                    }
                }
            }
            if token.is_cancelled() {
                return;
            }
            on_zero();
        });

        Self {
            remaining,
            cancel,
            handle,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        *self.remaining.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.remaining.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}
