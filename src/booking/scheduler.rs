use std::{
    future::Future,
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use log::debug;
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

struct Ticker {
    reservation_id: Uuid,
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl Ticker {
    fn stop(self) {
        self.cancel_token.cancel();
        self.handle.abort();
    }
}

/// Owns at most one periodic countdown task.
#[derive(Clone)]
pub struct CountdownScheduler {
    ticker: Arc<Mutex<Option<Ticker>>>,
    tick_interval: Duration,
}

impl CountdownScheduler {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Ticker>> {
        match self.ticker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Starts calling `on_tick` once per interval, the first call one interval
    /// from now. Any previously armed task is stopped first. The task ends
    /// when `on_tick` breaks or the scheduler is disarmed.
    pub fn arm<F, Fut>(&self, reservation_id: Uuid, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let mut slot = self.slot();
        if let Some(previous) = slot.take() {
            debug!(
                "re-arming countdown: stopping ticker for {}",
                previous.reservation_id
            );
            previous.stop();
        }

        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if on_tick().await.is_break() {
                            break;
                        }
                    }
                }
            }
        });

        debug!("countdown armed for reservation {reservation_id}");
        *slot = Some(Ticker {
            reservation_id,
            handle,
            cancel_token,
        });
    }

    /// Stops the running task, if any.
    pub fn disarm(&self) {
        if let Some(ticker) = self.slot().take() {
            debug!("countdown disarmed for reservation {}", ticker.reservation_id);
            ticker.stop();
        }
    }

    /// Called from inside a tick that is about to break. Clears the slot
    /// without aborting the calling task, and only if it still belongs to
    /// `reservation_id`.
    pub fn retire(&self, reservation_id: Uuid) {
        let mut slot = self.slot();
        if slot
            .as_ref()
            .is_some_and(|ticker| ticker.reservation_id == reservation_id)
        {
            if let Some(ticker) = slot.take() {
                ticker.cancel_token.cancel();
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed_for().is_some()
    }

    /// Reservation of the live task. A task that has ended counts as unarmed
    /// even if it never cleared its slot.
    pub fn armed_for(&self) -> Option<Uuid> {
        self.slot()
            .as_ref()
            .filter(|ticker| !ticker.handle.is_finished())
            .map(|ticker| ticker.reservation_id)
    }
}
