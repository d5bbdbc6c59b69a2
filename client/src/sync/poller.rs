//! Balance polling.
//!
//! While a session is authenticated the [`BalancePoller`] refreshes the
//! cached wallet every interval. Lifecycle:
//!
//! ```text
//! Stopped --start / session signed in--> Running
//! Running --stop / session ended / auth error / drop--> Stopped
//! ```
//!
//! The running timer is owned by a [`PollHandle`]; there is at most one per
//! poller. Each tick spawns a fetch unless the previous fetch of the same run
//! is still outstanding. Stopping aborts the timer only: a fetch already in
//! flight finishes, and its result is dropped by the session unless the
//! session it started under is still signed in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::service::BalanceSource;
use crate::services::session::SessionContext;

/// Identity and task of one running timer.
#[derive(Debug)]
pub struct PollHandle {
    id: Uuid,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    fn cancel(self) {
        self.task.abort();
    }
}

struct Shared {
    source: Arc<dyn BalanceSource>,
    session: Arc<SessionContext>,
    interval: Duration,
    handle: Mutex<Option<PollHandle>>,
}

impl Shared {
    fn is_running(&self) -> bool {
        self.handle.lock().as_ref().is_some_and(|h| !h.task.is_finished())
    }

    fn start(self: &Arc<Self>) -> bool {
        let mut slot = self.handle.lock();
        if let Some(existing) = slot.as_ref() {
            if !existing.task.is_finished() {
                warn!(poll_id = %existing.id, "Balance polling already running, ignoring start");
                return false;
            }
        }

        let id = Uuid::new_v4();
        let shared = Arc::clone(self);
        let period = self.interval;
        let task = tokio::spawn(async move {
            let fetching = Arc::new(AtomicBool::new(false));
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                shared.tick(id, &fetching);
            }
        });

        info!(poll_id = %id, interval_ms = period.as_millis(), "Balance polling started");
        *slot = Some(PollHandle { id, task });
        true
    }

    /// Stop the timer. With `only`, stop only if that run is still current.
    fn stop(&self, only: Option<Uuid>) -> bool {
        let handle = {
            let mut slot = self.handle.lock();
            match (slot.as_ref(), only) {
                (None, _) => return false,
                (Some(current), Some(id)) if current.id != id => return false,
                _ => slot.take(),
            }
        };
        match handle {
            Some(handle) => {
                info!(poll_id = %handle.id, "Balance polling stopped");
                handle.cancel();
                true
            }
            None => false,
        }
    }

    fn sync_with_session(self: &Arc<Self>, authenticated: bool) {
        match (authenticated, self.is_running()) {
            (true, false) => {
                self.start();
            }
            (false, true) => {
                self.stop(None);
            }
            _ => {}
        }
    }

    /// `fetching` is owned by run `id`, so a fetch hanging in an old run
    /// never holds back a newer one.
    fn tick(self: &Arc<Self>, id: Uuid, fetching: &Arc<AtomicBool>) {
        if fetching.swap(true, Ordering::AcqRel) {
            debug!(poll_id = %id, "Previous balance fetch still in flight, skipping tick");
            return;
        }

        let shared = Arc::clone(self);
        let fetching = Arc::clone(fetching);
        let generation = self.session.generation();
        tokio::spawn(async move {
            let result = shared.source.fetch_balance().await;
            fetching.store(false, Ordering::Release);

            match result {
                Ok(wallet) => {
                    let balance = wallet.balance;
                    if shared.session.set_wallet(generation, wallet) {
                        debug!(poll_id = %id, balance, "Balance refreshed");
                    } else {
                        debug!(poll_id = %id, "Session changed before balance arrived, discarding");
                    }
                }
                Err(e) if e.is_auth() => {
                    warn!(poll_id = %id, error = %e, "Balance fetch unauthorized, stopping polling");
                    shared.stop(Some(id));
                }
                Err(e) => {
                    debug!(poll_id = %id, error = %e, "Balance fetch failed, skipping tick");
                }
            }
        });
    }
}

/// Keeps [`SessionContext::wallet`] fresh while signed in.
pub struct BalancePoller {
    shared: Arc<Shared>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl BalancePoller {
    pub fn new(source: Arc<dyn BalanceSource>, session: Arc<SessionContext>, interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                session,
                interval,
                handle: Mutex::new(None),
            }),
            supervisor: Mutex::new(None),
        }
    }

    /// Stopped -> Running. A second start while running logs a warning and
    /// returns `false`.
    pub fn start(&self) -> bool {
        self.shared.start()
    }

    /// Running -> Stopped. Returns whether a timer was running.
    pub fn stop(&self) -> bool {
        self.shared.stop(None)
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    /// Id of the running timer.
    pub fn poll_id(&self) -> Option<Uuid> {
        self.shared.handle.lock().as_ref().map(PollHandle::id)
    }

    /// Start or stop to match the session's authenticated flag.
    pub fn sync_with_session(&self, authenticated: bool) {
        self.shared.sync_with_session(authenticated);
    }

    /// Follow the session in the background until the poller is dropped.
    pub fn supervise(&self) {
        let mut authenticated = self.shared.session.subscribe();
        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            let current = *authenticated.borrow_and_update();
            shared.sync_with_session(current);
            while authenticated.changed().await.is_ok() {
                let current = *authenticated.borrow_and_update();
                shared.sync_with_session(current);
            }
        });
        if let Some(previous) = self.supervisor.lock().replace(task) {
            previous.abort();
        }
    }
}

impl Drop for BalancePoller {
    fn drop(&mut self) {
        if let Some(supervisor) = self.supervisor.lock().take() {
            supervisor.abort();
        }
        self.shared.stop(None);
    }
}
