//! Visibility-aware score polling.
//!
//! ```text
//!  ScorePoller (handle) ──Command──▶ control loop (single task)
//!                                      │ owns timer, generation, in-flight abort handle
//!                                      │ spawns one fetch at a time
//!        fetch task ──Completion{generation}──▶ control loop
//!                                      │ applies result only if generation is current
//!                                      ▼
//!                         watch::Sender<SnapshotView>  ──▶ display layer
//! ```
//!
//! Only the control loop mutates state, so no locks are involved. A newer
//! fetch aborts the older one; if the older result was already queued, its
//! stale generation discards it.

use futures_util::future::{AbortHandle, Abortable};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::error::FetchError;
use super::provider::ScoreProvider;
use crate::models::{DateKey, ScoreSnapshot, SnapshotView};

/// Fixed refresh cadence while the surface is visible.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollerState {
    NotStarted,
    Polling,
    Suspended,
    Stopped,
}

#[derive(Debug)]
enum Command {
    Start(DateKey),
    Stop,
    Visibility { hidden: bool },
}

struct Completion {
    generation: u64,
    result: Result<ScoreSnapshot, FetchError>,
}

/// Cheap, cloneable handle to a running poller.
///
/// All control methods are fire-and-forget; the control loop applies them in
/// the order they were issued.
#[derive(Clone)]
pub struct ScorePoller {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<SnapshotView>,
    state: watch::Receiver<PollerState>,
    date: watch::Receiver<DateKey>,
}

impl ScorePoller {
    /// Spawn the control loop. Nothing is fetched until [`start`](Self::start).
    pub fn spawn(provider: Arc<dyn ScoreProvider>, poll_interval: Duration) -> Self {
        let (control, handle) = ControlLoop::new(provider, poll_interval);
        tokio::spawn(control.run());
        handle
    }

    /// Fetch `date` now and every poll interval after. Restarts the schedule
    /// if already running.
    pub fn start(&self, date: DateKey) {
        self.send(Command::Start(date));
    }

    /// Cancel the schedule and abort any in-flight request. Terminal.
    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    pub fn on_visibility_change(&self, is_hidden: bool) {
        self.send(Command::Visibility { hidden: is_hidden });
    }

    /// Latest successful snapshot, or [`SnapshotView::Loading`] before the first.
    pub fn get_snapshot(&self) -> SnapshotView {
        self.snapshot.borrow().clone()
    }

    /// Receiver that wakes whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<SnapshotView> {
        self.snapshot.clone()
    }

    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    pub fn date(&self) -> DateKey {
        *self.date.borrow()
    }

    fn send(&self, cmd: Command) {
        // Control loop only exits after `stop()`, when further commands are moot.
        if let Err(e) = self.commands.send(cmd) {
            debug!("Poller already shut down, ignoring {:?}", e.0);
        }
    }
}

struct ControlLoop {
    provider: Arc<dyn ScoreProvider>,
    poll_interval: Duration,
    commands: mpsc::UnboundedReceiver<Command>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    snapshot: watch::Sender<SnapshotView>,
    state: watch::Sender<PollerState>,
    date: watch::Sender<DateKey>,
    timer: Option<Interval>,
    /// Generation of the most recently initiated fetch
    generation: u64,
    in_flight: Option<AbortHandle>,
    hidden: bool,
}

impl ControlLoop {
    fn new(provider: Arc<dyn ScoreProvider>, poll_interval: Duration) -> (Self, ScorePoller) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SnapshotView::Loading);
        let (state_tx, state_rx) = watch::channel(PollerState::NotStarted);
        let (date_tx, date_rx) = watch::channel(DateKey::Today);

        let control = ControlLoop {
            provider,
            poll_interval,
            commands: cmd_rx,
            completions: done_rx,
            completion_tx: done_tx,
            snapshot: snapshot_tx,
            state: state_tx,
            date: date_tx,
            timer: None,
            generation: 0,
            in_flight: None,
            hidden: false,
        };
        let handle = ScorePoller {
            commands: cmd_tx,
            snapshot: snapshot_rx,
            state: state_rx,
            date: date_rx,
        };
        (control, handle)
    }

    async fn run(mut self) {
        info!(
            "Score poller ready (provider={}, interval={:?})",
            self.provider.name(),
            self.poll_interval
        );

        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Stop) | None => {
                        self.shutdown();
                        break;
                    }
                    Some(Command::Start(date)) => self.on_start(date),
                    Some(Command::Visibility { hidden }) => self.on_visibility(hidden),
                },
                Some(done) = self.completions.recv() => self.on_completion(done),
                _ = next_tick(&mut self.timer) => {
                    debug!("Poll tick");
                    self.fetch();
                }
            }
        }
    }

    fn on_start(&mut self, date: DateKey) {
        info!("Polling scores for {}", date);
        let previous = self.date.send_replace(date);
        if previous != date {
            // Games from another day must not be shown under this date.
            self.snapshot.send_replace(SnapshotView::Loading);
        }
        self.timer = None;
        self.fetch();
        if self.hidden {
            self.set_state(PollerState::Suspended);
        } else {
            self.resume_timer();
            self.set_state(PollerState::Polling);
        }
    }

    fn on_visibility(&mut self, hidden: bool) {
        if hidden == self.hidden {
            return;
        }
        self.hidden = hidden;

        let state = *self.state.borrow();
        match (state, hidden) {
            (PollerState::Polling, true) => {
                // Leave any in-flight request alone; its result is still fresh.
                self.timer = None;
                self.set_state(PollerState::Suspended);
                debug!("Surface hidden, polling suspended");
            }
            (PollerState::Suspended, false) => {
                debug!("Surface visible, refreshing");
                self.fetch();
                self.resume_timer();
                self.set_state(PollerState::Polling);
            }
            _ => {}
        }
    }

    fn shutdown(&mut self) {
        self.timer = None;
        self.cancel_in_flight();
        // Anything still queued belongs to an older generation now.
        self.generation += 1;
        self.set_state(PollerState::Stopped);
        info!("Score poller stopped");
    }

    /// Issue a new request, superseding whatever is in flight.
    fn fetch(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        let generation = self.generation;

        let (abort_handle, registration) = AbortHandle::new_pair();
        self.in_flight = Some(abort_handle);

        let provider = Arc::clone(&self.provider);
        let date = *self.date.borrow();
        let tx = self.completion_tx.clone();

        tokio::spawn(async move {
            let result = match Abortable::new(provider.fetch_snapshot(date), registration).await {
                Ok(result) => result,
                Err(_aborted) => Err(FetchError::Cancelled),
            };
            // Receiver is gone once the poller shuts down.
            let _ = tx.send(Completion { generation, result });
        });
    }

    fn on_completion(&mut self, done: Completion) {
        if done.generation != self.generation {
            debug!(
                "Discarding stale fetch result (generation {} < {})",
                done.generation, self.generation
            );
            return;
        }
        self.in_flight = None;

        match done.result {
            Ok(snapshot) => {
                info!(
                    "Score snapshot updated: {} games ({} live, {} final, {} upcoming)",
                    snapshot.game_count(),
                    snapshot.live.len(),
                    snapshot.r#final.len(),
                    snapshot.upcoming.len()
                );
                self.snapshot
                    .send_replace(SnapshotView::Ready(Arc::new(snapshot)));
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                warn!("Score fetch failed, keeping previous snapshot: {}", e);
            }
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            debug!("Cancelled in-flight score fetch");
        }
    }

    fn resume_timer(&mut self) {
        // The immediate fetch was just issued; first tick is one period out.
        let mut timer =
            tokio::time::interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.timer = Some(timer);
    }

    fn set_state(&self, state: PollerState) {
        self.state.send_replace(state);
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending().await,
    }
}
