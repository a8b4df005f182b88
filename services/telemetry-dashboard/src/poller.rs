//! Poll controller: the recurring fetch-then-render cycle
//!
//! Ticks fire on a fixed cadence and each tick's cycle runs as its own task,
//! so a slow request never delays the next one. Every cycle is numbered when
//! issued; an outcome is applied only if no later-issued cycle has already
//! been applied, so the display always reflects the newest request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::renderer::DisplayRenderer;
use crate::status::ConnectivityState;
use crate::telemetry_client::TelemetryClient;

/// Lifecycle of the polling schedule
#[derive(Debug, Default)]
struct PollLoopState {
    running: bool,
    schedule: Option<Schedule>,
}

#[derive(Debug)]
struct Schedule {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Everything a cycle needs, shared between the schedule and its cycles
#[derive(Debug)]
struct PollCycle {
    client: Arc<TelemetryClient>,
    renderer: DisplayRenderer,
    issued: AtomicU64,
    applied: Mutex<u64>,
}

impl PollCycle {
    async fn run(&self) {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = self.client.fetch_reading().await;

        if let Err(e) = &outcome {
            tracing::warn!("Error fetching sensor data (poll #{}): {}", seq, e);
        }

        let mut applied = self.applied.lock().await;
        if seq <= *applied {
            tracing::debug!(
                "Discarding poll #{}: poll #{} already applied",
                seq,
                *applied
            );
            return;
        }
        *applied = seq;

        match outcome {
            Ok(reading) => {
                tracing::debug!("Poll #{} rendered: {:?}", seq, reading);
                self.renderer.render(Some(&reading)).await;
            }
            Err(_) => self.renderer.show_status(ConnectivityState::Error).await,
        }
    }
}

/// Owns the polling schedule; callers may only start or stop it
#[derive(Debug)]
pub struct PollController {
    cycle: Arc<PollCycle>,
    interval: Duration,
    state: Mutex<PollLoopState>,
}

impl PollController {
    pub fn new(
        client: Arc<TelemetryClient>,
        renderer: DisplayRenderer,
        interval: Duration,
    ) -> Self {
        Self {
            cycle: Arc::new(PollCycle {
                client,
                renderer,
                issued: AtomicU64::new(0),
                applied: Mutex::new(0),
            }),
            interval,
            state: Mutex::new(PollLoopState::default()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.running
    }

    /// Start polling. A no-op if already running.
    ///
    /// The repeating schedule is armed first (next tick one interval from
    /// now), then one cycle runs immediately and is awaited.
    pub async fn start(&self) {
        {
            let mut state = self.state.lock().await;
            if state.running {
                tracing::debug!("Polling already running");
                return;
            }
            let cancel = CancellationToken::new();
            let handle = tokio::spawn(schedule_loop(
                Arc::clone(&self.cycle),
                self.interval,
                cancel.clone(),
            ));
            state.running = true;
            state.schedule = Some(Schedule { cancel, handle });
        }

        tracing::info!("Polling started (every {:?})", self.interval);
        self.cycle.run().await;
    }

    /// Stop future ticks. In-flight requests still complete and render.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if let Some(schedule) = state.schedule.take() {
            schedule.cancel.cancel();
            drop(schedule.handle);
            tracing::info!("Polling stopped");
        }
        state.running = false;
    }

    /// Run one cycle outside the schedule
    pub async fn poll_once(&self) {
        self.cycle.run().await;
    }
}

impl Drop for PollController {
    fn drop(&mut self) {
        // A schedule outliving its controller would poll forever
        if let Some(schedule) = self.state.get_mut().schedule.take() {
            schedule.cancel.cancel();
            tracing::debug!("Polling schedule cancelled on drop");
        }
    }
}

async fn schedule_loop(cycle: Arc<PollCycle>, period: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let cycle = Arc::clone(&cycle);
                tokio::spawn(async move { cycle.run().await });
            }
            _ = cancel.cancelled() => {
                tracing::debug!("Polling schedule cancelled");
                break;
            }
        }
    }
}
