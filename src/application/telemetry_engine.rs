// Live telemetry engine - Periodic frame generation for the dashboard
use crate::application::metric_source::MetricSource;
use crate::domain::telemetry::{OverrideField, OverrideInputs, TelemetryFrame, UnitSnapshot};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Idle,
    Running,
    Stopped,
}

struct EngineInner {
    overrides: OverrideInputs,
    stopped: bool,
}

/// State shared between the engine handle and its timer task
struct EngineShared {
    unit_count: NonZeroUsize,
    source: Arc<dyn MetricSource>,
    inner: Mutex<EngineInner>,
    frames: watch::Sender<Arc<TelemetryFrame>>,
    state: watch::Sender<EngineState>,
}

impl EngineShared {
    fn lock(&self) -> MutexGuard<'_, EngineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builds and publishes the next frame. Holds the lock for the whole
    /// tick so an override edit or a stop never lands mid-frame.
    fn tick(&self) -> Option<Arc<TelemetryFrame>> {
        let inner = self.lock();
        if inner.stopped {
            return None;
        }

        let units: Vec<UnitSnapshot> = (0..self.unit_count.get())
            .map(|_| UnitSnapshot::sample(|range| self.source.sample(range), &inner.overrides))
            .collect();

        let sequence = self.frames.borrow().sequence + 1;
        let frame = Arc::new(TelemetryFrame::new(sequence, units));
        self.frames.send_replace(Arc::clone(&frame));

        tracing::debug!(sequence, units = self.unit_count.get(), "Generated telemetry frame");
        Some(frame)
    }
}

/// Generates one synthetic frame per tick for a fixed number of units.
///
/// The engine owns its timer task: `stop` (or dropping the engine) cancels
/// it, and a stopped engine never produces another frame.
pub struct LiveTelemetryEngine {
    shared: Arc<EngineShared>,
    cadence: Duration,
    task: Option<JoinHandle<()>>,
}

impl LiveTelemetryEngine {
    pub fn new(unit_count: NonZeroUsize, cadence: Duration, source: Arc<dyn MetricSource>) -> Self {
        let (frames, _) = watch::channel(Arc::new(TelemetryFrame::empty()));
        let (state, _) = watch::channel(EngineState::Idle);

        Self {
            shared: Arc::new(EngineShared {
                unit_count,
                source,
                inner: Mutex::new(EngineInner {
                    overrides: OverrideInputs::default(),
                    stopped: false,
                }),
                frames,
                state,
            }),
            cadence,
            task: None,
        }
    }

    pub fn unit_count(&self) -> NonZeroUsize {
        self.shared.unit_count
    }

    pub fn state(&self) -> EngineState {
        *self.shared.state.borrow()
    }

    /// Latest frame; empty until the first tick
    pub fn frame(&self) -> Arc<TelemetryFrame> {
        Arc::clone(&self.shared.frames.borrow())
    }

    pub fn overrides(&self) -> OverrideInputs {
        self.shared.lock().overrides.clone()
    }

    /// Replaces one override; frames already produced keep their old value.
    pub fn set_override(&self, field: OverrideField, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(field = %field, value = %value, "Override updated");
        self.shared.lock().overrides.set(field, value);
    }

    /// Generates a frame immediately. Returns `None` once stopped.
    pub fn tick(&self) -> Option<Arc<TelemetryFrame>> {
        self.shared.tick()
    }

    /// Spawns the periodic task. The first frame lands one cadence after start.
    ///
    /// Must be called from within a tokio runtime. Only an idle engine can
    /// be started.
    pub fn start(&mut self) {
        let state = self.state();
        if state != EngineState::Idle {
            tracing::warn!(?state, "Ignoring start of a telemetry engine that is not idle");
            return;
        }

        let shared = Arc::clone(&self.shared);
        let cadence = self.cadence;
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + cadence, cadence);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if shared.tick().is_none() {
                    break;
                }
            }
        }));

        self.shared.state.send_replace(EngineState::Running);
        tracing::info!(
            units = self.shared.unit_count.get(),
            cadence_ms = self.cadence.as_millis() as u64,
            "Telemetry engine started"
        );
    }

    /// Cancels the timer. Safe to call more than once.
    pub fn stop(&mut self) {
        self.shared.lock().stopped = true;

        if let Some(task) = self.task.take() {
            task.abort();
        }

        if self.state() != EngineState::Stopped {
            self.shared.state.send_replace(EngineState::Stopped);
            tracing::info!("Telemetry engine stopped");
        }
    }

    pub fn subscribe(&self) -> FrameSubscription {
        FrameSubscription {
            frames: self.shared.frames.subscribe(),
            state: self.shared.state.subscribe(),
        }
    }
}

impl Drop for LiveTelemetryEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Receives each new frame until the engine stops or is dropped
pub struct FrameSubscription {
    frames: watch::Receiver<Arc<TelemetryFrame>>,
    state: watch::Receiver<EngineState>,
}

impl FrameSubscription {
    /// Frame current at the time of the call, without waiting
    pub fn latest(&mut self) -> Arc<TelemetryFrame> {
        Arc::clone(&self.frames.borrow_and_update())
    }

    pub async fn next(&mut self) -> Option<Arc<TelemetryFrame>> {
        // Frames already published drain before a stop ends the stream.
        tokio::select! {
            biased;
            changed = self.frames.changed() => match changed {
                Ok(()) => Some(Arc::clone(&self.frames.borrow_and_update())),
                Err(_) => None,
            },
            _ = wait_until_stopped(&mut self.state) => None,
        }
    }
}

async fn wait_until_stopped(state: &mut watch::Receiver<EngineState>) {
    // A closed channel means the engine is gone, which counts as stopped.
    let _ = state.wait_for(|state| *state == EngineState::Stopped).await;
}
