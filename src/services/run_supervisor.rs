//! Latest-request-wins run supervision.
//!
//! Every submission to a [`RunSupervisor`] gets a new generation number.
//! A run whose generation is no longer the newest is stale: its progress
//! sink stops the pipeline at the next tick, and a result that finishes
//! anyway is discarded instead of delivered.

use crush_dither::{DitherError, Engine, Palette, ProcessConfig, RasterBuffer};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use utoipa::ToSchema;

use crate::error::ApiError;

/// Progress events broadcast to subscribers of a session
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A run advanced
    Progress { generation: u64, fraction: f32 },
    /// A run finished and its result was delivered
    Completed { generation: u64 },
    /// A run was replaced by a newer one
    Superseded { generation: u64 },
}

impl ProgressEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            ProgressEvent::Progress { .. } => "progress",
            ProgressEvent::Completed { .. } => "completed",
            ProgressEvent::Superseded { .. } => "superseded",
        }
    }
}

/// How a submitted run ended
#[derive(Debug)]
pub enum RunOutcome {
    Completed(RasterBuffer),
    Superseded,
}

/// Runs quantizations for one session, newest request wins
pub struct RunSupervisor {
    engine: Arc<Engine>,
    generation: Arc<AtomicU64>,
    events: broadcast::Sender<ProgressEvent>,
}

impl RunSupervisor {
    pub fn new(engine: Arc<Engine>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            engine,
            generation: Arc::new(AtomicU64::new(0)),
            events,
        }
    }

    /// Subscribe to progress events
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.events.subscribe()
    }

    /// Generation of the most recent submission
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Make every in-flight run stale without starting a new one
    pub fn supersede(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Run a quantization on the blocking pool.
    ///
    /// Submitting supersedes whatever this supervisor was running before.
    pub async fn submit(
        &self,
        buffer: RasterBuffer,
        config: ProcessConfig,
        custom: Option<Palette>,
    ) -> Result<RunOutcome, ApiError> {
        let generation = self.supersede();
        let engine = self.engine.clone();
        let counter = self.generation.clone();
        let events = self.events.clone();

        tracing::debug!(
            generation,
            width = buffer.width(),
            height = buffer.height(),
            "Submitting run"
        );

        let result = tokio::task::spawn_blocking(move || {
            engine.process_with_progress(buffer, &config, custom.as_ref(), |fraction| {
                if counter.load(Ordering::SeqCst) != generation {
                    return ControlFlow::Break(());
                }
                let _ = events.send(ProgressEvent::Progress {
                    generation,
                    fraction,
                });
                ControlFlow::Continue(())
            })
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Run task failed: {e}")))?;

        let stale = self.current_generation() != generation;
        match result {
            Ok(buffer) if !stale => {
                let _ = self.events.send(ProgressEvent::Completed { generation });
                Ok(RunOutcome::Completed(buffer))
            }
            Ok(_) | Err(DitherError::Quantize(crush_dither::QuantizeError::Cancelled)) => {
                tracing::debug!(generation, "Run superseded");
                let _ = self.events.send(ProgressEvent::Superseded { generation });
                Ok(RunOutcome::Superseded)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// No run in flight and nobody subscribed.
///
/// Runs hold a clone of the supervisor while they execute, so a pool-only
/// reference means nothing is running.
fn is_idle(supervisor: &Arc<RunSupervisor>) -> bool {
    Arc::strong_count(supervisor) == 1 && supervisor.events.receiver_count() == 0
}

/// Supervisors keyed by session
pub struct SupervisorPool {
    engine: Arc<Engine>,
    sessions: RwLock<HashMap<String, Arc<RunSupervisor>>>,
}

impl SupervisorPool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The supervisor for `session`, created on first use.
    ///
    /// Creating a session first drops every idle one, so the pool only holds
    /// sessions that are running, watched, or were used most recently.
    pub async fn get_or_create(&self, session: &str) -> Arc<RunSupervisor> {
        if let Some(supervisor) = self.sessions.read().await.get(session) {
            return supervisor.clone();
        }
        let mut sessions = self.sessions.write().await;
        if let Some(supervisor) = sessions.get(session) {
            return supervisor.clone();
        }

        let before = sessions.len();
        sessions.retain(|_, supervisor| !is_idle(supervisor));
        if sessions.len() < before {
            tracing::debug!(dropped = before - sessions.len(), "Dropped idle sessions");
        }

        let supervisor = Arc::new(RunSupervisor::new(self.engine.clone()));
        sessions.insert(session.to_string(), supervisor.clone());
        supervisor
    }

    /// The supervisor for `session`, if one exists
    pub async fn get(&self, session: &str) -> Option<Arc<RunSupervisor>> {
        self.sessions.read().await.get(session).cloned()
    }

    /// Number of known sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crush_dither::DitherKind;

    fn bw() -> ProcessConfig {
        ProcessConfig::default()
            .palette("bw")
            .primary(DitherKind::Floyd)
            .secondary(DitherKind::None)
            .mix(0.0)
    }

    #[tokio::test]
    async fn test_single_run_completes() {
        let supervisor = RunSupervisor::new(Arc::new(Engine::new()));
        let mut rx = supervisor.subscribe();

        let outcome = supervisor
            .submit(RasterBuffer::filled(4, 4, [250, 250, 250]), bw(), None)
            .await
            .unwrap();

        match outcome {
            RunOutcome::Completed(buffer) => {
                assert!(buffer.data().chunks(4).all(|px| px[..3] == [255, 255, 255]))
            }
            RunOutcome::Superseded => panic!("Expected completion"),
        }

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        assert_eq!(last, Some(ProgressEvent::Completed { generation: 1 }));
    }

    #[tokio::test]
    async fn test_supersede_discards_result() {
        let supervisor = Arc::new(RunSupervisor::new(Arc::new(Engine::new())));
        let mut rx = supervisor.subscribe();

        let running = {
            let supervisor = supervisor.clone();
            tokio::spawn(async move {
                supervisor
                    .submit(RasterBuffer::filled(1024, 1024, [90, 90, 90]), bw(), None)
                    .await
            })
        };

        // Wait for the first report; the rest of the image is still ahead.
        loop {
            match rx.recv().await.unwrap() {
                ProgressEvent::Progress { generation: 1, fraction } => {
                    assert!(fraction < 0.5, "first report came late: {fraction}");
                    break;
                }
                other => panic!("Unexpected event {other:?}"),
            }
        }
        assert_eq!(supervisor.supersede(), 2);

        let outcome = running.await.unwrap().unwrap();
        assert!(matches!(outcome, RunOutcome::Superseded));
    }

    #[tokio::test]
    async fn test_pool_reuses_sessions() {
        let pool = SupervisorPool::new(Arc::new(Engine::new()));
        let a = pool.get_or_create("alpha").await;
        let b = pool.get_or_create("alpha").await;
        let c = pool.get_or_create("beta").await;

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(pool.len().await, 2);
        assert!(pool.get("gamma").await.is_none());
    }

    #[tokio::test]
    async fn test_pool_drops_idle_sessions() {
        let pool = SupervisorPool::new(Arc::new(Engine::new()));

        // Watched: kept
        let watcher = pool.get_or_create("watched").await.subscribe();
        // Held by a caller, as during a run: kept
        let busy = pool.get_or_create("busy").await;
        // Neither: dropped when the next session is created
        drop(pool.get_or_create("idle").await);

        pool.get_or_create("fresh").await;

        assert!(pool.get("watched").await.is_some());
        assert!(pool.get("busy").await.is_some());
        assert!(pool.get("idle").await.is_none());
        assert!(pool.get("fresh").await.is_some());
        assert_eq!(pool.len().await, 3);

        drop((watcher, busy));
        for i in 0..50 {
            pool.get_or_create(&format!("client-{i}")).await;
        }
        assert_eq!(pool.len().await, 1, "idle sessions should not accumulate");
    }
}
