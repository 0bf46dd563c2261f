use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use log::{error, info, warn};
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        watch, Mutex,
    },
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    db::{AnalysisSession, AnalysisStatus, Database},
    pose::{PoseEstimate, ReplaySource},
    tracker::{ExerciseKind, FormTracker, TrackerConfig},
};

use super::{
    loop_worker::{analysis_loop, LoopSummary},
    AnalysisSnapshot, TrackerStatus,
};

/// Estimates buffered between producer and loop before new ones are dropped.
const FRAME_BUFFER: usize = 8;

/// Where an analysis run gets its frames.
pub enum FrameSource {
    /// Estimates are pushed through `submit_pose`, e.g. from the webview.
    Live,
    /// Estimates are read back from a recording; the run ends with it.
    Replay(ReplaySource),
}

struct ActiveRun {
    session: AnalysisSession,
    frame_tx: Option<mpsc::Sender<PoseEstimate>>,
    cancel_token: CancellationToken,
    handle: JoinHandle<LoopSummary>,
    producer: Option<JoinHandle<usize>>,
}

/// Owns the Start/Stop lifecycle of the frame loop.
#[derive(Clone)]
pub struct AnalysisController {
    run: Arc<Mutex<Option<ActiveRun>>>,
    exercise_tx: Arc<watch::Sender<ExerciseKind>>,
    snapshot_tx: Arc<watch::Sender<AnalysisSnapshot>>,
    db: Database,
    verbose: bool,
}

impl AnalysisController {
    pub fn new(db: Database, exercise: ExerciseKind, verbose: bool) -> Self {
        let (exercise_tx, _) = watch::channel(exercise);
        let (snapshot_tx, _) = watch::channel(AnalysisSnapshot::idle(exercise));
        Self {
            run: Arc::new(Mutex::new(None)),
            exercise_tx: Arc::new(exercise_tx),
            snapshot_tx: Arc::new(snapshot_tx),
            db,
            verbose,
        }
    }

    pub fn snapshot(&self) -> AnalysisSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalysisSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn selected_exercise(&self) -> ExerciseKind {
        *self.exercise_tx.borrow()
    }

    /// Switches the tracked exercise. Applies from the next frame; counts are
    /// kept.
    pub fn select_exercise(&self, exercise: ExerciseKind) {
        self.exercise_tx.send_replace(exercise);
        self.snapshot_tx
            .send_modify(|snapshot| snapshot.select_exercise(exercise));
    }

    pub async fn is_running(&self) -> bool {
        self.run.lock().await.is_some()
    }

    /// Starts a fresh run. Every per-exercise session starts from zero.
    pub async fn start(
        &self,
        exercise: ExerciseKind,
        source: FrameSource,
        config: TrackerConfig,
    ) -> Result<AnalysisSnapshot> {
        config.validate().context("invalid tracker configuration")?;

        let mut run = self.run.lock().await;
        if run.is_some() {
            bail!("analysis already active");
        }

        let started_at = Utc::now();
        let session = AnalysisSession::started(Uuid::new_v4().to_string(), exercise, started_at);
        self.db
            .insert_analysis_session(&session)
            .await
            .context("failed to record analysis start")?;

        self.exercise_tx.send_replace(exercise);
        self.snapshot_tx.send_replace(AnalysisSnapshot::started(
            session.id.clone(),
            exercise,
            started_at,
        ));

        let (frame_tx, frame_rx) = mpsc::channel(FRAME_BUFFER);
        let cancel_token = CancellationToken::new();

        let handle = tokio::spawn(analysis_loop(
            FormTracker::new(config),
            frame_rx,
            self.exercise_tx.subscribe(),
            self.snapshot_tx.clone(),
            cancel_token.clone(),
            self.verbose,
        ));

        let (frame_tx, producer) = match source {
            FrameSource::Live => (Some(frame_tx), None),
            FrameSource::Replay(replay) => {
                info!(
                    "Replaying {} frames from {}",
                    replay.len(),
                    replay.path().display()
                );
                (None, Some(replay.spawn(frame_tx, cancel_token.clone())))
            }
        };

        info!("Analysis {} started for {}", session.id, exercise);

        *run = Some(ActiveRun {
            session,
            frame_tx,
            cancel_token,
            handle,
            producer,
        });

        Ok(self.snapshot())
    }

    /// Hands one estimate to the running loop. Returns `false` when the frame
    /// was dropped because the loop is behind.
    pub async fn submit_pose(&self, pose: PoseEstimate) -> Result<bool> {
        let run = self.run.lock().await;
        let frame_tx = run
            .as_ref()
            .and_then(|run| run.frame_tx.as_ref())
            .ok_or_else(|| anyhow!("no live analysis is running"))?;

        match frame_tx.try_send(pose) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => Ok(false),
            Err(TrySendError::Closed(_)) => Err(anyhow!("analysis loop has exited")),
        }
    }

    /// Stops the running loop at its next frame boundary. Counts stay visible
    /// until the next `start`. Returns `None` if nothing was running.
    ///
    /// The run lock is held until the run is recorded, so a concurrent
    /// `start` always sees the final snapshot of this run.
    pub async fn stop(&self) -> Result<Option<AnalysisSession>> {
        let mut guard = self.run.lock().await;
        let Some(run) = guard.take() else {
            return Ok(None);
        };
        run.cancel_token.cancel();
        self.finish_run(run).await.map(Some)
    }

    /// Waits for a replay run to drain its recording, then records it. Other
    /// controller calls wait until it returns.
    pub async fn wait_for_completion(&self) -> Result<Option<AnalysisSession>> {
        let mut guard = self.run.lock().await;
        let Some(run) = guard.take() else {
            return Ok(None);
        };
        self.finish_run(run).await.map(Some)
    }

    async fn finish_run(&self, run: ActiveRun) -> Result<AnalysisSession> {
        let ActiveRun {
            mut session,
            frame_tx,
            cancel_token,
            handle,
            producer,
        } = run;
        drop(frame_tx);

        let summary = handle.await.context("analysis loop task failed to join")?;
        cancel_token.cancel();
        if let Some(producer) = producer {
            if let Err(err) = producer.await {
                warn!("frame producer failed to join: {err}");
            }
        }

        let stopped_at = Utc::now();
        session.status = AnalysisStatus::Completed;
        session.stopped_at = Some(stopped_at);
        session.arm_raise_reps = summary.rep_counts.arm_raise;
        session.leg_lift_reps = summary.rep_counts.leg_lift;
        session.frames_processed = summary.frames_processed;
        session.frames_skipped = summary.frames_skipped;
        session.average_form_score = summary.average_form_score;
        session.updated_at = stopped_at;

        self.snapshot_tx.send_modify(|snapshot| {
            snapshot.status = TrackerStatus::Stopped;
            snapshot.rep_counts = summary.rep_counts;
            snapshot.rep_count = summary.rep_counts.get(snapshot.exercise);
            snapshot.frames_processed = summary.frames_processed;
            snapshot.frames_skipped = summary.frames_skipped;
        });

        if let Err(err) = self.db.finalize_analysis_session(&session).await {
            error!("Failed to record analysis {}: {err:?}", session.id);
        }

        info!(
            "Analysis {} stopped: {} reps over {} frames ({} skipped)",
            session.id,
            session.total_reps(),
            session.frames_processed,
            session.frames_skipped
        );

        Ok(session)
    }

    /// Marks runs left `Running` by a previous process as interrupted.
    pub async fn recover_interrupted(&self) -> Result<usize> {
        let stale = self.db.get_incomplete_analysis_sessions().await?;
        let now = Utc::now();
        for session in &stale {
            warn!(
                "Recovered incomplete analysis {}; marking as Interrupted",
                session.id
            );
            self.db.mark_analysis_interrupted(&session.id, now).await?;
        }
        Ok(stale.len())
    }
}
