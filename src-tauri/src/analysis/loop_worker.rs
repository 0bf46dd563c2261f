use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::{
    pose::PoseEstimate,
    tracker::{ExerciseKind, FormTracker, FrameOutcome, RepCounts},
};

use super::AnalysisSnapshot;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Totals handed back to the controller when the loop exits.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSummary {
    pub rep_counts: RepCounts,
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub average_form_score: Option<f64>,
}

/// Consumes pose estimates until cancelled or until every producer is gone.
///
/// Each estimate is processed to completion before the next one is awaited,
/// so the tracker state is only ever touched from this task.
pub async fn analysis_loop(
    mut tracker: FormTracker,
    mut frames: mpsc::Receiver<PoseEstimate>,
    exercise_rx: watch::Receiver<ExerciseKind>,
    snapshot_tx: Arc<watch::Sender<AnalysisSnapshot>>,
    cancel_token: CancellationToken,
    verbose: bool,
) -> LoopSummary {
    let mut frames_processed: u64 = 0;
    let mut frames_skipped: u64 = 0;
    let mut score_total: u64 = 0;

    loop {
        let pose = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("analysis loop shutting down");
                break;
            }
            frame = frames.recv() => match frame {
                Some(pose) => pose,
                None => {
                    log_info!("frame source closed after {} frames", frames_processed + frames_skipped);
                    break;
                }
            },
        };

        let exercise = *exercise_rx.borrow();
        match tracker.process(exercise, &pose) {
            FrameOutcome::Scored(reading) => {
                frames_processed += 1;
                score_total += u64::from(reading.score);
                let rep_counts = tracker.rep_counts();

                if verbose {
                    log_info!(
                        "{} angle={:.1} score={} reps={}",
                        exercise,
                        reading.angle.unwrap_or_default(),
                        reading.score,
                        rep_counts.get(exercise)
                    );
                }

                snapshot_tx.send_modify(|snapshot| {
                    snapshot.apply_reading(reading, rep_counts);
                    snapshot.frames_processed = frames_processed;
                    snapshot.frames_skipped = frames_skipped;
                });
            }
            skipped => {
                frames_skipped += 1;
                if verbose {
                    log_warn!("skipping frame (score {:.2}): {:?}", pose.score, skipped);
                }
                // Keep the counter current without waking subscribers.
                snapshot_tx.send_if_modified(|snapshot| {
                    snapshot.frames_skipped = frames_skipped;
                    false
                });
            }
        }

        tokio::task::yield_now().await;
    }

    LoopSummary {
        rep_counts: tracker.rep_counts(),
        frames_processed,
        frames_skipped,
        average_form_score: (frames_processed > 0)
            .then(|| score_total as f64 / frames_processed as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{BodyPart, Keypoint};
    use crate::tracker::TrackerConfig;

    fn arm_pose(degrees: f64, score: f64) -> PoseEstimate {
        let theta = degrees.to_radians();
        PoseEstimate::new(
            score,
            vec![
                Keypoint::new(BodyPart::LeftShoulder, 1.0, 0.0, 0.9),
                Keypoint::new(BodyPart::LeftElbow, 0.0, 0.0, 0.9),
                Keypoint::new(BodyPart::LeftWrist, theta.cos(), theta.sin(), 0.9),
            ],
        )
    }

    #[tokio::test]
    async fn test_loop_processes_until_channel_closes() {
        let (frame_tx, frame_rx) = mpsc::channel(16);
        let (_exercise_tx, exercise_rx) = watch::channel(ExerciseKind::ArmRaise);
        let (snapshot_tx, mut snapshot_rx) =
            watch::channel(AnalysisSnapshot::idle(ExerciseKind::ArmRaise));
        let snapshot_tx = Arc::new(snapshot_tx);

        for (angle, score) in [(170.0, 0.9), (170.0, 0.1), (170.0, 0.9), (55.0, 0.9)] {
            frame_tx.send(arm_pose(angle, score)).await.unwrap();
        }
        drop(frame_tx);

        let summary = analysis_loop(
            FormTracker::new(TrackerConfig::default()),
            frame_rx,
            exercise_rx,
            snapshot_tx,
            CancellationToken::new(),
            false,
        )
        .await;

        assert_eq!(summary.frames_processed, 3);
        assert_eq!(summary.frames_skipped, 1);
        assert_eq!(summary.rep_counts.arm_raise, 1);
        assert_eq!(summary.average_form_score, Some(80.0));

        let snapshot = snapshot_rx.borrow_and_update().clone();
        assert_eq!(snapshot.rep_count, 1);
        assert_eq!(snapshot.reading.score, 40);
        assert_eq!(snapshot.frames_skipped, 1);
    }

    #[tokio::test]
    async fn test_loop_exits_on_cancel() {
        let (_frame_tx, frame_rx) = mpsc::channel::<PoseEstimate>(4);
        let (_exercise_tx, exercise_rx) = watch::channel(ExerciseKind::LegLift);
        let (snapshot_tx, _snapshot_rx) =
            watch::channel(AnalysisSnapshot::idle(ExerciseKind::LegLift));
        let cancel_token = CancellationToken::new();

        let handle = tokio::spawn(analysis_loop(
            FormTracker::new(TrackerConfig::default()),
            frame_rx,
            exercise_rx,
            Arc::new(snapshot_tx),
            cancel_token.clone(),
            false,
        ));

        cancel_token.cancel();
        let summary = handle.await.unwrap();
        assert_eq!(summary.frames_processed, 0);
        assert_eq!(summary.average_form_score, None);
    }
}
