use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
    task::JoinHandle,
    time::{self, Duration, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use super::PoseEstimate;

/// Recorded estimator output, one JSON `PoseEstimate` per line.
///
/// The whole recording is parsed up front so that an unreadable file fails
/// `open` instead of surfacing halfway through an analysis run.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    path: PathBuf,
    frames: Vec<PoseEstimate>,
    frame_interval: Option<Duration>,
}

impl ReplaySource {
    pub async fn open(path: impl AsRef<Path>, frame_interval: Option<Duration>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .await
            .with_context(|| format!("failed to open pose recording {}", path.display()))?;

        let mut lines = BufReader::new(file).lines();
        let mut frames = Vec::new();
        let mut line_no = 0usize;
        while let Some(line) = lines
            .next_line()
            .await
            .with_context(|| format!("failed to read pose recording {}", path.display()))?
        {
            line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<PoseEstimate>(trimmed) {
                Ok(frame) => frames.push(frame),
                Err(err) => warn!("{}:{line_no}: skipping malformed pose: {err}", path.display()),
            }
        }

        info!("Loaded {} frames from {}", frames.len(), path.display());

        Ok(Self {
            path,
            frames,
            frame_interval,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Feeds every frame into `tx`, paced by the frame interval if one is set.
    /// Resolves to the number of frames delivered. Dropping the sender when
    /// done lets the consumer observe end-of-stream.
    pub fn spawn(
        self,
        tx: mpsc::Sender<PoseEstimate>,
        cancel_token: CancellationToken,
    ) -> JoinHandle<usize> {
        tokio::spawn(async move {
            let mut ticker = self.frame_interval.map(|interval| {
                let mut ticker = time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                ticker
            });

            let mut delivered = 0usize;
            for frame in self.frames {
                if let Some(ticker) = ticker.as_mut() {
                    tokio::select! {
                        _ = ticker.tick() => {}
                        _ = cancel_token.cancelled() => break,
                    }
                }

                tokio::select! {
                    sent = tx.send(frame) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                    _ = cancel_token.cancelled() => break,
                }
                delivered += 1;
            }
            delivered
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_recording(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rehab-coach-replay-{}.jsonl", Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_open_missing_file_is_setup_error() {
        let path = std::env::temp_dir().join(format!("missing-{}.jsonl", Uuid::new_v4()));
        let err = ReplaySource::open(&path, None).await.unwrap_err();
        assert!(err.to_string().contains("failed to open pose recording"));
    }

    #[tokio::test]
    async fn test_malformed_and_blank_lines_are_skipped() {
        let path = temp_recording(
            "{\"score\": 0.9, \"keypoints\": []}\n\nnot json\n{\"score\": 0.1}\n",
        );
        let source = ReplaySource::open(&path, None).await.unwrap();
        assert_eq!(source.len(), 2);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_spawn_delivers_all_frames_then_closes() {
        let path = temp_recording("{\"score\": 0.9}\n{\"score\": 0.8}\n{\"score\": 0.7}\n");
        let source = ReplaySource::open(&path, None).await.unwrap();
        let (tx, mut rx) = mpsc::channel(8);
        let handle = source.spawn(tx, CancellationToken::new());

        let mut received = Vec::new();
        while let Some(frame) = rx.recv().await {
            received.push(frame.score);
        }
        assert_eq!(received, vec![0.9, 0.8, 0.7]);
        assert_eq!(handle.await.unwrap(), 3);
        let _ = std::fs::remove_file(path);
    }
}
