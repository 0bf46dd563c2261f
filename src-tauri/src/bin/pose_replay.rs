//! Runs the form tracker over a recorded session of pose estimates.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tokio::time::Duration;

use rehab_coach_lib::{
    analysis::{AnalysisController, FrameSource},
    db::Database,
    pose::ReplaySource,
    tracker::{ExerciseKind, TrackerConfig},
};

#[derive(Parser, Debug)]
#[command(name = "pose-replay", about = "Score exercise form from a JSON-lines pose recording")]
struct Args {
    /// Recording with one PoseNet-style estimate per line
    #[arg(value_name = "PATH")]
    recording: PathBuf,
    #[arg(long, default_value = "arm-raise")]
    exercise: ExerciseKind,
    #[arg(long, default_value = "rehab-coach.sqlite3")]
    db: PathBuf,
    /// Pace playback at this many milliseconds per frame (default: as fast as possible)
    #[arg(long)]
    frame_interval_ms: Option<u64>,
    #[arg(long, default_value_t = 0.2)]
    min_pose_confidence: f64,
    /// Print every scored frame
    #[arg(long, short = 'v')]
    verbose: bool,
    /// Print the recorded session as JSON when done
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    rehab_coach_lib::init_logging();
    let args = Args::parse();

    let source = ReplaySource::open(
        &args.recording,
        args.frame_interval_ms.map(Duration::from_millis),
    )
    .await?;

    let db = Database::new(args.db.clone())?;
    let controller = AnalysisController::new(db, args.exercise, args.verbose);
    let recovered = controller.recover_interrupted().await?;
    if recovered > 0 {
        info!("Marked {recovered} stale analyses as interrupted");
    }

    let config = TrackerConfig {
        min_pose_confidence: args.min_pose_confidence,
        ..TrackerConfig::default()
    };
    controller
        .start(args.exercise, FrameSource::Replay(source), config)
        .await
        .context("failed to start analysis")?;

    let session = controller
        .wait_for_completion()
        .await?
        .context("analysis was not running")?;
    let snapshot = controller.snapshot();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("exercise:       {}", session.exercise);
        println!("reps:           {}", snapshot.rep_count);
        println!(
            "frames:         {} scored, {} skipped",
            session.frames_processed, session.frames_skipped
        );
        match session.average_form_score {
            Some(score) => println!("avg form score: {score:.1}%"),
            None => println!("avg form score: -"),
        }
        println!("last feedback:  {}", snapshot.reading.feedback.message());
    }

    Ok(())
}
