#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod loop_worker;
pub mod state;

pub use controller::{AnalysisController, FrameSource};
pub use loop_worker::LoopSummary;
pub use state::{AnalysisSnapshot, TrackerStatus};
