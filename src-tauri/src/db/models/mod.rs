pub mod analysis_session;
pub mod exercise_log;
pub mod medication;

pub use analysis_session::{AnalysisSession, AnalysisStatus};
pub use exercise_log::{ExerciseLog, ExerciseLogInput};
pub use medication::{Medication, MedicationInput};
