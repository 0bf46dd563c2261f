pub mod keypoint;
pub mod replay;

pub use keypoint::{BodyPart, Keypoint, PoseEstimate, Position};
pub use replay::ReplaySource;
