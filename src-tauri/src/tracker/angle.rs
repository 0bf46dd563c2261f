//! Interior joint angle from three landmarks.

use crate::pose::Position;

/// Angle at `joint` between the rays joint→proximal and joint→distal, in
/// degrees, folded into [0, 180].
///
/// Callers must not pass placeholders for missing landmarks; skip the frame
/// instead.
pub fn joint_angle(proximal: Position, joint: Position, distal: Position) -> f64 {
    let radians = (distal.y - joint.y).atan2(distal.x - joint.x)
        - (proximal.y - joint.y).atan2(proximal.x - joint.x);
    normalize_degrees(radians.to_degrees().abs())
}

/// Folds an absolute angle difference in [0, 360] into [0, 180].
pub fn normalize_degrees(angle: f64) -> f64 {
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_straight_line_is_180() {
        let angle = joint_angle(p(0.0, 0.0), p(0.5, 0.5), p(1.0, 1.0));
        assert!((angle - 180.0).abs() < 1e-9);

        let angle = joint_angle(p(3.0, -2.0), p(3.0, 4.0), p(3.0, 11.0));
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_ends_is_zero() {
        let angle = joint_angle(p(2.0, 7.0), p(0.0, 0.0), p(2.0, 7.0));
        assert!(angle.abs() < 1e-9);
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle(p(0.0, 0.0), p(0.5, 0.0), p(0.5, 0.5));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_reflex_difference_is_folded() {
        // atan2 difference here is 270 degrees in magnitude.
        let angle = joint_angle(p(0.0, -1.0), p(0.0, 0.0), p(-1.0, 0.0));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_output_stays_in_range() {
        let joint = p(0.0, 0.0);
        for i in 0..72 {
            for j in 0..72 {
                let a = (i as f64 * 5.0).to_radians();
                let b = (j as f64 * 5.0).to_radians();
                let angle = joint_angle(p(a.cos(), a.sin()), joint, p(b.cos(), b.sin()));
                assert!((0.0..=180.0).contains(&angle), "angle {angle} out of range");
            }
        }
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(90.0), 90.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(270.0), 90.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
    }
}
