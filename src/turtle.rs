//! Turtle state and operations for path interpretation.

use crate::error::LsError;
use crate::params::LsParams;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A saved cursor, restored by `]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    pub position: DVec2,
    pub heading: f64,
}

/// The integer-aligned area the turtle has visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

/// The 2D drawing turtle.
///
/// Screen Y points down, so the heading is stored as the negated initial angle;
/// rotations add to it directly afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turtle {
    /// Current position of the pen.
    pub position: DVec2,

    /// Current heading, in radians, in screen orientation.
    pub heading: f64,

    step: f64,
    theta: f64,
    stack: Vec<TurtleState>,

    /// Running extrema of every visited position, the origin included.
    min: DVec2,
    max: DVec2,
}

impl Turtle {
    pub fn new(origin: DVec2, step: f64, alpha: f64, theta: f64) -> Self {
        Self {
            position: origin,
            heading: -alpha,
            step,
            theta,
            stack: Vec::new(),
            min: origin,
            max: origin,
        }
    }

    /// A turtle at the origin configured from `params`.
    pub fn from_params(params: &LsParams) -> Self {
        Self::new(DVec2::ZERO, params.step, params.alpha, params.theta)
    }

    /// Moves `count` steps along the current heading and extends the bounds.
    pub fn translate(&mut self, count: usize) {
        let distance = count as f64 * self.step;
        self.position += DVec2::from_angle(self.heading) * distance;
        self.min = self.min.min(self.position);
        self.max = self.max.max(self.position);
    }

    /// Adds `factor * theta` to the heading. A negative factor turns the other way.
    pub fn rotate(&mut self, factor: f64) {
        self.heading += factor * self.theta;
    }

    /// Saves `count` copies of the current state, one per bracket of a `[` run.
    pub fn push_stack(&mut self, count: usize) {
        let state = self.state();
        self.stack.extend(std::iter::repeat_n(state, count));
    }

    /// Restores the state saved `count` pushes ago, discarding the ones above it.
    ///
    /// Fails without touching the turtle when fewer than `count` states are saved.
    pub fn pop_stack(&mut self, count: usize) -> Result<(), LsError> {
        let available = self.stack.len();
        if count > available {
            return Err(LsError::UnbalancedBranch {
                requested: count,
                available,
            });
        }
        if count == 0 {
            return Ok(());
        }

        let restored = self.stack[available - count];
        self.stack.truncate(available - count);
        self.position = restored.position;
        self.heading = restored.heading;
        Ok(())
    }

    pub fn state(&self) -> TurtleState {
        TurtleState {
            position: self.position,
            heading: self.heading,
        }
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Bounds of every visited position, floored at the low end and ceiled at the high end.
    pub fn drawing_rect(&self) -> DrawingRect {
        let min = self.min.floor();
        let max = self.max.ceil();
        DrawingRect {
            min_x: min.x,
            min_y: min.y,
            max_x: max.x,
            max_y: max.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    #[test]
    fn alpha_is_negated_for_screen_coordinates() {
        let mut turtle = Turtle::new(DVec2::ZERO, 10.0, FRAC_PI_2, FRAC_PI_2);
        turtle.translate(1);
        // Pointing "up" on screen means negative Y.
        assert!(turtle.position.x.abs() < EPS);
        assert!((turtle.position.y + 10.0).abs() < EPS);
    }

    #[test]
    fn translate_scales_by_run_length() {
        let mut turtle = Turtle::new(DVec2::ZERO, 2.5, 0.0, 0.0);
        turtle.translate(4);
        assert_eq!(turtle.position, DVec2::new(10.0, 0.0));
    }

    #[test]
    fn rotate_accumulates_factor_times_theta() {
        let mut turtle = Turtle::new(DVec2::ZERO, 1.0, 0.0, 0.25);
        turtle.rotate(3.0);
        turtle.rotate(-1.0);
        assert!((turtle.heading - 0.5).abs() < EPS);
    }

    #[test]
    fn repeated_pushes_restore_the_same_state_for_each_pop() {
        let mut turtle = Turtle::new(DVec2::ZERO, 1.0, 0.0, 1.0);
        turtle.push_stack(3);
        turtle.translate(5);
        turtle.pop_stack(1).unwrap();
        assert_eq!(turtle.position, DVec2::ZERO);
        turtle.translate(2);
        turtle.pop_stack(2).unwrap();
        assert_eq!(turtle.position, DVec2::ZERO);
        assert_eq!(turtle.stack_depth(), 0);
    }

    #[test]
    fn pop_underflow_is_an_error_and_leaves_state_alone() {
        let mut turtle = Turtle::new(DVec2::ZERO, 1.0, 0.0, 1.0);
        turtle.push_stack(1);
        turtle.translate(1);
        assert_eq!(
            turtle.pop_stack(2),
            Err(LsError::UnbalancedBranch {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(turtle.position, DVec2::new(1.0, 0.0));
        assert_eq!(turtle.stack_depth(), 1);
    }

    #[test]
    fn drawing_rect_snaps_outward() {
        let mut turtle = Turtle::new(DVec2::ZERO, 1.5, 0.0, 0.0);
        turtle.translate(1);
        let rect = turtle.drawing_rect();
        assert_eq!(rect.min_x, 0.0);
        assert_eq!(rect.max_x, 2.0);
        assert_eq!(rect.width, 2.0);
        assert_eq!(rect.height, 0.0);
    }
}
