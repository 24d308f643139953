//! Affine calibration from raw panel units to display coordinates.

use serde::{Deserialize, Serialize};

/// Six coefficients of a 2D affine transform:
///
/// ```text
/// x' = x*ax + y*bx + dx
/// y' = x*ay + y*by + dy
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationMatrix {
    pub ax: f64,
    pub bx: f64,
    pub dx: f64,
    pub ay: f64,
    pub by: f64,
    pub dy: f64,
}

impl CalibrationMatrix {
    /// Build a matrix, rejecting any non-finite coefficient.
    pub fn new(ax: f64, bx: f64, dx: f64, ay: f64, by: f64, dy: f64) -> Option<Self> {
        let all_finite = [ax, bx, dx, ay, by, dy].iter().all(|c| c.is_finite());
        all_finite.then_some(Self { ax, bx, dx, ay, by, dy })
    }

    /// Build a matrix from its two rows `[[ax, bx, dx], [ay, by, dy]]`.
    pub fn from_rows(rows: [[f64; 3]; 2]) -> Option<Self> {
        let [[ax, bx, dx], [ay, by, dy]] = rows;
        Self::new(ax, bx, dx, ay, by, dy)
    }

    /// The identity transform
    pub fn identity() -> Self {
        Self { ax: 1.0, bx: 0.0, dx: 0.0, ay: 0.0, by: 1.0, dy: 0.0 }
    }

    /// Apply the transform to one point
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.ax + y * self.bx + self.dx,
            x * self.ay + y * self.by + self.dy,
        )
    }
}

/// Map a raw point through the calibration, or pass it through unchanged.
pub fn project(x: f64, y: f64, calibration: Option<&CalibrationMatrix>) -> (f64, f64) {
    match calibration {
        Some(matrix) => matrix.apply(x, y),
        None => (x, y),
    }
}
