//! Affine maps between a page's content coordinate space and its layout
//! space.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransformError {
    /// The matrix cannot be inverted. This is broken input data, not a
    /// recoverable condition: an inverted degenerate map would produce
    /// non-finite coordinates everywhere downstream.
    #[error("degenerate transform (determinant {det})")]
    Degenerate { det: f64 },
}

/// 6-parameter 2D affine map `[a, b, c, d, e, f]`:
/// `apply((x, y)) = (a·x + c·y + e, b·x + d·y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform([f64; 6]);

impl Transform {
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub fn new(matrix: [f64; 6]) -> Self {
        Self(matrix)
    }

    pub fn matrix(&self) -> [f64; 6] {
        self.0
    }

    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.0;
        let (x, y) = point;
        (a * x + c * y + e, b * x + d * y + f)
    }

    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, _, _] = self.0;
        a * d - b * c
    }

    pub fn invert(&self) -> Result<Self, TransformError> {
        let [a, b, c, d, e, f] = self.0;
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(TransformError::Degenerate { det });
        }

        Ok(Self([
            d / det,
            -b / det,
            -c / det,
            a / det,
            (c * f - d * e) / det,
            (b * e - a * f) / det,
        ]))
    }
}

impl From<[f64; 6]> for Transform {
    fn from(matrix: [f64; 6]) -> Self {
        Self(matrix)
    }
}
