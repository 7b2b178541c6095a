use crate::sampler::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Inside,
    Outside,
}

impl Classification {
    /// Scatter color: inside is blue, outside is red.
    pub fn color(self) -> [u8; 3] {
        match self {
            Classification::Inside => [0, 0, 255],
            Classification::Outside => [255, 0, 0],
        }
    }
}

/// Upper edge of the unit quarter circle, y = sqrt(1 - x^2).
pub fn quarter_circle(x: f64) -> f64 {
    (1.0 - x * x).sqrt()
}

/// Strictly below the curve is inside; points on the curve are outside.
pub fn classify(point: Point) -> Classification {
    if point.y < quarter_circle(point.x) {
        Classification::Inside
    } else {
        Classification::Outside
    }
}
