//! Planar position type.
//!
//! The engine only needs distances for target ordering and proximity
//! checks, so positions are 2-D `f32` points in world units.

/// A point on the simulation plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance.  Prefer this for comparisons.
    #[inline]
    pub fn distance_sq(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(self, other: Position) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Move at most `max_step` units towards `goal`.  Returns the new
    /// position, which equals `goal` once it is within reach.
    pub fn step_towards(self, goal: Position, max_step: f32) -> Position {
        let d = self.distance(goal);
        if d <= max_step || d <= f32::EPSILON {
            return goal;
        }
        let t = max_step / d;
        Position::new(self.x + (goal.x - self.x) * t, self.y + (goal.y - self.y) * t)
    }

    #[inline]
    pub fn as_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
