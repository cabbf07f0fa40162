//! Utility types, used throughout the crate.

/// An inclusive, axis-aligned rectangle of cells.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Rect {
    pub min: [u32; 2],
    pub max: [u32; 2],
}
impl Rect {
    /// Smallest rect covering both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }
    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.min[0]..=self.max[0]).contains(&x) && (self.min[1]..=self.max[1]).contains(&y)
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.max[0] - self.min[0] + 1
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.max[1] - self.min[1] + 1
    }
}

/// A point which is finite in both axes.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FinitePoint([f32; 2]);
impl FinitePoint {
    pub fn new(x: f32, y: f32) -> Result<Self, FiniteError> {
        if x.is_finite() && y.is_finite() {
            Ok(Self([x, y]))
        } else {
            Err(FiniteError::NotFinite)
        }
    }
    #[must_use]
    pub fn x(self) -> f32 {
        self.0[0]
    }
    #[must_use]
    pub fn y(self) -> f32 {
        self.0[1]
    }
    #[must_use]
    pub fn get(self) -> [f32; 2] {
        self.0
    }
}
impl TryFrom<(f32, f32)> for FinitePoint {
    type Error = FiniteError;
    fn try_from((x, y): (f32, f32)) -> Result<Self, Self::Error> {
        Self::new(x, y)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiniteError {
    #[error("not finite")]
    NotFinite,
}
