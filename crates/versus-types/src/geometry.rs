//! World-space vectors and grid coordinates.
//!
//! Positions live on the XZ plane (Y is up and stays at 0 for animals).
//! Blocks are addressed by integer [`GridCoord`]s where `x` runs along
//! world X and `y` runs along world Z.

use core::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lengths below this are treated as zero when normalizing.
const NORMALIZE_EPSILON: f32 = 1.0e-6;

/// A 3D vector in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vec3 {
    /// East-west axis.
    pub x: f32,
    /// Vertical axis.
    pub y: f32,
    /// North-south axis.
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit vector along +Z, the default facing of a freshly spawned agent.
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    /// Construct a vector from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    pub fn dot(self, other: Self) -> f32 {
        self.z.mul_add(other.z, self.x.mul_add(other.x, self.y * other.y))
    }

    /// Cross product.
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y.mul_add(other.z, -(self.z * other.y)),
            self.z.mul_add(other.x, -(self.x * other.z)),
            self.x.mul_add(other.y, -(self.y * other.x)),
        )
    }

    /// Squared length, cheaper than [`Vec3::magnitude`] for comparisons.
    pub fn sqr_magnitude(self) -> f32 {
        self.dot(self)
    }

    /// Euclidean length.
    pub fn magnitude(self) -> f32 {
        self.sqr_magnitude().sqrt()
    }

    /// Squared distance between two points.
    pub fn sqr_distance(self, other: Self) -> f32 {
        (other - self).sqr_magnitude()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Self> {
        let len = self.magnitude();
        if len <= NORMALIZE_EPSILON {
            None
        } else {
            Some(self * len.recip())
        }
    }

    /// Move `current` toward `target` by at most `max_delta`, never
    /// overshooting. Lands exactly on `target` once within reach.
    pub fn move_towards(current: Self, target: Self, max_delta: f32) -> Self {
        let delta = target - current;
        let distance = delta.magnitude();
        if distance <= max_delta || distance <= NORMALIZE_EPSILON {
            return target;
        }
        current + delta * (max_delta / distance)
    }

    /// Rotate the direction `current` toward `target` by at most
    /// `max_radians`, returning a unit vector.
    ///
    /// A zero `target` keeps the current heading; a zero `current` snaps to
    /// the target heading.
    pub fn rotate_towards(current: Self, target: Self, max_radians: f32) -> Self {
        let Some(to) = target.normalized() else {
            return current.normalized().unwrap_or(Self::FORWARD);
        };
        let Some(from) = current.normalized() else {
            return to;
        };

        let angle = from.dot(to).clamp(-1.0, 1.0).acos();
        if angle <= max_radians.max(0.0) {
            return to;
        }

        let sin_angle = angle.sin();
        if sin_angle <= NORMALIZE_EPSILON {
            // Opposite headings: any perpendicular axis is a valid turn.
            let helper = if from.x.abs() < 0.9 {
                Self::new(1.0, 0.0, 0.0)
            } else {
                Self::new(0.0, 1.0, 0.0)
            };
            let ortho = from.cross(helper).normalized().unwrap_or(Self::FORWARD);
            return from * max_radians.cos() + ortho * max_radians.sin();
        }

        let t = max_radians / angle;
        let from_weight = ((1.0 - t) * angle).sin() / sin_angle;
        let to_weight = (t * angle).sin() / sin_angle;
        (from * from_weight + to * to_weight)
            .normalized()
            .unwrap_or(to)
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl core::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Integer coordinate of a block within the city grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct GridCoord {
    /// Column, along world X.
    pub x: i32,
    /// Row, along world Z.
    pub y: i32,
}

impl GridCoord {
    /// Construct a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl core::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dimensions of the city grid: `0 <= x < width`, `0 <= y < depth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    /// Number of columns.
    pub width: i32,
    /// Number of rows.
    pub depth: i32,
}

impl GridBounds {
    /// Construct bounds from a width and depth.
    pub const fn new(width: i32, depth: i32) -> Self {
        Self { width, depth }
    }

    /// Whether `coord` lies inside the grid.
    pub const fn contains(self, coord: GridCoord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.depth
    }

    /// Total number of cells, zero for degenerate bounds.
    pub fn cell_count(self) -> usize {
        let w = usize::try_from(self.width).unwrap_or(0);
        let d = usize::try_from(self.depth).unwrap_or(0);
        w.saturating_mul(d)
    }

    /// Row-major index of `coord`, or `None` when out of bounds.
    pub fn index_of(self, coord: GridCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let row = usize::try_from(coord.y).ok()?;
        let col = usize::try_from(coord.x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(col)
    }

    /// Iterate every coordinate in row-major order.
    pub fn coords(self) -> impl Iterator<Item = GridCoord> {
        (0..self.depth.max(0))
            .flat_map(move |y| (0..self.width.max(0)).map(move |x| GridCoord::new(x, y)))
    }
}
