use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::Vector3;

/// One of the four axis-aligned placement rotations.
///
/// Formwork hardware is only ever set square to the walls, so every frame
/// rotation ends up as one of these after snapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    /// 0 rad, +X.
    East,
    /// π/2 rad, +Y.
    North,
    /// π rad, −X.
    West,
    /// 3π/2 rad, −Y.
    South,
}

impl Cardinal {
    /// All four directions in counter-clockwise order starting at +X.
    pub const ALL: [Cardinal; 4] = [Self::East, Self::North, Self::West, Self::South];

    /// Returns the rotation in radians, in `[0, 2π)`.
    #[must_use]
    pub fn radians(self) -> f64 {
        match self {
            Self::East => 0.0,
            Self::North => FRAC_PI_2,
            Self::West => PI,
            Self::South => 3.0 * FRAC_PI_2,
        }
    }

    /// Returns the direction rotated a quarter turn counter-clockwise.
    #[must_use]
    pub fn quarter_turn(self) -> Self {
        match self {
            Self::East => Self::North,
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        self.quarter_turn().quarter_turn()
    }

    /// Returns the unit vector along this direction.
    ///
    /// Components are exact integers, so offsets built from it carry no
    /// trigonometric rounding.
    #[must_use]
    pub fn unit(self) -> Vector3 {
        match self {
            Self::East => Vector3::new(1.0, 0.0, 0.0),
            Self::North => Vector3::new(0.0, 1.0, 0.0),
            Self::West => Vector3::new(-1.0, 0.0, 0.0),
            Self::South => Vector3::new(0.0, -1.0, 0.0),
        }
    }

    /// Returns the local `(along, left)` axes of a frame with this rotation.
    ///
    /// `along` points down the wall run, `left` is its left-hand normal.
    #[must_use]
    pub fn axes(self) -> (Vector3, Vector3) {
        (self.unit(), self.quarter_turn().unit())
    }

    /// Snaps a raw angle to the nearest cardinal direction.
    ///
    /// The angle is first normalized into `[0, 2π)`. Returns `None` if it is
    /// farther than `tolerance` from every cardinal value (including 2π,
    /// which wraps to [`Cardinal::East`]).
    #[must_use]
    pub fn snap(angle: f64, tolerance: f64) -> Option<Self> {
        let a = normalize_angle(angle);
        if a >= TAU - tolerance {
            return Some(Self::East);
        }
        Self::ALL
            .into_iter()
            .find(|c| (a - c.radians()).abs() <= tolerance)
    }

    /// Snaps the direction of a plan vector, see [`Cardinal::snap`].
    #[must_use]
    pub fn from_direction(dir: &Vector3, tolerance: f64) -> Option<Self> {
        Self::snap(dir.y.atan2(dir.x), tolerance)
    }
}

/// Normalizes an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if a >= TAU {
        0.0
    } else {
        a
    }
}
