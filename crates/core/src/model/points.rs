use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PointsError {
    #[error("points must be a non-negative multiple of 0.5, got {0}")]
    NotHalfPoint(f64),
}

/// A score with half-point resolution.
///
/// Stored as a count of half points so that sums stay exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points(u32);

impl Points {
    pub const ZERO: Points = Points(0);

    /// Whole points.
    #[must_use]
    pub const fn whole(points: u32) -> Self {
        Self(points * 2)
    }

    #[must_use]
    pub const fn from_halves(halves: u32) -> Self {
        Self(halves)
    }

    #[must_use]
    pub const fn halves(self) -> u32 {
        self.0
    }

    /// Convert a float such as `2.5` into points.
    ///
    /// # Errors
    ///
    /// Returns `PointsError::NotHalfPoint` for negative, non-finite or
    /// non-half-step values.
    pub fn try_from_f64(value: f64) -> Result<Self, PointsError> {
        let doubled = value * 2.0;
        if !value.is_finite()
            || value < 0.0
            || doubled.fract() != 0.0
            || doubled > f64::from(u32::MAX)
        {
            return Err(PointsError::NotHalfPoint(value));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self(doubled as u32))
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Self) -> Self::Output {
        Points(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Points {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<u32> for Points {
    type Output = Points;

    fn mul(self, rhs: u32) -> Self::Output {
        Points(self.0.saturating_mul(rhs))
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Points::ZERO, Add::add)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 2;
        if self.0 % 2 == 0 {
            write!(f, "{whole}")
        } else {
            write!(f, "{whole}.5")
        }
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Points::try_from_f64(value).map_err(serde::de::Error::custom)
    }
}
