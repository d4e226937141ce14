use std::cmp::Ordering;
use std::fmt::{Debug, Display};

/// Absolute tolerance used by [`FPA`], on top of the ulps based comparison.
pub const FPA_EPSILON: f64 = 1e-9;

/// Maximum distance in units of least precision for two [`FPA`]s to be considered equal.
pub const FPA_ULPS: i64 = 8;

///Wrapper around the [`float_cmp::approx_eq!()`] macro for easy comparison of floats with a certain tolerance.
///Two FPAs are considered equal if they are within a certain tolerance of each other.
///Lengths are accumulated by repeated subtraction, so fit tests and validity checks compare through this type.
#[derive(Debug, Clone, Copy)]
pub struct FPA(pub f64);

impl<T> From<T> for FPA
where
    T: Into<f64>,
{
    fn from(n: T) -> Self {
        FPA(n.into())
    }
}

impl PartialEq<Self> for FPA {
    fn eq(&self, other: &Self) -> bool {
        float_cmp::approx_eq!(f64, self.0, other.0, epsilon = FPA_EPSILON, ulps = FPA_ULPS)
    }
}

impl PartialOrd<Self> for FPA {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.eq(other) {
            true => Some(Ordering::Equal),
            false => self.0.partial_cmp(&other.0),
        }
    }
}

impl Display for FPA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
