use crate::Float;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign};

/// Linear RGB radiance value.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Spectrum {
    pub r: Float,
    pub g: Float,
    pub b: Float,
}

impl Spectrum {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { r, g, b }
    }

    pub fn uniform(v: Float) -> Self {
        Self::new(v, v, v)
    }

    pub fn black() -> Self {
        Self::uniform(0.0)
    }

    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    pub fn has_nans(&self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan()
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    pub fn has_negatives(&self) -> bool {
        self.r < 0.0 || self.g < 0.0 || self.b < 0.0
    }

    /// Clamps negative components to zero.
    pub fn clamp_positive(self) -> Self {
        Self::new(self.r.max(0.0), self.g.max(0.0), self.b.max(0.0))
    }

    pub fn map(self, f: impl Fn(Float) -> Float) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    pub fn into_array(self) -> [Float; 3] {
        [self.r, self.g, self.b]
    }
}

impl Add for Spectrum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Spectrum {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul for Spectrum {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl MulAssign for Spectrum {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Float> for Spectrum {
    type Output = Self;

    fn mul(self, rhs: Float) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl Mul<Spectrum> for Float {
    type Output = Spectrum;

    fn mul(self, rhs: Spectrum) -> Spectrum {
        rhs * self
    }
}

impl Div<Float> for Spectrum {
    type Output = Self;

    fn div(self, rhs: Float) -> Self {
        Self::new(self.r / rhs, self.g / rhs, self.b / rhs)
    }
}

impl DivAssign<Float> for Spectrum {
    fn div_assign(&mut self, rhs: Float) {
        *self = *self / rhs;
    }
}

impl Sum for Spectrum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::black(), Add::add)
    }
}
