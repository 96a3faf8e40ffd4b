// src/core/complex.rs

//! Exact complex values over the ring generated by `{1, 1/√2, i}`.
//!
//! Every amplitude and matrix entry a Clifford+T-style circuit can produce
//! lives in this ring, so the whole simulation runs on integer arithmetic.
//! Floating point appears only on output, when a value is projected to
//! `Complex<f64>` for display or measurement statistics.

use num_complex::Complex;
use std::fmt;

/// Index of an interned complex value inside a [`ComplexTable`](super::ComplexTable).
///
/// Indices are assigned in insertion order, so equality of indices is
/// equality of ring values. The first nine indices are reserved for the
/// well-known constants seeded at table construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComplexId(pub u32);

impl ComplexId {
    /// The index as a `usize`, for arena addressing.
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComplexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// An exact complex number `((a + b/√2) + (c + d/√2)·i) / e`.
///
/// The representation is canonical: `e > 0` and the five integers share no
/// common factor, so component-wise equality is value equality and the type
/// can serve directly as a hash-map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComplexValue {
    a: i64,
    b: i64,
    c: i64,
    d: i64,
    e: i64,
}

/// Greatest common divisor of two non-negative integers.
fn gcd(mut x: i64, mut y: i64) -> i64 {
    while y != 0 {
        (x, y) = (y, x % y);
    }
    x
}

impl ComplexValue {
    /// Builds the canonical form of `((a + b/√2) + (c + d/√2)·i) / e`.
    ///
    /// # Panics
    /// Panics if `e == 0`; a zero denominator cannot arise from valid ring
    /// arithmetic and indicates a bug in the caller.
    pub fn new(a: i64, b: i64, c: i64, d: i64, e: i64) -> Self {
        assert!(e != 0, "complex value with zero denominator");
        // Fold the sign of the denominator into the numerators.
        let (a, b, c, d, e) = if e < 0 { (-a, -b, -c, -d, -e) } else { (a, b, c, d, e) };
        if a == 0 && b == 0 && c == 0 && d == 0 {
            return Self { a: 0, b: 0, c: 0, d: 0, e: 1 };
        }
        let g = gcd(gcd(gcd(a.abs(), b.abs()), gcd(c.abs(), d.abs())), e);
        Self { a: a / g, b: b / g, c: c / g, d: d / g, e: e / g }
    }

    /// The canonical zero.
    pub fn zero() -> Self {
        Self { a: 0, b: 0, c: 0, d: 0, e: 1 }
    }

    /// The canonical one.
    pub fn one() -> Self {
        Self { a: 1, b: 0, c: 0, d: 0, e: 1 }
    }

    /// Whether this is the zero value.
    pub fn is_zero(&self) -> bool {
        self.a == 0 && self.b == 0 && self.c == 0 && self.d == 0
    }

    /// Exact sum.
    pub fn add(&self, rhs: &Self) -> Self {
        Self::new(
            self.a * rhs.e + rhs.a * self.e,
            self.b * rhs.e + rhs.b * self.e,
            self.c * rhs.e + rhs.c * self.e,
            self.d * rhs.e + rhs.d * self.e,
            self.e * rhs.e,
        )
    }

    /// Exact product, by expansion in the ring.
    ///
    /// Cross terms of the `1/√2` components land on half-integers, so the
    /// expansion is carried out over the doubled denominator `2·e·e'`.
    pub fn mul(&self, rhs: &Self) -> Self {
        let (a1, b1, c1, d1) = (self.a, self.b, self.c, self.d);
        let (a2, b2, c2, d2) = (rhs.a, rhs.b, rhs.c, rhs.d);
        Self::new(
            2 * a1 * a2 + b1 * b2 - 2 * c1 * c2 - d1 * d2,
            2 * (a1 * b2 + b1 * a2 - c1 * d2 - d1 * c2),
            2 * (a1 * c2 + c1 * a2) + b1 * d2 + d1 * b2,
            2 * (a1 * d2 + b1 * c2 + c1 * b2 + d1 * a2),
            2 * self.e * rhs.e,
        )
    }

    /// Complex conjugate.
    pub fn conj(&self) -> Self {
        Self { a: self.a, b: self.b, c: -self.c, d: -self.d, e: self.e }
    }

    /// The `√2 ↦ −√2` field conjugate.
    fn sqrt2_conj(&self) -> Self {
        Self { a: self.a, b: -self.b, c: self.c, d: -self.d, e: self.e }
    }

    /// Exact quotient `self / rhs` for nonzero `rhs`.
    ///
    /// The numerator is multiplied by the complex conjugate and by the √2
    /// conjugate of the resulting squared magnitude, which turns the
    /// denominator into a positive rational.
    ///
    /// # Panics
    /// Panics if `rhs` is zero; callers check and report `DivByZero` first.
    pub fn div(&self, rhs: &Self) -> Self {
        let cy = rhs.conj();
        // m = rhs · conj(rhs) is real: (p + q/√2)/e².
        let m = rhs.mul(&cy);
        let sm = m.sqrt2_conj();
        // m · σ(m) is rational and positive for nonzero rhs.
        let den = m.mul(&sm);
        debug_assert!(den.b == 0 && den.c == 0 && den.d == 0 && den.a > 0);
        let num = self.mul(&cy).mul(&sm);
        Self::new(
            num.a * den.e,
            num.b * den.e,
            num.c * den.e,
            num.d * den.e,
            num.e * den.a,
        )
    }

    /// Real part, projected to `f64`.
    pub fn re(&self) -> f64 {
        (self.a as f64 + self.b as f64 * std::f64::consts::FRAC_1_SQRT_2) / self.e as f64
    }

    /// Imaginary part, projected to `f64`.
    pub fn im(&self) -> f64 {
        (self.c as f64 + self.d as f64 * std::f64::consts::FRAC_1_SQRT_2) / self.e as f64
    }

    /// Squared magnitude `|·|²`, projected to `f64`.
    pub fn mag2(&self) -> f64 {
        let re = self.re();
        let im = self.im();
        re * re + im * im
    }

    /// Projection to a floating-point complex number.
    pub fn to_complex(&self) -> Complex<f64> {
        Complex::new(self.re(), self.im())
    }
}

impl fmt::Display for ComplexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}{:+.4}i", self.re(), self.im())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_tuples_canonicalize_to_the_same_value() {
        let reduced = ComplexValue::new(1, -2, 0, 3, 4);
        for k in [2, 3, 5, -7] {
            let scaled = ComplexValue::new(k, -2 * k, 0, 3 * k, 4 * k);
            assert_eq!(scaled, reduced, "scale factor {}", k);
        }
    }

    #[test]
    fn negative_denominator_folds_into_numerators() {
        assert_eq!(ComplexValue::new(1, 0, 0, 0, -2), ComplexValue::new(-1, 0, 0, 0, 2));
    }

    #[test]
    fn sqrt_half_squares_to_one_half() {
        let a = ComplexValue::new(0, 1, 0, 0, 1);
        assert_eq!(a.mul(&a), ComplexValue::new(1, 0, 0, 0, 2));
    }

    #[test]
    fn eighth_roots_multiply_to_one() {
        // (1+i)/√2 · (1−i)/√2 = 1
        let b = ComplexValue::new(0, 1, 0, 1, 1);
        let c = ComplexValue::new(0, 1, 0, -1, 1);
        assert_eq!(b.mul(&c), ComplexValue::one());
    }

    #[test]
    fn division_inverts_multiplication() {
        let x = ComplexValue::new(3, -1, 2, 5, 7);
        let y = ComplexValue::new(0, 1, 0, 1, 2);
        let q = x.mul(&y).div(&y);
        assert_eq!(q, x);
    }

    #[test]
    fn reciprocal_of_one_half_is_two() {
        let half = ComplexValue::new(1, 0, 0, 0, 2);
        assert_eq!(ComplexValue::one().div(&half), ComplexValue::new(2, 0, 0, 0, 1));
    }
}
