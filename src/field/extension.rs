//! Degree-4 binomial extension BabyBear[x]/(x^4 - 11)

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::babybear::BabyBear;

pub const EXTENSION_DEGREE: usize = 4;

/// The non-residue w with x^4 = w.
pub const EXTENSION_NON_RESIDUE: BabyBear = BabyBear::new(11);

#[derive(Copy, Clone, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct BabyBearExt4 {
    pub coeffs: [BabyBear; EXTENSION_DEGREE],
}

impl BabyBearExt4 {
    pub fn new(coeffs: [BabyBear; EXTENSION_DEGREE]) -> Self { Self { coeffs } }
    pub fn from_u32s(values: [u32; EXTENSION_DEGREE]) -> Self { Self::new(values.map(BabyBear::new)) }
    pub fn from_base(value: BabyBear) -> Self {
        Self::new([value, BabyBear::ZERO, BabyBear::ZERO, BabyBear::ZERO])
    }
    pub fn zero() -> Self { Self::default() }
    pub fn one() -> Self { Self::from_base(BabyBear::ONE) }
    pub fn is_zero(&self) -> bool { self.coeffs.iter().all(BabyBear::is_zero) }

    pub fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(std::array::from_fn(|_| BabyBear::rand(rng)))
    }

    pub fn rand_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let candidate = Self::rand(rng);
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }

    /// a(-x): negates the odd coefficients.
    fn conjugate_odd(self) -> Self {
        let [a0, a1, a2, a3] = self.coeffs;
        Self::new([a0, -a1, a2, -a3])
    }

    /// Norm down to the base field.
    ///
    /// `a(x)·a(-x)` lies in the quadratic subfield `b0 + b2·x^2`, whose own norm
    /// `b0^2 - w·b2^2` is the base-field norm of `a`.
    pub fn norm(self) -> BabyBear {
        let b = self * self.conjugate_odd();
        b.coeffs[0] * b.coeffs[0] - EXTENSION_NON_RESIDUE * b.coeffs[2] * b.coeffs[2]
    }

    pub fn inverse(self) -> Option<Self> {
        if self.is_zero() { return None; }
        let odd = self.conjugate_odd();
        let b = self * odd;
        let norm = b.coeffs[0] * b.coeffs[0] - EXTENSION_NON_RESIDUE * b.coeffs[2] * b.coeffs[2];
        let norm_inv = norm.inverse()?;
        let b_conj = Self::new([b.coeffs[0], BabyBear::ZERO, -b.coeffs[2], BabyBear::ZERO]);
        Some((odd * b_conj).scale(norm_inv))
    }

    pub fn scale(self, scalar: BabyBear) -> Self { Self::new(self.coeffs.map(|c| c * scalar)) }

    pub fn pow(self, mut exp: u64) -> Self {
        let mut result = Self::one();
        let mut base = self;
        while exp > 0 {
            if exp & 1 == 1 {
                result *= base;
            }
            base *= base;
            exp >>= 1;
        }
        result
    }
}

impl Add for BabyBearExt4 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Self::new(std::array::from_fn(|i| self.coeffs[i] + rhs.coeffs[i])) }
}

impl Sub for BabyBearExt4 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Self::new(std::array::from_fn(|i| self.coeffs[i] - rhs.coeffs[i])) }
}

impl Mul for BabyBearExt4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut out = [BabyBear::ZERO; EXTENSION_DEGREE];
        for i in 0..EXTENSION_DEGREE {
            for j in 0..EXTENSION_DEGREE {
                let term = self.coeffs[i] * rhs.coeffs[j];
                if i + j >= EXTENSION_DEGREE {
                    out[i + j - EXTENSION_DEGREE] += term * EXTENSION_NON_RESIDUE;
                } else {
                    out[i + j] += term;
                }
            }
        }
        Self::new(out)
    }
}

impl Neg for BabyBearExt4 {
    type Output = Self;
    fn neg(self) -> Self { Self::new(self.coeffs.map(|c| -c)) }
}

impl AddAssign for BabyBearExt4 { fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; } }
impl SubAssign for BabyBearExt4 { fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; } }
impl MulAssign for BabyBearExt4 { fn mul_assign(&mut self, rhs: Self) { *self = *self * rhs; } }

impl Sum for BabyBearExt4 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |a, b| a + b)
    }
}

impl From<BabyBear> for BabyBearExt4 {
    fn from(value: BabyBear) -> Self { Self::from_base(value) }
}

impl fmt::Debug for BabyBearExt4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a0, a1, a2, a3] = self.coeffs;
        write!(f, "Ext4({a0}, {a1}, {a2}, {a3})")
    }
}
