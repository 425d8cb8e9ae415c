//! BabyBear prime field, p = 2^31 - 2^27 + 1

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{GadgetError, GadgetResult};

/// The BabyBear modulus 2013265921.
pub const BABYBEAR_MODULUS: u32 = 2013265921;

/// Number of bits needed to cover [0, p).
pub const BABYBEAR_BITS: usize = 31;

const MODULUS: u64 = BABYBEAR_MODULUS as u64;

/// Canonical element of the BabyBear field.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BabyBear(u32);

// --- Core Field Arithmetic ---

impl Add for BabyBear {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let sum = self.0 as u64 + rhs.0 as u64;
        if sum >= MODULUS { Self((sum - MODULUS) as u32) } else { Self(sum as u32) }
    }
}

impl Sub for BabyBear {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        if self.0 >= rhs.0 { Self(self.0 - rhs.0) } else { Self((self.0 as u64 + MODULUS - rhs.0 as u64) as u32) }
    }
}

impl Mul for BabyBear {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self(((self.0 as u64 * rhs.0 as u64) % MODULUS) as u32)
    }
}

impl Neg for BabyBear {
    type Output = Self;
    fn neg(self) -> Self { if self.0 == 0 { self } else { Self(BABYBEAR_MODULUS - self.0) } }
}

impl AddAssign for BabyBear { fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; } }
impl SubAssign for BabyBear { fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; } }
impl MulAssign for BabyBear { fn mul_assign(&mut self, rhs: Self) { *self = *self * rhs; } }

impl Sum for BabyBear {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + b)
    }
}

impl<'a> Sum<&'a BabyBear> for BabyBear {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + *b)
    }
}

impl BabyBear {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);
    pub const TWO: Self = Self(2);

    /// Reduces `value` into the field.
    pub const fn new(value: u32) -> Self { Self(value % BABYBEAR_MODULUS) }

    pub fn from_u64(value: u64) -> Self { Self((value % MODULUS) as u32) }

    /// Rejects non-canonical inputs instead of reducing them.
    pub fn from_canonical(value: u32) -> GadgetResult<Self> {
        if value >= BABYBEAR_MODULUS {
            return Err(GadgetError::out_of_range(
                "babybear",
                &format!("{value} is not below the modulus {BABYBEAR_MODULUS}"),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_u32(self) -> u32 { self.0 }
    pub fn as_u64(self) -> u64 { self.0 as u64 }
    pub fn is_zero(&self) -> bool { self.0 == 0 }

    pub fn double(self) -> Self { self + self }

    pub fn pow(self, exp: u64) -> Self {
        let mut res = Self::ONE;
        let mut base = self;
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 { res *= base; }
            base *= base;
            e >>= 1;
        }
        res
    }

    pub fn inverse(self) -> Option<Self> {
        if self.is_zero() { return None; }
        Some(self.pow(MODULUS - 2))
    }

    pub fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let candidate = rng.gen::<u32>() >> 1;
            if candidate < BABYBEAR_MODULUS {
                return Self(candidate);
            }
        }
    }

    pub fn rand_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let value = Self::rand(rng);
            if !value.is_zero() {
                return value;
            }
        }
    }
}

impl TryFrom<u32> for BabyBear {
    type Error = GadgetError;
    fn try_from(value: u32) -> GadgetResult<Self> { Self::from_canonical(value) }
}

impl From<BabyBear> for u32 {
    fn from(value: BabyBear) -> u32 { value.0 }
}

impl fmt::Debug for BabyBear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "BabyBear({})", self.0) }
}

impl fmt::Display for BabyBear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_babybear_rand_nonzero() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..256 {
            let sample = BabyBear::rand_nonzero(&mut rng);
            assert!(!sample.is_zero());
            assert!(sample.as_u32() < BABYBEAR_MODULUS);
        }
    }

    #[test]
    fn test_arithmetic_matches_u64_oracle() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..512 {
            let a = BabyBear::rand(&mut rng);
            let b = BabyBear::rand(&mut rng);
            let (x, y) = (a.as_u64(), b.as_u64());
            assert_eq!((a + b).as_u64(), (x + y) % MODULUS);
            assert_eq!((a - b).as_u64(), (x + MODULUS - y) % MODULUS);
            assert_eq!((a * b).as_u64(), (x * y) % MODULUS);
            assert_eq!((-a + a), BabyBear::ZERO);
        }
    }

    #[test]
    fn test_inverse() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..64 {
            let a = BabyBear::rand_nonzero(&mut rng);
            assert_eq!(a * a.inverse().unwrap(), BabyBear::ONE);
        }
        assert!(BabyBear::ZERO.inverse().is_none());
    }

    #[test]
    fn test_from_canonical_rejects_modulus() {
        assert!(BabyBear::from_canonical(BABYBEAR_MODULUS).is_err());
        assert_eq!(BabyBear::from_canonical(BABYBEAR_MODULUS - 1).unwrap(), -BabyBear::ONE);
        assert_eq!(BabyBear::new(BABYBEAR_MODULUS + 5).as_u32(), 5);
    }

    #[test]
    fn test_monty_inverse_constant() {
        // 2^-32 mod p
        let two_pow_32 = BabyBear::from_u64(1 << 32);
        assert_eq!(two_pow_32.inverse().unwrap().as_u32(), 943718400);
    }

    #[test]
    fn test_serde_rejects_non_canonical() {
        let bytes = bincode::serialize(&BABYBEAR_MODULUS).unwrap();
        assert!(bincode::deserialize::<BabyBear>(&bytes).is_err());
        let ok = bincode::serialize(&BabyBear::new(42)).unwrap();
        assert_eq!(bincode::deserialize::<BabyBear>(&ok).unwrap(), BabyBear::new(42));
    }
}
