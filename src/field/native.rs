//! Native field conversions
//!
//! Circuits are built over the BN254 scalar field. These helpers move values
//! between `ark_bn254::Fr` and the small integers the emulated gadgets reason
//! about.

use ark_ff::{BigInteger, PrimeField};

pub type F = ark_bn254::Fr;

pub fn u64_to_field(value: u64) -> F {
    F::from(value)
}

pub fn u128_to_field(value: u128) -> F {
    F::from(value)
}

/// Returns the integer value when it fits in 128 bits.
pub fn field_to_u128(value: &F) -> Option<u128> {
    let limbs = value.into_bigint().0;
    if limbs[2] != 0 || limbs[3] != 0 {
        return None;
    }
    Some(((limbs[1] as u128) << 64) | limbs[0] as u128)
}

pub fn field_to_u64(value: &F) -> Option<u64> {
    field_to_u128(value).and_then(|v| u64::try_from(v).ok())
}

/// Little-endian bits of the canonical representative, truncated to `len`.
pub fn field_bits_le(value: &F, len: usize) -> Vec<bool> {
    let mut bits = value.into_bigint().to_bits_le();
    bits.resize(len, false);
    bits
}

/// Bit length of the canonical representative.
pub fn field_num_bits(value: &F) -> usize {
    value.into_bigint().num_bits() as usize
}

pub fn field_to_bytes(value: &F) -> Vec<u8> {
    value.into_bigint().to_bytes_le()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, Zero};

    #[test]
    fn test_u128_field_conversion() {
        let original = (7u128 << 90) | 12345;
        let elem = u128_to_field(original);
        assert_eq!(field_to_u128(&elem), Some(original));
        assert_eq!(field_to_u64(&elem), None);
    }

    #[test]
    fn test_negative_one_does_not_fit() {
        let minus_one = -F::one();
        assert!(field_to_u128(&minus_one).is_none());
        assert_eq!(field_to_u128(&F::zero()), Some(0));
    }

    #[test]
    fn test_bits_le_truncates_and_pads() {
        let bits = field_bits_le(&u64_to_field(0b1011), 6);
        assert_eq!(bits, vec![true, true, false, true, false, false]);
    }

    #[test]
    fn test_bytes_are_32_wide() {
        assert_eq!(field_to_bytes(&u64_to_field(9)).len(), 32);
    }
}
