//! Emulated prime-field arithmetic inside the native field
//!
//! An emulated element is a single native variable (one limb) that is kept
//! canonical, i.e. in `[0, p)`, by a two-sided range proof: both `x` and
//! `p - 1 - x` must decompose into `BITS_PER_LIMB` bits. Modular reduction
//! is witnessed with a quotient: `a * b = q * p + r`, with `q` range-checked
//! and `r` canonical. Since `BITS_PER_LIMB <= 64`, none of these relations
//! can wrap around the ~254-bit native modulus.

use std::fmt;
use std::marker::PhantomData;

use ark_ff::{Field, One, Zero};

use crate::errors::{GadgetError, GadgetResult};
use crate::field::native::{field_to_u64, u64_to_field, F};
use crate::r1cs::{Boolean, R1csBuilder, SparseLC, ONE};

/// Compile-time description of an emulated modulus and its limb layout.
pub trait FieldParams: Copy + fmt::Debug + Send + Sync + 'static {
    const NB_LIMBS: usize;
    const BITS_PER_LIMB: usize;
    const MODULUS: u64;
    const IS_PRIME: bool;
}

/// A value of the emulated field, carried by one native variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatedElement<P: FieldParams> {
    limb: usize,
    value: u64,
    _params: PhantomData<P>,
}

impl<P: FieldParams> EmulatedElement<P> {
    fn new(limb: usize, value: u64) -> Self {
        Self {
            limb,
            value,
            _params: PhantomData,
        }
    }

    /// Native variable holding the limb.
    pub fn limb(&self) -> usize {
        self.limb
    }

    /// Witness value of the limb.
    pub fn value(&self) -> u64 {
        self.value
    }
}

#[derive(Debug, Clone)]
pub struct EmulatedField<P: FieldParams> {
    modulus: F,
    modulus_bits: usize,
    quotient_bits: usize,
    _params: PhantomData<P>,
}

impl<P: FieldParams> EmulatedField<P> {
    pub fn new() -> GadgetResult<Self> {
        if P::NB_LIMBS != 1 {
            return Err(GadgetError::unsupported_parameter(
                "nb_limbs",
                &format!("only single-limb layouts are supported, got {}", P::NB_LIMBS),
            ));
        }
        if P::BITS_PER_LIMB == 0 || P::BITS_PER_LIMB > 64 {
            return Err(GadgetError::unsupported_parameter(
                "bits_per_limb",
                &format!("limbs must be 1..=64 bits wide, got {}", P::BITS_PER_LIMB),
            ));
        }
        if P::MODULUS < 2 {
            return Err(GadgetError::unsupported_parameter(
                "modulus",
                &format!("{} is not a valid modulus", P::MODULUS),
            ));
        }
        if P::BITS_PER_LIMB < 64 && (P::MODULUS >> P::BITS_PER_LIMB) != 0 {
            return Err(GadgetError::unsupported_parameter(
                "modulus",
                &format!(
                    "{} does not fit in a {}-bit limb",
                    P::MODULUS,
                    P::BITS_PER_LIMB
                ),
            ));
        }
        if !P::IS_PRIME {
            return Err(GadgetError::unsupported_parameter(
                "modulus",
                "inversion requires a prime modulus",
            ));
        }

        let modulus_bits = bit_length((P::MODULUS - 1) as u128);
        let max_limb = if P::BITS_PER_LIMB == 64 {
            u64::MAX as u128
        } else {
            (1u128 << P::BITS_PER_LIMB) - 1
        };
        let quotient_bits = bit_length(max_limb / P::MODULUS as u128);
        tracing::debug!(
            modulus = P::MODULUS,
            bits_per_limb = P::BITS_PER_LIMB,
            modulus_bits,
            "[emulated] field configured"
        );
        Ok(Self {
            modulus: u64_to_field(P::MODULUS),
            modulus_bits,
            quotient_bits,
            _params: PhantomData,
        })
    }

    /// Number of bits `to_bits` returns.
    pub fn modulus_bits(&self) -> usize {
        self.modulus_bits
    }

    // --- Witness-side helpers ---

    fn reduce(value: u128) -> u64 {
        (value % P::MODULUS as u128) as u64
    }

    fn mul_mod(a: u64, b: u64) -> u64 {
        Self::reduce(a as u128 * b as u128)
    }

    fn pow_mod(base: u64, mut exp: u64) -> u64 {
        let mut result = 1u64 % P::MODULUS;
        let mut base = Self::reduce(base as u128);
        while exp > 0 {
            if exp & 1 == 1 {
                result = Self::mul_mod(result, base);
            }
            base = Self::mul_mod(base, base);
            exp >>= 1;
        }
        result
    }

    // --- Range proofs ---

    /// Constrains `limb` to `[0, p)`.
    fn range_check(&self, builder: &mut R1csBuilder, limb: usize) {
        let p_minus_one = self.modulus - F::one();
        builder.decompose_to_bits(limb, P::BITS_PER_LIMB);
        let complement = builder.alloc(p_minus_one - builder.value(limb));
        builder.enforce_linear_relation(&[(limb, F::one()), (complement, F::one())], -p_minus_one);
        builder.decompose_to_bits(complement, P::BITS_PER_LIMB);
    }

    fn alloc_canonical(&self, builder: &mut R1csBuilder, value: u64) -> EmulatedElement<P> {
        let limb = builder.alloc(u64_to_field(value));
        self.range_check(builder, limb);
        EmulatedElement::new(limb, value)
    }

    fn alloc_quotient(&self, builder: &mut R1csBuilder, value: u64, bits: usize) -> usize {
        let var = builder.alloc(u64_to_field(value));
        builder.decompose_to_bits(var, bits);
        var
    }

    // --- Element construction ---

    pub fn constant(&self, builder: &mut R1csBuilder, value: u64) -> EmulatedElement<P> {
        let reduced = Self::reduce(value as u128);
        let limb = builder.alloc_constant(u64_to_field(reduced));
        EmulatedElement::new(limb, reduced)
    }

    /// Allocates a range-checked witness. Values `>= p` are recorded as a
    /// fault and leave the range proof unsatisfied.
    pub fn new_element(&self, builder: &mut R1csBuilder, value: u64) -> EmulatedElement<P> {
        builder.scoped("emulated.new_element", |builder| {
            if value >= P::MODULUS {
                builder.record_fault(GadgetError::out_of_range(
                    "emulated.new_element",
                    &format!("{} is not below the modulus {}", value, P::MODULUS),
                ));
            }
            self.alloc_canonical(builder, value)
        })
    }

    /// Reduces a native variable of at most `BITS_PER_LIMB` bits into the field.
    pub fn new_element_from_native(&self, builder: &mut R1csBuilder, native: usize) -> EmulatedElement<P> {
        builder.scoped("emulated.from_native", |builder| {
            builder.decompose_to_bits(native, P::BITS_PER_LIMB);
            self.reduce_bounded(builder, native)
        })
    }

    /// Like [`Self::new_element_from_native`] for a variable already known to
    /// fit in `BITS_PER_LIMB` bits (e.g. recomposed from booleans).
    pub fn new_element_from_bounded(&self, builder: &mut R1csBuilder, native: usize) -> EmulatedElement<P> {
        builder.scoped("emulated.from_bounded", |builder| self.reduce_bounded(builder, native))
    }

    fn reduce_bounded(&self, builder: &mut R1csBuilder, native: usize) -> EmulatedElement<P> {
        let raw = match field_to_u64(&builder.value(native)) {
            Some(raw) if P::BITS_PER_LIMB == 64 || raw >> P::BITS_PER_LIMB == 0 => raw,
            _ => {
                builder.record_fault(GadgetError::out_of_range(
                    "emulated.from_native",
                    &format!("native value exceeds {} bits", P::BITS_PER_LIMB),
                ));
                0
            }
        };
        let remainder = self.alloc_canonical(builder, raw % P::MODULUS);
        let mut terms = vec![(native, F::one()), (remainder.limb, -F::one())];
        if self.quotient_bits > 0 {
            let quotient = self.alloc_quotient(builder, raw / P::MODULUS, self.quotient_bits);
            terms.push((quotient, -self.modulus));
        }
        builder.enforce_linear_relation(&terms, F::zero());
        remainder
    }

    // --- Arithmetic ---

    pub fn add(&self, builder: &mut R1csBuilder, a: &EmulatedElement<P>, b: &EmulatedElement<P>) -> EmulatedElement<P> {
        builder.scoped("emulated.add", |builder| {
            let sum = a.value as u128 + b.value as u128;
            let carry = builder.alloc_bit(sum >= P::MODULUS as u128);
            let result = self.alloc_canonical(builder, Self::reduce(sum));
            builder.enforce_linear_relation(
                &[
                    (a.limb, F::one()),
                    (b.limb, F::one()),
                    (result.limb, -F::one()),
                    (carry.var, -self.modulus),
                ],
                F::zero(),
            );
            result
        })
    }

    pub fn sub(&self, builder: &mut R1csBuilder, a: &EmulatedElement<P>, b: &EmulatedElement<P>) -> EmulatedElement<P> {
        builder.scoped("emulated.sub", |builder| {
            let (a_red, b_red) = (Self::reduce(a.value as u128), Self::reduce(b.value as u128));
            let borrow = builder.alloc_bit(a_red < b_red);
            let diff = Self::reduce(a_red as u128 + P::MODULUS as u128 - b_red as u128);
            let result = self.alloc_canonical(builder, diff);
            builder.enforce_linear_relation(
                &[
                    (a.limb, F::one()),
                    (b.limb, -F::one()),
                    (borrow.var, self.modulus),
                    (result.limb, -F::one()),
                ],
                F::zero(),
            );
            result
        })
    }

    pub fn neg(&self, builder: &mut R1csBuilder, a: &EmulatedElement<P>) -> EmulatedElement<P> {
        builder.scoped("emulated.neg", |builder| {
            let a_red = Self::reduce(a.value as u128);
            let wraps = builder.alloc_bit(a_red != 0);
            let result = self.alloc_canonical(builder, (P::MODULUS - a_red) % P::MODULUS);
            builder.enforce_linear_relation(
                &[
                    (a.limb, F::one()),
                    (result.limb, F::one()),
                    (wraps.var, -self.modulus),
                ],
                F::zero(),
            );
            result
        })
    }

    pub fn mul(&self, builder: &mut R1csBuilder, a: &EmulatedElement<P>, b: &EmulatedElement<P>) -> EmulatedElement<P> {
        builder.scoped("emulated.mul", |builder| {
            let product = a.value as u128 * b.value as u128;
            let quotient = (product / P::MODULUS as u128) as u64;
            let quotient_var = self.alloc_quotient(builder, quotient, P::BITS_PER_LIMB);
            let result = self.alloc_canonical(builder, Self::reduce(product));
            builder.enforce_mul(
                SparseLC::from_var(a.limb),
                SparseLC::from_var(b.limb),
                SparseLC::with_terms(F::zero(), vec![(quotient_var, self.modulus), (result.limb, F::one())]),
            );
            result
        })
    }

    /// Multiplication by a compile-time constant: a single linear relation.
    pub fn mul_const(&self, builder: &mut R1csBuilder, a: &EmulatedElement<P>, constant: u64) -> EmulatedElement<P> {
        builder.scoped("emulated.mul_const", |builder| {
            let constant = Self::reduce(constant as u128);
            let product = a.value as u128 * constant as u128;
            let quotient = (product / P::MODULUS as u128) as u64;
            let quotient_var = self.alloc_quotient(builder, quotient, P::BITS_PER_LIMB);
            let result = self.alloc_canonical(builder, Self::reduce(product));
            builder.enforce_linear_relation(
                &[
                    (a.limb, u64_to_field(constant)),
                    (quotient_var, -self.modulus),
                    (result.limb, -F::one()),
                ],
                F::zero(),
            );
            result
        })
    }

    /// `a * inv = q * p + 1`. For `a = 0` the relation has no solution; the
    /// fault is recorded and a zero witness is emitted.
    pub fn inverse(&self, builder: &mut R1csBuilder, a: &EmulatedElement<P>) -> EmulatedElement<P> {
        builder.scoped("emulated.inverse", |builder| {
            let a_red = Self::reduce(a.value as u128);
            let (inv, quotient) = if a_red == 0 {
                builder.record_fault(GadgetError::division_by_zero("emulated.inverse"));
                (0, 0)
            } else {
                let inv = Self::pow_mod(a_red, P::MODULUS - 2);
                let quotient = ((a.value as u128 * inv as u128 - 1) / P::MODULUS as u128) as u64;
                (inv, quotient)
            };
            let quotient_var = self.alloc_quotient(builder, quotient, P::BITS_PER_LIMB);
            let result = self.alloc_canonical(builder, inv);
            builder.enforce_mul(
                SparseLC::from_var(a.limb),
                SparseLC::from_var(result.limb),
                SparseLC::with_terms(F::zero(), vec![(quotient_var, self.modulus), (ONE, F::one())]),
            );
            result
        })
    }

    /// Boolean that is 1 iff `a = 0`.
    pub fn is_zero(&self, builder: &mut R1csBuilder, a: &EmulatedElement<P>) -> Boolean {
        builder.scoped("emulated.is_zero", |builder| {
            let native = builder.value(a.limb);
            let zero = builder.alloc_bit(native.is_zero());
            let inv = builder.alloc(native.inverse().unwrap_or_else(F::zero));
            builder.enforce_mul(
                SparseLC::from_var(a.limb),
                SparseLC::from_var(inv),
                SparseLC::with_terms(F::one(), vec![(zero.var, -F::one())]),
            );
            builder.enforce_mul(SparseLC::from_var(a.limb), SparseLC::from_var(zero.var), SparseLC::zero());
            zero
        })
    }

    pub fn select(
        &self,
        builder: &mut R1csBuilder,
        cond: Boolean,
        when_true: &EmulatedElement<P>,
        when_false: &EmulatedElement<P>,
    ) -> EmulatedElement<P> {
        builder.scoped("emulated.select", |builder| {
            let limb = builder.select(cond, when_true.limb, when_false.limb);
            let value = if cond.value { when_true.value } else { when_false.value };
            EmulatedElement::new(limb, value)
        })
    }

    pub fn assert_is_equal(&self, builder: &mut R1csBuilder, a: &EmulatedElement<P>, b: &EmulatedElement<P>) {
        builder.scoped("emulated.assert_is_equal", |builder| builder.enforce_eq(a.limb, b.limb));
    }

    /// Little-endian bits covering `[0, p)`.
    pub fn to_bits(&self, builder: &mut R1csBuilder, a: &EmulatedElement<P>) -> Vec<Boolean> {
        builder.scoped("emulated.to_bits", |builder| builder.decompose_to_bits(a.limb, self.modulus_bits))
    }
}

fn bit_length(value: u128) -> usize {
    (128 - value.leading_zeros()) as usize
}
