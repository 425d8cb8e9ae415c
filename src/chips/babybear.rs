use ark_ff::{One, Zero};

use crate::emulated::{EmulatedElement, EmulatedField, FieldParams};
use crate::errors::GadgetResult;
use crate::field::native::{u64_to_field, F};
use crate::field::{BabyBear, BABYBEAR_MODULUS};
use crate::r1cs::{Boolean, R1csBuilder};

/// Bits per chunk when unpacking a native element into BabyBear values.
pub const CHUNK_BITS: usize = 32;

/// Chunks packed into one native element by [`BabyBearChip::split_into_babybear`].
pub const CHUNKS_PER_NATIVE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BabyBearParams;

impl FieldParams for BabyBearParams {
    const NB_LIMBS: usize = 1;
    const BITS_PER_LIMB: usize = 32;
    const MODULUS: u64 = BABYBEAR_MODULUS as u64;
    const IS_PRIME: bool = true;
}

/// In-circuit BabyBear value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    element: EmulatedElement<BabyBearParams>,
}

impl Variable {
    /// Witness value, reduced into the field.
    pub fn witness(&self) -> BabyBear {
        BabyBear::from_u64(self.element.value())
    }

    pub fn limb(&self) -> usize {
        self.element.limb()
    }
}

impl From<EmulatedElement<BabyBearParams>> for Variable {
    fn from(element: EmulatedElement<BabyBearParams>) -> Self {
        Self { element }
    }
}

#[derive(Debug, Clone)]
pub struct BabyBearChip {
    field: EmulatedField<BabyBearParams>,
}

impl BabyBearChip {
    pub fn new() -> GadgetResult<Self> {
        Ok(Self {
            field: EmulatedField::new()?,
        })
    }

    pub fn constant(&self, builder: &mut R1csBuilder, value: BabyBear) -> Variable {
        builder.scoped("babybear.constant", |builder| {
            Variable::from(self.field.constant(builder, value.as_u64()))
        })
    }

    /// Allocates a range-checked witness.
    pub fn alloc(&self, builder: &mut R1csBuilder, value: BabyBear) -> Variable {
        self.alloc_u64(builder, value.as_u64())
    }

    /// Allocates an arbitrary integer witness; values `>= p` fail the range proof.
    pub fn alloc_u64(&self, builder: &mut R1csBuilder, value: u64) -> Variable {
        builder.scoped("babybear.alloc", |builder| Variable::from(self.field.new_element(builder, value)))
    }

    pub fn add(&self, builder: &mut R1csBuilder, a: Variable, b: Variable) -> Variable {
        builder.scoped("babybear.add", |builder| Variable::from(self.field.add(builder, &a.element, &b.element)))
    }

    pub fn sub(&self, builder: &mut R1csBuilder, a: Variable, b: Variable) -> Variable {
        builder.scoped("babybear.sub", |builder| Variable::from(self.field.sub(builder, &a.element, &b.element)))
    }

    pub fn mul(&self, builder: &mut R1csBuilder, a: Variable, b: Variable) -> Variable {
        builder.scoped("babybear.mul", |builder| Variable::from(self.field.mul(builder, &a.element, &b.element)))
    }

    pub fn neg(&self, builder: &mut R1csBuilder, a: Variable) -> Variable {
        builder.scoped("babybear.neg", |builder| Variable::from(self.field.neg(builder, &a.element)))
    }

    /// Modular inverse. `inv(0)` records a `DivisionByZero` fault and leaves
    /// the circuit unsatisfiable.
    pub fn inv(&self, builder: &mut R1csBuilder, a: Variable) -> Variable {
        builder.scoped("babybear.inv", |builder| Variable::from(self.field.inverse(builder, &a.element)))
    }

    pub fn div(&self, builder: &mut R1csBuilder, a: Variable, b: Variable) -> Variable {
        builder.scoped("babybear.div", |builder| {
            let b_inv = self.field.inverse(builder, &b.element);
            Variable::from(self.field.mul(builder, &a.element, &b_inv))
        })
    }

    pub fn add_const(&self, builder: &mut R1csBuilder, a: Variable, constant: BabyBear) -> Variable {
        builder.scoped("babybear.add_const", |builder| {
            let c = self.field.constant(builder, constant.as_u64());
            Variable::from(self.field.add(builder, &a.element, &c))
        })
    }

    pub fn mul_const(&self, builder: &mut R1csBuilder, a: Variable, constant: BabyBear) -> Variable {
        builder.scoped("babybear.mul_const", |builder| {
            Variable::from(self.field.mul_const(builder, &a.element, constant.as_u64()))
        })
    }

    pub fn assert_eq(&self, builder: &mut R1csBuilder, a: Variable, b: Variable) {
        builder.scoped("babybear.assert_eq", |builder| {
            self.field.assert_is_equal(builder, &a.element, &b.element)
        })
    }

    /// Asserts that `a - b` is not zero.
    pub fn assert_ne(&self, builder: &mut R1csBuilder, a: Variable, b: Variable) {
        builder.scoped("babybear.assert_ne", |builder| {
            let diff = self.field.sub(builder, &a.element, &b.element);
            let is_zero = self.field.is_zero(builder, &diff);
            builder.enforce_linear_relation(&[(is_zero.var, F::one())], F::zero());
        })
    }

    /// Boolean that is 1 iff `a = 0`.
    pub fn is_zero(&self, builder: &mut R1csBuilder, a: Variable) -> Boolean {
        builder.scoped("babybear.is_zero", |builder| self.field.is_zero(builder, &a.element))
    }

    pub fn select(&self, builder: &mut R1csBuilder, cond: Boolean, a: Variable, b: Variable) -> Variable {
        builder.scoped("babybear.select", |builder| {
            Variable::from(self.field.select(builder, cond, &a.element, &b.element))
        })
    }

    /// Little-endian bits covering `[0, p)`.
    pub fn to_binary(&self, builder: &mut R1csBuilder, a: Variable) -> Vec<Boolean> {
        builder.scoped("babybear.to_binary", |builder| self.field.to_bits(builder, &a.element))
    }

    /// The limb as a native variable; canonical, so no further constraint.
    pub fn to_native(&self, a: Variable) -> usize {
        a.limb()
    }

    /// Reduces a native variable of at most 32 bits into the field.
    pub fn from_native(&self, builder: &mut R1csBuilder, native: usize) -> Variable {
        builder.scoped("babybear.from_native", |builder| {
            Variable::from(self.field.new_element_from_native(builder, native))
        })
    }

    /// Splits a native element below 2^96 into three 32-bit chunk variables,
    /// constrained so that `c0 + c1 * 2^32 + c2 * 2^64 = x`.
    pub fn split_into_chunks(&self, builder: &mut R1csBuilder, native: usize) -> [usize; CHUNKS_PER_NATIVE] {
        builder.scoped("babybear.split_chunks", |builder| {
            let bits = builder.to_binary(native, CHUNK_BITS * CHUNKS_PER_NATIVE);
            std::array::from_fn(|chunk| {
                let window = &bits[chunk * CHUNK_BITS..(chunk + 1) * CHUNK_BITS];
                let value = window
                    .iter()
                    .enumerate()
                    .fold(0u64, |acc, (i, bit)| acc | ((bit.value as u64) << i));
                let var = builder.alloc(u64_to_field(value));
                let terms = window
                    .iter()
                    .enumerate()
                    .map(|(i, bit)| (bit.var, u64_to_field(1u64 << i)))
                    .collect::<Vec<_>>();
                builder.enforce_sum_equals(&terms, var);
                var
            })
        })
    }

    /// Unpacks three BabyBear values from one native element. Each 32-bit
    /// chunk is reduced modulo p, so chunks that were packed canonical come
    /// back unchanged.
    pub fn split_into_babybear(&self, builder: &mut R1csBuilder, native: usize) -> [Variable; CHUNKS_PER_NATIVE] {
        builder.scoped("babybear.split", |builder| {
            let chunks = self.split_into_chunks(builder, native);
            chunks.map(|chunk| Variable::from(self.field.new_element_from_bounded(builder, chunk)))
        })
    }
}
