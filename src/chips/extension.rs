//! Arithmetic in BabyBear[x]/(x^4 - 11), built from base-field chip calls.

use ark_ff::{One, Zero};

use crate::errors::{GadgetError, GadgetResult};
use crate::field::native::F;
use crate::field::{BabyBear, BabyBearExt4, EXTENSION_DEGREE, EXTENSION_NON_RESIDUE};
use crate::r1cs::{Boolean, R1csBuilder};

use super::babybear::{BabyBearChip, Variable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionVariable {
    pub coeffs: [Variable; EXTENSION_DEGREE],
}

impl ExtensionVariable {
    pub fn witness(&self) -> BabyBearExt4 {
        BabyBearExt4::new(self.coeffs.map(|c| c.witness()))
    }
}

#[derive(Debug, Clone)]
pub struct BabyBearExtensionChip {
    base: BabyBearChip,
}

impl BabyBearExtensionChip {
    pub fn new() -> GadgetResult<Self> {
        Ok(Self {
            base: BabyBearChip::new()?,
        })
    }

    pub fn from_chip(base: BabyBearChip) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BabyBearChip {
        &self.base
    }

    fn map2(
        &self,
        builder: &mut R1csBuilder,
        a: ExtensionVariable,
        b: ExtensionVariable,
        op: impl Fn(&BabyBearChip, &mut R1csBuilder, Variable, Variable) -> Variable,
    ) -> ExtensionVariable {
        ExtensionVariable {
            coeffs: std::array::from_fn(|i| op(&self.base, builder, a.coeffs[i], b.coeffs[i])),
        }
    }

    pub fn constant(&self, builder: &mut R1csBuilder, value: BabyBearExt4) -> ExtensionVariable {
        ExtensionVariable {
            coeffs: value.coeffs.map(|c| self.base.constant(builder, c)),
        }
    }

    pub fn alloc(&self, builder: &mut R1csBuilder, value: BabyBearExt4) -> ExtensionVariable {
        ExtensionVariable {
            coeffs: value.coeffs.map(|c| self.base.alloc(builder, c)),
        }
    }

    /// Embeds a base-field value as `(a, 0, 0, 0)`.
    pub fn from_base(&self, builder: &mut R1csBuilder, a: Variable) -> ExtensionVariable {
        let zero = self.base.constant(builder, BabyBear::ZERO);
        ExtensionVariable {
            coeffs: [a, zero, zero, zero],
        }
    }

    pub fn add(&self, builder: &mut R1csBuilder, a: ExtensionVariable, b: ExtensionVariable) -> ExtensionVariable {
        builder.scoped("extension.add", |builder| self.map2(builder, a, b, BabyBearChip::add))
    }

    pub fn sub(&self, builder: &mut R1csBuilder, a: ExtensionVariable, b: ExtensionVariable) -> ExtensionVariable {
        builder.scoped("extension.sub", |builder| self.map2(builder, a, b, BabyBearChip::sub))
    }

    pub fn neg(&self, builder: &mut R1csBuilder, a: ExtensionVariable) -> ExtensionVariable {
        builder.scoped("extension.neg", |builder| ExtensionVariable {
            coeffs: a.coeffs.map(|c| self.base.neg(builder, c)),
        })
    }

    /// Schoolbook product; degrees 4..=6 fold back with x^4 = 11.
    pub fn mul(&self, builder: &mut R1csBuilder, a: ExtensionVariable, b: ExtensionVariable) -> ExtensionVariable {
        builder.scoped("extension.mul", |builder| {
            let mut acc: [Option<Variable>; 2 * EXTENSION_DEGREE - 1] = [None; 2 * EXTENSION_DEGREE - 1];
            for i in 0..EXTENSION_DEGREE {
                for j in 0..EXTENSION_DEGREE {
                    let term = self.base.mul(builder, a.coeffs[i], b.coeffs[j]);
                    acc[i + j] = Some(match acc[i + j] {
                        Some(sum) => self.base.add(builder, sum, term),
                        None => term,
                    });
                }
            }
            let mut coeffs = [None; EXTENSION_DEGREE];
            for (degree, slot) in acc.into_iter().enumerate() {
                let Some(value) = slot else { continue };
                if degree < EXTENSION_DEGREE {
                    coeffs[degree] = Some(match coeffs[degree] {
                        Some(low) => self.base.add(builder, low, value),
                        None => value,
                    });
                } else {
                    let folded = self.base.mul_const(builder, value, EXTENSION_NON_RESIDUE);
                    let low = degree - EXTENSION_DEGREE;
                    coeffs[low] = Some(match coeffs[low] {
                        Some(existing) => self.base.add(builder, existing, folded),
                        None => folded,
                    });
                }
            }
            let zero = self.base.constant(builder, BabyBear::ZERO);
            ExtensionVariable {
                coeffs: coeffs.map(|c| c.unwrap_or(zero)),
            }
        })
    }

    pub fn select(
        &self,
        builder: &mut R1csBuilder,
        cond: Boolean,
        a: ExtensionVariable,
        b: ExtensionVariable,
    ) -> ExtensionVariable {
        builder.scoped("extension.select", |builder| {
            self.map2(builder, a, b, |chip, builder, x, y| chip.select(builder, cond, x, y))
        })
    }

    pub fn assert_eq(&self, builder: &mut R1csBuilder, a: ExtensionVariable, b: ExtensionVariable) {
        builder.scoped("extension.assert_eq", |builder| {
            for (x, y) in a.coeffs.into_iter().zip(b.coeffs) {
                self.base.assert_eq(builder, x, y);
            }
        })
    }

    /// Fails only when all four coefficient differences are zero.
    pub fn assert_ne(&self, builder: &mut R1csBuilder, a: ExtensionVariable, b: ExtensionVariable) {
        builder.scoped("extension.assert_ne", |builder| {
            let [z0, z1, z2, z3] = std::array::from_fn(|i| {
                let diff = self.base.sub(builder, a.coeffs[i], b.coeffs[i]);
                self.base.is_zero(builder, diff)
            });
            let low = builder.and(z0, z1);
            let high = builder.and(z2, z3);
            let all_zero = builder.and(low, high);
            builder.enforce_linear_relation(&[(all_zero.var, F::one())], F::zero());
        })
    }

    /// Inverse checked by `a * inv = 1`. The witness comes from the norm map;
    /// for `a = 0` no inverse exists and the product constraint is unsatisfiable.
    pub fn inv(&self, builder: &mut R1csBuilder, a: ExtensionVariable) -> ExtensionVariable {
        builder.scoped("extension.inv", |builder| {
            let value = match a.witness().inverse() {
                Some(inv) => inv,
                None => {
                    builder.record_fault(GadgetError::division_by_zero("extension.inv"));
                    BabyBearExt4::zero()
                }
            };
            let inv = self.alloc(builder, value);
            let product = self.mul(builder, a, inv);
            let one = self.constant(builder, BabyBearExt4::one());
            self.assert_eq(builder, product, one);
            inv
        })
    }

    pub fn div(&self, builder: &mut R1csBuilder, a: ExtensionVariable, b: ExtensionVariable) -> ExtensionVariable {
        builder.scoped("extension.div", |builder| {
            let b_inv = self.inv(builder, b);
            self.mul(builder, a, b_inv)
        })
    }

    pub fn add_base(&self, builder: &mut R1csBuilder, a: ExtensionVariable, b: Variable) -> ExtensionVariable {
        builder.scoped("extension.add_base", |builder| {
            let mut coeffs = a.coeffs;
            coeffs[0] = self.base.add(builder, coeffs[0], b);
            ExtensionVariable { coeffs }
        })
    }

    pub fn sub_base(&self, builder: &mut R1csBuilder, a: ExtensionVariable, b: Variable) -> ExtensionVariable {
        builder.scoped("extension.sub_base", |builder| {
            let mut coeffs = a.coeffs;
            coeffs[0] = self.base.sub(builder, coeffs[0], b);
            ExtensionVariable { coeffs }
        })
    }

    pub fn mul_base(&self, builder: &mut R1csBuilder, a: ExtensionVariable, b: Variable) -> ExtensionVariable {
        builder.scoped("extension.mul_base", |builder| ExtensionVariable {
            coeffs: a.coeffs.map(|c| self.base.mul(builder, c, b)),
        })
    }

    pub fn to_felts(&self, a: ExtensionVariable) -> [Variable; EXTENSION_DEGREE] {
        a.coeffs
    }

    pub fn from_felts(&self, coeffs: [Variable; EXTENSION_DEGREE]) -> ExtensionVariable {
        ExtensionVariable { coeffs }
    }
}
