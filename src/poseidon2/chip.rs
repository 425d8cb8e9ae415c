//! Poseidon2 permutation expressed as BabyBear chip calls.

use crate::chips::{BabyBearChip, Variable};
use crate::errors::GadgetResult;
use crate::field::BabyBear;
use crate::r1cs::R1csBuilder;

use super::config::Poseidon2Config;
use super::constants::{
    EXTERNAL_ROUND_CONSTANTS, INTERNAL_DIAGONAL, INTERNAL_ROUND_CONSTANTS, MONTY_INVERSE,
    NUM_EXTERNAL_ROUNDS, NUM_INTERNAL_ROUNDS, WIDTH,
};

pub type StateVariable = [Variable; WIDTH];

#[derive(Debug, Clone)]
pub struct Poseidon2BabyBearChip {
    field: BabyBearChip,
    config: Poseidon2Config,
    external_constants: [[BabyBear; WIDTH]; NUM_EXTERNAL_ROUNDS],
    internal_constants: [BabyBear; NUM_INTERNAL_ROUNDS],
    /// `diag[i] * 2^-32`, so the internal layer needs one constant product per lane.
    scaled_diagonal: [BabyBear; WIDTH],
    monty_inverse: BabyBear,
}

impl Poseidon2BabyBearChip {
    pub fn new(config: Poseidon2Config) -> GadgetResult<Self> {
        Self::from_chip(BabyBearChip::new()?, config)
    }

    /// Builds the permutation on an existing field chip, so one circuit can
    /// share it with an extension chip.
    pub fn from_chip(field: BabyBearChip, config: Poseidon2Config) -> GadgetResult<Self> {
        config.validate()?;
        let monty_inverse = BabyBear::new(MONTY_INVERSE);
        Ok(Self {
            field,
            config,
            external_constants: EXTERNAL_ROUND_CONSTANTS.map(|row| row.map(BabyBear::new)),
            internal_constants: INTERNAL_ROUND_CONSTANTS.map(BabyBear::new),
            scaled_diagonal: INTERNAL_DIAGONAL.map(|d| BabyBear::new(d) * monty_inverse),
            monty_inverse,
        })
    }

    pub fn field(&self) -> &BabyBearChip {
        &self.field
    }

    pub fn permute(&self, builder: &mut R1csBuilder, mut state: StateVariable) -> StateVariable {
        self.permute_mut(builder, &mut state);
        state
    }

    pub fn permute_mut(&self, builder: &mut R1csBuilder, state: &mut StateVariable) {
        builder.scoped("poseidon2.permute", |builder| {
            let start = builder.num_constraints();
            self.external_linear_layer(builder, state);

            let (first_half, second_half) = self.external_constants.split_at(self.config.half_full_rounds());
            for rc in first_half {
                self.full_round(builder, state, rc);
            }
            tracing::debug!(constraints = builder.num_constraints() - start, "[poseidon2] first external half");

            builder.scoped("internal_round", |builder| {
                for rc in &self.internal_constants {
                    state[0] = self.field.add_const(builder, state[0], *rc);
                    state[0] = self.sbox_p(builder, state[0]);
                    self.internal_linear_layer(builder, state);
                }
            });
            tracing::debug!(constraints = builder.num_constraints() - start, "[poseidon2] internal rounds");

            for rc in second_half {
                self.full_round(builder, state, rc);
            }
            tracing::debug!(constraints = builder.num_constraints() - start, "[poseidon2] permutation");
        })
    }

    fn full_round(&self, builder: &mut R1csBuilder, state: &mut StateVariable, rc: &[BabyBear; WIDTH]) {
        builder.scoped("external_round", |builder| {
            self.add_rc(builder, state, rc);
            self.sbox(builder, state);
            self.external_linear_layer(builder, state);
        })
    }

    fn add_rc(&self, builder: &mut R1csBuilder, state: &mut StateVariable, rc: &[BabyBear; WIDTH]) {
        for (x, c) in state.iter_mut().zip(rc) {
            *x = self.field.add_const(builder, *x, *c);
        }
    }

    /// x^7 via x^2, x^4, x^6, x^7.
    fn sbox_p(&self, builder: &mut R1csBuilder, input: Variable) -> Variable {
        builder.scoped("sbox", |builder| {
            let squared = self.field.mul(builder, input, input);
            let input4 = self.field.mul(builder, squared, squared);
            let input6 = self.field.mul(builder, squared, input4);
            self.field.mul(builder, input6, input)
        })
    }

    fn sbox(&self, builder: &mut R1csBuilder, state: &mut StateVariable) {
        for x in state.iter_mut() {
            *x = self.sbox_p(builder, *x);
        }
    }

    fn mds_light_4x4(&self, builder: &mut R1csBuilder, block: &mut [Variable]) {
        let two = BabyBear::TWO;
        let t01 = self.field.add(builder, block[0], block[1]);
        let t23 = self.field.add(builder, block[2], block[3]);
        let t0123 = self.field.add(builder, t01, t23);
        let t01123 = self.field.add(builder, t0123, block[1]);
        let t01233 = self.field.add(builder, t0123, block[3]);
        let s0_doubled = self.field.mul_const(builder, block[0], two);
        let s2_doubled = self.field.mul_const(builder, block[2], two);
        block[3] = self.field.add(builder, t01233, s0_doubled);
        block[1] = self.field.add(builder, t01123, s2_doubled);
        block[0] = self.field.add(builder, t01123, t01);
        block[2] = self.field.add(builder, t01233, t23);
    }

    /// 4x4 light MDS per block, then add each column sum across blocks.
    pub fn external_linear_layer(&self, builder: &mut R1csBuilder, state: &mut StateVariable) {
        builder.scoped("external_linear_layer", |builder| {
            for block in state.chunks_exact_mut(4) {
                self.mds_light_4x4(builder, block);
            }
            let mut sums: [Variable; 4] = [state[0], state[1], state[2], state[3]];
            for block in state[4..].chunks_exact(4) {
                for (sum, x) in sums.iter_mut().zip(block) {
                    *sum = self.field.add(builder, *sum, *x);
                }
            }
            for (i, x) in state.iter_mut().enumerate() {
                *x = self.field.add(builder, *x, sums[i % 4]);
            }
        })
    }

    /// `new[i] = (state[i] * diag[i] + sum(state)) * 2^-32`
    pub fn internal_linear_layer(&self, builder: &mut R1csBuilder, state: &mut StateVariable) {
        builder.scoped("internal_linear_layer", |builder| {
            let mut total = state[0];
            for x in &state[1..] {
                total = self.field.add(builder, total, *x);
            }
            let total_scaled = self.field.mul_const(builder, total, self.monty_inverse);
            for (x, d) in state.iter_mut().zip(self.scaled_diagonal) {
                let scaled = self.field.mul_const(builder, *x, d);
                *x = self.field.add(builder, scaled, total_scaled);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poseidon2::native::{external_linear_layer, internal_linear_layer};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn alloc_state(chip: &Poseidon2BabyBearChip, builder: &mut R1csBuilder, values: [BabyBear; WIDTH]) -> StateVariable {
        values.map(|v| chip.field().alloc(builder, v))
    }

    #[test]
    fn linear_layers_match_reference() {
        let chip = Poseidon2BabyBearChip::new(Poseidon2Config::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let values: [BabyBear; WIDTH] = std::array::from_fn(|_| BabyBear::rand(&mut rng));
        let mut builder = R1csBuilder::new();

        let mut external = alloc_state(&chip, &mut builder, values);
        chip.external_linear_layer(&mut builder, &mut external);
        let mut expected = values;
        external_linear_layer(&mut expected);
        assert_eq!(external.map(|v| v.witness()), expected);

        let mut internal = alloc_state(&chip, &mut builder, values);
        chip.internal_linear_layer(&mut builder, &mut internal);
        let mut expected = values;
        internal_linear_layer(&mut expected);
        assert_eq!(internal.map(|v| v.witness()), expected);

        let (instance, witness) = builder.finalize().unwrap();
        instance.check(&witness).unwrap();
    }

    #[test]
    fn rejects_unsupported_config() {
        let config = Poseidon2Config {
            sbox_degree: 3,
            ..Default::default()
        };
        assert!(Poseidon2BabyBearChip::new(config).is_err());
    }
}
