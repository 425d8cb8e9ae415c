//! Out-of-circuit Poseidon2 over BabyBear, used for witnesses and as an oracle.

use crate::errors::GadgetResult;
use crate::field::BabyBear;

use super::config::Poseidon2Config;
use super::constants::{
    EXTERNAL_ROUND_CONSTANTS, INTERNAL_DIAGONAL, INTERNAL_ROUND_CONSTANTS, MONTY_INVERSE,
    NUM_EXTERNAL_ROUNDS, NUM_INTERNAL_ROUNDS, SBOX_DEGREE, WIDTH,
};

pub type State = [BabyBear; WIDTH];

#[derive(Debug, Clone)]
pub struct Poseidon2BabyBear {
    config: Poseidon2Config,
    external_constants: [State; NUM_EXTERNAL_ROUNDS],
    internal_constants: [BabyBear; NUM_INTERNAL_ROUNDS],
}

impl Default for Poseidon2BabyBear {
    fn default() -> Self {
        Self {
            config: Poseidon2Config::default(),
            external_constants: EXTERNAL_ROUND_CONSTANTS.map(|row| row.map(BabyBear::new)),
            internal_constants: INTERNAL_ROUND_CONSTANTS.map(BabyBear::new),
        }
    }
}

impl Poseidon2BabyBear {
    pub fn new(config: Poseidon2Config) -> GadgetResult<Self> {
        config.validate()?;
        Ok(Self::default())
    }

    pub fn permute(&self, mut state: State) -> State {
        self.permute_mut(&mut state);
        state
    }

    pub fn permute_mut(&self, state: &mut State) {
        external_linear_layer(state);

        let (first_half, second_half) = self.external_constants.split_at(self.config.half_full_rounds());
        for rc in first_half {
            full_round(state, rc);
        }
        for rc in &self.internal_constants {
            state[0] = sbox(state[0] + *rc);
            internal_linear_layer(state);
        }
        for rc in second_half {
            full_round(state, rc);
        }
    }
}

fn full_round(state: &mut State, rc: &State) {
    for (x, c) in state.iter_mut().zip(rc) {
        *x = sbox(*x + *c);
    }
    external_linear_layer(state);
}

pub fn sbox(x: BabyBear) -> BabyBear {
    x.pow(SBOX_DEGREE)
}

fn mds_light_4x4(block: &mut [BabyBear]) {
    let t01 = block[0] + block[1];
    let t23 = block[2] + block[3];
    let t0123 = t01 + t23;
    let t01123 = t0123 + block[1];
    let t01233 = t0123 + block[3];
    block[3] = t01233 + block[0].double();
    block[1] = t01123 + block[2].double();
    block[0] = t01123 + t01;
    block[2] = t01233 + t23;
}

/// 4x4 light MDS per block, then add each column sum across blocks.
pub fn external_linear_layer(state: &mut State) {
    for block in state.chunks_exact_mut(4) {
        mds_light_4x4(block);
    }
    let sums: [BabyBear; 4] = std::array::from_fn(|col| state.iter().skip(col).step_by(4).copied().sum());
    for (i, x) in state.iter_mut().enumerate() {
        *x += sums[i % 4];
    }
}

/// `new[i] = (state[i] * diag[i] + sum(state)) * 2^-32`
pub fn internal_linear_layer(state: &mut State) {
    let total: BabyBear = state.iter().copied().sum();
    let scale = BabyBear::new(MONTY_INVERSE);
    for (x, d) in state.iter_mut().zip(INTERNAL_DIAGONAL) {
        *x = (*x * BabyBear::new(d) + total) * scale;
    }
}
