use serde::{Deserialize, Serialize};

use crate::errors::{GadgetError, GadgetResult};

use super::constants::{NUM_EXTERNAL_ROUNDS, NUM_INTERNAL_ROUNDS, SBOX_DEGREE, WIDTH};

/// Requested Poseidon2 shape. Only the BabyBear width-16 instance
/// (8 full rounds, 13 partial rounds, x^7) is available; anything else is
/// rejected when a permutation is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Poseidon2Config {
    pub width: usize,
    pub rounds_f: usize,
    pub rounds_p: usize,
    pub sbox_degree: u64,
}

impl Default for Poseidon2Config {
    fn default() -> Self {
        Self {
            width: WIDTH,
            rounds_f: NUM_EXTERNAL_ROUNDS,
            rounds_p: NUM_INTERNAL_ROUNDS,
            sbox_degree: SBOX_DEGREE,
        }
    }
}

impl Poseidon2Config {
    pub const fn half_full_rounds(&self) -> usize {
        self.rounds_f / 2
    }

    pub fn validate(&self) -> GadgetResult<()> {
        let expected = Self::default();
        if self.width != expected.width {
            return Err(GadgetError::unsupported_parameter(
                "width",
                &format!("expected {}, got {}", expected.width, self.width),
            ));
        }
        if self.sbox_degree != expected.sbox_degree {
            return Err(GadgetError::unsupported_parameter(
                "sbox_degree",
                &format!("expected {}, got {}", expected.sbox_degree, self.sbox_degree),
            ));
        }
        if self.rounds_f != expected.rounds_f {
            return Err(GadgetError::unsupported_parameter(
                "rounds_f",
                &format!("expected {}, got {}", expected.rounds_f, self.rounds_f),
            ));
        }
        if self.rounds_p != expected.rounds_p {
            return Err(GadgetError::unsupported_parameter(
                "rounds_p",
                &format!("expected {}, got {}", expected.rounds_p, self.rounds_p),
            ));
        }
        Ok(())
    }
}
