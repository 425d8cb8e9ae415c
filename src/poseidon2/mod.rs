//! Poseidon2 over BabyBear, width 16: constants, reference permutation and chip.
//!
//! Both implementations run the same schedule: an initial external linear
//! layer, four full rounds, thirteen partial rounds (constant and S-box on
//! lane 0 only, then the internal diffusion layer), and four more full rounds.

pub mod chip;
pub mod config;
pub mod constants;
pub mod native;

pub use chip::{Poseidon2BabyBearChip, StateVariable};
pub use config::Poseidon2Config;
pub use constants::{KNOWN_ANSWER_INPUT, KNOWN_ANSWER_OUTPUT, WIDTH};
pub use native::Poseidon2BabyBear;
