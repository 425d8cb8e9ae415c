//! Out-of-circuit field arithmetic
//!
//! `BabyBear` and `BabyBearExt4` compute witnesses and act as oracles for the
//! chips; `native` wraps the BN254 scalar field the circuits are expressed in.

pub mod babybear;
pub mod extension;
pub mod native;

pub use babybear::{BabyBear, BABYBEAR_BITS, BABYBEAR_MODULUS};
pub use extension::{BabyBearExt4, EXTENSION_DEGREE, EXTENSION_NON_RESIDUE};
pub use native::F;
