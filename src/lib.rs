//! BabyBear gadgets: BabyBear arithmetic and Poseidon2 inside BN254 circuits
//!
//! This library provides three layers of circuit gadgets over the BN254
//! scalar field:
//!
//! 1. **BabyBear field chip**: range-checked emulation of p = 2013265921,
//!    plus packing helpers between native elements and BabyBear values.
//! 2. **Quartic extension chip**: BabyBear[x]/(x^4 - 11), built on the
//!    base-field chip.
//! 3. **Poseidon2 chip**: the width-16 BabyBear permutation.
//!
//! Circuits are assembled with an [`R1csBuilder`] and checked for
//! satisfiability against their witness:
//!
//! ```rust
//! use babybear_gadgets::{BabyBear, BabyBearChip, R1csBuilder};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let chip = BabyBearChip::new()?;
//! let mut builder = R1csBuilder::new();
//!
//! let a = chip.alloc(&mut builder, BabyBear::new(1_000_000_007));
//! let b = chip.alloc(&mut builder, BabyBear::new(3));
//! let product = chip.mul(&mut builder, a, b);
//! assert_eq!(product.witness(), BabyBear::new(1_000_000_007) * BabyBear::new(3));
//!
//! let (instance, witness) = builder.finalize()?;
//! instance.check(&witness)?;
//! # Ok(())
//! # }
//! ```
//!
//! The Poseidon2 known-answer vector runs through the harness:
//!
//! ```rust,no_run
//! use babybear_gadgets::harness::{run_circuit_test, CircuitTestConfig, Poseidon2KnownAnswerCircuit};
//!
//! let report = run_circuit_test(
//!     &Poseidon2KnownAnswerCircuit::default(),
//!     &CircuitTestConfig::labeled("poseidon2"),
//! )?;
//! println!("{} constraints", report.num_constraints);
//! # Ok::<(), babybear_gadgets::GadgetError>(())
//! ```

pub mod chips;
pub mod emulated;
pub mod errors;
pub mod field;
pub mod harness;
pub mod poseidon2;
pub mod r1cs;


// Re-export commonly used types for convenience
pub use chips::{BabyBearChip, BabyBearExtensionChip, ExtensionVariable, Variable};
pub use errors::{GadgetError, GadgetResult};
pub use field::{BabyBear, BabyBearExt4};
pub use poseidon2::{Poseidon2BabyBear, Poseidon2BabyBearChip, Poseidon2Config};
pub use r1cs::{Boolean, R1csBuilder, R1csInstance, R1csWitness};
