//! Rank-1 constraint systems over the BN254 scalar field.

pub mod ark_serde;
pub mod builder;
pub mod instance;

pub use builder::{Boolean, R1csBuilder, SparseLC, ONE};
pub use instance::{ConstraintAnnotation, R1csConstraint, R1csInstance, R1csWitness};
