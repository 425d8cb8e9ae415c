//! In-circuit BabyBear arithmetic.

pub mod babybear;
pub mod extension;

pub use babybear::{BabyBearChip, BabyBearParams, Variable, CHUNKS_PER_NATIVE, CHUNK_BITS};
pub use extension::{BabyBearExtensionChip, ExtensionVariable};
