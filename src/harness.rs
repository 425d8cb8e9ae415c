//! Circuit test harness
//!
//! A circuit is synthesized into a fresh builder, finalized, and checked for
//! satisfiability. All knobs travel in a [`CircuitTestConfig`] value, so
//! concurrent runs share nothing.

use serde::{Deserialize, Serialize};

use crate::errors::{GadgetError, GadgetResult};
use crate::field::BabyBear;
use crate::poseidon2::constants::{KNOWN_ANSWER_INPUT, KNOWN_ANSWER_OUTPUT, WIDTH};
use crate::poseidon2::{Poseidon2BabyBear, Poseidon2BabyBearChip, Poseidon2Config};
use crate::r1cs::R1csBuilder;

pub trait Circuit {
    fn synthesize(&self, builder: &mut R1csBuilder) -> GadgetResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitTestConfig {
    pub label: String,
    /// Upper bound on emitted constraints, if any.
    pub max_constraints: Option<usize>,
    /// Return the first witness fault instead of checking the constraints.
    pub fail_on_witness_fault: bool,
}

impl Default for CircuitTestConfig {
    fn default() -> Self {
        Self {
            label: "circuit".to_string(),
            max_constraints: None,
            fail_on_witness_fault: false,
        }
    }
}

impl CircuitTestConfig {
    pub fn labeled(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitReport {
    pub label: String,
    pub num_variables: usize,
    pub num_constraints: usize,
    pub digest: [u8; 32],
}

impl CircuitReport {
    pub fn digest_hex(&self) -> String {
        self.digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

pub fn run_circuit_test<C: Circuit + ?Sized>(
    circuit: &C,
    config: &CircuitTestConfig,
) -> GadgetResult<CircuitReport> {
    let mut builder = R1csBuilder::new();
    circuit.synthesize(&mut builder)?;
    if config.fail_on_witness_fault {
        if let Some(fault) = builder.faults().first() {
            return Err(fault.clone());
        }
    }

    let (instance, witness) = builder.finalize()?;
    if let Some(limit) = config.max_constraints {
        if instance.num_constraints() > limit {
            return Err(GadgetError::invalid_parameters(&format!(
                "{} emits {} constraints, limit is {}",
                config.label,
                instance.num_constraints(),
                limit
            )));
        }
    }
    instance.check(&witness)?;

    let report = CircuitReport {
        label: config.label.clone(),
        num_variables: instance.num_variables,
        num_constraints: instance.num_constraints(),
        digest: instance.digest(),
    };
    tracing::info!(
        label = %report.label,
        num_variables = report.num_variables,
        num_constraints = report.num_constraints,
        "circuit satisfied"
    );
    Ok(report)
}

/// One permutation of `input`, asserted equal to `expected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poseidon2KnownAnswerCircuit {
    pub input: [BabyBear; WIDTH],
    pub expected: [BabyBear; WIDTH],
    pub config: Poseidon2Config,
}

impl Default for Poseidon2KnownAnswerCircuit {
    fn default() -> Self {
        Self {
            input: KNOWN_ANSWER_INPUT.map(BabyBear::new),
            expected: KNOWN_ANSWER_OUTPUT.map(BabyBear::new),
            config: Poseidon2Config::default(),
        }
    }
}

impl Circuit for Poseidon2KnownAnswerCircuit {
    fn synthesize(&self, builder: &mut R1csBuilder) -> GadgetResult<()> {
        let chip = Poseidon2BabyBearChip::new(self.config)?;
        let state = self.input.map(|v| chip.field().alloc(builder, v));
        let output = chip.permute(builder, state);
        builder.scoped("known_answer", |builder| {
            for (out, expected) in output.into_iter().zip(self.expected) {
                let expected = chip.field().constant(builder, expected);
                chip.field().assert_eq(builder, out, expected);
            }
        });
        Ok(())
    }
}

/// `permutations` chained permutations, final state checked against the
/// reference implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poseidon2ChainCircuit {
    pub input: [BabyBear; WIDTH],
    pub permutations: usize,
}

impl Circuit for Poseidon2ChainCircuit {
    fn synthesize(&self, builder: &mut R1csBuilder) -> GadgetResult<()> {
        let config = Poseidon2Config::default();
        let chip = Poseidon2BabyBearChip::new(config)?;
        let reference = Poseidon2BabyBear::new(config)?;

        let mut state = self.input.map(|v| chip.field().alloc(builder, v));
        let mut expected = self.input;
        for _ in 0..self.permutations {
            chip.permute_mut(builder, &mut state);
            reference.permute_mut(&mut expected);
        }
        for (out, value) in state.into_iter().zip(expected) {
            let value = chip.field().constant(builder, value);
            chip.field().assert_eq(builder, out, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FaultyInverse;

    impl Circuit for FaultyInverse {
        fn synthesize(&self, builder: &mut R1csBuilder) -> GadgetResult<()> {
            let chip = crate::chips::BabyBearChip::new()?;
            let zero = chip.alloc(builder, BabyBear::ZERO);
            chip.inv(builder, zero);
            Ok(())
        }
    }

    #[test]
    fn fault_policy_selects_error() {
        let lenient = run_circuit_test(&FaultyInverse, &CircuitTestConfig::default());
        assert!(matches!(lenient, Err(GadgetError::ConstraintViolation { .. })));

        let strict = CircuitTestConfig {
            fail_on_witness_fault: true,
            ..CircuitTestConfig::default()
        };
        assert!(matches!(
            run_circuit_test(&FaultyInverse, &strict),
            Err(GadgetError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn constraint_limit_is_enforced() {
        let config = CircuitTestConfig {
            max_constraints: Some(10),
            ..CircuitTestConfig::labeled("tiny")
        };
        let err = run_circuit_test(&Poseidon2KnownAnswerCircuit::default(), &config).unwrap_err();
        assert!(err.to_string().contains("tiny"));
    }

    #[test]
    fn wrong_expected_output_is_rejected() {
        let mut circuit = Poseidon2KnownAnswerCircuit::default();
        circuit.expected[3] += BabyBear::ONE;
        let err = run_circuit_test(&circuit, &CircuitTestConfig::default()).unwrap_err();
        assert!(matches!(err, GadgetError::ConstraintViolation { ref label, .. } if label.starts_with("known_answer")));
    }

    #[test]
    fn chain_of_two_permutations() {
        let circuit = Poseidon2ChainCircuit {
            input: [BabyBear::ONE; WIDTH],
            permutations: 2,
        };
        let report = run_circuit_test(&circuit, &CircuitTestConfig::labeled("chain")).unwrap();
        assert_eq!(report.digest_hex().len(), 64);
    }
}
