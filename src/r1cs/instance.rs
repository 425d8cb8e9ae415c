use ark_ff::{One, Zero};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{GadgetError, GadgetResult};
use crate::field::native::{field_to_bytes, F};

use super::ark_serde;

/// Describes a single R1CS constraint `<a, z> * <b, z> = <c, z>` with sparse rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct R1csConstraint {
    #[serde(with = "ark_serde::terms")]
    pub a: Vec<(usize, F)>,
    #[serde(with = "ark_serde::terms")]
    pub b: Vec<(usize, F)>,
    #[serde(with = "ark_serde::terms")]
    pub c: Vec<(usize, F)>,
}

impl R1csConstraint {
    pub fn new(a: Vec<(usize, F)>, b: Vec<(usize, F)>, c: Vec<(usize, F)>) -> Self {
        Self { a, b, c }
    }

    pub fn evaluate(&self, assignment: &[F]) -> (F, F, F) {
        (
            sparse_dot(&self.a, assignment),
            sparse_dot(&self.b, assignment),
            sparse_dot(&self.c, assignment),
        )
    }

    pub fn is_satisfied(&self, assignment: &[F]) -> bool {
        let (a, b, c) = self.evaluate(assignment);
        a * b == c
    }

    fn max_index(&self) -> Option<usize> {
        self.a
            .iter()
            .chain(self.b.iter())
            .chain(self.c.iter())
            .map(|(idx, _)| *idx)
            .max()
    }
}

/// Marks the first constraint emitted under a gadget label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintAnnotation {
    pub start: usize,
    pub label: String,
}

/// Public statement consisting of constraint system metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct R1csInstance {
    pub num_variables: usize,
    pub constraints: Vec<R1csConstraint>,
    pub annotations: Vec<ConstraintAnnotation>,
}

impl R1csInstance {
    pub fn new(
        num_variables: usize,
        constraints: Vec<R1csConstraint>,
        annotations: Vec<ConstraintAnnotation>,
    ) -> GadgetResult<Self> {
        if num_variables == 0 {
            return Err(GadgetError::invalid_parameters(
                "R1CS instances require at least one variable (the constant 1).",
            ));
        }
        for (idx, constraint) in constraints.iter().enumerate() {
            if constraint.max_index().is_some_and(|max| max >= num_variables) {
                return Err(GadgetError::invalid_parameters(&format!(
                    "constraint {} references a variable beyond num_variables",
                    idx
                )));
            }
        }
        if annotations.windows(2).any(|pair| pair[0].start > pair[1].start) {
            return Err(GadgetError::invalid_parameters(
                "constraint annotations must be sorted by start index",
            ));
        }
        Ok(Self {
            num_variables,
            constraints,
            annotations,
        })
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Label of the gadget that emitted constraint `index`.
    pub fn label_of(&self, index: usize) -> &str {
        let pos = self.annotations.partition_point(|ann| ann.start <= index);
        match pos {
            0 => "unlabeled",
            _ => &self.annotations[pos - 1].label,
        }
    }

    /// Satisfiability check: reports the first violated constraint.
    pub fn check(&self, witness: &R1csWitness) -> GadgetResult<()> {
        witness.validate(self)?;
        let assignment = witness.full_assignment();
        match self
            .constraints
            .iter()
            .position(|constraint| !constraint.is_satisfied(&assignment))
        {
            Some(index) => Err(GadgetError::constraint_violation(index, self.label_of(index))),
            None => Ok(()),
        }
    }

    pub fn is_satisfied(&self, witness: &R1csWitness) -> bool {
        self.check(witness).is_ok()
    }

    /// SHA-256 over the constraint matrices; annotations are not hashed.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.num_variables as u64).to_le_bytes());
        hasher.update((self.constraints.len() as u64).to_le_bytes());
        for constraint in &self.constraints {
            absorb_row(&mut hasher, &constraint.a);
            absorb_row(&mut hasher, &constraint.b);
            absorb_row(&mut hasher, &constraint.c);
        }
        hasher.finalize().into()
    }

    pub fn to_bytes(&self) -> GadgetResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> GadgetResult<Self> {
        let decoded: Self = bincode::deserialize(bytes)?;
        Self::new(decoded.num_variables, decoded.constraints, decoded.annotations)
    }
}

/// Private assignment (without the constant 1 slot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct R1csWitness {
    #[serde(with = "ark_serde::vec")]
    pub assignment: Vec<F>,
}

impl R1csWitness {
    pub fn new(assignment: Vec<F>) -> Self {
        Self { assignment }
    }

    pub fn validate(&self, instance: &R1csInstance) -> GadgetResult<()> {
        if instance.num_variables != self.assignment.len() + 1 {
            return Err(GadgetError::invalid_parameters(
                "witness length does not match instance",
            ));
        }
        Ok(())
    }

    pub fn full_assignment(&self) -> Vec<F> {
        let mut assignment = Vec::with_capacity(self.assignment.len() + 1);
        assignment.push(F::one());
        assignment.extend_from_slice(&self.assignment);
        assignment
    }

    pub fn to_bytes(&self) -> GadgetResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> GadgetResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

fn sparse_dot(row: &[(usize, F)], assignment: &[F]) -> F {
    row.iter()
        .map(|(idx, coeff)| assignment.get(*idx).map_or(F::zero(), |value| *coeff * value))
        .sum()
}

fn absorb_row(hasher: &mut Sha256, row: &[(usize, F)]) {
    hasher.update((row.len() as u64).to_le_bytes());
    for (idx, coeff) in row {
        hasher.update((*idx as u64).to_le_bytes());
        hasher.update(field_to_bytes(coeff));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_instance() -> R1csInstance {
        // z1 * z1 = z2
        let constraint = R1csConstraint::new(vec![(1, F::one())], vec![(1, F::one())], vec![(2, F::one())]);
        let annotations = vec![ConstraintAnnotation {
            start: 0,
            label: "square".to_string(),
        }];
        R1csInstance::new(3, vec![constraint], annotations).unwrap()
    }

    #[test]
    fn r1cs_check_reports_label() {
        let instance = product_instance();
        let good = R1csWitness::new(vec![F::from(3u64), F::from(9u64)]);
        instance.check(&good).unwrap();

        let bad = R1csWitness::new(vec![F::from(3u64), F::from(10u64)]);
        assert_eq!(
            instance.check(&bad),
            Err(GadgetError::constraint_violation(0, "square"))
        );
    }

    #[test]
    fn r1cs_rejects_out_of_bounds_index() {
        let constraint = R1csConstraint::new(vec![(5, F::one())], vec![], vec![]);
        assert!(R1csInstance::new(3, vec![constraint], vec![]).is_err());
    }

    #[test]
    fn r1cs_witness_length_mismatch() {
        let instance = product_instance();
        let short = R1csWitness::new(vec![F::one()]);
        assert!(matches!(
            instance.check(&short),
            Err(GadgetError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn r1cs_bytes_roundtrip_preserves_digest() {
        let instance = product_instance();
        let restored = R1csInstance::from_bytes(&instance.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.digest(), instance.digest());
        assert_eq!(restored.annotations, instance.annotations);

        let witness = R1csWitness::new(vec![F::from(4u64), F::from(16u64)]);
        let restored_witness = R1csWitness::from_bytes(&witness.to_bytes().unwrap()).unwrap();
        assert_eq!(restored_witness, witness);
        assert!(restored.is_satisfied(&restored_witness));
    }

    #[test]
    fn r1cs_digest_changes_with_coefficients() {
        let instance = product_instance();
        let mut other = instance.clone();
        other.constraints[0].c[0].1 = F::from(2u64);
        assert_ne!(instance.digest(), other.digest());
    }
}
