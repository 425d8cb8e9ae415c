//! Constraint builder over the native field
//!
//! Variables are plain indices into the assignment vector; index 0 is the
//! constant one. Every allocation carries its witness value so gadgets can
//! compute downstream witnesses while they emit constraints.

use ark_ff::{One, Zero};

use crate::errors::{GadgetError, GadgetResult};
use crate::field::native::{field_bits_le, field_num_bits, F};

use super::instance::{ConstraintAnnotation, R1csConstraint, R1csInstance, R1csWitness};

/// Index of the constant-one variable.
pub const ONE: usize = 0;

const UNLABELED: &str = "unlabeled";

/// Affine combination `constant + sum(coeff * z[idx])`.
#[derive(Debug, Clone)]
pub struct SparseLC {
    constant: F,
    terms: Vec<(usize, F)>,
}

impl SparseLC {
    pub fn zero() -> Self {
        Self {
            constant: F::zero(),
            terms: Vec::new(),
        }
    }

    pub fn constant(value: F) -> Self {
        Self {
            constant: value,
            terms: Vec::new(),
        }
    }

    pub fn from_var(idx: usize) -> Self {
        Self {
            constant: F::zero(),
            terms: vec![(idx, F::one())],
        }
    }

    pub fn with_terms(constant: F, mut terms: Vec<(usize, F)>) -> Self {
        terms.sort_by_key(|(idx, _)| *idx);
        let mut combined: Vec<(usize, F)> = Vec::with_capacity(terms.len());
        for (idx, coeff) in terms {
            if let Some((last_idx, last_coeff)) = combined.last_mut() {
                if *last_idx == idx {
                    *last_coeff += coeff;
                    continue;
                }
            }
            combined.push((idx, coeff));
        }
        combined.retain(|(_, coeff)| !coeff.is_zero());
        Self {
            constant,
            terms: combined,
        }
    }

    /// Folds the constant into the slot of variable [`ONE`].
    fn into_row(self) -> Vec<(usize, F)> {
        let mut row = Vec::with_capacity(self.terms.len() + 1);
        if !self.constant.is_zero() {
            row.push((ONE, self.constant));
        }
        for (idx, coeff) in self.terms {
            match row.first_mut() {
                Some((ONE, constant)) if idx == ONE => *constant += coeff,
                _ => row.push((idx, coeff)),
            }
        }
        row.retain(|(_, coeff)| !coeff.is_zero());
        row
    }
}

/// A native variable constrained to {0, 1}, with its witness value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boolean {
    pub var: usize,
    pub value: bool,
}

struct PendingConstraint {
    a: SparseLC,
    b: SparseLC,
    c: SparseLC,
}

pub struct R1csBuilder {
    witness: Vec<F>,
    constraints: Vec<PendingConstraint>,
    annotations: Vec<ConstraintAnnotation>,
    label: Option<String>,
    faults: Vec<GadgetError>,
}

impl Default for R1csBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl R1csBuilder {
    pub fn new() -> Self {
        Self {
            witness: Vec::new(),
            constraints: Vec::new(),
            annotations: Vec::new(),
            label: None,
            faults: Vec::new(),
        }
    }

    pub fn num_variables(&self) -> usize {
        self.witness.len() + 1
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn alloc(&mut self, value: F) -> usize {
        self.witness.push(value);
        self.witness.len()
    }

    /// Witness value currently assigned to `idx`.
    pub fn value(&self, idx: usize) -> F {
        match idx {
            ONE => F::one(),
            _ => self.witness.get(idx - 1).copied().unwrap_or_else(F::zero),
        }
    }

    // --- Annotations & witness faults ---

    /// Runs `body` with every emitted constraint attributed to `label`,
    /// nested under the enclosing label if any.
    pub fn scoped<T>(&mut self, label: &str, body: impl FnOnce(&mut Self) -> T) -> T {
        let nested = match &self.label {
            Some(outer) => format!("{outer}/{label}"),
            None => label.to_string(),
        };
        let previous = self.label.replace(nested);
        self.mark_label();
        let out = body(self);
        self.label = previous;
        self.mark_label();
        out
    }

    fn mark_label(&mut self) {
        let start = self.constraints.len();
        let label = self.label.as_deref().unwrap_or(UNLABELED);
        if let Some(last) = self.annotations.last_mut() {
            if last.label == label {
                return;
            }
            if last.start == start {
                last.label = label.to_string();
                return;
            }
        }
        self.annotations.push(ConstraintAnnotation {
            start,
            label: label.to_string(),
        });
    }

    /// Records a witness-generation fault. The caller still emits its
    /// constraints; they will be unsatisfied for the produced assignment.
    pub fn record_fault(&mut self, fault: GadgetError) {
        tracing::warn!(
            label = self.label.as_deref().unwrap_or(UNLABELED),
            "witness fault: {fault}"
        );
        self.faults.push(fault);
    }

    pub fn faults(&self) -> &[GadgetError] {
        &self.faults
    }

    // --- Raw constraint emission ---

    pub fn enforce_mul(&mut self, a: SparseLC, b: SparseLC, c: SparseLC) {
        self.constraints.push(PendingConstraint { a, b, c });
    }

    pub fn enforce_mul_vars(&mut self, left_idx: usize, right_idx: usize, out_idx: usize) {
        let a = SparseLC::from_var(left_idx);
        let b = SparseLC::from_var(right_idx);
        let c = SparseLC::from_var(out_idx);
        self.enforce_mul(a, b, c);
    }

    pub fn enforce_sum_equals(&mut self, terms: &[(usize, F)], target_idx: usize) {
        let mut lc_terms = terms.to_vec();
        lc_terms.push((target_idx, -F::one()));
        self.enforce_linear_relation(&lc_terms, F::zero());
    }

    /// `constant + sum(coeff * z[idx]) = 0`
    pub fn enforce_linear_relation(&mut self, terms: &[(usize, F)], constant: F) {
        let lc = SparseLC::with_terms(constant, terms.to_vec());
        let one = SparseLC::constant(F::one());
        let zero = SparseLC::zero();
        self.enforce_mul(lc, one, zero);
    }

    pub fn enforce_eq(&mut self, left_idx: usize, right_idx: usize) {
        self.enforce_sum_equals(&[(left_idx, F::one())], right_idx);
    }

    pub fn enforce_boolean(&mut self, idx: usize) {
        let a = SparseLC::from_var(idx);
        let b = SparseLC::with_terms(-F::one(), vec![(idx, F::one())]);
        let c = SparseLC::zero();
        self.enforce_mul(a, b, c);
    }

    /// Allocates `bit_len` boolean variables and constrains their
    /// little-endian recomposition to equal `var_idx`.
    pub fn decompose_to_bits(&mut self, var_idx: usize, bit_len: usize) -> Vec<Boolean> {
        let value = self.value(var_idx);
        let bit_values = field_bits_le(&value, bit_len);
        if field_num_bits(&value) > bit_len {
            self.record_fault(GadgetError::out_of_range(
                "decompose_to_bits",
                &format!("value does not fit in {bit_len} bits"),
            ));
        }

        let bits = bit_values
            .into_iter()
            .map(|bit| self.alloc_bit(bit))
            .collect::<Vec<_>>();

        let mut terms = vec![(var_idx, F::one())];
        let mut coeff = F::one();
        for bit in &bits {
            terms.push((bit.var, -coeff));
            coeff += coeff;
        }
        self.enforce_linear_relation(&terms, F::zero());
        bits
    }

    pub fn alloc_bit(&mut self, value: bool) -> Boolean {
        let var = self.alloc(F::from(value as u64));
        self.enforce_boolean(var);
        Boolean { var, value }
    }

    // --- Native field primitives consumed by the gadgets ---

    /// Allocates a variable pinned to `value`.
    pub fn alloc_constant(&mut self, value: F) -> usize {
        let idx = self.alloc(value);
        self.enforce_linear_relation(&[(idx, F::one())], -value);
        idx
    }

    pub fn add(&mut self, left: usize, right: usize) -> usize {
        let out = self.alloc(self.value(left) + self.value(right));
        self.enforce_sum_equals(&[(left, F::one()), (right, F::one())], out);
        out
    }

    pub fn sub(&mut self, left: usize, right: usize) -> usize {
        let out = self.alloc(self.value(left) - self.value(right));
        self.enforce_sum_equals(&[(left, F::one()), (right, -F::one())], out);
        out
    }

    pub fn mul(&mut self, left: usize, right: usize) -> usize {
        let out = self.alloc(self.value(left) * self.value(right));
        self.enforce_mul_vars(left, right, out);
        out
    }

    pub fn assert_equal(&mut self, left: usize, right: usize) {
        self.enforce_eq(left, right);
    }

    pub fn to_binary(&mut self, var_idx: usize, bit_len: usize) -> Vec<Boolean> {
        self.decompose_to_bits(var_idx, bit_len)
    }

    /// `cond ? when_true : when_false` as `cond * (t - f) = out - f`.
    pub fn select(&mut self, cond: Boolean, when_true: usize, when_false: usize) -> usize {
        let chosen = if cond.value { when_true } else { when_false };
        let out = self.alloc(self.value(chosen));
        self.enforce_mul(
            SparseLC::from_var(cond.var),
            SparseLC::with_terms(F::zero(), vec![(when_true, F::one()), (when_false, -F::one())]),
            SparseLC::with_terms(F::zero(), vec![(out, F::one()), (when_false, -F::one())]),
        );
        out
    }

    pub fn and(&mut self, left: Boolean, right: Boolean) -> Boolean {
        let result = self.alloc_bit(left.value & right.value);
        self.enforce_mul_vars(left.var, right.var, result.var);
        result
    }

    pub fn finalize(self) -> GadgetResult<(R1csInstance, R1csWitness)> {
        let num_variables = self.witness.len() + 1;
        tracing::debug!(
            num_variables,
            num_constraints = self.constraints.len(),
            faults = self.faults.len(),
            "[r1cs] finalize"
        );
        let constraints = self
            .constraints
            .into_iter()
            .map(|pending| {
                R1csConstraint::new(pending.a.into_row(), pending.b.into_row(), pending.c.into_row())
            })
            .collect::<Vec<_>>();
        let instance = R1csInstance::new(num_variables, constraints, self.annotations)?;
        let witness = R1csWitness::new(self.witness);
        witness.validate(&instance)?;
        Ok((instance, witness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_satisfied(builder: R1csBuilder) {
        let (instance, witness) = builder.finalize().unwrap();
        instance.check(&witness).unwrap();
    }

    #[test]
    fn native_arithmetic_is_satisfied() {
        let mut builder = R1csBuilder::new();
        let a = builder.alloc(F::from(6u64));
        let b = builder.alloc(F::from(7u64));
        let sum = builder.add(a, b);
        let diff = builder.sub(a, b);
        let prod = builder.mul(a, b);
        assert_eq!(builder.value(sum), F::from(13u64));
        assert_eq!(builder.value(diff), -F::one());
        assert_eq!(builder.value(prod), F::from(42u64));
        let expected = builder.alloc_constant(F::from(42u64));
        builder.assert_equal(prod, expected);
        assert_satisfied(builder);
    }

    #[test]
    fn to_binary_recomposes() {
        let mut builder = R1csBuilder::new();
        let x = builder.alloc(F::from(0b1101u64));
        let bits = builder.to_binary(x, 8);
        let values = bits.iter().map(|b| b.value).collect::<Vec<_>>();
        assert_eq!(values, vec![true, false, true, true, false, false, false, false]);
        assert!(builder.faults().is_empty());
        assert_satisfied(builder);
    }

    #[test]
    fn to_binary_overflow_is_a_fault() {
        let mut builder = R1csBuilder::new();
        let x = builder.alloc(F::from(256u64));
        builder.scoped("narrow", |b| b.to_binary(x, 8));
        assert_eq!(builder.faults().len(), 1);
        let (instance, witness) = builder.finalize().unwrap();
        let err = instance.check(&witness).unwrap_err();
        assert!(matches!(err, GadgetError::ConstraintViolation { ref label, .. } if label == "narrow"));
    }

    #[test]
    fn select_and_and() {
        let mut builder = R1csBuilder::new();
        let t = builder.alloc(F::from(11u64));
        let f = builder.alloc(F::from(22u64));
        let yes = builder.alloc_bit(true);
        let no = builder.alloc_bit(false);
        let picked_t = builder.select(yes, t, f);
        let picked_f = builder.select(no, t, f);
        assert_eq!(builder.value(picked_t), F::from(11u64));
        assert_eq!(builder.value(picked_f), F::from(22u64));
        assert!(!builder.and(yes, no).value);
        assert!(builder.and(yes, yes).value);
        assert_satisfied(builder);
    }

    #[test]
    fn nested_labels_are_recorded() {
        let mut builder = R1csBuilder::new();
        let x = builder.alloc(F::from(3u64));
        builder.scoped("outer", |b| {
            b.enforce_boolean(x);
            b.scoped("inner", |b| b.enforce_eq(x, ONE));
        });
        let (instance, witness) = builder.finalize().unwrap();
        assert_eq!(instance.label_of(0), "outer");
        assert_eq!(instance.label_of(1), "outer/inner");
        assert_eq!(
            instance.check(&witness),
            Err(GadgetError::constraint_violation(0, "outer"))
        );
    }

    #[test]
    fn constant_folds_into_one_slot() {
        let lc = SparseLC::with_terms(F::from(2u64), vec![(ONE, F::from(3u64)), (4, F::one()), (4, -F::one())]);
        assert_eq!(lc.into_row(), vec![(ONE, F::from(5u64))]);
    }
}
