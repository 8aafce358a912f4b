//! Linear algebra over secret shares.

use crate::share::SecretShare;

/// An input invariant violation in a share algebra operation.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AlgebraError {
    /// The operand vectors have different lengths.
    #[error("vector length mismatch: {lhs} vs {rhs}")]
    LengthMismatch {
        /// Left operand length.
        lhs: usize,
        /// Right operand length.
        rhs: usize,
    },

    /// The operand vectors are empty.
    #[error("empty operand vectors")]
    EmptyOperands,
}

/// Computes the dot product of two secret vectors as a secret value.
///
/// Fails fast on mismatched or empty operands; no partial accumulation is performed.
pub fn dot_product<S: SecretShare>(lhs: &[S], rhs: &[S]) -> Result<S, AlgebraError> {
    if lhs.len() != rhs.len() {
        return Err(AlgebraError::LengthMismatch { lhs: lhs.len(), rhs: rhs.len() });
    }

    let mut products = lhs.iter().zip(rhs).map(|(l, r)| l.mul(r));
    let first = products.next().ok_or(AlgebraError::EmptyOperands)?;
    Ok(products.fold(first, |sum, product| sum.add(&product)))
}
