//! The secret share capability set.

/// A party-local handle over a value masked across an active secure-computation session.
///
/// Handles support algebra and relational operators that themselves return handles: a
/// comparison outcome is secret until it is explicitly opened through the session. All
/// operations are local compositions from the caller's perspective; the backend is free to
/// batch whatever network rounds they imply.
///
/// Handles are scoped to the session that created them and must not outlive it.
pub trait SecretShare: Clone {
    /// Adds two secrets.
    fn add(&self, other: &Self) -> Self;

    /// Subtracts `other` from this secret.
    fn sub(&self, other: &Self) -> Self;

    /// Multiplies two secrets.
    fn mul(&self, other: &Self) -> Self;

    /// Divides this secret by `other`, with integer semantics.
    fn div(&self, other: &Self) -> Self;

    /// Adds a public constant to this secret.
    fn offset(&self, value: u64) -> Self;

    /// Compares two secrets, returning a secret 1 if `self > other` and a secret 0 otherwise.
    fn greater_than(&self, other: &Self) -> Self;

    /// Tests two secrets for equality, returning a secret 1 or 0.
    fn equals(&self, other: &Self) -> Self;

    /// Oblivious select keyed on this secret, which must hold 0 or 1.
    ///
    /// Returns a secret holding `if_true`'s value when this secret is 1 and `if_false`'s
    /// otherwise, without revealing which branch was taken.
    fn select(&self, if_true: &Self, if_false: &Self) -> Self;
}
