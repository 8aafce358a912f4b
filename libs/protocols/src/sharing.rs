//! Dataset sharing between the data-owning parties.

use crate::{
    algebra::{dot_product, AlgebraError},
    session::{ComputeSession, SessionError},
    share::SecretShare,
};
use basic_types::PartyId;

/// An error during a protocol run.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The session facade failed; the run is over.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A party that was expected to contribute shared data did not.
    #[error("no shared data received from party {0}")]
    MissingPartyData(PartyId),

    /// A share algebra invariant was violated.
    #[error(transparent)]
    Algebra(#[from] AlgebraError),

    /// The facade opened fewer values than requested.
    #[error("facade returned no opened value")]
    MissingOpenedValue,
}

/// The result of a dataset sharing round between two data-owning parties.
#[derive(Debug)]
pub struct SharedDataset<S> {
    /// Secret data contributed by the dataset-owning party.
    pub dataset: Vec<S>,

    /// Secret data contributed by the party submitting values to compare against the dataset.
    pub reference: Vec<S>,
}

/// Shares this party's values with all participants and collects the two data owners' secret
/// vectors.
///
/// Every participant calls this with its own `values`; the facade delivers one handle vector
/// per contributing party. The dataset owner's and the query owner's vectors are the ones the
/// ranking and evaluation protocols consume, so a missing contribution from either is an
/// invariant violation that fails the run.
pub async fn share_dataset_secrets<T: ComputeSession>(
    session: &T,
    values: &[u64],
    dataset_party: PartyId,
    query_party: PartyId,
) -> Result<SharedDataset<T::Share>, ProtocolError> {
    let mut shared = session.share_array(values, None, None).await?;

    let dataset = shared.remove(&dataset_party).ok_or(ProtocolError::MissingPartyData(dataset_party))?;
    let reference = shared.remove(&query_party).ok_or(ProtocolError::MissingPartyData(query_party))?;

    Ok(SharedDataset { dataset, reference })
}

/// The result of a transform-normalized sharing round.
#[derive(Debug)]
pub struct TransformedDataset<S> {
    /// Secret data contributed by the dataset-owning party.
    pub dataset: Vec<S>,

    /// The query party's input reduced through the dataset owner's transform.
    pub reference: S,
}

/// Shares the dataset together with a linear transform and reduces the query party's input
/// through it.
///
/// Three sharing rounds run: the transform, an optional unit transform, and the data vectors.
/// The dataset owner contributes both transforms alongside its dataset; the query party
/// contributes the input vector the transform applies to. The reference becomes
/// `transform . input`, divided by `unit_transform . input` when a unit transform was shared,
/// so comparisons run against a normalized value when the target is implicit in the
/// transform. Length invariants are checked before any arithmetic and fail the run.
pub async fn share_transformed_secrets<T: ComputeSession>(
    session: &T,
    transform: &[u64],
    unit_transform: &[u64],
    values: &[u64],
    dataset_party: PartyId,
    query_party: PartyId,
) -> Result<TransformedDataset<T::Share>, ProtocolError> {
    let mut transforms = session.share_array(transform, None, None).await?;
    let mut unit_transforms = session.share_array(unit_transform, None, None).await?;
    let mut shared = session.share_array(values, None, None).await?;

    let transform = transforms.remove(&dataset_party).ok_or(ProtocolError::MissingPartyData(dataset_party))?;
    let unit_transform = unit_transforms.remove(&dataset_party).unwrap_or_default();
    let input = shared.remove(&query_party).ok_or(ProtocolError::MissingPartyData(query_party))?;
    let dataset = shared.remove(&dataset_party).ok_or(ProtocolError::MissingPartyData(dataset_party))?;

    if transform.is_empty() {
        return Err(AlgebraError::EmptyOperands.into());
    }
    if transform.len() != input.len() {
        return Err(AlgebraError::LengthMismatch { lhs: transform.len(), rhs: input.len() }.into());
    }
    if !unit_transform.is_empty() && unit_transform.len() != input.len() {
        return Err(AlgebraError::LengthMismatch { lhs: unit_transform.len(), rhs: input.len() }.into());
    }

    let reduced = dot_product(&transform, &input)?;
    let reference = if unit_transform.is_empty() {
        reduced
    } else {
        reduced.div(&dot_product(&unit_transform, &input)?)
    };

    Ok(TransformedDataset { dataset, reference })
}
