//! The per-dimension protocol runs and their topologies.
//!
//! A benchmarking run ranks one secret value within the reference dataset and maps the opened
//! rank to a decile. A function-call run evaluates a named coefficient vector against the
//! secret input instead. Either runs *direct*, with both data owners participating, or
//! *delegated*, with compute-only processors comparing on the owners' behalf so neither owner
//! sees the other's data or any intermediate.

use crate::{stats::quantile, types::DelegationOptions};
use basic_types::PartyId;
use protocols::{dot_product, ranking_single, share_dataset_secrets, ComputeSession, ProtocolError};
use tracing::debug;

/// The party holding the reference dataset in a direct run.
pub const DATASET_PARTY: PartyId = PartyId::new(1);

/// The querying party in a direct run.
pub const DIRECT_CLIENT_PARTY: PartyId = PartyId::new(2);

/// The querying party in a delegated run.
pub const DELEGATED_CLIENT_PARTY: PartyId = PartyId::new(3);

/// The compute-only processors of a delegated run.
const COMPUTE_PARTIES: [PartyId; 2] = [PartyId::new(1), PartyId::new(2)];

/// Every party of a delegated run.
const DELEGATED_PARTIES: [PartyId; 3] = [PartyId::new(1), PartyId::new(2), PartyId::new(3)];

/// The processor that reports the dataset size in a delegated run.
const SIZE_PROVIDER_PARTY: PartyId = PartyId::new(1);

/// The protocol topology of one run.
///
/// The variants carry exactly the fields that exist under them, so delegated-only options
/// cannot leak into a direct run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Both data-owning parties participate in the computation.
    Direct,

    /// Compute-only processors perform the comparison on the data owners' behalf.
    Delegated {
        /// Number of dataset shards covered per protocol run.
        num_shards: u32,
    },
}

impl Topology {
    /// The number of parties connected under this topology.
    pub fn party_count(&self) -> u16 {
        match self {
            Topology::Direct => 2,
            Topology::Delegated { .. } => 3,
        }
    }

    /// The party id the querying client assumes under this topology.
    pub fn party_id(&self) -> PartyId {
        match self {
            Topology::Direct => DIRECT_CLIENT_PARTY,
            Topology::Delegated { .. } => DELEGATED_CLIENT_PARTY,
        }
    }

    pub(crate) fn delegation_options(&self) -> Option<DelegationOptions> {
        match self {
            Topology::Direct => None,
            Topology::Delegated { num_shards } =>
                Some(DelegationOptions { delegated: true, num_shards: *num_shards, shard_id: 0 }),
        }
    }

    /// Whether this topology delegates computation to processors.
    pub fn is_delegated(&self) -> bool {
        matches!(self, Topology::Delegated { .. })
    }
}

/// Result of ranking one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkingRank {
    /// 1-based rank of the queried value within the dataset.
    pub rank: u64,

    /// Decile of the rank relative to the dataset size.
    pub quantile: u8,
}

/// Ranks one secret value under the given topology.
pub async fn benchmarking_protocol<S: ComputeSession>(
    session: &S,
    secret_input: u64,
    topology: Topology,
) -> Result<BenchmarkingRank, ProtocolError> {
    match topology {
        Topology::Direct => benchmarking_direct(session, secret_input).await,
        Topology::Delegated { .. } => benchmarking_delegated(session, secret_input).await,
    }
}

/// Direct two-party ranking: both owners share their data and both see the opened rank.
pub async fn benchmarking_direct<S: ComputeSession>(
    session: &S,
    secret_input: u64,
) -> Result<BenchmarkingRank, ProtocolError> {
    let secrets = share_dataset_secrets(session, &[secret_input], DATASET_PARTY, DIRECT_CLIENT_PARTY).await?;
    let reference = secrets.reference.first().ok_or(ProtocolError::MissingPartyData(DIRECT_CLIENT_PARTY))?;

    // The queried value joins the population it is ranked within.
    let dataset_size = secrets.dataset.len() as u64 + 1;
    let counted = ranking_single(reference, &secrets.dataset);
    let rank = session.open(counted, None).await? + 1;
    debug!("direct ranking opened rank {rank} within {dataset_size}");

    Ok(BenchmarkingRank { rank, quantile: quantile(rank, dataset_size) })
}

/// Delegated three-party ranking.
///
/// The client submits its share to the compute parties only; the comparison result is
/// reshared across the full group so the client can open it without either data owner ever
/// observing the other's value or any intermediate.
pub async fn benchmarking_delegated<S: ComputeSession>(
    session: &S,
    secret_input: u64,
) -> Result<BenchmarkingRank, ProtocolError> {
    session.share_array(&[secret_input], Some(&COMPUTE_PARTIES), None).await?;

    let counted = session.reshare(None, &DELEGATED_PARTIES, &COMPUTE_PARTIES).await?;
    let rank = session.open(counted, None).await? + 1;

    let mut sizes = session.share(0, Some(&[DELEGATED_CLIENT_PARTY]), Some(&COMPUTE_PARTIES)).await?;
    let size_share = sizes.remove(&SIZE_PROVIDER_PARTY).ok_or(ProtocolError::MissingPartyData(SIZE_PROVIDER_PARTY))?;
    let dataset_size = session.open(size_share, None).await?;
    debug!("delegated ranking opened rank {rank} within {dataset_size}");

    Ok(BenchmarkingRank { rank, quantile: quantile(rank, dataset_size) })
}

/// Evaluates a named function under the given topology, returning the opened result.
pub async fn function_call_protocol<S: ComputeSession>(
    session: &S,
    secret_input: &[u64],
    topology: Topology,
) -> Result<u64, ProtocolError> {
    match topology {
        Topology::Direct => function_call_direct(session, secret_input).await,
        Topology::Delegated { .. } => function_call_delegated(session, secret_input).await,
    }
}

/// Direct function evaluation: the function owner's coefficient vector is evaluated against
/// the shared input via a dot product.
pub async fn function_call_direct<S: ComputeSession>(
    session: &S,
    secret_input: &[u64],
) -> Result<u64, ProtocolError> {
    let secrets = share_dataset_secrets(session, secret_input, DATASET_PARTY, DIRECT_CLIENT_PARTY).await?;
    let evaluated = dot_product(&secrets.dataset, &secrets.reference)?;

    let opened = session.open_array(vec![evaluated]).await?;
    opened.into_iter().next().ok_or(ProtocolError::MissingOpenedValue)
}

/// Delegated function evaluation: processors evaluate, the client only opens the reshared
/// result.
pub async fn function_call_delegated<S: ComputeSession>(
    session: &S,
    secret_input: &[u64],
) -> Result<u64, ProtocolError> {
    session.share_array(secret_input, Some(&COMPUTE_PARTIES), None).await?;
    let evaluated = session.reshare(None, &DELEGATED_PARTIES, &COMPUTE_PARTIES).await?;
    Ok(session.open(evaluated, None).await?)
}
