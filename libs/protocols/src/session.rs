//! The secure-computation session facade.
//!
//! The network runtime that actually moves masked values between parties is an external
//! capability. Protocol code consumes it through [ComputeSession], which is the only place a
//! protocol run suspends: sharing, opening and resharing are network round trips, everything
//! else is local computation.

use crate::share::SecretShare;
use async_trait::async_trait;
use basic_types::PartyId;
use math_lib::MODULUS_V2;
use rustc_hash::FxHashMap;

/// Each party's shares.
pub type PartyShares<T> = FxHashMap<PartyId, T>;

/// An error raised by the session facade.
///
/// Any of these is fatal to the protocol run that observes it: the run must disconnect its
/// session and propagate the error, never retry or return a partial result.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Connection establishment failed.
    #[error("connecting to coordinator failed: {0}")]
    Connect(String),

    /// A share submission was rejected.
    #[error("share submission failed: {0}")]
    Share(String),

    /// Opening a secret failed.
    #[error("opening secret failed: {0}")]
    Open(String),

    /// Resharing a secret failed.
    #[error("resharing secret failed: {0}")]
    Reshare(String),

    /// Disconnecting the session failed.
    #[error("session disconnect failed: {0}")]
    Disconnect(String),
}

/// Configuration for one secure-computation session.
///
/// Passed by value into [SessionConnector::connect]; there are no global defaults to merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Our party id within the computation.
    pub party_id: PartyId,

    /// The declared number of participating parties.
    pub party_count: u16,

    /// The field modulus, fixed per protocol version.
    pub modulus: u64,
}

impl SessionConfig {
    /// Constructs a configuration with the current protocol modulus ([MODULUS_V2]).
    pub fn new(party_id: PartyId, party_count: u16) -> Self {
        Self { party_id, party_count, modulus: MODULUS_V2 }
    }

    /// Overrides the field modulus, for peers pinned to an older protocol version.
    pub fn with_modulus(mut self, modulus: u64) -> Self {
        self.modulus = modulus;
        self
    }
}

/// An active secure-computation session.
///
/// A session is exclusively owned by the protocol run that created it: it must not be shared
/// across concurrent runs, and [disconnect][ComputeSession::disconnect] consumes it so a
/// finished session cannot be reused. Within a run the steps are strictly sequential — share
/// before compute, compute before open — because each step's operands are produced by the
/// previous one.
///
/// `receivers`/`senders` arguments restrict which parties receive handles and which ones
/// contribute values; `None` means all parties.
#[async_trait]
pub trait ComputeSession: Send + Sync {
    /// The share handle type produced by this session.
    type Share: SecretShare + Send + Sync;

    /// Secret-shares a single value, returning one handle per contributing party.
    async fn share(
        &self,
        value: u64,
        receivers: Option<&[PartyId]>,
        senders: Option<&[PartyId]>,
    ) -> Result<PartyShares<Self::Share>, SessionError>;

    /// Secret-shares an array of values, returning one handle array per contributing party.
    async fn share_array(
        &self,
        values: &[u64],
        receivers: Option<&[PartyId]>,
        senders: Option<&[PartyId]>,
    ) -> Result<PartyShares<Vec<Self::Share>>, SessionError>;

    /// Opens a secret, revealing its plaintext to the given parties (all parties if `None`).
    async fn open(&self, share: Self::Share, reveal_to: Option<&[PartyId]>) -> Result<u64, SessionError>;

    /// Opens several secrets at once.
    async fn open_array(&self, shares: Vec<Self::Share>) -> Result<Vec<u64>, SessionError>;

    /// Re-randomizes a secret held by `senders` so that `receivers` can operate on it without
    /// learning its value.
    ///
    /// Parties that do not hold the secret participate with `share` set to `None`.
    async fn reshare(
        &self,
        share: Option<Self::Share>,
        receivers: &[PartyId],
        senders: &[PartyId],
    ) -> Result<Self::Share, SessionError>;

    /// Tears the session down, invalidating every handle it produced.
    ///
    /// `safe` requests an orderly unshare of held secrets, `free` releases local session
    /// resources. Must be called exactly once per run, on success and failure paths alike.
    async fn disconnect(self, safe: bool, free: bool) -> Result<(), SessionError>;
}

/// A type that can establish secure-computation sessions.
///
/// No protocol step may begin before [connect][SessionConnector::connect] completes.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// The session type produced by this connector.
    type Session: ComputeSession;

    /// Connects to the given coordinator for the given computation.
    async fn connect(
        &self,
        hostname: &str,
        computation_id: &str,
        config: SessionConfig,
    ) -> Result<Self::Session, SessionError>;
}
