//! Plaintext protocol simulator.
//!
//! A session facade stand-in that never touches the network: every handle is backed by its
//! plaintext value, and the contributions of remote parties are seeded up front. Protocol code
//! runs against it unchanged, which makes the oblivious algorithms testable end to end without
//! a secure-computation backend. Nothing here is oblivious or secure.

use crate::{
    session::{ComputeSession, PartyShares, SessionConfig, SessionConnector, SessionError},
    share::SecretShare,
};
use async_trait::async_trait;
use basic_types::PartyId;
use rustc_hash::FxHashMap;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

/// A share handle backed by its plaintext value.
///
/// Arithmetic follows the field of the owning session; comparisons yield plaintext 0/1 shares
/// and `select` is evaluated arithmetically, mirroring how a real backend composes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaintextShare {
    value: u64,
    modulus: u64,
}

impl PlaintextShare {
    /// Constructs a share over the given modulus.
    pub fn new(value: u64, modulus: u64) -> Self {
        Self { value: value % modulus, modulus }
    }

    /// The plaintext behind this share.
    pub fn value(&self) -> u64 {
        self.value
    }

    fn derive(&self, value: u64) -> Self {
        Self { value: value % self.modulus, modulus: self.modulus }
    }
}

impl SecretShare for PlaintextShare {
    fn add(&self, other: &Self) -> Self {
        self.derive(self.value + other.value)
    }

    fn sub(&self, other: &Self) -> Self {
        self.derive(self.value + self.modulus - other.value)
    }

    fn mul(&self, other: &Self) -> Self {
        // Operands stay below 2^49 so the product fits an u128.
        self.derive((u128::from(self.value) * u128::from(other.value) % u128::from(self.modulus)) as u64)
    }

    fn div(&self, other: &Self) -> Self {
        // The simulator is test-only; a zero divisor is a broken test.
        self.derive(self.value.checked_div(other.value).expect("division by zero in plaintext simulator"))
    }

    fn offset(&self, value: u64) -> Self {
        self.derive(self.value + value % self.modulus)
    }

    fn greater_than(&self, other: &Self) -> Self {
        self.derive(u64::from(self.value > other.value))
    }

    fn equals(&self, other: &Self) -> Self {
        self.derive(u64::from(self.value == other.value))
    }

    fn select(&self, if_true: &Self, if_false: &Self) -> Self {
        debug_assert!(self.value <= 1, "select keyed on a non-boolean share");
        let selected =
            u128::from(self.value) * u128::from(if_true.value) + u128::from(1 - self.value) * u128::from(if_false.value);
        self.derive((selected % u128::from(self.modulus)) as u64)
    }
}

#[derive(Clone, Default)]
struct SeededInputs {
    arrays: FxHashMap<PartyId, Vec<u64>>,
    array_rounds: FxHashMap<PartyId, VecDeque<Vec<u64>>>,
    values: FxHashMap<PartyId, u64>,
    reshare_results: Vec<u64>,
}

/// Builder for a [PlaintextSession].
#[derive(Clone)]
pub struct PlaintextSessionBuilder {
    modulus: u64,
    local_party: PartyId,
    inputs: SeededInputs,
}

impl PlaintextSessionBuilder {
    /// Creates a builder over the given modulus, with party 1 as the local party.
    pub fn new(modulus: u64) -> Self {
        Self { modulus, local_party: PartyId::new(1), inputs: SeededInputs::default() }
    }

    /// Sets the local party id.
    pub fn local_party(mut self, party: PartyId) -> Self {
        self.local_party = party;
        self
    }

    /// Seeds the array a remote party contributes to `share_array` rounds.
    pub fn party_array(mut self, party: PartyId, values: Vec<u64>) -> Self {
        self.inputs.arrays.insert(party, values);
        self
    }

    /// Queues the array a remote party contributes to one `share_array` round.
    ///
    /// Queued rounds are consumed in order and take precedence over
    /// [party_array][Self::party_array] seeds, which model a contribution repeated every
    /// round.
    pub fn party_array_round(mut self, party: PartyId, values: Vec<u64>) -> Self {
        self.inputs.array_rounds.entry(party).or_default().push_back(values);
        self
    }

    /// Seeds the value a remote party contributes to `share` rounds.
    pub fn party_value(mut self, party: PartyId, value: u64) -> Self {
        self.inputs.values.insert(party, value);
        self
    }

    /// Queues the plaintext behind the next `reshare` of a secret this party does not hold.
    pub fn reshare_result(mut self, value: u64) -> Self {
        self.inputs.reshare_results.push(value);
        self
    }

    /// Builds the session.
    pub fn build(self) -> PlaintextSession {
        PlaintextSession {
            modulus: self.modulus,
            local_party: self.local_party,
            arrays: self.inputs.arrays,
            values: self.inputs.values,
            array_rounds: Mutex::new(self.inputs.array_rounds),
            reshare_results: Mutex::new(self.inputs.reshare_results.into_iter().collect()),
            disconnects: Arc::default(),
        }
    }
}

/// A fully local stand-in for a secure-computation session.
pub struct PlaintextSession {
    modulus: u64,
    local_party: PartyId,
    arrays: FxHashMap<PartyId, Vec<u64>>,
    array_rounds: Mutex<FxHashMap<PartyId, VecDeque<Vec<u64>>>>,
    values: FxHashMap<PartyId, u64>,
    reshare_results: Mutex<VecDeque<u64>>,
    disconnects: Arc<AtomicUsize>,
}

impl PlaintextSession {
    fn share_of(&self, value: u64) -> PlaintextShare {
        PlaintextShare::new(value, self.modulus)
    }

    fn is_receiver(&self, receivers: Option<&[PartyId]>) -> bool {
        receivers.map(|parties| parties.contains(&self.local_party)).unwrap_or(true)
    }

    fn sends(&self, party: PartyId, senders: Option<&[PartyId]>) -> bool {
        senders.map(|parties| parties.contains(&party)).unwrap_or(true)
    }
}

#[async_trait]
impl ComputeSession for PlaintextSession {
    type Share = PlaintextShare;

    async fn share(
        &self,
        value: u64,
        receivers: Option<&[PartyId]>,
        senders: Option<&[PartyId]>,
    ) -> Result<PartyShares<Self::Share>, SessionError> {
        let mut shares = PartyShares::default();
        if !self.is_receiver(receivers) {
            return Ok(shares);
        }
        if self.sends(self.local_party, senders) {
            shares.insert(self.local_party, self.share_of(value));
        }
        for (party, seeded) in &self.values {
            if self.sends(*party, senders) {
                shares.insert(*party, self.share_of(*seeded));
            }
        }
        Ok(shares)
    }

    async fn share_array(
        &self,
        values: &[u64],
        receivers: Option<&[PartyId]>,
        senders: Option<&[PartyId]>,
    ) -> Result<PartyShares<Vec<Self::Share>>, SessionError> {
        let mut shares = PartyShares::default();
        if !self.is_receiver(receivers) {
            return Ok(shares);
        }
        if self.sends(self.local_party, senders) {
            shares.insert(self.local_party, values.iter().map(|value| self.share_of(*value)).collect());
        }
        let mut rounds = self
            .array_rounds
            .lock()
            .map_err(|_| SessionError::Share("simulator lock poisoned".into()))?;
        for (party, queued) in rounds.iter_mut() {
            if !self.sends(*party, senders) {
                continue;
            }
            if let Some(seeded) = queued.pop_front() {
                shares.insert(*party, seeded.iter().map(|value| self.share_of(*value)).collect());
            }
        }
        for (party, seeded) in &self.arrays {
            if self.sends(*party, senders) && !shares.contains_key(party) {
                shares.insert(*party, seeded.iter().map(|value| self.share_of(*value)).collect());
            }
        }
        Ok(shares)
    }

    async fn open(&self, share: Self::Share, _reveal_to: Option<&[PartyId]>) -> Result<u64, SessionError> {
        Ok(share.value())
    }

    async fn open_array(&self, shares: Vec<Self::Share>) -> Result<Vec<u64>, SessionError> {
        Ok(shares.iter().map(PlaintextShare::value).collect())
    }

    async fn reshare(
        &self,
        share: Option<Self::Share>,
        _receivers: &[PartyId],
        _senders: &[PartyId],
    ) -> Result<Self::Share, SessionError> {
        match share {
            Some(share) => Ok(share.offset(0)),
            None => {
                let value = self
                    .reshare_results
                    .lock()
                    .map_err(|_| SessionError::Reshare("simulator lock poisoned".into()))?
                    .pop_front()
                    .ok_or_else(|| SessionError::Reshare("no seeded reshare result".into()))?;
                Ok(self.share_of(value))
            }
        }
    }

    async fn disconnect(self, _safe: bool, _free: bool) -> Result<(), SessionError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A connector that hands out [PlaintextSession]s built from one seeded template.
///
/// The connected session takes its local party and modulus from the [SessionConfig] it is
/// given, matching how a real connector would.
#[derive(Clone)]
pub struct PlaintextConnector {
    inputs: SeededInputs,
    disconnects: Arc<AtomicUsize>,
}

impl PlaintextConnector {
    /// Creates a connector with no seeded inputs.
    pub fn new() -> Self {
        Self { inputs: SeededInputs::default(), disconnects: Arc::default() }
    }

    /// How many sessions handed out by this connector have been disconnected.
    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    /// Seeds the array a remote party contributes to `share_array` rounds.
    pub fn party_array(mut self, party: PartyId, values: Vec<u64>) -> Self {
        self.inputs.arrays.insert(party, values);
        self
    }

    /// Seeds the value a remote party contributes to `share` rounds.
    pub fn party_value(mut self, party: PartyId, value: u64) -> Self {
        self.inputs.values.insert(party, value);
        self
    }

    /// Queues a reshare result, consumed in order across the connected session's runs.
    pub fn reshare_result(mut self, value: u64) -> Self {
        self.inputs.reshare_results.push(value);
        self
    }
}

impl Default for PlaintextConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionConnector for PlaintextConnector {
    type Session = PlaintextSession;

    async fn connect(
        &self,
        _hostname: &str,
        _computation_id: &str,
        config: SessionConfig,
    ) -> Result<Self::Session, SessionError> {
        let mut builder = PlaintextSessionBuilder::new(config.modulus).local_party(config.party_id);
        builder.inputs = self.inputs.clone();
        let mut session = builder.build();
        session.disconnects = self.disconnects.clone();
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_lib::MODULUS_V2;

    fn share(value: u64) -> PlaintextShare {
        PlaintextShare::new(value, MODULUS_V2)
    }

    #[test]
    fn share_algebra() {
        assert_eq!(share(2).add(&share(3)).value(), 5);
        assert_eq!(share(2).sub(&share(3)).value(), MODULUS_V2 - 1);
        assert_eq!(share(6).mul(&share(7)).value(), 42);
        assert_eq!(share(42).div(&share(5)).value(), 8);
        assert_eq!(share(40).offset(2).value(), 42);
    }

    #[test]
    fn share_comparisons_yield_booleans() {
        assert_eq!(share(5).greater_than(&share(3)).value(), 1);
        assert_eq!(share(3).greater_than(&share(5)).value(), 0);
        assert_eq!(share(5).greater_than(&share(5)).value(), 0);
        assert_eq!(share(5).equals(&share(5)).value(), 1);
        assert_eq!(share(5).equals(&share(6)).value(), 0);
    }

    #[test]
    fn select_follows_the_condition() {
        assert_eq!(share(1).select(&share(10), &share(20)).value(), 10);
        assert_eq!(share(0).select(&share(10), &share(20)).value(), 20);
    }

    #[tokio::test]
    async fn sharing_respects_sender_and_receiver_subsets() {
        let session = PlaintextSessionBuilder::new(MODULUS_V2)
            .local_party(PartyId::new(3))
            .party_value(PartyId::new(1), 17)
            .party_value(PartyId::new(2), 17)
            .build();

        let restricted =
            session.share(0, Some(&[PartyId::new(3)]), Some(&[PartyId::new(1), PartyId::new(2)])).await.unwrap();
        assert_eq!(restricted.len(), 2);
        assert_eq!(restricted[&PartyId::new(1)].value(), 17);

        let excluded = session.share(0, Some(&[PartyId::new(1)]), None).await.unwrap();
        assert!(excluded.is_empty());
    }

    #[tokio::test]
    async fn reshare_refreshes_or_consumes_seeds() {
        let session =
            PlaintextSessionBuilder::new(MODULUS_V2).reshare_result(4).build();

        let held = session.reshare(Some(share(9)), &[PartyId::new(1)], &[PartyId::new(1)]).await.unwrap();
        assert_eq!(held.value(), 9);

        let received = session.reshare(None, &[PartyId::new(1)], &[PartyId::new(2)]).await.unwrap();
        assert_eq!(received.value(), 4);

        let exhausted = session.reshare(None, &[PartyId::new(1)], &[PartyId::new(2)]).await;
        assert!(matches!(exhausted, Err(SessionError::Reshare(_))));
    }

    #[tokio::test]
    async fn opening_reveals_the_plaintext() {
        let session = PlaintextSessionBuilder::new(MODULUS_V2).build();
        assert_eq!(session.open(share(42), None).await.unwrap(), 42);
        assert_eq!(session.open_array(vec![share(1), share(2)]).await.unwrap(), vec![1, 2]);
    }
}
