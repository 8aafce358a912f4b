//! The orchestrating client.

use crate::{
    api::Benchmarking,
    protocol::{benchmarking_protocol, function_call_protocol, BenchmarkingRank, Topology},
    types::{ApiFailure, ComputationKind, Dataset, FunctionId, NewSession, SessionId, SessionInput},
};
use protocols::{ComputeSession, ProtocolError, SessionConfig, SessionConnector, SessionError};
use tracing::{debug, info};

/// An error during an orchestrated computation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The REST API reported a failure envelope.
    #[error("api failure: {0}")]
    Api(#[from] ApiFailure),

    /// The secure-computation session failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The protocol run failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Result of benchmarking a submission against a dataset.
#[derive(Debug, Clone)]
pub struct BenchmarkingResult {
    /// The session the computation ran under.
    pub session_id: SessionId,

    /// One rank per input dimension, in input order.
    pub ranks: Vec<BenchmarkingRank>,
}

/// Result of evaluating a named function.
#[derive(Debug, Clone)]
pub struct FunctionCallResult {
    /// The session the computation ran under.
    pub session_id: SessionId,

    /// The opened function output.
    pub result: u64,
}

/// Orchestrates benchmarking and function-call computations.
///
/// Each computation creates one session via the REST API, connects one secure-computation
/// session through the given connector, drives the per-dimension protocol sequentially and
/// disconnects exactly once, on success and failure paths alike. A facade error is fatal to
/// the run: there are no retries and no partial results.
pub struct MpcClient<C> {
    api: Benchmarking,
    connector: C,
}

impl<C: SessionConnector> MpcClient<C> {
    /// Creates a client over the given API accessor and session connector.
    pub fn new(api: Benchmarking, connector: C) -> Self {
        Self { api, connector }
    }

    /// The underlying API accessor.
    pub fn api(&self) -> &Benchmarking {
        &self.api
    }

    /// Ranks the given secret values against a dataset, one value per dataset dimension.
    ///
    /// Results preserve the input dimension order.
    pub async fn perform_benchmarking(
        &self,
        dataset: &Dataset,
        secret_data: &[u64],
        topology: Topology,
    ) -> Result<BenchmarkingResult, ClientError> {
        let request = NewSession {
            title: dataset.name.clone(),
            num_parties: topology.party_count(),
            input: dataset
                .dimensions
                .iter()
                .map(|dimension| SessionInput {
                    title: dimension.clone(),
                    computation: ComputationKind::Ranking,
                    options: topology.delegation_options(),
                })
                .collect(),
        };
        let created = self.api.new_dataset_session(&dataset.id, &request).await.into_result()?;
        info!("benchmarking session {} created against dataset {}", created.id, dataset.id);

        let ranks = self.execute_benchmarking(&created.coordinator_url, &created.id, secret_data, topology).await?;
        Ok(BenchmarkingResult { session_id: created.id, ranks })
    }

    /// Evaluates a named function over the given secret input.
    pub async fn perform_function_call(
        &self,
        function_id: &FunctionId,
        secret_input: &[u64],
        topology: Topology,
    ) -> Result<FunctionCallResult, ClientError> {
        let created = self.api.new_function_call(function_id, topology.is_delegated()).await.into_result()?;
        info!("function call session {} created for function {function_id}", created.session_id);

        let result = self.execute_function_call(&created.coordinator_url, &created.session_id, secret_input, topology).await?;
        Ok(FunctionCallResult { session_id: created.session_id, result })
    }

    async fn execute_benchmarking(
        &self,
        coordinator_url: &str,
        session_id: &SessionId,
        secret_data: &[u64],
        topology: Topology,
    ) -> Result<Vec<BenchmarkingRank>, ClientError> {
        let config = SessionConfig::new(topology.party_id(), topology.party_count());
        let session = self.connector.connect(coordinator_url, session_id, config).await?;

        let outcome = Self::run_dimensions(&session, secret_data, topology).await;
        let disconnected = session.disconnect(true, true).await;

        let ranks = outcome?;
        disconnected?;
        Ok(ranks)
    }

    async fn execute_function_call(
        &self,
        coordinator_url: &str,
        session_id: &SessionId,
        secret_input: &[u64],
        topology: Topology,
    ) -> Result<u64, ClientError> {
        let config = SessionConfig::new(topology.party_id(), topology.party_count());
        let session = self.connector.connect(coordinator_url, session_id, config).await?;

        let outcome = function_call_protocol(&session, secret_input, topology).await;
        let disconnected = session.disconnect(true, true).await;

        let result = outcome?;
        disconnected?;
        Ok(result)
    }

    async fn run_dimensions(
        session: &C::Session,
        secret_data: &[u64],
        topology: Topology,
    ) -> Result<Vec<BenchmarkingRank>, ProtocolError> {
        let mut ranks = Vec::with_capacity(secret_data.len());
        for (dimension, value) in secret_data.iter().enumerate() {
            debug!("ranking dimension {dimension}");
            ranks.push(benchmarking_protocol(session, *value, topology).await?);
        }
        Ok(ranks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::BenchmarkingOpts, protocol::DATASET_PARTY};
    use protocols::simulator::plaintext::PlaintextConnector;

    fn client(connector: PlaintextConnector) -> MpcClient<PlaintextConnector> {
        let api = Benchmarking::new(BenchmarkingOpts { base_url: "http://localhost:9".into() });
        MpcClient::new(api, connector)
    }

    #[tokio::test]
    async fn direct_run_ranks_every_dimension() {
        let connector = PlaintextConnector::new().party_array(DATASET_PARTY, vec![10, 20, 30, 40]);
        let probe = connector.clone();
        let session_id = "session".to_string();

        let ranks = client(connector)
            .execute_benchmarking("http://coordinator", &session_id, &[25, 5], Topology::Direct)
            .await
            .unwrap();

        assert_eq!(ranks.len(), 2);
        assert_eq!((ranks[0].rank, ranks[0].quantile), (3, 3));
        assert_eq!((ranks[1].rank, ranks[1].quantile), (1, 1));
        assert_eq!(probe.disconnects(), 1);
    }

    #[tokio::test]
    async fn failed_run_still_disconnects() {
        // No seeded reshare results, so the delegated protocol fails mid-run.
        let connector = PlaintextConnector::new();
        let probe = connector.clone();
        let session_id = "session".to_string();

        let result = client(connector)
            .execute_benchmarking("http://coordinator", &session_id, &[25], Topology::Delegated { num_shards: 1 })
            .await;

        assert!(matches!(result, Err(ClientError::Protocol(_))));
        assert_eq!(probe.disconnects(), 1);
    }
}
