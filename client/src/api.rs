//! Accessor for the benchmarking REST API.

use crate::types::{
    ApiFailure, ApiResponse, DatasetListing, FunctionCallResponse, FunctionListing, NewBenchmarkingSubmission,
    NewSession, NewSessionResponse, NewSubmissionResponse, SessionListing, SessionMetadata, SessionStatusFilter,
    SplitSubmission,
};
use additive_sharing::{AdditiveSecretSharer, SharerError};
use math_lib::MODULUS_V2;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// Options for the [Benchmarking] accessor.
#[derive(Debug, Clone)]
pub struct BenchmarkingOpts {
    /// Base URL of the benchmarking service.
    pub base_url: String,
}

/// Accessor for the benchmarking API.
///
/// Transport and body decode failures are folded into the same envelope shape the service
/// uses for its own errors, so callers deal with exactly one failure channel.
pub struct Benchmarking {
    base_url: String,
    http: reqwest::Client,
}

impl Benchmarking {
    /// Creates an accessor against the given service.
    pub fn new(opts: BenchmarkingOpts) -> Self {
        Self { base_url: opts.base_url, http: reqwest::Client::new() }
    }

    /// Creates a new benchmarking session.
    pub async fn new_session(&self, data: &NewSession) -> ApiResponse<NewSessionResponse> {
        self.post_json(format!("{}/api/v1", self.base_url), data).await
    }

    /// Lists sessions, optionally filtered by processing status.
    pub async fn list_sessions(&self, status: Option<SessionStatusFilter>) -> ApiResponse<SessionListing> {
        let mut url = format!("{}/api/v1", self.base_url);
        if let Some(status) = status {
            url = format!("{url}?status={}", status.as_query_value());
        }
        self.get_json(url).await
    }

    /// Retrieves metadata about a benchmarking session.
    pub async fn get_session(&self, session_id: &str) -> ApiResponse<SessionMetadata> {
        self.get_json(format!("{}/api/v1/{session_id}", self.base_url)).await
    }

    /// Lists all existing datasets.
    pub async fn list_datasets(&self) -> ApiResponse<DatasetListing> {
        self.get_json(format!("{}/api/v1/benchmarking/dataset", self.base_url)).await
    }

    /// Starts a benchmarking session against a pre-existing dataset.
    pub async fn new_dataset_session(&self, dataset_id: &str, data: &NewSession) -> ApiResponse<NewSessionResponse> {
        self.post_json(format!("{}/api/v1/benchmarking/dataset/{dataset_id}/new_session", self.base_url), data).await
    }

    /// Lists the named functions available for evaluation.
    pub async fn list_functions(&self) -> ApiResponse<FunctionListing> {
        self.get_json(format!("{}/api/v1/function", self.base_url)).await
    }

    /// Starts a computation session for a named function.
    pub async fn new_function_call(&self, function_id: &str, delegated: bool) -> ApiResponse<FunctionCallResponse> {
        #[derive(Serialize)]
        struct Body {
            delegated: bool,
        }
        self.post_json(format!("{}/api/v1/function/{function_id}/new_session", self.base_url), &Body { delegated })
            .await
    }

    /// Splits a submission into one additive share record per processor host.
    ///
    /// Record `idx` carries share `idx` of every value of the template, in the template's
    /// value order, so the processors jointly hold the data without any one of them learning
    /// it. Entropy is the only side effect.
    pub fn compute_submission(
        &self,
        template: &NewBenchmarkingSubmission,
        processor_hostnames: &[String],
    ) -> Result<SplitSubmission, SharerError> {
        let sharer = AdditiveSecretSharer::new(processor_hostnames.len(), MODULUS_V2)?;
        let shares: Vec<_> = template.integer_values.iter().map(|value| sharer.generate_shares(*value)).collect();

        let data = (0..processor_hostnames.len())
            .map(|host_index| NewBenchmarkingSubmission {
                session_id: template.session_id.clone(),
                submitter: template.submitter.clone(),
                integer_values: shares.iter().map(|value_shares| value_shares[host_index].value() as i64).collect(),
            })
            .collect();

        Ok(SplitSubmission { processor_hostnames: processor_hostnames.to_vec(), data })
    }

    /// Submits split data to its processor hosts.
    ///
    /// The records typically stem from [compute_submission][Benchmarking::compute_submission].
    /// The first failing host's envelope short-circuits the loop and becomes the overall
    /// result; remaining hosts are not contacted.
    pub async fn new_submission(&self, submission: &SplitSubmission) -> ApiResponse<NewSubmissionResponse> {
        let SplitSubmission { processor_hostnames, data } = submission;
        if processor_hostnames.len() != data.len() {
            return ApiResponse::Failure(ApiFailure::new("submission record count does not match processor count"));
        }

        let mut records = processor_hostnames.iter().zip(data);
        let Some((hostname, record)) = records.next() else {
            return ApiResponse::Failure(ApiFailure::new("no processors given"));
        };
        let first_success = match self.submit_record(hostname, record).await {
            ApiResponse::Success(success) => success,
            failure => return failure,
        };
        for (hostname, record) in records {
            match self.submit_record(hostname, record).await {
                ApiResponse::Success(_) => (),
                failure => return failure,
            }
        }
        ApiResponse::Success(first_success)
    }

    async fn submit_record(&self, hostname: &str, record: &NewBenchmarkingSubmission) -> ApiResponse<NewSubmissionResponse> {
        debug!("submitting shares for session {} to {hostname}", record.session_id);
        self.post_json(format!("{hostname}/api/v1/{}", record.session_id), record).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> ApiResponse<T> {
        self.request_json(self.http.get(url)).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(&self, url: String, body: &B) -> ApiResponse<T> {
        self.request_json(self.http.post(url).json(body)).await
    }

    async fn request_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ApiResponse<T> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ApiResponse::Failure(ApiFailure::new(format!("failed to reach the API: {e}"))),
        };
        match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => ApiResponse::Failure(ApiFailure::new(format!("failed to parse server response: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accessor() -> Benchmarking {
        Benchmarking::new(BenchmarkingOpts { base_url: "https://benchmarking.invalid".into() })
    }

    fn template(values: Vec<i64>) -> NewBenchmarkingSubmission {
        NewBenchmarkingSubmission { session_id: "session-1".into(), submitter: "acme corp".into(), integer_values: values }
    }

    #[test]
    fn submissions_split_into_one_record_per_host() {
        let hosts = vec!["https://a.invalid".to_string(), "https://b.invalid".to_string(), "https://c.invalid".to_string()];
        let split = accessor().compute_submission(&template(vec![42, 7, 1_000_000]), &hosts).unwrap();

        assert_eq!(split.processor_hostnames, hosts);
        assert_eq!(split.data.len(), 3);
        for record in &split.data {
            assert_eq!(record.session_id, "session-1");
            assert_eq!(record.submitter, "acme corp");
            assert_eq!(record.integer_values.len(), 3);
        }

        // Share `idx` of every record reassembles value `idx` mod the field.
        for (index, value) in [42i64, 7, 1_000_000].iter().enumerate() {
            let sum: i64 = split.data.iter().map(|record| record.integer_values[index]).sum();
            assert_eq!(sum % MODULUS_V2 as i64, *value);
        }
    }

    #[test]
    fn splitting_requires_at_least_one_host() {
        assert!(accessor().compute_submission(&template(vec![42]), &[]).is_err());
    }

    #[tokio::test]
    async fn submitting_without_processors_fails_the_envelope() {
        let submission = SplitSubmission { processor_hostnames: vec![], data: vec![] };
        let response = accessor().new_submission(&submission).await;
        let failure = response.into_result().unwrap_err();
        assert_eq!(failure.message, "no processors given");
    }

    #[tokio::test]
    async fn mismatched_record_count_fails_the_envelope() {
        let submission =
            SplitSubmission { processor_hostnames: vec!["https://a.invalid".into()], data: vec![] };
        let response = accessor().new_submission(&submission).await;
        assert!(!response.is_success());
    }
}
