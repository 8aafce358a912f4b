//! API payload types for the benchmarking service.
//!
//! Every response from the service is an envelope: `{ "success": true, ... }` on the happy
//! path and `{ "success": false, "message": ... }` otherwise. Envelope failures are
//! first-class values here, not errors: callers inspect them and short-circuit their own
//! logic.

use serde::{Deserialize, Serialize};

/// Identifier of a benchmarking session.
pub type SessionId = String;

/// Identifier of a named server-side function.
pub type FunctionId = String;

/// The computation a session input dimension is subjected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComputationKind {
    /// Rank a value within submitted data.
    Ranking,
    /// Rank a value within a pre-existing dataset.
    RankingDataset,
    /// Dataset ranking delegated to compute-only processors.
    RankingDatasetDelegated,
    /// Evaluate a named function.
    FunctionCall,
    /// Function evaluation delegated to compute-only processors.
    FunctionCallDelegated,
}

/// An error envelope from the API.
#[derive(Debug, Clone, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiFailure {
    /// Always `false`.
    pub success: bool,

    /// Human-readable failure description.
    pub message: String,
}

impl ApiFailure {
    /// Builds a failure envelope from a message, as the service itself would.
    pub fn new(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

/// A success-or-failure envelope around an API response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    /// The operation succeeded.
    Success(T),
    /// The operation failed with a service-provided message.
    Failure(ApiFailure),
}

impl<T> ApiResponse<T> {
    /// Converts the envelope into a result.
    pub fn into_result(self) -> Result<T, ApiFailure> {
        match self {
            ApiResponse::Success(value) => Ok(value),
            ApiResponse::Failure(failure) => Err(failure),
        }
    }

    /// Whether this envelope carries a success.
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }
}

/// Plaintext data to be split and submitted to the processors of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBenchmarkingSubmission {
    /// The session the data belongs to.
    pub session_id: SessionId,

    /// Display name of the submitting party.
    pub submitter: String,

    /// The values being submitted, one per session input dimension.
    pub integer_values: Vec<i64>,
}

/// A submission split into one additive share record per processor host.
///
/// Record `idx` carries share `idx` of every original value, under the same value ordering as
/// the source submission.
#[derive(Debug, Clone)]
pub struct SplitSubmission {
    /// The hosts the records are destined for.
    pub processor_hostnames: Vec<String>,

    /// One record per host.
    pub data: Vec<NewBenchmarkingSubmission>,
}

/// Description of a new benchmarking session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    /// Session display title.
    pub title: String,

    /// Number of parties participating in the computation.
    pub num_parties: u16,

    /// The session's input dimensions.
    pub input: Vec<SessionInput>,
}

/// One input dimension of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    /// Dimension display title.
    pub title: String,

    /// The computation to run for this dimension.
    pub computation: ComputationKind,

    /// Delegation options, present only for delegated sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<DelegationOptions>,
}

/// Options for a dimension computed by delegated processors.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationOptions {
    /// Always `true` when present.
    pub delegated: bool,

    /// Number of dataset shards processed per protocol run.
    pub num_shards: u32,

    /// Index of the shard this run covers.
    pub shard_id: u32,
}

/// Success response to a session creation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResponse {
    /// Always `true`.
    pub success: bool,

    /// The created session.
    pub id: SessionId,

    /// The secure-computation coordinator to connect to.
    pub coordinator_url: String,
}

/// Success response to a submission request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmissionResponse {
    /// Always `true`.
    pub success: bool,

    /// The stored submission.
    pub id: String,
}

/// Filter for session listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatusFilter {
    /// Sessions still collecting submissions or computing.
    Processing,
    /// Sessions whose results are available.
    Finished,
}

impl SessionStatusFilter {
    pub(crate) fn as_query_value(&self) -> &'static str {
        match self {
            SessionStatusFilter::Processing => "processing",
            SessionStatusFilter::Finished => "finished",
        }
    }
}

/// Success response when listing sessions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListing {
    /// Always `true`.
    pub success: bool,

    /// The matching sessions.
    pub sessions: Vec<SessionSummary>,
}

/// One entry of a session listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session display title.
    pub title: String,

    /// Session id.
    pub id: SessionId,

    /// Number of participating parties.
    pub num_parties: u16,

    /// Number of submissions received so far.
    pub num_submissions: u32,
}

/// Server-side processing status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    /// Not yet started.
    Pending,
    /// Currently computing.
    Processing,
    /// Completed successfully.
    Finished,
    /// Completed with an error.
    FinishedWithError,
}

/// Success response when fetching session metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    /// Always `true`.
    pub success: bool,

    /// Session id.
    pub id: SessionId,

    /// Session display title.
    pub title: String,

    /// Number of participating parties.
    pub num_parties: u16,

    /// Titles of the input dimensions.
    pub input_titles: Vec<String>,

    /// Hosts processing the session's submissions.
    pub processor_hostnames: Vec<String>,

    /// Computation kinds of the input dimensions.
    pub input_computations: Vec<ComputationKind>,

    /// Processing state, absent until processing starts.
    pub process: Option<ProcessState>,

    /// The submissions received so far.
    pub submissions: Vec<SubmissionInfo>,

    /// Per-submission results, available once processing finishes.
    pub results: Vec<SessionResult>,
}

/// Processing state of a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessState {
    /// Current status.
    pub status: ProcessingStatus,
}

/// A submission as reported by session metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInfo {
    /// Display name of the submitting party.
    pub submitter: String,
}

/// Computed results for one submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    /// One result per input dimension.
    pub integer_results: Vec<i64>,

    /// The submission the results belong to.
    pub submission: SubmissionInfo,
}

/// Success response when listing datasets.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetListing {
    /// Always `true`.
    pub success: bool,

    /// The available datasets.
    pub datasets: Vec<Dataset>,
}

/// A dataset available for benchmarking against.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Dataset display name.
    pub name: String,

    /// Dataset id.
    pub id: String,

    /// The dimensions a benchmark ranks against.
    pub dimensions: Vec<String>,

    /// The dimensions a submission must provide.
    pub input_dimensions: Vec<String>,
}

/// Success response when listing named functions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionListing {
    /// Always `true`.
    pub success: bool,

    /// The available functions.
    pub functions: Vec<FunctionMetadata>,
}

/// Metadata of a named server-side function.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionMetadata {
    /// Function id.
    pub id: FunctionId,

    /// Names of the function's inputs.
    pub inputs: Vec<String>,

    /// Names of the function's outputs.
    pub outputs: Vec<String>,
}

/// Success response to a function call session request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallResponse {
    /// Always `true`.
    pub success: bool,

    /// The created computation session.
    pub session_id: SessionId,

    /// The secure-computation coordinator to connect to.
    pub coordinator_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelopes_deserialize_by_shape() {
        let success: ApiResponse<NewSessionResponse> =
            serde_json::from_str(r#"{"success":true,"id":"abc","coordinatorUrl":"https://coordinator"}"#).unwrap();
        assert!(success.is_success());

        let failure: ApiResponse<NewSessionResponse> =
            serde_json::from_str(r#"{"success":false,"message":"nope"}"#).unwrap();
        let failure = failure.into_result().unwrap_err();
        assert_eq!(failure.message, "nope");
    }

    #[test]
    fn computation_kinds_use_wire_names() {
        assert_eq!(serde_json::to_string(&ComputationKind::Ranking).unwrap(), r#""RANKING""#);
        assert_eq!(
            serde_json::to_string(&ComputationKind::RankingDatasetDelegated).unwrap(),
            r#""RANKING_DATASET_DELEGATED""#
        );
    }

    #[test]
    fn delegation_options_are_omitted_when_absent() {
        let input =
            SessionInput { title: "margin".into(), computation: ComputationKind::Ranking, options: None };
        assert_eq!(serde_json::to_string(&input).unwrap(), r#"{"title":"margin","computation":"RANKING"}"#);
    }
}
