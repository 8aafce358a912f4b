//! Client SDK for confidential benchmarking.
//!
//! Lets a party rank its private values within a dataset held by another party without either
//! side revealing raw data. Plaintext values leave the client only as additive secret shares
//! (one per processor host, over REST) or as masked values inside a secure-computation
//! session; only final ranks are opened, and only to the parties the topology entitles.
//!
//! The secure-computation runtime is consumed through the
//! [SessionConnector][protocols::SessionConnector] facade, so the orchestration here is
//! backend-agnostic.

#![deny(missing_docs)]

pub mod api;
pub mod client;
pub mod protocol;
pub mod stats;
pub mod types;

pub use api::{Benchmarking, BenchmarkingOpts};
pub use client::{BenchmarkingResult, ClientError, FunctionCallResult, MpcClient};
pub use protocol::{BenchmarkingRank, Topology};
pub use stats::quantile;
