//! REST client for FusionFlow
//!
//! Implements [`fusionflow_cloud::FusionApi`] against the management API's
//! versioned REST surface (`/api/1.1/...`) using `reqwest`.
//!
//! # Requirements
//!
//! - `FUSION_ACCESS_TOKEN`: bearer token sent with every request
//! - `FUSION_API_HOST` (optional): API base URL, defaults to [`DEFAULT_API_HOST`]
//! - `FUSION_REQUEST_TIMEOUT_SECS` (optional): per-request timeout
//!
//! # Example
//!
//! ```ignore
//! use fusionflow_cloud::{PollConfig, Provisioner, TracingReporter};
//! use fusionflow_cloud_http::{ClientConfig, FusionClient};
//!
//! let client = FusionClient::new(ClientConfig::from_env()?)?;
//! let poll = PollConfig::default();
//! let report = Provisioner::new(&client, &poll, &TracingReporter)
//!     .run(&topology)
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::FusionClient;
pub use config::{
    ACCESS_TOKEN_ENV, API_HOST_ENV, ClientConfig, DEFAULT_API_HOST, REQUEST_TIMEOUT_ENV,
};
pub use error::{HttpError, Result};
