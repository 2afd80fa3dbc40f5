//! API capability consumed by the provisioning engine
//!
//! The engine never talks to a transport directly. Anything that implements
//! [`FusionApi`] (the REST client, or an in-memory fake in tests) can drive it.

use crate::error::ApiResult;
use crate::request::{CreateRequest, Patch};
use crate::scope::{ResourceKey, Scope};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error codes that mean "this name is already taken in scope"
const NAME_RESERVED_CODES: &[&str] = &["NameReserved", "NameAlreadyExists", "AlreadyExists"];

pub fn is_name_reserved_code(code: &str) -> bool {
    NAME_RESERVED_CODES.contains(&code)
}

/// Remote management API abstraction
///
/// Every mutating call returns an [`Operation`] handle that has to be polled
/// to a terminal state.
#[async_trait]
pub trait FusionApi: Send + Sync {
    /// Submit a create request under `parent`
    ///
    /// Returns [`crate::ApiError::NameReserved`] when the name is already taken.
    async fn create(&self, parent: &Scope, request: &CreateRequest) -> ApiResult<Operation>;

    /// Patch an existing resource
    async fn update(&self, target: &ResourceKey, patch: &Patch) -> ApiResult<Operation>;

    /// Look up a resource by name; `Ok(None)` when it does not exist
    async fn get(&self, key: &ResourceKey) -> ApiResult<Option<RemoteResource>>;

    /// List the live network interfaces of an array
    async fn list_network_interfaces(&self, array: &Scope) -> ApiResult<Vec<NetworkInterface>>;

    /// Read the current state of an operation
    async fn get_operation(&self, id: &str) -> ApiResult<Operation>;
}

/// Status of an asynchronous operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "running")]
    Running,
    #[serde(alias = "succeeded")]
    Succeeded,
    #[serde(alias = "failed")]
    Failed,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Succeeded | OperationStatus::Failed)
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::Pending => write!(f, "pending"),
            OperationStatus::Running => write!(f, "running"),
            OperationStatus::Succeeded => write!(f, "succeeded"),
            OperationStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Handle returned by every mutating call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,

    pub status: OperationStatus,

    /// Server-suggested delay before the next poll, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_in: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

impl Operation {
    pub fn new(id: impl Into<String>, status: OperationStatus) -> Self {
        Self {
            id: id.into(),
            status,
            retry_in: None,
            error: None,
        }
    }

    pub fn with_error(mut self, error: OperationError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_retry_in(mut self, retry_in_ms: u64) -> Self {
        self.retry_in = Some(retry_in_ms);
        self
    }
}

/// Failure details attached to a failed operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pure_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationError {
    pub fn new(pure_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pure_code: Some(pure_code.into()),
            message: Some(message.into()),
        }
    }

    pub fn is_name_reserved(&self) -> bool {
        self.pure_code.as_deref().is_some_and(is_name_reserved_code)
    }

    pub fn reason(&self) -> String {
        match (&self.pure_code, &self.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (Some(code), None) => code.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => "no reason reported".to_string(),
        }
    }
}

/// Result of a getter lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResource {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Live network interface of an array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_interface_group: Option<String>,
}
