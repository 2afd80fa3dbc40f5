//! Provisioning error types

use crate::request::RequestError;
use crate::scope::{ResourceKind, Scope};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by an API client implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The create request was rejected because the name is already taken in scope
    #[error("Name already reserved: {0}")]
    NameReserved(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// The client has no endpoint for this kind under the given parent
    #[error("{kind} cannot be addressed in {scope}")]
    Unaddressable { kind: ResourceKind, scope: Scope },
}

/// Fatal provisioning errors
///
/// Every variant aborts the run; re-running the tool is the retry mechanism.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error(
        "Name {name} for {kind} in {scope} is reserved{}",
        if *resource_exists { "" } else { " but the resource does not exist (pending deletion or being created elsewhere)" }
    )]
    NameReserved {
        kind: ResourceKind,
        name: String,
        scope: Scope,
        resource_exists: bool,
    },

    #[error("Operation {operation_id} failed{}: {reason}", resource.as_ref().map(|r| format!(" for {}", r)).unwrap_or_default())]
    OperationFailed {
        operation_id: String,
        resource: Option<String>,
        reason: String,
    },

    #[error("Operation {operation_id} timed out after {elapsed:?}")]
    OperationTimedOut {
        operation_id: String,
        elapsed: Duration,
    },

    #[error("Failed to {action} {kind} in {scope}: {source}")]
    Api {
        action: &'static str,
        kind: ResourceKind,
        scope: Scope,
        #[source]
        source: ApiError,
    },

    #[error("No network interface group to bind the interfaces of array {array} to in {scope}")]
    MissingInterfaceGroup { scope: Scope, array: String },

    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
pub type Result<T> = std::result::Result<T, ProvisionError>;
