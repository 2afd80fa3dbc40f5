//! FusionFlow provisioning engine
//!
//! Applies a declarative topology idempotently against a remote management
//! API whose mutations are asynchronous, pollable operations. Re-running
//! against a partially or fully provisioned environment converges to the same
//! end state: a create that collides with an existing resource of the same
//! name is confirmed through a lookup and treated as success.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 fusion apply                     │
//! └─────────────────┬───────────────────────────────┘
//!                   │ Topology
//! ┌─────────────────▼───────────────────────────────┐
//! │               fusionflow-cloud                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  Provisioner (traversal, ordering)        │   │
//! │  └──────────────────┬───────────────────────┘   │
//! │  ┌──────────────────▼───────────────────────┐   │
//! │  │  ResourceApplier (create / NameReserved)  │   │
//! │  └──────────────────┬───────────────────────┘   │
//! │  ┌──────────────────▼───────────────────────┐   │
//! │  │  await_operation (bounded polling)        │   │
//! │  └──────────────────────────────────────────┘   │
//! └─────────────────┬───────────────────────────────┘
//!                   │ trait FusionApi
//! ┌─────────────────▼───────────────┐
//! │  fusionflow-cloud-http (REST)   │
//! └─────────────────────────────────┘
//! ```

pub mod action;
pub mod api;
pub mod applier;
pub mod engine;
pub mod error;
pub mod poller;
pub mod reporter;
pub mod request;
pub mod scope;

// Re-exports
pub use action::{Action, ActionType, AppliedResource, ApplyReport, Plan, PlanSummary, ReportSummary};
pub use api::{
    FusionApi, NetworkInterface, Operation, OperationError, OperationStatus, RemoteResource,
    is_name_reserved_code,
};
pub use applier::{ApplyOutcome, ResourceApplier};
pub use engine::{Provisioner, rebind_target};
pub use error::{ApiError, ApiResult, ProvisionError, Result};
pub use poller::{PollConfig, PollOutcome, await_operation};
pub use reporter::{Reporter, Step, TracingReporter};
pub use request::{CreateRequest, Patch, RequestError, check_interface_group, validate_topology};
pub use scope::{ResourceKey, ResourceKind, Scope};
