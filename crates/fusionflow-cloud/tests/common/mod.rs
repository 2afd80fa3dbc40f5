//! In-memory stand-in for the remote management API

use async_trait::async_trait;
use fusionflow_cloud::{
    ApiError, ApiResult, ApplyOutcome, ApplyReport, CreateRequest, FusionApi, NetworkInterface,
    Operation, OperationError, OperationStatus, Patch, PollConfig, ProvisionError, RemoteResource,
    Reporter, ResourceKey, ResourceKind, Scope, Step,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted behaviour for a create call, keyed by resource name
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Name is reserved but no resource with it can be found
    ReservedGhost,
    /// Synchronous rejection
    Reject(ApiError),
    /// Operation reports failure although the resource was created
    FailButExists,
    /// Operation reports a name-reserved failure and nothing exists
    FailNameReserved,
    /// Operation never leaves the running state
    NeverFinishes,
    /// Operation fails with the given error code and nothing is created
    FailOperation { code: String, message: String },
    /// Operation stays running for `reads` status reads, always suggesting `retry_in_ms`
    SlowWithHint { reads: u32, retry_in_ms: u64 },
}

/// Every call the engine made, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(ResourceKey),
    Update(ResourceKey, Patch),
    Get(ResourceKey),
    List(Scope),
    GetOperation(String),
}

#[derive(Default)]
struct State {
    resources: HashSet<ResourceKey>,
    operations: HashMap<String, Operation>,
    behaviors: HashMap<String, Behavior>,
    rejected_updates: HashSet<ResourceKey>,
    failing_updates: HashSet<ResourceKey>,
    remaining_reads: HashMap<String, u32>,
    interfaces: HashMap<Scope, Vec<NetworkInterface>>,
    maintenance: HashMap<ResourceKey, bool>,
    calls: Vec<Call>,
    next_operation: u32,
}

impl State {
    fn operation(&mut self, status: OperationStatus) -> Operation {
        self.next_operation += 1;
        let operation = Operation::new(format!("op-{}", self.next_operation), status);
        self.operations.insert(operation.id.clone(), operation.clone());
        Operation::new(operation.id, OperationStatus::Pending)
    }

    /// Operation whose status read reports failure with `error`
    fn failed_operation(&mut self, error: OperationError) -> Operation {
        self.next_operation += 1;
        let id = format!("op-{}", self.next_operation);
        let failed = Operation::new(id.clone(), OperationStatus::Failed).with_error(error);
        self.operations.insert(id.clone(), failed);
        Operation::new(id, OperationStatus::Pending)
    }
}

#[derive(Default)]
pub struct FakeFusion {
    state: Mutex<State>,
}

#[allow(dead_code)]
impl FakeFusion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, name: &str, behavior: Behavior) {
        let mut state = self.state.lock().unwrap();
        state.behaviors.insert(name.to_string(), behavior);
    }

    pub fn reject_update(&self, target: ResourceKey) {
        self.state.lock().unwrap().rejected_updates.insert(target);
    }

    /// Updates of `target` are accepted but their operation ends in failure
    pub fn fail_update_operation(&self, target: ResourceKey) {
        self.state.lock().unwrap().failing_updates.insert(target);
    }

    /// Interfaces that appear once the array exists
    pub fn add_interfaces(&self, region: &str, zone: &str, array: &str, names: &[&str]) {
        let interfaces = names
            .iter()
            .map(|name| NetworkInterface {
                name: name.to_string(),
                network_interface_group: None,
            })
            .collect();
        self.state
            .lock()
            .unwrap()
            .interfaces
            .insert(Scope::for_array(region, zone, array), interfaces);
    }

    pub fn insert_resource(&self, key: ResourceKey) {
        self.state.lock().unwrap().resources.insert(key);
    }

    pub fn exists(&self, key: &ResourceKey) -> bool {
        self.state.lock().unwrap().resources.contains(key)
    }

    pub fn resources(&self) -> HashSet<ResourceKey> {
        self.state.lock().unwrap().resources.clone()
    }

    pub fn binding(&self, region: &str, zone: &str, array: &str, interface: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .interfaces
            .get(&Scope::for_array(region, zone, array))?
            .iter()
            .find(|i| i.name == interface)?
            .network_interface_group
            .clone()
    }

    pub fn maintenance_mode(&self, key: &ResourceKey) -> Option<bool> {
        self.state.lock().unwrap().maintenance.get(key).copied()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Kinds and names of all create calls, in order
    pub fn created(&self) -> Vec<(ResourceKind, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create(key) => Some((key.kind, key.name)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl FusionApi for FakeFusion {
    async fn create(&self, parent: &Scope, request: &CreateRequest) -> ApiResult<Operation> {
        let mut state = self.state.lock().unwrap();
        let key = ResourceKey::new(request.kind(), parent.clone(), request.name());
        state.calls.push(Call::Create(key.clone()));

        if state.resources.contains(&key) {
            return Err(ApiError::NameReserved(key.name));
        }

        match state.behaviors.get(&key.name).cloned() {
            Some(Behavior::ReservedGhost) => Err(ApiError::NameReserved(key.name)),
            Some(Behavior::Reject(error)) => Err(error),
            Some(Behavior::FailButExists) => {
                state.resources.insert(key);
                Ok(state.operation(OperationStatus::Failed))
            }
            Some(Behavior::FailNameReserved) => Ok(state.failed_operation(OperationError::new(
                "NameReserved",
                "name is pending deletion",
            ))),
            Some(Behavior::FailOperation { code, message }) => {
                Ok(state.failed_operation(OperationError::new(code, message)))
            }
            Some(Behavior::NeverFinishes) => Ok(state.operation(OperationStatus::Running)),
            Some(Behavior::SlowWithHint { reads, retry_in_ms }) => {
                state.resources.insert(key);
                let operation = state.operation(OperationStatus::Running);
                if let Some(stored) = state.operations.get_mut(&operation.id) {
                    stored.retry_in = Some(retry_in_ms);
                }
                state.remaining_reads.insert(operation.id.clone(), reads);
                Ok(operation.with_retry_in(retry_in_ms))
            }
            None => {
                if key.kind == ResourceKind::Array {
                    state.maintenance.insert(key.clone(), true);
                }
                state.resources.insert(key);
                Ok(state.operation(OperationStatus::Succeeded))
            }
        }
    }

    async fn update(&self, target: &ResourceKey, patch: &Patch) -> ApiResult<Operation> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Update(target.clone(), patch.clone()));

        if state.rejected_updates.contains(target) {
            return Err(ApiError::Rejected {
                status: 400,
                code: Some("InvalidPatch".to_string()),
                message: "patch rejected".to_string(),
            });
        }

        if state.failing_updates.contains(target) {
            return Ok(state.failed_operation(OperationError::new(
                "ArrayBusy",
                "array is being serviced",
            )));
        }

        match patch {
            Patch::MaintenanceMode(value) => {
                if !state.resources.contains(target) {
                    return Err(ApiError::NotFound(target.to_string()));
                }
                state.maintenance.insert(target.clone(), value.value);
            }
            Patch::NetworkInterfaceGroup(value) => {
                let interface = state
                    .interfaces
                    .get_mut(&target.parent)
                    .and_then(|list| list.iter_mut().find(|i| i.name == target.name))
                    .ok_or_else(|| ApiError::NotFound(target.to_string()))?;
                interface.network_interface_group = Some(value.value.clone());
            }
        }
        Ok(state.operation(OperationStatus::Succeeded))
    }

    async fn get(&self, key: &ResourceKey) -> ApiResult<Option<RemoteResource>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Get(key.clone()));
        Ok(state.resources.contains(key).then(|| RemoteResource {
            name: key.name.clone(),
            id: None,
        }))
    }

    async fn list_network_interfaces(&self, array: &Scope) -> ApiResult<Vec<NetworkInterface>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List(array.clone()));
        Ok(state.interfaces.get(array).cloned().unwrap_or_default())
    }

    async fn get_operation(&self, id: &str) -> ApiResult<Operation> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetOperation(id.to_string()));

        let finished = match state.remaining_reads.get_mut(id) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                false
            }
            Some(_) => true,
            None => false,
        };
        if finished {
            if let Some(stored) = state.operations.get_mut(id) {
                stored.status = OperationStatus::Succeeded;
                stored.retry_in = None;
            }
        }

        state
            .operations
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }
}

/// Reporter that keeps every line it was given
#[derive(Default)]
pub struct RecordingReporter {
    pub attempts: Mutex<Vec<String>>,
    pub outcomes: Mutex<Vec<(String, ApplyOutcome)>>,
    pub failures: Mutex<Vec<String>>,
    pub completed: Mutex<bool>,
}

#[allow(dead_code)]
impl RecordingReporter {
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn completed(&self) -> bool {
        *self.completed.lock().unwrap()
    }
}

impl Reporter for RecordingReporter {
    fn attempt(&self, step: &Step) {
        self.attempts.lock().unwrap().push(step.to_string());
    }

    fn applied(&self, step: &Step, outcome: ApplyOutcome) {
        self.outcomes
            .lock()
            .unwrap()
            .push((step.key().name.clone(), outcome));
    }

    fn failed(&self, _step: &Step, error: &ProvisionError) {
        self.failures.lock().unwrap().push(error.to_string());
    }

    fn complete(&self, _report: &ApplyReport) {
        *self.completed.lock().unwrap() = true;
    }
}

#[allow(dead_code)]
pub fn fast_poll() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(10),
        max_interval: Duration::from_millis(50),
        multiplier: 2.0,
        timeout: Duration::from_secs(5),
    }
}

#[allow(dead_code)]
pub fn zone_key(region: &str, zone: &str) -> ResourceKey {
    ResourceKey::new(ResourceKind::AvailabilityZone, Scope::for_region(region), zone)
}

#[allow(dead_code)]
pub fn in_zone(kind: ResourceKind, region: &str, zone: &str, name: &str) -> ResourceKey {
    ResourceKey::new(kind, Scope::for_availability_zone(region, zone), name)
}
