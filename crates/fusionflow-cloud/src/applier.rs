//! Resource applier
//!
//! One method per resource kind. Each create submits exactly one mutating
//! call and classifies the synchronous response:
//!
//! - accepted: the returned operation is polled to a terminal state
//! - name reserved: the getter decides whether the existing resource is ours
//! - anything else: fatal, tagged with the resource kind and parent scope

use crate::api::{FusionApi, NetworkInterface};
use crate::error::{ApiError, ProvisionError, Result};
use crate::poller::{PollConfig, PollOutcome, await_operation};
use crate::request::{
    ArrayPost, AvailabilityZonePost, CreateRequest, NetworkInterfaceGroupPost, Patch, RegionPost,
    StorageEndpointPost,
};
use crate::scope::{ResourceKey, ResourceKind, Scope};
use fusionflow_core::{Array, AvailabilityZone, NetworkInterfaceGroup, Region, StorageEndpoint};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Terminal successful state of a single apply step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// The create operation succeeded
    Created,
    /// The name was reserved and the getter confirmed the resource exists
    Reserved,
    /// The create operation failed but the resource exists anyway
    Recovered,
    /// The update operation succeeded
    Updated,
}

impl std::fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyOutcome::Created => write!(f, "created"),
            ApplyOutcome::Reserved => write!(f, "already exists"),
            ApplyOutcome::Recovered => write!(f, "exists (operation reported failure)"),
            ApplyOutcome::Updated => write!(f, "updated"),
        }
    }
}

/// Applies individual resources against a [`FusionApi`]
pub struct ResourceApplier<'a, A: FusionApi + ?Sized> {
    api: &'a A,
    poll: &'a PollConfig,
}

impl<'a, A: FusionApi + ?Sized> ResourceApplier<'a, A> {
    pub fn new(api: &'a A, poll: &'a PollConfig) -> Self {
        Self { api, poll }
    }

    pub async fn apply_region(&self, region: &Region) -> Result<ApplyOutcome> {
        let request = RegionPost::try_from(region)?;
        self.create(Scope::Global, request.into()).await
    }

    pub async fn apply_availability_zone(
        &self,
        region_name: &str,
        zone: &AvailabilityZone,
    ) -> Result<ApplyOutcome> {
        let request = AvailabilityZonePost::try_from(zone)?;
        self.create(Scope::for_region(region_name), request.into())
            .await
    }

    pub async fn apply_network_interface_group(
        &self,
        region_name: &str,
        zone_name: &str,
        group: &NetworkInterfaceGroup,
    ) -> Result<ApplyOutcome> {
        let request = NetworkInterfaceGroupPost::try_from(group)?;
        self.create(
            Scope::for_availability_zone(region_name, zone_name),
            request.into(),
        )
        .await
    }

    pub async fn apply_storage_endpoint(
        &self,
        region_name: &str,
        zone_name: &str,
        endpoint: &StorageEndpoint,
    ) -> Result<ApplyOutcome> {
        let request = StorageEndpointPost::try_from(endpoint)?;
        self.create(
            Scope::for_availability_zone(region_name, zone_name),
            request.into(),
        )
        .await
    }

    pub async fn apply_array(
        &self,
        region_name: &str,
        zone_name: &str,
        array: &Array,
    ) -> Result<ApplyOutcome> {
        let request = ArrayPost::try_from(array)?;
        self.create(
            Scope::for_availability_zone(region_name, zone_name),
            request.into(),
        )
        .await
    }

    pub async fn update_array_maintenance_mode(
        &self,
        region_name: &str,
        zone_name: &str,
        array_name: &str,
        enabled: bool,
    ) -> Result<ApplyOutcome> {
        let target = ResourceKey::new(
            ResourceKind::Array,
            Scope::for_availability_zone(region_name, zone_name),
            array_name,
        );
        self.update(target, Patch::maintenance_mode(enabled)).await
    }

    pub async fn list_network_interfaces(
        &self,
        region_name: &str,
        zone_name: &str,
        array_name: &str,
    ) -> Result<Vec<NetworkInterface>> {
        let scope = Scope::for_array(region_name, zone_name, array_name);
        let interfaces = self
            .api
            .list_network_interfaces(&scope)
            .await
            .map_err(|source| ProvisionError::Api {
                action: "list",
                kind: ResourceKind::NetworkInterface,
                scope: scope.clone(),
                source,
            })?;
        debug!(count = interfaces.len(), "Listed network interfaces in {}", scope);
        Ok(interfaces)
    }

    pub async fn rebind_network_interface(
        &self,
        region_name: &str,
        zone_name: &str,
        array_name: &str,
        interface_name: &str,
        group_name: &str,
    ) -> Result<ApplyOutcome> {
        let target = ResourceKey::new(
            ResourceKind::NetworkInterface,
            Scope::for_array(region_name, zone_name, array_name),
            interface_name,
        );
        self.update(target, Patch::network_interface_group(group_name))
            .await
    }

    async fn create(&self, parent: Scope, request: CreateRequest) -> Result<ApplyOutcome> {
        let key = ResourceKey::new(request.kind(), parent, request.name());

        match self.api.create(&key.parent, &request).await {
            Ok(operation) => {
                debug!(operation_id = %operation.id, "Create accepted for {}", key);
                match await_operation(self.api, operation, Some(&key), self.poll).await? {
                    PollOutcome::Succeeded => {
                        info!("Created {}", key);
                        Ok(ApplyOutcome::Created)
                    }
                    PollOutcome::Confirmed => Ok(ApplyOutcome::Recovered),
                }
            }
            Err(ApiError::NameReserved(_)) => self.confirm_reserved(&key).await,
            Err(source) => Err(ProvisionError::Api {
                action: "create",
                kind: key.kind,
                scope: key.parent,
                source,
            }),
        }
    }

    /// Decide whether a reserved name refers to the resource we intended
    async fn confirm_reserved(&self, key: &ResourceKey) -> Result<ApplyOutcome> {
        let found = self
            .api
            .get(key)
            .await
            .map_err(|source| ProvisionError::Api {
                action: "look up",
                kind: key.kind,
                scope: key.parent.clone(),
                source,
            })?;

        match found {
            Some(resource) if resource.name == key.name => {
                info!("{} already exists", key);
                Ok(ApplyOutcome::Reserved)
            }
            _ => Err(ProvisionError::NameReserved {
                kind: key.kind,
                name: key.name.clone(),
                scope: key.parent.clone(),
                resource_exists: false,
            }),
        }
    }

    async fn update(&self, target: ResourceKey, patch: Patch) -> Result<ApplyOutcome> {
        let operation =
            self.api
                .update(&target, &patch)
                .await
                .map_err(|source| ProvisionError::Api {
                    action: "update",
                    kind: target.kind,
                    scope: target.parent.clone(),
                    source,
                })?;

        debug!(operation_id = %operation.id, "Update accepted for {}", target);
        await_operation(self.api, operation, None, self.poll).await?;
        Ok(ApplyOutcome::Updated)
    }
}
