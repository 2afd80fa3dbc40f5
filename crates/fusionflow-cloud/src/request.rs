//! Typed request bodies
//!
//! Each resource kind has an explicit builder struct that is validated when it
//! is constructed from the topology node, so malformed declarations are caught
//! before anything is sent to the API.

use crate::scope::ResourceKind;
use fusionflow_core::{
    Array, AvailabilityZone, DiscoveryInterface, EndpointType, GroupType, NetworkInterfaceGroup,
    Region, StorageEndpoint, Topology,
};
use serde::Serialize;
use std::net::IpAddr;
use thiserror::Error;

const MIN_MTU: u32 = 1280;
const MAX_MTU: u32 = 9216;

/// A topology node that cannot be turned into a valid request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind} '{name}': {reason}")]
pub struct RequestError {
    pub kind: ResourceKind,
    pub name: String,
    pub reason: String,
}

impl RequestError {
    fn new(kind: ResourceKind, name: &str, reason: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionPost {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl TryFrom<&Region> for RegionPost {
    type Error = RequestError;

    fn try_from(region: &Region) -> Result<Self, Self::Error> {
        require_name(ResourceKind::Region, &region.name)?;
        Ok(Self {
            name: region.name.clone(),
            display_name: region.display_name.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityZonePost {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl TryFrom<&AvailabilityZone> for AvailabilityZonePost {
    type Error = RequestError;

    fn try_from(zone: &AvailabilityZone) -> Result<Self, Self::Error> {
        require_name(ResourceKind::AvailabilityZone, &zone.name)?;
        Ok(Self {
            name: zone.name.clone(),
            display_name: zone.display_name.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInterfaceGroupPost {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub group_type: GroupType,
    pub eth: EthPost,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EthPost {
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
}

impl TryFrom<&NetworkInterfaceGroup> for NetworkInterfaceGroupPost {
    type Error = RequestError;

    fn try_from(group: &NetworkInterfaceGroup) -> Result<Self, Self::Error> {
        let kind = ResourceKind::NetworkInterfaceGroup;
        require_name(kind, &group.name)?;
        check_cidr(kind, &group.name, "eth.prefix", &group.eth.prefix)?;
        if let Some(gateway) = &group.eth.gateway {
            check_address(kind, &group.name, "eth.gateway", gateway)?;
        }
        check_mtu(kind, &group.name, group.eth.mtu)?;

        Ok(Self {
            name: group.name.clone(),
            display_name: group.display_name.clone(),
            group_type: group.group_type,
            eth: EthPost {
                prefix: group.eth.prefix.clone(),
                gateway: group.eth.gateway.clone(),
                mtu: group.eth.mtu,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageEndpointPost {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub endpoint_type: EndpointType,
    pub iscsi: IscsiPost,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IscsiPost {
    pub discovery_interfaces: Vec<DiscoveryInterfacePost>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryInterfacePost {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub network_interface_groups: Vec<String>,
}

impl TryFrom<&StorageEndpoint> for StorageEndpointPost {
    type Error = RequestError;

    fn try_from(endpoint: &StorageEndpoint) -> Result<Self, Self::Error> {
        let kind = ResourceKind::StorageEndpoint;
        require_name(kind, &endpoint.name)?;
        if endpoint.iscsi.discovery_interfaces.is_empty() {
            return Err(RequestError::new(
                kind,
                &endpoint.name,
                "iscsi requires at least one discovery interface",
            ));
        }

        let discovery_interfaces = endpoint
            .iscsi
            .discovery_interfaces
            .iter()
            .map(|interface| discovery_interface(&endpoint.name, interface))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: endpoint.name.clone(),
            display_name: endpoint.display_name.clone(),
            endpoint_type: endpoint.endpoint_type,
            iscsi: IscsiPost {
                discovery_interfaces,
            },
        })
    }
}

fn discovery_interface(
    endpoint: &str,
    interface: &DiscoveryInterface,
) -> Result<DiscoveryInterfacePost, RequestError> {
    let kind = ResourceKind::StorageEndpoint;
    check_cidr(kind, endpoint, "iscsi.address", &interface.address)?;
    if let Some(gateway) = &interface.gateway {
        check_address(kind, endpoint, "iscsi.gateway", gateway)?;
    }
    check_mtu(kind, endpoint, interface.mtu)?;

    Ok(DiscoveryInterfacePost {
        address: interface.address.clone(),
        gateway: interface.gateway.clone(),
        mtu: interface.mtu,
        network_interface_groups: interface.network_interface_groups.clone(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayPost {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apartment_id: Option<String>,
    pub host_name: String,
    pub hardware_type: String,
    pub appliance_id: String,
}

impl TryFrom<&Array> for ArrayPost {
    type Error = RequestError;

    fn try_from(array: &Array) -> Result<Self, Self::Error> {
        let kind = ResourceKind::Array;
        require_name(kind, &array.name)?;
        for (field, value) in [
            ("host_name", &array.host_name),
            ("hardware_type", &array.hardware_type),
            ("appliance_id", &array.appliance_id),
        ] {
            if value.trim().is_empty() {
                return Err(RequestError::new(
                    kind,
                    &array.name,
                    format!("{} must not be empty", field),
                ));
            }
        }

        Ok(Self {
            name: array.name.clone(),
            display_name: array.display_name.clone(),
            apartment_id: array.apartment_id.clone(),
            host_name: array.host_name.clone(),
            hardware_type: array.hardware_type.clone(),
            appliance_id: array.appliance_id.clone(),
        })
    }
}

/// Body of a create call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreateRequest {
    Region(RegionPost),
    AvailabilityZone(AvailabilityZonePost),
    NetworkInterfaceGroup(NetworkInterfaceGroupPost),
    StorageEndpoint(StorageEndpointPost),
    Array(ArrayPost),
}

impl CreateRequest {
    pub fn kind(&self) -> ResourceKind {
        match self {
            CreateRequest::Region(_) => ResourceKind::Region,
            CreateRequest::AvailabilityZone(_) => ResourceKind::AvailabilityZone,
            CreateRequest::NetworkInterfaceGroup(_) => ResourceKind::NetworkInterfaceGroup,
            CreateRequest::StorageEndpoint(_) => ResourceKind::StorageEndpoint,
            CreateRequest::Array(_) => ResourceKind::Array,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CreateRequest::Region(r) => &r.name,
            CreateRequest::AvailabilityZone(r) => &r.name,
            CreateRequest::NetworkInterfaceGroup(r) => &r.name,
            CreateRequest::StorageEndpoint(r) => &r.name,
            CreateRequest::Array(r) => &r.name,
        }
    }
}

impl From<RegionPost> for CreateRequest {
    fn from(request: RegionPost) -> Self {
        CreateRequest::Region(request)
    }
}

impl From<AvailabilityZonePost> for CreateRequest {
    fn from(request: AvailabilityZonePost) -> Self {
        CreateRequest::AvailabilityZone(request)
    }
}

impl From<NetworkInterfaceGroupPost> for CreateRequest {
    fn from(request: NetworkInterfaceGroupPost) -> Self {
        CreateRequest::NetworkInterfaceGroup(request)
    }
}

impl From<StorageEndpointPost> for CreateRequest {
    fn from(request: StorageEndpointPost) -> Self {
        CreateRequest::StorageEndpoint(request)
    }
}

impl From<ArrayPost> for CreateRequest {
    fn from(request: ArrayPost) -> Self {
        CreateRequest::Array(request)
    }
}

/// Wire shape for nullable patch fields: `{ "value": ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nullable<T> {
    pub value: T,
}

/// Body of an update call
///
/// Serialises as `{ "<field>": { "value": ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Patch {
    MaintenanceMode(Nullable<bool>),
    NetworkInterfaceGroup(Nullable<String>),
}

impl Patch {
    pub fn maintenance_mode(enabled: bool) -> Self {
        Patch::MaintenanceMode(Nullable { value: enabled })
    }

    pub fn network_interface_group(group: impl Into<String>) -> Self {
        Patch::NetworkInterfaceGroup(Nullable {
            value: group.into(),
        })
    }
}

/// Reject an array whose interface group override names a group the zone does not declare
pub fn check_interface_group(zone: &AvailabilityZone, array: &Array) -> Result<(), RequestError> {
    let Some(group) = array.network_interface_group.as_deref() else {
        return Ok(());
    };
    if zone.network_interface_groups.iter().any(|g| g.name == group) {
        return Ok(());
    }
    Err(RequestError::new(
        ResourceKind::Array,
        &array.name,
        format!(
            "network_interface_group '{}' is not declared in availability zone {}",
            group, zone.name
        ),
    ))
}

/// Build every create request in the topology and collect the failures
pub fn validate_topology(topology: &Topology) -> Vec<RequestError> {
    let mut errors = Vec::new();
    let mut check = |result: Result<(), RequestError>| {
        if let Err(e) = result {
            errors.push(e);
        }
    };

    for region in &topology.regions {
        check(RegionPost::try_from(region).map(drop));
        for zone in &region.availability_zones {
            check(AvailabilityZonePost::try_from(zone).map(drop));
            for group in &zone.network_interface_groups {
                check(NetworkInterfaceGroupPost::try_from(group).map(drop));
            }
            for endpoint in &zone.storage_endpoints {
                check(StorageEndpointPost::try_from(endpoint).map(drop));
            }
            for array in &zone.arrays {
                check(ArrayPost::try_from(array).map(drop));
                check(check_interface_group(zone, array));
            }
        }
    }

    errors
}

fn require_name(kind: ResourceKind, name: &str) -> Result<(), RequestError> {
    if name.trim().is_empty() {
        return Err(RequestError::new(kind, name, "name must not be empty"));
    }
    Ok(())
}

fn check_address(kind: ResourceKind, name: &str, field: &str, value: &str) -> Result<(), RequestError> {
    value.parse::<IpAddr>().map(drop).map_err(|_| {
        RequestError::new(kind, name, format!("{} '{}' is not an IP address", field, value))
    })
}

fn check_cidr(kind: ResourceKind, name: &str, field: &str, value: &str) -> Result<(), RequestError> {
    let invalid = || RequestError::new(kind, name, format!("{} '{}' is not in CIDR notation", field, value));

    let (address, prefix) = value.split_once('/').ok_or_else(invalid)?;
    let address: IpAddr = address.parse().map_err(|_| invalid())?;
    let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
    let max_prefix = if address.is_ipv4() { 32 } else { 128 };
    if prefix > max_prefix {
        return Err(invalid());
    }
    Ok(())
}

fn check_mtu(kind: ResourceKind, name: &str, mtu: Option<u32>) -> Result<(), RequestError> {
    match mtu {
        Some(mtu) if !(MIN_MTU..=MAX_MTU).contains(&mtu) => Err(RequestError::new(
            kind,
            name,
            format!("mtu {} is outside {}..={}", mtu, MIN_MTU, MAX_MTU),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fusionflow_core::{EthConfig, IscsiConfig};
    use serde_json::json;

    fn group(prefix: &str, mtu: Option<u32>) -> NetworkInterfaceGroup {
        NetworkInterfaceGroup {
            name: "nig-a".to_string(),
            display_name: Some("NIG A".to_string()),
            group_type: GroupType::Eth,
            eth: EthConfig {
                prefix: prefix.to_string(),
                gateway: Some("10.21.200.1".to_string()),
                mtu,
            },
        }
    }

    #[test]
    fn test_network_interface_group_body() {
        let request = NetworkInterfaceGroupPost::try_from(&group("10.21.200.0/24", Some(1500))).unwrap();
        let body = serde_json::to_value(CreateRequest::from(request)).unwrap();

        assert_eq!(
            body,
            json!({
                "name": "nig-a",
                "display_name": "NIG A",
                "group_type": "eth",
                "eth": {"prefix": "10.21.200.0/24", "gateway": "10.21.200.1", "mtu": 1500}
            })
        );
    }

    #[test]
    fn test_network_interface_group_rejects_bad_prefix() {
        let err = NetworkInterfaceGroupPost::try_from(&group("10.21.200.0", None)).unwrap_err();
        assert_eq!(err.kind, ResourceKind::NetworkInterfaceGroup);
        assert!(err.reason.contains("CIDR"));

        assert!(NetworkInterfaceGroupPost::try_from(&group("10.21.200.0/33", None)).is_err());
    }

    #[test]
    fn test_network_interface_group_rejects_bad_mtu() {
        let err = NetworkInterfaceGroupPost::try_from(&group("10.0.0.0/24", Some(576))).unwrap_err();
        assert!(err.reason.contains("mtu 576"));
    }

    #[test]
    fn test_storage_endpoint_requires_discovery_interface() {
        let endpoint = StorageEndpoint {
            name: "se".to_string(),
            display_name: None,
            endpoint_type: EndpointType::Iscsi,
            iscsi: IscsiConfig::default(),
        };
        let err = StorageEndpointPost::try_from(&endpoint).unwrap_err();
        assert!(err.reason.contains("discovery interface"));
    }

    #[test]
    fn test_storage_endpoint_body() {
        let endpoint = StorageEndpoint {
            name: "se".to_string(),
            display_name: None,
            endpoint_type: EndpointType::Iscsi,
            iscsi: IscsiConfig {
                discovery_interfaces: vec![DiscoveryInterface {
                    address: "10.21.200.124/24".to_string(),
                    gateway: None,
                    mtu: None,
                    network_interface_groups: vec!["nig-a".to_string()],
                }],
            },
        };
        let body = serde_json::to_value(StorageEndpointPost::try_from(&endpoint).unwrap()).unwrap();

        assert_eq!(
            body,
            json!({
                "name": "se",
                "endpoint_type": "iscsi",
                "iscsi": {"discovery_interfaces": [
                    {"address": "10.21.200.124/24", "network_interface_groups": ["nig-a"]}
                ]}
            })
        );
    }

    #[test]
    fn test_array_post_omits_rebind_override() {
        let array = Array {
            name: "arr1".to_string(),
            display_name: None,
            apartment_id: None,
            host_name: "flasharray1".to_string(),
            hardware_type: "flash-array-x".to_string(),
            appliance_id: "1187351".to_string(),
            network_interface_group: Some("nig-a".to_string()),
        };
        let body = serde_json::to_value(ArrayPost::try_from(&array).unwrap()).unwrap();

        assert_eq!(
            body,
            json!({
                "name": "arr1",
                "host_name": "flasharray1",
                "hardware_type": "flash-array-x",
                "appliance_id": "1187351"
            })
        );
    }

    #[test]
    fn test_patch_wire_shape() {
        assert_eq!(
            serde_json::to_value(Patch::maintenance_mode(false)).unwrap(),
            json!({"maintenance_mode": {"value": false}})
        );
        assert_eq!(
            serde_json::to_value(Patch::network_interface_group("nig-b")).unwrap(),
            json!({"network_interface_group": {"value": "nig-b"}})
        );
    }

    #[test]
    fn test_validate_topology_collects_all_errors() {
        let topology = fusionflow_core::parse_topology(
            r#"
- name: ""
  availability_zones:
    - name: az1
      network_interface_groups:
        - name: nig
          group_type: eth
          eth: {prefix: not-a-cidr}
"#,
        )
        .unwrap();

        let errors = validate_topology(&topology);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, ResourceKind::Region);
        assert_eq!(errors[1].kind, ResourceKind::NetworkInterfaceGroup);
    }

    #[test]
    fn test_interface_group_override_must_be_declared_in_zone() {
        let topology = fusionflow_core::parse_topology(
            r#"
- name: us-east
  availability_zones:
    - name: az1
      network_interface_groups:
        - name: nig-a
          group_type: eth
          eth: {prefix: 10.21.200.0/24}
      arrays:
        - name: arr1
          host_name: flasharray1
          hardware_type: flash-array-x
          appliance_id: "1187351"
          network_interface_group: nig-a
        - name: arr2
          host_name: flasharray2
          hardware_type: flash-array-x
          appliance_id: "1187352"
          network_interface_group: nig-typo
"#,
        )
        .unwrap();

        let zone = &topology.regions[0].availability_zones[0];
        assert!(check_interface_group(zone, &zone.arrays[0]).is_ok());

        let errors = validate_topology(&topology);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ResourceKind::Array);
        assert_eq!(errors[0].name, "arr2");
        assert!(errors[0].reason.contains("'nig-typo' is not declared in availability zone az1"));
    }
}
