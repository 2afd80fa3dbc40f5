//! Resource kinds and the parent scopes they live in

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of resource managed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Region,
    AvailabilityZone,
    NetworkInterfaceGroup,
    StorageEndpoint,
    Array,
    NetworkInterface,
}

impl ResourceKind {
    /// Human readable label used in progress lines and errors
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Region => "region",
            ResourceKind::AvailabilityZone => "availability zone",
            ResourceKind::NetworkInterfaceGroup => "network interface group",
            ResourceKind::StorageEndpoint => "storage endpoint",
            ResourceKind::Array => "array",
            ResourceKind::NetworkInterface => "network interface",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parent scope of a resource
///
/// Children reference their parents by name only; the engine threads these
/// names down the tree while it walks the topology.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Region {
        region: String,
    },
    AvailabilityZone {
        region: String,
        availability_zone: String,
    },
    Array {
        region: String,
        availability_zone: String,
        array: String,
    },
}

impl Scope {
    pub fn for_region(region: impl Into<String>) -> Self {
        Scope::Region {
            region: region.into(),
        }
    }

    pub fn for_availability_zone(
        region: impl Into<String>,
        availability_zone: impl Into<String>,
    ) -> Self {
        Scope::AvailabilityZone {
            region: region.into(),
            availability_zone: availability_zone.into(),
        }
    }

    pub fn for_array(
        region: impl Into<String>,
        availability_zone: impl Into<String>,
        array: impl Into<String>,
    ) -> Self {
        Scope::Array {
            region: region.into(),
            availability_zone: availability_zone.into(),
            array: array.into(),
        }
    }

    pub fn region(&self) -> Option<&str> {
        match self {
            Scope::Global => None,
            Scope::Region { region }
            | Scope::AvailabilityZone { region, .. }
            | Scope::Array { region, .. } => Some(region),
        }
    }

    pub fn availability_zone(&self) -> Option<&str> {
        match self {
            Scope::AvailabilityZone {
                availability_zone, ..
            }
            | Scope::Array {
                availability_zone, ..
            } => Some(availability_zone),
            _ => None,
        }
    }

    pub fn array(&self) -> Option<&str> {
        match self {
            Scope::Array { array, .. } => Some(array),
            _ => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global scope"),
            Scope::Region { region } => write!(f, "region {}", region),
            Scope::AvailabilityZone {
                region,
                availability_zone,
            } => write!(
                f,
                "availability zone {} in region {}",
                availability_zone, region
            ),
            Scope::Array {
                region,
                availability_zone,
                array,
            } => write!(
                f,
                "array {} in availability zone {} in region {}",
                array, availability_zone, region
            ),
        }
    }
}

/// Fully qualified reference to a single resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub kind: ResourceKind,
    pub parent: Scope,
    pub name: String,
}

impl ResourceKey {
    pub fn new(kind: ResourceKind, parent: Scope, name: impl Into<String>) -> Self {
        Self {
            kind,
            parent,
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent {
            Scope::Global => write!(f, "{} {}", self.kind, self.name),
            ref parent => write!(f, "{} {} in {}", self.kind, self.name, parent),
        }
    }
}
