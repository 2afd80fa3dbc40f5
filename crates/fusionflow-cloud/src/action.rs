//! Plans and reports for topology provisioning

use crate::applier::ApplyOutcome;
use crate::engine::rebind_target;
use crate::scope::{ResourceKey, ResourceKind, Scope};
use fusionflow_core::Topology;
use serde::{Deserialize, Serialize};

/// Represents a planned action for a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Unique identifier for the action
    pub id: String,

    /// Type of action to perform
    pub action_type: ActionType,

    /// Resource the action targets
    pub resource: ResourceKey,

    /// Description of the action
    pub description: String,
}

/// Type of action to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create a resource (an existing one with the same name is accepted)
    Create,
    /// Patch a mutable field of an existing resource
    Update,
    /// Point discovered network interfaces at a network interface group
    Rebind,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Rebind => write!(f, "rebind"),
        }
    }
}

/// Plan containing all actions in traversal order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub actions: Vec<Action>,
}

impl Plan {
    /// Lay out the actions the engine will take, without contacting the API
    ///
    /// Network interfaces are only known once an array exists, so rebinding
    /// appears as one action per array.
    pub fn from_topology(topology: &Topology) -> Self {
        let mut actions = Vec::new();
        let mut push = |action_type: ActionType, resource: ResourceKey, description: String| {
            actions.push(Action {
                id: format!("{}-{}", action_type, actions.len() + 1),
                action_type,
                resource,
                description,
            });
        };

        for region in &topology.regions {
            let region_key = ResourceKey::new(ResourceKind::Region, Scope::Global, &region.name);
            push(ActionType::Create, region_key.clone(), format!("Create {}", region_key));

            for zone in &region.availability_zones {
                let zone_key = ResourceKey::new(
                    ResourceKind::AvailabilityZone,
                    Scope::for_region(&region.name),
                    &zone.name,
                );
                push(ActionType::Create, zone_key.clone(), format!("Create {}", zone_key));

                let zone_scope = Scope::for_availability_zone(&region.name, &zone.name);
                for group in &zone.network_interface_groups {
                    let key = ResourceKey::new(
                        ResourceKind::NetworkInterfaceGroup,
                        zone_scope.clone(),
                        &group.name,
                    );
                    push(ActionType::Create, key.clone(), format!("Create {}", key));
                }
                for endpoint in &zone.storage_endpoints {
                    let key = ResourceKey::new(
                        ResourceKind::StorageEndpoint,
                        zone_scope.clone(),
                        &endpoint.name,
                    );
                    push(ActionType::Create, key.clone(), format!("Create {}", key));
                }
                for array in &zone.arrays {
                    let key = ResourceKey::new(ResourceKind::Array, zone_scope.clone(), &array.name);
                    push(ActionType::Create, key.clone(), format!("Create {}", key));
                    push(
                        ActionType::Update,
                        key.clone(),
                        format!("Turn off maintenance mode on {}", key),
                    );
                    let description = match rebind_target(zone, array) {
                        Some(group) => format!(
                            "Connect every network interface of {} to network interface group {}",
                            key, group
                        ),
                        None => format!(
                            "Connect network interfaces of {} (no network interface group declared)",
                            key
                        ),
                    };
                    push(ActionType::Rebind, key, description);
                }
            }
        }

        Self { actions }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Get actions by type
    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    /// Summary of the plan
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            update: self.actions_by_type(ActionType::Update).len(),
            rebind: self.actions_by_type(ActionType::Rebind).len(),
        }
    }
}

/// Summary of planned actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub rebind: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} arrays to rebind",
            self.create, self.update, self.rebind
        )
    }
}

/// Record of one applied step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedResource {
    pub action_type: ActionType,
    pub resource: ResourceKey,
    pub outcome: ApplyOutcome,
}

/// Result of a complete run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Applied steps in the order they completed
    pub resources: Vec<AppliedResource>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl ApplyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action_type: ActionType, resource: ResourceKey, outcome: ApplyOutcome) {
        self.resources.push(AppliedResource {
            action_type,
            resource,
            outcome,
        });
    }

    /// Outcomes recorded for resources of a given kind
    pub fn outcomes_for(&self, kind: ResourceKind) -> Vec<(&str, ApplyOutcome)> {
        self.resources
            .iter()
            .filter(|r| r.resource.kind == kind)
            .map(|r| (r.resource.name.as_str(), r.outcome))
            .collect()
    }

    pub fn summary(&self) -> ReportSummary {
        let count = |outcome: ApplyOutcome| {
            self.resources
                .iter()
                .filter(|r| r.outcome == outcome)
                .count()
        };
        ReportSummary {
            created: count(ApplyOutcome::Created),
            existing: count(ApplyOutcome::Reserved),
            recovered: count(ApplyOutcome::Recovered),
            updated: count(ApplyOutcome::Updated),
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub created: usize,
    pub existing: usize,
    pub recovered: usize,
    pub updated: usize,
}

impl std::fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} created, {} already existed, {} recovered, {} updated",
            self.created, self.existing, self.recovered, self.updated
        )
    }
}
