//! Traversal engine
//!
//! Walks the topology strictly in dependency order:
//!
//! ```text
//! region
//! └─ availability zone
//!    ├─ network interface groups
//!    ├─ storage endpoints
//!    └─ arrays ─ create → maintenance mode off → list interfaces → rebind each
//! ```
//!
//! A node's children are only visited once the node itself reached a terminal
//! successful state. The first fatal error aborts the whole run.

use crate::action::{ActionType, ApplyReport};
use crate::api::FusionApi;
use crate::applier::{ApplyOutcome, ResourceApplier};
use crate::error::{ProvisionError, Result};
use crate::poller::PollConfig;
use crate::reporter::{Reporter, Step};
use crate::request::check_interface_group;
use crate::scope::{ResourceKey, ResourceKind, Scope};
use fusionflow_core::{Array, AvailabilityZone, Region, Topology};
use std::future::Future;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Network interface group the interfaces of `array` get bound to
///
/// An explicit `network_interface_group` on the array wins. Otherwise it is the
/// last group declared in the zone, so with several groups every interface
/// ends up on the last one.
pub fn rebind_target<'a>(zone: &'a AvailabilityZone, array: &'a Array) -> Option<&'a str> {
    array
        .network_interface_group
        .as_deref()
        .or_else(|| zone.network_interface_groups.last().map(|g| g.name.as_str()))
}

/// Applies a whole topology
pub struct Provisioner<'a, A: FusionApi + ?Sized, R: Reporter + ?Sized> {
    applier: ResourceApplier<'a, A>,
    reporter: &'a R,
}

impl<'a, A: FusionApi + ?Sized, R: Reporter + ?Sized> Provisioner<'a, A, R> {
    pub fn new(api: &'a A, poll: &'a PollConfig, reporter: &'a R) -> Self {
        Self {
            applier: ResourceApplier::new(api, poll),
            reporter,
        }
    }

    /// Walk the topology and apply every node
    ///
    /// Returns only after the entire tree has been applied or a fatal error
    /// occurred.
    #[instrument(skip_all, fields(regions = topology.regions.len()))]
    pub async fn run(&self, topology: &Topology) -> Result<ApplyReport> {
        let start = Instant::now();
        let mut report = ApplyReport::new();

        for region in &topology.regions {
            self.provision_region(region, &mut report).await?;
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        self.reporter.complete(&report);
        Ok(report)
    }

    async fn provision_region(&self, region: &Region, report: &mut ApplyReport) -> Result<()> {
        let key = ResourceKey::new(ResourceKind::Region, Scope::Global, &region.name);
        self.step(Step::Create(key), report, self.applier.apply_region(region))
            .await?;

        for zone in &region.availability_zones {
            self.provision_zone(&region.name, zone, report).await?;
        }
        Ok(())
    }

    async fn provision_zone(
        &self,
        region_name: &str,
        zone: &AvailabilityZone,
        report: &mut ApplyReport,
    ) -> Result<()> {
        let key = ResourceKey::new(
            ResourceKind::AvailabilityZone,
            Scope::for_region(region_name),
            &zone.name,
        );
        self.step(
            Step::Create(key),
            report,
            self.applier.apply_availability_zone(region_name, zone),
        )
        .await?;

        let zone_scope = Scope::for_availability_zone(region_name, &zone.name);

        for group in &zone.network_interface_groups {
            let key = ResourceKey::new(
                ResourceKind::NetworkInterfaceGroup,
                zone_scope.clone(),
                &group.name,
            );
            self.step(
                Step::Create(key),
                report,
                self.applier
                    .apply_network_interface_group(region_name, &zone.name, group),
            )
            .await?;
        }

        for endpoint in &zone.storage_endpoints {
            let key = ResourceKey::new(
                ResourceKind::StorageEndpoint,
                zone_scope.clone(),
                &endpoint.name,
            );
            self.step(
                Step::Create(key),
                report,
                self.applier
                    .apply_storage_endpoint(region_name, &zone.name, endpoint),
            )
            .await?;
        }

        // Every group of the zone is terminal-successful at this point, which
        // is what array interface rebinding depends on.
        for array in &zone.arrays {
            self.provision_array(region_name, zone, array, report).await?;
        }
        Ok(())
    }

    async fn provision_array(
        &self,
        region_name: &str,
        zone: &AvailabilityZone,
        array: &Array,
        report: &mut ApplyReport,
    ) -> Result<()> {
        let zone_scope = Scope::for_availability_zone(region_name, &zone.name);
        let key = ResourceKey::new(ResourceKind::Array, zone_scope.clone(), &array.name);

        // An override naming an undeclared group is rejected before the array exists.
        self.step(Step::Create(key.clone()), report, async {
            check_interface_group(zone, array)?;
            self.applier.apply_array(region_name, &zone.name, array).await
        })
        .await?;

        self.step(
            Step::SetMaintenanceMode {
                array: key,
                enabled: false,
            },
            report,
            self.applier.update_array_maintenance_mode(
                region_name,
                &zone.name,
                &array.name,
                false,
            ),
        )
        .await?;

        let interfaces = self
            .applier
            .list_network_interfaces(region_name, &zone.name, &array.name)
            .await?;
        if interfaces.is_empty() {
            debug!("Array {} exposes no network interfaces", array.name);
            return Ok(());
        }

        let group = rebind_target(zone, array).ok_or_else(|| {
            warn!(
                "Array {} has {} network interfaces but {} declares no network interface group",
                array.name,
                interfaces.len(),
                zone_scope
            );
            ProvisionError::MissingInterfaceGroup {
                scope: zone_scope.clone(),
                array: array.name.clone(),
            }
        })?;

        let array_scope = Scope::for_array(region_name, &zone.name, &array.name);
        for interface in &interfaces {
            let step = Step::Rebind {
                interface: ResourceKey::new(
                    ResourceKind::NetworkInterface,
                    array_scope.clone(),
                    &interface.name,
                ),
                group: group.to_string(),
            };
            self.step(
                step,
                report,
                self.applier.rebind_network_interface(
                    region_name,
                    &zone.name,
                    &array.name,
                    &interface.name,
                    group,
                ),
            )
            .await?;
        }
        Ok(())
    }

    /// Announce a step, drive it, and record its outcome
    async fn step<F>(&self, step: Step, report: &mut ApplyReport, apply: F) -> Result<ApplyOutcome>
    where
        F: Future<Output = Result<ApplyOutcome>>,
    {
        self.reporter.attempt(&step);
        match apply.await {
            Ok(outcome) => {
                self.reporter.applied(&step, outcome);
                let action_type: ActionType = step.action_type();
                report.record(action_type, step.key().clone(), outcome);
                Ok(outcome)
            }
            Err(e) => {
                self.reporter.failed(&step, &e);
                Err(e)
            }
        }
    }
}
