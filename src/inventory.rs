//! Read-only access to the system inventory
//!
//! The inventory database is an external collaborator; the sequencer and the
//! override generators only ever need the single system record, so the seam is
//! one trait method. Production wires in whatever data-access object the
//! orchestrator already holds; tests use the mock.

use serde::{Deserialize, Serialize};

use crate::Result;

#[cfg(test)]
use mockall::automock;

/// Role of this system within a hierarchical multi-site (distributed cloud)
/// deployment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributedCloudRole {
    /// Standalone system, not part of a distributed cloud
    #[default]
    None,
    /// Top tier of a distributed cloud; runs no tenant workloads
    SystemController,
    /// Edge-site tier managed by a system controller
    Subcloud,
}

/// The system inventory record
///
/// One row describing the platform as a whole. Fields beyond the
/// distributed-cloud role feed the override generators.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SystemRecord {
    /// Role within a distributed cloud, if any
    #[serde(default)]
    pub distributed_cloud_role: DistributedCloudRole,
    /// OpenStack region this system serves
    #[serde(default = "SystemRecord::default_region")]
    pub region_name: String,
    /// Number of controller hosts provisioned on this system
    #[serde(default = "SystemRecord::default_controller_count")]
    pub controller_count: u32,
    /// DNS suffix under which OpenStack endpoints are published
    #[serde(default)]
    pub endpoint_domain: Option<String>,
}

impl SystemRecord {
    fn default_region() -> String {
        "RegionOne".to_string()
    }

    fn default_controller_count() -> u32 {
        1
    }
}

impl Default for SystemRecord {
    fn default() -> Self {
        Self {
            distributed_cloud_role: DistributedCloudRole::None,
            region_name: Self::default_region(),
            controller_count: Self::default_controller_count(),
            endpoint_domain: None,
        }
    }
}

/// Trait abstracting the inventory database
///
/// Allows mocking the database in tests while the orchestrator supplies a live
/// accessor in production.
#[cfg_attr(test, automock)]
pub trait Inventory: Send + Sync {
    /// Fetch the system record
    ///
    /// Fails with [`crate::Error::SystemRecordNotFound`] when no system record
    /// exists, which callers treat as fatal.
    fn get_system_record(&self) -> Result<SystemRecord>;
}

/// Inventory backed by an in-memory record
///
/// Used by the CLI (record loaded from a YAML file) and convenient in tests
/// that do not need call expectations.
#[derive(Clone, Debug, Default)]
pub struct StaticInventory {
    record: Option<SystemRecord>,
}

impl StaticInventory {
    /// Create an inventory that returns the given record
    pub fn new(record: SystemRecord) -> Self {
        Self {
            record: Some(record),
        }
    }

    /// Create an inventory with no system record at all
    pub fn empty() -> Self {
        Self { record: None }
    }
}

impl Inventory for StaticInventory {
    fn get_system_record(&self) -> Result<SystemRecord> {
        self.record
            .clone()
            .ok_or_else(|| crate::Error::system_record_not_found("inventory holds no record"))
    }
}
