//! Known releases and their static groups
//!
//! The set of deployable Helm releases is closed: every chart the control plane
//! can carry is a variant of [`Release`], so a typo in a release name is a
//! compile error instead of a silent sequencing bug. Groups are static sets
//! defined at build time and deployed or removed together.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::OPENSTACK_NAMESPACE;

/// A named deployable Helm chart unit within the application
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Release {
    /// Ingress controller fronting all OpenStack API services
    Ingress,
    /// Companion chart wiring host ports for the ingress controller
    NginxPortsControl,
    /// MariaDB/Galera database cluster
    Mariadb,
    /// Galera arbitrator, deployed on even-replica database topologies
    Garbd,
    /// Memcached cache
    Memcached,
    /// RabbitMQ message bus
    Rabbitmq,
    /// Keystone identity service
    Keystone,
    /// Keystone API proxy for distributed-cloud subclouds
    KeystoneApiProxy,
    /// Glance image service
    Glance,
    /// Cinder block storage service
    Cinder,
    /// Swift object storage service
    Swift,
    /// Nova compute service
    Nova,
    /// Neutron networking service
    Neutron,
    /// Placement resource tracking service
    Placement,
    /// Libvirt hypervisor daemon set
    Libvirt,
    /// Open vSwitch daemon set
    Openvswitch,
    /// Heat orchestration service
    Heat,
    /// Aodh alarming service
    Aodh,
    /// Ceilometer metering service
    Ceilometer,
    /// Gnocchi time-series service
    Gnocchi,
    /// Panko event storage service
    Panko,
}

impl Release {
    /// Every release the control plane can carry
    pub const ALL: &'static [Release] = &[
        Release::Ingress,
        Release::NginxPortsControl,
        Release::Mariadb,
        Release::Garbd,
        Release::Memcached,
        Release::Rabbitmq,
        Release::Keystone,
        Release::KeystoneApiProxy,
        Release::Glance,
        Release::Cinder,
        Release::Swift,
        Release::Nova,
        Release::Neutron,
        Release::Placement,
        Release::Libvirt,
        Release::Openvswitch,
        Release::Heat,
        Release::Aodh,
        Release::Ceilometer,
        Release::Gnocchi,
        Release::Panko,
    ];

    /// Chart-name string for this release, as it appears on the HelmRelease resource
    pub fn name(&self) -> &'static str {
        match self {
            Release::Ingress => "ingress",
            Release::NginxPortsControl => "nginx-ports-control",
            Release::Mariadb => "mariadb",
            Release::Garbd => "garbd",
            Release::Memcached => "memcached",
            Release::Rabbitmq => "rabbitmq",
            Release::Keystone => "keystone",
            Release::KeystoneApiProxy => "keystone-api-proxy",
            Release::Glance => "glance",
            Release::Cinder => "cinder",
            Release::Swift => "swift",
            Release::Nova => "nova",
            Release::Neutron => "neutron",
            Release::Placement => "placement",
            Release::Libvirt => "libvirt",
            Release::Openvswitch => "openvswitch",
            Release::Heat => "heat",
            Release::Aodh => "aodh",
            Release::Ceilometer => "ceilometer",
            Release::Gnocchi => "gnocchi",
            Release::Panko => "panko",
        }
    }

    /// Namespace this release is deployed into
    ///
    /// Every control-plane release lives in the shared OpenStack namespace.
    pub fn namespace(&self) -> &'static str {
        OPENSTACK_NAMESPACE
    }

    /// The static group this release belongs to, if any
    pub fn group(&self) -> Option<ReleaseGroup> {
        ReleaseGroup::ALL
            .iter()
            .copied()
            .find(|g| g.members().contains(self))
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Release {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Release::ALL
            .iter()
            .copied()
            .find(|r| r.name() == s)
            .ok_or_else(|| crate::Error::serialization(format!("unknown release: {s}")))
    }
}

/// A static named set of releases deployed or removed together
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseGroup {
    /// Object storage tier (swift)
    ObjectStorage,
    /// Compute tier (nova and its companion daemon sets)
    ComputeKit,
    /// Orchestration tier (heat)
    Orchestration,
    /// Telemetry tier (metering, alarming, time series)
    Telemetry,
}

impl ReleaseGroup {
    /// Every defined group
    pub const ALL: &'static [ReleaseGroup] = &[
        ReleaseGroup::ObjectStorage,
        ReleaseGroup::ComputeKit,
        ReleaseGroup::Orchestration,
        ReleaseGroup::Telemetry,
    ];

    /// Groups never run on the system-controller tier of a distributed cloud
    ///
    /// The controller tier of a hierarchical multi-site deployment carries no
    /// tenant workloads, so these groups are pruned permanently when normal-mode
    /// sequencing observes the system-controller role.
    pub const WORKLOAD_GROUPS: &'static [ReleaseGroup] = Self::ALL;

    /// Member releases of this group
    pub fn members(&self) -> &'static [Release] {
        match self {
            ReleaseGroup::ObjectStorage => &[Release::Swift],
            ReleaseGroup::ComputeKit => &[
                Release::Nova,
                Release::Neutron,
                Release::Placement,
                Release::Libvirt,
                Release::Openvswitch,
            ],
            ReleaseGroup::Orchestration => &[Release::Heat],
            ReleaseGroup::Telemetry => &[
                Release::Aodh,
                Release::Ceilometer,
                Release::Gnocchi,
                Release::Panko,
            ],
        }
    }

    /// Group name string
    pub fn name(&self) -> &'static str {
        match self {
            ReleaseGroup::ObjectStorage => "object-storage",
            ReleaseGroup::ComputeKit => "compute-kit",
            ReleaseGroup::Orchestration => "orchestration",
            ReleaseGroup::Telemetry => "telemetry",
        }
    }
}

impl fmt::Display for ReleaseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
