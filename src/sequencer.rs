//! Restore-mode release sequencing
//!
//! During a distributed-cloud restore the control plane moves through three
//! phases: database recovery, storage recovery, and back to normal operation.
//! Each phase needs only a minimal subset of the deployed Helm releases, and
//! running anything else risks writing to a database or storage backend that is
//! mid-restore. The [`Sequencer`] computes that subset per phase and applies it
//! by enabling/disabling named resources through a [`ReleaseApi`].
//!
//! The sequencer is a pure control-flow unit: it is invoked synchronously as
//! one step of the orchestrator's lifecycle state machine, never concurrently
//! with itself, and it recomputes the desired active set from scratch on every
//! call. A retry after a partial downstream failure therefore always
//! reconciles; no rollback is attempted here.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

#[cfg(test)]
use mockall::automock;

use crate::inventory::{DistributedCloudRole, Inventory};
use crate::release::{Release, ReleaseGroup};
use crate::state::{ReleaseResource, ReleaseState};
use crate::Result;

/// Caller-supplied phase indicator for a multi-step disaster-recovery sequence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestoreMode {
    /// Normal operation; also the value an absent mode maps to
    #[default]
    Normal,
    /// Database recovery phase
    RestoreDb,
    /// Storage recovery phase
    RestoreStorage,
}

impl From<Option<RestoreMode>> for RestoreMode {
    fn from(mode: Option<RestoreMode>) -> Self {
        mode.unwrap_or_default()
    }
}

/// Trait abstracting the external release-management API
///
/// Covers the two outbound calls the sequencer issues while deactivating a
/// release. Reactivation is bookkeeping only; the next full apply pass picks
/// the release up from the resource map. Failures are not caught here - the
/// caller owns retry policy.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReleaseApi: Send + Sync {
    /// Remove the release's HelmRelease resource from the live apply target
    async fn delete_release_resource(&self, resource: &ReleaseResource) -> Result<()>;

    /// Persist the enabled flag on the release's override record
    async fn set_override_enabled(
        &self,
        release: Release,
        namespace: &str,
        enabled: bool,
    ) -> Result<()>;
}

/// Releases that must stay active while the database is restored
const RESTORE_DB_RELEASES: &[Release] = &[
    Release::Ingress,
    Release::NginxPortsControl,
    Release::Mariadb,
];

/// Releases that must stay active while storage backends are restored
const RESTORE_STORAGE_RELEASES: &[Release] = &[
    Release::Ingress,
    Release::NginxPortsControl,
    Release::Mariadb,
    Release::Memcached,
    Release::Rabbitmq,
    Release::Keystone,
    Release::Glance,
    Release::Cinder,
];

/// Restore-mode release sequencer
///
/// Holds the pre-restore snapshot across calls of one restore sequence plus the
/// set of releases pruned permanently for this session. The release state
/// itself is owned by the orchestrator and passed in by mutable reference.
#[derive(Debug, Default)]
pub struct Sequencer {
    /// Active release names captured on the first restore-db call, replayed
    /// and cleared by the terminating normal call
    snapshot: Vec<Release>,
    /// Releases excluded from every later required set (system-controller
    /// pruning is permanent within a session)
    pruned: BTreeSet<Release>,
}

impl Sequencer {
    /// Create a sequencer with no restore in progress
    pub fn new() -> Self {
        Self::default()
    }

    /// The pre-restore snapshot, empty when no restore sequence is in progress
    pub fn snapshot(&self) -> &[Release] {
        &self.snapshot
    }

    /// Apply one restore-mode lifecycle transition
    ///
    /// Called once per lifecycle hook. A missing system record in normal mode
    /// is fatal and aborts the call; downstream apply/delete failures propagate
    /// to the caller, which owns retry policy.
    #[instrument(skip(self, inventory, api, state), fields(mode = ?mode))]
    pub async fn apply_mode<I, A>(
        &mut self,
        inventory: &I,
        api: &A,
        state: &mut ReleaseState,
        mode: RestoreMode,
    ) -> Result<()>
    where
        I: Inventory + ?Sized,
        A: ReleaseApi + ?Sized,
    {
        match mode {
            RestoreMode::RestoreDb => {
                if self.snapshot.is_empty() {
                    self.snapshot = state.applied_order().to_vec();
                    info!(
                        snapshot = ?self.snapshot,
                        "captured pre-restore snapshot of active releases"
                    );
                }
                let mut required = RESTORE_DB_RELEASES.to_vec();
                if self.snapshot.contains(&Release::Garbd) {
                    required.push(Release::Garbd);
                }
                self.set_required_releases(api, state, &required).await
            }
            RestoreMode::RestoreStorage => {
                if self.snapshot.is_empty() {
                    // Out-of-order call: restore-db is expected to run first.
                    // Apply the base storage set rather than guessing at
                    // recovery semantics.
                    warn!("restore-storage observed without a pre-restore snapshot");
                }
                let mut required = RESTORE_STORAGE_RELEASES.to_vec();
                for conditional in [Release::Garbd, Release::KeystoneApiProxy] {
                    if self.snapshot.contains(&conditional) {
                        required.push(conditional);
                    }
                }
                self.set_required_releases(api, state, &required).await
            }
            RestoreMode::Normal => {
                let record = inventory.get_system_record().map_err(|e| {
                    error!(error = %e, "cannot sequence releases without a system record");
                    e
                })?;

                if record.distributed_cloud_role == DistributedCloudRole::SystemController {
                    self.prune_workload_groups(api, state).await
                } else if !self.snapshot.is_empty() {
                    let snapshot = std::mem::take(&mut self.snapshot);
                    info!(snapshot = ?snapshot, "restoring pre-restore release topology");
                    self.set_required_releases(api, state, &snapshot).await
                } else {
                    debug!("normal mode with no restore in progress, nothing to sequence");
                    Ok(())
                }
            }
        }
    }

    /// Reconcile the active set to exactly `required`
    ///
    /// Deactivations (current active set minus `required`, in the resource
    /// map's deterministic iteration order) run strictly before reactivations
    /// (in `required` order). Releases already active stay untouched. A
    /// required release tracked in neither set is an invariant violation and
    /// fails the call.
    pub async fn set_required_releases<A>(
        &self,
        api: &A,
        state: &mut ReleaseState,
        required: &[Release],
    ) -> Result<()>
    where
        A: ReleaseApi + ?Sized,
    {
        let required: Vec<Release> = required
            .iter()
            .copied()
            .filter(|r| !self.pruned.contains(r))
            .collect();

        for release in state.active() {
            if required.contains(&release) {
                continue;
            }
            let resource = state.deactivate(release)?;
            info!(release = %release, "deactivating release");
            api.delete_release_resource(&resource).await?;
            api.set_override_enabled(release, &resource.namespace, false)
                .await?;
        }

        for release in required {
            if state.is_active(release) {
                continue;
            }
            info!(release = %release, "reactivating release");
            state.reactivate(release)?;
        }

        Ok(())
    }

    /// Permanently remove the workload release groups
    ///
    /// The system-controller tier of a distributed cloud never runs tenant
    /// services, so object storage, compute, orchestration, and telemetry are
    /// pruned and stay excluded from every later required set.
    async fn prune_workload_groups<A>(&mut self, api: &A, state: &mut ReleaseState) -> Result<()>
    where
        A: ReleaseApi + ?Sized,
    {
        for group in ReleaseGroup::WORKLOAD_GROUPS {
            info!(group = %group, "pruning release group on system controller");
            self.pruned.extend(group.members());
        }
        let required: Vec<Release> = state
            .active()
            .into_iter()
            .filter(|r| !self.pruned.contains(r))
            .collect();
        self.set_required_releases(api, state, &required).await
    }
}
