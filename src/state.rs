//! Release lifecycle bookkeeping owned by the orchestrator
//!
//! The orchestrator tracks each release in exactly one of two places: the
//! resource map (active, with a live HelmRelease resource) or the cleanup list
//! (inactive, resource removed). [`ReleaseState`] owns both plus the ordered
//! applied-resource sequence, and enforces the exactly-one-set invariant on
//! every transition. The sequencer mutates this state in place; there is no
//! copying and no transactional rollback.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::release::Release;
use crate::{Error, Result};

/// Descriptor of an active release's live HelmRelease resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseResource {
    /// Release this resource belongs to
    pub name: Release,
    /// Namespace the resource lives in
    pub namespace: String,
    /// Name of the HelmRelease resource on the cluster
    pub resource: String,
}

impl ReleaseResource {
    /// Reconstruct the canonical descriptor for a release
    ///
    /// The resource name and namespace are fully determined by the release, so
    /// a descriptor dropped during deactivation can always be rebuilt.
    pub fn new(release: Release) -> Self {
        Self {
            name: release,
            namespace: release.namespace().to_string(),
            resource: release.name().to_string(),
        }
    }
}

/// Record of an inactive release awaiting possible reactivation
///
/// Same shape as [`ReleaseResource`] minus the `resource` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupEntry {
    /// Release this entry belongs to
    pub name: Release,
    /// Namespace the release was deployed into
    pub namespace: String,
}

impl From<&ReleaseResource> for CleanupEntry {
    fn from(resource: &ReleaseResource) -> Self {
        Self {
            name: resource.name,
            namespace: resource.namespace.clone(),
        }
    }
}

/// The two mutually exclusive membership sets tracking release lifecycle state
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReleaseState {
    /// Active releases keyed by release, iteration order deterministic
    resources: BTreeMap<Release, ReleaseResource>,
    /// Order in which active resources were applied
    applied: Vec<Release>,
    /// Inactive releases, ordered, removal by `{name, namespace}` equality
    cleanup: Vec<CleanupEntry>,
}

impl ReleaseState {
    /// Create state with the given releases active and everything else known
    /// to the deployment parked on the cleanup list
    pub fn new<I, C>(active: I, cleaned: C) -> Self
    where
        I: IntoIterator<Item = Release>,
        C: IntoIterator<Item = Release>,
    {
        let mut state = Self::default();
        for release in active {
            state.resources.insert(release, ReleaseResource::new(release));
            state.applied.push(release);
        }
        for release in cleaned {
            state.cleanup.push(CleanupEntry {
                name: release,
                namespace: release.namespace().to_string(),
            });
        }
        state
    }

    /// Releases currently active, in deterministic (sorted) order
    pub fn active(&self) -> Vec<Release> {
        self.resources.keys().copied().collect()
    }

    /// Active release names in the order their resources were applied
    pub fn applied_order(&self) -> &[Release] {
        &self.applied
    }

    /// Releases currently on the cleanup list
    pub fn cleaned(&self) -> Vec<Release> {
        self.cleanup.iter().map(|e| e.name).collect()
    }

    /// Whether the given release is currently active
    pub fn is_active(&self, release: Release) -> bool {
        self.resources.contains_key(&release)
    }

    /// Whether the given release is currently on the cleanup list
    pub fn is_cleaned(&self, release: Release) -> bool {
        self.cleanup.iter().any(|e| e.name == release)
    }

    /// Resource descriptor for an active release
    pub fn resource(&self, release: Release) -> Option<&ReleaseResource> {
        self.resources.get(&release)
    }

    /// Deactivate a release: drop its resource descriptor and move the
    /// `{name, namespace}` record onto the cleanup list
    ///
    /// Returns the removed descriptor so the caller can issue the delete
    /// against the live apply target.
    pub fn deactivate(&mut self, release: Release) -> Result<ReleaseResource> {
        let resource = self.resources.remove(&release).ok_or_else(|| {
            Error::invariant(format!("cannot deactivate {release}: not active"))
        })?;
        self.applied.retain(|r| *r != release);
        self.cleanup.push(CleanupEntry::from(&resource));
        Ok(resource)
    }

    /// Reactivate a release from the cleanup list: rebuild its descriptor,
    /// insert it into the resource map, append it to the applied sequence, and
    /// remove the matching cleanup entry
    pub fn reactivate(&mut self, release: Release) -> Result<&ReleaseResource> {
        let resource = ReleaseResource::new(release);
        let position = self
            .cleanup
            .iter()
            .position(|e| e.name == resource.name && e.namespace == resource.namespace)
            .ok_or_else(|| {
                Error::invariant(format!("cannot reactivate {release}: not on cleanup list"))
            })?;
        self.cleanup.remove(position);
        self.applied.push(release);
        Ok(self.resources.entry(release).or_insert(resource))
    }

    /// Verify that every tracked release is in exactly one of the two sets
    pub fn check_invariant(&self) -> Result<()> {
        for entry in &self.cleanup {
            if self.resources.contains_key(&entry.name) {
                return Err(Error::invariant(format!(
                    "{} is both active and on the cleanup list",
                    entry.name
                )));
            }
        }
        for release in self.resources.keys() {
            if !self.applied.contains(release) {
                return Err(Error::invariant(format!(
                    "{release} is active but missing from the applied sequence"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_splits_releases_between_the_two_sets() {
        let state = ReleaseState::new(
            [Release::Ingress, Release::Mariadb],
            [Release::Garbd, Release::Keystone],
        );

        assert!(state.is_active(Release::Ingress));
        assert!(state.is_cleaned(Release::Garbd));
        assert!(!state.is_active(Release::Garbd));
        assert!(!state.is_cleaned(Release::Ingress));
        state.check_invariant().expect("fresh state holds invariant");
    }

    #[test]
    fn test_deactivate_moves_record_and_drops_resource_key() {
        let mut state = ReleaseState::new([Release::Keystone], []);

        let resource = state.deactivate(Release::Keystone).unwrap();
        assert_eq!(resource.resource, "keystone");
        assert!(!state.is_active(Release::Keystone));
        assert!(state.is_cleaned(Release::Keystone));
        assert!(state.applied_order().is_empty());
        state.check_invariant().unwrap();
    }

    #[test]
    fn test_reactivate_rebuilds_descriptor_from_the_name() {
        let mut state = ReleaseState::new([], [Release::Rabbitmq]);

        let resource = state.reactivate(Release::Rabbitmq).unwrap().clone();
        assert_eq!(resource.name, Release::Rabbitmq);
        assert_eq!(resource.namespace, crate::OPENSTACK_NAMESPACE);
        assert_eq!(resource.resource, "rabbitmq");
        assert_eq!(state.applied_order(), &[Release::Rabbitmq]);
        assert!(!state.is_cleaned(Release::Rabbitmq));
        state.check_invariant().unwrap();
    }

    #[test]
    fn test_deactivating_an_inactive_release_is_an_invariant_violation() {
        let mut state = ReleaseState::new([], [Release::Swift]);
        let err = state.deactivate(Release::Swift).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn test_reactivating_an_untracked_release_is_an_invariant_violation() {
        let mut state = ReleaseState::new([Release::Ingress], []);
        let err = state.reactivate(Release::Heat).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn test_applied_order_preserves_reactivation_sequence() {
        let mut state = ReleaseState::new([], [Release::Mariadb, Release::Ingress]);

        state.reactivate(Release::Ingress).unwrap();
        state.reactivate(Release::Mariadb).unwrap();

        assert_eq!(
            state.applied_order(),
            &[Release::Ingress, Release::Mariadb]
        );
    }
}
