//! Ballast - restore-mode release sequencing for an OpenStack control plane on Kubernetes
//!
//! Ballast is the lifecycle helper a deployment orchestrator calls while moving an
//! OpenStack control plane through a disaster-recovery sequence. The control plane is
//! deployed as a set of Helm releases (FluxCD `HelmRelease` resources); during a
//! restore only a minimal subset of those releases may be active, and the subset
//! changes as the restore progresses from database recovery to storage recovery and
//! back to normal operation.
//!
//! # Architecture
//!
//! The orchestrator owns the release bookkeeping (which releases are active, which
//! are cleaned up) and invokes [`sequencer::Sequencer::apply_mode`] once per
//! lifecycle transition. The sequencer recomputes the desired active set from
//! scratch on every call, so re-invoking it after a partial failure always
//! reconciles. External collaborators - the inventory database and the Helm release
//! management API - sit behind traits so the sequencing logic is testable without a
//! live cluster.
//!
//! # Modules
//!
//! - [`release`] - The enumerated set of known releases and their static groups
//! - [`state`] - Resource map / cleanup list bookkeeping owned by the orchestrator
//! - [`inventory`] - Read-only access to the system inventory record
//! - [`sequencer`] - Restore-mode sequencing (the core)
//! - [`helmrelease`] - kube-backed release management API (FluxCD HelmRelease)
//! - [`overrides`] - Helm value-override generators driven by inventory state
//! - [`error`] - Error types

#![deny(missing_docs)]

pub mod error;
pub mod helmrelease;
pub mod inventory;
pub mod overrides;
pub mod release;
pub mod sequencer;
pub mod state;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Namespace every OpenStack control-plane release is deployed into
pub const OPENSTACK_NAMESPACE: &str = "openstack";

/// API group of the FluxCD HelmRelease custom resource
pub const HELM_RELEASE_GROUP: &str = "helm.toolkit.fluxcd.io";

/// API version of the FluxCD HelmRelease custom resource
pub const HELM_RELEASE_VERSION: &str = "v2";

/// Kind of the FluxCD HelmRelease custom resource
pub const HELM_RELEASE_KIND: &str = "HelmRelease";
