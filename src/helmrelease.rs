//! kube-backed release management API
//!
//! Production implementation of [`ReleaseApi`] against a cluster running the
//! FluxCD Helm controller. Each release is realized as a
//! `helm.toolkit.fluxcd.io/v2 HelmRelease` resource plus a per-release
//! override ConfigMap carrying the persisted `enabled` flag that the override
//! generators and the next full apply pass consult.
//!
//! Deleting an already-absent HelmRelease is tolerated: the apply target is
//! declarative and the sequencer may be re-invoked after a partial failure.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::{Api, DeleteParams, DynamicObject, Patch, PatchParams};
use kube::core::{ApiResource, GroupVersionKind};
use kube::Client;
use tracing::{debug, info};

use crate::release::Release;
use crate::sequencer::ReleaseApi;
use crate::state::ReleaseResource;
use crate::{Result, HELM_RELEASE_GROUP, HELM_RELEASE_KIND, HELM_RELEASE_VERSION};

/// ApiResource describing the FluxCD HelmRelease custom resource
pub fn helm_release_api_resource() -> ApiResource {
    ApiResource::from_gvk(&GroupVersionKind::gvk(
        HELM_RELEASE_GROUP,
        HELM_RELEASE_VERSION,
        HELM_RELEASE_KIND,
    ))
}

/// Name of the override ConfigMap for a release
pub fn override_configmap_name(release: Release) -> String {
    format!("{release}-overrides")
}

/// Merge-patch body persisting the enabled flag on an override ConfigMap
fn enabled_patch(enabled: bool) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "enabled": enabled.to_string(),
        }
    })
}

/// Release management API backed by a Kubernetes cluster
#[derive(Clone)]
pub struct HelmReleaseApi {
    client: Client,
}

impl HelmReleaseApi {
    /// Create an API bound to the given client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn helm_releases(&self, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, &helm_release_api_resource())
    }

    fn configmaps(&self, namespace: &str) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl ReleaseApi for HelmReleaseApi {
    async fn delete_release_resource(&self, resource: &ReleaseResource) -> Result<()> {
        let api = self.helm_releases(&resource.namespace);
        match api.delete(&resource.resource, &DeleteParams::default()).await {
            Ok(_) => {
                info!(resource = %resource.resource, namespace = %resource.namespace,
                    "deleted HelmRelease resource");
                Ok(())
            }
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                debug!(resource = %resource.resource, namespace = %resource.namespace,
                    "HelmRelease resource already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_override_enabled(
        &self,
        release: Release,
        namespace: &str,
        enabled: bool,
    ) -> Result<()> {
        let name = override_configmap_name(release);
        self.configmaps(namespace)
            .patch(
                &name,
                &PatchParams::default(),
                &Patch::Merge(enabled_patch(enabled)),
            )
            .await?;
        info!(release = %release, namespace, enabled, "persisted override enabled flag");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_resource_targets_flux_helm_releases() {
        let ar = helm_release_api_resource();
        assert_eq!(ar.group, "helm.toolkit.fluxcd.io");
        assert_eq!(ar.version, "v2");
        assert_eq!(ar.kind, "HelmRelease");
        assert_eq!(ar.plural, "helmreleases");
    }

    #[test]
    fn test_override_configmap_name_uses_chart_name() {
        assert_eq!(
            override_configmap_name(Release::NginxPortsControl),
            "nginx-ports-control-overrides"
        );
    }

    #[test]
    fn test_enabled_patch_serializes_flag_as_string() {
        let patch = enabled_patch(false);
        assert_eq!(patch["data"]["enabled"], "false");
        let patch = enabled_patch(true);
        assert_eq!(patch["data"]["enabled"], "true");
    }
}
