//! Ingress controller override generation
//!
//! Scales the ingress controller and its error-page backend with the
//! controller host count. The host-port wiring itself lives in the companion
//! nginx-ports-control release and carries no inventory-driven values.

use serde_json::json;

use crate::inventory::SystemRecord;
use crate::release::Release;
use crate::Result;

use super::OverrideGenerator;

/// Override generator for the ingress release
pub struct IngressOverrides;

impl OverrideGenerator for IngressOverrides {
    fn release(&self) -> Release {
        Release::Ingress
    }

    fn generate(&self, system: &SystemRecord) -> Result<serde_json::Value> {
        let replicas = system.controller_count.max(1);
        Ok(json!({
            "pod": {
                "replicas": {
                    "ingress": replicas,
                    "error_page": replicas,
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replicas_follow_controller_count() {
        let system = SystemRecord {
            controller_count: 2,
            ..Default::default()
        };
        let values = IngressOverrides.generate(&system).unwrap();

        assert_eq!(values["pod"]["replicas"]["ingress"], 2);
        assert_eq!(values["pod"]["replicas"]["error_page"], 2);
    }

    #[test]
    fn test_zero_controllers_still_runs_one_replica() {
        let system = SystemRecord {
            controller_count: 0,
            ..Default::default()
        };
        let values = IngressOverrides.generate(&system).unwrap();

        assert_eq!(values["pod"]["replicas"]["ingress"], 1);
    }
}
