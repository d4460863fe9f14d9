//! Keystone override generation
//!
//! Wires the identity service to the system's region and, when an endpoint
//! domain is configured, publishes a public FQDN override for the identity
//! endpoint.

use serde_json::json;

use crate::inventory::SystemRecord;
use crate::release::Release;
use crate::Result;

use super::OverrideGenerator;

/// Override generator for the keystone release
pub struct KeystoneOverrides;

impl OverrideGenerator for KeystoneOverrides {
    fn release(&self) -> Release {
        Release::Keystone
    }

    fn generate(&self, system: &SystemRecord) -> Result<serde_json::Value> {
        let mut values = json!({
            "endpoints": {
                "identity": {
                    "auth": {
                        "admin": {
                            "region_name": system.region_name,
                        }
                    }
                }
            },
            "conf": {
                "keystone": {
                    "identity": {
                        "region_name": system.region_name,
                    }
                }
            }
        });
        if let Some(domain) = &system.endpoint_domain {
            values["endpoints"]["identity"]["host_fqdn_override"] = json!({
                "public": format!("keystone.{domain}"),
            });
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_name_flows_into_identity_config() {
        let system = SystemRecord {
            region_name: "subcloud1".to_string(),
            ..Default::default()
        };
        let values = KeystoneOverrides.generate(&system).unwrap();

        assert_eq!(
            values["conf"]["keystone"]["identity"]["region_name"],
            "subcloud1"
        );
        assert_eq!(
            values["endpoints"]["identity"]["auth"]["admin"]["region_name"],
            "subcloud1"
        );
    }

    #[test]
    fn test_fqdn_override_only_present_with_endpoint_domain() {
        let bare = KeystoneOverrides.generate(&SystemRecord::default()).unwrap();
        assert!(bare["endpoints"]["identity"]["host_fqdn_override"].is_null());

        let system = SystemRecord {
            endpoint_domain: Some("site-a.example.com".to_string()),
            ..Default::default()
        };
        let values = KeystoneOverrides.generate(&system).unwrap();
        assert_eq!(
            values["endpoints"]["identity"]["host_fqdn_override"]["public"],
            "keystone.site-a.example.com"
        );
    }
}
