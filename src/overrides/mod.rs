//! Helm value-override generators
//!
//! Each generator translates system-inventory state into chart value overrides
//! for one release. The overrides are plain JSON values merged over the chart
//! defaults by the apply engine; generators never talk to the cluster.
//!
//! Only releases whose values actually depend on inventory state carry a
//! generator; [`generate_overrides`] yields `None` for the rest.

mod ingress;
mod keystone;
mod mariadb;

pub use ingress::IngressOverrides;
pub use keystone::KeystoneOverrides;
pub use mariadb::MariadbOverrides;

use crate::inventory::SystemRecord;
use crate::release::Release;
use crate::Result;

/// A per-release Helm value-override builder
pub trait OverrideGenerator {
    /// Release this generator produces overrides for
    fn release(&self) -> Release;

    /// Build the override values from the system record
    fn generate(&self, system: &SystemRecord) -> Result<serde_json::Value>;
}

/// Generator for the given release, if the release has one
pub fn generator_for(release: Release) -> Option<Box<dyn OverrideGenerator>> {
    match release {
        Release::Mariadb => Some(Box::new(MariadbOverrides)),
        Release::Keystone => Some(Box::new(KeystoneOverrides)),
        Release::Ingress => Some(Box::new(IngressOverrides)),
        _ => None,
    }
}

/// Build the override values for a release, `None` when the release has no
/// inventory-driven overrides
pub fn generate_overrides(
    release: Release,
    system: &SystemRecord,
) -> Result<Option<serde_json::Value>> {
    match generator_for(release) {
        Some(generator) => generator.generate(system).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_inventory_driven_releases() {
        for release in [Release::Mariadb, Release::Keystone, Release::Ingress] {
            let generator = generator_for(release).expect("generator registered");
            assert_eq!(generator.release(), release);
        }
    }

    #[test]
    fn test_releases_without_generators_yield_no_overrides() {
        let system = SystemRecord::default();
        let overrides = generate_overrides(Release::Memcached, &system).unwrap();
        assert!(overrides.is_none());
    }
}
