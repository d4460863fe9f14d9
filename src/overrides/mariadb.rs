//! MariaDB/Galera override generation
//!
//! The database replica count follows the controller topology: a single
//! replica on a one-controller system, one replica per controller otherwise.
//! Galera quorum needs an odd voter count, so an even replica count flags the
//! arbitrator (deployed as the separate garbd release).

use serde_json::json;

use crate::inventory::SystemRecord;
use crate::release::Release;
use crate::{Error, Result};

use super::OverrideGenerator;

/// Override generator for the mariadb release
pub struct MariadbOverrides;

impl OverrideGenerator for MariadbOverrides {
    fn release(&self) -> Release {
        Release::Mariadb
    }

    fn generate(&self, system: &SystemRecord) -> Result<serde_json::Value> {
        if system.controller_count == 0 {
            return Err(Error::overrides(
                Release::Mariadb.name(),
                "controller count is zero",
            ));
        }
        let replicas = server_replicas(system.controller_count);
        Ok(json!({
            "pod": {
                "replicas": {
                    "server": replicas,
                    "ingress": system.controller_count,
                }
            },
            "conf": {
                "galera": {
                    "arbitrator": needs_arbitrator(replicas),
                }
            }
        }))
    }
}

/// Database server replicas for the given controller count
fn server_replicas(controller_count: u32) -> u32 {
    if controller_count < 2 {
        1
    } else {
        controller_count
    }
}

/// Whether the replica count leaves Galera without an odd voter quorum
fn needs_arbitrator(replicas: u32) -> bool {
    replicas % 2 == 0
}
