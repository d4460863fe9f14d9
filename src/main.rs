//! Ballast - lifecycle tooling for an OpenStack control plane on Kubernetes

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kube::Client;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ballast::helmrelease::HelmReleaseApi;
use ballast::inventory::SystemRecord;
use ballast::overrides::generate_overrides;
use ballast::release::Release;
use ballast::sequencer::ReleaseApi;

/// Ballast - release sequencing and Helm value overrides for OpenStack on Kubernetes
#[derive(Parser, Debug)]
#[command(name = "ballast", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the Helm value overrides for a release as YAML
    ///
    /// The system record is read from a YAML file; omit it to use the record
    /// defaults (standalone system, one controller).
    Overrides(OverridesArgs),

    /// List the known releases and their static groups
    Releases,

    /// Persist the enabled flag on a release's override record
    ///
    /// Manual escape hatch for operators; the restore sequencer drives this
    /// flag itself during a restore.
    SetEnabled(SetEnabledArgs),
}

/// Overrides mode arguments
#[derive(Parser, Debug)]
struct OverridesArgs {
    /// Release to generate overrides for
    release: String,

    /// Path to a YAML file holding the system record
    #[arg(short = 'f', long = "system")]
    system_file: Option<PathBuf>,
}

/// Set-enabled mode arguments
#[derive(Parser, Debug)]
struct SetEnabledArgs {
    /// Release whose override record to update
    release: String,

    /// Value to persist
    #[arg(long)]
    enabled: bool,
}

#[tokio::main]
async fn main() -> ballast::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Overrides(args) => {
            let release: Release = args.release.parse()?;
            let system = load_system_record(args.system_file.as_deref())?;
            match generate_overrides(release, &system)? {
                Some(values) => {
                    let yaml = serde_yaml::to_string(&values)
                        .map_err(|e| ballast::Error::serialization(e.to_string()))?;
                    print!("{yaml}");
                }
                None => info!(release = %release, "release has no inventory-driven overrides"),
            }
            Ok(())
        }
        Commands::Releases => {
            for release in Release::ALL {
                match release.group() {
                    Some(group) => println!("{release} ({group})"),
                    None => println!("{release}"),
                }
            }
            Ok(())
        }
        Commands::SetEnabled(args) => {
            let release: Release = args.release.parse()?;
            let client = Client::try_default().await?;
            let api = HelmReleaseApi::new(client);
            api.set_override_enabled(release, release.namespace(), args.enabled)
                .await?;
            Ok(())
        }
    }
}

/// Load the system record from a YAML file, falling back to defaults
fn load_system_record(path: Option<&std::path::Path>) -> ballast::Result<SystemRecord> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                ballast::Error::serialization(format!("cannot read {}: {e}", path.display()))
            })?;
            serde_yaml::from_str(&contents)
                .map_err(|e| ballast::Error::serialization(e.to_string()))
        }
        None => Ok(SystemRecord::default()),
    }
}
