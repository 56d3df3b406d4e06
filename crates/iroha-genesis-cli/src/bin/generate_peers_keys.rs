//! `generate-peers-keys` — assign fresh Ed25519 keys to every peer in a
//! registry file and rewrite it in place.
//!
//! Running it on an already keyed registry replaces every key pair.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use iroha_genesis::{PeerRegistry, RegistryShape};

/// Generate Ed25519 key pairs for the peers of an Iroha network.
#[derive(Parser, Debug)]
#[command(
    name = "generate-peers-keys",
    version,
    about = "Generate peer key pairs and rewrite the registry file"
)]
struct Cli {
    /// Path to the peers.csv registry (`host;port` rows)
    file: PathBuf,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut registry = PeerRegistry::load(&cli.file)
        .with_context(|| format!("failed to read peer registry {}", cli.file.display()))?;

    if registry.shape() == RegistryShape::Keyed {
        log::warn!(
            "{} already holds keys; every peer gets a new key pair",
            cli.file.display()
        );
    }

    registry.generate_all();
    for (index, peer) in registry.peers().iter().enumerate() {
        println!("node{index}  {}  {}", peer.address(), peer.keys()?.public_key);
    }

    registry
        .persist(&cli.file)
        .with_context(|| format!("failed to write peer registry {}", cli.file.display()))?;
    println!("Wrote {} peer(s) to {}", registry.len(), cli.file.display());

    Ok(())
}
