//! `genesis-tool` — genesis block peer membership and per-peer key files.
//!
//! ```text
//! genesis-tool add_iroha_peers  peers.csv genesis.json [--output genesis.block]
//! genesis-tool make_key_files   peers.csv [--out-dir DIR]
//! genesis-tool verify_key_files peers.csv [--out-dir DIR]
//! ```
//!
//! An unknown command name prints `Invalid command` and exits with
//! status 0.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use iroha_genesis::export::{load_key_files, make_key_files};
use iroha_genesis::{assemble, PeerRegistry, GENESIS_OUTPUT_FILE};

/// Message printed for an unrecognised command name.
const INVALID_COMMAND: &str = "Invalid command";

/// Rebuild the genesis peer list or export per-peer key files.
#[derive(Parser, Debug)]
#[command(
    name = "genesis-tool",
    version,
    about = "Iroha genesis peer tool",
    long_about = "genesis-tool — Iroha genesis peer tool\n\nCommands:\n  add_iroha_peers   replace the addPeer commands of a genesis block\n  make_key_files    write node<i>.priv / node<i>.pub for every peer\n  verify_key_files  check exported key files against the registry"
)]
struct Cli {
    /// add_iroha_peers, make_key_files or verify_key_files
    command: String,

    /// Path to the keyed peers.csv registry
    registry: PathBuf,

    /// Genesis block to read (add_iroha_peers only)
    genesis: Option<PathBuf>,

    /// Where add_iroha_peers writes the new genesis block (must not be the input)
    #[arg(long, default_value = GENESIS_OUTPUT_FILE)]
    output: PathBuf,

    /// Directory for key files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    AddIrohaPeers,
    MakeKeyFiles,
    VerifyKeyFiles,
}

impl Action {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "add_iroha_peers" => Some(Action::AddIrohaPeers),
            "make_key_files" => Some(Action::MakeKeyFiles),
            "verify_key_files" => Some(Action::VerifyKeyFiles),
            _ => None,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let Some(action) = Action::from_name(&cli.command) else {
        println!("{INVALID_COMMAND}");
        return;
    };

    let result = match action {
        Action::AddIrohaPeers => cmd_add_iroha_peers(&cli),
        Action::MakeKeyFiles => cmd_make_key_files(&cli.registry, &cli.out_dir),
        Action::VerifyKeyFiles => cmd_verify_key_files(&cli.registry, &cli.out_dir),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn load_registry(path: &Path) -> Result<PeerRegistry> {
    PeerRegistry::load(path)
        .with_context(|| format!("failed to read peer registry {}", path.display()))
}

/// `genesis-tool add_iroha_peers <registry> <genesis> [--output PATH]`
fn cmd_add_iroha_peers(cli: &Cli) -> Result<()> {
    let genesis = cli
        .genesis
        .as_deref()
        .ok_or_else(|| anyhow!("add_iroha_peers requires a genesis block path"))?;

    let summary = assemble(&cli.registry, genesis, &cli.output).with_context(|| {
        format!(
            "failed to add peers from {} to {}",
            cli.registry.display(),
            genesis.display()
        )
    })?;

    println!(
        "Wrote {} ({} peer(s) added, {} removed, {} other command(s) kept)",
        cli.output.display(),
        summary.added,
        summary.removed,
        summary.preserved
    );
    Ok(())
}

/// `genesis-tool make_key_files <registry> [--out-dir DIR]`
fn cmd_make_key_files(registry_path: &Path, out_dir: &Path) -> Result<()> {
    let registry = load_registry(registry_path)?;
    let written = make_key_files(registry.peers(), out_dir)
        .with_context(|| format!("failed to write key files to {}", out_dir.display()))?;

    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

/// `genesis-tool verify_key_files <registry> [--out-dir DIR]`
fn cmd_verify_key_files(registry_path: &Path, out_dir: &Path) -> Result<()> {
    let registry = load_registry(registry_path)?;
    registry.require_keys()?;

    let mut failures = 0;
    for (index, peer) in registry.peers().iter().enumerate() {
        let expected = peer.keys()?;
        match load_key_files(out_dir, index) {
            Ok(found)
                if found.private_key.trim() == expected.private_key
                    && found.public_key.trim() == expected.public_key =>
            {
                println!("node{index}  {}  ok", peer.address());
            }
            Ok(_) => {
                failures += 1;
                println!("node{index}  {}  differs from registry", peer.address());
            }
            Err(e) => {
                failures += 1;
                println!("node{index}  {}  {e}", peer.address());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} peer(s) failed verification", registry.len());
    }
    Ok(())
}
