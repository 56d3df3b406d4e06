//! Rebuilds the genesis peer membership from a peer registry.
//!
//! Replace, not merge: every `addPeer` command already in the document is
//! dropped and one fresh command per registry row is appended in registry
//! order. All other commands keep their relative order. The result is
//! written as compact JSON with sorted keys to a separate output file.

use std::path::Path;

use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::error::{GenesisError, Result};
use crate::genesis::command::{AddPeer, Command};
use crate::registry::{Peer, PeerRegistry};
use crate::storage::write_atomic;

/// Default output file written by `add_iroha_peers`.
pub const GENESIS_OUTPUT_FILE: &str = "genesis.block";

/// JSON pointer to the command list of the first transaction.
const COMMANDS_POINTER: &str = "/payload/transactions/0/payload/reducedPayload/commands";

fn shape_error(reason: impl Into<String>) -> GenesisError {
    GenesisError::JsonShape(reason.into())
}

/// Outcome of a peer-list rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildSummary {
    /// `addPeer` commands dropped from the input document.
    pub removed: usize,
    /// `addPeer` commands appended from the registry.
    pub added: usize,
    /// Non-`addPeer` commands carried through.
    pub preserved: usize,
}

/// A parsed genesis block.
#[derive(Debug, Clone, PartialEq)]
pub struct GenesisDocument {
    root: Value,
}

impl GenesisDocument {
    /// Wrap an already parsed document.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse genesis JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)
            .map_err(|e| shape_error(format!("not valid JSON: {e}")))?;
        Ok(Self { root })
    }

    /// Read and parse a genesis file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// The typed command list. An absent path reads as empty.
    ///
    /// # Errors
    ///
    /// `JsonShape` if `commands` exists but is not an array.
    pub fn commands(&self) -> Result<Vec<Command>> {
        match self.root.pointer(COMMANDS_POINTER) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => {
                Ok(items.iter().cloned().map(Command::from_value).collect())
            }
            Some(_) => Err(shape_error("reducedPayload.commands is not an array")),
        }
    }

    /// Replace every `addPeer` command with one per peer, in order.
    ///
    /// All new commands are built before the document is touched, so a
    /// peer without keys or with a malformed key leaves it unchanged.
    pub fn replace_peers(&mut self, peers: &[Peer]) -> Result<RebuildSummary> {
        let mut additions = Vec::with_capacity(peers.len());
        for peer in peers {
            let command = Command::AddPeer(AddPeer::for_peer(peer)?);
            additions.push(command.into_value()?);
            debug!("prepared addPeer for {}", peer.address());
        }

        let slot = self.commands_slot()?;
        let existing = std::mem::take(slot);

        let mut removed = 0;
        let mut commands = Vec::with_capacity(existing.len() + additions.len());
        for value in existing {
            match Command::from_value(value) {
                Command::AddPeer(_) | Command::MalformedAddPeer(_) => removed += 1,
                Command::Other(value) => commands.push(value),
            }
        }
        let preserved = commands.len();
        let added = additions.len();
        commands.extend(additions);
        *slot = commands;

        info!(
            "genesis peers rebuilt: {removed} removed, {added} added, {preserved} other command(s) kept"
        );
        Ok(RebuildSummary {
            removed,
            added,
            preserved,
        })
    }

    /// Compact JSON with object keys in sorted order.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.root).map_err(|e| GenesisError::Serialization(e.to_string()))
    }

    /// Write the document atomically to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        write_atomic(path, json.as_bytes())
    }

    /// Mutable command list, creating any missing part of the path.
    fn commands_slot(&mut self) -> Result<&mut Vec<Value>> {
        if self.root.pointer(COMMANDS_POINTER).is_none() {
            warn!("genesis document has no command list; starting from an empty one");
        }

        let payload = child(&mut self.root, "payload", "document root", empty_object)?;
        let transactions = child(payload, "transactions", "payload", || Value::Array(Vec::new()))?;
        let transactions = transactions
            .as_array_mut()
            .ok_or_else(|| shape_error("payload.transactions is not an array"))?;
        if transactions.is_empty() {
            transactions.push(empty_object());
        }

        let tx_payload = child(
            &mut transactions[0],
            "payload",
            "payload.transactions[0]",
            empty_object,
        )?;
        let reduced = child(
            tx_payload,
            "reducedPayload",
            "payload.transactions[0].payload",
            empty_object,
        )?;
        let commands = child(
            reduced,
            "commands",
            "payload.transactions[0].payload.reducedPayload",
            || Value::Array(Vec::new()),
        )?;
        commands
            .as_array_mut()
            .ok_or_else(|| shape_error("reducedPayload.commands is not an array"))
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Entry `key` of the object `parent`, inserted with `default` if absent.
fn child<'a>(
    parent: &'a mut Value,
    key: &str,
    at: &str,
    default: impl FnOnce() -> Value,
) -> Result<&'a mut Value> {
    let map = parent
        .as_object_mut()
        .ok_or_else(|| shape_error(format!("{at} is not an object")))?;
    Ok(map.entry(key).or_insert_with(default))
}

/// Rebuild the peer list of `doc` from `peers`.
pub fn rebuild_peer_list(mut doc: GenesisDocument, peers: &[Peer]) -> Result<GenesisDocument> {
    doc.replace_peers(peers)?;
    Ok(doc)
}

/// True when `output` already exists and resolves to the same file as
/// `input`. Symlinks and `.`/`..` segments are resolved.
fn same_file(input: &Path, output: &Path) -> bool {
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    }
}

/// Load a registry and a genesis file, rebuild the peer list, and write
/// the result to `output`.
///
/// `output` must not be the input genesis file. Nothing is written unless
/// every step before the write succeeds.
pub fn assemble(
    registry_path: &Path,
    genesis_path: &Path,
    output: &Path,
) -> Result<RebuildSummary> {
    if same_file(genesis_path, output) {
        return Err(GenesisError::SameOutput {
            path: output.display().to_string(),
        });
    }

    let registry = PeerRegistry::load(registry_path)?;
    registry.require_keys()?;

    let mut doc = GenesisDocument::load(genesis_path)?;
    let summary = doc.replace_peers(registry.peers())?;

    doc.save(output)?;
    info!("wrote genesis block to {}", output.display());

    Ok(summary)
}
