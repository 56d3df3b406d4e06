//! Typed genesis commands.
//!
//! A command object whose only key is `addPeer` registers a peer. Every
//! other command is carried as raw JSON and never inspected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::crypto::encoding;
use crate::error::{GenesisError, Result};
use crate::registry::Peer;

/// Key of the peer registration command.
pub const ADD_PEER_KEY: &str = "addPeer";

/// Address and base64 public key of a genesis peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerDescriptor {
    /// `host:port`.
    pub address: String,
    /// Standard base64 of the raw Ed25519 public key.
    #[serde(rename = "peerKey")]
    pub peer_key: String,
}

/// Body of an `addPeer` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPeer {
    pub peer: PeerDescriptor,
}

impl AddPeer {
    /// Build the registration for a registry row.
    ///
    /// # Errors
    ///
    /// `MissingKeys` if the row has no keys, `Encoding` if its public key
    /// is not valid hex.
    pub fn for_peer(peer: &Peer) -> Result<Self> {
        let keys = peer.keys()?;
        let field = format!("public key of {}", peer.address());
        Ok(Self {
            peer: PeerDescriptor {
                address: peer.address(),
                peer_key: encoding::hex_to_base64(&field, &keys.public_key)?,
            },
        })
    }
}

/// One entry of the genesis command list.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddPeer(AddPeer),
    /// Sole `addPeer` key, but the body is not a peer descriptor.
    MalformedAddPeer(Value),
    Other(Value),
}

impl Command {
    /// Classify a raw command object.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) if map.len() == 1 && map.contains_key(ADD_PEER_KEY) => {
                let body = map.get(ADD_PEER_KEY).cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<AddPeer>(body) {
                    Ok(add_peer) => Command::AddPeer(add_peer),
                    Err(_) => Command::MalformedAddPeer(Value::Object(map)),
                }
            }
            other => Command::Other(other),
        }
    }

    /// Serialize back to a raw command object.
    pub fn into_value(self) -> Result<Value> {
        match self {
            Command::AddPeer(add_peer) => {
                let body = serde_json::to_value(add_peer)
                    .map_err(|e| GenesisError::Serialization(e.to_string()))?;
                let mut map = Map::new();
                map.insert(ADD_PEER_KEY.to_string(), body);
                Ok(Value::Object(map))
            }
            Command::MalformedAddPeer(value) | Command::Other(value) => Ok(value),
        }
    }

    /// True for both well-formed and malformed `addPeer` commands.
    pub fn is_add_peer(&self) -> bool {
        matches!(self, Command::AddPeer(_) | Command::MalformedAddPeer(_))
    }
}
