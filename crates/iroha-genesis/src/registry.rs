//! Peer registry — the ordered peer list kept in a `;`-delimited file.
//!
//! Two shapes are recognised:
//!
//! ```text
//! # unkeyed (operator input, no header)
//! 10.0.0.1;10001
//! 10.0.0.2;10001
//!
//! # keyed (after generate-peers-keys)
//! host;port;priv_key_b64_encoded;pub_key_b64_encoded
//! 10.0.0.1;10001;<private hex>;<public hex>
//! ```
//!
//! The header says base64 but the key columns hold lower-case hex. The
//! header is part of the on-disk contract and is written verbatim.
//!
//! Row order is preserved end to end and duplicate `host;port` rows are
//! kept as separate peers.

use std::path::Path;

use log::{debug, info, warn};
use zeroize::Zeroize;

use crate::crypto::{encoding, keys};
use crate::error::{GenesisError, Result};
use crate::storage::write_atomic;

/// Header line of a keyed registry file.
pub const REGISTRY_HEADER: &str = "host;port;priv_key_b64_encoded;pub_key_b64_encoded";

/// Column delimiter.
pub const DELIMITER: char = ';';

/// Which of the two registry layouts a file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryShape {
    /// `host;port`, no header.
    Unkeyed,
    /// Header line, then `host;port;priv;pub`.
    Keyed,
}

impl RegistryShape {
    /// Minimum number of fields a row must carry.
    pub fn columns(self) -> usize {
        match self {
            RegistryShape::Unkeyed => 2,
            RegistryShape::Keyed => 4,
        }
    }
}

/// A peer's key pair as lower-case hex text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerKeys {
    pub private_key: String,
    pub public_key: String,
}

/// One registry row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub host: String,
    pub port: String,
    /// `None` until keys have been generated.
    pub keys: Option<PeerKeys>,
}

impl Peer {
    /// A peer without keys.
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            keys: None,
        }
    }

    /// A peer with a known key pair.
    pub fn with_keys(
        host: impl Into<String>,
        port: impl Into<String>,
        private_key: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            keys: Some(PeerKeys {
                private_key: private_key.into(),
                public_key: public_key.into(),
            }),
        }
    }

    /// Network address in `host:port` form.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The peer's keys, or `MissingKeys` if they were never generated.
    pub fn keys(&self) -> Result<&PeerKeys> {
        self.keys.as_ref().ok_or_else(|| GenesisError::MissingKeys {
            address: self.address(),
        })
    }
}

/// Ordered list of founding peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRegistry {
    shape: RegistryShape,
    peers: Vec<Peer>,
}

impl PeerRegistry {
    /// Build a registry from peers in memory.
    pub fn new(peers: Vec<Peer>) -> Self {
        let shape = if !peers.is_empty() && peers.iter().all(|p| p.keys.is_some()) {
            RegistryShape::Keyed
        } else {
            RegistryShape::Unkeyed
        };
        Self { shape, peers }
    }

    /// Read and parse a registry file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `InputFormat` for short rows or a
    /// garbled header, `Encoding` for malformed key hex, and `KeyMismatch`
    /// when a row's public key is not derived from its private key.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let registry = Self::parse(&text)?;
        info!(
            "loaded {} peer(s) from {} ({:?})",
            registry.len(),
            path.display(),
            registry.shape
        );
        Ok(registry)
    }

    /// Parse registry text. Blank lines are ignored, as are extra columns
    /// after the first row of an unkeyed file. A headerless file whose
    /// first row has four or more fields is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end()))
            .filter(|(_, line)| !line.is_empty())
            .peekable();

        let shape = match lines.peek() {
            Some((_, line)) if *line == REGISTRY_HEADER => {
                lines.next();
                RegistryShape::Keyed
            }
            Some((number, line)) if line.starts_with("host;port;") => {
                return Err(GenesisError::InputFormat {
                    line: *number,
                    reason: format!("unrecognised header, expected `{REGISTRY_HEADER}`"),
                });
            }
            Some((number, line)) if line.split(DELIMITER).count() >= 4 => {
                return Err(GenesisError::InputFormat {
                    line: *number,
                    reason: format!("keyed rows without the `{REGISTRY_HEADER}` header"),
                });
            }
            _ => RegistryShape::Unkeyed,
        };

        let mut peers = Vec::new();
        for (number, line) in lines {
            peers.push(parse_row(number, line, shape)?);
        }

        Ok(Self { shape, peers })
    }

    /// Layout the registry was loaded with (or will be written with once
    /// every row has keys).
    pub fn shape(&self) -> RegistryShape {
        self.shape
    }

    /// Rows in file order.
    pub fn peers(&self) -> &[Peer] {
        &self.peers
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Assign a fresh key pair to every row.
    ///
    /// Existing keys are discarded: running this on an already keyed
    /// registry gives every peer a brand new identity. Host, port and row
    /// order are unchanged. Returns the number of pairs generated.
    pub fn generate_all(&mut self) -> usize {
        for peer in &mut self.peers {
            if peer.keys.is_some() {
                debug!("replacing existing keys for {}", peer.address());
            }
            let (public_key, private_key) = keys::generate();
            debug!("generated key pair for {}", peer.address());
            peer.keys = Some(PeerKeys {
                private_key,
                public_key,
            });
        }
        self.shape = RegistryShape::Keyed;
        info!("generated {} key pair(s)", self.peers.len());
        self.peers.len()
    }

    /// Fail with `MissingKeys` naming the first row without keys.
    pub fn require_keys(&self) -> Result<()> {
        for peer in &self.peers {
            peer.keys()?;
        }
        Ok(())
    }

    /// Render the keyed file contents: header, then one row per peer.
    pub fn render(&self) -> Result<String> {
        let mut out = String::with_capacity(REGISTRY_HEADER.len() + 1 + self.peers.len() * 160);
        out.push_str(REGISTRY_HEADER);
        out.push('\n');
        for peer in &self.peers {
            let keys = peer.keys()?;
            out.push_str(&peer.host);
            out.push(DELIMITER);
            out.push_str(&peer.port);
            out.push(DELIMITER);
            out.push_str(&keys.private_key);
            out.push(DELIMITER);
            out.push_str(&keys.public_key);
            out.push('\n');
        }
        Ok(out)
    }

    /// Overwrite `path` with the keyed registry.
    ///
    /// This is a full rewrite through a temp file and rename. Nothing is
    /// written if any row lacks keys.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let contents = self.render()?;
        write_atomic(path, contents.as_bytes())?;
        info!("wrote {} peer(s) to {}", self.len(), path.display());
        Ok(())
    }
}

fn parse_row(number: usize, line: &str, shape: RegistryShape) -> Result<Peer> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() < shape.columns() {
        return Err(GenesisError::InputFormat {
            line: number,
            reason: format!(
                "expected {} fields, found {}",
                shape.columns(),
                fields.len()
            ),
        });
    }

    let mut peer = Peer::new(fields[0], fields[1]);
    if shape == RegistryShape::Keyed {
        peer.keys = Some(parse_keys(number, fields[2], fields[3])?);
    }
    Ok(peer)
}

/// Validate the two key columns of a keyed row.
///
/// Rows written by older tooling put the public key before the private
/// key. Whichever column derives the other is taken as the private key.
/// Keys are kept re-encoded as lower-case hex whatever case the file used.
fn parse_keys(number: usize, third: &str, fourth: &str) -> Result<PeerKeys> {
    let mut first = encoding::decode_key_hex(&format!("line {number} column 3"), third)?;
    let mut second = encoding::decode_key_hex(&format!("line {number} column 4"), fourth)?;

    let keys = if keys::derive_public_key(&first) == second {
        Ok(PeerKeys {
            private_key: hex::encode(&first),
            public_key: hex::encode(&second),
        })
    } else if keys::derive_public_key(&second) == first {
        warn!("line {number}: public key precedes private key; accepting legacy column order");
        Ok(PeerKeys {
            private_key: hex::encode(&second),
            public_key: hex::encode(&first),
        })
    } else {
        Err(GenesisError::KeyMismatch { line: number })
    };

    first.zeroize();
    second.zeroize();
    keys
}
