//! Per-peer key files.
//!
//! Peer `i` (0-based registry order) gets two plaintext files holding its
//! key text verbatim, with no trailing newline:
//!
//! ```text
//! node0.priv   node0.pub
//! node1.priv   node1.pub
//! ```
//!
//! Files are overwritten when present. There is no rollback across the
//! batch: an IO failure on peer `n` leaves files for peers `0..n` in place.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::crypto::encoding;
use crate::crypto::keys::PeerKeyPair;
use crate::error::{GenesisError, Result};
use crate::registry::{Peer, PeerKeys};

/// File holding the private key of peer `index`.
pub fn private_key_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("node{index}.priv"))
}

/// File holding the public key of peer `index`.
pub fn public_key_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("node{index}.pub"))
}

/// Write `node{i}.priv` and `node{i}.pub` into `dir` for every peer.
///
/// Every peer must have keys; that is checked before the first file is
/// written. Returns the paths written, in order.
pub fn make_key_files(peers: &[Peer], dir: &Path) -> Result<Vec<PathBuf>> {
    let keys = peers
        .iter()
        .map(Peer::keys)
        .collect::<Result<Vec<&PeerKeys>>>()?;

    let mut written = Vec::with_capacity(keys.len() * 2);
    for (index, keys) in keys.into_iter().enumerate() {
        let private_path = private_key_path(dir, index);
        std::fs::write(&private_path, &keys.private_key)?;
        let public_path = public_key_path(dir, index);
        std::fs::write(&public_path, &keys.public_key)?;
        debug!("wrote key files for node{index}");
        written.push(private_path);
        written.push(public_path);
    }

    info!("wrote {} key file(s) to {}", written.len(), dir.display());
    Ok(written)
}

/// Read back the key files of peer `index` and validate the pair.
///
/// The private key must derive the public key, and a test message signed
/// with it must verify under the public key.
///
/// # Errors
///
/// `Io` if either file is missing, `Encoding` for malformed hex, and
/// `KeyFileMismatch` if the pair does not belong together.
pub fn load_key_files(dir: &Path, index: usize) -> Result<PeerKeys> {
    let private_key = std::fs::read_to_string(private_key_path(dir, index))?;
    let public_key = std::fs::read_to_string(public_key_path(dir, index))?;

    let pair =
        PeerKeyPair::from_private_hex(&format!("node{index}.priv"), private_key.trim())?;
    let public = encoding::decode_key_hex(&format!("node{index}.pub"), public_key.trim())?;
    if pair.public_key_bytes() != public || !pair.signs_for(&public)? {
        return Err(GenesisError::KeyFileMismatch { index });
    }

    Ok(PeerKeys {
        private_key,
        public_key,
    })
}
