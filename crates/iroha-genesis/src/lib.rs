//! Iroha genesis provisioning.
//!
//! Offline, operator-invoked tooling that bootstraps a permissioned Iroha
//! network: Ed25519 identities for the founding peers, the peer registry
//! file that records them, and the genesis block's initial peer
//! membership (`addPeer` commands).

pub mod crypto;
pub mod error;
pub mod export;
pub mod genesis;
pub mod registry;
pub mod storage;

// Re-export primary types
pub use crypto::keys::{generate, PeerKeyPair};
pub use error::{GenesisError, Result};
pub use export::{load_key_files, make_key_files};
pub use genesis::{
    assemble, rebuild_peer_list, AddPeer, Command, GenesisDocument, PeerDescriptor,
    RebuildSummary, GENESIS_OUTPUT_FILE,
};
pub use registry::{Peer, PeerKeys, PeerRegistry, RegistryShape, REGISTRY_HEADER};
