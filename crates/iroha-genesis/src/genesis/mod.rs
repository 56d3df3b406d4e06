//! Genesis block peer membership.
//!
//! The genesis block is an opaque JSON document; only the command list of
//! its first transaction is touched:
//!
//! ```text
//! payload.transactions[0].payload.reducedPayload.commands
//! ```
//!
//! # Modules
//!
//! - [`command`] — typed view of a command (`addPeer` vs everything else).
//! - [`assembler`] — replaces the `addPeer` set from a peer registry.

pub mod assembler;
pub mod command;

pub use assembler::{
    assemble, rebuild_peer_list, GenesisDocument, RebuildSummary, GENESIS_OUTPUT_FILE,
};
pub use command::{AddPeer, Command, PeerDescriptor, ADD_PEER_KEY};
