//! Hashing, capability derivation and key ids.

pub mod caps;
pub mod hash;
pub mod id;

pub use caps::{tree_signable, TreeSignable, TREE_SIGNABLE_LEN};
pub use hash::{hash, namespace};
pub use id::{decode_key, normalize};
