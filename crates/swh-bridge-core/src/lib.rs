//! Core types for bridging a content-addressed store to the
//! [Software Heritage](https://www.softwareheritage.org/) archive.
//!
//! - [`codec`] translates host keys (datastore keys and CIDs) into [`TypedHash`]es.
//! - [`swhid`] models the archive's [SWHID](https://docs.softwareheritage.org/devel/swh-model/persistent-identifiers.html)s.
//! - [`store`] defines the two storage interfaces a bridge must satisfy.
//!
//! ## Example
//!
//! ```
//! use swh_bridge_core::{codec::decode_block_key, swhid::Swhid};
//!
//! let swhid: Swhid = "swh:1:cnt:e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"
//!     .parse()
//!     .unwrap();
//!
//! let cid = swhid.to_cid().unwrap();
//! let hash = decode_block_key(&cid).unwrap();
//!
//! assert_eq!(hash.hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
//! ```

pub mod codec;
pub mod hash;
pub mod key;
pub mod store;
pub mod swhid;

pub use ipld_core::cid;
pub use ipld_core::cid::Cid;

pub use codec::DecodeError;
pub use hash::{HashAlgorithm, IntegrityMismatch, ObjectFormat, TypedHash};
pub use key::Key;
pub use swhid::{CandidateSet, ObjectKind, Swhid};
