//! Read-through storage backend for the [Software Heritage](https://www.softwareheritage.org/) archive.
//!
//! Lookups for Git objects and snapshots are translated into SWHIDs, checked
//! against the archive's `known` endpoint, and fetched from its `raw` endpoint.
//! Nothing is written back and nothing is cached.
//!
//! ## Usage
//!
//! ```no_run
//! use swh_bridge::{Bridge, config::BridgeConfig};
//! use swh_bridge_core::{store::Blockstore, swhid::Swhid};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bridge = Bridge::new(BridgeConfig::from_params(&Default::default()).unwrap()).unwrap();
//!     let blockstore = bridge.blockstore();
//!
//!     let swhid: Swhid = "swh:1:cnt:e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"
//!         .parse()
//!         .unwrap();
//!     let block = blockstore.get(&swhid.to_cid().unwrap()).await.unwrap();
//!
//!     assert_eq!(block.data(), b"blob 0\0");
//! }
//! ```

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{Span, info_span};

pub mod blockstore;
pub mod client;
pub mod config;
pub mod datastore;
pub mod profile;
pub mod resolver;

pub use swh_bridge_core as core;

use blockstore::BridgeBlockstore;
use client::ArchiveClient;
use config::{BridgeConfig, ConfigError};
use datastore::BridgeDatastore;
use resolver::Resolver;

/// A configured bridge, handing out store facades that share one resolver.
#[derive(Clone, Debug)]
pub struct Bridge {
    resolver: Resolver,
    strict_writes: bool,
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to construct HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl Bridge {
    /// Creates a bridge logging within a new `swh_bridge` span.
    pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
        let span = info_span!("swh_bridge", base_url = %config.base_url);
        Self::with_span(config, span)
    }

    /// Creates a bridge logging within `span`.
    pub fn with_span(config: BridgeConfig, span: Span) -> Result<Self, BridgeError> {
        let client = ArchiveClient::new(&config)?;

        Ok(Self {
            resolver: Resolver::new(client, config.kind_priority, span),
            strict_writes: config.strict_writes,
        })
    }

    /// Creates a bridge from the parameters of a datastore spec entry.
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, BridgeError> {
        Self::new(BridgeConfig::from_params(params)?)
    }

    pub fn datastore(&self) -> BridgeDatastore {
        BridgeDatastore::new(self.resolver.clone(), self.strict_writes)
    }

    /// A blockstore with re-hashing on read enabled.
    pub fn blockstore(&self) -> BridgeBlockstore {
        BridgeBlockstore::new(self.resolver.clone())
    }
}
