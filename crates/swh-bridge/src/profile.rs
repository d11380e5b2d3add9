//! How a host node is configured to use the bridge.
//!
//! The bridge is mounted over the host's block namespace, so block lookups go to
//! the archive while everything else stays in a local leveldb store.

use serde_json::{Map, Value, json};

use crate::config::BridgeConfig;

pub const PLUGIN_NAME: &str = "swhds";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `type` of the bridge's entry in a datastore spec.
pub const DATASTORE_TYPE: &str = "swhbridge";

/// Name of the host configuration profile that installs [`datastore_spec`].
pub const PROFILE_NAME: &str = "swhbridge";
pub const PROFILE_DESCRIPTION: &str =
    "Configures the node to act as a bridge to the Software Heritage archive.";

pub const BLOCKS_MOUNTPOINT: &str = "/blocks";

/// The datastore spec installed by the profile.
pub fn datastore_spec() -> Value {
    json!({
        "type": "mount",
        "mounts": [
            {
                "mountpoint": BLOCKS_MOUNTPOINT,
                "type": "measure",
                "prefix": "swhbridge.datastore",
                "child": {
                    "type": DATASTORE_TYPE,
                },
            },
            {
                "mountpoint": "/",
                "type": "measure",
                "prefix": "leveldb.datastore",
                "child": {
                    "type": "levelds",
                    "path": "datastore",
                    "compression": "none",
                },
            },
        ],
    })
}

/// Renders a config back into the parameters of a datastore spec entry.
pub fn to_params(config: &BridgeConfig) -> Map<String, Value> {
    let mut params = Map::new();

    params.insert("type".to_string(), DATASTORE_TYPE.into());
    params.insert("base-url".to_string(), config.base_url.as_str().into());

    if let Some(token) = &config.auth_token {
        params.insert("auth-token".to_string(), token.as_str().into());
    }

    params.insert(
        "kind-priority".to_string(),
        config
            .kind_priority
            .iter()
            .map(|kind| Value::from(kind.tag()))
            .collect(),
    );

    if config.strict_writes {
        params.insert("strict-writes".to_string(), true.into());
    }

    if let Some(timeout) = config.timeout {
        params.insert("timeout-secs".to_string(), timeout.as_secs().into());
    }

    params
}

/// Everything a host needs to install the bridge: plugin identity, profile and
/// the parameters of the bridge's datastore entry.
pub fn describe(config: &BridgeConfig) -> Value {
    json!({
        "plugin": {
            "name": PLUGIN_NAME,
            "version": PLUGIN_VERSION,
        },
        "profile": {
            "name": PROFILE_NAME,
            "description": PROFILE_DESCRIPTION,
        },
        "datastore": datastore_spec(),
        "bridge": to_params(config),
    })
}
