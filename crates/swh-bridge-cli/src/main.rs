use std::io::Write;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use swh_bridge::{
    Bridge,
    config::{BridgeConfig, DEFAULT_BASE_URL},
    profile,
};
use swh_bridge_core::{
    Cid, ObjectFormat, Swhid, TypedHash, cid::multibase::Base, codec::decode_hex_digest,
    store::Blockstore,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Resolve Software Heritage objects through the bridge")]
struct Args {
    /// Root of the archive's web API.
    #[arg(long, default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    #[arg(long, env = "SWH_AUTH_TOKEN", hide_env_values = true, global = true)]
    auth_token: Option<String>,

    /// Per-request timeout, in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the CID of each SWHID or hex Git hash.
    Cid { ids: Vec<String> },
    /// Write an object's raw bytes to stdout.
    Get {
        id: String,
        /// Return the bytes even if they do not hash to the requested id.
        #[arg(long)]
        no_rehash: bool,
    },
    /// Exit successfully if the archive knows the object.
    Has { id: String },
    /// Print the size of an object, in bytes.
    Size { id: String },
    /// Print the plugin, datastore spec and bridge parameters for a host node.
    Profile,
}

impl Args {
    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("base-url".to_string(), self.base_url.clone().into());

        if let Some(token) = &self.auth_token {
            params.insert("auth-token".to_string(), token.clone().into());
        }

        if let Some(secs) = self.timeout_secs {
            params.insert("timeout-secs".to_string(), secs.into());
        }

        params
    }
}

/// Accepts a SWHID, a bare hex Git hash, or any CID.
fn parse_target(id: &str) -> anyhow::Result<Cid> {
    if id.starts_with("swh:") {
        let swhid: Swhid = id.parse()?;
        return Ok(swhid.to_cid()?);
    }

    if let Ok(digest) = decode_hex_digest(id) {
        return Ok(TypedHash::new(ObjectFormat::GitRaw, digest).to_cid()?);
    }

    Cid::try_from(id).with_context(|| format!("{} is not a SWHID, Git hash or CID", id))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = BridgeConfig::from_params(&args.params())?;

    match args.command {
        Command::Cid { ids } => {
            for id in ids {
                let cid = parse_target(&id)?;
                println!("{}", cid.to_string_of_base(Base::Base16Lower)?);
            }
        }
        Command::Get { id, no_rehash } => {
            let cid = parse_target(&id)?;
            let blockstore = Bridge::new(config)?.blockstore();
            blockstore.hash_on_read(!no_rehash);

            debug!("getting {}", cid);
            let block = match blockstore.get(&cid).await {
                Ok(block) => block,
                Err(err) if err.is_not_found() => anyhow::bail!("{} is not in the archive", id),
                Err(err) => return Err(err).with_context(|| format!("failed to get {}", id)),
            };

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(block.data())?;
            stdout.flush()?;
        }
        Command::Has { id } => {
            let cid = parse_target(&id)?;
            let found = Bridge::new(config)?.blockstore().has(&cid).await?;

            if !found {
                anyhow::bail!("{} is not in the archive", id);
            }
        }
        Command::Size { id } => {
            let cid = parse_target(&id)?;
            let size = match Bridge::new(config)?.blockstore().get_size(&cid).await {
                Ok(size) => size,
                Err(err) if err.is_not_found() => anyhow::bail!("{} is not in the archive", id),
                Err(err) => return Err(err).with_context(|| format!("failed to get {}", id)),
            };

            println!("{}", size);
        }
        Command::Profile => {
            println!(
                "{}",
                serde_json::to_string_pretty(&profile::describe(&config))?
            );
        }
    }

    Ok(())
}
