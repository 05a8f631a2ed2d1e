//! Runtime configuration for the `villa-api` binary.
//!
//! Every flag can also be set through the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::store::{JsonFilePersistence, StoreError, VillaStore};
use crate::villa::seed_villas;

#[derive(Debug, Clone, Parser)]
#[command(name = "villa-api", version, about = "Serve the villa resource API")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "VILLA_API_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Persist villas to this JSON file. Without it the store is in-memory.
    #[arg(long, env = "VILLA_API_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Load the sample villas when the store starts empty.
    #[arg(long, env = "VILLA_API_SEED")]
    pub seed: bool,

    /// Log filter directive, e.g. `info` or `villa_api=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log: String,
}

impl Config {
    /// Open the store this configuration describes.
    pub fn open_store(&self) -> Result<VillaStore, StoreError> {
        let store = match &self.data_file {
            Some(path) => {
                info!(path = %path.display(), "using JSON file persistence");
                VillaStore::open(JsonFilePersistence::new(path))?
            }
            None => {
                info!("using in-memory persistence");
                VillaStore::in_memory()
            }
        };

        if self.seed {
            let added = store.seed(seed_villas())?;
            if added > 0 {
                info!(added, "seeded sample villas");
            }
        }
        Ok(store)
    }
}
