//! Command-line configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use corelib::config::DEFAULT_REPLICATION_FACTOR;
use corelib::store::FileStore;
use corelib::{Cluster, ClusterConfig};
use tracing::debug;

use crate::commands::Command;

#[derive(Parser, Debug)]
#[command(
    name = "chordctl",
    version,
    about = "Inspect and administer the chord hash ring"
)]
pub struct CliConfig {
    /// JSON state file holding nodes, users, messages and the operation log.
    #[arg(short, long, global = true, env = "CHORD_STATE", default_value = "chord-state.json")]
    pub state: PathBuf,

    /// Replicas per key, owner included.
    #[arg(short, long, global = true, env = "CHORD_REPLICAS", default_value_t = DEFAULT_REPLICATION_FACTOR)]
    pub replicas: usize,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig::default().with_replication_factor(self.replicas)
    }

    /// Open the state file, run the command and print its result.
    pub async fn run(self) -> Result<()> {
        let store = FileStore::open(&self.state)
            .await
            .with_context(|| format!("failed to open state file {}", self.state.display()))?;
        let cluster = Cluster::open(Arc::new(store), self.cluster_config())
            .await
            .context("failed to load node registry")?;

        debug!(command = ?self.command, "running command");
        let result = self.command.execute(&cluster).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result.to_json())?);
        } else {
            print!("{}", result.render());
        }
        Ok(())
    }
}
