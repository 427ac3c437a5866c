//! Headless administrative CLI: create a galaxy, submit per-house orders,
//! trigger turn resolution, and dump fog-filtered state per house — all
//! invoking the same core functions a transport layer would call.
//! Modeled on `replayshark`'s `clap`-derived subcommand binary
//! (`landaire-wows-replays/replayshark/src/main.rs`), since this project
//! has no headless binary of its own to draw from.

mod fog;
mod list;
mod new_galaxy;
mod orders_io;
mod resolve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hexreach", about = "Administrative CLI for the hexreach turn resolver", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a new galaxy, seat houses, and write the opening save.
    New {
        /// Display name for the save.
        #[arg(long)]
        name: String,
        /// One house per `--house` flag, or a comma-separated list.
        #[arg(long = "house", required = true, num_args = 1.., value_delimiter = ',')]
        houses: Vec<String>,
        /// Overrides the config snapshot's `setup.ring_count`.
        #[arg(long)]
        ring_count: Option<u32>,
        /// Overrides the config snapshot's `setup.master_seed`.
        #[arg(long)]
        seed: Option<u64>,
        /// Declarative config TOML. Falls back to built-in defaults.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory saves are written to and listed from.
        #[arg(long, default_value = "saves")]
        save_dir: PathBuf,
    },
    /// Resolve one turn against a save and a set of per-house order packets.
    Resolve {
        /// Path to the `.hexreach` save to resolve.
        #[arg(long)]
        save: PathBuf,
        /// RON-encoded `OrderPacket` files, one per house that submitted orders.
        #[arg(long = "orders", num_args = 0..)]
        orders: Vec<PathBuf>,
        /// Declarative config TOML. Falls back to built-in defaults.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Where to write the resolved state. Defaults to overwriting `--save`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Project and print a house's fog-of-war view of the current save.
    Fog {
        /// Path to the `.hexreach` save to inspect.
        #[arg(long)]
        save: PathBuf,
        /// House name to project the view for.
        #[arg(long)]
        house: String,
    },
    /// List saves in a directory.
    List {
        /// Directory to list `.hexreach` saves from.
        #[arg(long, default_value = "saves")]
        save_dir: PathBuf,
    },
}

/// Entry point invoked by the thin `hexreach` binary at the workspace root.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::New { name, houses, ring_count, seed, config, save_dir } => {
            new_galaxy::run(&name, &houses, ring_count, seed, config.as_deref(), &save_dir)
        }
        Command::Resolve { save, orders, config, out } => resolve::run(&save, &orders, config.as_deref(), out.as_deref()),
        Command::Fog { save, house } => fog::run(&save, &house),
        Command::List { save_dir } => list::run(&save_dir),
    }
}
