//! eRupee CLI Application
//!
//! A command-line driver for the coin ledger.

use clap::{Parser, Subcommand};
use erupee_chain::cli;
use erupee_chain::core::{LedgerConfig, BLOCK_REWARD, DEFAULT_DIFFICULTY};

#[derive(Parser)]
#[command(name = "erupee")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A denomination-based coin ledger with proof-of-work sealing", long_about = None)]
struct Cli {
    /// Mining difficulty (number of leading zero hex digits)
    #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: u32,

    /// Give up on a block after this many nonce attempts
    #[arg(long)]
    max_attempts: Option<u64>,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted demonstration session
    Demo {
        /// Empty blocks mined before the first transfer
        #[arg(short, long, default_value = "3")]
        warmup_blocks: u32,
    },

    /// Mine empty blocks (Ctrl+C cancels the block in progress)
    Mine {
        /// Number of blocks to mine
        #[arg(short, long, default_value = "1")]
        count: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = LedgerConfig {
        difficulty: cli.difficulty,
        reward_denomination: BLOCK_REWARD,
        max_mining_attempts: cli.max_attempts,
    };

    match cli.command {
        Commands::Demo { warmup_blocks } => cli::cmd_demo(config, warmup_blocks, cli.json),
        Commands::Mine { count } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cli::cmd_mine(config, count, cli.json))
        }
    }
}
