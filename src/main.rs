//! chainrig: smart-contract toolchain configuration CLI.
//!
//! ```text
//!   .env + environment ──┐
//!                        ├─▶ ConfigLoader ─▶ ToolConfig ─▶ show / validate / networks
//!   chainrig.toml ───────┘                       │
//!                                                └─▶ select_network ─▶ task / gas-report
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use chainrig::config::{load_from_env, ToolConfig};
use chainrig::gas::GasReport;
use chainrig::observability::init_logging;
use chainrig::tasks::{TaskContext, TaskRegistry};

#[derive(Parser)]
#[command(name = "chainrig")]
#[command(about = "Configuration and tasks for a smart-contract toolchain", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./chainrig.toml, then the built-in record)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Network to use instead of the configured default
    #[arg(short, long, global = true)]
    network: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// RPC request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    rpc_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the loaded configuration as JSON (secrets omitted)
    Show,
    /// Validate the configuration and the selected network's requirements
    Validate,
    /// List declared networks
    Networks,
    /// List available tasks
    Tasks,
    /// Run a task against the selected network
    Task {
        /// Task name, e.g. block-number
        name: String,
    },
    /// Write the gas report from a JSON file of samples
    GasReport {
        /// JSON array of {contract, method, gas_used}
        #[arg(short, long)]
        input: PathBuf,

        /// Project root the report path is relative to
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = load_from_env(cli.config.as_deref())?;
    let network = cli.network.as_deref();

    match cli.command {
        Commands::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Validate => {
            let selected = config.select_network(network)?;
            println!(
                "Configuration OK (network {}, chain {})",
                selected.name,
                selected.chain_id()
            );
        }
        Commands::Networks => print_networks(&config),
        Commands::Tasks => {
            for task in TaskRegistry::from_config(&config).tasks() {
                println!("{:<14} {}", task.name(), task.description());
            }
        }
        Commands::Task { name } => {
            let task = TaskRegistry::from_config(&config).lookup(&name)?;
            let ctx = TaskContext {
                config: &config,
                network: config.select_network(network)?,
                rpc_timeout: Duration::from_secs(cli.rpc_timeout),
            };
            println!("{}", task.run(&ctx).await?);
        }
        Commands::GasReport { input, root } => {
            let selected = config.select_network(network)?;
            let report = GasReport::from_samples(GasReport::load_samples(&input)?);
            match report.write(&config, &selected, &root)? {
                Some(path) => println!("Gas report written to {}", path.display()),
                None => println!("Gas reporter disabled"),
            }
        }
    }

    Ok(())
}

fn print_networks(config: &ToolConfig) {
    for (name, profile) in &config.networks {
        let marker = if *name == config.default_network { "*" } else { " " };
        let endpoint = profile.rpc_url.as_deref().unwrap_or("(simulated)");
        println!(
            "{} {:<10} chain {:<8} confirmations {:<3} accounts {}/{}  {}",
            marker,
            name,
            profile.chain_id,
            profile.confirmations(),
            profile.accounts.iter().flatten().count(),
            profile.accounts_env.len(),
            endpoint
        );
    }
}
