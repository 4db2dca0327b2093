//! Polychat CLI — entry point.
//!
//! # Commands
//!
//! - `polychat serve [--host HOST] [--port PORT]` — run the HTTP gateway
//! - `polychat providers` — list supported providers
//! - `polychat models <PROVIDER>` — list a provider's model catalog

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use polychat_core::config::load_config;
use polychat_providers::registry::{lookup, Provider};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Polychat — provider-agnostic chat proxy
#[derive(Parser)]
#[command(name = "polychat", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List supported providers
    Providers,

    /// List the model catalog for one provider
    Models {
        /// Provider id (e.g. "openai")
        provider: String,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, logs } => {
            init_logging(logs);
            serve(host, port).await
        }
        Commands::Providers => {
            print_providers();
            Ok(())
        }
        Commands::Models { provider } => print_models(&provider),
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(None);
    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }

    polychat_gateway::serve(&config).await
}

fn print_providers() {
    println!("Supported providers:");
    for provider in Provider::ALL {
        let descriptor = provider.descriptor();
        println!("  {:<12} {}", descriptor.id, descriptor.display_name);
    }
}

fn print_models(provider: &str) -> Result<()> {
    let Some(descriptor) = lookup(&provider.trim().to_lowercase()) else {
        bail!("unknown provider: {provider}");
    };

    println!("Models for {}:", descriptor.display_name);
    for model in descriptor.models {
        println!("  {:<36} {}", model.id, model.name);
    }
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("polychat=debug,info")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
