use std::path::PathBuf;
use std::time::Duration;

use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::hex;
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use remote_signer_client::config::{load_config, load_from_env};
use remote_signer_client::observability::logging;
use remote_signer_client::{CallContext, SignerClient, SigningRequest};

#[derive(Parser)]
#[command(name = "signer-cli")]
#[command(about = "Talk to a remote transaction signer over mutual TLS", long_about = None)]
struct Cli {
    /// TOML config file; without it the SIGNER_* environment variables are used
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and print the signer status
    Status,
    /// Sign the transaction described by a JSON signing request
    Sign {
        /// Path to a JSON file holding eth_signTransaction arguments
        #[arg(short, long)]
        request: PathBuf,

        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    logging::init(&config.observability.log_level);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, canceling");
            on_signal.cancel();
        }
    });

    let client = SignerClient::from_config(&config).await?;

    match cli.command {
        Commands::Status => {
            println!("{}", client.status());
        }
        Commands::Sign {
            request,
            timeout_secs,
        } => {
            let text = std::fs::read_to_string(&request)?;
            let mut request: SigningRequest = serde_json::from_str(&text)?;
            if let (None, Some(address)) = (request.sender(), config.address) {
                request = request.with_from(address);
            }

            // Rebuild first so an unsignable request never reaches the signer.
            let unsigned = request.to_transaction()?;
            tracing::debug!(tx_type = ?unsigned.tx_type(), "Signing request parsed");

            let ctx = CallContext::new()
                .with_timeout(Duration::from_secs(timeout_secs))
                .with_cancellation(cancel);
            let signed = client.sign_request(&ctx, &request).await?;

            let out = json!({
                "hash": signed.tx_hash(),
                "raw": hex::encode_prefixed(signed.encoded_2718()),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
