//! FX CLI
//!
//! Command-line interface for the currency conversion API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use fx_client::FxClient;

#[derive(Parser)]
#[command(name = "fx")]
#[command(author, version, about = "Currency conversion API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the conversion API
    #[arg(long, env = "FX_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert (must be greater than zero)
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Source currency (ISO 4217, e.g. USD)
        from: String,
        /// Target currency (ISO 4217, e.g. EUR)
        to: String,
        /// Print the full JSON result instead of a one-line summary
        #[arg(long)]
        json: bool,
    },
    /// Drop the server's cached exchange rates
    Refresh,
    /// Check API health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = FxClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Convert {
            amount,
            from,
            to,
            json,
        } => {
            let result = client.convert(amount, &from, &to).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "{} {} = {:.2} {} (rate {:.6}, as of {})",
                    result.input_amount,
                    result.source_currency,
                    result.output_amount,
                    result.target_currency,
                    result.cross_rate,
                    result.conversion_date
                );
            }
        }

        Commands::Refresh => {
            let message = client.refresh().await?;
            println!("{}", message);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from(["fx", "convert", "100", "usd", "EUR", "--json"]).unwrap();
        match cli.command {
            Commands::Convert {
                amount,
                from,
                to,
                json,
            } => {
                assert_eq!(amount, 100.0);
                assert_eq!(from, "usd");
                assert_eq!(to, "EUR");
                assert!(json);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_parse_negative_amount() {
        // Left for the server to reject with its own message.
        let cli = Cli::try_parse_from(["fx", "convert", "-5", "USD", "EUR"]).unwrap();
        match cli.command {
            Commands::Convert { amount, .. } => assert_eq!(amount, -5.0),
            _ => panic!("expected convert"),
        }
    }
}
