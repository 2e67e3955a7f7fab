use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use uuid::Uuid;

use reserve_funds::ledger::types::{ACCEPT_VERSION, AIT_ID, BUSINESS_TAXONOMY_ID, CORRELATION_ID};

#[derive(Parser)]
#[command(name = "reserve-cli")]
#[command(about = "Operator CLI for the reserve-funds service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reserve funds on an account or debit card
    Reserve(ReserveArgs),
    /// Check service health
    Health,
}

#[derive(Args)]
struct ReserveArgs {
    /// Account number to reserve against
    #[arg(long, conflicts_with = "card", required_unless_present = "card")]
    account: Option<String>,

    /// Debit card number to reserve against
    #[arg(long)]
    card: Option<String>,

    /// Amount in minor units (negative for a debit)
    #[arg(long, allow_hyphen_values = true)]
    amount: i64,

    /// Opaque JSON metadata forwarded to the ledger
    #[arg(long, default_value = "{}")]
    meta: String,

    /// Cascade to overdraft accounts on insufficient funds
    #[arg(long)]
    protect: bool,

    /// Reuse a request uuid (idempotent replay); random when omitted
    #[arg(long)]
    request_uuid: Option<Uuid>,

    #[arg(long, default_value = "reserve-cli")]
    ait_id: String,

    #[arg(long, default_value = "operations")]
    taxonomy: String,

    #[arg(long, default_value = "1_0")]
    api_version: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Reserve(args) => {
            let correlation_id = Uuid::new_v4().to_string();
            let body = json!({
                "request_uuid": args.request_uuid.unwrap_or_else(Uuid::new_v4),
                "account_number": args.account,
                "debit_card_number": args.card,
                "transaction_amount": args.amount,
                "transaction_meta_data_json": args.meta,
                "protect_against_overdraft": args.protect,
            });

            eprintln!("correlation-id: {}", correlation_id);
            let res = client
                .post(format!("{}/ReserveFunds", cli.url))
                .header(AIT_ID, args.ait_id)
                .header(BUSINESS_TAXONOMY_ID, args.taxonomy)
                .header(CORRELATION_ID, correlation_id)
                .header(ACCEPT_VERSION, args.api_version)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
