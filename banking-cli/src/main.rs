//! Banking CLI
//!
//! Command-line interface for the Banking API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use banking_client::{BankingClient, ClientError};
use banking_types::{AccountId, AccountStatus, ApiKeyId, CustomerId, ErrorKind};

#[derive(Parser)]
#[command(name = "banking")]
#[command(author, version, about = "Banking API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Banking API
    #[arg(long, env = "BANKING_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// API key for authentication (customer key, or the admin key for `key` commands)
    #[arg(long, env = "BANKING_API_KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account operations
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },
    /// API key management (admin)
    Key {
        #[command(subcommand)]
        action: KeyCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Open a new account
    Open {
        /// Account type (saving, checking)
        #[arg(long, default_value = "checking")]
        account_type: String,
        /// Opening amount in minor units
        #[arg(long, default_value_t = 0)]
        amount: i64,
    },
    /// Get account details
    Get {
        /// Account ID (UUID)
        id: String,
    },
    /// List your accounts
    List,
    /// Deposit funds into an account
    Deposit {
        #[arg(long)]
        account: String,
        /// Amount in minor units
        #[arg(long)]
        amount: i64,
    },
    /// Withdraw funds from an account
    Withdraw {
        #[arg(long)]
        account: String,
        /// Amount in minor units
        #[arg(long)]
        amount: i64,
    },
    /// Change account status (ACTIVE, BLOCKED, CLOSED)
    Status {
        #[arg(long)]
        account: String,
        #[arg(long, value_parser = parse_status)]
        status: AccountStatus,
    },
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Issue an API key for a customer
    Issue {
        /// Name for the new key
        #[arg(long)]
        name: String,
        /// Customer the key authenticates as
        #[arg(long)]
        customer: String,
    },
    /// List all API keys
    List,
    /// Delete (deactivate) an API key
    Delete {
        /// API key ID (UUID)
        #[arg(long)]
        id: String,
    },
}

fn parse_status(s: &str) -> Result<AccountStatus, String> {
    s.to_ascii_uppercase().parse().map_err(|e| format!("{}", e))
}

fn parse_account_id(s: &str) -> Result<AccountId> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid account ID: {}", s))
}

/// Process exit code for a failed request, one per error kind.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ClientError>().and_then(ClientError::kind) {
        Some(ErrorKind::Validation) => 2,
        Some(ErrorKind::NotFound) => 3,
        Some(ErrorKind::Unauthorized) => 4,
        Some(ErrorKind::Conflict) => 5,
        Some(ErrorKind::Storage) | None => 1,
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_code(&err));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut client = BankingClient::new(&cli.api_url);
    if let Some(key) = cli.api_key {
        client = client.with_api_key(key);
    }

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                anyhow::bail!("API is not healthy");
            }
        }

        Commands::Account { action } => match action {
            AccountCommands::Open {
                account_type,
                amount,
            } => {
                let account = client.open_account(&account_type, amount).await?;
                println!("{}", serde_json::to_string_pretty(&account)?);
            }
            AccountCommands::Get { id } => {
                let account = client.get_account(parse_account_id(&id)?).await?;
                println!("{}", serde_json::to_string_pretty(&account)?);
            }
            AccountCommands::List => {
                let accounts = client.list_accounts().await?;
                println!("{}", serde_json::to_string_pretty(&accounts)?);
            }
            AccountCommands::Deposit { account, amount } => {
                let account = client.deposit(parse_account_id(&account)?, amount).await?;
                println!("{}", serde_json::to_string_pretty(&account)?);
            }
            AccountCommands::Withdraw { account, amount } => {
                let account = client
                    .withdraw(parse_account_id(&account)?, amount)
                    .await?;
                println!("{}", serde_json::to_string_pretty(&account)?);
            }
            AccountCommands::Status { account, status } => {
                let account = client
                    .set_status(parse_account_id(&account)?, status)
                    .await?;
                println!("{}", serde_json::to_string_pretty(&account)?);
            }
        },

        Commands::Key { action } => match action {
            KeyCommands::Issue { name, customer } => {
                let customer = CustomerId::new(customer)?;
                let created = client.create_api_key(&name, customer).await?;
                println!("{}", serde_json::to_string_pretty(&created)?);
            }
            KeyCommands::List => {
                let keys = client.list_api_keys().await?;
                println!("{}", serde_json::to_string_pretty(&keys)?);
            }
            KeyCommands::Delete { id } => {
                let key_id: ApiKeyId = id
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid API key ID: {}", id))?;
                client.delete_api_key(key_id).await?;
                println!("✓ API key deleted");
            }
        },
    }

    Ok(())
}
