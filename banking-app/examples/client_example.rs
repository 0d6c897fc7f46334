//! Client example walking through the account flows against a local server.
//!
//! Run with: cargo run -p banking-app --example client_example --no-default-features --features sqlite

use banking_client::BankingClient;
use banking_hex::{AccountService, inbound::HttpServer};
use banking_repo::build_repo;
use banking_types::{AccountStatus, CustomerId};
use std::net::SocketAddr;
use tempfile::tempdir;
use tokio::net::TcpListener;

const ADMIN_KEY: &str = "example-admin-key";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("banking.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on {addr}...");
    println!("   Database: {db_url}");

    let repo = build_repo(&db_url).await?;
    let service = AccountService::new(repo);
    let router = HttpServer::new(service, ADMIN_KEY).router();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router.into_make_service()).await {
            eprintln!("server stopped: {e}");
        }
    });

    let base_url = format!("http://{addr}");
    let anonymous = BankingClient::new(&base_url);

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: issue keys, open accounts, move money
    // ─────────────────────────────────────────────────────────────────────────

    println!("✅ Server health: {}", anonymous.health().await?);

    let err = anonymous.open_account("checking", 100).await.unwrap_err();
    println!("✅ Rejected without key: {err}");

    let admin = BankingClient::new(&base_url).with_api_key(ADMIN_KEY);
    let alice_key = admin
        .create_api_key("alice-laptop", CustomerId::new("alice")?)
        .await?;
    let bob_key = admin
        .create_api_key("bob-phone", CustomerId::new("bob")?)
        .await?;
    println!("✅ Issued keys for {} and {}", alice_key.customer_id, bob_key.customer_id);

    let alice = BankingClient::new(&base_url).with_api_key(alice_key.api_key);
    let bob = BankingClient::new(&base_url).with_api_key(bob_key.api_key);

    let account = alice.open_account("checking", 100).await?;
    println!("✅ Alice opened {} with balance {}", account.id, account.balance);

    let account = alice.deposit(account.id, 50).await?;
    println!("✅ After deposit: {}", account.balance);

    let err = alice.withdraw(account.id, 500).await.unwrap_err();
    println!("✅ Overdraft refused ({:?}): {err}", err.kind());

    let err = bob.withdraw(account.id, 10).await.unwrap_err();
    println!("✅ Bob cannot touch Alice's account ({:?}): {err}", err.kind());

    let account = alice.withdraw(account.id, 150).await?;
    let account = alice.set_status(account.id, AccountStatus::Closed).await?;
    println!("✅ Emptied and closed: {:?}", account.status);

    println!("✅ Alice now has {} account(s)", alice.list_accounts().await?.len());
    println!("✅ {} active key(s)", admin.list_api_keys().await?.len());

    Ok(())
}
