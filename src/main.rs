use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use payment_recorder::application::recorder::PaymentRecorder;
use payment_recorder::config::RecorderConfig;
use payment_recorder::domain::path::StoragePath;
use payment_recorder::domain::ports::{Storage, StorageHandle};
use payment_recorder::infrastructure::broadcast::BroadcastNotifier;
use payment_recorder::infrastructure::identity::SessionIdentity;
use payment_recorder::infrastructure::in_memory::InMemoryStore;
use payment_recorder::interfaces::csv::callback_reader::CallbackReader;
use serde_json::json;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

/// Replays recorded payment callbacks through the reconciliation recorder.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input callbacks CSV file (`event, user, token, code, detail`)
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Seed a cart before replaying, as `user=item1,item2`. Repeatable.
    #[arg(long = "cart", value_parser = parse_cart_seed)]
    carts: Vec<CartSeed>,

    #[command(flatten)]
    config: RecorderConfig,
}

#[derive(Debug, Clone)]
struct CartSeed {
    user: String,
    items: Vec<String>,
}

fn parse_cart_seed(raw: &str) -> std::result::Result<CartSeed, String> {
    let (user, items) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected user=item1,item2, got {raw:?}"))?;
    let items = items
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    Ok(CartSeed {
        user: user.trim().to_string(),
        items,
    })
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_storage(db_path: Option<PathBuf>, config: &RecorderConfig) -> Result<StorageHandle> {
    use payment_recorder::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        // Use persistent storage (RocksDB)
        Some(db_path) => Ok(Arc::new(RocksDBStore::open(db_path, config).into_diagnostic()?)),
        None => Ok(Arc::new(InMemoryStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_storage(db_path: Option<PathBuf>, _config: &RecorderConfig) -> Result<StorageHandle> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Arc::new(InMemoryStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config;

    let storage = open_storage(cli.db_path, &config)?;
    for seed in cli.carts {
        let path = StoragePath::cart_items(&config.cart_root, &seed.user).into_diagnostic()?;
        storage.write(&path, json!(seed.items)).await.into_diagnostic()?;
    }

    let session = SessionIdentity::new();
    let notifier = BroadcastNotifier::new(config.broadcast_capacity);
    let mut events = notifier.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    eprintln!("event {} {}", event.name, json!(event.payload));
                }
                Err(RecvError::Lagged(missed)) => {
                    eprintln!("Missed {missed} payment events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let ledger_root = StoragePath::root(&config.ledger_root).into_diagnostic()?;
    let recorder = PaymentRecorder::new(
        storage.clone(),
        Arc::new(session.clone()),
        Arc::new(notifier),
        config,
    );

    // Process callbacks
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CallbackReader::new(file);
    for callback in reader.callbacks() {
        match callback {
            Ok(callback) => {
                match callback.user {
                    Some(user) => session.sign_in(user).await,
                    None => session.sign_out().await,
                }
                if recorder.record(callback.signal).await.is_none() {
                    eprintln!("Error recording callback: outcome dropped");
                }
            }
            Err(e) => {
                eprintln!("Error reading callback: {}", e);
            }
        }
    }

    // Closing the last sender ends the printer task.
    drop(recorder);
    printer
        .await
        .map_err(|e| miette!("event printer failed: {e}"))?;

    // Output the ledger
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (path, record) in storage.scan(&ledger_root).await.into_diagnostic()? {
        writeln!(out, "{}", json!({ "path": path, "record": record })).into_diagnostic()?;
    }

    Ok(())
}
