use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use application::BookstoreApp;
use clap::{Parser, Subcommand};
use config::Config;
use domain::{NewOrderRequest, NewUserRequest, OrderStatus};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bookstore", about = "Bookstore order backend", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, PartialEq, Subcommand)]
enum Command {
    /// Register a user from a JSON registration file
    Register { path: PathBuf },
    /// Add a book to the catalogue
    AddBook {
        name: String,
        author: String,
        price: i32,
        stock: i32,
    },
    /// Place an order for a user from a JSON order file
    PlaceOrder { user_id: i32, path: PathBuf },
    /// Print the summary of one order
    Order { order_id: i32 },
    /// Print a user's orders, newest first
    Orders { user_id: i32 },
    /// Move an order to another status
    SetStatus { order_id: i32, status: OrderStatus },
    /// Cancel an order and return its stock
    CancelOrder { order_id: i32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    info!(
        storage = %config.storage,
        database = %config.database_url,
        "configuration loaded"
    );

    let app = BookstoreApp::new(&config)?;
    run(&app, cli.command).await
}

async fn run(app: &BookstoreApp, command: Command) -> Result<()> {
    match command {
        Command::Register { path } => {
            let request: NewUserRequest = read_json(&path)?;
            print_json(&app.register_user(request).await?)
        }
        Command::AddBook {
            name,
            author,
            price,
            stock,
        } => print_json(&app.book_service.add_book(name, author, price, stock).await?),
        Command::PlaceOrder { user_id, path } => {
            let request: NewOrderRequest = read_json(&path)?;
            print_json(&app.place_order(user_id, &request).await?)
        }
        Command::Order { order_id } => print_json(&app.order_summary(order_id).await?),
        Command::Orders { user_id } => {
            print_json(&app.order_service.orders_for_user(user_id).await?)
        }
        Command::SetStatus { order_id, status } => {
            print_json(&app.order_service.update_status(order_id, status).await?)
        }
        Command::CancelOrder { order_id } => {
            print_json(&app.order_service.cancel_order(order_id).await?)
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
