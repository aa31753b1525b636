//! Cartwheel - Shop cart page session driver.
//!
//! Each invocation is one page session: the catalog is fetched from the shop
//! origin, the cart is restored from the state directory, one page event is
//! applied, and the resulting page state is printed.
//!
//! # Usage
//!
//! ```bash
//! export CARTWHEEL_BASE_URL=https://shop.example.com
//!
//! cartwheel products
//! cartwheel add mug-blue
//! cartwheel inc mug-blue
//! cartwheel dec mug-blue
//! cartwheel show
//! cartwheel checkout --notes "Leave at the side door"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use cartwheel_core::ProductId;
use cartwheel_storefront::config::ShopConfig;
use cartwheel_storefront::controller::{CartController, CartEvent};
use cartwheel_storefront::error::{AppError, Result};
use cartwheel_storefront::shop::ShopClient;
use cartwheel_storefront::storage::{FileStorage, KeyValueStore};
use cartwheel_storefront::surface::HeadlessPage;
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cartwheel")]
#[command(author, version, about = "Shop cart page session driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the products in the shop catalog
    Products,
    /// Show the cart
    Show,
    /// Add one unit of a product to the cart
    Add {
        /// Product id
        id: String,
    },
    /// Increase a cart line by one
    Inc {
        /// Product id
        id: String,
    },
    /// Decrease a cart line by one (removes the line at zero)
    Dec {
        /// Product id
        id: String,
    },
    /// Start checkout and print the payment session URL
    Checkout {
        /// Order notes (truncated to 500 UTF-16 units)
        #[arg(short, long, default_value = "")]
        notes: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the tracing subscriber; logs go to stderr so stdout stays the page.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cartwheel_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ShopConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            let err = AppError::from(e);
            err.report();
            return ExitCode::from(err.exit_code());
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing();

    let code = match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::from(e.exit_code())
        }
    };

    // Flushes queued events before the process exits
    drop(sentry_guard);
    code
}

async fn run(cli: Cli, config: ShopConfig) -> Result<()> {
    let storage = FileStorage::open(&config.state_dir)?;
    let client = ShopClient::new(&config);
    let mut page = HeadlessPage::new();

    let mut controller = CartController::start(client, storage, &mut page).await;

    let event = match cli.command {
        Commands::Products => {
            print_products(&controller);
            return Ok(());
        }
        Commands::Show => None,
        Commands::Add { id } => Some(CartEvent::AddToCart(ProductId::new(id))),
        Commands::Inc { id } => Some(CartEvent::Increment(ProductId::new(id))),
        Commands::Dec { id } => Some(CartEvent::Decrement(ProductId::new(id))),
        Commands::Checkout { notes } => Some(CartEvent::Checkout { notes }),
    };

    if let Some(event) = event {
        controller.handle(event, &mut page).await;
    }

    print_cart(&controller, &page);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_products<S: KeyValueStore>(controller: &CartController<S>) {
    let catalog = controller.catalog();
    if catalog.is_empty() {
        println!("No products found.");
        return;
    }

    for product in catalog.all() {
        println!("{:<16} {:>12}  {}", product.id, product.price, product.name);
    }
}

#[allow(clippy::print_stdout)]
fn print_cart<S: KeyValueStore>(controller: &CartController<S>, page: &HeadlessPage) {
    let view = controller.cart_view();

    if view.items.is_empty() {
        println!("Your cart is empty.");
    }
    for item in &view.items {
        println!(
            "{:>4} x {:<32} {:>12}",
            item.quantity, item.name, item.line_price
        );
    }
    println!("Items: {}  Total: {}", page.summary_quantity, page.summary_total);

    for notice in &page.notices {
        println!("! {notice}");
    }
    if let Some(location) = &page.location {
        println!("Checkout: {location}");
    }
}
