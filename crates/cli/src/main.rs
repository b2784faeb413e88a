//! Bistro CLI - terminal front end for the ordering client.
//!
//! # Usage
//!
//! ```bash
//! # Add two burgers with large fries and extra cheese
//! bistro cart add 12 -q 2 --fries large-fries --extra cheese
//!
//! # Show the cart with totals
//! bistro cart show
//!
//! # Change quantity of a line (negative removes servings)
//! bistro cart update 12-1x2k9f-1700000000000 -1
//!
//! # Switch the interface language
//! bistro lang set en
//!
//! # Translate a key with variables
//! bistro t cart.items --var count=3
//! ```
//!
//! # Commands
//!
//! - `cart add|update|remove|clear|show|checkout` - Cart management
//! - `lang set|show` - Interface language
//! - `t` - Translate a key
//! - `menu` - Show the menu in the active language

#![cfg_attr(not(test), forbid(unsafe_code))]

use bistro_storefront::{AppError, Command, Storefront, StorefrontConfig};
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::{CartAction, LangAction};

#[derive(Parser)]
#[command(name = "bistro")]
#[command(author, version, about = "Bistro ordering client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Interface language
    Lang {
        #[command(subcommand)]
        action: LangAction,
    },
    /// Translate a key in the active language
    T {
        /// Dotted key, e.g. `cart.title`
        key: String,

        /// Placeholder value as name=value; repeatable
        #[arg(long = "var", value_parser = commands::parse_variable)]
        vars: Vec<(String, String)>,
    },
    /// Show the menu
    Menu,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration first (needed for Sentry init)
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bistro_storefront=warn,bistro_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(AppError::from(e)),
    };

    if let Err(e) = result {
        e.report();
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), AppError> {
    let mut storefront = Storefront::from_config(config)?;
    storefront.start().await;

    let command = match cli.command {
        Commands::Cart { action } => commands::cart_command(action),
        Commands::Lang {
            action: LangAction::Set { code },
        } => Command::SetLanguage { code },
        Commands::Lang {
            action: LangAction::Show,
        } => {
            print(&render::current_language(storefront.i18n()));
            return Ok(());
        }
        Commands::T { key, vars } => Command::Translate {
            key,
            variables: vars,
        },
        Commands::Menu => Command::ShowMenu,
    };

    let outcome = storefront.dispatch(command).await?;
    print(&render::outcome(
        &outcome,
        storefront.i18n(),
        storefront.currency(),
    ));
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print(text: &str) {
    println!("{text}");
}
