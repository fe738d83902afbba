//! Yasira CLI - shop against the storefront state from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Put two of product 1 in the cart, in a specific shade
//! yasira cart add 1 --quantity 2 --color "Ruby Red"
//!
//! # Save product 3 for later, or queue it for comparison
//! yasira wishlist toggle 3
//! yasira compare add 3
//!
//! # Sign in with a demo account and check out
//! yasira account login user@yasira.com --password user123
//! yasira checkout summary
//! yasira checkout place
//! ```
//!
//! # Commands
//!
//! - `catalog` - Search the catalog or list it with filters and a sort order
//! - `cart` - Add, remove, update, clear and show cart lines
//! - `wishlist` - Add, remove, toggle, clear and show saved products
//! - `compare` - Add, remove, toggle, clear and show compared products
//! - `checkout` - Show the order summary or place the order
//! - `account` - Sign in (password or Google), register, edit the profile,
//!   sign out, show the current user
//! - `reset` - Delete all saved state
//!
//! State is read from and written to `YASIRA_STATE_DIR` on every run, so
//! consecutive invocations see each other's changes.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yasira_core::ProductId;
use yasira_storefront::{CatalogQuery, CatalogSort, QUICK_SEARCH_LIMIT};

mod commands;

#[derive(Parser)]
#[command(name = "yasira")]
#[command(author, version, about = "Yasira storefront cart, wishlist and compare tools")]
struct Cli {
    /// Override `YASIRA_STATE_DIR`
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Override `YASIRA_CATALOG_PATH`
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Manage the compare list
    Compare {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Review and place the order
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
    /// Sign in and out
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Delete all saved state
    Reset,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Find products by name, brand or category
    Search {
        /// Text to look for
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = QUICK_SEARCH_LIMIT)]
        limit: usize,
    },
    /// List products matching every given filter
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Lowest unit price
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Highest unit price
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Only these brands (repeatable)
        #[arg(short, long)]
        brand: Vec<String>,

        /// featured, price-low, price-high, newest or name
        #[arg(long, default_value = "featured")]
        sort: CatalogSort,
    },
}

/// Color and size picked on the product page.
#[derive(Args, Debug, Clone, Default)]
struct VariantArgs {
    /// Selected color
    #[arg(short, long)]
    color: Option<String>,

    /// Selected size
    #[arg(short, long)]
    size: Option<String>,
}

impl VariantArgs {
    const fn is_empty(&self) -> bool {
        self.color.is_none() && self.size.is_none()
    }
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product, merging with an existing line of the same variant
    Add {
        /// Catalog product ID
        product_id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[command(flatten)]
        variant: VariantArgs,
    },
    /// Remove a product (every variant unless one is given)
    Remove {
        /// Catalog product ID
        product_id: ProductId,

        #[command(flatten)]
        variant: VariantArgs,
    },
    /// Set a quantity; 0 removes (every variant unless one is given)
    Update {
        /// Catalog product ID
        product_id: ProductId,

        /// New quantity
        quantity: u32,

        #[command(flatten)]
        variant: VariantArgs,
    },
    /// Empty the cart
    Clear,
    /// List lines and totals
    Show,
}

#[derive(Subcommand)]
enum ListAction {
    /// Add a product
    Add {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Remove a product
    Remove {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Add the product if absent, remove it if present
    Toggle {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Remove every product
    Clear,
    /// List products
    Show,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Show subtotal, shipping, tax and total
    Summary,
    /// Place the order and empty the cart
    Place,
}

#[derive(Subcommand)]
enum AccountAction {
    /// Sign in with email and password
    Login {
        /// Account email
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign in with the simulated Google account
    Google,
    /// Create an account and sign in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        email: String,
    },
    /// Change the signed-in profile
    Update {
        /// New display name
        #[arg(short, long)]
        name: Option<String>,

        /// New email
        #[arg(short, long)]
        email: Option<String>,

        /// New avatar URL
        #[arg(short, long)]
        avatar: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "yasira_cli=info,yasira_storefront=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = commands::Context::load(cli.state_dir, cli.catalog, cli.json)?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Search { query, limit } => {
                commands::catalog::search(&mut ctx, &query, Some(limit))?;
            }
            CatalogAction::List {
                category,
                min_price,
                max_price,
                brand,
                sort,
            } => {
                let price_range = (min_price.is_some() || max_price.is_some()).then(|| {
                    min_price.unwrap_or(Decimal::ZERO)..=max_price.unwrap_or(Decimal::MAX)
                });
                let query = CatalogQuery {
                    category,
                    price_range,
                    brands: brand,
                    sort,
                };
                commands::catalog::list(&mut ctx, &query)?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Add {
                product_id,
                quantity,
                variant,
            } => commands::cart::add(&mut ctx, product_id, quantity, variant.color, variant.size)?,
            CartAction::Remove {
                product_id,
                variant,
            } => {
                let scoped = (!variant.is_empty()).then_some((variant.color, variant.size));
                commands::cart::remove(&mut ctx, product_id, scoped);
            }
            CartAction::Update {
                product_id,
                quantity,
                variant,
            } => {
                let scoped = (!variant.is_empty()).then_some((variant.color, variant.size));
                commands::cart::update(&mut ctx, product_id, quantity, scoped)?;
            }
            CartAction::Clear => commands::cart::clear(&mut ctx),
            CartAction::Show => commands::cart::show(&ctx)?,
        },
        Commands::Wishlist { action } => {
            run_list(&mut ctx, commands::lists::ListKind::Wishlist, action)?;
        }
        Commands::Compare { action } => {
            run_list(&mut ctx, commands::lists::ListKind::Compare, action)?;
        }
        Commands::Checkout { action } => match action {
            CheckoutAction::Summary => commands::checkout::summary(&ctx)?,
            CheckoutAction::Place => commands::checkout::place(&mut ctx)?,
        },
        Commands::Account { action } => match action {
            AccountAction::Login { email, password } => {
                commands::account::login(&mut ctx, &email, &password)?;
            }
            AccountAction::Google => commands::account::google(&mut ctx)?,
            AccountAction::Register { name, email } => {
                commands::account::register(&mut ctx, &name, &email)?;
            }
            AccountAction::Update {
                name,
                email,
                avatar,
            } => {
                let update = yasira_storefront::UserProfileUpdate {
                    name,
                    email,
                    avatar,
                };
                commands::account::update(&mut ctx, update)?;
            }
            AccountAction::Logout => commands::account::logout(&mut ctx),
            AccountAction::Whoami => commands::account::whoami(&ctx)?,
        },
        Commands::Reset => ctx.reset()?,
    }
    Ok(())
}

fn run_list(
    ctx: &mut commands::Context,
    kind: commands::lists::ListKind,
    action: ListAction,
) -> Result<(), commands::CommandError> {
    use commands::lists;

    match action {
        ListAction::Add { product_id } => lists::add(ctx, kind, product_id),
        ListAction::Remove { product_id } => {
            lists::remove(ctx, kind, product_id);
            Ok(())
        }
        ListAction::Toggle { product_id } => lists::toggle(ctx, kind, product_id),
        ListAction::Clear => {
            lists::clear(ctx, kind);
            Ok(())
        }
        ListAction::Show => lists::show(ctx, kind),
    }
}
