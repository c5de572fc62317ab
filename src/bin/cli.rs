use clap::{Parser, Subcommand};

use rocketshop::cart::{Cart, CartTotals};
use rocketshop::config::Config;
use rocketshop::{CatalogSource, Shop};

#[derive(Parser)]
#[command(name = "rocketshop")]
#[command(about = "RocketShop catalog and cart CLI", long_about = None)]
struct Cli {
    /// Catalog source: path to a JSON file or a URL (defaults to the
    /// bundled catalog)
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all catalog products
    Products,
    /// Show full details for one product
    Show {
        /// Product id to show
        product_id: u64,
    },
    /// Search the catalog
    Search {
        /// Free-text query over titles and descriptions
        query: Option<String>,
        /// Exact category filter
        #[arg(short, long)]
        category: Option<String>,
        /// Minimum rating in [0,5]
        #[arg(short = 'r', long)]
        min_rating: Option<f64>,
        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// List the distinct catalog categories
    Categories,
    /// Show the current cart
    Cart,
    /// Add one unit of a product to the cart
    Add {
        /// Product id to add
        product_id: u64,
    },
    /// Remove a product's line from the cart
    Remove {
        /// Product id to remove
        product_id: u64,
    },
    /// Set the quantity of a product already in the cart (0 removes it)
    Set {
        /// Product id to update
        product_id: u64,
        /// Requested quantity; 0 or less removes the line
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart and erase its persisted state
    Clear,
    /// Simulate a purchase: print a receipt and empty the cart
    Checkout,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let source = match cli.catalog.as_deref() {
        Some(s) => CatalogSource::parse(s),
        None => CatalogSource::Bundled,
    };
    let mut shop = Shop::open(Config::from_current_dir()?, &source)?;

    match cli.command {
        Commands::Products => {
            for product in shop.products() {
                println!(
                    "[{}] {} - {:.2} ({})",
                    product.id, product.title, product.price, product.category
                );
            }
        }
        Commands::Show { product_id } => match shop.product(product_id) {
            Some(product) => println!("{}", serde_json::to_string_pretty(product)?),
            None => {
                eprintln!("Product not found: {}", product_id);
                std::process::exit(1);
            }
        },
        Commands::Search {
            query,
            category,
            min_rating,
            limit,
        } => {
            let hits = shop.search_filtered(
                query.as_deref(),
                category.as_deref(),
                min_rating,
                limit,
            )?;
            if hits.is_empty() {
                println!("No results found.");
            } else {
                for product in shop.resolve_hits(&hits) {
                    println!(
                        "[{}] {} - {:.2} ({}, rated {:.1})",
                        product.id,
                        product.title,
                        product.price,
                        product.category,
                        product.rating.rate
                    );
                }
            }
        }
        Commands::Categories => {
            for category in shop.categories() {
                println!("{}", category);
            }
        }
        Commands::Cart => print_cart(shop.cart()),
        Commands::Add { product_id } => {
            let totals = shop.add_to_cart(product_id)?;
            println!("Added product {}.", product_id);
            print_totals(&totals);
        }
        Commands::Remove { product_id } => {
            let totals = shop.remove_from_cart(product_id);
            println!("Removed product {}.", product_id);
            print_totals(&totals);
        }
        Commands::Set {
            product_id,
            quantity,
        } => {
            let totals = shop.set_quantity(product_id, quantity);
            println!("Updated product {}.", product_id);
            print_totals(&totals);
        }
        Commands::Clear => {
            shop.clear_cart();
            println!("Cart cleared.");
        }
        Commands::Checkout => {
            let receipt = shop.checkout()?;
            println!(
                "Order {} confirmed: {} item(s), total {:.2}",
                receipt.order_id, receipt.item_count, receipt.total_price
            );
        }
    }

    Ok(())
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty.");
        return;
    }

    for line in cart.lines() {
        println!(
            "[{}] {} x{} - {:.2}",
            line.product.id,
            line.product.title,
            line.quantity,
            line.subtotal()
        );
    }
    print_totals(&cart.totals());
}

fn print_totals(totals: &CartTotals) {
    println!(
        "Cart total: {} item(s), {:.2}",
        totals.item_count, totals.total_price
    );
}
