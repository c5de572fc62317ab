use rocketshop::{Shop, SharedShop};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create shared shop over the bundled catalog
    let shop: SharedShop = Shop::open_or_create()?.into_shared();

    // Fill the cart
    {
        let mut shop = shop.write().unwrap();
        shop.add_to_cart(1)?;
        shop.add_to_cart(1)?;
        let totals = shop.add_to_cart(2)?;
        println!(
            "Cart: {} item(s), total {:.2}",
            totals.item_count, totals.total_price
        );
    }

    // Search the catalog
    {
        let shop = shop.read().unwrap();

        let hits = shop.search("backpack", 5)?;
        for product in shop.resolve_hits(&hits) {
            println!("Found [{}] {} ({:.2})", product.id, product.title, product.price);
        }

        println!("Categories: {:?}", shop.categories());
    }

    // Simulated purchase
    {
        let mut shop = shop.write().unwrap();
        let receipt = shop.checkout()?;
        println!(
            "Order {} confirmed: {} item(s), total {:.2}",
            receipt.order_id, receipt.item_count, receipt.total_price
        );
    }

    Ok(())
}
