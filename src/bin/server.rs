use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use rocketshop::error::ShopError;
use rocketshop::{CatalogSource, Product, Shop, SharedShop};

// === API Documentation ===

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        get_product,
        search,
        get_cart,
        add_cart_item,
        update_cart_item,
        remove_cart_item,
        clear_cart,
        checkout,
    ),
    components(
        schemas(
            ProductResponse,
            RatingResponse,
            ProductListResponse,
            SearchParams,
            SearchResponse,
            SearchHitResponse,
            CartResponse,
            CartLineResponse,
            AddItemRequest,
            UpdateQuantityRequest,
            ReceiptResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "catalog", description = "Product catalog endpoints"),
        (name = "search", description = "Catalog search endpoints"),
        (name = "cart", description = "Shopping cart endpoints")
    )
)]
struct ApiDoc;

// === Request/Response Types ===

#[derive(Debug, Serialize, ToSchema)]
struct RatingResponse {
    /// Aggregate score in [0,5]
    rate: f64,
    /// Number of reviews behind the score
    count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
struct ProductResponse {
    /// Unique product identifier
    id: u64,
    title: String,
    price: f64,
    description: String,
    category: String,
    /// Product image URI
    image: String,
    rating: RatingResponse,
}

#[derive(Debug, Serialize, ToSchema)]
struct ProductListResponse {
    /// All catalog products in catalog order
    products: Vec<ProductResponse>,
    /// Total product count
    count: usize,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
struct SearchParams {
    /// Free-text query over product titles and descriptions
    q: Option<String>,
    /// Exact category filter
    category: Option<String>,
    /// Minimum rating in [0,5]
    min_rating: Option<f64>,
    /// Maximum number of results (default: 10)
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Serialize, ToSchema)]
struct SearchResponse {
    /// Search results, best match first
    hits: Vec<SearchHitResponse>,
    /// Total number of hits returned
    count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
struct SearchHitResponse {
    /// Relevance score
    score: f32,
    product: ProductResponse,
}

#[derive(Debug, Serialize, ToSchema)]
struct CartLineResponse {
    product: ProductResponse,
    /// Units of this product in the cart
    quantity: u32,
    /// Unit price times quantity
    subtotal: f64,
}

#[derive(Debug, Serialize, ToSchema)]
struct CartResponse {
    /// Cart lines in insertion order
    lines: Vec<CartLineResponse>,
    /// Sum of quantities across all lines
    item_count: u32,
    /// Sum of price times quantity across all lines
    total_price: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
struct AddItemRequest {
    /// Catalog id of the product to add
    product_id: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
struct UpdateQuantityRequest {
    /// Requested quantity; clamped to a floor of 0, and 0 removes the line
    quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
struct ReceiptResponse {
    /// Identifier of the simulated order
    order_id: String,
    item_count: u32,
    total_price: f64,
}

#[derive(Debug, Serialize, ToSchema)]
struct ErrorResponse {
    /// Error message
    error: String,
}

// === Helper Functions ===

const NOT_FOUND: &str = "Product not found";
const EMPTY_CART: &str = "Cart is empty";

fn product_response(product: &Product) -> ProductResponse {
    ProductResponse {
        id: product.id,
        title: product.title.clone(),
        price: product.price,
        description: product.description.clone(),
        category: product.category.clone(),
        image: product.image.clone(),
        rating: RatingResponse {
            rate: product.rating.rate,
            count: product.rating.count,
        },
    }
}

fn cart_response(shop: &Shop) -> CartResponse {
    let totals = shop.cart_totals();

    CartResponse {
        lines: shop
            .cart()
            .lines()
            .iter()
            .map(|line| CartLineResponse {
                product: product_response(&line.product),
                quantity: line.quantity,
                subtotal: line.subtotal(),
            })
            .collect(),
        item_count: totals.item_count,
        total_price: totals.total_price,
    }
}

fn internal_error(message: String) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}

// === Handlers ===

/// List all catalog products
#[utoipa::path(
    get,
    path = "/products",
    tag = "catalog",
    responses(
        (status = 200, description = "All catalog products", body = ProductListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn list_products(State(shop): State<SharedShop>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let shop = shop.read().map_err(|e| format!("Lock error: {}", e))?;
        Ok::<_, String>(shop.products().iter().map(product_response).collect::<Vec<_>>())
    })
    .await;

    match result {
        Ok(Ok(products)) => {
            let count = products.len();
            (StatusCode::OK, Json(ProductListResponse { products, count })).into_response()
        }
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(format!("Task join error: {}", e)),
    }
}

/// Get full details for one product
#[utoipa::path(
    get,
    path = "/products/{product_id}",
    tag = "catalog",
    params(
        ("product_id" = u64, Path, description = "The product id")
    ),
    responses(
        (status = 200, description = "Product details", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn get_product(
    State(shop): State<SharedShop>,
    Path(product_id): Path<u64>,
) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let shop = shop.read().map_err(|e| format!("Lock error: {}", e))?;
        Ok::<_, String>(shop.product(product_id).map(product_response))
    })
    .await;

    match result {
        Ok(Ok(Some(product))) => (StatusCode::OK, Json(product)).into_response(),
        Ok(Ok(None)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: NOT_FOUND.to_string(),
            }),
        )
            .into_response(),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(format!("Task join error: {}", e)),
    }
}

/// Search the catalog by text, category and minimum rating
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    params(
        SearchParams
    ),
    responses(
        (status = 200, description = "Search results", body = SearchResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn search(
    State(shop): State<SharedShop>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let shop = shop.read().map_err(|e| format!("Lock error: {}", e))?;
        let hits = shop
            .search_filtered(
                params.q.as_deref(),
                params.category.as_deref(),
                params.min_rating,
                params.limit,
            )
            .map_err(|e| format!("Search failed: {}", e))?;

        Ok::<_, String>(
            hits.iter()
                .filter_map(|hit| {
                    shop.product(hit.product_id).map(|product| SearchHitResponse {
                        score: hit.score,
                        product: product_response(product),
                    })
                })
                .collect::<Vec<_>>(),
        )
    })
    .await;

    match result {
        Ok(Ok(hits)) => {
            let response = SearchResponse {
                count: hits.len(),
                hits,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(Err(e)) => {
            if e.contains("parse") || e.contains("Parse") {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })).into_response()
            } else {
                internal_error(e)
            }
        }
        Err(e) => internal_error(format!("Task join error: {}", e)),
    }
}

/// Show the current cart
#[utoipa::path(
    get,
    path = "/cart",
    tag = "cart",
    responses(
        (status = 200, description = "Current cart lines and totals", body = CartResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn get_cart(State(shop): State<SharedShop>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let shop = shop.read().map_err(|e| format!("Lock error: {}", e))?;
        Ok::<_, String>(cart_response(&shop))
    })
    .await;

    match result {
        Ok(Ok(cart)) => (StatusCode::OK, Json(cart)).into_response(),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(format!("Task join error: {}", e)),
    }
}

/// Add one unit of a product to the cart
#[utoipa::path(
    post,
    path = "/cart/items",
    tag = "cart",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn add_cart_item(
    State(shop): State<SharedShop>,
    Json(req): Json<AddItemRequest>,
) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let mut shop = shop.write().map_err(|e| format!("Lock error: {}", e))?;

        match shop.add_to_cart(req.product_id) {
            Ok(_) => Ok(cart_response(&shop)),
            Err(ShopError::ProductNotFound(_)) => Err(NOT_FOUND.to_string()),
            Err(e) => Err(format!("Failed to add to cart: {}", e)),
        }
    })
    .await;

    match result {
        Ok(Ok(cart)) => (StatusCode::OK, Json(cart)).into_response(),
        Ok(Err(e)) if e == NOT_FOUND => {
            (StatusCode::NOT_FOUND, Json(ErrorResponse { error: e })).into_response()
        }
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(format!("Task join error: {}", e)),
    }
}

/// Set the quantity of a product already in the cart
#[utoipa::path(
    put,
    path = "/cart/items/{product_id}",
    tag = "cart",
    params(
        ("product_id" = u64, Path, description = "The product id to update")
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn update_cart_item(
    State(shop): State<SharedShop>,
    Path(product_id): Path<u64>,
    Json(req): Json<UpdateQuantityRequest>,
) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let mut shop = shop.write().map_err(|e| format!("Lock error: {}", e))?;
        shop.set_quantity(product_id, req.quantity);
        Ok::<_, String>(cart_response(&shop))
    })
    .await;

    match result {
        Ok(Ok(cart)) => (StatusCode::OK, Json(cart)).into_response(),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(format!("Task join error: {}", e)),
    }
}

/// Remove a product's line from the cart
#[utoipa::path(
    delete,
    path = "/cart/items/{product_id}",
    tag = "cart",
    params(
        ("product_id" = u64, Path, description = "The product id to remove")
    ),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn remove_cart_item(
    State(shop): State<SharedShop>,
    Path(product_id): Path<u64>,
) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let mut shop = shop.write().map_err(|e| format!("Lock error: {}", e))?;
        shop.remove_from_cart(product_id);
        Ok::<_, String>(cart_response(&shop))
    })
    .await;

    match result {
        Ok(Ok(cart)) => (StatusCode::OK, Json(cart)).into_response(),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(format!("Task join error: {}", e)),
    }
}

/// Empty the cart and erase its persisted state
#[utoipa::path(
    delete,
    path = "/cart",
    tag = "cart",
    responses(
        (status = 204, description = "Cart cleared"),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn clear_cart(State(shop): State<SharedShop>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let mut shop = shop.write().map_err(|e| format!("Lock error: {}", e))?;
        shop.clear_cart();
        Ok::<_, String>(())
    })
    .await;

    match result {
        Ok(Ok(())) => StatusCode::NO_CONTENT.into_response(),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(format!("Task join error: {}", e)),
    }
}

/// Simulate a purchase: clear the cart and return a receipt
#[utoipa::path(
    post,
    path = "/cart/checkout",
    tag = "cart",
    responses(
        (status = 200, description = "Order receipt", body = ReceiptResponse),
        (status = 409, description = "Cart is empty", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
async fn checkout(State(shop): State<SharedShop>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || {
        let mut shop = shop.write().map_err(|e| format!("Lock error: {}", e))?;

        match shop.checkout() {
            Ok(receipt) => Ok(ReceiptResponse {
                order_id: receipt.order_id,
                item_count: receipt.item_count,
                total_price: receipt.total_price,
            }),
            Err(ShopError::EmptyCart) => Err(EMPTY_CART.to_string()),
            Err(e) => Err(format!("Checkout failed: {}", e)),
        }
    })
    .await;

    match result {
        Ok(Ok(receipt)) => (StatusCode::OK, Json(receipt)).into_response(),
        Ok(Err(e)) if e == EMPTY_CART => {
            (StatusCode::CONFLICT, Json(ErrorResponse { error: e })).into_response()
        }
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(format!("Task join error: {}", e)),
    }
}

// === Main ===

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000u16);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());

    // Override the bundled catalog with CATALOG=<path or URL>
    let source = match std::env::var("CATALOG") {
        Ok(s) => CatalogSource::parse(&s),
        Err(_) => CatalogSource::Bundled,
    };

    info!("Initializing RocketShop...");
    let shop = Shop::open(rocketshop::config::Config::from_current_dir()?, &source)?;
    info!("Serving {} products", shop.product_count());

    let shared_shop: SharedShop = shop.into_shared();

    let swagger = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    let app = Router::new()
        .merge(swagger)
        .route("/", get(|| async { Redirect::permanent("/swagger-ui") }))
        .route("/products", get(list_products))
        .route("/products/{product_id}", get(get_product))
        .route("/search", get(search))
        .route("/cart", get(get_cart))
        .route("/cart", delete(clear_cart))
        .route("/cart/items", post(add_cart_item))
        .route("/cart/items/{product_id}", put(update_cart_item))
        .route("/cart/items/{product_id}", delete(remove_cart_item))
        .route("/cart/checkout", post(checkout))
        .with_state(shared_shop)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    info!("Server running at http://{}:{}", bind_addr, port);
    info!(
        "Swagger UI available at http://{}:{}/swagger-ui/",
        bind_addr, port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
