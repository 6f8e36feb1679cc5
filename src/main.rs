mod basket;
mod buyer;
mod db;
mod delivery;
mod error;
mod models;
mod query;
mod validation;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use basket::{
    BasketRepository, BasketService, DeliveryTypeRepository, LineRepository, ProductRepository,
};
use error::ApiError;
use models::{CreateProduct, DeliveryType, Product};
use query::{QueryParams, QueryValidator};
use validator::Validate;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        create_product,
        get_products,
        get_product_by_id,
        delete_product,
    ),
    components(
        schemas(Product, CreateProduct, DeliveryType)
    ),
    tags(
        (name = "products", description = "Product catalog endpoints")
    ),
    info(
        title = "Basket API",
        version = "1.0.0",
        description = "Storefront shopping basket and product catalog API"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub basket_service: BasketService,
}

/// Handler for POST /api/v1/products
/// Creates a new product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Duplicate product slug"),
        (status = 500, description = "Internal server error")
    ),
    tag = "products"
)]
async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    tracing::debug!("Creating new product: {}", payload.slug);

    // Validate the request using validator crate
    payload.validate()?;

    // Check for duplicate slug
    if db::check_duplicate_slug(&state.db, &payload.slug).await? {
        tracing::warn!("Attempt to create duplicate product slug: {}", payload.slug);
        return Err(ApiError::Conflict {
            message: format!("Product with slug '{}' already exists", payload.slug),
        });
    }

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (title, slug, price, price_discount, weight,
                              delivery_schedule, preorder_date, stock)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, title, slug, price, price_discount, weight,
                  delivery_schedule, preorder_date, stock, created_at, updated_at
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.slug)
    .bind(payload.price)
    .bind(payload.price_discount)
    .bind(payload.weight)
    .bind(&payload.delivery_schedule)
    .bind(payload.preorder_date)
    .bind(payload.stock)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Successfully created product with id: {}", product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

/// Handler for GET /api/v1/products
/// Catalog listing with search, filtering, sorting, and pagination
#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses(
        (status = 200, description = "List of products", body = Vec<Product>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "products"
)]
async fn get_products(
    Query(params): Query<QueryParams>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    tracing::debug!("Fetching products with query parameters: {:?}", params);

    let validated = QueryValidator::validate(params)
        .map_err(|_e| ApiError::ValidationError(validator::ValidationErrors::new()))?;

    let mut builder = query::CatalogQueryBuilder::new();

    if let Some(search) = validated.search {
        builder.add_search_filter(&search);
    }
    builder.add_price_range(validated.min_price, validated.max_price);

    if let Some(sort_field) = validated.sort_field {
        builder.set_sort(sort_field, validated.sort_order);
    }

    builder.set_pagination(validated.page, validated.limit);

    let (query_str, params) = builder.build();

    let mut query = sqlx::query_as::<_, Product>(&query_str);
    for param in params {
        query = query.bind(param);
    }

    let products = query.fetch_all(&state.db).await?;

    tracing::debug!("Query returned {} products", products.len());
    Ok(Json(products))
}

/// Handler for GET /api/v1/products/:id
/// Retrieves a specific product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "products"
)]
async fn get_product_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, ApiError> {
    tracing::debug!("Fetching product with id: {}", id);

    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, title, slug, price, price_discount, weight,
               delivery_schedule, preorder_date, stock, created_at, updated_at
        FROM products
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| {
        tracing::debug!("Product with id {} not found", id);
        ApiError::NotFound {
            resource: "Product".to_string(),
            id: id.to_string(),
        }
    })?;

    tracing::debug!("Successfully retrieved product: {}", product.slug);
    Ok(Json(product))
}

/// Handler for DELETE /api/v1/products/:id
/// Deletes a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "products"
)]
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("Deleting product with id: {}", id);

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        tracing::debug!("Product with id {} not found for deletion", id);
        return Err(ApiError::NotFound {
            resource: "Product".to_string(),
            id: id.to_string(),
        });
    }

    tracing::info!("Successfully deleted product with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(db: PgPool) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let basket_service = BasketService::new(
        BasketRepository::new(db.clone()),
        LineRepository::new(db.clone()),
        ProductRepository::new(db.clone()),
        DeliveryTypeRepository::new(db.clone()),
    );
    let state = AppState { db, basket_service };

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Catalog routes
        .route("/api/v1/products", post(create_product))
        .route("/api/v1/products", get(get_products))
        .route("/api/v1/products/:id", get(get_product_by_id))
        .route("/api/v1/products/:id", delete(delete_product))
        // Basket routes
        .route("/api/v1/basket", get(basket::get_basket_handler))
        .route("/api/v1/basket/add", post(basket::add_product_handler))
        .route("/api/v1/basket/remove", post(basket::remove_product_handler))
        .route(
            "/api/v1/basket/increment",
            post(basket::increment_product_handler),
        )
        .route(
            "/api/v1/basket/decrement",
            post(basket::decrement_product_handler),
        )
        .route("/api/v1/basket/clear", post(basket::clear_basket_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Basket API - Starting...");

    // Get configuration from environment variables
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Create the application router
    let app = create_router(db_pool);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Basket API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests;
