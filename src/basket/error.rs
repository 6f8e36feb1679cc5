use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for basket operations
#[derive(Debug, thiserror::Error)]
pub enum BasketError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Product not found: {0}")]
    ProductNotFound(i32),

    #[error("Product is not in the basket: {0}")]
    ProductNotInBasket(i32),

    #[error("Not enough stock for product {product_id}: {stock} available")]
    InsufficientStock { product_id: i32, stock: i32 },
}

impl From<sqlx::Error> for BasketError {
    fn from(err: sqlx::Error) -> Self {
        BasketError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for BasketError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            BasketError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            BasketError::ProductNotFound(id) => (
                StatusCode::BAD_REQUEST,
                format!("Product with id {} not found", id),
            ),
            BasketError::ProductNotInBasket(id) => (
                StatusCode::BAD_REQUEST,
                format!("Product with id {} is not in the basket", id),
            ),
            BasketError::InsufficientStock { product_id, stock } => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Not enough stock for product {}: {} available",
                    product_id, stock
                ),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
