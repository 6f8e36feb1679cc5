// HTTP handlers for basket endpoints

use axum::{extract::State, Json};

use crate::basket::{BasketError, BasketResponse, ClearRequest, ProductIdRequest};
use crate::buyer::BuyerToken;
use crate::AppState;

/// Handler for GET /api/v1/basket
/// Returns the current basket view for the buyer token
pub async fn get_basket_handler(
    State(state): State<AppState>,
    BuyerToken(token): BuyerToken,
) -> Result<Json<BasketResponse>, BasketError> {
    let basket = state.basket_service.get_basket(token).await?;
    Ok(Json(basket))
}

/// Handler for POST /api/v1/basket/add
/// Adds one unit of the product to the basket
pub async fn add_product_handler(
    State(state): State<AppState>,
    BuyerToken(token): BuyerToken,
    Json(request): Json<ProductIdRequest>,
) -> Result<Json<BasketResponse>, BasketError> {
    let basket = state
        .basket_service
        .add_product(token, request.product_id)
        .await?;

    Ok(Json(basket))
}

/// Handler for POST /api/v1/basket/remove
/// Removes the product's line from the basket
pub async fn remove_product_handler(
    State(state): State<AppState>,
    BuyerToken(token): BuyerToken,
    Json(request): Json<ProductIdRequest>,
) -> Result<Json<BasketResponse>, BasketError> {
    let basket = state
        .basket_service
        .remove_product(token, request.product_id)
        .await?;

    Ok(Json(basket))
}

/// Handler for POST /api/v1/basket/increment
/// Increments the line count; fails with 400 when stock is exceeded
pub async fn increment_product_handler(
    State(state): State<AppState>,
    BuyerToken(token): BuyerToken,
    Json(request): Json<ProductIdRequest>,
) -> Result<Json<BasketResponse>, BasketError> {
    let basket = state
        .basket_service
        .increment_product(token, request.product_id)
        .await?;

    Ok(Json(basket))
}

/// Handler for POST /api/v1/basket/decrement
/// Decrements the line count; the line is removed at zero
pub async fn decrement_product_handler(
    State(state): State<AppState>,
    BuyerToken(token): BuyerToken,
    Json(request): Json<ProductIdRequest>,
) -> Result<Json<BasketResponse>, BasketError> {
    let basket = state
        .basket_service
        .decrement_product(token, request.product_id)
        .await?;

    Ok(Json(basket))
}

/// Handler for POST /api/v1/basket/clear
/// The body is optional; a date in `delivery_basket` clears only that bucket
pub async fn clear_basket_handler(
    State(state): State<AppState>,
    BuyerToken(token): BuyerToken,
    request: Option<Json<ClearRequest>>,
) -> Result<Json<BasketResponse>, BasketError> {
    let bucket_date = request.and_then(|Json(request)| request.delivery_basket);
    let basket = state.basket_service.clear_basket(token, bucket_date).await?;

    Ok(Json(basket))
}
