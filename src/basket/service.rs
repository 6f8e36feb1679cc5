use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::basket::delivery_baskets::{self, BucketKey};
use crate::basket::error::BasketError;
use crate::basket::models::{Basket, BasketLine, BasketResponse};
use crate::basket::pricing::{self, PricedLine};
use crate::basket::repository::{
    BasketRepository, DeliveryTypeRepository, LineRepository, ProductRepository,
};
use crate::buyer;
use crate::models::Product;

/// Service for basket business logic
///
/// Every operation applies its line delta and then rebuilds the whole view:
/// totals and bucket membership are recomputed from scratch on each call.
#[derive(Clone)]
pub struct BasketService {
    baskets: BasketRepository,
    lines: LineRepository,
    products: ProductRepository,
    delivery_types: DeliveryTypeRepository,
}

impl BasketService {
    /// Create a new BasketService
    pub fn new(
        baskets: BasketRepository,
        lines: LineRepository,
        products: ProductRepository,
        delivery_types: DeliveryTypeRepository,
    ) -> Self {
        Self {
            baskets,
            lines,
            products,
            delivery_types,
        }
    }

    /// Current basket view
    ///
    /// Reads never create a basket; without a token (or with an unknown one)
    /// the empty view is returned.
    pub async fn get_basket(&self, token: Option<String>) -> Result<BasketResponse, BasketError> {
        let basket = match &token {
            Some(token) => self.baskets.find_by_token(token).await?,
            None => None,
        };

        match basket {
            Some(basket) => self.build_response(&basket, token).await,
            None => Ok(BasketResponse::empty(token)),
        }
    }

    /// Add one unit of a product
    ///
    /// Creates the line with count 1, or increments an existing line
    /// (stock-checked). Products with no delivery option are skipped.
    pub async fn add_product(
        &self,
        token: Option<String>,
        product_id: i32,
    ) -> Result<BasketResponse, BasketError> {
        let (basket, token) = self.resolve_basket(token).await?;
        let product = self.require_product(product_id).await?;

        if delivery_baskets::bucket_key(&product, today()).is_none() {
            tracing::debug!(
                "Product {} has no delivery schedule or preorder date, skipping add",
                product_id
            );
            return self.build_response(&basket, Some(token)).await;
        }

        match self.lines.find(basket.id, product_id).await? {
            Some(line) => self.checked_set_count(&line, &product, line.count + 1).await?,
            None => self.lines.insert(basket.id, product_id, 1).await?,
        }

        tracing::debug!("Added product {} to basket {}", product_id, basket.id);
        self.build_response(&basket, Some(token)).await
    }

    /// Remove a product's line entirely
    pub async fn remove_product(
        &self,
        token: Option<String>,
        product_id: i32,
    ) -> Result<BasketResponse, BasketError> {
        let (basket, token) = self.resolve_basket(token).await?;
        let line = self.require_line(&basket, product_id).await?;

        self.lines.delete(line.id).await?;

        tracing::debug!("Removed product {} from basket {}", product_id, basket.id);
        self.build_response(&basket, Some(token)).await
    }

    /// Increment a line's count by one
    ///
    /// Rejected when the new count would exceed the product's stock; the
    /// stored count is left unchanged.
    pub async fn increment_product(
        &self,
        token: Option<String>,
        product_id: i32,
    ) -> Result<BasketResponse, BasketError> {
        let (basket, token) = self.resolve_basket(token).await?;
        let product = self.require_product(product_id).await?;
        let line = self.require_line(&basket, product_id).await?;

        self.checked_set_count(&line, &product, line.count + 1).await?;

        self.build_response(&basket, Some(token)).await
    }

    /// Decrement a line's count by one; the line is deleted at zero
    pub async fn decrement_product(
        &self,
        token: Option<String>,
        product_id: i32,
    ) -> Result<BasketResponse, BasketError> {
        let (basket, token) = self.resolve_basket(token).await?;
        let line = self.require_line(&basket, product_id).await?;

        if line.count <= 1 {
            self.lines.delete(line.id).await?;
        } else {
            self.lines.set_count(line.id, line.count - 1).await?;
        }

        self.build_response(&basket, Some(token)).await
    }

    /// Clear the basket
    ///
    /// With a bucket date, only lines whose computed delivery date equals it
    /// are removed; other delivery baskets stay intact.
    pub async fn clear_basket(
        &self,
        token: Option<String>,
        bucket_date: Option<NaiveDate>,
    ) -> Result<BasketResponse, BasketError> {
        let (basket, token) = self.resolve_basket(token).await?;

        match bucket_date {
            None => {
                self.lines.delete_by_basket(basket.id).await?;
                tracing::debug!("Cleared basket {}", basket.id);
            }
            Some(date) => {
                let lines = self.lines.find_by_basket(basket.id).await?;
                let products = self.load_products(&lines).await?;
                let today = today();

                let doomed: Vec<i32> = lines
                    .iter()
                    .filter(|line| {
                        products
                            .get(&line.product_id)
                            .and_then(|product| delivery_baskets::bucket_key(product, today))
                            .map_or(false, |(bucket_date, _)| bucket_date == date)
                    })
                    .map(|line| line.id)
                    .collect();

                self.lines.delete_many(&doomed).await?;
                tracing::debug!(
                    "Cleared {} lines of basket {} for delivery date {}",
                    doomed.len(),
                    basket.id,
                    date
                );
            }
        }

        self.build_response(&basket, Some(token)).await
    }

    /// Resolve the token to a basket, minting a token and creating the
    /// basket row when needed
    async fn resolve_basket(&self, token: Option<String>) -> Result<(Basket, String), BasketError> {
        let token = token.unwrap_or_else(buyer::issue_token);
        let basket = self.baskets.find_or_create(&token).await?;
        Ok((basket, token))
    }

    async fn require_product(&self, product_id: i32) -> Result<Product, BasketError> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or(BasketError::ProductNotFound(product_id))
    }

    async fn require_line(
        &self,
        basket: &Basket,
        product_id: i32,
    ) -> Result<BasketLine, BasketError> {
        self.lines
            .find(basket.id, product_id)
            .await?
            .ok_or(BasketError::ProductNotInBasket(product_id))
    }

    /// Update a line's count, enforcing the stock limit
    async fn checked_set_count(
        &self,
        line: &BasketLine,
        product: &Product,
        new_count: i32,
    ) -> Result<(), BasketError> {
        if new_count > product.stock {
            return Err(BasketError::InsufficientStock {
                product_id: product.id,
                stock: product.stock,
            });
        }

        self.lines.set_count(line.id, new_count).await
    }

    async fn load_products(
        &self,
        lines: &[BasketLine],
    ) -> Result<HashMap<i32, Product>, BasketError> {
        let ids: Vec<i32> = lines.iter().map(|line| line.product_id).collect();
        let products = self.products.find_by_ids(&ids).await?;

        Ok(products
            .into_iter()
            .map(|product| (product.id, product))
            .collect())
    }

    /// Rebuild the full basket view from the stored lines
    async fn build_response(
        &self,
        basket: &Basket,
        token: Option<String>,
    ) -> Result<BasketResponse, BasketError> {
        let lines = self.lines.find_by_basket(basket.id).await?;
        if lines.is_empty() {
            return Ok(BasketResponse::empty(token));
        }

        let products = self.load_products(&lines).await?;
        let delivery_types = self.delivery_types.find_all().await?;
        let delivery_price = |by_preorder: bool| {
            delivery_types
                .iter()
                .find(|delivery_type| delivery_type.by_preorder == by_preorder)
                .map(|delivery_type| delivery_type.price)
                .unwrap_or(Decimal::ZERO)
        };

        let today = today();
        let mut priced: Vec<(BucketKey, PricedLine)> = Vec::new();
        for line in &lines {
            let product = match products.get(&line.product_id) {
                Some(product) => product,
                None => continue,
            };
            let key = match delivery_baskets::bucket_key(product, today) {
                Some(key) => key,
                None => continue,
            };
            priced.push((key, pricing::price_line(product, line.count)));
        }

        let baskets = delivery_baskets::group_into_baskets(priced, delivery_price);
        let total = baskets.iter().map(|bucket| bucket.total).sum();
        let total_prev = baskets.iter().map(|bucket| bucket.total_prev).sum();

        Ok(BasketResponse {
            token,
            total,
            total_prev,
            delivery_baskets: baskets,
        })
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
