use sqlx::PgPool;

use crate::basket::error::BasketError;
use crate::basket::models::{Basket, BasketLine};
use crate::models::{DeliveryType, Product};

/// Repository for product lookups used by basket operations
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new ProductRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a product by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Product>, BasketError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, title, slug, price, price_discount, weight, delivery_schedule, \
             preorder_date, stock, created_at, updated_at FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Find multiple products by IDs
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Product>, BasketError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, title, slug, price, price_discount, weight, delivery_schedule, \
             preorder_date, stock, created_at, updated_at FROM products WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

/// Repository for basket rows
#[derive(Clone)]
pub struct BasketRepository {
    pool: PgPool,
}

impl BasketRepository {
    /// Create a new BasketRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a basket by its buyer token
    pub async fn find_by_token(&self, token: &str) -> Result<Option<Basket>, BasketError> {
        let basket =
            sqlx::query_as::<_, Basket>("SELECT id, token FROM baskets WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        Ok(basket)
    }

    /// Create a basket for the given token
    pub async fn create(&self, token: &str) -> Result<Basket, BasketError> {
        let basket = sqlx::query_as::<_, Basket>(
            "INSERT INTO baskets (token) VALUES ($1) RETURNING id, token",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await?;

        Ok(basket)
    }

    /// Find the basket for a token, creating it when absent
    pub async fn find_or_create(&self, token: &str) -> Result<Basket, BasketError> {
        if let Some(basket) = self.find_by_token(token).await? {
            return Ok(basket);
        }

        self.create(token).await
    }
}

/// Repository for basket line operations
#[derive(Clone)]
pub struct LineRepository {
    pool: PgPool,
}

impl LineRepository {
    /// Create a new LineRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the line for a (basket, product) pair
    pub async fn find(
        &self,
        basket_id: i32,
        product_id: i32,
    ) -> Result<Option<BasketLine>, BasketError> {
        let line = sqlx::query_as::<_, BasketLine>(
            "SELECT id, basket_id, product_id, count FROM basket_product \
             WHERE basket_id = $1 AND product_id = $2",
        )
        .bind(basket_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(line)
    }

    /// All lines of a basket in insertion order
    pub async fn find_by_basket(&self, basket_id: i32) -> Result<Vec<BasketLine>, BasketError> {
        let lines = sqlx::query_as::<_, BasketLine>(
            "SELECT id, basket_id, product_id, count FROM basket_product \
             WHERE basket_id = $1 ORDER BY id",
        )
        .bind(basket_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Insert a new line
    pub async fn insert(
        &self,
        basket_id: i32,
        product_id: i32,
        count: i32,
    ) -> Result<(), BasketError> {
        sqlx::query("INSERT INTO basket_product (basket_id, product_id, count) VALUES ($1, $2, $3)")
            .bind(basket_id)
            .bind(product_id)
            .bind(count)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Set the count of an existing line
    pub async fn set_count(&self, line_id: i32, count: i32) -> Result<(), BasketError> {
        sqlx::query("UPDATE basket_product SET count = $1 WHERE id = $2")
            .bind(count)
            .bind(line_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a single line
    pub async fn delete(&self, line_id: i32) -> Result<(), BasketError> {
        sqlx::query("DELETE FROM basket_product WHERE id = $1")
            .bind(line_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a set of lines
    pub async fn delete_many(&self, line_ids: &[i32]) -> Result<(), BasketError> {
        if line_ids.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM basket_product WHERE id = ANY($1)")
            .bind(line_ids)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete every line of a basket
    pub async fn delete_by_basket(&self, basket_id: i32) -> Result<(), BasketError> {
        sqlx::query("DELETE FROM basket_product WHERE basket_id = $1")
            .bind(basket_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Repository for delivery type rows
#[derive(Clone)]
pub struct DeliveryTypeRepository {
    pool: PgPool,
}

impl DeliveryTypeRepository {
    /// Create a new DeliveryTypeRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All configured delivery types
    pub async fn find_all(&self) -> Result<Vec<DeliveryType>, BasketError> {
        let delivery_types = sqlx::query_as::<_, DeliveryType>(
            "SELECT id, title, price, by_preorder FROM delivery_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(delivery_types)
    }
}
