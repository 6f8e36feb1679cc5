use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Represents a product in the catalog
///
/// Prices are stored per kilogram for weight-priced products (those with a
/// `weight`) and per piece otherwise. A product is deliverable when it has a
/// weekday `delivery_schedule` or a fixed `preorder_date`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Smoked salmon")]
    pub title: String,
    #[schema(example = "smoked-salmon")]
    pub slug: String,
    /// List price; per kilogram for weight-priced products
    #[schema(example = 850)]
    pub price: Decimal,
    /// Discounted price; same unit as `price`
    pub price_discount: Option<Decimal>,
    /// Kilograms per unit; absent for piece-priced products
    pub weight: Option<Decimal>,
    /// Lowercase English weekday names, e.g. ["wednesday", "saturday"]
    pub delivery_schedule: Option<Vec<String>>,
    /// Fixed delivery date; presence makes the product preorder-only
    pub preorder_date: Option<NaiveDate>,
    /// Units available for sale
    #[schema(example = 10)]
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents the data needed to create a new product
///
/// Used for POST /api/v1/products requests; id and timestamps are
/// auto-generated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "crate::validation::validate_discount_below_price"))]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    #[schema(example = "Smoked salmon")]
    pub title: String,
    #[validate(length(min = 1, message = "Slug must not be empty"))]
    #[schema(example = "smoked-salmon")]
    pub slug: String,
    #[validate(custom = "crate::validation::validate_positive_price")]
    #[schema(example = 850)]
    pub price: Decimal,
    #[validate(custom = "crate::validation::validate_positive_price")]
    pub price_discount: Option<Decimal>,
    #[validate(custom = "crate::validation::validate_positive_weight")]
    pub weight: Option<Decimal>,
    #[validate(custom = "crate::validation::validate_delivery_schedule")]
    pub delivery_schedule: Option<Vec<String>>,
    pub preorder_date: Option<NaiveDate>,
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    #[schema(example = 10)]
    pub stock: i32,
}

/// Delivery pricing row; one per bucket kind (regular or preorder)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DeliveryType {
    pub id: i32,
    #[schema(example = "Courier")]
    pub title: String,
    #[schema(example = 500)]
    pub price: Decimal,
    pub by_preorder: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_serialization() {
        let product = Product {
            id: 1,
            title: "Smoked salmon".to_string(),
            slug: "smoked-salmon".to_string(),
            price: dec!(850),
            price_discount: Some(dec!(750)),
            weight: Some(dec!(0.65)),
            delivery_schedule: Some(vec!["wednesday".to_string(), "saturday".to_string()]),
            preorder_date: None,
            stock: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).expect("Failed to serialize Product");

        assert_eq!(json["id"], 1);
        assert_eq!(json["slug"], "smoked-salmon");
        assert_eq!(json["price"].as_f64(), Some(850.0));
        assert_eq!(json["price_discount"].as_f64(), Some(750.0));
        assert_eq!(json["delivery_schedule"][1], "saturday");
        assert!(json["preorder_date"].is_null());
    }

    #[test]
    fn test_create_product_deserializes_optional_fields() {
        let payload = serde_json::json!({
            "title": "Tea",
            "slug": "tea",
            "price": 300,
            "stock": 5
        });

        let create: CreateProduct =
            serde_json::from_value(payload).expect("Failed to deserialize CreateProduct");

        assert_eq!(create.price, dec!(300));
        assert!(create.price_discount.is_none());
        assert!(create.weight.is_none());
        assert!(create.delivery_schedule.is_none());
        assert!(create.preorder_date.is_none());
    }
}
