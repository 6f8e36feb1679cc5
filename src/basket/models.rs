use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::basket::pricing::PricedLine;

/// Basket row; identified solely by its opaque buyer token
#[derive(Debug, Clone, FromRow)]
pub struct Basket {
    pub id: i32,
    pub token: String,
}

/// A (basket, product) line; count is always >= 1
#[derive(Debug, Clone, FromRow)]
pub struct BasketLine {
    pub id: i32,
    pub basket_id: i32,
    pub product_id: i32,
    pub count: i32,
}

/// Request body shared by add/remove/increment/decrement
#[derive(Debug, Deserialize)]
pub struct ProductIdRequest {
    pub product_id: i32,
}

/// Request body for clear
///
/// When `delivery_basket` carries a date, only the lines of that delivery
/// basket are removed.
#[derive(Debug, Default, Deserialize)]
pub struct ClearRequest {
    pub delivery_basket: Option<NaiveDate>,
}

/// Full basket view returned by every basket endpoint
#[derive(Debug, Serialize)]
pub struct BasketResponse {
    pub token: Option<String>,
    pub total: Decimal,
    pub total_prev: Decimal,
    pub delivery_baskets: Vec<DeliveryBasket>,
}

impl BasketResponse {
    /// View of a basket with no lines (or no basket at all)
    pub fn empty(token: Option<String>) -> Self {
        Self {
            token,
            total: Decimal::ZERO,
            total_prev: Decimal::ZERO,
            delivery_baskets: Vec::new(),
        }
    }
}

/// Lines grouped by the date they would be delivered together
#[derive(Debug, Serialize)]
pub struct DeliveryBasket {
    pub total: Decimal,
    pub total_prev: Decimal,
    pub nearest_date: NaiveDate,
    pub delivery_price: Decimal,
    pub by_preorder: bool,
    pub products: Vec<BasketProductView>,
}

/// A priced basket line as rendered in the view
///
/// `price_discount` and `sum_prev` are omitted when the product carries no
/// discount.
#[derive(Debug, Serialize)]
pub struct BasketProductView {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_discount: Option<Decimal>,
    pub price_unit: String,
    pub count: i32,
    pub sum: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum_prev: Option<Decimal>,
    pub sum_unit: String,
}

impl From<PricedLine> for BasketProductView {
    fn from(line: PricedLine) -> Self {
        let sum_prev = if line.price_discount.is_some() {
            Some(line.sum_prev)
        } else {
            None
        };

        Self {
            id: line.product_id,
            title: line.title,
            slug: line.slug,
            price: line.price,
            price_discount: line.price_discount,
            price_unit: line.price_unit,
            count: line.count,
            sum: line.sum,
            sum_prev,
            sum_unit: line.sum_unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_view_omits_discount_fields_without_discount() {
        let view = BasketProductView {
            id: 1,
            title: "Buckwheat".to_string(),
            slug: "buckwheat".to_string(),
            price: dec!(100),
            price_discount: None,
            price_unit: "100 гр".to_string(),
            count: 3,
            sum: dec!(900),
            sum_prev: None,
            sum_unit: "900 гр".to_string(),
        };

        let json = serde_json::to_value(&view).unwrap();

        assert!(json.get("price_discount").is_none());
        assert!(json.get("sum_prev").is_none());
        assert_eq!(json["sum"].as_f64(), Some(900.0));
        assert_eq!(json["sum_unit"], "900 гр");
    }

    #[test]
    fn test_view_keeps_discount_fields_with_discount() {
        let view = BasketProductView {
            id: 2,
            title: "Smoked salmon".to_string(),
            slug: "smoked-salmon".to_string(),
            price: dec!(850),
            price_discount: Some(dec!(750)),
            price_unit: "кг".to_string(),
            count: 3,
            sum: dec!(1462.5),
            sum_prev: Some(dec!(1657.5)),
            sum_unit: "1.95 кг".to_string(),
        };

        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["price_discount"].as_f64(), Some(750.0));
        assert_eq!(json["sum_prev"].as_f64(), Some(1657.5));
    }

    #[test]
    fn test_empty_response_has_no_baskets() {
        let response = BasketResponse::empty(Some("token-1".to_string()));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["token"], "token-1");
        assert_eq!(json["total"].as_f64(), Some(0.0));
        assert_eq!(json["delivery_baskets"].as_array().unwrap().len(), 0);
    }
}
