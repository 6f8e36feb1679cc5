// Validation utilities module
// Provides custom validation functions for domain-specific rules

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::delivery::schedule::parse_weekday;
use crate::models::CreateProduct;

/// Validates that a price is strictly positive
pub fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        Err(ValidationError::new("price_must_be_positive"))
    } else {
        Ok(())
    }
}

/// Validates that a unit weight is strictly positive
pub fn validate_positive_weight(weight: &Decimal) -> Result<(), ValidationError> {
    if *weight <= Decimal::ZERO {
        Err(ValidationError::new("weight_must_be_positive"))
    } else {
        Ok(())
    }
}

/// Validates that a delivery schedule is non-empty and contains only known
/// weekday names
pub fn validate_delivery_schedule(days: &[String]) -> Result<(), ValidationError> {
    if days.is_empty() {
        return Err(ValidationError::new("delivery_schedule_must_not_be_empty"));
    }

    for day in days {
        if parse_weekday(day).is_none() {
            return Err(ValidationError::new("unknown_weekday_name"));
        }
    }

    Ok(())
}

/// Struct-level check: a discount must undercut the list price
pub fn validate_discount_below_price(product: &CreateProduct) -> Result<(), ValidationError> {
    if let Some(discount) = product.price_discount {
        if discount >= product.price {
            return Err(ValidationError::new("discount_must_be_below_price"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_price_rejects_zero() {
        assert!(validate_positive_price(&Decimal::ZERO).is_err());
        assert!(validate_positive_price(&dec!(0.01)).is_ok());
    }

    #[test]
    fn test_delivery_schedule_rejects_unknown_day() {
        let days = vec!["wednesday".to_string(), "caturday".to_string()];
        assert!(validate_delivery_schedule(&days).is_err());
    }

    #[test]
    fn test_delivery_schedule_accepts_known_days() {
        let days = vec!["monday".to_string(), "sunday".to_string()];
        assert!(validate_delivery_schedule(&days).is_ok());
    }

    #[test]
    fn test_discount_must_be_below_price() {
        let product = CreateProduct {
            title: "Tea".to_string(),
            slug: "tea".to_string(),
            price: dec!(100),
            price_discount: Some(dec!(100)),
            weight: None,
            delivery_schedule: None,
            preorder_date: None,
            stock: 1,
        };
        assert!(validate_discount_below_price(&product).is_err());
    }
}
