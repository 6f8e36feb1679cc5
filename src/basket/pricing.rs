use rust_decimal::Decimal;

use crate::models::Product;

/// Unit weight below which a weight-priced product is quoted per 100 g
/// instead of per kilogram
const GRAM_DISPLAY_THRESHOLD_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// A basket line with its pricing computed
///
/// `price`/`price_discount` are display prices, already scaled to
/// `price_unit`; `sum`/`sum_prev` are always raw currency amounts.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product_id: i32,
    pub title: String,
    pub slug: String,
    pub price: Decimal,
    pub price_discount: Option<Decimal>,
    pub price_unit: String,
    pub count: i32,
    pub sum: Decimal,
    pub sum_prev: Decimal,
    pub sum_unit: String,
}

/// Price a basket line
///
/// The effective price is the discount price when present, the list price
/// otherwise; `sum_prev` always uses the list price.
///
/// Weight-priced products (those with a unit weight) store prices per
/// kilogram and bill `weight * count` kilograms. Products lighter than the
/// gram-display threshold are quoted per 100 g with gram sums; heavier ones
/// per kilogram. Piece-priced products bill `count` pieces.
pub fn price_line(product: &Product, count: i32) -> PricedLine {
    let count_dec = Decimal::from(count);
    let effective_price = product.price_discount.unwrap_or(product.price);

    match product.weight {
        Some(weight) => {
            let billed_kg = weight * count_dec;
            let sum = (effective_price * billed_kg).normalize();
            let sum_prev = (product.price * billed_kg).normalize();

            let (price, price_discount, price_unit, sum_unit) =
                if weight < GRAM_DISPLAY_THRESHOLD_KG {
                    (
                        (product.price / Decimal::TEN).normalize(),
                        product
                            .price_discount
                            .map(|discount| (discount / Decimal::TEN).normalize()),
                        "100 гр".to_string(),
                        format!("{} гр", (billed_kg * Decimal::ONE_THOUSAND).normalize()),
                    )
                } else {
                    (
                        product.price.normalize(),
                        product.price_discount.map(|discount| discount.normalize()),
                        "кг".to_string(),
                        format!("{} кг", billed_kg.normalize()),
                    )
                };

            PricedLine {
                product_id: product.id,
                title: product.title.clone(),
                slug: product.slug.clone(),
                price,
                price_discount,
                price_unit,
                count,
                sum,
                sum_prev,
                sum_unit,
            }
        }
        None => PricedLine {
            product_id: product.id,
            title: product.title.clone(),
            slug: product.slug.clone(),
            price: product.price.normalize(),
            price_discount: product.price_discount.map(|discount| discount.normalize()),
            price_unit: "шт".to_string(),
            count,
            sum: (effective_price * count_dec).normalize(),
            sum_prev: (product.price * count_dec).normalize(),
            sum_unit: format!("{} шт", count),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn product(
        price: Decimal,
        price_discount: Option<Decimal>,
        weight: Option<Decimal>,
    ) -> Product {
        Product {
            id: 1,
            title: "Test product".to_string(),
            slug: "test-product".to_string(),
            price,
            price_discount,
            weight,
            delivery_schedule: None,
            preorder_date: None,
            stock: 100,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_light_weight_product_is_quoted_per_100g() {
        let product = product(dec!(1000), None, Some(dec!(0.3)));
        let line = price_line(&product, 3);

        assert_eq!(line.price, dec!(100));
        assert_eq!(line.price_unit, "100 гр");
        assert_eq!(line.sum, dec!(900));
        assert_eq!(line.sum_unit, "900 гр");
        assert!(line.price_discount.is_none());
    }

    #[test]
    fn test_heavy_weight_product_is_quoted_per_kg() {
        let product = product(dec!(850), Some(dec!(750)), Some(dec!(0.65)));
        let line = price_line(&product, 3);

        assert_eq!(line.price, dec!(850));
        assert_eq!(line.price_discount, Some(dec!(750)));
        assert_eq!(line.price_unit, "кг");
        assert_eq!(line.sum, dec!(1462.5));
        assert_eq!(line.sum_prev, dec!(1657.5));
        assert_eq!(line.sum_unit, "1.95 кг");
    }

    #[test]
    fn test_single_unit_keeps_fractional_kg_sum_unit() {
        let product = product(dec!(850), Some(dec!(750)), Some(dec!(0.65)));
        let line = price_line(&product, 1);

        assert_eq!(line.sum, dec!(487.5));
        assert_eq!(line.sum_prev, dec!(552.5));
        assert_eq!(line.sum_unit, "0.65 кг");
    }

    #[test]
    fn test_database_scale_is_normalized_away() {
        // NUMERIC columns come back with their declared scale
        let product = product(dec!(1000.00), None, Some(dec!(0.300)));
        let line = price_line(&product, 3);

        assert_eq!(line.price.to_string(), "100");
        assert_eq!(line.sum_unit, "900 гр");
    }

    #[test]
    fn test_piece_product_bills_per_count() {
        let product = product(dec!(900), None, None);
        let line = price_line(&product, 2);

        assert_eq!(line.price, dec!(900));
        assert_eq!(line.price_unit, "шт");
        assert_eq!(line.sum, dec!(1800));
        assert_eq!(line.sum_prev, dec!(1800));
        assert_eq!(line.sum_unit, "2 шт");
    }

    #[test]
    fn test_discounted_light_product_scales_both_prices() {
        let product = product(dec!(400), Some(dec!(300)), Some(dec!(0.2)));
        let line = price_line(&product, 2);

        assert_eq!(line.price, dec!(40));
        assert_eq!(line.price_discount, Some(dec!(30)));
        assert_eq!(line.sum, dec!(120));
        assert_eq!(line.sum_prev, dec!(160));
        assert_eq!(line.sum_unit, "400 гр");
    }
}
