// Grouping basket lines into delivery baskets
//
// Every basket view is rebuilt from scratch: each line is priced, assigned
// to a bucket by its delivery date, and the buckets are emitted soonest
// date first.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::basket::models::{BasketProductView, DeliveryBasket};
use crate::basket::pricing::PricedLine;
use crate::delivery::schedule;
use crate::models::Product;

/// Bucket key: delivery date plus preorder flag
///
/// Ordering is date-ascending, regular delivery before preorder on the same
/// date.
pub type BucketKey = (NaiveDate, bool);

/// The bucket a product's lines belong to, or None when the product has no
/// delivery option at all
pub fn bucket_key(product: &Product, today: NaiveDate) -> Option<BucketKey> {
    if let Some(date) = product.preorder_date {
        return Some((date, true));
    }

    let schedule_days = product.delivery_schedule.as_deref()?;
    schedule::nearest_delivery_date(today, schedule_days).map(|date| (date, false))
}

/// Group priced lines into date-ordered delivery baskets
///
/// Lines keep their insertion order inside each bucket; `delivery_price`
/// resolves the delivery cost for regular vs preorder buckets.
pub fn group_into_baskets(
    lines: Vec<(BucketKey, PricedLine)>,
    delivery_price: impl Fn(bool) -> Decimal,
) -> Vec<DeliveryBasket> {
    let mut buckets: BTreeMap<BucketKey, Vec<PricedLine>> = BTreeMap::new();
    for (key, line) in lines {
        buckets.entry(key).or_default().push(line);
    }

    buckets
        .into_iter()
        .map(|((nearest_date, by_preorder), bucket_lines)| {
            let total: Decimal = bucket_lines.iter().map(|line| line.sum).sum();
            let total_prev: Decimal = bucket_lines.iter().map(|line| line.sum_prev).sum();

            DeliveryBasket {
                total,
                total_prev,
                nearest_date,
                delivery_price: delivery_price(by_preorder),
                by_preorder,
                products: bucket_lines
                    .into_iter()
                    .map(BasketProductView::from)
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn product(
        delivery_schedule: Option<Vec<&str>>,
        preorder_date: Option<NaiveDate>,
    ) -> Product {
        Product {
            id: 1,
            title: "Test product".to_string(),
            slug: "test-product".to_string(),
            price: dec!(100),
            price_discount: None,
            weight: None,
            delivery_schedule: delivery_schedule
                .map(|days| days.into_iter().map(String::from).collect()),
            preorder_date,
            stock: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(sum: Decimal, sum_prev: Decimal) -> PricedLine {
        PricedLine {
            product_id: 1,
            title: "Test product".to_string(),
            slug: "test-product".to_string(),
            price: sum,
            price_discount: None,
            price_unit: "шт".to_string(),
            count: 1,
            sum,
            sum_prev,
            sum_unit: "1 шт".to_string(),
        }
    }

    #[test]
    fn test_preorder_date_wins_over_schedule() {
        // 2024-01-17 is a Wednesday; the preorder date still decides
        let today = date(2024, 1, 17);
        let preorder = date(2024, 2, 1);
        let product = product(Some(vec!["wednesday"]), Some(preorder));

        assert_eq!(bucket_key(&product, today), Some((preorder, true)));
    }

    #[test]
    fn test_scheduled_product_buckets_on_nearest_date() {
        let today = date(2024, 1, 17);
        let product = product(Some(vec!["saturday"]), None);

        assert_eq!(bucket_key(&product, today), Some((date(2024, 1, 20), false)));
    }

    #[test]
    fn test_product_without_delivery_options_has_no_bucket() {
        let today = date(2024, 1, 17);
        let product = product(None, None);

        assert_eq!(bucket_key(&product, today), None);
    }

    #[test]
    fn test_buckets_are_ordered_by_date() {
        let later = (date(2024, 1, 22), true);
        let sooner = (date(2024, 1, 18), false);

        let baskets = group_into_baskets(
            vec![
                (later, line(dec!(500), dec!(500))),
                (sooner, line(dec!(200), dec!(250))),
                (sooner, line(dec!(100), dec!(100))),
            ],
            |_| dec!(500),
        );

        assert_eq!(baskets.len(), 2);
        assert_eq!(baskets[0].nearest_date, date(2024, 1, 18));
        assert!(!baskets[0].by_preorder);
        assert_eq!(baskets[0].total, dec!(300));
        assert_eq!(baskets[0].total_prev, dec!(350));
        assert_eq!(baskets[0].products.len(), 2);

        assert_eq!(baskets[1].nearest_date, date(2024, 1, 22));
        assert!(baskets[1].by_preorder);
        assert_eq!(baskets[1].total, dec!(500));
    }

    #[test]
    fn test_delivery_price_follows_bucket_kind() {
        let regular = (date(2024, 1, 18), false);
        let preorder = (date(2024, 1, 18), true);

        let baskets = group_into_baskets(
            vec![
                (regular, line(dec!(100), dec!(100))),
                (preorder, line(dec!(100), dec!(100))),
            ],
            |by_preorder| if by_preorder { dec!(700) } else { dec!(500) },
        );

        assert_eq!(baskets.len(), 2);
        assert_eq!(baskets[0].delivery_price, dec!(500));
        assert_eq!(baskets[1].delivery_price, dec!(700));
    }
}
