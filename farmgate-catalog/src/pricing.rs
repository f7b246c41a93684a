use serde::{Deserialize, Serialize};

/// One bulk-pricing tier: at or above `min_quantity` units, each unit costs
/// `unit_price_cents` instead of the product's base price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceBreak {
    pub min_quantity: i32,
    pub unit_price_cents: i64,
}

/// Input to the order-total aggregator. One tuple per cart/order line.
///
/// `unit_price_cents = None` marks a line whose catalog item could not be
/// resolved (deleted product, stale cart); such lines are skipped entirely.
/// `reference_price_cents = None` means the item has no original/list price,
/// so the reference equals the resolved unit price and the line contributes
/// no savings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLine {
    pub quantity: i32,
    pub unit_price_cents: Option<i64>,
    pub reference_price_cents: Option<i64>,
}

/// Aggregated totals for a set of line items. Recomputed on every cart read;
/// persisted only as a snapshot on a placed order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal_cents: i64,
    pub savings_cents: i64,
    pub total_cents: i64,
    pub item_count: i64,
}

/// Resolve the effective unit price for `quantity` units of a product.
///
/// Among all breaks with `min_quantity <= quantity`, the one with the largest
/// `min_quantity` wins. No qualifying break, an empty list, or a non-positive
/// quantity all fall back to the base price. Negative stored prices are
/// upstream corruption and clamp to zero.
pub fn resolve_unit_price(base_price_cents: i64, price_breaks: &[PriceBreak], quantity: i32) -> i64 {
    let price = if quantity <= 0 {
        base_price_cents
    } else {
        price_breaks
            .iter()
            .filter(|b| b.min_quantity <= quantity)
            .max_by_key(|b| b.min_quantity)
            .map(|b| b.unit_price_cents)
            .unwrap_or(base_price_cents)
    };

    price.max(0)
}

/// Fold priced lines into an `OrderSummary`.
///
/// Single pass, never fails: unresolvable lines (no unit price) are skipped,
/// negative quantities contribute nothing, negative prices clamp to zero, and
/// savings is clamped so a line priced above its reference cannot drive the
/// total negative.
pub fn summarize_order(lines: &[PricedLine]) -> OrderSummary {
    let mut summary = OrderSummary::default();

    for line in lines {
        let Some(unit_price) = line.unit_price_cents else {
            continue;
        };
        if line.quantity <= 0 {
            continue;
        }

        let quantity = line.quantity as i64;
        let unit_price = unit_price.max(0);
        let reference_price = line.reference_price_cents.unwrap_or(unit_price).max(0);

        summary.total_cents += unit_price * quantity;
        summary.subtotal_cents += reference_price * quantity;
        summary.item_count += quantity;
    }

    summary.savings_cents = (summary.subtotal_cents - summary.total_cents).max(0);
    summary
}

/// Display discount for a catalog item: percentage off the original list
/// price, rounded to the nearest whole percent. Zero when there is no
/// original price or the item is not actually discounted.
pub fn discount_percent(original_price_cents: i64, price_cents: i64) -> i32 {
    if original_price_cents <= 0 || original_price_cents <= price_cents {
        return 0;
    }

    let off = (original_price_cents - price_cents) as f64 / original_price_cents as f64 * 100.0;
    off.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaks(tiers: &[(i32, i64)]) -> Vec<PriceBreak> {
        tiers
            .iter()
            .map(|&(min_quantity, unit_price_cents)| PriceBreak {
                min_quantity,
                unit_price_cents,
            })
            .collect()
    }

    fn line(quantity: i32, unit: Option<i64>, reference: Option<i64>) -> PricedLine {
        PricedLine {
            quantity,
            unit_price_cents: unit,
            reference_price_cents: reference,
        }
    }

    #[test]
    fn empty_tier_list_returns_base_price() {
        for quantity in [0, 1, 7, 1000] {
            assert_eq!(resolve_unit_price(10000, &[], quantity), 10000);
        }
    }

    #[test]
    fn tightest_qualifying_tier_wins() {
        let tiers = breaks(&[(5, 9500), (10, 9000)]);

        // Quantity 7: the 5+ tier applies, the 10+ tier does not.
        assert_eq!(resolve_unit_price(10000, &tiers, 7), 9500);
        // Quantity 3: below every threshold.
        assert_eq!(resolve_unit_price(10000, &tiers, 3), 10000);
        // Exact threshold qualifies.
        assert_eq!(resolve_unit_price(10000, &tiers, 10), 9000);
    }

    #[test]
    fn tier_order_in_the_list_is_irrelevant() {
        let tiers = breaks(&[(10, 9000), (5, 9500)]);
        assert_eq!(resolve_unit_price(10000, &tiers, 7), 9500);
        assert_eq!(resolve_unit_price(10000, &tiers, 12), 9000);
    }

    #[test]
    fn selection_does_not_assume_monotonic_prices() {
        // A misconfigured ladder where the bigger tier is *more* expensive:
        // the resolver still picks the tightest qualifying threshold.
        let tiers = breaks(&[(5, 9500), (10, 12000)]);
        assert_eq!(resolve_unit_price(10000, &tiers, 10), 12000);
    }

    #[test]
    fn quantities_under_the_same_tier_resolve_identically() {
        let tiers = breaks(&[(5, 9500), (10, 9000)]);
        assert_eq!(
            resolve_unit_price(10000, &tiers, 5),
            resolve_unit_price(10000, &tiers, 9),
        );
    }

    #[test]
    fn non_positive_quantity_falls_back_to_base_price() {
        let tiers = breaks(&[(1, 9500)]);
        assert_eq!(resolve_unit_price(10000, &tiers, 0), 10000);
        assert_eq!(resolve_unit_price(10000, &tiers, -3), 10000);
    }

    #[test]
    fn negative_stored_price_clamps_to_zero() {
        let tiers = breaks(&[(5, -100)]);
        assert_eq!(resolve_unit_price(10000, &tiers, 5), 0);
        assert_eq!(resolve_unit_price(-1, &[], 1), 0);
    }

    #[test]
    fn resolver_is_deterministic() {
        let tiers = breaks(&[(5, 9500), (10, 9000)]);
        let first = resolve_unit_price(10000, &tiers, 7);
        let second = resolve_unit_price(10000, &tiers, 7);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_order_summarizes_to_zeros() {
        let summary = summarize_order(&[]);
        assert_eq!(summary, OrderSummary::default());
    }

    #[test]
    fn summary_totals_and_savings() {
        // 2 units at 90 (reference 100) plus 1 unit at 50 (no discount).
        let summary = summarize_order(&[
            line(2, Some(9000), Some(10000)),
            line(1, Some(5000), Some(5000)),
        ]);

        assert_eq!(summary.subtotal_cents, 25000);
        assert_eq!(summary.total_cents, 23000);
        assert_eq!(summary.savings_cents, 2000);
        assert_eq!(summary.item_count, 3);
    }

    #[test]
    fn line_without_unit_price_is_excluded() {
        let summary = summarize_order(&[line(2, None, Some(10000))]);
        assert_eq!(summary, OrderSummary::default());
    }

    #[test]
    fn missing_reference_defaults_to_unit_price() {
        let summary = summarize_order(&[line(3, Some(400), None)]);
        assert_eq!(summary.subtotal_cents, 1200);
        assert_eq!(summary.total_cents, 1200);
        assert_eq!(summary.savings_cents, 0);
    }

    #[test]
    fn savings_never_negative_when_price_exceeds_reference() {
        let summary = summarize_order(&[line(1, Some(12000), Some(10000))]);
        assert_eq!(summary.total_cents, 12000);
        assert_eq!(summary.subtotal_cents, 10000);
        assert_eq!(summary.savings_cents, 0);
    }

    #[test]
    fn malformed_lines_degrade_gracefully() {
        let summary = summarize_order(&[
            line(-2, Some(9000), Some(10000)),
            line(1, Some(-500), None),
            line(2, Some(100), Some(-1)),
        ]);

        // Negative quantity dropped; negative prices clamp to zero.
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.total_cents, 200);
        assert_eq!(summary.subtotal_cents, 0);
        assert_eq!(summary.savings_cents, 0);
    }

    #[test]
    fn discount_percent_rounds_to_whole_percent() {
        assert_eq!(discount_percent(10000, 9000), 10);
        assert_eq!(discount_percent(30000, 20000), 33);
        assert_eq!(discount_percent(29900, 19900), 33);
    }

    #[test]
    fn discount_percent_zero_without_real_discount() {
        assert_eq!(discount_percent(0, 500), 0);
        assert_eq!(discount_percent(10000, 10000), 0);
        assert_eq!(discount_percent(9000, 10000), 0);
        assert_eq!(discount_percent(-100, 50), 0);
    }
}
