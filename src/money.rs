//! Money arithmetic – exact decimal line totals, grand totals, and the
//! two-decimal currency formatting applied at render time.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol prefixed to every formatted amount.
pub const CURRENCY_SYMBOL: &str = "$";

/// Number of decimal places shown for currency amounts.
pub const CURRENCY_DECIMALS: u32 = 2;

/// `quantity × unit_price`, or `None` if the product leaves the range of
/// [`Decimal`].
pub fn line_total(quantity: u32, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(unit_price)
}

/// Sum of `quantity × unit_price` over all lines.
///
/// An empty sequence sums to zero. Returns `None` on overflow.
pub fn sum_line_totals<I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (u32, Decimal)>,
{
    lines.into_iter().try_fold(Decimal::ZERO, |acc, (quantity, unit_price)| {
        acc.checked_add(line_total(quantity, unit_price)?)
    })
}

/// Round to two places, midpoint away from zero.
///
/// The result always carries exactly two decimal places so that `1` becomes
/// `1.00`.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_DECIMALS);
    rounded
}

/// Display form used on the document: `"$" + amount rounded to two places`.
///
/// Negative amounts keep their sign after the symbol (`$-5.00`).
pub fn format_currency(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{}", round_currency(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_whole_amount_with_two_places() {
        assert_eq!(format_currency(dec!(1)), "$1.00");
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(19.999)), "$20.00");
        assert_eq!(format_currency(dec!(0.125)), "$0.13");
        assert_eq!(format_currency(dec!(0.124)), "$0.12");
        assert_eq!(format_currency(dec!(-0.125)), "$-0.13");
    }

    #[test]
    fn negative_amount_keeps_sign() {
        assert_eq!(format_currency(dec!(-5)), "$-5.00");
    }

    #[test]
    fn rounding_does_not_touch_exact_value() {
        let exact = dec!(9.999);
        let _ = format_currency(exact);
        assert_eq!(exact, dec!(9.999));
    }

    #[test]
    fn line_total_is_exact() {
        assert_eq!(line_total(3, dec!(0.1)), Some(dec!(0.3)));
        assert_eq!(line_total(0, dec!(12.5)), Some(Decimal::ZERO));
    }

    #[test]
    fn empty_sum_is_zero() {
        let total = sum_line_totals(std::iter::empty()).unwrap();
        assert_eq!(format_currency(total), "$0.00");
    }

    #[test]
    fn sum_is_order_independent() {
        let lines = [(1, dec!(10.00)), (3, dec!(5.50)), (7, dec!(0.01))];
        let forward = sum_line_totals(lines).unwrap();
        let backward = sum_line_totals(lines.into_iter().rev()).unwrap();
        assert_eq!(forward, dec!(26.57));
        assert_eq!(forward, backward);
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(line_total(u32::MAX, Decimal::MAX), None);
        assert_eq!(sum_line_totals([(1, Decimal::MAX), (1, Decimal::MAX)]), None);
    }
}
