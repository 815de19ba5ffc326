use crate::constants::MONEY_SCALE;
use rust_decimal::{Decimal, RoundingStrategy};

/// Monetary amount in the currency's major unit (rupees).
pub type Money = Decimal;

/// Rounds an amount to the currency's minor unit, half away from zero.
///
/// The result always carries exactly two fractional digits, so `100` renders as `100.00`.
#[must_use]
pub fn round_money(amount: Decimal) -> Money {
    let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}
