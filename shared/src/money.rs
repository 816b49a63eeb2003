//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic stays in `Decimal`; rounding to currency precision happens
//! only when an amount is presented.

use rust_decimal::prelude::*;

/// Currency precision (cents)
const DECIMAL_PLACES: u32 = 2;

/// Round to currency precision (2 decimal places, half away from zero)
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `quantity × unit_price`, unrounded
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Change to hand back: `max(0, tendered − amount)`
pub fn change_due(tendered: Decimal, amount: Decimal) -> Decimal {
    (tendered - amount).max(Decimal::ZERO)
}

/// Format an amount for display, e.g. `€29.00`
pub fn format_eur(value: Decimal) -> String {
    let rounded = round_money(value);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-€{:.2}", rounded.abs())
    } else {
        format!("€{:.2}", rounded.abs())
    }
}
