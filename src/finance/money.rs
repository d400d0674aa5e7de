use rust_decimal::Decimal;

/// Number of minor units (cents) per major unit.
pub const MINOR_UNITS_SCALE: u32 = 2;

/// Render an amount in minor units as an exact two-decimal major amount.
///
/// # Examples
///
/// ```
/// use opportunity_evaluator::finance::money::to_major_units;
///
/// assert_eq!(to_major_units(123_456).to_string(), "1234.56");
/// assert_eq!(to_major_units(100_000).to_string(), "1000.00");
/// ```
pub fn to_major_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNITS_SCALE)
}

/// Round a fractional minor-unit cost to a two-decimal major amount.
///
/// Non-finite input renders as zero.
pub fn cost_to_major_units(minor: f64) -> Decimal {
    Decimal::from_f64_retain(minor / 100.0)
        .unwrap_or(Decimal::ZERO)
        .round_dp(MINOR_UNITS_SCALE)
}
