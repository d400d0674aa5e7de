//! Interest arithmetic for float and loan costing.
//!
//! All functions are pure. Rates passed around as `daily_rate` are
//! decimals (0.000657), never percentages; APR inputs are percentages
//! (24.0 for 24%).

use std::f64::consts::LN_2;

/// Day-count basis used to turn an annual rate into a daily one.
pub const DAYS_PER_YEAR: f64 = 365.0;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Convert an annual percentage rate into a daily decimal rate.
///
/// # Examples
///
/// ```
/// use opportunity_evaluator::finance::apr::apr_to_daily_rate;
///
/// let daily = apr_to_daily_rate(24.0);
/// assert!((daily - 0.000_657_534_246_575_342_5).abs() < 1e-12);
/// ```
pub fn apr_to_daily_rate(apr_percent: f64) -> f64 {
    (apr_percent / 100.0) / DAYS_PER_YEAR
}

/// Interest accrued on `amount` compounding daily for `days` days.
///
/// Zero days cost nothing regardless of rate.
pub fn compound_cost(amount: f64, daily_rate: f64, days: u32) -> f64 {
    if days == 0 {
        return 0.0;
    }
    amount * ((1.0 + daily_rate).powf(f64::from(days)) - 1.0)
}

/// Non-compounding interest on `amount` over `days` days.
pub fn simple_interest(amount: f64, daily_rate: f64, days: u32) -> f64 {
    amount * daily_rate * f64::from(days)
}

/// Rate actually paid over a `days`-long period when compounding daily.
pub fn effective_apr_for_period(daily_rate: f64, days: u32) -> f64 {
    (1.0 + daily_rate).powf(f64::from(days)) - 1.0
}

/// Cost of carrying one unit of currency for one day.
pub fn cost_per_dollar_per_day(apr_percent: f64) -> f64 {
    apr_to_daily_rate(apr_percent)
}

/// Whole days until a balance doubles under daily compounding.
///
/// Non-positive rates never double; they report 0.
pub fn days_until_double(apr_percent: f64) -> u32 {
    if apr_percent <= 0.0 {
        return 0;
    }
    let daily_rate = apr_to_daily_rate(apr_percent);
    (LN_2 / (1.0 + daily_rate).ln()).floor() as u32
}

/// Level monthly payment that amortizes `principal` over `months`.
///
/// Zero months or a zero rate degrade to straight division.
///
/// # Examples
///
/// ```
/// use opportunity_evaluator::finance::apr::monthly_payment_for_loan;
///
/// let payment = monthly_payment_for_loan(10_000.0, 12.0, 36);
/// assert!((payment - 332.14).abs() < 0.01);
/// ```
pub fn monthly_payment_for_loan(principal: f64, apr_percent: f64, months: u32) -> f64 {
    if months == 0 || apr_percent == 0.0 {
        return principal / f64::from(months.max(1));
    }
    let monthly_rate = (apr_percent / 100.0) / MONTHS_PER_YEAR;
    let growth = (1.0 + monthly_rate).powf(f64::from(months));
    principal * (monthly_rate * growth) / (growth - 1.0)
}

/// Balance left after `payments_made` monthly payments.
///
/// Each month interest accrues first and the remainder of the payment
/// reduces principal. Returns 0 as soon as the balance is paid off.
pub fn remaining_balance_after_payments(
    principal: f64,
    apr_percent: f64,
    monthly_payment: f64,
    payments_made: u32,
) -> f64 {
    let monthly_rate = (apr_percent / 100.0) / MONTHS_PER_YEAR;
    let mut balance = principal;
    for _ in 0..payments_made {
        let interest = balance * monthly_rate;
        balance -= monthly_payment - interest;
        if balance <= 0.0 {
            return 0.0;
        }
    }
    balance
}
