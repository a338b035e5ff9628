//! Root finder for the internal rate of return of dated cash flows.
//!
//! Day-count convention: actual/365. The time coordinate of each flow is
//! the actual number of calendar days since the earliest flow divided by
//! 365.0. Reported rates therefore annualize on a 365-day year; tests pin
//! this convention.

use chrono::NaiveDate;
use log::debug;

use super::{DatedFlow, IrrError};

/// Denominator of the actual/365 day count.
const DAYS_PER_YEAR: f64 = 365.0;

/// Search bracket for the annualized rate.
const RATE_BRACKET_MIN: f64 = -0.9999;
const RATE_BRACKET_MAX: f64 = 10.0;

/// Convergence tolerance on the discounted-sum residual.
pub const RESIDUAL_TOLERANCE: f64 = 1e-6;

/// Refinement iteration budget after a bracket is found.
pub const MAX_ITERATIONS: u32 = 100;

/// Years between two dates under actual/365.
pub fn year_fraction(epoch: NaiveDate, date: NaiveDate) -> f64 {
    (date - epoch).num_days() as f64 / DAYS_PER_YEAR
}

/// Discounted sum of `flows` at `rate`, anchored at the earliest flow date.
pub fn xnpv(rate: f64, flows: &[DatedFlow]) -> f64 {
    let epoch = match flows.iter().map(|f| f.date).min() {
        Some(date) => date,
        None => return 0.0,
    };
    flows
        .iter()
        .map(|flow| flow.amount / (1.0 + rate).powf(year_fraction(epoch, flow.date)))
        .sum()
}

/// Derivative of [`xnpv`] with respect to the rate.
fn xnpv_derivative(rate: f64, flows: &[DatedFlow]) -> f64 {
    let epoch = match flows.iter().map(|f| f.date).min() {
        Some(date) => date,
        None => return 0.0,
    };
    flows
        .iter()
        .map(|flow| {
            let t = year_fraction(epoch, flow.date);
            -t * flow.amount / (1.0 + rate).powf(t + 1.0)
        })
        .sum()
}

/// Solves for the annualized rate zeroing the discounted sum of `flows`.
///
/// Brackets a sign change of the residual over `[-0.9999, 10.0]`, then
/// refines by bisection with Newton steps (a Newton step that leaves the
/// current bracket falls back to the midpoint). Converges when the
/// residual drops to [`RESIDUAL_TOLERANCE`]; gives up after
/// [`MAX_ITERATIONS`] refinement steps.
///
/// Callers are expected to have screened the flows for a sign change in
/// the amounts; `InsufficientFlows` is still returned for degenerate
/// input rather than panicking.
pub fn solve_irr(flows: &[DatedFlow]) -> Result<f64, IrrError> {
    if flows.len() < 2 {
        return Err(IrrError::InsufficientFlows);
    }

    let residual = |rate: f64| xnpv(rate, flows);

    // Bracket a sign change on a fixed scan grid, dense near -1 where the
    // residual moves fastest.
    let grid = scan_grid();
    let mut previous: Option<(f64, f64)> = None;
    let mut bracket: Option<(f64, f64, f64, f64)> = None;

    for &rate in &grid {
        let value = residual(rate);
        if value.abs() <= RESIDUAL_TOLERANCE {
            return Ok(rate);
        }
        if let Some((prev_rate, prev_value)) = previous {
            if prev_value.signum() != value.signum() {
                bracket = Some((prev_rate, rate, prev_value, value));
                break;
            }
        }
        previous = Some((rate, value));
    }

    let Some((mut lo, mut hi, mut f_lo, _f_hi)) = bracket else {
        return Err(IrrError::NoRootInBracket {
            min: RATE_BRACKET_MIN,
            max: RATE_BRACKET_MAX,
        });
    };

    let mut x = 0.5 * (lo + hi);
    for iteration in 0..MAX_ITERATIONS {
        let f_x = residual(x);
        if f_x.abs() <= RESIDUAL_TOLERANCE {
            debug!("IRR converged to {:.8} after {} iterations", x, iteration);
            return Ok(x);
        }

        // Shrink the bracket around the root.
        if f_x.signum() == f_lo.signum() {
            lo = x;
            f_lo = f_x;
        } else {
            hi = x;
        }

        // Prefer a Newton step; fall back to bisection when it degenerates
        // or escapes the bracket.
        let slope = xnpv_derivative(x, flows);
        let newton = x - f_x / slope;
        x = if slope != 0.0 && newton.is_finite() && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
    }

    Err(IrrError::IterationsExhausted(MAX_ITERATIONS))
}

/// Scan points over the search bracket: dense close to the singularity at
/// rate -1, 0.1 steps through the everyday range, coarser above 100%.
fn scan_grid() -> Vec<f64> {
    let mut grid = vec![RATE_BRACKET_MIN, -0.999, -0.99, -0.95, -0.9];
    let mut rate = -0.8;
    while rate < 1.0 + 1e-9 {
        grid.push(rate);
        rate += 0.1;
    }
    rate = 1.25;
    while rate < RATE_BRACKET_MAX + 1e-9 {
        grid.push(rate);
        rate += 0.25;
    }
    grid
}
