use serde::{Deserialize, Serialize};

use crate::boost::BoostSetting;
use crate::parcel::ParcelTier;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const DAYS_PER_MONTH: f64 = 30.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Planner time horizons in days.
pub const PROJECTION_HORIZONS: [u32; 5] = [30, 90, 180, 365, 730];

/// Rent projection for a holding or a whole portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct YieldResult {
    /// Boost-averaged effective rate.
    pub per_second: f64,
    pub per_day: f64,
    pub per_month: f64,
    pub per_year: f64,
    pub total_cost: f64,
    /// `None` when nothing is earned; the investment never pays back.
    pub break_even_days: Option<f64>,
    pub efficiency: f64,
}

impl YieldResult {
    /// Derive every projection from a daily amount and the money invested.
    pub fn from_daily(per_day: f64, total_cost: f64) -> Self {
        Self {
            per_second: per_day / SECONDS_PER_DAY,
            per_day,
            per_month: per_day * DAYS_PER_MONTH,
            per_year: per_day * DAYS_PER_YEAR,
            total_cost,
            break_even_days: break_even_days(total_cost, per_day),
            efficiency: efficiency(per_day, total_cost),
        }
    }
}

pub fn break_even_days(total_cost: f64, per_day: f64) -> Option<f64> {
    (per_day > 0.0).then(|| total_cost / per_day)
}

pub fn efficiency(per_day: f64, total_cost: f64) -> f64 {
    if total_cost > 0.0 {
        per_day / total_cost
    } else {
        0.0
    }
}

/// Daily rent for a raw per-second rate after the permanent bonus and an optional boost.
pub fn daily_yield(
    rate_per_second: f64,
    permanent_bonus_fraction: f64,
    boost: Option<BoostSetting>,
) -> f64 {
    let daily_before_boost =
        rate_per_second * SECONDS_PER_DAY * (1.0 + sanitize_bonus(permanent_bonus_fraction));
    match boost {
        Some(boost) => boost.apply_daily(daily_before_boost),
        None => daily_before_boost,
    }
}

pub fn compute_yield(
    tier: ParcelTier,
    quantity: f64,
    permanent_bonus_fraction: f64,
    boost: Option<BoostSetting>,
) -> YieldResult {
    let quantity = sanitize_quantity(quantity);
    let per_day = daily_yield(
        tier.yield_per_second() * quantity,
        permanent_bonus_fraction,
        boost,
    );
    YieldResult::from_daily(per_day, tier.cost() as f64 * quantity)
}

/// Flat earnings over `days`, no compounding.
pub fn project(per_day: f64, days: u32) -> f64 {
    per_day * f64::from(days)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub days: u32,
    pub earnings: f64,
    /// Earnings as a percentage of the investment; 0 when nothing was invested.
    pub roi_percent: f64,
}

/// Earnings and ROI at each planner horizon.
pub fn projections(per_day: f64, total_cost: f64) -> Vec<Projection> {
    PROJECTION_HORIZONS
        .iter()
        .map(|&days| {
            let earnings = project(per_day, days);
            let roi_percent = if total_cost > 0.0 {
                earnings / total_cost * 100.0
            } else {
                0.0
            };
            Projection {
                days,
                earnings,
                roi_percent,
            }
        })
        .collect()
}

/// Negative and non-finite quantities count as zero.
pub fn sanitize_quantity(quantity: f64) -> f64 {
    if quantity.is_finite() { quantity.max(0.0) } else { 0.0 }
}

pub fn sanitize_bonus(bonus_fraction: f64) -> f64 {
    if bonus_fraction.is_finite() {
        bonus_fraction.max(0.0)
    } else {
        0.0
    }
}
