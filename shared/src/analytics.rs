//! Locally generated earnings history for the analytics view.
//!
//! Seeded with `ChaCha8Rng` so the same seed always renders the same charts.

use std::ops::Range;

use chrono::{Days, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_DAYS: u32 = 30;
pub const MAX_HISTORY_DAYS: u32 = 365;

const COMMON_EARNINGS: Range<f64> = 0.3..0.8;
const RARE_EARNINGS: Range<f64> = 0.8..2.0;
const EPIC_EARNINGS: Range<f64> = 1.4..3.5;
const LEGENDARY_EARNINGS: Range<f64> = 2.8..7.0;
const MAX_LANDS_PER_DAY: u32 = 2;
const BOOST_DAY_PROBABILITY: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsDay {
    pub date: NaiveDate,
    pub common_earnings: f64,
    pub rare_earnings: f64,
    pub epic_earnings: f64,
    pub legendary_earnings: f64,
    pub total_earnings: f64,
    pub lands_purchased: u32,
    pub boosts_used: u32,
}

/// `days` consecutive mock days ending on `end_date`, oldest first.
pub fn mock_history(end_date: NaiveDate, days: u32, seed: u64) -> Vec<AnalyticsDay> {
    let days = days.min(MAX_HISTORY_DAYS);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..days)
        .rev()
        .filter_map(|offset| end_date.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| {
            let common_earnings = rng.gen_range(COMMON_EARNINGS);
            let rare_earnings = rng.gen_range(RARE_EARNINGS);
            let epic_earnings = rng.gen_range(EPIC_EARNINGS);
            let legendary_earnings = rng.gen_range(LEGENDARY_EARNINGS);
            AnalyticsDay {
                date,
                common_earnings,
                rare_earnings,
                epic_earnings,
                legendary_earnings,
                total_earnings: common_earnings + rare_earnings + epic_earnings + legendary_earnings,
                lands_purchased: rng.gen_range(0..=MAX_LANDS_PER_DAY),
                boosts_used: u32::from(rng.gen_bool(BOOST_DAY_PROBABILITY)),
            }
        })
        .collect()
}
