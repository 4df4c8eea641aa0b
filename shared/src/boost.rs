use serde::{Deserialize, Serialize};

/// Hours in a boost day; active hours are clamped into `0..=HOURS_PER_DAY`.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Temporary rent multiplier from watching ads, with its usual session length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdBoost {
    pub multiplier: f64,
    pub typical_hours: f64,
    pub label: &'static str,
}

pub const AD_BOOSTS: [AdBoost; 4] = [
    AdBoost {
        multiplier: 1.0,
        typical_hours: 0.0,
        label: "No Ad Boost (1x)",
    },
    AdBoost {
        multiplier: 20.0,
        typical_hours: 4.0,
        label: "20x Ad Boost",
    },
    AdBoost {
        multiplier: 30.0,
        typical_hours: 6.0,
        label: "30x Ad Boost",
    },
    AdBoost {
        multiplier: 50.0,
        typical_hours: 8.0,
        label: "50x Super Rent Boost",
    },
];

/// User-chosen temporary boost: multiplier active for part of each day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostSetting {
    pub multiplier: f64,
    pub hours_active: f64,
}

impl BoostSetting {
    /// Build a setting, clamping inputs into their valid domain.
    ///
    /// Non-finite or sub-unit multipliers fall back to 1x; hours are clamped to `[0, 24]`.
    pub fn new(multiplier: f64, hours_active: f64) -> Self {
        let multiplier = if multiplier.is_finite() && multiplier >= 1.0 {
            multiplier
        } else {
            1.0
        };
        let hours_active = if hours_active.is_finite() {
            hours_active.clamp(0.0, HOURS_PER_DAY)
        } else {
            0.0
        };
        Self {
            multiplier,
            hours_active,
        }
    }

    /// A multiplier that stays on around the clock.
    pub fn always_on(multiplier: f64) -> Self {
        Self::new(multiplier, HOURS_PER_DAY)
    }

    /// Use an ad boost for its typical session length.
    pub fn from_ad(ad: &AdBoost) -> Self {
        Self::new(ad.multiplier, ad.typical_hours)
    }

    /// Scale a pre-boost daily amount by this boost's active share of the day.
    pub fn apply_daily(self, daily_before_boost: f64) -> f64 {
        let hourly = daily_before_boost / HOURS_PER_DAY;
        let boosted = hourly * self.hours_active * self.multiplier;
        let unboosted = hourly * (HOURS_PER_DAY - self.hours_active);
        boosted + unboosted
    }
}

pub fn ad_boost_for_multiplier(multiplier: f64) -> Option<&'static AdBoost> {
    AD_BOOSTS
        .iter()
        .find(|ad| (ad.multiplier - multiplier).abs() < f64::EPSILON)
}
