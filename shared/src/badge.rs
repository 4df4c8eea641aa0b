use serde::{Deserialize, Serialize};

/// Price of a single badge in Atlas Bucks.
pub const BADGE_UNIT_COST: u64 = 200;

/// Atlas Bucks a mayor earns per badge bought in their jurisdiction.
pub const MAYOR_PAYOUT_PER_BADGE: u64 = 20;

/// Badge count at which the permanent bonus is maxed out.
pub const MAX_TIER_BADGES: u64 = 101;

/// Contiguous badge-count range granting a permanent rent bonus.
///
/// `max_count` of `None` marks the open-ended top tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BadgeTier {
    pub min_count: u64,
    pub max_count: Option<u64>,
    pub bonus_fraction: f64,
    pub description: &'static str,
}

impl BadgeTier {
    pub fn contains(&self, count: u64) -> bool {
        count >= self.min_count && self.max_count.is_none_or(|max| count <= max)
    }

    pub fn is_open_ended(&self) -> bool {
        self.max_count.is_none()
    }

    /// Badge count used when only the tier is known (current side of an upgrade).
    fn representative_current(&self) -> u64 {
        match self.max_count {
            Some(0) => 0,
            Some(max) => (self.min_count + max) / 2,
            None => self.min_count,
        }
    }

    /// Badge count aimed for when buying into this tier (target side of an upgrade).
    fn representative_target(&self) -> u64 {
        self.max_count.unwrap_or(self.min_count)
    }
}

/// Ordered, non-overlapping tiers covering every badge count from zero upward.
pub const BADGE_TIERS: [BadgeTier; 6] = [
    BadgeTier {
        min_count: 0,
        max_count: Some(0),
        bonus_fraction: 0.0,
        description: "No badges (0%)",
    },
    BadgeTier {
        min_count: 1,
        max_count: Some(10),
        bonus_fraction: 0.05,
        description: "1-10 badges (+5%)",
    },
    BadgeTier {
        min_count: 11,
        max_count: Some(30),
        bonus_fraction: 0.10,
        description: "11-30 badges (+10%)",
    },
    BadgeTier {
        min_count: 31,
        max_count: Some(60),
        bonus_fraction: 0.15,
        description: "31-60 badges (+15%)",
    },
    BadgeTier {
        min_count: 61,
        max_count: Some(100),
        bonus_fraction: 0.20,
        description: "61-100 badges (+20%)",
    },
    BadgeTier {
        min_count: MAX_TIER_BADGES,
        max_count: None,
        bonus_fraction: 0.25,
        description: "101+ badges (+25% MAX)",
    },
];

pub fn max_tier_index() -> usize {
    BADGE_TIERS.len() - 1
}

/// Clamp an externally supplied tier index into the table.
pub fn clamp_tier_index(index: i64) -> usize {
    usize::try_from(index.max(0))
        .unwrap_or(usize::MAX)
        .min(max_tier_index())
}

pub fn tier(index: usize) -> &'static BadgeTier {
    &BADGE_TIERS[index.min(max_tier_index())]
}

/// Index of the single tier containing `count`.
pub fn tier_index_for_count(count: u64) -> usize {
    // Tiers are sorted by `min_count`, so the last tier starting at or below `count` owns it.
    BADGE_TIERS
        .partition_point(|tier| tier.min_count <= count)
        .saturating_sub(1)
}

pub fn tier_for_count(count: u64) -> &'static BadgeTier {
    &BADGE_TIERS[tier_index_for_count(count)]
}

/// Tier whose bonus matches `bonus_fraction`, if any.
pub fn tier_index_for_bonus(bonus_fraction: f64) -> Option<usize> {
    BADGE_TIERS
        .iter()
        .position(|tier| (tier.bonus_fraction - bonus_fraction).abs() < 1e-9)
}

pub fn mayor_payout(badges_sold: u64) -> u64 {
    badges_sold.saturating_mul(MAYOR_PAYOUT_PER_BADGE)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeRecommendation {
    pub badge_count: u64,
    pub cost: u64,
    pub bonus_fraction: f64,
    pub tier_description: String,
    pub remaining_budget: u64,
    pub recommendation: String,
}

/// Largest badge purchase `budget` can cover, snapped to the best reachable tier.
pub fn recommend_for_budget(budget: u64) -> BadgeRecommendation {
    let max_affordable = budget / BADGE_UNIT_COST;
    if max_affordable == 0 {
        return BadgeRecommendation {
            badge_count: 0,
            cost: 0,
            bonus_fraction: 0.0,
            tier_description: BADGE_TIERS[0].description.to_string(),
            remaining_budget: budget,
            recommendation: format!(
                "Focus on parcels first - badges cost {BADGE_UNIT_COST} AB each"
            ),
        };
    }

    let tier = tier_for_count(max_affordable);
    let badge_count = tier
        .max_count
        .map_or(max_affordable, |max| max.min(max_affordable));
    let cost = badge_count * BADGE_UNIT_COST;

    BadgeRecommendation {
        badge_count,
        cost,
        bonus_fraction: tier.bonus_fraction,
        tier_description: tier.description.to_string(),
        remaining_budget: budget - cost,
        recommendation: format!(
            "Get {badge_count} badges for {:.0}% rent bonus ({cost} AB)",
            tier.bonus_fraction * 100.0
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierUpgrade {
    pub target_tier_index: usize,
    pub target_description: String,
    pub additional_badges_needed: u64,
    pub cost: u64,
    pub bonus_delta: f64,
}

/// Badges and Atlas Bucks needed to move from `current_tier_index` to the next tier.
///
/// Returns `None` at the top tier.
pub fn upgrade_cost(current_tier_index: usize) -> Option<TierUpgrade> {
    let current_index = current_tier_index.min(max_tier_index());
    let target_index = current_index + 1;
    let target = BADGE_TIERS.get(target_index)?;
    let current = &BADGE_TIERS[current_index];

    let additional_badges_needed = target
        .representative_target()
        .saturating_sub(current.representative_current());

    Some(TierUpgrade {
        target_tier_index: target_index,
        target_description: target.description.to_string(),
        additional_badges_needed,
        cost: additional_badges_needed * BADGE_UNIT_COST,
        bonus_delta: target.bonus_fraction - current.bonus_fraction,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeProgress {
    pub current_badges: u64,
    pub current_tier_index: usize,
    pub current_description: String,
    pub current_bonus_fraction: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_tier_index: Option<usize>,
    pub badges_needed: u64,
    pub bonus_delta: f64,
    pub extra_monthly_income: f64,
    pub investment_required: u64,
    /// Share of the way to the maxed-out tier, 0..=100.
    pub progress_percent: f64,
}

/// Where `current_badges` sits in the tier ladder and what the next step is worth.
pub fn badge_progress(current_badges: u64, monthly_rent: f64) -> BadgeProgress {
    let monthly_rent = if monthly_rent.is_finite() {
        monthly_rent.max(0.0)
    } else {
        0.0
    };
    let current_index = tier_index_for_count(current_badges);
    let current = &BADGE_TIERS[current_index];
    let next = BADGE_TIERS.get(current_index + 1);

    let badges_needed = next.map_or(0, |tier| tier.min_count.saturating_sub(current_badges));
    let bonus_delta = next.map_or(0.0, |tier| tier.bonus_fraction - current.bonus_fraction);
    let progress_percent = if current_badges >= MAX_TIER_BADGES {
        100.0
    } else {
        (current_badges as f64 / MAX_TIER_BADGES as f64 * 100.0).min(100.0)
    };

    BadgeProgress {
        current_badges,
        current_tier_index: current_index,
        current_description: current.description.to_string(),
        current_bonus_fraction: current.bonus_fraction,
        next_tier_index: next.map(|_| current_index + 1),
        badges_needed,
        bonus_delta,
        extra_monthly_income: monthly_rent * bonus_delta,
        investment_required: badges_needed * BADGE_UNIT_COST,
        progress_percent,
    }
}
