use serde::{Deserialize, Serialize};

use crate::badge::{self, BADGE_UNIT_COST, MAYOR_PAYOUT_PER_BADGE};
use crate::boost::BoostSetting;
use crate::parcel::ParcelTier;
use crate::yields::{Projection, YieldResult, daily_yield, projections};

/// Common parcels one legendary parcel's price would buy.
const COMMONS_PER_LEGENDARY: u64 = 25;

/// Below this share of commons the portfolio is flagged as inefficient.
const MIN_COMMON_RATIO: f64 = 0.7;

/// Portfolio value above which running without any boost is called out.
const LARGE_PORTFOLIO_COST: f64 = 1000.0;

/// Largest quantity held for a single tier.
pub const MAX_QUANTITY: u64 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub tier: ParcelTier,
    pub quantity: u64,
}

/// One holding per parcel tier, in tier order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    holdings: Vec<Holding>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            holdings: ParcelTier::ALL
                .into_iter()
                .map(|tier| Holding { tier, quantity: 0 })
                .collect(),
        }
    }
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary `(tier, quantity)` input; repeated tiers accumulate.
    pub fn from_quantities(entries: impl IntoIterator<Item = (ParcelTier, i64)>) -> Self {
        let mut portfolio = Self::default();
        for (tier, quantity) in entries {
            let current = i64::try_from(portfolio.quantity(tier)).unwrap_or(i64::MAX);
            portfolio.set_quantity(tier, current.saturating_add(quantity));
        }
        portfolio
    }

    /// Replace a tier's quantity, clamped into `0..=MAX_QUANTITY`.
    pub fn set_quantity(&mut self, tier: ParcelTier, quantity: i64) {
        let quantity = u64::try_from(quantity).unwrap_or(0).min(MAX_QUANTITY);
        if let Some(holding) = self.holdings.iter_mut().find(|h| h.tier == tier) {
            holding.quantity = quantity;
        }
    }

    pub fn quantity(&self, tier: ParcelTier) -> u64 {
        self.holdings
            .iter()
            .find(|h| h.tier == tier)
            .map_or(0, |h| h.quantity)
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }
}

fn total_quantity(holdings: &[Holding]) -> u64 {
    holdings
        .iter()
        .fold(0, |total: u64, h| total.saturating_add(h.quantity))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub tier: ParcelTier,
    pub quantity: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub holdings: Vec<Holding>,
    pub permanent_bonus_fraction: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<BoostSetting>,
    pub total_quantity: u64,
    /// Un-multiplied rent per second across all holdings.
    pub base_rate_per_second: f64,
    #[serde(flatten)]
    pub yields: YieldResult,
    pub distribution: Vec<DistributionEntry>,
    pub projections: Vec<Projection>,
}

/// Roll up every holding into one projection.
///
/// Bonus and boost are applied once to the combined rate, not per tier.
pub fn aggregate(
    holdings: &[Holding],
    permanent_bonus_fraction: f64,
    boost: Option<BoostSetting>,
) -> PortfolioSummary {
    let (total_cost, base_rate_per_second) =
        holdings.iter().fold((0.0, 0.0), |(cost, rate), holding| {
            let quantity = holding.quantity as f64;
            (
                cost + holding.tier.cost() as f64 * quantity,
                rate + holding.tier.yield_per_second() * quantity,
            )
        });

    let per_day = daily_yield(base_rate_per_second, permanent_bonus_fraction, boost);
    let total_quantity = total_quantity(holdings);
    let yields = YieldResult::from_daily(per_day, total_cost);

    PortfolioSummary {
        holdings: holdings.to_vec(),
        permanent_bonus_fraction,
        boost,
        total_quantity,
        base_rate_per_second,
        yields,
        distribution: distribution(holdings, total_quantity),
        projections: projections(yields.per_day, yields.total_cost),
    }
}

fn distribution(holdings: &[Holding], total_quantity: u64) -> Vec<DistributionEntry> {
    if total_quantity == 0 {
        return Vec::new();
    }
    holdings
        .iter()
        .filter(|h| h.quantity > 0)
        .map(|h| DistributionEntry {
            tier: h.tier,
            quantity: h.quantity,
            percentage: h.quantity as f64 / total_quantity as f64 * 100.0,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Info,
    Warning,
    Alert,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: String,
}

impl Suggestion {
    fn new(kind: SuggestionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Rule-based hints for improving a portfolio.
pub fn suggestions(summary: &PortfolioSummary) -> Vec<Suggestion> {
    let total = summary.total_quantity;
    if total == 0 {
        return vec![Suggestion::new(
            SuggestionKind::Info,
            "Start by adding your current parcel holdings to see personalized analytics.",
        )];
    }

    let quantity_of = |tier: ParcelTier| {
        summary
            .holdings
            .iter()
            .filter(|h| h.tier == tier)
            .fold(0, |total: u64, h| total.saturating_add(h.quantity))
    };

    let mut out = Vec::new();

    let common_ratio = quantity_of(ParcelTier::Common) as f64 / total as f64;
    if common_ratio < MIN_COMMON_RATIO {
        out.push(Suggestion::new(
            SuggestionKind::Warning,
            "Consider increasing Common parcels - they provide the best efficiency per Atlas Buck invested.",
        ));
    }

    let legendary = quantity_of(ParcelTier::Legendary);
    if legendary > 0 {
        let legendary_rate = ParcelTier::Legendary.yield_per_second();
        let common_rate = ParcelTier::Common.yield_per_second() * COMMONS_PER_LEGENDARY as f64;
        out.push(Suggestion::new(
            SuggestionKind::Alert,
            format!(
                "Your {legendary} Legendary parcel(s) could be {} Common parcels, providing {:.2}x more rent!",
                legendary.saturating_mul(COMMONS_PER_LEGENDARY),
                common_rate / legendary_rate
            ),
        ));
    }

    let unboosted = summary
        .boost
        .is_none_or(|boost| boost.multiplier <= 1.0 || boost.hours_active <= 0.0);
    if unboosted && summary.yields.total_cost > LARGE_PORTFOLIO_COST {
        out.push(Suggestion::new(
            SuggestionKind::Info,
            "With a large portfolio, consider investing in boost levels for increased returns.",
        ));
    }

    if let Some(tip) = badge_tip(summary.permanent_bonus_fraction) {
        out.push(tip);
    }

    out
}

fn badge_tip(bonus_fraction: f64) -> Option<Suggestion> {
    let index = badge::tier_index_for_bonus(bonus_fraction)?;
    let current = badge::tier(index);
    let top = badge::tier(badge::max_tier_index());

    if index == 0 {
        let first = badge::tier(1);
        return Some(Suggestion::new(
            SuggestionKind::Info,
            format!(
                "Consider purchasing badges ({BADGE_UNIT_COST} AB each) for permanent rent bonuses. Start with {} total rent.",
                first.description
            ),
        ));
    }

    if index == badge::max_tier_index() {
        return Some(Suggestion::new(
            SuggestionKind::Success,
            format!(
                "Excellent! You have {} rent bonus. As mayor, earn {MAYOR_PAYOUT_PER_BADGE} AB per badge sold in your jurisdiction.",
                current.description
            ),
        ));
    }

    let next = badge::tier(index + 1);
    let message = if index + 1 == badge::max_tier_index() {
        format!(
            "You have {}. Reach {} for the maximum rent bonus!",
            current.description, next.description
        )
    } else {
        format!(
            "You have {}. Invest in more badges to reach {}, up to {}.",
            current.description, next.description, top.description
        )
    };
    Some(Suggestion::new(SuggestionKind::Info, message))
}
