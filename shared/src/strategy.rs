use serde::{Deserialize, Serialize};

use crate::badge::{self, BADGE_UNIT_COST};
use crate::boost::BoostSetting;
use crate::parcel::ParcelTier;
use crate::yields::{break_even_days, daily_yield, efficiency};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    MaxCheapestTier,
    UpgradeThenAllocate,
}

/// A candidate way to spend a budget, scored by daily rent per Atlas Buck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub kind: StrategyKind,
    pub name: String,
    pub investment: u64,
    pub parcel_tier: ParcelTier,
    pub parcel_count: u64,
    pub badges_bought: u64,
    pub bonus_fraction: f64,
    pub daily_yield: f64,
    #[serde(default)]
    pub break_even_days: Option<f64>,
    pub efficiency: f64,
    pub rationale: String,
}

struct Allocation {
    parcel_count: u64,
    badges_bought: u64,
    badge_cost: u64,
    bonus_fraction: f64,
}

fn score(
    kind: StrategyKind,
    name: String,
    rationale: String,
    allocation: Allocation,
    boost: Option<BoostSetting>,
) -> Strategy {
    let tier = ParcelTier::cheapest();
    let investment = allocation.badge_cost + allocation.parcel_count * tier.cost();
    let rate = tier.yield_per_second() * allocation.parcel_count as f64;
    let daily = daily_yield(rate, allocation.bonus_fraction, boost);
    Strategy {
        kind,
        name,
        investment,
        parcel_tier: tier,
        parcel_count: allocation.parcel_count,
        badges_bought: allocation.badges_bought,
        bonus_fraction: allocation.bonus_fraction,
        daily_yield: daily,
        break_even_days: break_even_days(investment as f64, daily),
        efficiency: efficiency(daily, investment as f64),
        rationale,
    }
}

fn boost_clause(boost: Option<BoostSetting>) -> String {
    boost.map_or_else(String::new, |boost| {
        format!(
            " + {}h of {}x ad boosts daily",
            boost.hours_active, boost.multiplier
        )
    })
}

fn max_cheapest_tier(
    budget: u64,
    current_tier_index: usize,
    boost: Option<BoostSetting>,
) -> Option<Strategy> {
    let tier = ParcelTier::cheapest();
    let count = budget / tier.cost();
    if count == 0 {
        return None;
    }

    let current = badge::tier(current_tier_index);
    let has_badges = current_tier_index > 0;
    let name = if has_badges {
        format!("{count}x {} Parcels ({})", tier.label(), current.description)
    } else {
        format!("{count}x {} Parcels", tier.label())
    };
    let badge_clause = if has_badges {
        format!(
            " with existing {} ({:.0}% bonus)",
            current.description,
            current.bonus_fraction * 100.0
        )
    } else {
        String::new()
    };
    let rationale = format!(
        "Maximum parcels strategy - {count} {}s{badge_clause}{}",
        tier.label(),
        boost_clause(boost)
    );

    Some(score(
        StrategyKind::MaxCheapestTier,
        name,
        rationale,
        Allocation {
            parcel_count: count,
            badges_bought: 0,
            badge_cost: 0,
            bonus_fraction: current.bonus_fraction,
        },
        boost,
    ))
}

fn upgrade_then_allocate(
    budget: u64,
    current_tier_index: usize,
    boost: Option<BoostSetting>,
) -> Option<Strategy> {
    if budget < BADGE_UNIT_COST {
        return None;
    }
    let upgrade = badge::upgrade_cost(current_tier_index)?;
    if upgrade.additional_badges_needed == 0 {
        return None;
    }

    let tier = ParcelTier::cheapest();
    let remaining = budget.checked_sub(upgrade.cost)?;
    let count = remaining / tier.cost();
    if count == 0 {
        return None;
    }

    let target = badge::tier(upgrade.target_tier_index);
    let name = format!(
        "Upgrade to {} + {count}x {}",
        target.description,
        tier.label()
    );
    let rationale = format!(
        "Buy {} additional badges to reach {} + {count} {}s{}",
        upgrade.additional_badges_needed,
        target.description,
        tier.label(),
        boost_clause(boost)
    );

    Some(score(
        StrategyKind::UpgradeThenAllocate,
        name,
        rationale,
        Allocation {
            parcel_count: count,
            badges_bought: upgrade.additional_badges_needed,
            badge_cost: upgrade.cost,
            bonus_fraction: target.bonus_fraction,
        },
        boost,
    ))
}

/// Candidate allocations of `budget`, best efficiency first.
///
/// Equal efficiencies keep generation order.
pub fn generate_strategies(
    budget: u64,
    current_tier_index: usize,
    boost: Option<BoostSetting>,
) -> Vec<Strategy> {
    let current_tier_index = current_tier_index.min(badge::max_tier_index());
    let mut strategies: Vec<Strategy> = [
        max_cheapest_tier(budget, current_tier_index, boost),
        upgrade_then_allocate(budget, current_tier_index, boost),
    ]
    .into_iter()
    .flatten()
    .collect();

    rank_by_efficiency(&mut strategies);
    strategies
}

/// Stable: equal efficiencies keep their relative order.
fn rank_by_efficiency(strategies: &mut [Strategy]) {
    strategies.sort_by(|a, b| b.efficiency.total_cmp(&a.efficiency));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_sorted_descending(strategies: &[Strategy]) -> bool {
        strategies
            .windows(2)
            .all(|pair| pair[0].efficiency >= pair[1].efficiency)
    }

    #[test]
    fn tiny_budget_yields_no_strategies() {
        assert!(generate_strategies(99, 0, None).is_empty());
    }

    #[test]
    fn budget_below_badge_cost_only_buys_parcels() {
        let strategies = generate_strategies(150, 0, None);
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].kind, StrategyKind::MaxCheapestTier);
        assert_eq!(strategies[0].parcel_count, 1);
        assert_eq!(strategies[0].investment, 100);
    }

    #[test]
    fn upgrade_needs_remaining_budget_for_a_parcel() {
        // Tier 0 -> 1 costs 10 badges = 2000 AB; 2050 leaves too little for a parcel.
        let strategies = generate_strategies(2050, 0, None);
        assert!(
            strategies
                .iter()
                .all(|s| s.kind != StrategyKind::UpgradeThenAllocate)
        );

        let strategies = generate_strategies(2100, 0, None);
        let upgrade = strategies
            .iter()
            .find(|s| s.kind == StrategyKind::UpgradeThenAllocate)
            .expect("upgrade strategy should be offered");
        assert_eq!(upgrade.badges_bought, 10);
        assert_eq!(upgrade.parcel_count, 1);
        assert_eq!(upgrade.investment, 2100);
        assert!((upgrade.bonus_fraction - 0.05).abs() < 1e-12);
    }

    #[test]
    fn max_tier_never_offers_upgrade() {
        let strategies = generate_strategies(1_000_000, badge::max_tier_index(), None);
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].kind, StrategyKind::MaxCheapestTier);
        assert!(strategies[0].name.contains("101+ badges"));
    }

    #[test]
    fn parcels_beat_badge_upgrade_on_efficiency() {
        let strategies = generate_strategies(10_000, 0, Some(BoostSetting::new(20.0, 4.0)));
        assert_eq!(strategies.len(), 2);
        assert!(is_sorted_descending(&strategies));
        assert_eq!(strategies[0].kind, StrategyKind::MaxCheapestTier);
        assert!(strategies[0].rationale.contains("4h of 20x ad boosts daily"));
    }

    #[test]
    fn strategies_are_always_sorted() {
        let boost = Some(BoostSetting::new(50.0, 8.0));
        for budget in [100, 1_000, 5_000, 25_000, 250_000] {
            for tier in 0..=badge::max_tier_index() {
                let strategies = generate_strategies(budget, tier, boost);
                assert!(is_sorted_descending(&strategies));
            }
        }
    }

    #[test]
    fn ranking_keeps_generation_order_on_ties() {
        let mut strategies = generate_strategies(10_000, 0, None);
        assert_eq!(strategies.len(), 2);
        for strategy in &mut strategies {
            strategy.efficiency = 0.25;
        }
        let generated: Vec<StrategyKind> = strategies.iter().map(|s| s.kind).collect();

        rank_by_efficiency(&mut strategies);
        let ranked: Vec<StrategyKind> = strategies.iter().map(|s| s.kind).collect();
        assert_eq!(ranked, generated);

        strategies.reverse();
        let reversed: Vec<StrategyKind> = strategies.iter().map(|s| s.kind).collect();
        rank_by_efficiency(&mut strategies);
        let ranked: Vec<StrategyKind> = strategies.iter().map(|s| s.kind).collect();
        assert_eq!(ranked, reversed);
    }

    #[test]
    fn ranking_puts_higher_efficiency_first() {
        let mut strategies = generate_strategies(10_000, 0, None);
        strategies[1].efficiency = strategies[0].efficiency + 1.0;
        let expected = strategies[1].kind;
        rank_by_efficiency(&mut strategies);
        assert_eq!(strategies[0].kind, expected);
    }

    #[test]
    fn idle_boost_is_still_described() {
        let strategies = generate_strategies(500, 0, Some(BoostSetting::new(1.0, 0.0)));
        assert!(strategies[0].rationale.ends_with(" + 0h of 1x ad boosts daily"));

        let strategies = generate_strategies(500, 0, None);
        assert!(!strategies[0].rationale.contains("ad boosts"));
    }

    #[test]
    fn current_bonus_feeds_the_parcel_strategy() {
        let base = generate_strategies(1_000, 0, None);
        let badged = generate_strategies(1_000, 3, None);
        let base = &base[0];
        let badged = badged
            .iter()
            .find(|s| s.kind == StrategyKind::MaxCheapestTier)
            .expect("parcel strategy");
        assert!((badged.daily_yield - base.daily_yield * 1.15).abs() < 1e-15);
        assert!(badged.rationale.contains("(15% bonus)"));
    }
}
