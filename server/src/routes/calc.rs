use atlas_shared::analytics::{self, AnalyticsDay, DEFAULT_HISTORY_DAYS};
use atlas_shared::badge::{self, BADGE_TIERS, BADGE_UNIT_COST, MAYOR_PAYOUT_PER_BADGE};
use atlas_shared::boost::{AD_BOOSTS, HOURS_PER_DAY, ad_boost_for_multiplier};
use atlas_shared::export::export_file_name;
use atlas_shared::parcel::rate_table;
use atlas_shared::portfolio::{self, Portfolio};
use atlas_shared::strategy::generate_strategies;
use atlas_shared::yields::{self, PROJECTION_HORIZONS, compute_yield};
use atlas_shared::{
    BadgeProgress, BadgeRecommendation, BoostSetting, ParcelTier, PortfolioExport,
    PortfolioSummary, Strategy, Suggestion, TierUpgrade, YieldResult,
};
use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::Response;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::auth::AuthUser;
use crate::config::MAX_BUDGET;
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_STRATEGY_BUDGET: u64 = 1000;
const DEFAULT_STRATEGY_BOOST: f64 = 20.0;
const DEFAULT_STRATEGY_BOOST_HOURS: f64 = 4.0;

/// Lenient numeric parsing: blank, malformed or non-finite input becomes `default`.
fn parse_f64(raw: Option<&str>, default: f64) -> f64 {
    raw.map(str::trim)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(default)
}

/// Whole, non-negative amount; fractions truncate and negatives clamp to zero.
fn parse_amount(raw: Option<&str>, default: u64) -> u64 {
    let value = parse_f64(raw, default as f64);
    if value <= 0.0 {
        0
    } else {
        (value.floor() as u64).min(MAX_BUDGET)
    }
}

fn parse_tier_index(raw: Option<&str>) -> Option<usize> {
    let value = parse_f64(raw, f64::NAN);
    value
        .is_finite()
        .then(|| badge::clamp_tier_index(value.floor() as i64))
}

/// Boost from an optional multiplier; hours default to the whole day.
fn parse_boost(multiplier: Option<&str>, hours: Option<&str>) -> Option<BoostSetting> {
    let multiplier = parse_f64(multiplier, f64::NAN);
    if !multiplier.is_finite() {
        return None;
    }
    let hours = parse_f64(hours, HOURS_PER_DAY);
    Some(BoostSetting::new(multiplier, hours))
}

fn resolve_bonus(bonus: Option<&str>, badge_tier: Option<&str>) -> f64 {
    match parse_tier_index(badge_tier) {
        Some(index) => badge::tier(index).bonus_fraction,
        None => yields::sanitize_bonus(parse_f64(bonus, 0.0)),
    }
}

#[derive(Serialize)]
pub struct TablesResponse {
    pub parcels: Vec<atlas_shared::parcel::ParcelRate>,
    pub badge_tiers: &'static [atlas_shared::BadgeTier],
    pub badge_unit_cost: u64,
    pub mayor_payout_per_badge: u64,
    pub ad_boosts: &'static [atlas_shared::AdBoost],
    pub projection_horizons: &'static [u32],
}

pub async fn get_tables() -> Json<TablesResponse> {
    Json(TablesResponse {
        parcels: rate_table(),
        badge_tiers: &BADGE_TIERS,
        badge_unit_cost: BADGE_UNIT_COST,
        mayor_payout_per_badge: MAYOR_PAYOUT_PER_BADGE,
        ad_boosts: &AD_BOOSTS,
        projection_horizons: &PROJECTION_HORIZONS,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct YieldQuery {
    pub tier: Option<String>,
    pub quantity: Option<String>,
    pub bonus: Option<String>,
    pub badge_tier: Option<String>,
    pub boost: Option<String>,
    pub hours: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct YieldResponse {
    pub tier: ParcelTier,
    pub quantity: f64,
    pub permanent_bonus_fraction: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<BoostSetting>,
    #[serde(flatten)]
    pub result: YieldResult,
}

pub async fn get_yield(
    State(state): State<AppState>,
    Query(query): Query<YieldQuery>,
) -> Result<Json<YieldResponse>, ApiError> {
    state.observability.record_calc_request();
    let tier = match query.tier.as_deref() {
        None => ParcelTier::Common,
        Some(name) => ParcelTier::from_name(name)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown parcel tier: {name}")))?,
    };
    let quantity = yields::sanitize_quantity(parse_f64(query.quantity.as_deref(), 1.0));
    let bonus = resolve_bonus(query.bonus.as_deref(), query.badge_tier.as_deref());
    let boost = parse_boost(query.boost.as_deref(), query.hours.as_deref());

    Ok(Json(YieldResponse {
        tier,
        quantity,
        permanent_bonus_fraction: bonus,
        boost,
        result: compute_yield(tier, quantity, bonus, boost),
    }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct HoldingInput {
    pub tier: ParcelTier,
    #[serde(default)]
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioRequest {
    #[serde(default)]
    pub holdings: Vec<HoldingInput>,
    #[serde(default)]
    pub bonus: f64,
    #[serde(default)]
    pub badge_tier: Option<i64>,
    #[serde(default)]
    pub boost: Option<f64>,
    #[serde(default)]
    pub hours: Option<f64>,
}

impl PortfolioRequest {
    fn summarize(&self) -> PortfolioSummary {
        let portfolio =
            Portfolio::from_quantities(self.holdings.iter().map(|h| (h.tier, h.quantity)));
        let bonus = match self.badge_tier {
            Some(index) => badge::tier(badge::clamp_tier_index(index)).bonus_fraction,
            None => yields::sanitize_bonus(self.bonus),
        };
        let hours = self.hours.unwrap_or(HOURS_PER_DAY);
        let boost = self
            .boost
            .map(|multiplier| BoostSetting::new(multiplier, hours));
        portfolio::aggregate(portfolio.holdings(), bonus, boost)
    }
}

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub summary: PortfolioSummary,
    pub suggestions: Vec<Suggestion>,
}

pub async fn post_portfolio(
    State(state): State<AppState>,
    Json(request): Json<PortfolioRequest>,
) -> Json<PortfolioResponse> {
    state.observability.record_calc_request();
    let summary = request.summarize();
    let suggestions = portfolio::suggestions(&summary);
    Json(PortfolioResponse {
        summary,
        suggestions,
    })
}

pub async fn post_portfolio_export(
    State(state): State<AppState>,
    Json(request): Json<PortfolioRequest>,
) -> Result<Response, ApiError> {
    state.observability.record_calc_request();
    let now = Utc::now();
    let export = PortfolioExport::new(now, request.summarize());
    let json = export.to_pretty_json().map_err(|e| {
        error!(error = %e, "failed to serialize portfolio export");
        ApiError::Internal
    })?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(now.date_naive())
    );
    let mut response = Response::new(Body::from(json));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendQuery {
    pub budget: Option<String>,
}

pub async fn get_badge_recommendation(
    State(state): State<AppState>,
    Query(query): Query<RecommendQuery>,
) -> Json<BadgeRecommendation> {
    state.observability.record_calc_request();
    Json(badge::recommend_for_budget(parse_amount(
        query.budget.as_deref(),
        0,
    )))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpgradeQuery {
    pub tier: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpgradeResponse {
    pub current_tier_index: usize,
    pub upgrade: Option<TierUpgrade>,
}

pub async fn get_badge_upgrade(
    State(state): State<AppState>,
    Query(query): Query<UpgradeQuery>,
) -> Json<UpgradeResponse> {
    state.observability.record_calc_request();
    let current_tier_index = parse_tier_index(query.tier.as_deref()).unwrap_or(0);
    Json(UpgradeResponse {
        current_tier_index,
        upgrade: badge::upgrade_cost(current_tier_index),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct ProgressQuery {
    pub badges: Option<String>,
    pub monthly_rent: Option<String>,
    /// Badges sold inside a mayor's jurisdiction.
    pub badges_sold: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub progress: BadgeProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mayor_payout: Option<u64>,
}

pub async fn get_badge_progress(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> Json<ProgressResponse> {
    state.observability.record_calc_request();
    let badges = parse_amount(query.badges.as_deref(), 0);
    let monthly_rent = parse_f64(query.monthly_rent.as_deref(), 100.0);
    let mayor_payout = query
        .badges_sold
        .as_deref()
        .map(|sold| badge::mayor_payout(parse_amount(Some(sold), 0)));
    Json(ProgressResponse {
        progress: badge::badge_progress(badges, monthly_rent),
        mayor_payout,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct StrategyQuery {
    pub budget: Option<String>,
    pub tier: Option<String>,
    pub boost: Option<String>,
    pub hours: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StrategyResponse {
    pub budget: u64,
    pub current_tier_index: usize,
    pub current_bonus_fraction: f64,
    pub from_profile: bool,
    pub boost: BoostSetting,
    pub strategies: Vec<Strategy>,
}

/// Without explicit hours, a known ad multiplier runs for its typical session length.
fn strategy_boost(multiplier: Option<&str>, hours: Option<&str>) -> BoostSetting {
    let multiplier = parse_f64(multiplier, DEFAULT_STRATEGY_BOOST);
    let hours = parse_f64(hours, f64::NAN);
    if hours.is_finite() {
        return BoostSetting::new(multiplier, hours);
    }
    ad_boost_for_multiplier(multiplier).map_or_else(
        || BoostSetting::new(multiplier, DEFAULT_STRATEGY_BOOST_HOURS),
        BoostSetting::from_ad,
    )
}

/// Rank candidate allocations; the saved profile supplies the badge tier when none is given.
pub async fn get_strategies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StrategyQuery>,
) -> Result<Json<StrategyResponse>, ApiError> {
    state.observability.record_calc_request();
    let budget = parse_amount(query.budget.as_deref(), DEFAULT_STRATEGY_BUDGET);
    let boost = strategy_boost(query.boost.as_deref(), query.hours.as_deref());

    let explicit_tier = parse_tier_index(query.tier.as_deref());
    let (current_tier_index, current_bonus_fraction, from_profile) = match explicit_tier {
        Some(index) => (index, badge::tier(index).bonus_fraction, false),
        None => match AuthUser::from_headers(&headers, &state.auth_header) {
            Some(user) => {
                state.observability.record_profile_read();
                let profile = state.profiles.get_or_create(&user.id).await.map_err(|e| {
                    state.observability.record_store_failure();
                    error!(error = %e, user_id = %user.id, "failed to load profile for strategies");
                    ApiError::Internal
                })?;
                (
                    profile.current_badge_tier_index,
                    profile.badge_bonus_fraction(),
                    true,
                )
            }
            None => (0, badge::tier(0).bonus_fraction, false),
        },
    };

    let strategies = generate_strategies(budget, current_tier_index, Some(boost));
    debug!(
        budget,
        current_tier_index,
        from_profile,
        candidates = strategies.len(),
        "generated strategies"
    );

    Ok(Json(StrategyResponse {
        budget,
        current_tier_index,
        current_bonus_fraction,
        from_profile,
        boost,
        strategies,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<String>,
    pub seed: Option<String>,
}

pub async fn get_mock_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Json<Vec<AnalyticsDay>> {
    state.observability.record_calc_request();
    let today = Utc::now().date_naive();
    let days = u32::try_from(parse_amount(
        query.days.as_deref(),
        u64::from(DEFAULT_HISTORY_DAYS),
    ))
    .unwrap_or(DEFAULT_HISTORY_DAYS);
    let seed = parse_amount(
        query.seed.as_deref(),
        u64::try_from(today.num_days_from_ce()).unwrap_or(0),
    );
    Json(analytics::mock_history(today, days, seed))
}
