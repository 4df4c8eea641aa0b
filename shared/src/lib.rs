pub mod analytics;
pub mod badge;
pub mod boost;
pub mod export;
pub mod parcel;
pub mod portfolio;
pub mod profile;
pub mod strategy;
pub mod yields;

pub use badge::{BadgeProgress, BadgeRecommendation, BadgeTier, TierUpgrade};
pub use boost::{AdBoost, BoostSetting};
pub use export::PortfolioExport;
pub use parcel::ParcelTier;
pub use portfolio::{Holding, Portfolio, PortfolioSummary, Suggestion};
pub use profile::{ProfileUpdate, UserProfile};
pub use strategy::{Strategy, StrategyKind};
pub use yields::YieldResult;
