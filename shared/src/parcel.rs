use serde::{Deserialize, Serialize};

/// Purchasable land parcel tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParcelTier {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl ParcelTier {
    /// All tiers in table order (cheapest first).
    pub const ALL: [ParcelTier; 4] = [Self::Common, Self::Rare, Self::Epic, Self::Legendary];

    /// Purchase price in Atlas Bucks.
    pub fn cost(self) -> u64 {
        match self {
            Self::Common => 100,
            Self::Rare => 500,
            Self::Epic => 1250,
            Self::Legendary => 2500,
        }
    }

    /// Rent accrued per second per parcel, in USD.
    pub fn yield_per_second(self) -> f64 {
        match self {
            Self::Common => 0.000_000_001_1,
            Self::Rare => 0.000_000_001_6,
            Self::Epic => 0.000_000_002_2,
            Self::Legendary => 0.000_000_004_4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "common" => Some(Self::Common),
            "rare" => Some(Self::Rare),
            "epic" => Some(Self::Epic),
            "legendary" => Some(Self::Legendary),
            _ => None,
        }
    }

    /// Tier with the lowest purchase price.
    pub fn cheapest() -> Self {
        Self::ALL
            .into_iter()
            .min_by_key(|tier| tier.cost())
            .unwrap_or(Self::Common)
    }
}

/// Serializable row of the rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelRate {
    pub tier: ParcelTier,
    pub name: String,
    pub cost: u64,
    pub yield_per_second: f64,
}

pub fn rate_table() -> Vec<ParcelRate> {
    ParcelTier::ALL
        .into_iter()
        .map(|tier| ParcelRate {
            tier,
            name: tier.label().to_string(),
            cost: tier.cost(),
            yield_per_second: tier.yield_per_second(),
        })
        .collect()
}
