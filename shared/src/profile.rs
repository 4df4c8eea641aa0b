use serde::{Deserialize, Serialize};

use crate::badge;

/// Saved player state, one record per authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub current_currency_balance: u64,
    pub total_parcels: u64,
    pub current_badge_tier_index: usize,
    pub is_mayor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl UserProfile {
    pub fn badge_bonus_fraction(&self) -> f64 {
        badge::tier(self.current_badge_tier_index).bonus_fraction
    }
}

/// Full-record replacement payload. Every field is required.
///
/// Values arrive as signed integers so out-of-range input can be clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub current_currency_balance: i64,
    pub total_parcels: i64,
    pub current_badge_tier_index: i64,
    pub is_mayor: bool,
}

impl ProfileUpdate {
    /// Clamp into a storable profile: counts to `>= 0`, tier index into the badge table.
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            current_currency_balance: u64::try_from(self.current_currency_balance).unwrap_or(0),
            total_parcels: u64::try_from(self.total_parcels).unwrap_or(0),
            current_badge_tier_index: badge::clamp_tier_index(self.current_badge_tier_index),
            is_mayor: self.is_mayor,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_zeroed() {
        let profile = UserProfile::default();
        assert_eq!(profile.current_currency_balance, 0);
        assert_eq!(profile.total_parcels, 0);
        assert_eq!(profile.current_badge_tier_index, 0);
        assert!(!profile.is_mayor);
        assert_eq!(profile.badge_bonus_fraction(), 0.0);
    }

    #[test]
    fn update_clamps_out_of_range_values() {
        let profile = ProfileUpdate {
            current_currency_balance: -50,
            total_parcels: 12,
            current_badge_tier_index: 17,
            is_mayor: true,
        }
        .into_profile();
        assert_eq!(profile.current_currency_balance, 0);
        assert_eq!(profile.total_parcels, 12);
        assert_eq!(profile.current_badge_tier_index, badge::max_tier_index());
        assert!(profile.is_mayor);
    }

    #[test]
    fn update_requires_every_field() {
        let partial = r#"{"currentCurrencyBalance": 10, "totalParcels": 2, "isMayor": false}"#;
        assert!(serde_json::from_str::<ProfileUpdate>(partial).is_err());
    }

    #[test]
    fn profile_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(UserProfile {
            current_badge_tier_index: 2,
            ..UserProfile::default()
        })
        .expect("serialize profile");
        assert_eq!(json["currentBadgeTierIndex"], 2);
        assert_eq!(json["isMayor"], false);
        assert!(json.get("updatedAt").is_none());
    }
}
