use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::portfolio::{Holding, PortfolioSummary};

/// Downloadable snapshot of a computed portfolio. No schema versioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioExport {
    pub timestamp: String,
    pub portfolio: PortfolioSummary,
    /// Holdings with a non-zero quantity.
    pub holdings: Vec<Holding>,
}

impl PortfolioExport {
    pub fn new(timestamp: DateTime<Utc>, portfolio: PortfolioSummary) -> Self {
        let holdings = portfolio
            .holdings
            .iter()
            .filter(|h| h.quantity > 0)
            .copied()
            .collect();
        Self {
            timestamp: timestamp.to_rfc3339(),
            portfolio,
            holdings,
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("atlas-earth-portfolio-{}.json", date.format("%Y-%m-%d"))
}
