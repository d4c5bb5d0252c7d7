use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregate figures computed by the backend for a period.
///
/// Every field is optional on the wire and defaults to zero or empty.
/// Amounts are in minor units.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSummary {
    pub total_transactions: u64,
    pub successful_transactions: u64,
    pub failed_transactions: u64,
    pub pending_transactions: u64,
    pub total_amount: Decimal,
    pub average_transaction_amount: Decimal,
    pub period: String,
    pub currency: String,
}

impl AnalyticsSummary {
    pub fn has_data(&self) -> bool {
        self.total_transactions > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsPeriod {
    Day,
    Week,
    #[default]
    Month,
    Year,
    All,
}

impl AnalyticsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsPeriod::Day => "day",
            AnalyticsPeriod::Week => "week",
            AnalyticsPeriod::Month => "month",
            AnalyticsPeriod::Year => "year",
            AnalyticsPeriod::All => "all",
        }
    }
}

impl fmt::Display for AnalyticsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AnalyticsPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(AnalyticsPeriod::Day),
            "week" => Ok(AnalyticsPeriod::Week),
            "month" => Ok(AnalyticsPeriod::Month),
            "year" => Ok(AnalyticsPeriod::Year),
            "all" => Ok(AnalyticsPeriod::All),
            other => Err(format!(
                "unknown period '{other}' (expected day, week, month, year or all)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summary_defaults_missing_fields() {
        let summary: AnalyticsSummary =
            serde_json::from_str(r#"{"total_transactions": 0}"#).unwrap();
        assert_eq!(summary, AnalyticsSummary::default());
        assert!(!summary.has_data());
    }

    #[test]
    fn test_summary_accepts_numeric_amounts() {
        let summary: AnalyticsSummary = serde_json::from_str(
            r#"{"total_transactions": 4, "total_amount": 199600, "average_transaction_amount": 49900.5}"#,
        )
        .unwrap();
        assert_eq!(summary.total_amount, dec!(199600));
        assert_eq!(summary.average_transaction_amount, dec!(49900.5));
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("Week".parse::<AnalyticsPeriod>(), Ok(AnalyticsPeriod::Week));
        assert!("fortnight".parse::<AnalyticsPeriod>().is_err());
        assert_eq!(AnalyticsPeriod::default().to_string(), "month");
    }
}
