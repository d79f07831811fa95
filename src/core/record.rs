//! Investment records and the value types they are built from

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Store-assigned identifier of an investment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestmentId(pub u32);

impl Display for InvestmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InvestmentId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(InvestmentId)
            .map_err(|_| anyhow::anyhow!("Invalid investment id: {}", s))
    }
}

/// Analysis status of an investment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Excellent,
    Good,
    Average,
    Weak,
    PendingAnalysis,
    /// A label outside the known set, kept verbatim.
    Other(String),
}

impl Status {
    pub fn label(&self) -> &str {
        match self {
            Status::Excellent => "Excellent",
            Status::Good => "Good",
            Status::Average => "Average",
            Status::Weak => "Weak",
            Status::PendingAnalysis => "Pending Analysis",
            Status::Other(label) => label,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<String> for Status {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Excellent" => Status::Excellent,
            "Good" => Status::Good,
            "Average" => Status::Average,
            "Weak" => Status::Weak,
            "Pending Analysis" => Status::PendingAnalysis,
            _ => Status::Other(label),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.label().to_string()
    }
}

/// A single investment entry shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: InvestmentId,
    pub company: String,
    pub industry: String,
    pub funding_round: String,
    pub amount: String,
    pub iai_score: u8,
    pub status: Status,
    pub last_updated: String,
}

impl Investment {
    /// Numeric value of the currency-formatted amount, if it has one.
    pub fn amount_value(&self) -> Option<i64> {
        parse_amount(&self.amount)
    }
}

/// The user-editable part of a record, as captured by the investment form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentFields {
    pub company: String,
    pub industry: String,
    pub funding_round: String,
    pub amount: String,
}

impl From<&Investment> for InvestmentFields {
    fn from(investment: &Investment) -> Self {
        InvestmentFields {
            company: investment.company.clone(),
            industry: investment.industry.clone(),
            funding_round: investment.funding_round.clone(),
            amount: investment.amount.clone(),
        }
    }
}

/// Recovers the integer behind an amount such as `"$2,500,000"`.
///
/// `$` and `,` are stripped, then the leading integer is read and anything after
/// it is ignored, so `"$1,200.75"` yields `1200`. Returns `None` when no digits
/// lead the string. Digit runs too long for `i64` saturate at `i64::MAX`, keeping
/// such amounts above every representable one when sorting.
pub fn parse_amount(amount: &str) -> Option<i64> {
    let stripped: String = amount.chars().filter(|c| *c != '$' && *c != ',').collect();
    let trimmed = stripped.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // The run is all ASCII digits, so parsing can only fail on overflow.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$2,500,000"), Some(2_500_000));
        assert_eq!(parse_amount("$750,000"), Some(750_000));
        assert_eq!(parse_amount("1200.75"), Some(1200));
        assert_eq!(parse_amount("  $42 million"), Some(42));
        assert_eq!(parse_amount("-$5"), Some(-5));
        assert_eq!(parse_amount("TBD"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("$"), None);
    }

    #[test]
    fn test_parse_amount_saturates_on_huge_values() {
        let huge = format!("${}", "9".repeat(30));
        assert_eq!(parse_amount(&huge), Some(i64::MAX));
        assert_eq!(parse_amount(&format!("-{huge}")), Some(-i64::MAX));
        assert!(parse_amount(&huge) > parse_amount("$9,223,372,036,854,775,806"));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::from("Pending Analysis".to_string()), Status::PendingAnalysis);
        assert_eq!(Status::from("Weak".to_string()), Status::Weak);
        assert_eq!(
            Status::from("On Hold".to_string()),
            Status::Other("On Hold".to_string())
        );
        assert_eq!(Status::PendingAnalysis.to_string(), "Pending Analysis");
    }

    #[test]
    fn test_investment_serializes_camel_case() {
        let investment = Investment {
            id: InvestmentId(7),
            company: "Acme".to_string(),
            industry: "Tools".to_string(),
            funding_round: "Seed".to_string(),
            amount: "$10,000".to_string(),
            iai_score: 81,
            status: Status::PendingAnalysis,
            last_updated: "Oct 20, 2025".to_string(),
        };

        let json = serde_json::to_value(&investment).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["fundingRound"], "Seed");
        assert_eq!(json["iaiScore"], 81);
        assert_eq!(json["status"], "Pending Analysis");
        assert_eq!(json["lastUpdated"], "Oct 20, 2025");
    }

    #[test]
    fn test_investment_id_from_str() {
        assert_eq!("12".parse::<InvestmentId>().unwrap(), InvestmentId(12));
        assert!("abc".parse::<InvestmentId>().is_err());
    }
}
