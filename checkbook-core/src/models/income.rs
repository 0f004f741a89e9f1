use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of income a check represents.
///
/// Only [`IncomeType::SelfEmployed`] income (reported on a 1099-NEC) has
/// withholding-equivalent taxes computed in the breakdown pass; wage and
/// retirement income is treated as already withheld. An unrecognized label
/// is preserved as [`IncomeType::Other`] and takes the no-special-tax
/// branch rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeType {
    SelfEmployed,
    Wage,
    Retirement,
    Other(String),
}

impl IncomeType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::SelfEmployed => "1099-NEC",
            Self::Wage => "W-2",
            Self::Retirement => "Retirement",
            Self::Other(label) => label,
        }
    }

    /// Parses a wire label. Never fails: unknown labels become
    /// [`IncomeType::Other`].
    pub fn parse(label: &str) -> Self {
        match label {
            "1099-NEC" => Self::SelfEmployed,
            "W-2" => Self::Wage,
            "Retirement" => Self::Retirement,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_self_employed(&self) -> bool {
        matches!(self, Self::SelfEmployed)
    }
}

impl fmt::Display for IncomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One income check as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub sender: String,
    pub gross: Decimal,
    pub income_type: IncomeType,
    pub date: NaiveDate,
}
