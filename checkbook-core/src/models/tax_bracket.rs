use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One federal bracket: income in `(lower, upper]` is taxed at `rate`.
/// The top bracket is open-ended (`upper` is `None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalBracket {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}
