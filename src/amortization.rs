use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// static repayment terms of a flat-rate loan
///
/// interest is computed once on the original principal for the full tenor
/// and never reduces as the balance is paid down; historical ledgers were
/// computed this way and the model must match them exactly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FlatTerms {
    pub total_interest: Money,
    pub total_amount: Money,
    pub per_installment: Money,
}

impl FlatTerms {
    /// derive terms from principal, flat percent rate, and tenor
    ///
    /// inputs that are not yet valid (form mid-entry) produce a zeroed
    /// result instead of an error so live previews never fail
    pub fn compute(principal: Money, rate: Rate, installment_count: u32) -> Self {
        if !principal.is_positive() || rate.is_negative() || installment_count == 0 {
            return Self::default();
        }

        let count = Decimal::from(installment_count);
        let interest = principal.as_decimal() * rate.as_decimal() * count;
        let total = principal.as_decimal() + interest;

        Self {
            total_interest: Money::from_decimal(interest),
            total_amount: Money::from_decimal(total),
            per_installment: Money::from_decimal(total / count),
        }
    }

    /// true when the inputs were not computable
    pub fn is_zeroed(&self) -> bool {
        self.total_amount.is_zero()
    }
}
