//! Lookout TxBuilder: draft validation

use bigdecimal::{BigDecimal, Zero};
use lookout_common::{format_ada, Lovelace};
use thiserror::Error;

use crate::draft::TransactionDraft;

/// Why a draft cannot be exported yet. Variants are listed in the order
/// they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No inputs selected")]
    NoInputs,

    #[error("No outputs defined")]
    NoOutputs,

    #[error("All outputs must have an address")]
    MissingOutputAddress,

    #[error("All outputs must have an amount > 0")]
    NonPositiveOutputAmount,

    #[error("Insufficient funds. Need {} more ADA", shortfall_ada(.shortfall))]
    InsufficientFunds { shortfall: Lovelace },
}

fn shortfall_ada(shortfall: &Lovelace) -> String {
    format_ada(i128::from(*shortfall), 2)
}

/// Check a draft against precomputed totals
pub fn validate_draft(
    draft: &TransactionDraft,
    total_input: Lovelace,
    total_output: Lovelace,
    fee: Lovelace,
) -> Result<(), ValidationError> {
    if draft.inputs.is_empty() {
        return Err(ValidationError::NoInputs);
    }
    if draft.outputs.is_empty() {
        return Err(ValidationError::NoOutputs);
    }
    if draft.outputs.iter().any(|output| output.address.trim().is_empty()) {
        return Err(ValidationError::MissingOutputAddress);
    }
    if draft.outputs.iter().any(|output| output.amount_ada <= BigDecimal::zero()) {
        return Err(ValidationError::NonPositiveOutputAmount);
    }

    let required = u128::from(total_output) + u128::from(fee);
    let available = u128::from(total_input);
    if available < required {
        let shortfall = Lovelace::try_from(required - available).unwrap_or(Lovelace::MAX);
        return Err(ValidationError::InsufficientFunds { shortfall });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_message_rounds_to_cents() {
        let err = ValidationError::InsufficientFunds { shortfall: 83_906 };
        assert_eq!(err.to_string(), "Insufficient funds. Need 0.08 more ADA");

        let err = ValidationError::InsufficientFunds {
            shortfall: 1_005_000,
        };
        assert_eq!(err.to_string(), "Insufficient funds. Need 1.01 more ADA");
    }

    #[test]
    fn empty_draft_reports_no_inputs() {
        let draft = TransactionDraft::default();
        assert_eq!(
            validate_draft(&draft, 0, 0, 0),
            Err(ValidationError::NoInputs)
        );
    }
}
