//! Errors raised by the expression algebra.

use std::{error::Error, fmt};

/// Recoverable failures of expression construction, alignment and comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// Two structures that must agree in size do not.
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    /// A variable of the old basis is missing from the target basis.
    Reindex { id: u64 },
    /// The operator is not defined for this pair of expression kinds.
    UnsupportedOperands {
        operation: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
}

impl ExprError {
    pub(crate) fn dimension(context: &'static str, expected: usize, found: usize) -> Self {
        ExprError::DimensionMismatch {
            context,
            expected,
            found,
        }
    }

    pub(crate) fn unsupported(operation: &'static str, lhs: &'static str, rhs: &'static str) -> Self {
        ExprError::UnsupportedOperands {
            operation,
            lhs,
            rhs,
        }
    }

    /// Returns a stable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::DimensionMismatch { .. } => "EXPR_DIMENSION_MISMATCH",
            ExprError::Reindex { .. } => "EXPR_REINDEX",
            ExprError::UnsupportedOperands { .. } => "EXPR_UNSUPPORTED_OPERANDS",
        }
    }
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::DimensionMismatch {
                context,
                expected,
                found,
            } => write!(
                f,
                "[{}] {}: expected dimension {}, found {}",
                self.code(),
                context,
                expected,
                found
            ),
            ExprError::Reindex { id } => write!(
                f,
                "[{}] variable {} is in the old basis but not in the new one",
                self.code(),
                id
            ),
            ExprError::UnsupportedOperands { operation, lhs, rhs } => write!(
                f,
                "[{}] {} is not defined for {} and {}",
                self.code(),
                operation,
                lhs,
                rhs
            ),
        }
    }
}

impl Error for ExprError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            ExprError::dimension("rows", 1, 2).code(),
            "EXPR_DIMENSION_MISMATCH"
        );
        assert_eq!(ExprError::Reindex { id: 3 }.code(), "EXPR_REINDEX");
        assert_eq!(
            ExprError::unsupported("Plus", "K", "VarVector").code(),
            "EXPR_UNSUPPORTED_OPERANDS"
        );
    }

    #[test]
    fn test_display_names_both_operand_kinds() {
        let rendered = ExprError::unsupported("Plus", "ScalarLinearExpr", "VectorConstant").to_string();
        assert!(rendered.starts_with("[EXPR_UNSUPPORTED_OPERANDS]"));
        assert!(rendered.contains("ScalarLinearExpr"));
        assert!(rendered.contains("VectorConstant"));
    }
}
