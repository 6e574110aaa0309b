//! Calculation errors

use thiserror::Error;

/// Errors raised while resolving calculations
///
/// None of them ends a request: an unresolvable calculation yields an absent
/// [`CalcResult`](crate::CalcResult) value.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
	/// No calculator is registered under the name
	#[error("Unknown calculator: {0}")]
	UnknownCalculator(String),
}
