//! Limit resolution errors

use std::num::ParseIntError;
use thiserror::Error;

/// Errors raised while resolving a limit
///
/// A malformed numeric parameter fails the request; only an absent one falls
/// back to its default.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LimitError {
	/// The page parameter is not a positive integer
	#[error("Invalid page parameter `{name}`: {value:?}")]
	InvalidPage {
		/// Parameter name
		name: String,
		/// Offending value
		value: String,
		/// Underlying parse failure
		#[source]
		source: ParseIntError,
	},
	/// The rows displayed parameter is not a positive integer
	#[error("Invalid rows displayed parameter `{name}`: {value:?}")]
	InvalidRowsDisplayed {
		/// Parameter name
		name: String,
		/// Offending value
		value: String,
		/// Underlying parse failure
		#[source]
		source: ParseIntError,
	},
}

/// Result alias for limit resolution
pub type Result<T> = std::result::Result<T, LimitError>;
