//! Table errors

use crate::settings::SettingsError;
use reinhardt_tables_limit::LimitError;
use reinhardt_tables_params::StateError;
use reinhardt_tables_rows::{ColumnError, ExportError, RetrievalError};

/// Errors that end a table request
///
/// Per-row problems are not errors; they are reported in
/// [`PipelineDiagnostics`](reinhardt_tables_rows::PipelineDiagnostics).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TableError {
	/// A page or rows displayed parameter is malformed
	#[error("Invalid table parameter: {0}")]
	Parse(#[from] LimitError),

	/// The row source failed
	#[error(transparent)]
	Retrieval(#[from] RetrievalError),

	/// The persisted-state store failed
	#[error("Table state store error: {0}")]
	State(#[from] StateError),

	/// The table is configured inconsistently with the request
	#[error("Inconsistent table configuration: {0}")]
	StateConsistency(#[from] ExportError),

	/// The columns cannot be assembled
	#[error("Invalid column configuration: {0}")]
	Column(#[from] ColumnError),

	/// The settings are invalid
	#[error("Invalid table settings: {0}")]
	Settings(#[from] SettingsError),
}

/// Result type for table operations
pub type Result<T> = std::result::Result<T, TableError>;
