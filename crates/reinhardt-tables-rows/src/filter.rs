//! Row filtering against a [`FilterSet`]

use crate::column::{Column, ColumnSet};
use crate::format::{FormatError, ValueFormatter};
use crate::locale::Locale;
use crate::property::{PropertyError, PropertyResolver};
use reinhardt_tables_limit::FilterSet;
use thiserror::Error;

/// Failure to evaluate a filter against one row
///
/// The row is treated as not matching.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterEvaluationError {
	/// The filtered property cannot be read
	#[error("Cannot read filtered column {alias}: {source}")]
	Property {
		/// Column alias
		alias: String,
		/// Underlying error
		#[source]
		source: PropertyError,
	},

	/// The property value cannot be formatted for matching
	#[error("Cannot format filtered column {alias}: {source}")]
	Format {
		/// Column alias
		alias: String,
		/// Underlying error
		#[source]
		source: FormatError,
	},
}

/// Decides whether a row matches every column filter
///
/// Columns are visited in declaration order. A column takes part when it is
/// filterable and the filter set holds a non-blank value for its alias; the
/// first column that does not match ends evaluation. A row for which no
/// column takes part does not match.
#[derive(Clone, Copy)]
pub struct FilterPredicate<'a> {
	columns: &'a ColumnSet,
	filter_set: &'a FilterSet,
	locale: &'a Locale,
	formatter: &'a dyn ValueFormatter,
}

impl<'a> FilterPredicate<'a> {
	/// Creates a predicate
	pub fn new(
		columns: &'a ColumnSet,
		filter_set: &'a FilterSet,
		locale: &'a Locale,
		formatter: &'a dyn ValueFormatter,
	) -> Self {
		Self {
			columns,
			filter_set,
			locale,
			formatter,
		}
	}

	/// Evaluates the row
	///
	/// A null property value makes the row fail.
	///
	/// # Errors
	///
	/// Returns [`FilterEvaluationError`] when a filtered property cannot be
	/// read or formatted; callers treat the row as not matching.
	pub fn matches<R: PropertyResolver + ?Sized>(
		&self,
		row: &R,
	) -> Result<bool, FilterEvaluationError> {
		let mut evaluated = false;

		for column in self.columns.iter().filter(|column| column.is_filterable()) {
			let search = self.filter_set.filter_value(column.alias());
			if search.trim().is_empty() {
				continue;
			}

			let Some(text) = self.column_text(column, row)? else {
				return Ok(false);
			};
			if !is_search_match(&text, search) {
				return Ok(false);
			}
			evaluated = true;
		}

		Ok(evaluated)
	}

	/// Text of the column value as displayed, `None` for null
	fn column_text<R: PropertyResolver + ?Sized>(
		&self,
		column: &Column,
		row: &R,
	) -> Result<Option<String>, FilterEvaluationError> {
		let value = row
			.property(column.property())
			.map_err(|source| FilterEvaluationError::Property {
				alias: column.alias().to_string(),
				source,
			})?;
		let Some(value) = value else {
			return Ok(None);
		};

		let formatted = match column.format() {
			Some(pattern) if column.is_date() => {
				self.formatter
					.format_date(&value, column.parse(), pattern, self.locale)
			}
			Some(pattern) if column.is_currency() => {
				self.formatter.format_number(&value, pattern, self.locale)
			}
			_ => Ok(value.to_string()),
		};

		formatted
			.map(Some)
			.map_err(|source| FilterEvaluationError::Format {
				alias: column.alias().to_string(),
				source,
			})
	}
}

impl std::fmt::Debug for FilterPredicate<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FilterPredicate")
			.field("view", &self.columns.view())
			.field("filter_set", &self.filter_set)
			.field("locale", &self.locale)
			.finish_non_exhaustive()
	}
}

/// Matches a value against a search term, ignoring case and surrounding space
///
/// - `*term` matches values ending with `term`
/// - `term*` matches values starting with `term`
/// - otherwise the term, `*` included, must be contained in the value
///
/// Every `*` is dropped from the term for the first two checks.
pub fn is_search_match(value: &str, search: &str) -> bool {
	let value = value.trim().to_lowercase();
	let search = search.trim().to_lowercase();
	let bare = search.replace('*', "");

	(search.starts_with('*') && value.ends_with(&bare))
		|| (search.ends_with('*') && value.starts_with(&bare))
		|| value.contains(&search)
}
