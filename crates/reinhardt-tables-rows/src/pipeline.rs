//! Retrieve, filter, sort and paginate rows
//!
//! ## Example
//!
//! ```
//! use reinhardt_tables_limit::Limit;
//! use reinhardt_tables_rows::{
//!     CollectionSource, ColumnSet, Locale, PatternFormatter, ProcessRows, RetrievalContext,
//!     RowPipeline,
//! };
//! use serde_json::json;
//!
//! let source = CollectionSource::new((0..25).map(|i| json!({"id": i})).collect());
//! let columns = ColumnSet::new("html");
//! let locale = Locale::default();
//! let callbacks = ProcessRows::new(&columns, &locale, &PatternFormatter);
//!
//! let mut limit = Limit::default();
//! let processed = RowPipeline::new(&source, &callbacks, &callbacks)
//!     .rows_displayed(10)
//!     .process(&RetrievalContext::new("people"), &mut limit)
//!     .unwrap();
//!
//! assert_eq!(limit.total_rows(), 25);
//! assert_eq!(processed.page_rows().len(), 10);
//! ```

use crate::column::ColumnSet;
use crate::filter::{FilterEvaluationError, FilterPredicate};
use crate::format::ValueFormatter;
use crate::locale::Locale;
use crate::property::PropertyResolver;
use crate::sort::{ComparisonError, SortEngine};
use reinhardt_tables_limit::{Limit, RowWindow};
use std::error::Error as StdError;
use thiserror::Error;

/// Failure of a row source
///
/// Retrieval failures end the request and are never retried here.
#[derive(Debug, Error)]
#[error("Failed to retrieve rows: {message}")]
pub struct RetrievalError {
	message: String,
	#[source]
	source: Option<Box<dyn StdError + Send + Sync>>,
}

impl RetrievalError {
	/// Creates an error with a message
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			source: None,
		}
	}

	/// Creates an error wrapping its cause
	pub fn with_source(
		message: impl Into<String>,
		source: impl Into<Box<dyn StdError + Send + Sync>>,
	) -> Self {
		Self {
			message: message.into(),
			source: Some(source.into()),
		}
	}

	/// Error message
	pub fn message(&self) -> &str {
		&self.message
	}
}

/// What a row source is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalContext<'a> {
	table_id: &'a str,
	source: Option<&'a str>,
	scope: Option<&'a str>,
}

impl<'a> RetrievalContext<'a> {
	/// Creates a context for `table_id`
	pub fn new(table_id: &'a str) -> Self {
		Self {
			table_id,
			source: None,
			scope: None,
		}
	}

	/// Sets the descriptor naming the collection to read
	pub fn with_source(mut self, source: &'a str) -> Self {
		self.source = Some(source);
		self
	}

	/// Sets where the collection lives (request, session, application, ...)
	pub fn with_scope(mut self, scope: &'a str) -> Self {
		self.scope = Some(scope);
		self
	}

	/// Table the rows are for
	pub fn table_id(&self) -> &'a str {
		self.table_id
	}

	/// Collection descriptor
	pub fn source(&self) -> Option<&'a str> {
		self.source
	}

	/// Scope hint
	pub fn scope(&self) -> Option<&'a str> {
		self.scope
	}
}

/// Supplies the rows of a table
pub trait RowSource<R> {
	/// Returns a finite, possibly empty, collection of rows
	///
	/// # Errors
	///
	/// Returns [`RetrievalError`] when the rows cannot be read.
	fn retrieve(&self, context: &RetrievalContext<'_>) -> Result<Vec<R>, RetrievalError>;
}

impl<R, F> RowSource<R> for F
where
	F: Fn(&RetrievalContext<'_>) -> Result<Vec<R>, RetrievalError>,
{
	fn retrieve(&self, context: &RetrievalContext<'_>) -> Result<Vec<R>, RetrievalError> {
		self(context)
	}
}

/// Row source handing out copies of an in-memory collection
#[derive(Debug, Clone, Default)]
pub struct CollectionSource<R> {
	rows: Vec<R>,
}

impl<R> CollectionSource<R> {
	/// Wraps `rows`
	pub fn new(rows: Vec<R>) -> Self {
		Self { rows }
	}
}

impl<R: Clone> RowSource<R> for CollectionSource<R> {
	fn retrieve(&self, _context: &RetrievalContext<'_>) -> Result<Vec<R>, RetrievalError> {
		Ok(self.rows.clone())
	}
}

/// A row that failed filter evaluation and was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
	/// Position of the row in the retrieved collection
	pub index: usize,
	/// Why evaluation failed
	pub error: FilterEvaluationError,
}

/// Outcome of the filter stage
#[derive(Debug, Clone)]
pub struct Filtered<R> {
	/// Matching rows, in input order
	pub rows: Vec<R>,
	/// Rows left out because evaluation failed
	pub failures: Vec<RowFailure>,
}

/// Outcome of the sort stage
#[derive(Debug, Clone)]
pub struct Sorted<R> {
	/// Ordered rows
	pub rows: Vec<R>,
	/// Pairs compared as equal because they could not be ordered
	pub failures: Vec<ComparisonError>,
}

/// Filter stage callback
pub trait FilterRows<R> {
	/// Keeps the rows matching the limit's filters
	fn filter_rows(&self, limit: &Limit, rows: Vec<R>) -> Filtered<R>;
}

/// Sort stage callback
pub trait SortRows<R> {
	/// Orders rows by the limit's sort
	fn sort_rows(&self, limit: &Limit, rows: Vec<R>) -> Sorted<R>;
}

/// Default filter and sort callbacks
///
/// Filters with [`FilterPredicate`] over the table's columns and sorts with
/// [`SortEngine`].
#[derive(Clone, Copy)]
pub struct ProcessRows<'a> {
	columns: &'a ColumnSet,
	locale: &'a Locale,
	formatter: &'a dyn ValueFormatter,
	nulls_high: bool,
}

impl<'a> ProcessRows<'a> {
	/// Creates callbacks for a table
	pub fn new(columns: &'a ColumnSet, locale: &'a Locale, formatter: &'a dyn ValueFormatter) -> Self {
		Self {
			columns,
			locale,
			formatter,
			nulls_high: true,
		}
	}

	/// Sets whether nulls sort after every value in ascending order
	pub fn nulls_high(mut self, nulls_high: bool) -> Self {
		self.nulls_high = nulls_high;
		self
	}
}

impl std::fmt::Debug for ProcessRows<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ProcessRows")
			.field("view", &self.columns.view())
			.field("locale", &self.locale)
			.field("nulls_high", &self.nulls_high)
			.finish_non_exhaustive()
	}
}

impl<R: PropertyResolver> FilterRows<R> for ProcessRows<'_> {
	fn filter_rows(&self, limit: &Limit, rows: Vec<R>) -> Filtered<R> {
		let predicate = FilterPredicate::new(self.columns, limit.filter_set(), self.locale, self.formatter);

		let mut kept = Vec::with_capacity(rows.len());
		let mut failures = Vec::new();
		for (index, row) in rows.into_iter().enumerate() {
			match predicate.matches(&row) {
				Ok(true) => kept.push(row),
				Ok(false) => {}
				Err(error) => {
					tracing::warn!(index, %error, "row left out after filter evaluation failure");
					failures.push(RowFailure { index, error });
				}
			}
		}

		Filtered {
			rows: kept,
			failures,
		}
	}
}

impl<R: PropertyResolver> SortRows<R> for ProcessRows<'_> {
	fn sort_rows(&self, limit: &Limit, rows: Vec<R>) -> Sorted<R> {
		let (rows, failures) = SortEngine::new()
			.nulls_high(self.nulls_high)
			.sort(rows, limit.sort());
		Sorted { rows, failures }
	}
}

/// Per-row problems recovered while processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineDiagnostics {
	/// Rows left out because filter evaluation failed
	pub filter_failures: Vec<RowFailure>,
	/// Row pairs compared as equal because they could not be ordered
	pub sort_failures: Vec<ComparisonError>,
}

impl PipelineDiagnostics {
	/// Returns true if nothing went wrong
	pub fn is_clean(&self) -> bool {
		self.filter_failures.is_empty() && self.sort_failures.is_empty()
	}
}

/// Rows after processing
#[derive(Debug, Clone)]
pub struct ProcessedRows<R> {
	rows: Vec<R>,
	window: RowWindow,
	diagnostics: PipelineDiagnostics,
}

impl<R> ProcessedRows<R> {
	/// Every filtered and sorted row, across all pages
	pub fn rows(&self) -> &[R] {
		&self.rows
	}

	/// Rows of the requested page
	pub fn page_rows(&self) -> &[R] {
		&self.rows[self.window.range()]
	}

	/// Window of the requested page
	pub fn window(&self) -> RowWindow {
		self.window
	}

	/// Recovered per-row problems
	pub fn diagnostics(&self) -> &PipelineDiagnostics {
		&self.diagnostics
	}

	/// Consumes the result, returning the rows of the requested page
	pub fn into_page_rows(mut self) -> Vec<R> {
		self.rows.truncate(self.window.end);
		self.rows.drain(..self.window.start);
		self.rows
	}

	/// Consumes the result, returning every row
	pub fn into_rows(self) -> Vec<R> {
		self.rows
	}
}

/// Runs rows through retrieve, filter, sort and paginate
pub struct RowPipeline<'a, R> {
	source: &'a dyn RowSource<R>,
	filter: &'a dyn FilterRows<R>,
	sort: &'a dyn SortRows<R>,
	rows_displayed: usize,
}

impl<'a, R> RowPipeline<'a, R> {
	/// Creates a pipeline showing 15 rows per page
	pub fn new(
		source: &'a dyn RowSource<R>,
		filter: &'a dyn FilterRows<R>,
		sort: &'a dyn SortRows<R>,
	) -> Self {
		Self {
			source,
			filter,
			sort,
			rows_displayed: 15,
		}
	}

	/// Sets the page size used when the request does not override it
	pub fn rows_displayed(mut self, rows_displayed: usize) -> Self {
		self.rows_displayed = rows_displayed;
		self
	}

	/// Processes one request
	///
	/// Filtering runs only for a filtered, not cleared, limit and sorting only
	/// for a sorted one. The number of rows left after filtering is recorded
	/// on `limit`.
	///
	/// # Errors
	///
	/// Returns the [`RetrievalError`] of the row source unchanged.
	pub fn process(
		&self,
		context: &RetrievalContext<'_>,
		limit: &mut Limit,
	) -> Result<ProcessedRows<R>, RetrievalError> {
		let mut rows = self.source.retrieve(context)?;
		let mut diagnostics = PipelineDiagnostics::default();

		if limit.is_filtered() && !limit.is_cleared() {
			let filtered = self.filter.filter_rows(limit, rows);
			rows = filtered.rows;
			diagnostics.filter_failures = filtered.failures;
		}

		if limit.is_sorted() {
			let sorted = self.sort.sort_rows(limit, rows);
			rows = sorted.rows;
			diagnostics.sort_failures = sorted.failures;
		}

		limit.set_total_rows(rows.len());
		let window = limit.row_window(self.rows_displayed);
		tracing::debug!(
			table_id = context.table_id(),
			total_rows = rows.len(),
			start = window.start,
			end = window.end,
			filter_failures = diagnostics.filter_failures.len(),
			sort_failures = diagnostics.sort_failures.len(),
			"rows processed"
		);

		Ok(ProcessedRows {
			rows,
			window,
			diagnostics,
		})
	}
}

impl<R> std::fmt::Debug for RowPipeline<'_, R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RowPipeline")
			.field("rows_displayed", &self.rows_displayed)
			.finish_non_exhaustive()
	}
}
