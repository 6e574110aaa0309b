//! The resolved limit of one table request

use crate::filter::FilterSet;
use crate::page::Page;
use crate::sort::Sort;
use reinhardt_tables_params::{ParameterStore, TableScope};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Pagination, sort and filter directives of one request
///
/// A limit is owned by the request that resolved it and is never shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
	page: Page,
	sort: Sort,
	filter_set: FilterSet,
	exported: bool,
	paginated: bool,
	total_rows: usize,
}

/// Slice of the row collection shown for the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
	/// First row (0-indexed, inclusive)
	pub start: usize,
	/// Last row (exclusive)
	pub end: usize,
	/// Rows per page in effect
	pub rows_displayed: usize,
}

impl RowWindow {
	/// Returns the window as a range
	pub fn range(&self) -> Range<usize> {
		self.start..self.end
	}

	/// Number of rows in the window
	pub fn len(&self) -> usize {
		self.end - self.start
	}

	/// Returns true if the window holds no rows
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}
}

impl Default for Limit {
	fn default() -> Self {
		Self::new(Page::first(), Sort::unsorted(), FilterSet::default(), false)
	}
}

impl Limit {
	/// Creates a limit with pagination enabled and no rows counted yet
	pub fn new(page: Page, sort: Sort, filter_set: FilterSet, exported: bool) -> Self {
		Self {
			page,
			sort,
			filter_set,
			exported,
			paginated: true,
			total_rows: 0,
		}
	}

	/// Sets whether rows are split into pages at all
	pub fn with_pagination(mut self, paginated: bool) -> Self {
		self.paginated = paginated;
		self
	}

	/// Requested page
	pub fn page(&self) -> &Page {
		&self.page
	}

	/// Requested sort
	pub fn sort(&self) -> &Sort {
		&self.sort
	}

	/// Requested filters
	pub fn filter_set(&self) -> &FilterSet {
		&self.filter_set
	}

	/// Returns true when rows are being exported
	pub fn is_exported(&self) -> bool {
		self.exported
	}

	/// Returns true when rows are split into pages
	pub fn is_paginated(&self) -> bool {
		self.paginated && !self.exported
	}

	/// Shorthand for [`FilterSet::is_filtered`]
	pub fn is_filtered(&self) -> bool {
		self.filter_set.is_filtered()
	}

	/// Shorthand for [`FilterSet::is_cleared`]
	pub fn is_cleared(&self) -> bool {
		self.filter_set.is_cleared()
	}

	/// Shorthand for [`Sort::is_sorted`]
	pub fn is_sorted(&self) -> bool {
		self.sort.is_sorted()
	}

	/// Number of rows left after filtering
	pub fn total_rows(&self) -> usize {
		self.total_rows
	}

	/// Records the number of rows left after filtering
	pub fn set_total_rows(&mut self, total_rows: usize) {
		self.total_rows = total_rows;
	}

	/// Rows per page in effect for a table configured with `default_rows`
	///
	/// Exports and unpaginated tables show every row.
	pub fn rows_displayed(&self, default_rows: usize) -> usize {
		if !self.is_paginated() {
			return self.total_rows;
		}

		self.page
			.size_override()
			.map(|size| size as usize)
			.unwrap_or(default_rows)
	}

	/// Computes the row slice of the requested page
	///
	/// The window is clamped to the available rows: a page past the end yields
	/// an empty window rather than an error.
	pub fn row_window(&self, default_rows: usize) -> RowWindow {
		let total = self.total_rows;
		let rows_displayed = self.rows_displayed(default_rows);

		if !self.is_paginated() || rows_displayed == 0 {
			return RowWindow {
				start: 0,
				end: total,
				rows_displayed: total,
			};
		}

		let page_index = (self.page.number() as usize).saturating_sub(1);
		let start = page_index.saturating_mul(rows_displayed).min(total);
		let end = start.saturating_add(rows_displayed).min(total);
		RowWindow {
			start,
			end,
			rows_displayed,
		}
	}

	/// Number of pages for a table configured with `default_rows`
	pub fn total_pages(&self, default_rows: usize) -> usize {
		let rows_displayed = self.rows_displayed(default_rows);
		if self.total_rows == 0 || rows_displayed == 0 {
			0
		} else {
			self.total_rows.div_ceil(rows_displayed)
		}
	}

	/// Writes this limit back to table parameters
	///
	/// Resolving the returned parameters with the same scope and export flag
	/// yields a limit equal to this one.
	pub fn to_parameters(&self, scope: &TableScope) -> ParameterStore {
		let mut params = ParameterStore::new();

		params.set(scope.page_key(), self.page.number().to_string());
		if let Some(size) = self.page.size_override() {
			params.set(scope.rows_displayed_key(), size.to_string());
		}

		if self.sort.is_sorted() {
			params.set(scope.sort_key(self.sort.alias()), self.sort.order().token());
			if self.sort.property() != self.sort.alias() {
				params.set(scope.alias_key(self.sort.alias()), self.sort.property());
			}
		}

		for filter in self.filter_set.filters() {
			params.set(scope.filter_key(filter.alias()), filter.value());
			if filter.property() != filter.alias() {
				params.set(scope.alias_key(filter.alias()), filter.property());
			}
		}
		if let Some(token) = self.filter_set.action().token() {
			params.set(scope.filter_action_key(), token);
		}

		params
	}
}
