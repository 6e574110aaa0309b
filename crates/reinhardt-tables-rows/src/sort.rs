//! Null-safe row ordering

use crate::property::PropertyResolver;
use crate::value::Value;
use reinhardt_tables_limit::{Sort, SortOrder};
use std::cmp::Ordering;
use thiserror::Error;

/// Two values that cannot be ordered against each other
///
/// The pair is treated as equal.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
	/// The values have unrelated kinds
	#[error("Cannot compare {left} with {right} on property {property}")]
	KindMismatch {
		/// Sorted property
		property: String,
		/// Kind of the left value
		left: &'static str,
		/// Kind of the right value
		right: &'static str,
	},

	/// The values have no order (NaN)
	#[error("Unordered values on property {property}")]
	Unordered {
		/// Sorted property
		property: String,
	},
}

/// Compares rows on one property
///
/// Properties that cannot be read compare as null. Nulls sort high: after
/// every value in ascending order. Descending order is the exact reverse of
/// ascending, so nulls come first there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullSafeComparator {
	property: String,
	nulls_high: bool,
}

impl NullSafeComparator {
	/// Creates a comparator on `property` with nulls sorting high
	pub fn new(property: impl Into<String>) -> Self {
		Self {
			property: property.into(),
			nulls_high: true,
		}
	}

	/// Sets whether nulls sort after (`true`) or before every value
	pub fn nulls_high(mut self, nulls_high: bool) -> Self {
		self.nulls_high = nulls_high;
		self
	}

	/// Compared property
	pub fn property(&self) -> &str {
		&self.property
	}

	/// Compares two rows
	///
	/// The same row always compares equal to itself without being read.
	/// `SortOrder::None` compares everything as equal.
	///
	/// # Errors
	///
	/// Returns [`ComparisonError`] when the values cannot be ordered.
	pub fn compare<R: PropertyResolver + ?Sized>(
		&self,
		a: &R,
		b: &R,
		order: SortOrder,
	) -> Result<Ordering, ComparisonError> {
		if std::ptr::eq(a, b) || order == SortOrder::None {
			return Ok(Ordering::Equal);
		}
		let left = self.key(a);
		let right = self.key(b);
		self.compare_values(left.as_ref(), right.as_ref(), order)
	}

	/// Compares two already read values
	///
	/// # Errors
	///
	/// Returns [`ComparisonError`] when the values cannot be ordered.
	pub fn compare_values(
		&self,
		a: Option<&Value>,
		b: Option<&Value>,
		order: SortOrder,
	) -> Result<Ordering, ComparisonError> {
		let ascending = self.ascending(a, b)?;
		Ok(match order {
			SortOrder::Ascending => ascending,
			SortOrder::Descending => ascending.reverse(),
			SortOrder::None => Ordering::Equal,
		})
	}

	/// Reads the sort key of a row; unreadable properties are null
	pub fn key<R: PropertyResolver + ?Sized>(&self, row: &R) -> Option<Value> {
		row.property(&self.property).unwrap_or_default()
	}

	fn ascending(&self, a: Option<&Value>, b: Option<&Value>) -> Result<Ordering, ComparisonError> {
		let null_side = if self.nulls_high {
			Ordering::Greater
		} else {
			Ordering::Less
		};

		match (a, b) {
			(None, None) => Ok(Ordering::Equal),
			(None, Some(_)) => Ok(null_side),
			(Some(_), None) => Ok(null_side.reverse()),
			(Some(a), Some(b)) => a.natural_cmp(b).ok_or_else(|| {
				if a.is_numeric() && b.is_numeric() {
					ComparisonError::Unordered {
						property: self.property.clone(),
					}
				} else {
					ComparisonError::KindMismatch {
						property: self.property.clone(),
						left: a.kind(),
						right: b.kind(),
					}
				}
			}),
		}
	}
}

/// Stable sort of rows by a [`Sort`] directive
///
/// Pairs that cannot be compared are treated as equal and reported, so a
/// partially comparable column still yields a deterministic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortEngine {
	nulls_high: bool,
}

impl Default for SortEngine {
	fn default() -> Self {
		Self { nulls_high: true }
	}
}

impl SortEngine {
	/// Creates an engine with nulls sorting high
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets whether nulls sort after every value in ascending order
	pub fn nulls_high(mut self, nulls_high: bool) -> Self {
		self.nulls_high = nulls_high;
		self
	}

	/// Sorts `rows`, returning them with every comparison failure
	///
	/// Rows are returned untouched when the directive is unsorted.
	pub fn sort<R: PropertyResolver>(
		&self,
		rows: Vec<R>,
		sort: &Sort,
	) -> (Vec<R>, Vec<ComparisonError>) {
		if !sort.is_sorted() || rows.len() < 2 {
			return (rows, Vec::new());
		}

		let comparator = NullSafeComparator::new(sort.property()).nulls_high(self.nulls_high);
		let keyed: Vec<(Option<Value>, R)> = rows
			.into_iter()
			.map(|row| (comparator.key(&row), row))
			.collect();

		let mut failures = Vec::new();
		let mut compare = |(a, _): &(Option<Value>, R), (b, _): &(Option<Value>, R)| {
			comparator
				.compare_values(a.as_ref(), b.as_ref(), sort.order())
				.unwrap_or_else(|error| {
					failures.push(error);
					Ordering::Equal
				})
		};
		let sorted = merge_sort(keyed, &mut compare);

		if !failures.is_empty() {
			tracing::warn!(
				property = sort.property(),
				failures = failures.len(),
				first = %failures[0],
				"rows compared as equal after comparison failures"
			);
		}

		(sorted.into_iter().map(|(_, row)| row).collect(), failures)
	}
}

/// Stable top-down merge sort
///
/// Unlike the standard library sorts it accepts comparators that are not a
/// total order.
fn merge_sort<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
	F: FnMut(&T, &T) -> Ordering,
{
	if items.len() < 2 {
		return items;
	}

	let right = items.split_off(items.len() / 2);
	let left = merge_sort(items, compare);
	let right = merge_sort(right, compare);

	let mut merged = Vec::with_capacity(left.len() + right.len());
	let mut left = left.into_iter().peekable();
	let mut right = right.into_iter().peekable();
	loop {
		let take_right = match (left.peek(), right.peek()) {
			(Some(l), Some(r)) => compare(r, l) == Ordering::Less,
			(Some(_), None) => false,
			(None, Some(_)) => true,
			(None, None) => break,
		};
		let next = if take_right { right.next() } else { left.next() };
		merged.extend(next);
	}
	merged
}
