//! Sort directive

use serde::{Deserialize, Serialize};

/// Order token meaning "ascending"
pub const SORT_ASC: &str = "asc";
/// Order token meaning "descending"
pub const SORT_DESC: &str = "desc";
/// Order token meaning "back to the unsorted default"
pub const SORT_DEFAULT: &str = "default";

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
	/// Ascending order
	Ascending,
	/// Descending order
	Descending,
	/// Leave rows in retrieval order
	#[default]
	None,
}

impl SortOrder {
	/// Parses an order token
	///
	/// Returns `None` for tokens that are neither `asc`, `desc` nor `default`.
	pub fn from_token(token: &str) -> Option<Self> {
		match token {
			SORT_ASC => Some(Self::Ascending),
			SORT_DESC => Some(Self::Descending),
			SORT_DEFAULT => Some(Self::None),
			_ => None,
		}
	}

	/// Returns the parameter token of this order
	pub fn token(&self) -> &'static str {
		match self {
			Self::Ascending => SORT_ASC,
			Self::Descending => SORT_DESC,
			Self::None => SORT_DEFAULT,
		}
	}

	/// Returns the opposite direction; `None` stays `None`
	pub fn toggle(&self) -> Self {
		match self {
			Self::Ascending => Self::Descending,
			Self::Descending => Self::Ascending,
			Self::None => Self::None,
		}
	}
}

/// Single-column sort
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
	alias: String,
	property: String,
	order: SortOrder,
}

impl Sort {
	/// Creates a sort on `property`, addressed externally by `alias`
	pub fn new(alias: impl Into<String>, property: impl Into<String>, order: SortOrder) -> Self {
		Self {
			alias: alias.into(),
			property: property.into(),
			order,
		}
	}

	/// The unsorted directive
	pub fn unsorted() -> Self {
		Self::default()
	}

	/// Parameter-facing column identifier
	pub fn alias(&self) -> &str {
		&self.alias
	}

	/// Property path the rows are ordered by
	pub fn property(&self) -> &str {
		&self.property
	}

	/// Sort direction
	pub fn order(&self) -> SortOrder {
		self.order
	}

	/// Returns true if rows must be reordered
	pub fn is_sorted(&self) -> bool {
		self.order != SortOrder::None
	}
}
