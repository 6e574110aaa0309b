//! Filter directives

use serde::{Deserialize, Serialize};

/// Action token requesting filtering
pub const FILTER_ACTION_FILTER: &str = "filter";
/// Action token requesting that all filters be cleared
pub const FILTER_ACTION_CLEAR: &str = "clear";

/// What the request asks to do with filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterAction {
	/// Apply the filters
	Filter,
	/// Drop every filter
	Clear,
	/// No action requested
	#[default]
	None,
}

impl FilterAction {
	/// Parses an action token; unknown tokens mean no action
	pub fn from_token(token: Option<&str>) -> Self {
		match token {
			Some(FILTER_ACTION_FILTER) => Self::Filter,
			Some(FILTER_ACTION_CLEAR) => Self::Clear,
			_ => Self::None,
		}
	}

	/// Returns the parameter token of this action
	pub fn token(&self) -> Option<&'static str> {
		match self {
			Self::Filter => Some(FILTER_ACTION_FILTER),
			Self::Clear => Some(FILTER_ACTION_CLEAR),
			Self::None => None,
		}
	}
}

/// Filter on one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
	alias: String,
	property: String,
	value: String,
}

impl Filter {
	/// Creates a filter on `property`, addressed externally by `alias`
	pub fn new(
		alias: impl Into<String>,
		property: impl Into<String>,
		value: impl Into<String>,
	) -> Self {
		Self {
			alias: alias.into(),
			property: property.into(),
			value: value.into(),
		}
	}

	/// Parameter-facing column identifier
	pub fn alias(&self) -> &str {
		&self.alias
	}

	/// Property path the filter applies to
	pub fn property(&self) -> &str {
		&self.property
	}

	/// Search value as entered
	pub fn value(&self) -> &str {
		&self.value
	}
}

/// Action plus the filters of one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
	action: FilterAction,
	filters: Vec<Filter>,
}

impl FilterSet {
	/// Creates a filter set
	pub fn new(action: FilterAction, filters: Vec<Filter>) -> Self {
		Self { action, filters }
	}

	/// A cleared set: action `Clear`, no filters
	pub fn cleared() -> Self {
		Self::new(FilterAction::Clear, Vec::new())
	}

	/// Requested action
	pub fn action(&self) -> FilterAction {
		self.action
	}

	/// Filters in resolution order
	pub fn filters(&self) -> &[Filter] {
		&self.filters
	}

	/// True only when the action is `Filter` and at least one filter exists
	pub fn is_filtered(&self) -> bool {
		self.action == FilterAction::Filter && !self.filters.is_empty()
	}

	/// True when the action is `Clear`
	pub fn is_cleared(&self) -> bool {
		self.action == FilterAction::Clear
	}

	/// Returns the value filtered on for `alias`, or `""`
	pub fn filter_value(&self, alias: &str) -> &str {
		self.filter(alias).map(Filter::value).unwrap_or("")
	}

	/// Returns the filter for `alias`
	pub fn filter(&self, alias: &str) -> Option<&Filter> {
		self.filters.iter().find(|filter| filter.alias == alias)
	}
}
