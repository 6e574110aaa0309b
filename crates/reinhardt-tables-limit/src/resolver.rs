//! Limit resolution from table parameters

use crate::error::{LimitError, Result};
use crate::filter::{Filter, FilterAction, FilterSet};
use crate::limit::Limit;
use crate::page::Page;
use crate::sort::{Sort, SortOrder};
use reinhardt_tables_params::scope::FILTER_ACTION;
use reinhardt_tables_params::{ParameterStore, TableScope};
use std::num::NonZeroU32;

/// Derives the [`Limit`] of one table from its parameters
#[derive(Debug, Clone)]
pub struct LimitResolver<'a> {
	scope: &'a TableScope,
	exported: bool,
	paginated: bool,
}

impl<'a> LimitResolver<'a> {
	/// Creates a resolver for an interactive, paginated request
	pub fn new(scope: &'a TableScope) -> Self {
		Self {
			scope,
			exported: false,
			paginated: true,
		}
	}

	/// Sets whether this request exports the table
	pub fn exported(mut self, exported: bool) -> Self {
		self.exported = exported;
		self
	}

	/// Sets whether the table shows pagination
	pub fn paginated(mut self, paginated: bool) -> Self {
		self.paginated = paginated;
		self
	}

	/// Resolves the limit
	///
	/// When the filter action is `clear`, every filter parameter is purged from
	/// `params` and the returned set is empty with the `Clear` action kept.
	///
	/// # Errors
	///
	/// Returns [`LimitError`] when the page or rows displayed parameter is
	/// present but not a positive integer.
	pub fn resolve(&self, params: &mut ParameterStore) -> Result<Limit> {
		let page = self.page(params)?;
		let sort = self.sort(params);
		let filter_set = self.filter_set(params);

		Ok(Limit::new(page, sort, filter_set, self.exported).with_pagination(self.paginated))
	}

	/// Resolves the page directive
	///
	/// Exports always get the first page and no size override.
	pub fn page(&self, params: &ParameterStore) -> Result<Page> {
		if self.exported {
			return Ok(Page::first());
		}

		let page_key = self.scope.page_key();
		let number = match non_blank(params.get(&page_key)) {
			Some(value) => parse_positive(value).map_err(|source| LimitError::InvalidPage {
				name: page_key.clone(),
				value: value.to_string(),
				source,
			})?,
			None => NonZeroU32::MIN,
		};

		let size_override = if self.paginated {
			let rows_key = self.scope.rows_displayed_key();
			match non_blank(params.get(&rows_key)) {
				Some(value) => Some(parse_positive(value).map_err(|source| {
					LimitError::InvalidRowsDisplayed {
						name: rows_key.clone(),
						value: value.to_string(),
						source,
					}
				})?),
				None => None,
			}
		} else {
			None
		};

		Ok(Page::new(number).with_size_override(size_override))
	}

	/// Resolves the sort directive
	///
	/// Sort keys are scanned in lexicographic order and the first one with a
	/// recognized order token wins. A `default` token ends the scan with an
	/// unsorted result.
	pub fn sort(&self, params: &ParameterStore) -> Sort {
		let sort_prefix = self.scope.sort_prefix();

		for (alias, token) in params.scoped(&sort_prefix) {
			match SortOrder::from_token(token) {
				Some(SortOrder::None) => {
					tracing::debug!(table_id = self.scope.table_id(), alias, "sort reset to default");
					break;
				}
				Some(order) => return Sort::new(alias, self.property(params, alias), order),
				None => {
					tracing::warn!(
						table_id = self.scope.table_id(),
						alias,
						token,
						"ignoring unknown sort order"
					);
				}
			}
		}

		Sort::unsorted()
	}

	/// Resolves the filter set, purging filter parameters on `clear`
	pub fn filter_set(&self, params: &mut ParameterStore) -> FilterSet {
		let filter_prefix = self.scope.filter_prefix();

		let mut action = FilterAction::None;
		let mut filters = Vec::new();
		for (alias, value) in params.scoped(&filter_prefix) {
			if alias == FILTER_ACTION {
				action = FilterAction::from_token(Some(value));
				continue;
			}
			filters.push(Filter::new(alias, self.property(params, alias), value));
		}

		let filter_set = FilterSet::new(action, filters);
		if filter_set.is_cleared() {
			let removed = params.remove_prefixed(&filter_prefix);
			tracing::debug!(
				table_id = self.scope.table_id(),
				removed,
				"filters cleared"
			);
			return FilterSet::cleared();
		}

		filter_set
	}

	/// Maps an alias to its bean property through the alias parameter
	fn property(&self, params: &ParameterStore, alias: &str) -> String {
		match non_blank(params.get(&self.scope.alias_key(alias))) {
			Some(property) => property.to_string(),
			None => alias.to_string(),
		}
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.trim().is_empty())
}

fn parse_positive(value: &str) -> std::result::Result<NonZeroU32, std::num::ParseIntError> {
	value.trim().parse::<NonZeroU32>()
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn scope() -> TableScope {
		TableScope::new("ec_", "t_")
	}

	fn params(pairs: &[(&str, &str)]) -> ParameterStore {
		pairs.iter().copied().collect()
	}

	#[rstest]
	fn test_defaults_when_absent(scope: TableScope) {
		let limit = LimitResolver::new(&scope)
			.resolve(&mut ParameterStore::new())
			.unwrap();
		assert_eq!(limit.page().number(), 1);
		assert_eq!(limit.page().size_override(), None);
		assert!(!limit.is_sorted());
		assert!(!limit.is_filtered());
		assert!(!limit.is_exported());
	}

	#[rstest]
	#[case("abc")]
	#[case("0")]
	#[case("-2")]
	#[case("1.5")]
	fn test_malformed_page_is_an_error(scope: TableScope, #[case] value: &str) {
		let mut store = params(&[("ec_t_page", value)]);
		let error = LimitResolver::new(&scope).resolve(&mut store).unwrap_err();
		assert!(matches!(error, LimitError::InvalidPage { value: ref got, .. } if got == value));
	}

	#[rstest]
	fn test_malformed_rows_is_an_error(scope: TableScope) {
		let mut store = params(&[("ec_t_rows", "many")]);
		let error = LimitResolver::new(&scope).resolve(&mut store).unwrap_err();
		assert!(matches!(error, LimitError::InvalidRowsDisplayed { .. }));
	}

	#[rstest]
	fn test_export_forces_first_page(scope: TableScope) {
		let mut store = params(&[("ec_t_page", "7"), ("ec_t_rows", "50")]);
		let limit = LimitResolver::new(&scope)
			.exported(true)
			.resolve(&mut store)
			.unwrap();
		assert_eq!(limit.page().number(), 1);
		assert_eq!(limit.page().size_override(), None);
		assert!(limit.is_exported());
	}

	#[rstest]
	fn test_export_ignores_malformed_page(scope: TableScope) {
		let mut store = params(&[("ec_t_page", "oops")]);
		let limit = LimitResolver::new(&scope).exported(true).resolve(&mut store);
		assert!(limit.is_ok());
	}

	#[rstest]
	fn test_sort_resolves_alias(scope: TableScope) {
		let store = params(&[
			("ec_t_sort.city", "asc"),
			("ec_t_alias.city", "address.city"),
		]);
		let sort = LimitResolver::new(&scope).sort(&store);
		assert_eq!(sort, Sort::new("city", "address.city", SortOrder::Ascending));
	}

	#[rstest]
	fn test_blank_alias_falls_back_to_key(scope: TableScope) {
		let store = params(&[("ec_t_sort.city", "desc"), ("ec_t_alias.city", " ")]);
		let sort = LimitResolver::new(&scope).sort(&store);
		assert_eq!(sort.property(), "city");
	}

	#[rstest]
	fn test_first_sort_key_in_lexicographic_order_wins(scope: TableScope) {
		let store = params(&[("ec_t_sort.zip", "desc"), ("ec_t_sort.age", "asc")]);
		let sort = LimitResolver::new(&scope).sort(&store);
		assert_eq!(sort.alias(), "age");
		assert_eq!(sort.order(), SortOrder::Ascending);
	}

	#[rstest]
	fn test_default_token_short_circuits(scope: TableScope) {
		let store = params(&[("ec_t_sort.age", "default"), ("ec_t_sort.zip", "desc")]);
		let sort = LimitResolver::new(&scope).sort(&store);
		assert!(!sort.is_sorted());
	}

	#[rstest]
	fn test_unknown_sort_token_is_skipped(scope: TableScope) {
		let store = params(&[("ec_t_sort.age", "sideways"), ("ec_t_sort.zip", "desc")]);
		let sort = LimitResolver::new(&scope).sort(&store);
		assert_eq!(sort.alias(), "zip");
	}

	#[rstest]
	fn test_filter_set(scope: TableScope) {
		let mut store = params(&[
			("ec_t_filter.action", "filter"),
			("ec_t_filter.name", "bob"),
			("ec_t_filter.city", "par*"),
			("ec_t_filter.empty", "  "),
			("ec_t_alias.city", "address.city"),
		]);
		let filter_set = LimitResolver::new(&scope).filter_set(&mut store);

		assert_eq!(filter_set.action(), FilterAction::Filter);
		assert!(filter_set.is_filtered());
		assert_eq!(
			filter_set.filters(),
			&[
				Filter::new("city", "address.city", "par*"),
				Filter::new("name", "name", "bob"),
			]
		);
	}

	#[rstest]
	fn test_clear_purges_filter_parameters(scope: TableScope) {
		let mut store = params(&[
			("ec_t_filter.action", "clear"),
			("ec_t_filter.name", "bob"),
			("ec_t_page", "2"),
		]);
		let filter_set = LimitResolver::new(&scope).filter_set(&mut store);

		assert!(filter_set.is_cleared());
		assert!(!filter_set.is_filtered());
		assert!(filter_set.filters().is_empty());
		assert_eq!(store, params(&[("ec_t_page", "2")]));
	}

	fn limit_parameters() -> impl Strategy<Value = Vec<(String, String)>> {
		let key = prop_oneof![
			Just("ec_t_page".to_string()),
			Just("ec_t_rows".to_string()),
			Just("ec_t_filter.action".to_string()),
			"ec_t_sort\\.[a-c]{1,2}",
			"ec_t_filter\\.[a-c]{1,2}",
			"ec_t_alias\\.[a-c]{1,2}",
		];
		let value = prop_oneof![
			"[1-9][0-9]{0,2}",
			Just("asc".to_string()),
			Just("desc".to_string()),
			Just("default".to_string()),
			Just("filter".to_string()),
			Just("clear".to_string()),
			"[a-z*]{0,4}",
		];
		proptest::collection::vec((key, value), 0..10)
	}

	proptest! {
		#[test]
		fn prop_clear_always_yields_empty_filters(
			filters in proptest::collection::vec(("[a-z]{1,5}", "[a-z]{1,5}"), 0..6),
		) {
			let scope = TableScope::new("ec_", "t_");
			let mut store: ParameterStore = filters
				.into_iter()
				.map(|(alias, value)| (scope.filter_key(&alias), value))
				.collect();
			store.set(scope.filter_action_key(), "clear");

			let filter_set = LimitResolver::new(&scope).filter_set(&mut store);
			prop_assert!(!filter_set.is_filtered());
			prop_assert!(filter_set.filters().is_empty());
			prop_assert!(store.names().all(|name| !name.starts_with("ec_t_filter.")));
		}

		#[test]
		fn prop_limit_parameter_round_trip(pairs in limit_parameters(), exported in any::<bool>()) {
			let scope = TableScope::new("ec_", "t_");
			let mut store: ParameterStore = pairs.into_iter().collect();
			let resolver = LimitResolver::new(&scope).exported(exported);

			if let Ok(limit) = resolver.resolve(&mut store) {
				let mut written = limit.to_parameters(&scope);
				let again = resolver.resolve(&mut written).unwrap();
				prop_assert_eq!(again, limit);
			}
		}
	}
}
