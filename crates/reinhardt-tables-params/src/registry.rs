//! Parameter registry
//!
//! The registry holds every parameter a table needs for one request, whether
//! it drives the table (page, sort, filter, export) or is user defined.

use crate::scope::TableScope;
use crate::state::{StateError, StateMode, StateStore};
use crate::store::ParameterStore;

/// Builds the parameter store of one table for one request
#[derive(Debug, Clone)]
pub struct ParameterRegistry<'a> {
	scope: &'a TableScope,
	state_mode: StateMode,
	state_attr: String,
	auto_include_parameters: bool,
}

impl<'a> ParameterRegistry<'a> {
	/// Creates a registry for `scope` with persisted state enabled
	pub fn new(scope: &'a TableScope) -> Self {
		Self {
			scope,
			state_mode: StateMode::default(),
			state_attr: "state".to_string(),
			auto_include_parameters: false,
		}
	}

	/// Sets when persisted state is consulted
	pub fn state_mode(mut self, mode: StateMode) -> Self {
		self.state_mode = mode;
		self
	}

	/// Sets the name of the state attribute
	///
	/// In [`StateMode::Notify`] saved state is only restored when the request
	/// carries a non-blank parameter with this name.
	pub fn state_attr(mut self, attr: impl Into<String>) -> Self {
		self.state_attr = attr.into();
		self
	}

	/// Sets whether parameters outside the table namespace are kept
	pub fn auto_include_parameters(mut self, include: bool) -> Self {
		self.auto_include_parameters = include;
		self
	}

	/// Returns the scope this registry resolves for
	pub fn scope(&self) -> &TableScope {
		self.scope
	}

	/// Resolves the parameter store for this request
	///
	/// Table-scoped parameters of the request win outright. Only when the
	/// request carries none are the saved ones restored; old and new table
	/// state are never merged. The resolved table-scoped parameters are written
	/// back to `state` before user-defined parameters are merged on top.
	///
	/// User-defined parameters overwrite table-scoped ones with the same name.
	pub fn resolve(
		&self,
		raw: &ParameterStore,
		state: &dyn StateStore,
	) -> Result<ParameterStore, StateError> {
		let mut table_parameters = ParameterStore::new();
		let mut user_parameters = ParameterStore::new();

		for (name, values) in raw {
			if TableScope::is_throwaway_parameter(name) {
				continue;
			}

			if self.scope.is_table_parameter(name) {
				table_parameters.insert(name.clone(), values.clone());
			} else if self.auto_include_parameters {
				user_parameters.insert(name.clone(), values.clone());
			}
		}

		let mut parameters = self.handle_state(raw, table_parameters, state)?;
		parameters.extend(user_parameters);
		Ok(parameters)
	}

	fn handle_state(
		&self,
		raw: &ParameterStore,
		table_parameters: ParameterStore,
		state: &dyn StateStore,
	) -> Result<ParameterStore, StateError> {
		let table_id = self.scope.table_id();

		if self.state_mode == StateMode::Disabled {
			return Ok(table_parameters);
		}

		let mut resolved = table_parameters;
		if resolved.is_empty() && self.should_restore(raw) {
			if let Some(saved) = state.load(table_id, &self.state_attr)? {
				tracing::debug!(
					table_id,
					parameters = saved.len(),
					"restoring persisted table state"
				);
				resolved = saved;
			}
		}

		state.save(table_id, &resolved)?;
		Ok(resolved)
	}

	fn should_restore(&self, raw: &ParameterStore) -> bool {
		match self.state_mode {
			StateMode::Persist => true,
			StateMode::Notify => raw
				.get(&self.state_attr)
				.is_some_and(|value| !value.trim().is_empty()),
			StateMode::Disabled => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scope::{EXPORT_TABLE_ID, TABLE_INSTANCE};
	use crate::state::{MemoryStateStore, NoopStateStore};
	use proptest::prelude::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn scope() -> TableScope {
		TableScope::new("", "t_")
	}

	fn store(pairs: &[(&str, &str)]) -> ParameterStore {
		pairs.iter().copied().collect()
	}

	#[rstest]
	fn test_partitions_table_and_user_parameters(scope: TableScope) {
		let raw = store(&[
			("t_page", "2"),
			("t_sort.name", "asc"),
			("q", "search"),
			(EXPORT_TABLE_ID, "t_"),
			(TABLE_INSTANCE, "1"),
		]);

		let resolved = ParameterRegistry::new(&scope)
			.resolve(&raw, &NoopStateStore)
			.unwrap();
		assert_eq!(resolved, store(&[("t_page", "2"), ("t_sort.name", "asc")]));

		let resolved = ParameterRegistry::new(&scope)
			.auto_include_parameters(true)
			.resolve(&raw, &NoopStateStore)
			.unwrap();
		assert_eq!(
			resolved,
			store(&[("q", "search"), ("t_page", "2"), ("t_sort.name", "asc")])
		);
	}

	#[rstest]
	fn test_fresh_parameters_win_without_merge(scope: TableScope) {
		let state = MemoryStateStore::new();
		state
			.save("t_", &store(&[("t_page", "9"), ("t_filter.name", "bob")]))
			.unwrap();

		let resolved = ParameterRegistry::new(&scope)
			.resolve(&store(&[("t_page", "2")]), &state)
			.unwrap();

		assert_eq!(resolved, store(&[("t_page", "2")]));
		// write-through
		assert_eq!(
			state.load("t_", "state").unwrap(),
			Some(store(&[("t_page", "2")]))
		);
	}

	#[rstest]
	fn test_user_parameters_overwrite_restored_state(scope: TableScope) {
		let state = MemoryStateStore::new();
		state
			.save("t_", &store(&[("t_page", "3"), ("other", "saved")]))
			.unwrap();

		let resolved = ParameterRegistry::new(&scope)
			.auto_include_parameters(true)
			.resolve(&store(&[("other", "fresh")]), &state)
			.unwrap();

		assert_eq!(resolved.get("t_page"), Some("3"));
		assert_eq!(resolved.get("other"), Some("fresh"));
	}

	#[rstest]
	#[case(StateMode::Notify, &[("q", "x")], None)]
	#[case(StateMode::Notify, &[("state", "true")], Some("4"))]
	#[case(StateMode::Disabled, &[], None)]
	#[case(StateMode::Persist, &[], Some("4"))]
	fn test_state_modes(
		scope: TableScope,
		#[case] mode: StateMode,
		#[case] raw: &[(&str, &str)],
		#[case] expected_page: Option<&str>,
	) {
		let state = MemoryStateStore::new();
		state.save("t_", &store(&[("t_page", "4")])).unwrap();

		let resolved = ParameterRegistry::new(&scope)
			.state_mode(mode)
			.resolve(&store(raw), &state)
			.unwrap();
		assert_eq!(resolved.get("t_page"), expected_page);
	}

	#[rstest]
	fn test_disabled_mode_does_not_save(scope: TableScope) {
		let state = MemoryStateStore::new();
		ParameterRegistry::new(&scope)
			.state_mode(StateMode::Disabled)
			.resolve(&store(&[("t_page", "2")]), &state)
			.unwrap();
		assert!(state.is_empty());
	}

	proptest! {
		#[test]
		fn prop_no_table_parameters_yields_persisted_state(
			saved in proptest::collection::btree_map("t_(page|rows|sort\\.[a-z]{1,4})", "[a-z0-9]{1,4}", 0..5),
			user in proptest::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{1,4}", 0..5),
		) {
			let scope = TableScope::new("", "t_");
			let saved: ParameterStore = saved.into_iter().collect();
			let raw: ParameterStore = user.into_iter().collect();

			let state = MemoryStateStore::new();
			if !saved.is_empty() {
				state.save("t_", &saved).unwrap();
			}

			let resolved = ParameterRegistry::new(&scope).resolve(&raw, &state).unwrap();
			prop_assert_eq!(resolved, saved);
		}
	}
}
