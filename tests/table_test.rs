use chrono::NaiveDate;
use reinhardt_tables::limit::LimitError;
use reinhardt_tables::params::StateError;
use reinhardt_tables::rows::PropertyError;
use reinhardt_tables::{
	CalcScope, CalculatorRegistry, CollectionSource, Column, ColumnError, Export, ExportError,
	MemoryStateStore, NoopStateStore, ParameterStore, PropertyResolver, RetrievalContext,
	RetrievalError, RowSource, SortOrder, StateMode, StateStore, TableBuilder, TableError,
	TableSettings, Value,
};
use proptest::prelude::*;
use rstest::*;
use rust_decimal::Decimal;
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
struct Employee {
	name: &'static str,
	department: &'static str,
	salary: Option<i64>,
	hired: NaiveDate,
}

impl PropertyResolver for Employee {
	fn property(&self, path: &str) -> Result<Option<Value>, PropertyError> {
		match path {
			"name" => Ok(Some(self.name.into())),
			"department" => Ok(Some(self.department.into())),
			"salary" => Ok(self.salary.map(Value::from)),
			"hired" => Ok(Some(self.hired.into())),
			_ => Err(PropertyError::NotFound {
				path: path.to_string(),
			}),
		}
	}
}

fn employee(
	name: &'static str,
	department: &'static str,
	salary: Option<i64>,
	hired: (i32, u32, u32),
) -> Employee {
	Employee {
		name,
		department,
		salary,
		hired: NaiveDate::from_ymd_opt(hired.0, hired.1, hired.2).unwrap(),
	}
}

fn staff() -> CollectionSource<Employee> {
	CollectionSource::new(vec![
		employee("Alice", "Engineering", Some(5000), (2019, 3, 1)),
		employee("Bob", "Sales", Some(3000), (2021, 6, 15)),
		employee("Carol", "Engineering", Some(7000), (2020, 1, 10)),
		employee("Dave", "Marketing", None, (2021, 11, 30)),
		employee("Erin", "Engineering", Some(6000), (2018, 7, 4)),
		employee("Frank", "Sales", Some(4000), (2022, 2, 2)),
	])
}

#[fixture]
fn employees() -> CollectionSource<Employee> {
	staff()
}

#[fixture]
fn calculators() -> CalculatorRegistry {
	CalculatorRegistry::with_builtins()
}

fn staff_table() -> TableBuilder {
	TableBuilder::new("t_")
		.column(Column::new("name"))
		.column(Column::new("department"))
		.column(Column::new("salary").with_calc("total").with_calc("average"))
		.column(Column::new("hired").date())
}

fn request(query: &str) -> ParameterStore {
	ParameterStore::from_query(query).unwrap()
}

fn names(rows: &[Employee]) -> Vec<&str> {
	rows.iter().map(|row| row.name).collect()
}

#[rstest]
fn test_filter_sort_and_page(employees: CollectionSource<Employee>, calculators: CalculatorRegistry) {
	let mut table = staff_table()
		.build(
			&request("t_filter.department=eng*&t_filter.action=filter&t_sort.salary=asc&t_rows=2&t_page=2"),
			&NoopStateStore,
		)
		.unwrap();

	let view = table.process(&employees, &calculators).unwrap();

	assert_eq!(names(view.rows()), ["Alice", "Erin", "Carol"]);
	assert_eq!(names(view.page_rows()), ["Carol"]);
	assert_eq!(view.window().range(), 2..3);
	assert_eq!(view.total_pages(), 2);
	assert_eq!(table.limit().total_rows(), 3);

	let salary = view.column_calcs("salary").unwrap();
	assert_eq!(salary.results[0].value(), Some(Decimal::from(18000)));
	assert_eq!(salary.results[1].value(), Some(Decimal::from(6000)));
	assert_eq!(view.calc_titles(), ["total", "average"]);
	assert!(view.diagnostics().is_clean());
}

#[rstest]
fn test_nulls_sort_high(employees: CollectionSource<Employee>, calculators: CalculatorRegistry) {
	let mut table = staff_table()
		.build(&request("t_sort.salary=asc"), &NoopStateStore)
		.unwrap();
	let view = table.process(&employees, &calculators).unwrap();
	assert_eq!(names(view.rows()), ["Bob", "Frank", "Alice", "Erin", "Carol", "Dave"]);

	let mut table = staff_table()
		.build(&request("t_sort.salary=desc"), &NoopStateStore)
		.unwrap();
	let view = table.process(&employees, &calculators).unwrap();
	assert_eq!(names(view.rows()), ["Dave", "Carol", "Erin", "Alice", "Frank", "Bob"]);
}

#[rstest]
fn test_filter_formatted_dates(employees: CollectionSource<Employee>, calculators: CalculatorRegistry) {
	let mut table = staff_table()
		.build(&request("t_filter.hired=*2021&t_filter.action=filter"), &NoopStateStore)
		.unwrap();

	let view = table.process(&employees, &calculators).unwrap();
	assert_eq!(names(view.rows()), ["Bob", "Dave"]);
}

#[rstest]
fn test_clear_purges_filters(employees: CollectionSource<Employee>, calculators: CalculatorRegistry) {
	let mut table = staff_table()
		.build(
			&request("t_filter.department=eng*&t_filter.action=clear"),
			&NoopStateStore,
		)
		.unwrap();

	assert!(table.limit().is_cleared());
	assert!(!table.parameters().contains("t_filter.department"));

	let view = table.process(&employees, &calculators).unwrap();
	assert_eq!(view.rows().len(), 6);
}

#[rstest]
fn test_clear_purges_persisted_filters(employees: CollectionSource<Employee>, calculators: CalculatorRegistry) {
	let store = MemoryStateStore::new();

	staff_table()
		.build(&request("t_filter.name=bob&t_filter.action=filter&t_page=2"), &store)
		.unwrap();
	staff_table()
		.build(&request("t_filter.name=bob&t_filter.action=clear&t_page=2"), &store)
		.unwrap();

	let saved = store.load("t_", "state").unwrap().unwrap();
	assert!(!saved.contains("t_filter.name"));
	assert!(!saved.contains("t_filter.action"));
	assert_eq!(saved.get("t_page"), Some("2"));

	let mut restored = staff_table().build(&ParameterStore::new(), &store).unwrap();
	assert!(!restored.limit().is_filtered());
	assert_eq!(restored.limit().page().number(), 2);
	let view = restored.process(&employees, &calculators).unwrap();
	assert_eq!(view.rows().len(), 6);
}

#[rstest]
fn test_clear_leaves_disabled_state_untouched() {
	let store = MemoryStateStore::new();
	let settings = TableSettings {
		state: StateMode::Disabled,
		..TableSettings::default()
	};

	staff_table()
		.settings(settings)
		.build(&request("t_filter.name=bob&t_filter.action=clear"), &store)
		.unwrap();
	assert!(store.is_empty());
}

#[rstest]
fn test_filter_without_action_is_ignored(employees: CollectionSource<Employee>, calculators: CalculatorRegistry) {
	let mut table = staff_table()
		.build(&request("t_filter.department=sales"), &NoopStateStore)
		.unwrap();

	let view = table.process(&employees, &calculators).unwrap();
	assert_eq!(view.rows().len(), 6);
}

#[rstest]
fn test_page_past_the_end_is_empty(employees: CollectionSource<Employee>, calculators: CalculatorRegistry) {
	let mut table = staff_table()
		.build(&request("t_page=5&t_rows=3"), &NoopStateStore)
		.unwrap();

	let view = table.process(&employees, &calculators).unwrap();
	assert!(view.page_rows().is_empty());
	assert_eq!(view.total_pages(), 2);
}

#[rstest]
#[case("t_page=abc")]
#[case("t_page=0")]
#[case("t_page=-1")]
fn test_malformed_page(#[case] query: &str) {
	let result = staff_table().build(&request(query), &NoopStateStore);
	assert!(matches!(
		result,
		Err(TableError::Parse(LimitError::InvalidPage { .. }))
	));
}

#[rstest]
fn test_malformed_rows_displayed() {
	let result = staff_table().build(&request("t_rows=lots"), &NoopStateStore);
	assert!(matches!(
		result,
		Err(TableError::Parse(LimitError::InvalidRowsDisplayed { .. }))
	));
}

#[rstest]
fn test_limit_parameters_round_trip() {
	let table = staff_table()
		.build(
			&request("t_page=2&t_rows=2&t_sort.pay=desc&t_alias.pay=salary&t_filter.department=eng*&t_filter.action=filter"),
			&NoopStateStore,
		)
		.unwrap();
	assert_eq!(table.limit().sort().property(), "salary");
	assert_eq!(table.limit().sort().order(), SortOrder::Descending);

	let rebuilt = staff_table()
		.build(&table.limit_parameters(), &NoopStateStore)
		.unwrap();
	assert_eq!(rebuilt.limit(), table.limit());
}

#[rstest]
fn test_persisted_state_is_restored() {
	let store = MemoryStateStore::new();

	staff_table().build(&request("t_page=2&t_rows=2"), &store).unwrap();
	let restored = staff_table().build(&ParameterStore::new(), &store).unwrap();
	assert_eq!(restored.limit().page().number(), 2);
	assert_eq!(restored.limit().page().size_override(), Some(2));

	let fresh = staff_table().build(&request("t_page=3"), &store).unwrap();
	assert_eq!(fresh.limit().page().number(), 3);
	assert_eq!(fresh.limit().page().size_override(), None);
}

#[rstest]
fn test_notify_state_needs_the_state_attribute() {
	let store = MemoryStateStore::new();
	let settings = TableSettings {
		state: StateMode::Notify,
		..TableSettings::default()
	};

	staff_table()
		.settings(settings.clone())
		.build(&request("t_page=4"), &store)
		.unwrap();

	let ignored = staff_table()
		.settings(settings.clone())
		.build(&request("q=report"), &store)
		.unwrap();
	assert_eq!(ignored.limit().page().number(), 1);

	staff_table()
		.settings(settings.clone())
		.build(&request("t_page=4"), &store)
		.unwrap();
	let restored = staff_table()
		.settings(settings)
		.build(&request("state=true"), &store)
		.unwrap();
	assert_eq!(restored.limit().page().number(), 4);
}

#[rstest]
fn test_disabled_state_saves_nothing() {
	let store = MemoryStateStore::new();
	let settings = TableSettings {
		state: StateMode::Disabled,
		..TableSettings::default()
	};

	staff_table()
		.settings(settings)
		.build(&request("t_page=2"), &store)
		.unwrap();
	assert!(store.is_empty());
}

struct BrokenStateStore;

impl StateStore for BrokenStateStore {
	fn save(&self, _table_id: &str, _parameters: &ParameterStore) -> Result<(), StateError> {
		Err(StateError::Backend("store offline".to_string()))
	}

	fn load(&self, _table_id: &str, _state_key: &str) -> Result<Option<ParameterStore>, StateError> {
		Err(StateError::Backend("store offline".to_string()))
	}
}

#[rstest]
fn test_state_store_failure() {
	let result = staff_table().build(&ParameterStore::new(), &BrokenStateStore);
	assert!(matches!(result, Err(TableError::State(StateError::Backend(_)))));
}

fn exporting_table() -> TableBuilder {
	TableBuilder::new("t_")
		.column(Column::new("name"))
		.column(Column::new("department").views_denied(["csv"]))
		.column(Column::new("salary").with_calc("total"))
		.export(Export::new("csv").with_file_name("staff.csv"))
}

#[rstest]
fn test_export_shows_every_row(employees: CollectionSource<Employee>, calculators: CalculatorRegistry) {
	let mut table = exporting_table()
		.build(
			&request("export-table-id=t_&t_export-view=csv&t_page=3&t_rows=2&t_sort.name=desc"),
			&NoopStateStore,
		)
		.unwrap();

	assert!(table.is_exported());
	assert_eq!(table.view(), "csv");
	assert_eq!(table.export().and_then(Export::file_name), Some("staff.csv"));
	assert_eq!(table.columns().len(), 2);
	assert!(table.columns().get("department").is_none());

	let view = table.process(&employees, &calculators).unwrap();
	assert_eq!(view.page_rows().len(), 6);
	assert_eq!(view.page_rows()[0].name, "Frank");
	assert_eq!(
		view.column_calcs("salary").unwrap().results[0].value(),
		Some(Decimal::from(25000))
	);
}

#[rstest]
fn test_export_file_name_override() {
	let table = exporting_table()
		.build(
			&request("export-table-id=t_&t_export-view=csv&t_export-filename=march.csv"),
			&NoopStateStore,
		)
		.unwrap();
	assert_eq!(table.export().and_then(Export::file_name), Some("march.csv"));
}

#[rstest]
fn test_export_of_another_table_is_ignored() {
	let table = exporting_table()
		.build(&request("export-table-id=other&t_export-view=csv"), &NoopStateStore)
		.unwrap();
	assert!(!table.is_exported());
	assert_eq!(table.view(), "html");
	assert_eq!(table.columns().len(), 3);
}

#[rstest]
fn test_unregistered_export_view() {
	let result = exporting_table().build(
		&request("export-table-id=t_&t_export-view=pdf"),
		&NoopStateStore,
	);
	match result {
		Err(TableError::StateConsistency(ExportError::NotRegistered { table_id, view })) => {
			assert_eq!(table_id, "t_");
			assert_eq!(view, "pdf");
		}
		other => panic!("expected unregistered export, got {other:?}"),
	}
}

#[rstest]
fn test_missing_export_view() {
	let result = exporting_table().build(&request("export-table-id=t_"), &NoopStateStore);
	assert!(matches!(
		result,
		Err(TableError::StateConsistency(ExportError::MissingView { .. }))
	));
}

#[rstest]
fn test_page_scoped_calculation(employees: CollectionSource<Employee>, calculators: CalculatorRegistry) {
	let mut table = TableBuilder::new("t_")
		.column(Column::new("name"))
		.column(
			Column::new("salary")
				.with_calc("total")
				.with_calc_title("Page total")
				.with_calc_scope(CalcScope::Page),
		)
		.build(&request("t_sort.salary=asc&t_rows=2"), &NoopStateStore)
		.unwrap();

	let view = table.process(&employees, &calculators).unwrap();
	assert_eq!(
		view.column_calcs("salary").unwrap().results[0].value(),
		Some(Decimal::from(7000))
	);
	assert_eq!(view.calc_titles(), ["Page total"]);
}

#[rstest]
fn test_settings_calc_aliases(employees: CollectionSource<Employee>, calculators: CalculatorRegistry) {
	let settings = TableSettings::from_toml_str(
		r#"
		[calc]
		sum = "total"
		"#,
	)
	.unwrap();

	let mut table = TableBuilder::new("t_")
		.settings(settings)
		.column(Column::new("salary").with_calc("sum").with_calc("median"))
		.build(&ParameterStore::new(), &NoopStateStore)
		.unwrap();

	let view = table.process(&employees, &calculators).unwrap();
	let results = &view.column_calcs("salary").unwrap().results;
	assert_eq!(results[0].identifier(), "sum");
	assert_eq!(results[0].value(), Some(Decimal::from(25000)));
	assert_eq!(results[1].value(), None);
}

#[rstest]
fn test_invalid_locale_setting() {
	let settings = TableSettings {
		locale: "??".to_string(),
		..TableSettings::default()
	};
	let result = staff_table()
		.settings(settings)
		.build(&ParameterStore::new(), &NoopStateStore);
	assert!(matches!(result, Err(TableError::Settings(_))));
}

#[rstest]
fn test_duplicate_alias() {
	let result = TableBuilder::new("t_")
		.column(Column::new("name"))
		.column(Column::new("name").with_title("Full name"))
		.build(&ParameterStore::new(), &NoopStateStore);

	match result {
		Err(TableError::Column(ColumnError::DuplicateAlias { alias })) => assert_eq!(alias, "name"),
		other => panic!("expected duplicate alias, got {other:?}"),
	}
}

struct OfflineSource;

impl RowSource<Employee> for OfflineSource {
	fn retrieve(&self, context: &RetrievalContext<'_>) -> Result<Vec<Employee>, RetrievalError> {
		assert_eq!(context.table_id(), "t_");
		assert_eq!(context.source(), Some("employees"));
		Err(RetrievalError::new("database unavailable"))
	}
}

#[rstest]
fn test_retrieval_error(calculators: CalculatorRegistry) {
	let mut table = staff_table()
		.source("employees")
		.build(&ParameterStore::new(), &NoopStateStore)
		.unwrap();

	match table.process(&OfflineSource, &calculators) {
		Err(TableError::Retrieval(error)) => assert_eq!(error.message(), "database unavailable"),
		other => panic!("expected retrieval error, got {other:?}"),
	}
}

#[rstest]
fn test_row_problems_are_diagnostics(calculators: CalculatorRegistry) {
	let rows = CollectionSource::new(vec![
		json!({"name": "Acme", "size": 10}),
		json!({"size": "large"}),
		json!({"name": "Acme Labs", "size": "small"}),
	]);

	let mut table = TableBuilder::new("t_")
		.column(Column::new("name"))
		.column(Column::new("size"))
		.build(
			&request("t_filter.name=acme*&t_filter.action=filter&t_sort.size=asc"),
			&NoopStateStore,
		)
		.unwrap();

	let view = table.process(&rows, &calculators).unwrap();
	assert_eq!(view.rows().len(), 2);

	let diagnostics = view.diagnostics();
	assert_eq!(diagnostics.filter_failures.len(), 1);
	assert_eq!(diagnostics.filter_failures[0].index, 1);
	assert!(!diagnostics.sort_failures.is_empty());
}

proptest! {
	#[test]
	fn prop_page_slices_sorted_rows(page in 1u32..10, rows in 1usize..8) {
		let mut table = staff_table()
			.build(&request(&format!("t_sort.name=asc&t_page={page}&t_rows={rows}")), &NoopStateStore)
			.unwrap();
		let view = table.process(&staff(), &CalculatorRegistry::with_builtins()).unwrap();

		let start = (page as usize - 1) * rows;
		let expected: Vec<&str> = names(view.rows()).into_iter().skip(start).take(rows).collect();
		prop_assert_eq!(names(view.page_rows()), expected);
		prop_assert_eq!(view.total_pages(), 6usize.div_ceil(rows));
	}
}
