//! Table model: one table, one request
//!
//! [`TableBuilder`] collects the configuration of a table and resolves it
//! against the request parameters:
//!
//! ```mermaid
//! graph LR
//!     A[Registry] --> B[Limit]
//!     B --> C[Export check]
//!     C --> D[Columns]
//!     D --> E[Pipeline]
//!     E --> F[Calcs]
//! ```
//!
//! The first four steps happen in [`TableBuilder::build`]; rows are processed
//! by [`TableModel::process`].

use crate::error::Result;
use crate::settings::TableSettings;
use reinhardt_tables_calc::{CalcEngine, CalculatorRegistry, ColumnCalcs, calc_titles};
use reinhardt_tables_limit::{Limit, LimitResolver, RowWindow};
use reinhardt_tables_params::{
	ParameterRegistry, ParameterStore, StateMode, StateStore, TableScope, is_export_request,
};
use reinhardt_tables_rows::{
	CalcScope, Column, ColumnSet, Export, ExportRegistry, FilterRows, Locale, PatternFormatter,
	PipelineDiagnostics, ProcessRows, ProcessedRows, PropertyResolver, RetrievalContext,
	RowPipeline, RowSource, SortRows, ValueFormatter,
};
use std::fmt;
use std::sync::Arc;

/// Configuration of one table
pub struct TableBuilder {
	table_id: String,
	settings: TableSettings,
	columns: Vec<Column>,
	exports: ExportRegistry,
	formatter: Arc<dyn ValueFormatter>,
	source: Option<String>,
	source_scope: Option<String>,
}

impl TableBuilder {
	/// Creates a table with default settings
	pub fn new(table_id: impl Into<String>) -> Self {
		Self {
			table_id: table_id.into(),
			settings: TableSettings::default(),
			columns: Vec::new(),
			exports: ExportRegistry::new(),
			formatter: Arc::new(PatternFormatter),
			source: None,
			source_scope: None,
		}
	}

	/// Replaces the settings
	pub fn settings(mut self, settings: TableSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Adds a column
	pub fn column(mut self, column: Column) -> Self {
		self.columns.push(column);
		self
	}

	/// Adds several columns
	pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
		self.columns.extend(columns);
		self
	}

	/// Registers an export
	pub fn export(mut self, export: Export) -> Self {
		self.exports.register(export);
		self
	}

	/// Replaces the value formatter
	pub fn formatter(mut self, formatter: impl ValueFormatter + 'static) -> Self {
		self.formatter = Arc::new(formatter);
		self
	}

	/// Names the collection the row source reads
	pub fn source(mut self, source: impl Into<String>) -> Self {
		self.source = Some(source.into());
		self
	}

	/// Sets where the row source finds the collection
	pub fn source_scope(mut self, scope: impl Into<String>) -> Self {
		self.source_scope = Some(scope.into());
		self
	}

	/// Resolves the table against the request parameters
	///
	/// A `clear` filter action also removes the filters from the persisted
	/// state.
	///
	/// # Errors
	///
	/// - [`TableError::Settings`](crate::TableError::Settings) for an invalid locale
	/// - [`TableError::State`](crate::TableError::State) when the state store fails
	/// - [`TableError::Parse`](crate::TableError::Parse) for a malformed page or rows parameter
	/// - [`TableError::StateConsistency`](crate::TableError::StateConsistency) when an
	///   export is requested that is not registered
	/// - [`TableError::Column`](crate::TableError::Column) for duplicate aliases
	pub fn build(self, raw: &ParameterStore, state: &dyn StateStore) -> Result<TableModel> {
		let settings = self.settings;
		let locale = settings.locale()?;
		let scope = TableScope::new(settings.prefix.as_str(), self.table_id.as_str());

		let mut parameters = ParameterRegistry::new(&scope)
			.state_mode(settings.state)
			.state_attr(settings.state_attr.as_str())
			.auto_include_parameters(settings.auto_include_parameters)
			.resolve(raw, state)?;

		let exported = is_export_request(raw, scope.table_id());
		let limit = LimitResolver::new(&scope)
			.exported(exported)
			.paginated(settings.show_pagination)
			.resolve(&mut parameters)?;

		if limit.is_cleared() && settings.state != StateMode::Disabled {
			let mut table_parameters = ParameterStore::new();
			for (name, values) in &parameters {
				if scope.is_table_parameter(name) {
					table_parameters.insert(name.clone(), values.clone());
				}
			}
			tracing::debug!(table_id = scope.table_id(), "saving state without cleared filters");
			state.save(scope.table_id(), &table_parameters)?;
		}

		let export = if exported {
			match self.exports.current(&parameters, &scope) {
				Ok(export) => Some(export),
				Err(error) => {
					tracing::error!(table_id = scope.table_id(), %error, "export is not configured");
					return Err(error.into());
				}
			}
		} else {
			None
		};

		let view = export
			.as_ref()
			.map_or(settings.view.as_str(), Export::view)
			.to_string();
		let mut columns = ColumnSet::new(view).with_defaults(settings.column_defaults());
		for column in self.columns {
			columns.add(column)?;
		}

		Ok(TableModel {
			scope,
			settings,
			locale,
			parameters,
			limit,
			columns,
			exports: self.exports,
			export,
			formatter: self.formatter,
			source: self.source,
			source_scope: self.source_scope,
		})
	}
}

impl fmt::Debug for TableBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableBuilder")
			.field("table_id", &self.table_id)
			.field("settings", &self.settings)
			.field("columns", &self.columns)
			.field("exports", &self.exports)
			.finish_non_exhaustive()
	}
}

/// A table resolved for one request
pub struct TableModel {
	scope: TableScope,
	settings: TableSettings,
	locale: Locale,
	parameters: ParameterStore,
	limit: Limit,
	columns: ColumnSet,
	exports: ExportRegistry,
	export: Option<Export>,
	formatter: Arc<dyn ValueFormatter>,
	source: Option<String>,
	source_scope: Option<String>,
}

impl TableModel {
	/// Table identifier
	pub fn table_id(&self) -> &str {
		self.scope.table_id()
	}

	/// Parameter names of this table
	pub fn scope(&self) -> &TableScope {
		&self.scope
	}

	/// Settings in effect
	pub fn settings(&self) -> &TableSettings {
		&self.settings
	}

	/// Locale in effect
	pub fn locale(&self) -> &Locale {
		&self.locale
	}

	/// Resolved parameters
	pub fn parameters(&self) -> &ParameterStore {
		&self.parameters
	}

	/// Resolved limit
	pub fn limit(&self) -> &Limit {
		&self.limit
	}

	/// Parameters reproducing the current limit, for building links
	pub fn limit_parameters(&self) -> ParameterStore {
		self.limit.to_parameters(&self.scope)
	}

	/// Columns shown in the current view
	pub fn columns(&self) -> &ColumnSet {
		&self.columns
	}

	/// Current view
	pub fn view(&self) -> &str {
		self.columns.view()
	}

	/// Registered exports
	pub fn exports(&self) -> &ExportRegistry {
		&self.exports
	}

	/// Export of this request, if any
	pub fn export(&self) -> Option<&Export> {
		self.export.as_ref()
	}

	/// Returns true when this request exports the table
	pub fn is_exported(&self) -> bool {
		self.limit.is_exported()
	}

	/// Processes rows with the default filter and sort callbacks
	///
	/// # Errors
	///
	/// Returns [`TableError::Retrieval`](crate::TableError::Retrieval) when the
	/// row source fails.
	pub fn process<R: PropertyResolver>(
		&mut self,
		source: &dyn RowSource<R>,
		calculators: &CalculatorRegistry,
	) -> Result<TableView<R>> {
		let columns = &self.columns;
		let callbacks = ProcessRows::new(columns, &self.locale, self.formatter.as_ref())
			.nulls_high(self.settings.nulls_high);
		let context = retrieval_context(&self.scope, &self.source, &self.source_scope);

		let rows = RowPipeline::new(source, &callbacks, &callbacks)
			.rows_displayed(self.settings.rows_displayed)
			.process(&context, &mut self.limit)?;

		Ok(self.finish(rows, calculators))
	}

	/// Processes rows with custom filter and sort callbacks
	///
	/// # Errors
	///
	/// Returns [`TableError::Retrieval`](crate::TableError::Retrieval) when the
	/// row source fails.
	pub fn process_with<R: PropertyResolver>(
		&mut self,
		source: &dyn RowSource<R>,
		filter: &dyn FilterRows<R>,
		sort: &dyn SortRows<R>,
		calculators: &CalculatorRegistry,
	) -> Result<TableView<R>> {
		let context = retrieval_context(&self.scope, &self.source, &self.source_scope);
		let rows = RowPipeline::new(source, filter, sort)
			.rows_displayed(self.settings.rows_displayed)
			.process(&context, &mut self.limit)?;

		Ok(self.finish(rows, calculators))
	}

	fn finish<R: PropertyResolver>(
		&self,
		rows: ProcessedRows<R>,
		calculators: &CalculatorRegistry,
	) -> TableView<R> {
		let mut registry = calculators.clone();
		for (name, target) in &self.settings.calc {
			registry.alias(name.as_str(), target.as_str());
		}

		let engine = CalcEngine::new(&registry);
		let calcs = self
			.columns
			.calculated()
			.map(|column| match column.calc_scope() {
				CalcScope::Filtered => engine.compute_column(rows.rows(), column),
				CalcScope::Page => engine.compute_column(rows.page_rows(), column),
			})
			.collect();

		TableView {
			total_pages: self.limit.total_pages(self.settings.rows_displayed),
			calc_titles: calc_titles(&self.columns),
			calcs,
			rows,
		}
	}
}

fn retrieval_context<'a>(
	scope: &'a TableScope,
	source: &'a Option<String>,
	source_scope: &'a Option<String>,
) -> RetrievalContext<'a> {
	let mut context = RetrievalContext::new(scope.table_id());
	if let Some(source) = source {
		context = context.with_source(source);
	}
	if let Some(source_scope) = source_scope {
		context = context.with_scope(source_scope);
	}
	context
}

impl fmt::Debug for TableModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableModel")
			.field("scope", &self.scope)
			.field("limit", &self.limit)
			.field("columns", &self.columns)
			.field("export", &self.export)
			.finish_non_exhaustive()
	}
}

/// Processed rows and calculations of one request
#[derive(Debug, Clone)]
pub struct TableView<R> {
	rows: ProcessedRows<R>,
	calcs: Vec<ColumnCalcs>,
	calc_titles: Vec<String>,
	total_pages: usize,
}

impl<R> TableView<R> {
	/// Every filtered and sorted row
	pub fn rows(&self) -> &[R] {
		self.rows.rows()
	}

	/// Rows of the requested page
	pub fn page_rows(&self) -> &[R] {
		self.rows.page_rows()
	}

	/// Window of the requested page
	pub fn window(&self) -> RowWindow {
		self.rows.window()
	}

	/// Number of pages
	pub fn total_pages(&self) -> usize {
		self.total_pages
	}

	/// Calculation results of every calculated column
	pub fn calcs(&self) -> &[ColumnCalcs] {
		&self.calcs
	}

	/// Calculation results of the column with `alias`
	pub fn column_calcs(&self, alias: &str) -> Option<&ColumnCalcs> {
		self.calcs.iter().find(|calcs| calcs.alias == alias)
	}

	/// Titles of the calculation rows
	pub fn calc_titles(&self) -> &[String] {
		&self.calc_titles
	}

	/// Recovered per-row problems
	pub fn diagnostics(&self) -> &PipelineDiagnostics {
		self.rows.diagnostics()
	}

	/// Consumes the view, returning the rows of the requested page
	pub fn into_page_rows(self) -> Vec<R> {
		self.rows.into_page_rows()
	}
}
