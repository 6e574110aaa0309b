//! # Reinhardt Tables
//!
//! Paginated, sortable, filterable tables driven entirely by request
//! parameters. Table state travels in parameter names and values, so no
//! server-side session is needed between requests; a [`StateStore`] can still
//! remember the last state of a table.
//!
//! ## Crates
//!
//! - [`reinhardt_tables_params`]: parameter grammar, registry and state stores
//! - [`reinhardt_tables_limit`]: page, sort and filter directives
//! - [`reinhardt_tables_rows`]: columns, exports and the row pipeline
//! - [`reinhardt_tables_calc`]: column calculations
//!
//! ## Example
//!
//! Parameter names are `prefix + table id + segment`, plainly concatenated,
//! so table ids usually end with a separator.
//!
//! ```
//! use reinhardt_tables::{
//!     CalculatorRegistry, CollectionSource, Column, MemoryStateStore, ParameterStore,
//!     TableBuilder,
//! };
//! use serde_json::json;
//!
//! let rows = CollectionSource::new(vec![
//!     json!({"name": "Acme Corp", "revenue": 120}),
//!     json!({"name": "Globex", "revenue": 80}),
//!     json!({"name": "Umbrella Corp", "revenue": 200}),
//! ]);
//!
//! let request = ParameterStore::from_query(
//!     "companies_filter.name=*corp&companies_filter.action=filter&companies_sort.revenue=desc",
//! )
//! .unwrap();
//!
//! let mut table = TableBuilder::new("companies_")
//!     .column(Column::new("name"))
//!     .column(Column::new("revenue").with_calc("total"))
//!     .build(&request, &MemoryStateStore::new())
//!     .unwrap();
//!
//! let view = table.process(&rows, &CalculatorRegistry::with_builtins()).unwrap();
//! assert_eq!(view.page_rows()[0]["name"], "Umbrella Corp");
//! assert_eq!(view.calcs()[0].results[0].value(), Some(rust_decimal::Decimal::from(320)));
//! ```
//!
//! ## Logging
//!
//! The crates log through [`tracing`] and never install a subscriber.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod model;
pub mod settings;

pub use error::{Result, TableError};
pub use model::{TableBuilder, TableModel, TableView};
pub use settings::{SettingsError, TableSettings};

pub use reinhardt_tables_calc::{
	Accumulator, AverageCalc, CalcEngine, CalcError, CalcResult, Calculator, CalculatorRegistry,
	ColumnCalcs, CountCalc, TotalCalc,
};
pub use reinhardt_tables_limit::{
	Filter, FilterAction, FilterSet, Limit, LimitError, LimitResolver, Page, RowWindow, Sort,
	SortOrder,
};
pub use reinhardt_tables_params::{
	MemoryStateStore, NoopStateStore, ParameterRegistry, ParameterStore, StateError, StateMode,
	StateStore, TableScope,
};
pub use reinhardt_tables_rows::{
	CalcScope, CollectionSource, Column, ColumnError, ColumnSet, Export, ExportError,
	ExportRegistry, FilterRows, Locale, PatternFormatter, PipelineDiagnostics, ProcessRows,
	PropertyResolver, RetrievalContext, RetrievalError, RowSource, SortRows, Value, ValueFormatter,
};

pub use reinhardt_tables_calc as calc;
pub use reinhardt_tables_limit as limit;
pub use reinhardt_tables_params as params;
pub use reinhardt_tables_rows as rows;
