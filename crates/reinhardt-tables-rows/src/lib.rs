//! Row processing for Reinhardt tables
//!
//! Rows are in-memory objects exposing their properties through
//! [`PropertyResolver`]. A [`RowPipeline`] runs them through the stages of one
//! table request:
//!
//! ```mermaid
//! graph LR
//!     A[Retrieve] --> B[Filter]
//!     B --> C[Sort]
//!     C --> D[Paginate]
//! ```
//!
//! - **Retrieve**: a [`RowSource`] supplies the rows
//! - **Filter**: [`FilterPredicate`] keeps rows matching every column filter
//! - **Sort**: [`SortEngine`] orders rows with [`NullSafeComparator`]
//! - **Paginate**: the [`Limit`](reinhardt_tables_limit::Limit) row window is applied
//!
//! Per-row problems (an unreadable property, values of different kinds) never
//! abort a request; they are collected in [`PipelineDiagnostics`].

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod column;
pub mod export;
pub mod filter;
pub mod format;
pub mod locale;
pub mod pipeline;
pub mod property;
pub mod sort;
pub mod value;

pub use column::{CalcScope, Column, ColumnDefaults, ColumnError, ColumnSet};
pub use export::{Export, ExportError, ExportRegistry};
pub use filter::{FilterEvaluationError, FilterPredicate, is_search_match};
pub use format::{FormatError, PatternFormatter, ValueFormatter};
pub use locale::{InvalidLocale, Locale};
pub use pipeline::{
	CollectionSource, FilterRows, Filtered, PipelineDiagnostics, ProcessRows, ProcessedRows,
	RetrievalContext, RetrievalError, RowFailure, RowPipeline, RowSource, SortRows, Sorted,
};
pub use property::{PropertyError, PropertyResolver};
pub use sort::{ComparisonError, NullSafeComparator, SortEngine};
pub use value::Value;
