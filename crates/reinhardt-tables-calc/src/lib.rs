//! Column calculations for Reinhardt tables
//!
//! Columns declare calculations by name (`total`, `average`, ...). Names are
//! looked up in a [`CalculatorRegistry`] handed to the [`CalcEngine`], which
//! folds the column's values into a [`CalcResult`].
//!
//! ## Example
//!
//! ```
//! use reinhardt_tables_calc::{CalcEngine, CalculatorRegistry};
//! use reinhardt_tables_rows::Column;
//! use rust_decimal::Decimal;
//! use serde_json::json;
//!
//! let rows = vec![json!({"x": 10}), json!({"x": 20})];
//! let column = Column::new("x").with_calc("average");
//! let registry = CalculatorRegistry::with_builtins();
//!
//! let result = CalcEngine::new(&registry).compute(&rows, &column, "average");
//! assert_eq!(result.value(), Some(Decimal::from(15)));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod calculator;
pub mod engine;
pub mod error;
pub mod registry;

pub use calculator::{Accumulator, AverageCalc, Calculator, CountCalc, TotalCalc};
pub use engine::{CalcEngine, CalcResult, ColumnCalcs, calc_titles};
pub use error::CalcError;
pub use registry::CalculatorRegistry;
